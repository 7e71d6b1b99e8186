//! Text forms of query trees.
//!
//! The serialised form is
//!
//! ```text
//! serialised := "Q" [ "B" ] [ "L" uint ] ":" node
//! node       := leaf | operator
//! leaf       := "[" uint ":" bytes "@" uint "#" uint
//! operator   := "(" OPNAME [ "/" uint ] node+ ")"
//! ```
//!
//! where a leaf is the term's byte length, the term, its position and its
//! within-query frequency, and the window is written for `NEAR` and `PHRASE`.

use std::fmt::Write;

use crate::error::{LexicoreError, Result};
use crate::query::node::QueryNode;
use crate::query::op::QueryOp;

/// Deepest operator nesting accepted when parsing.
pub const MAX_NESTING: usize = 256;

/// The flags and tree carried by a serialised query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Serialised {
    pub root: QueryNode,
    pub is_bool: bool,
    pub length: Option<u32>,
}

pub(crate) fn serialise(root: &QueryNode, is_bool: bool, length: Option<u32>) -> String {
    let mut out = String::from("Q");
    if is_bool {
        out.push('B');
    }
    if let Some(length) = length {
        let _ = write!(out, "L{length}");
    }
    out.push(':');
    serialise_node(root, &mut out);
    out
}

fn serialise_node(node: &QueryNode, out: &mut String) {
    match node {
        QueryNode::Leaf {
            term,
            position,
            wqf,
        } => {
            let _ = write!(out, "[{}:{term}@{position}#{wqf}", term.len());
        }
        QueryNode::Operator {
            op,
            window,
            children,
        } => {
            out.push('(');
            out.push_str(op.name());
            if op.is_proximity() {
                let _ = write!(out, "/{window}");
            }
            for child in children {
                serialise_node(child, out);
            }
            out.push(')');
        }
    }
}

/// Human-readable rendering of a tree.
pub(crate) fn describe(node: &QueryNode) -> String {
    let mut out = String::new();
    describe_node(node, &mut out);
    out
}

fn describe_node(node: &QueryNode, out: &mut String) {
    match node {
        QueryNode::Leaf {
            term,
            position,
            wqf,
        } => {
            out.push_str(term);
            if *position != 0 {
                let _ = write!(out, "@{position}");
            }
            if *wqf != 1 {
                let _ = write!(out, "#{wqf}");
            }
        }
        QueryNode::Operator {
            op,
            window,
            children,
        } => {
            let separator = if op.is_proximity() {
                format!(" {op} {window} ")
            } else {
                format!(" {op} ")
            };
            out.push('(');
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push_str(&separator);
                }
                describe_node(child, out);
            }
            out.push(')');
        }
    }
}

/// Parse a serialised query.
pub(crate) fn unserialise(input: &str) -> Result<Serialised> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
        depth: 0,
    };

    parser.expect(b'Q')?;
    let is_bool = parser.eat(b'B');
    let length = if parser.eat(b'L') {
        Some(parser.uint()?)
    } else {
        None
    };
    parser.expect(b':')?;
    let root = parser.node()?;
    if parser.pos != parser.input.len() {
        return Err(parser.error("trailing characters"));
    }

    Ok(Serialised {
        root,
        is_bool,
        length,
    })
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Operators currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, what: &str) -> LexicoreError {
        LexicoreError::invalid_argument(format!(
            "Bad serialised query: {what} at offset {}",
            self.pos
        ))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn uint(&mut self) -> Result<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a number"));
        }
        // Only ASCII digits were consumed.
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| self.error("number out of range"))
    }

    fn node(&mut self) -> Result<QueryNode> {
        match self.peek() {
            Some(b'[') => self.leaf(),
            Some(b'(') => self.operator(),
            _ => Err(self.error("expected a leaf or an operator")),
        }
    }

    fn leaf(&mut self) -> Result<QueryNode> {
        self.expect(b'[')?;
        let len = self.uint()? as usize;
        self.expect(b':')?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.error("term runs past the end"))?;
        let term = std::str::from_utf8(&self.input[self.pos..end])
            .map_err(|_| self.error("term is not valid UTF-8"))?
            .to_string();
        self.pos = end;

        self.expect(b'@')?;
        let position = self.uint()?;
        self.expect(b'#')?;
        let wqf = self.uint()?;

        Ok(QueryNode::Leaf {
            term,
            position,
            wqf,
        })
    }

    fn operator(&mut self) -> Result<QueryNode> {
        if self.depth == MAX_NESTING {
            return Err(self.error("operators nested too deeply"));
        }
        self.depth += 1;
        let node = self.operator_body();
        self.depth -= 1;
        node
    }

    fn operator_body(&mut self) -> Result<QueryNode> {
        self.expect(b'(')?;
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_uppercase() || b == b'_') {
            self.pos += 1;
        }
        let name = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("bad operator name"))?;
        let op = QueryOp::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| self.error("unknown operator"))?;

        let window = if self.eat(b'/') {
            if !op.is_proximity() {
                return Err(self.error("window on a non-proximity operator"));
            }
            Some(self.uint()?)
        } else {
            None
        };

        let mut children = Vec::new();
        while !self.eat(b')') {
            if self.peek().is_none() {
                return Err(self.error("unterminated operator"));
            }
            children.push(self.node()?);
        }
        if children.is_empty() {
            return Err(self.error("operator without children"));
        }

        let window = match window {
            Some(window) => window,
            None if op.is_proximity() => children.len() as u32,
            None => 0,
        };

        Ok(QueryNode::Operator {
            op,
            window,
            children,
        })
    }
}
