//! Query tree nodes.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::query::op::QueryOp;

/// A node of a query tree.
///
/// Operators own their children by value, so cloning a node copies the whole
/// subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryNode {
    /// A single term.
    Leaf {
        term: String,
        /// Position of the term in the query (0 when unknown).
        position: u32,
        /// Within-query frequency.
        wqf: u32,
    },
    /// An operator over one or more children.
    Operator {
        op: QueryOp,
        /// Position window; non-zero only for proximity operators.
        window: u32,
        children: Vec<QueryNode>,
    },
}

impl QueryNode {
    pub fn leaf(term: impl Into<String>, wqf: u32, position: u32) -> Self {
        QueryNode::Leaf {
            term: term.into(),
            position,
            wqf,
        }
    }

    /// The operator of an operator node.
    pub fn op(&self) -> Option<QueryOp> {
        match self {
            QueryNode::Leaf { .. } => None,
            QueryNode::Operator { op, .. } => Some(*op),
        }
    }

    pub fn children(&self) -> &[QueryNode] {
        match self {
            QueryNode::Leaf { .. } => &[],
            QueryNode::Operator { children, .. } => children,
        }
    }

    /// Sum of the within-query frequencies of every leaf.
    pub fn total_wqf(&self) -> u32 {
        match self {
            QueryNode::Leaf { wqf, .. } => *wqf,
            QueryNode::Operator { children, .. } => children
                .iter()
                .fold(0u32, |total, child| total.saturating_add(child.total_wqf())),
        }
    }

    /// Number of leaves in the subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            QueryNode::Leaf { .. } => 1,
            QueryNode::Operator { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Append the `(term, position)` pair of every leaf, depth first.
    pub fn collect_terms(&self, out: &mut Vec<(String, u32)>) {
        match self {
            QueryNode::Leaf { term, position, .. } => out.push((term.clone(), *position)),
            QueryNode::Operator { children, .. } => {
                for child in children {
                    child.collect_terms(out);
                }
            }
        }
    }

    /// Merge sibling leaves naming the same term under every `AND` and `OR`.
    ///
    /// The first leaf for a term absorbs the frequencies of the later ones and
    /// keeps its own position. Other children keep their order. An `AND` or
    /// `OR` left with a single child is replaced by that child.
    pub fn collapse(&mut self) {
        let QueryNode::Operator { op, children, .. } = self else {
            return;
        };
        for child in children.iter_mut() {
            child.collapse();
        }
        if !op.is_collapsible() {
            return;
        }
        merge_sibling_leaves(children);
        if children.len() == 1 {
            let only = children.remove(0);
            *self = only;
        }
    }
}

fn merge_sibling_leaves(children: &mut Vec<QueryNode>) {
    let mut first_seen: AHashMap<String, usize> = AHashMap::new();
    let mut merged = Vec::with_capacity(children.len());

    for child in children.drain(..) {
        match child {
            QueryNode::Leaf {
                term,
                position,
                wqf,
            } => {
                if let Some(&index) = first_seen.get(&term) {
                    if let QueryNode::Leaf { wqf: total, .. } = &mut merged[index] {
                        *total = total.saturating_add(wqf);
                    }
                } else {
                    first_seen.insert(term.clone(), merged.len());
                    merged.push(QueryNode::Leaf {
                        term,
                        position,
                        wqf,
                    });
                }
            }
            other => merged.push(other),
        }
    }

    *children = merged;
}
