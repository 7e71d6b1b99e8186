//! Query operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LexicoreError, Result};

/// How an operator node combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryOp {
    /// Every child must match.
    And,
    /// At least one child must match.
    Or,
    /// The first child must match and none of the others.
    AndNot,
    /// An odd number of children must match.
    Xor,
    /// The first child must match; the others only contribute weight.
    AndMaybe,
    /// The first child must match and the others must match too, but only the
    /// first contributes weight.
    Filter,
    /// The children must occur within a window of positions, in any order.
    Near,
    /// The children must occur within a window of positions, in order.
    Phrase,
}

impl QueryOp {
    /// Every operator, in serialisation name order.
    pub const ALL: [QueryOp; 8] = [
        QueryOp::And,
        QueryOp::Or,
        QueryOp::AndNot,
        QueryOp::Xor,
        QueryOp::AndMaybe,
        QueryOp::Filter,
        QueryOp::Near,
        QueryOp::Phrase,
    ];

    /// The operator name used in serialised and described queries.
    pub fn name(&self) -> &'static str {
        match self {
            QueryOp::And => "AND",
            QueryOp::Or => "OR",
            QueryOp::AndNot => "AND_NOT",
            QueryOp::Xor => "XOR",
            QueryOp::AndMaybe => "AND_MAYBE",
            QueryOp::Filter => "FILTER",
            QueryOp::Near => "NEAR",
            QueryOp::Phrase => "PHRASE",
        }
    }

    /// Whether the operator takes a position window.
    pub fn is_proximity(&self) -> bool {
        matches!(self, QueryOp::Near | QueryOp::Phrase)
    }

    /// Whether the operator can combine any number of subqueries.
    pub fn is_nary(&self) -> bool {
        matches!(
            self,
            QueryOp::And | QueryOp::Or | QueryOp::Near | QueryOp::Phrase
        )
    }

    /// Whether leaves with the same term under this operator may be merged.
    pub fn is_collapsible(&self) -> bool {
        matches!(self, QueryOp::And | QueryOp::Or)
    }
}

impl fmt::Display for QueryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryOp {
    type Err = LexicoreError;

    fn from_str(s: &str) -> Result<Self> {
        QueryOp::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LexicoreError::invalid_argument(format!("Unknown query operator: {s}")))
    }
}
