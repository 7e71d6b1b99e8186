//! Query trees.
//!
//! A [`Query`] owns a tree of [`QueryNode`]s: term leaves combined by
//! boolean and proximity [`QueryOp`]s. Queries can be collapsed, serialised
//! to a reversible text form and handed to a match engine through
//! [`MatchAccess`].

pub mod access;
pub mod node;
pub mod op;
#[allow(clippy::module_inception)]
pub mod query;
mod serialise;

pub use self::access::MatchAccess;
pub use self::node::QueryNode;
pub use self::op::QueryOp;
pub use self::query::Query;
pub use self::serialise::MAX_NESTING;
