//! Read access to a query for the match engine.

use parking_lot::{MappedRwLockReadGuard, RwLockReadGuard};

use crate::error::{LexicoreError, Result};
use crate::query::node::QueryNode;
use crate::query::query::Query;

/// What the match engine needs from a query, and nothing more.
pub trait MatchAccess {
    /// The root of the query tree, read-locked for as long as the guard lives.
    ///
    /// Fails with an invalid-state error if the query is undefined.
    fn root_node(&self) -> Result<MappedRwLockReadGuard<'_, QueryNode>>;

    /// Whether to match as pure boolean, ignoring weights.
    fn is_bool(&self) -> bool;

    /// The query length used to normalise weights.
    fn length(&self) -> u32;
}

impl MatchAccess for Query {
    fn root_node(&self) -> Result<MappedRwLockReadGuard<'_, QueryNode>> {
        RwLockReadGuard::try_map(self.state.read(), |state| state.root.as_ref()).map_err(|_| {
            LexicoreError::invalid_state("Cannot match an undefined query")
        })
    }

    fn is_bool(&self) -> bool {
        Query::is_bool(self)
    }

    fn length(&self) -> u32 {
        Query::length(self)
    }
}
