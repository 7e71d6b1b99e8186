//! The query object.

use std::fmt;
use std::mem;
use std::ptr;

use log::debug;
use parking_lot::RwLock;

use crate::error::{LexicoreError, Result};
use crate::query::node::QueryNode;
use crate::query::op::QueryOp;
use crate::query::serialise;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryState {
    pub(crate) root: Option<QueryNode>,
    pub(crate) is_bool: bool,
    /// Explicit query length; when unset the length is the sum of leaf wqfs.
    pub(crate) length: Option<u32>,
}

impl QueryState {
    fn root(&self) -> Result<&QueryNode> {
        self.root.as_ref().ok_or_else(undefined)
    }

    fn root_mut(&mut self) -> Result<&mut QueryNode> {
        self.root.as_mut().ok_or_else(undefined)
    }

    pub(crate) fn length(&self) -> u32 {
        match (self.length, &self.root) {
            (Some(length), _) => length,
            (None, Some(root)) => root.total_wqf(),
            (None, None) => 0,
        }
    }
}

fn undefined() -> LexicoreError {
    LexicoreError::invalid_state("Query is undefined")
}

/// A structured boolean/proximity query.
///
/// A query is either undefined (the default) or owns a tree of
/// [`QueryNode`]s. Composition always copies its inputs, so the queries a
/// composite was built from are never changed by it.
///
/// The state sits behind a reader/writer lock: reads such as
/// [`Query::serialise`] share it, while [`Query::assign_from`],
/// [`Query::collapse_subqs`], [`Query::set_length`] and [`Query::set_bool`]
/// take it exclusively.
pub struct Query {
    pub(crate) state: RwLock<QueryState>,
}

impl Query {
    /// Create an undefined query.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_root(root: QueryNode) -> Self {
        Query {
            state: RwLock::new(QueryState {
                root: Some(root),
                ..QueryState::default()
            }),
        }
    }

    /// A single term with wqf 1 and no position.
    pub fn term(term: impl Into<String>) -> Self {
        Self::leaf(term, 1, 0)
    }

    /// A single term with an explicit wqf and position.
    pub fn leaf(term: impl Into<String>, wqf: u32, position: u32) -> Self {
        Self::from_root(QueryNode::leaf(term, wqf, position))
    }

    /// Combine two queries with any operator.
    ///
    /// Both sides must be defined. Proximity operators get a window of 2.
    pub fn binary(op: QueryOp, left: &Query, right: &Query) -> Result<Self> {
        let (Some(left), Some(right)) = (left.root_node_cloned(), right.root_node_cloned()) else {
            return Err(LexicoreError::invalid_argument(format!(
                "{op} needs two defined subqueries"
            )));
        };
        Ok(Self::from_root(build_operator(op, 0, vec![left, right])))
    }

    /// Combine any number of queries with `AND`, `OR`, `NEAR` or `PHRASE`.
    ///
    /// Undefined subqueries are ignored; if none remain the result is
    /// undefined and if one remains it is returned unchanged. For proximity
    /// operators a `window` of 0 means the number of subqueries.
    pub fn nary<'a, I>(op: QueryOp, subqueries: I, window: u32) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Query>,
    {
        check_nary(op, window)?;
        let children: Vec<QueryNode> = subqueries
            .into_iter()
            .filter_map(Query::root_node_cloned)
            .collect();
        Ok(Self::combine(op, window, children))
    }

    /// Combine bare terms; each becomes a leaf whose position is its 1-based
    /// index in `terms`.
    pub fn from_terms<I, S>(op: QueryOp, terms: I, window: u32) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_nary(op, window)?;
        let children: Vec<QueryNode> = terms
            .into_iter()
            .zip(1u32..)
            .map(|(term, position)| QueryNode::leaf(term, 1, position))
            .collect();
        Ok(Self::combine(op, window, children))
    }

    fn combine(op: QueryOp, window: u32, mut children: Vec<QueryNode>) -> Self {
        match children.len() {
            0 => Self::new(),
            1 => Self::from_root(children.remove(0)),
            _ => Self::from_root(build_operator(op, window, children)),
        }
    }

    /// Reconstruct a query from [`Query::serialise`] output.
    pub fn unserialise(serialised: &str) -> Result<Self> {
        let parsed = serialise::unserialise(serialised)?;
        debug!(
            "unserialised query with {} leaves",
            parsed.root.leaf_count()
        );
        Ok(Query {
            state: RwLock::new(QueryState {
                root: Some(parsed.root),
                is_bool: parsed.is_bool,
                length: parsed.length,
            }),
        })
    }

    /// Whether the query has a tree.
    pub fn is_defined(&self) -> bool {
        self.state.read().root.is_some()
    }

    /// Whether the query is to be matched as pure boolean.
    pub fn is_bool(&self) -> bool {
        self.state.read().is_bool
    }

    /// The query length: the explicit value if one was set, otherwise the sum
    /// of the leaves' within-query frequencies. 0 for an undefined query.
    pub fn length(&self) -> u32 {
        self.state.read().length()
    }

    /// Set the pure-boolean flag, returning the previous value.
    pub fn set_bool(&self, is_bool: bool) -> Result<bool> {
        let mut state = self.state.write();
        state.root()?;
        Ok(mem::replace(&mut state.is_bool, is_bool))
    }

    /// Set an explicit query length, returning the previous length.
    pub fn set_length(&self, length: u32) -> Result<u32> {
        let mut state = self.state.write();
        state.root()?;
        let previous = state.length();
        state.length = Some(length);
        Ok(previous)
    }

    /// Merge leaves naming the same term that share an `AND` or `OR` parent,
    /// summing their wqfs.
    pub fn collapse_subqs(&self) -> Result<()> {
        self.state.write().root_mut()?.collapse();
        Ok(())
    }

    /// A copy of the tree, if the query is defined.
    pub fn root_node_cloned(&self) -> Option<QueryNode> {
        self.state.read().root.clone()
    }

    /// Every `(term, position)` pair in the tree, ordered by position then
    /// term, without duplicates.
    pub fn get_terms(&self) -> Vec<(String, u32)> {
        let mut terms = Vec::new();
        if let Some(root) = &self.state.read().root {
            root.collect_terms(&mut terms);
        }
        terms.sort_by(|(a_term, a_pos), (b_term, b_pos)| {
            a_pos.cmp(b_pos).then_with(|| a_term.cmp(b_term))
        });
        terms.dedup();
        terms
    }

    /// The reversible text form of the query.
    pub fn serialise(&self) -> Result<String> {
        let state = self.state.read();
        Ok(serialise::serialise(
            state.root()?,
            state.is_bool,
            state.length,
        ))
    }

    /// A human-readable rendering, e.g. `Query((cat@1 AND dog@2))`.
    pub fn get_description(&self) -> String {
        match &self.state.read().root {
            Some(root) => format!("Query({})", serialise::describe(root)),
            None => "Query()".to_string(),
        }
    }

    /// Replace this query with a copy of `source`.
    ///
    /// The copy is taken before this query is locked, so readers see either
    /// the old tree or the new one.
    pub fn assign_from(&self, source: &Query) {
        if ptr::eq(self, source) {
            return;
        }
        let replacement = source.state.read().clone();
        let previous = mem::replace(&mut *self.state.write(), replacement);
        drop(previous);
    }
}

fn check_nary(op: QueryOp, window: u32) -> Result<()> {
    if !op.is_nary() {
        return Err(LexicoreError::invalid_argument(format!(
            "{op} cannot combine an arbitrary number of subqueries"
        )));
    }
    if window != 0 && !op.is_proximity() {
        return Err(LexicoreError::invalid_argument(format!(
            "{op} does not take a window"
        )));
    }
    Ok(())
}

/// Build an operator node, flattening nested `AND`s into `AND` and `OR`s into
/// `OR`, and defaulting a proximity window to the number of children.
fn build_operator(op: QueryOp, window: u32, children: Vec<QueryNode>) -> QueryNode {
    let mut flattened = Vec::with_capacity(children.len());
    for child in children {
        match child {
            QueryNode::Operator {
                op: child_op,
                children: grandchildren,
                ..
            } if child_op == op && op.is_collapsible() => flattened.extend(grandchildren),
            other => flattened.push(other),
        }
    }

    let window = match (op.is_proximity(), window) {
        (true, 0) => flattened.len() as u32,
        (true, window) => window,
        (false, _) => 0,
    };

    QueryNode::Operator {
        op,
        window,
        children: flattened,
    }
}

impl Default for Query {
    fn default() -> Self {
        Query {
            state: RwLock::new(QueryState::default()),
        }
    }
}

impl Clone for Query {
    fn clone(&self) -> Self {
        Query {
            state: RwLock::new(self.state.read().clone()),
        }
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Query")
            .field("root", &state.root)
            .field("is_bool", &state.is_bool)
            .field("length", &state.length)
            .finish()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_query() {
        let query = Query::new();
        assert!(!query.is_defined());
        assert_eq!(query.length(), 0);
        assert!(query.get_terms().is_empty());
        assert_eq!(query.get_description(), "Query()");
        assert!(query.serialise().unwrap_err().is_invalid_state());
        assert!(query.collapse_subqs().unwrap_err().is_invalid_state());
        assert!(query.set_bool(true).unwrap_err().is_invalid_state());
        assert!(query.set_length(3).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_from_terms_positions() {
        let query = Query::from_terms(QueryOp::And, ["cat", "dog"], 0).unwrap();
        assert_eq!(query.get_description(), "Query((cat@1 AND dog@2))");
        assert_eq!(
            query.get_terms(),
            vec![("cat".to_string(), 1), ("dog".to_string(), 2)]
        );
        assert_eq!(query.length(), 2);
    }

    #[test]
    fn test_nary_rejects_operator_and_window() {
        let a = Query::term("a");
        let err = Query::nary(QueryOp::AndNot, [&a, &a], 0).unwrap_err();
        assert!(err.is_invalid_argument());
        let err = Query::nary(QueryOp::And, [&a, &a], 3).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_nary_skips_undefined() {
        let a = Query::term("a");
        let undefined = Query::new();

        let none = Query::nary(QueryOp::Or, [&undefined, &undefined], 0).unwrap();
        assert!(!none.is_defined());

        let one = Query::nary(QueryOp::Or, [&undefined, &a], 0).unwrap();
        assert_eq!(one.serialise().unwrap(), a.serialise().unwrap());
    }

    #[test]
    fn test_nary_flattens_same_operator() {
        let inner = Query::from_terms(QueryOp::And, ["a", "b"], 0).unwrap();
        let outer = Query::nary(QueryOp::And, [&inner, &Query::term("c")], 0).unwrap();
        assert_eq!(outer.root_node_cloned().unwrap().children().len(), 3);

        let mixed = Query::nary(QueryOp::Or, [&inner, &Query::term("c")], 0).unwrap();
        assert_eq!(mixed.root_node_cloned().unwrap().children().len(), 2);
    }

    #[test]
    fn test_proximity_window_defaults_to_child_count() {
        let near = Query::from_terms(QueryOp::Near, ["a", "b", "c"], 0).unwrap();
        assert!(matches!(
            near.root_node_cloned(),
            Some(QueryNode::Operator { window: 3, .. })
        ));
        let phrase = Query::from_terms(QueryOp::Phrase, ["a", "b"], 5).unwrap();
        assert!(matches!(
            phrase.root_node_cloned(),
            Some(QueryNode::Operator { window: 5, .. })
        ));
    }

    #[test]
    fn test_binary_requires_defined_sides() {
        let a = Query::term("a");
        let err = Query::binary(QueryOp::AndNot, &a, &Query::new()).unwrap_err();
        assert!(err.is_invalid_argument());

        let query = Query::binary(QueryOp::AndMaybe, &a, &Query::term("b")).unwrap();
        assert_eq!(query.get_description(), "Query((a AND_MAYBE b))");
    }

    #[test]
    fn test_set_length_and_bool() {
        let query = Query::from_terms(QueryOp::Or, ["a", "b", "c"], 0).unwrap();
        assert_eq!(query.set_length(10).unwrap(), 3);
        assert_eq!(query.set_length(4).unwrap(), 10);
        assert_eq!(query.length(), 4);

        assert!(!query.set_bool(true).unwrap());
        assert!(query.is_bool());
        assert_eq!(query.serialise().unwrap(), "QBL4:(OR[1:a@1#1[1:b@2#1[1:c@3#1)");
    }

    #[test]
    fn test_assign_from() {
        let target = Query::term("old");
        let source = Query::from_terms(QueryOp::Or, ["x", "y"], 0).unwrap();
        target.assign_from(&source);
        assert_eq!(target.serialise().unwrap(), source.serialise().unwrap());

        // The copy is independent of its source.
        source.set_length(9).unwrap();
        assert_eq!(target.length(), 2);

        target.assign_from(&target);
        assert_eq!(target.length(), 2);
    }
}
