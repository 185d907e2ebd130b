//! Traversal helpers with explicit cardinality contracts
//!
//! Pure reads over a [`GraphStore`]. A 1:1 relationship that yields zero or
//! several neighbors is corrupted data and fails with
//! [`BeanError::Integrity`]; it is never reported as "not found".
//! Multi-neighbor results come back in no particular order.

use super::error::{BeanError, BeanResult};
use crate::graph::{Direction, Edge, EdgeType, GraphStore, NodeId};
use tracing::warn;

/// Edges incident to `node` in `direction` carrying `edge_type`
pub fn adjacent_edges<'a>(
    store: &'a GraphStore,
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
) -> BeanResult<Vec<&'a Edge>> {
    Ok(store.get_edges(node, direction, edge_type)?)
}

/// Neighbors reached over `edge_type`, one per matching edge
pub fn adjacents(
    store: &GraphStore,
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
) -> BeanResult<Vec<NodeId>> {
    Ok(adjacent_edges(store, node, direction, edge_type)?
        .into_iter()
        .map(|edge| edge.other_end(node))
        .collect())
}

/// The only matching edge. Zero or several is an integrity error.
pub fn single_edge<'a>(
    store: &'a GraphStore,
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
) -> BeanResult<&'a Edge> {
    match adjacent_edges(store, node, direction, edge_type)?.as_slice() {
        [edge] => Ok(*edge),
        edges => Err(violation(node, direction, edge_type, "exactly one", edges.len())),
    }
}

/// At most one matching edge. Several is an integrity error.
pub fn optional_edge<'a>(
    store: &'a GraphStore,
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
) -> BeanResult<Option<&'a Edge>> {
    match adjacent_edges(store, node, direction, edge_type)?.as_slice() {
        [] => Ok(None),
        [edge] => Ok(Some(*edge)),
        edges => Err(violation(node, direction, edge_type, "at most one", edges.len())),
    }
}

/// The neighbor across the only matching edge
pub fn single_adjacent(
    store: &GraphStore,
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
) -> BeanResult<NodeId> {
    single_edge(store, node, direction, edge_type).map(|edge| edge.other_end(node))
}

pub fn optional_adjacent(
    store: &GraphStore,
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
) -> BeanResult<Option<NodeId>> {
    Ok(optional_edge(store, node, direction, edge_type)?.map(|edge| edge.other_end(node)))
}

fn violation(
    node: NodeId,
    direction: Direction,
    edge_type: &EdgeType,
    expected: &'static str,
    found: usize,
) -> BeanError {
    warn!(%node, %direction, %edge_type, found, "cardinality violation, expected {}", expected);
    BeanError::Integrity {
        node,
        direction,
        edge_type: edge_type.clone(),
        expected,
        found,
    }
}
