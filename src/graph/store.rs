//! In-memory property graph store
//!
//! Arena storage indexed by id, with adjacency lists per vertex and
//! label / edge-type indices. Ids are never reused, so a stale id can only
//! ever resolve to "not found".

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{Direction, EdgeId, EdgeType, Label, NodeId};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// In-memory graph storage
///
/// - nodes / edges: arenas indexed by id (slot 0 unused, ids start at 1)
/// - outgoing / incoming: adjacency lists per node
/// - label_index, edge_type_index: lookups by tag
#[derive(Debug)]
pub struct GraphStore {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    label_index: FxHashMap<Label, FxHashSet<NodeId>>,
    edge_type_index: FxHashMap<EdgeType, FxHashSet<EdgeId>>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            nodes: Vec::with_capacity(256),
            edges: Vec::with_capacity(1024),
            outgoing: Vec::with_capacity(256),
            incoming: Vec::with_capacity(256),
            label_index: FxHashMap::default(),
            edge_type_index: FxHashMap::default(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// Create a node with a single label and no properties
    pub fn create_node(&mut self, label: impl Into<Label>) -> NodeId {
        self.create_node_with_properties(vec![label.into()], PropertyMap::new())
    }

    /// Create a node with labels and properties
    pub fn create_node_with_properties(
        &mut self,
        labels: Vec<Label>,
        properties: PropertyMap,
    ) -> NodeId {
        let node_id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        let idx = node_id.index();

        for label in &labels {
            self.label_index.entry(label.clone()).or_default().insert(node_id);
        }

        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || None);
            self.outgoing.resize_with(idx + 1, Vec::new);
            self.incoming.resize_with(idx + 1, Vec::new);
        }
        self.nodes[idx] = Some(Node::new_with_properties(node_id, labels, properties));
        node_id
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable access to a node. Label changes made through this reference are
    /// not indexed; use [`GraphStore::add_label_to_node`] for that.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Set a property on a node, returning the previous value
    pub fn set_node_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let node = self.get_node_mut(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(node.set_property(key, value))
    }

    /// Add a label to an existing node and index it
    pub fn add_label_to_node(&mut self, node_id: NodeId, label: impl Into<Label>) -> GraphResult<()> {
        let label = label.into();
        let node = self.get_node_mut(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.add_label(label.clone());
        self.label_index.entry(label).or_default().insert(node_id);
        Ok(())
    }

    /// Delete a node and all its connected edges
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let idx = id.index();
        let node = self
            .nodes
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or(GraphError::NodeNotFound(id))?;

        for label in &node.labels {
            if let Some(node_set) = self.label_index.get_mut(label) {
                node_set.remove(&id);
            }
        }

        let outgoing_edges = std::mem::take(&mut self.outgoing[idx]);
        let incoming_edges = std::mem::take(&mut self.incoming[idx]);
        for edge_id in outgoing_edges.iter().chain(incoming_edges.iter()) {
            // a self-loop shows up in both lists
            let _ = self.delete_edge(*edge_id);
        }

        debug!(node = %id, "deleted node");
        Ok(node)
    }

    /// Create an edge between two existing nodes
    pub fn create_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
    ) -> GraphResult<EdgeId> {
        self.create_edge_with_properties(source, target, edge_type, PropertyMap::new())
    }

    /// Create an edge with properties
    pub fn create_edge_with_properties(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }

        let edge_id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        let idx = edge_id.index();

        let edge_type = edge_type.into();
        self.outgoing[source.index()].push(edge_id);
        self.incoming[target.index()].push(edge_id);
        self.edge_type_index.entry(edge_type.clone()).or_default().insert(edge_id);

        if idx >= self.edges.len() {
            self.edges.resize_with(idx + 1, || None);
        }
        self.edges[idx] = Some(Edge::new_with_properties(edge_id, source, target, edge_type, properties));
        Ok(edge_id)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.get_edge(id).is_some()
    }

    /// Set a property on an edge, returning the previous value
    pub fn set_edge_property(
        &mut self,
        edge_id: EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let edge = self.get_edge_mut(edge_id).ok_or(GraphError::EdgeNotFound(edge_id))?;
        Ok(edge.set_property(key, value))
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GraphError::EdgeNotFound(id))?;

        if let Some(edge_set) = self.edge_type_index.get_mut(&edge.edge_type) {
            edge_set.remove(&id);
        }
        if let Some(adj) = self.outgoing.get_mut(edge.source.index()) {
            adj.retain(|&eid| eid != id);
        }
        if let Some(adj) = self.incoming.get_mut(edge.target.index()) {
            adj.retain(|&eid| eid != id);
        }

        Ok(edge)
    }

    pub fn get_outgoing_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.resolve_edges(self.outgoing.get(node_id.index()))
    }

    pub fn get_incoming_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.resolve_edges(self.incoming.get(node_id.index()))
    }

    /// Edges incident to `node_id` in `direction` carrying `edge_type`.
    ///
    /// Order follows insertion but is not part of the contract. A self-loop
    /// is reported once for [`Direction::Both`].
    pub fn get_edges(
        &self,
        node_id: NodeId,
        direction: Direction,
        edge_type: &EdgeType,
    ) -> GraphResult<Vec<&Edge>> {
        if !self.has_node(node_id) {
            return Err(GraphError::NodeNotFound(node_id));
        }
        let mut edges = match direction {
            Direction::Outgoing => self.get_outgoing_edges(node_id),
            Direction::Incoming => self.get_incoming_edges(node_id),
            Direction::Both => {
                let mut all = self.get_outgoing_edges(node_id);
                all.extend(
                    self.get_incoming_edges(node_id)
                        .into_iter()
                        .filter(|edge| edge.source != node_id),
                );
                all
            }
        };
        edges.retain(|edge| &edge.edge_type == edge_type);
        Ok(edges)
    }

    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|&id| self.get_node(id)).collect())
            .unwrap_or_default()
    }

    pub fn get_edges_by_type(&self, edge_type: &EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(edge_type)
            .map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    fn resolve_edges(&self, ids: Option<&Vec<EdgeId>>) -> Vec<&Edge> {
        ids.map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_node() {
        let mut store = GraphStore::new();
        let node_id = store.create_node("component");

        assert_eq!(store.node_count(), 1);
        let node = store.get_node(node_id).unwrap();
        assert_eq!(node.id, node_id);
        assert!(node.has_label(&Label::new("component")));
    }

    #[test]
    fn test_edge_validation() {
        let mut store = GraphStore::new();
        let node = store.create_node("component");
        let missing = NodeId::new(999);

        assert_eq!(
            store.create_edge(missing, node, "testable"),
            Err(GraphError::InvalidEdgeSource(missing))
        );
        assert_eq!(
            store.create_edge(node, missing, "testable"),
            Err(GraphError::InvalidEdgeTarget(missing))
        );
    }

    #[test]
    fn test_get_edges_filters_direction_and_type() {
        let mut store = GraphStore::new();
        let component = store.create_node("component");
        let testable = store.create_node("testable");
        let test = store.create_node("testcase");

        store.create_edge(component, testable, "testable").unwrap();
        store.create_edge(test, testable, "covers").unwrap();
        store.create_edge(testable, component, "other").unwrap();

        let owners = store.get_edges(testable, Direction::Incoming, &EdgeType::new("testable")).unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].source, component);

        let outgoing = store.get_edges(testable, Direction::Outgoing, &EdgeType::new("testable")).unwrap();
        assert!(outgoing.is_empty());

        let both = store.get_edges(testable, Direction::Both, &EdgeType::new("other")).unwrap();
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn test_get_edges_on_missing_node() {
        let store = GraphStore::new();
        let result = store.get_edges(NodeId::new(3), Direction::Incoming, &EdgeType::new("testable"));
        assert_eq!(result.unwrap_err(), GraphError::NodeNotFound(NodeId::new(3)));
    }

    #[test]
    fn test_self_loop_reported_once_for_both() {
        let mut store = GraphStore::new();
        let node = store.create_node("component");
        store.create_edge(node, node, "child").unwrap();

        let edges = store.get_edges(node, Direction::Both, &EdgeType::new("child")).unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_delete_node_removes_edges() {
        let mut store = GraphStore::new();
        let a = store.create_node("component");
        let b = store.create_node("testable");
        store.create_edge(a, b, "testable").unwrap();
        store.create_edge(b, b, "child").unwrap();

        store.delete_node(b).unwrap();
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert!(store.get_outgoing_edges(a).is_empty());
        assert!(store.get_nodes_by_label(&Label::new("testable")).is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = GraphStore::new();
        let first = store.create_node("component");
        store.delete_node(first).unwrap();

        let second = store.create_node("component");
        assert_ne!(first, second);
        assert!(!store.has_node(first));
    }

    #[test]
    fn test_edge_property_update() {
        let mut store = GraphStore::new();
        let a = store.create_node("testcase");
        let b = store.create_node("testable");
        let edge = store.create_edge(a, b, "covers").unwrap();

        assert_eq!(store.set_edge_property(edge, "lines", 3i64).unwrap(), None);
        let previous = store.set_edge_property(edge, "lines", 4i64).unwrap();
        assert_eq!(previous, Some(PropertyValue::Integer(3)));

        store.delete_edge(edge).unwrap();
        assert_eq!(
            store.set_edge_property(edge, "lines", 5i64),
            Err(GraphError::EdgeNotFound(edge))
        );
    }

    #[test]
    fn test_label_and_type_indices() {
        let mut store = GraphStore::new();
        let a = store.create_node("component");
        let b = store.create_node("component");
        store.add_label_to_node(b, "testable").unwrap();
        store.create_edge(a, b, "child").unwrap();

        assert_eq!(store.get_nodes_by_label(&Label::new("component")).len(), 2);
        assert_eq!(store.get_nodes_by_label(&Label::new("testable")).len(), 1);
        assert_eq!(store.get_edges_by_type(&EdgeType::new("child")).len(), 1);
    }
}
