//! Base wrapper capability shared by every typed view
//!
//! A view owns one [`BeanVertex`] or [`BeanEdge`]: the backing element id plus
//! the [`BeanGraph`] that produced it. Everything a view knows how to do is
//! built from the helpers here.

use super::error::{BeanError, BeanResult};
use super::graph::BeanGraph;
use super::graph_util;
use crate::graph::{Direction, EdgeId, EdgeType, GraphError, Label, NodeId, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Raw graph element a view is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Vertex(NodeId),
    Edge(EdgeId),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Vertex(_) => ElementKind::Vertex,
            Element::Edge(_) => ElementKind::Edge,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Vertex(id) => write!(f, "vertex {}", id),
            Element::Edge(id) => write!(f, "edge {}", id),
        }
    }
}

impl From<NodeId> for Element {
    fn from(id: NodeId) -> Self {
        Element::Vertex(id)
    }
}

impl From<EdgeId> for Element {
    fn from(id: EdgeId) -> Self {
        Element::Edge(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => f.write_str("vertex"),
            ElementKind::Edge => f.write_str("edge"),
        }
    }
}

/// Base a view embeds: [`BeanVertex`] or [`BeanEdge`].
pub trait BeanBase: Clone + Sized {
    const KIND: ElementKind;

    /// `None` when `element` is not of kind [`Self::KIND`]
    fn from_element(element: Element, graph: BeanGraph) -> Option<Self>;

    fn element(&self) -> Element;

    fn bean_graph(&self) -> &BeanGraph;
}

/// A typed view over one graph element.
///
/// `from_base` is the injection point [`BeanGraph::wrap`] binds through.
pub trait Bean: Sized {
    type Base: BeanBase;

    fn from_base(base: Self::Base) -> Self;

    fn base(&self) -> &Self::Base;

    /// The backing element, exactly as it was handed to the factory
    fn element(&self) -> Element {
        self.base().element()
    }

    /// The factory this view was produced by
    fn bean_graph(&self) -> &BeanGraph {
        self.base().bean_graph()
    }
}

/// Vertex half of the base capability.
///
/// Equality and hashing use the node id only.
#[derive(Clone)]
pub struct BeanVertex {
    id: NodeId,
    graph: BeanGraph,
}

impl BeanBase for BeanVertex {
    const KIND: ElementKind = ElementKind::Vertex;

    fn from_element(element: Element, graph: BeanGraph) -> Option<Self> {
        match element {
            Element::Vertex(id) => Some(BeanVertex::new(id, graph)),
            Element::Edge(_) => None,
        }
    }

    fn element(&self) -> Element {
        Element::Vertex(self.id)
    }

    fn bean_graph(&self) -> &BeanGraph {
        &self.graph
    }
}

impl BeanVertex {
    pub(crate) fn new(id: NodeId, graph: BeanGraph) -> Self {
        BeanVertex { id, graph }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn labels(&self) -> BeanResult<Vec<Label>> {
        let store = self.graph.read();
        let node = store.get_node(self.id).ok_or(GraphError::NodeNotFound(self.id))?;
        Ok(node.sorted_labels().into_iter().cloned().collect())
    }

    /// A copy of the property under `key`, if set
    pub fn property(&self, key: &str) -> BeanResult<Option<PropertyValue>> {
        let store = self.graph.read();
        let node = store.get_node(self.id).ok_or(GraphError::NodeNotFound(self.id))?;
        Ok(node.get_property(key).cloned())
    }

    pub fn string_property(&self, key: &str) -> BeanResult<Option<String>> {
        match self.property(key)? {
            Some(value) if !value.is_null() => value.as_string().map(|s| Some(s.to_string())).ok_or_else(|| {
                BeanError::malformed(self.id, key, format!("expected String, found {}", value.type_name()))
            }),
            _ => Ok(None),
        }
    }

    /// Like [`BeanVertex::string_property`] but absence is an integrity error
    pub fn required_string(&self, key: &str) -> BeanResult<String> {
        self.string_property(key)?
            .ok_or_else(|| BeanError::malformed(self.id, key, "missing"))
    }

    pub fn integer_property(&self, key: &str) -> BeanResult<Option<i64>> {
        match self.property(key)? {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(PropertyValue::Integer(i)) => Ok(Some(i)),
            Some(other) => Err(BeanError::malformed(
                self.id,
                key,
                format!("expected Integer, found {}", other.type_name()),
            )),
        }
    }

    /// Write through to the store immediately
    pub fn set_property(&self, key: &str, value: impl Into<PropertyValue>) -> BeanResult<()> {
        self.graph.write().set_node_property(self.id, key, value)?;
        Ok(())
    }

    /// The one neighbor over `edge_type`, wrapped as `T`
    pub fn single_adjacent<T: Bean>(&self, direction: Direction, edge_type: &EdgeType) -> BeanResult<T> {
        let id = graph_util::single_adjacent(&self.graph.read(), self.id, direction, edge_type)?;
        self.graph.bind(id)
    }

    pub fn optional_adjacent<T: Bean>(
        &self,
        direction: Direction,
        edge_type: &EdgeType,
    ) -> BeanResult<Option<T>> {
        let id = graph_util::optional_adjacent(&self.graph.read(), self.id, direction, edge_type)?;
        id.map(|id| self.graph.bind(id)).transpose()
    }

    /// Distinct neighbors over `edge_type`, in id order
    pub fn adjacents<T: Bean>(&self, direction: Direction, edge_type: &EdgeType) -> BeanResult<Vec<T>> {
        let ids: BTreeSet<NodeId> = graph_util::adjacents(&self.graph.read(), self.id, direction, edge_type)?
            .into_iter()
            .collect();
        self.graph.bind_all(ids)
    }

    /// Incident edges over `edge_type` wrapped as edge views, in id order
    pub fn edges<T: Bean>(&self, direction: Direction, edge_type: &EdgeType) -> BeanResult<Vec<T>> {
        let ids: BTreeSet<EdgeId> = graph_util::adjacent_edges(&self.graph.read(), self.id, direction, edge_type)?
            .into_iter()
            .map(|edge| edge.id)
            .collect();
        self.graph.bind_all(ids)
    }
}

impl PartialEq for BeanVertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanVertex {}

impl Hash for BeanVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BeanVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeanVertex").field(&self.id).finish()
    }
}

/// Edge half of the base capability.
///
/// Equality and hashing use the edge id only.
#[derive(Clone)]
pub struct BeanEdge {
    id: EdgeId,
    graph: BeanGraph,
}

impl BeanBase for BeanEdge {
    const KIND: ElementKind = ElementKind::Edge;

    fn from_element(element: Element, graph: BeanGraph) -> Option<Self> {
        match element {
            Element::Edge(id) => Some(BeanEdge { id, graph }),
            Element::Vertex(_) => None,
        }
    }

    fn element(&self) -> Element {
        Element::Edge(self.id)
    }

    fn bean_graph(&self) -> &BeanGraph {
        &self.graph
    }
}

impl BeanEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// `(source, target)` of the backing edge
    pub fn endpoints(&self) -> BeanResult<(NodeId, NodeId)> {
        let store = self.graph.read();
        let edge = store.get_edge(self.id).ok_or(GraphError::EdgeNotFound(self.id))?;
        Ok((edge.source, edge.target))
    }

    pub fn source<T: Bean>(&self) -> BeanResult<T> {
        let (source, _) = self.endpoints()?;
        self.graph.bind(source)
    }

    pub fn target<T: Bean>(&self) -> BeanResult<T> {
        let (_, target) = self.endpoints()?;
        self.graph.bind(target)
    }

    pub fn property(&self, key: &str) -> BeanResult<Option<PropertyValue>> {
        let store = self.graph.read();
        let edge = store.get_edge(self.id).ok_or(GraphError::EdgeNotFound(self.id))?;
        Ok(edge.get_property(key).cloned())
    }
}

impl PartialEq for BeanEdge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanEdge {}

impl Hash for BeanEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BeanEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeanEdge").field(&self.id).finish()
    }
}
