//! Typed views over the property graph
//!
//! [`BeanGraph`] binds a view type to a graph element, the view keeps a
//! handle back to the factory and uses [`graph_util`] to navigate. Results of
//! a navigation are ids, re-wrapped through the same factory, so the object
//! graph is built on demand and never cached.

pub mod element;
pub mod error;
pub mod graph;
pub mod graph_util;

pub use element::{Bean, BeanBase, BeanEdge, BeanVertex, Element, ElementKind};
pub use error::{BeanError, BeanResult};
pub use graph::{BeanGraph, SharedStore};
