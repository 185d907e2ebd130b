//! Testgraph
//!
//! Typed views over a property graph of test and coverage data. Components,
//! testable units, test plans and test cases are stored as labeled vertices;
//! coverage is stored as `covers` edges carrying the covered line numbers.
//! The views read and write through to the shared graph store and check the
//! cardinality of every relationship they follow.
//!
//! # Layers
//!
//! - [`graph`]: in-memory property graph (nodes, edges, label/type indices)
//! - [`bean`]: view factory, base wrapper capability and traversal utility
//! - [`coverage`]: domain views (component, testable, test plan, test case)
//! - [`config`]: edge type names and label mapping, loadable from YAML
//!
//! ## Example Usage
//!
//! ```rust
//! use testgraph::bean::BeanGraph;
//! use testgraph::coverage::{MutableTestable, Testable, TestableVertex, TestCaseVertex};
//! use testgraph::graph::GraphStore;
//!
//! let mut store = GraphStore::new();
//! let file = store.create_node("component");
//! let unit = store.create_node("testable");
//! let test = store.create_node("testcase");
//! store.create_edge(file, unit, "testable").unwrap();
//!
//! let graph = BeanGraph::from_store(store);
//! let testable: TestableVertex = graph.wrap(unit).unwrap();
//! let test_case: TestCaseVertex = graph.wrap(test).unwrap();
//!
//! testable.add_coverage(&test_case, [12, 10, 12]).unwrap();
//!
//! assert_eq!(testable.covered_lines().unwrap().into_iter().collect::<Vec<_>>(), vec![10, 12]);
//! assert_eq!(testable.component().unwrap().id(), file);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod bean;
pub mod config;
pub mod coverage;
pub mod graph;

// Re-export main types for convenience
pub use graph::{
    Direction, Edge, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, Label, Node, NodeId,
    PropertyMap, PropertyValue,
};

pub use bean::{Bean, BeanEdge, BeanError, BeanGraph, BeanResult, BeanVertex, Element, SharedStore};

pub use config::{BeanKind, EdgeTypes, GraphSchema, SchemaError, SchemaResult};

pub use coverage::{
    AnyBean, Component, ComponentVertex, CoverageBlock, CoverageReport, MutableTestCase,
    MutableTestable, TestCase, TestCaseVertex, TestPlanVertex, TestStatus, Testable,
    TestableVertex,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
