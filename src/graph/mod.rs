//! Property graph the bean layer is mapped onto
//!
//! Vertices carry labels and properties, edges are directed, typed and carry
//! properties of their own. Several edges may join the same pair of vertices.

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStore};
pub use types::{Direction, EdgeId, EdgeType, Label, NodeId};
