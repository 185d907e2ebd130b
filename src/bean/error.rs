//! Errors raised by the bean layer

use super::element::Element;
use crate::graph::{Direction, EdgeType, GraphError, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeanError {
    /// A cardinality invariant of the graph does not hold: the persisted
    /// data is inconsistent.
    #[error("Integrity violation on {node}: expected {expected} {direction} '{edge_type}' edge, found {found}")]
    Integrity {
        node: NodeId,
        direction: Direction,
        edge_type: EdgeType,
        expected: &'static str,
        found: usize,
    },

    /// A property the views depend on is missing or has the wrong shape.
    #[error("Malformed property '{key}' on {element}: {reason}")]
    MalformedProperty {
        element: Element,
        key: String,
        reason: String,
    },

    /// A view type cannot be bound to the requested element.
    #[error("Cannot bind {bean} to {element}: {reason}")]
    Configuration {
        bean: &'static str,
        element: Element,
        reason: String,
    },

    /// Store errors pass through untouched.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl BeanError {
    /// Whether the error denotes inconsistent data rather than a
    /// programming or store error
    pub fn is_integrity(&self) -> bool {
        matches!(self, BeanError::Integrity { .. } | BeanError::MalformedProperty { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, BeanError::Configuration { .. })
    }

    pub(crate) fn malformed(element: impl Into<Element>, key: &str, reason: impl Into<String>) -> Self {
        BeanError::MalformedProperty {
            element: element.into(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

pub type BeanResult<T> = Result<T, BeanError>;
