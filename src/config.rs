//! Graph schema configuration
//!
//! Names the edge types the domain views traverse and maps vertex labels to
//! view kinds. Defaults match the layout written by the coverage pipeline;
//! a YAML file can override any subset of it.

use crate::graph::{EdgeType, Label};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a schema
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid schema: {0}")]
    Invalid(String),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Domain view a vertex label stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeanKind {
    Component,
    Testable,
    TestCase,
    TestPlan,
}

/// Edge types of the five relationships the views navigate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeTypes {
    /// component → testable
    pub testable: EdgeType,
    /// component → test plan
    pub test_plan: EdgeType,
    /// test plan → test case
    pub test_case: EdgeType,
    /// test case → testable, carries the covered lines
    pub covers: EdgeType,
    /// parent component → child component
    pub child: EdgeType,
}

impl Default for EdgeTypes {
    fn default() -> Self {
        Self {
            testable: EdgeType::new("testable"),
            test_plan: EdgeType::new("testplan"),
            test_case: EdgeType::new("testcase"),
            covers: EdgeType::new("covers"),
            child: EdgeType::new("child"),
        }
    }
}

/// Mapping between the raw graph layout and the domain views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSchema {
    pub edges: EdgeTypes,

    /// Property of a covers edge holding the covered line numbers
    pub lines_key: String,

    /// Vertex label → view kind, used by label dispatch
    pub labels: BTreeMap<Label, BeanKind>,
}

impl Default for GraphSchema {
    fn default() -> Self {
        let labels = [
            ("component", BeanKind::Component),
            ("testable", BeanKind::Testable),
            ("testcase", BeanKind::TestCase),
            ("testplan", BeanKind::TestPlan),
        ]
        .into_iter()
        .map(|(label, kind)| (Label::new(label), kind))
        .collect();

        Self {
            edges: EdgeTypes::default(),
            lines_key: "lines".to_string(),
            labels,
        }
    }
}

impl GraphSchema {
    /// Parse and validate a YAML schema. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> SchemaResult<Self> {
        let schema: GraphSchema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load a YAML schema from disk
    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let schema = Self::from_yaml_str(&contents)?;
        info!("Loaded graph schema from {:?}", path);
        Ok(schema)
    }

    /// View kind registered for `label`
    pub fn kind_of(&self, label: &Label) -> Option<BeanKind> {
        self.labels.get(label).copied()
    }

    /// Edge types must be non-empty and pairwise distinct, otherwise two
    /// relationships would be indistinguishable in the graph.
    pub fn validate(&self) -> SchemaResult<()> {
        let edges = &self.edges;
        let all = [
            &edges.testable,
            &edges.test_plan,
            &edges.test_case,
            &edges.covers,
            &edges.child,
        ];
        if all.iter().any(|edge_type| edge_type.as_str().is_empty()) {
            return Err(SchemaError::Invalid("edge types must not be empty".to_string()));
        }
        let distinct: BTreeSet<&str> = all.iter().map(|edge_type| edge_type.as_str()).collect();
        if distinct.len() != all.len() {
            return Err(SchemaError::Invalid("edge types must be distinct".to_string()));
        }
        if self.lines_key.is_empty() {
            return Err(SchemaError::Invalid("lines_key must not be empty".to_string()));
        }
        Ok(())
    }
}
