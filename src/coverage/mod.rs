//! Domain views of the test and coverage graph
//!
//! ```text
//!  component ──testable──▶ testable ◀──covers{lines}── testcase
//!      │                                                  ▲
//!      ├──testplan──▶ testplan ──testcase─────────────────┘
//!      └──child──▶ component
//! ```

pub mod block;
pub mod component;
pub mod report;
pub mod test_case;
pub mod test_plan;
pub mod testable;

pub use block::CoverageBlock;
pub use component::{Component, ComponentVertex};
pub use report::{CoverageReport, TestCaseSummary};
pub use test_case::{MutableTestCase, TestCase, TestCaseVertex, TestStatus};
pub use test_plan::TestPlanVertex;
pub use testable::{MutableTestable, Testable, TestableVertex};

use crate::bean::{BeanError, BeanGraph, BeanResult, BeanVertex, Element};
use crate::config::BeanKind;
use crate::graph::NodeId;

/// A view picked from the vertex label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyBean {
    Component(ComponentVertex),
    Testable(TestableVertex),
    TestCase(TestCaseVertex),
    TestPlan(TestPlanVertex),
}

impl AnyBean {
    /// Wrap `node` as the view its label is registered for in the schema.
    /// Labels are tried in sorted order; the first registered one wins.
    pub fn wrap(graph: &BeanGraph, node: NodeId) -> BeanResult<Self> {
        let labels = BeanVertex::new(node, graph.clone()).labels()?;

        let kind = labels
            .iter()
            .find_map(|label| graph.schema().kind_of(label))
            .ok_or_else(|| BeanError::Configuration {
                bean: "AnyBean",
                element: Element::Vertex(node),
                reason: format!(
                    "no view registered for labels [{}]",
                    labels.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", ")
                ),
            })?;

        Ok(match kind {
            BeanKind::Component => AnyBean::Component(graph.bind(node)?),
            BeanKind::Testable => AnyBean::Testable(graph.bind(node)?),
            BeanKind::TestCase => AnyBean::TestCase(graph.bind(node)?),
            BeanKind::TestPlan => AnyBean::TestPlan(graph.bind(node)?),
        })
    }

    pub fn kind(&self) -> BeanKind {
        match self {
            AnyBean::Component(_) => BeanKind::Component,
            AnyBean::Testable(_) => BeanKind::Testable,
            AnyBean::TestCase(_) => BeanKind::TestCase,
            AnyBean::TestPlan(_) => BeanKind::TestPlan,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            AnyBean::Component(view) => view.id(),
            AnyBean::Testable(view) => view.id(),
            AnyBean::TestCase(view) => view.id(),
            AnyBean::TestPlan(view) => view.id(),
        }
    }
}
