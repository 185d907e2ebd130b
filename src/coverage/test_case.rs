//! Executed tests

use super::block::{parse_lines, CoverageBlock};
use super::test_plan::TestPlanVertex;
use super::testable::{MutableTestable, TestableVertex};
use crate::bean::{graph_util, Bean, BeanError, BeanResult, BeanVertex, Element};
use crate::graph::{Direction, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const STATUS: &str = "status";
pub const DURATION_MS: &str = "duration_ms";
pub const MESSAGE: &str = "message";
pub const STACK_TRACE: &str = "stack_trace";

/// Outcome of a test execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Ok,
    Error,
    Failure,
    Skipped,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Ok => "ok",
            TestStatus::Error => "error",
            TestStatus::Failure => "failure",
            TestStatus::Skipped => "skipped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ok" => Some(TestStatus::Ok),
            "error" => Some(TestStatus::Error),
            "failure" => Some(TestStatus::Failure),
            "skipped" => Some(TestStatus::Skipped),
            _ => None,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait TestCase {
    fn name(&self) -> BeanResult<String>;

    /// e.g. `unit` or `integration`
    fn test_type(&self) -> BeanResult<Option<String>>;

    fn status(&self) -> BeanResult<Option<TestStatus>>;

    fn duration_ms(&self) -> BeanResult<Option<u64>>;

    fn message(&self) -> BeanResult<Option<String>>;

    fn stack_trace(&self) -> BeanResult<Option<String>>;

    /// The plan this test belongs to, over the single inbound test-case edge
    fn test_plan(&self) -> BeanResult<TestPlanVertex>;

    fn covered_testables(&self) -> BeanResult<Vec<TestableVertex>>;

    fn coverage_blocks(&self) -> BeanResult<Vec<CoverageBlock>>;

    fn covered_lines_of(&self, testable: &TestableVertex) -> BeanResult<BTreeSet<u32>>;

    fn covers(&self, testable: &TestableVertex, line: u32) -> BeanResult<bool> {
        Ok(self.covered_lines_of(testable)?.contains(&line))
    }

    /// Distinct covered lines summed over all testables
    fn count_covered_lines(&self) -> BeanResult<usize>;
}

pub trait MutableTestCase: TestCase {
    fn set_status(&self, status: TestStatus) -> BeanResult<()>;

    fn set_duration_ms(&self, duration_ms: u64) -> BeanResult<()>;

    fn set_message(&self, message: &str) -> BeanResult<()>;

    fn set_stack_trace(&self, stack_trace: &str) -> BeanResult<()>;

    fn set_test_type(&self, test_type: &str) -> BeanResult<()>;

    fn cover_lines(
        &self,
        testable: &TestableVertex,
        lines: impl IntoIterator<Item = u32>,
    ) -> BeanResult<CoverageBlock>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCaseVertex {
    base: BeanVertex,
}

impl Bean for TestCaseVertex {
    type Base = BeanVertex;

    fn from_base(base: BeanVertex) -> Self {
        TestCaseVertex { base }
    }

    fn base(&self) -> &BeanVertex {
        &self.base
    }
}

impl TestCaseVertex {
    pub fn id(&self) -> NodeId {
        self.base.id()
    }

    /// testable → lines, merged across duplicate edges
    fn coverage(&self) -> BeanResult<BTreeMap<NodeId, BTreeSet<u32>>> {
        let schema = self.bean_graph().schema();
        let store = self.bean_graph().read();
        let edges = graph_util::adjacent_edges(&store, self.id(), Direction::Outgoing, &schema.edges.covers)?;

        let mut coverage: BTreeMap<NodeId, BTreeSet<u32>> = BTreeMap::new();
        for edge in edges {
            let lines = parse_lines(Element::Edge(edge.id), &schema.lines_key, edge.get_property(&schema.lines_key))?;
            coverage.entry(edge.target).or_default().extend(lines);
        }
        Ok(coverage)
    }
}

impl TestCase for TestCaseVertex {
    fn name(&self) -> BeanResult<String> {
        self.base.required_string(NAME)
    }

    fn test_type(&self) -> BeanResult<Option<String>> {
        self.base.string_property(TYPE)
    }

    fn status(&self) -> BeanResult<Option<TestStatus>> {
        match self.base.string_property(STATUS)? {
            None => Ok(None),
            Some(value) => TestStatus::parse(&value)
                .map(Some)
                .ok_or_else(|| BeanError::malformed(self.id(), STATUS, format!("unknown status '{}'", value))),
        }
    }

    fn duration_ms(&self) -> BeanResult<Option<u64>> {
        self.base
            .integer_property(DURATION_MS)?
            .map(|duration| {
                u64::try_from(duration)
                    .map_err(|_| BeanError::malformed(self.id(), DURATION_MS, format!("negative duration {}", duration)))
            })
            .transpose()
    }

    fn message(&self) -> BeanResult<Option<String>> {
        self.base.string_property(MESSAGE)
    }

    fn stack_trace(&self) -> BeanResult<Option<String>> {
        self.base.string_property(STACK_TRACE)
    }

    fn test_plan(&self) -> BeanResult<TestPlanVertex> {
        let test_case = &self.bean_graph().schema().edges.test_case;
        self.base.single_adjacent(Direction::Incoming, test_case)
    }

    fn covered_testables(&self) -> BeanResult<Vec<TestableVertex>> {
        let covers = &self.bean_graph().schema().edges.covers;
        self.base.adjacents(Direction::Outgoing, covers)
    }

    fn coverage_blocks(&self) -> BeanResult<Vec<CoverageBlock>> {
        let covers = &self.bean_graph().schema().edges.covers;
        self.base.edges(Direction::Outgoing, covers)
    }

    fn covered_lines_of(&self, testable: &TestableVertex) -> BeanResult<BTreeSet<u32>> {
        self.bean_graph().ensure_same_store(testable)?;
        Ok(self.coverage()?.remove(&testable.id()).unwrap_or_default())
    }

    fn count_covered_lines(&self) -> BeanResult<usize> {
        Ok(self.coverage()?.values().map(BTreeSet::len).sum())
    }
}

impl MutableTestCase for TestCaseVertex {
    fn set_status(&self, status: TestStatus) -> BeanResult<()> {
        self.base.set_property(STATUS, status.as_str())
    }

    /// Durations beyond `i64::MAX` milliseconds are stored saturated
    fn set_duration_ms(&self, duration_ms: u64) -> BeanResult<()> {
        let duration = i64::try_from(duration_ms).unwrap_or(i64::MAX);
        self.base.set_property(DURATION_MS, duration)
    }

    fn set_message(&self, message: &str) -> BeanResult<()> {
        self.base.set_property(MESSAGE, message)
    }

    fn set_stack_trace(&self, stack_trace: &str) -> BeanResult<()> {
        self.base.set_property(STACK_TRACE, stack_trace)
    }

    fn set_test_type(&self, test_type: &str) -> BeanResult<()> {
        self.base.set_property(TYPE, test_type)
    }

    fn cover_lines(
        &self,
        testable: &TestableVertex,
        lines: impl IntoIterator<Item = u32>,
    ) -> BeanResult<CoverageBlock> {
        testable.add_coverage(self, lines)
    }
}
