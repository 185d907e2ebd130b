//! Coverable units and the test cases that exercise them

use super::block::{lines_value, parse_lines, CoverageBlock};
use super::component::ComponentVertex;
use super::test_case::TestCaseVertex;
use crate::bean::{graph_util, Bean, BeanError, BeanResult, BeanVertex, Element};
use crate::graph::{Direction, Edge, EdgeId, GraphStore, NodeId, PropertyMap};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Read side of a testable unit.
///
/// Every collection comes back empty, never absent, when there is no
/// coverage data. Test cases are returned in id order.
pub trait Testable {
    /// The owning component, over the single inbound testable edge
    fn component(&self) -> BeanResult<ComponentVertex>;

    fn covering_test_cases(&self) -> BeanResult<Vec<TestCaseVertex>>;

    fn test_cases_covering_line(&self, line: u32) -> BeanResult<Vec<TestCaseVertex>>;

    /// Union of the lines of all coverage edges, ascending
    fn covered_lines(&self) -> BeanResult<BTreeSet<u32>>;

    fn coverage_blocks(&self) -> BeanResult<Vec<CoverageBlock>>;

    fn count_test_cases_covering_line(&self, line: u32) -> BeanResult<usize> {
        Ok(self.test_cases_covering_line(line)?.len())
    }

    /// Line → number of distinct test cases covering it
    fn test_cases_by_lines(&self) -> BeanResult<BTreeMap<u32, usize>>;
}

/// Write side: coverage edges are created, merged and removed immediately.
///
/// A test case view from another store is rejected with
/// [`BeanError::Configuration`].
pub trait MutableTestable: Testable {
    /// Record that `test_case` covers `lines`. Lines are merged into the
    /// existing coverage edge of that test case, if any.
    fn add_coverage(
        &self,
        test_case: &TestCaseVertex,
        lines: impl IntoIterator<Item = u32>,
    ) -> BeanResult<CoverageBlock>;

    /// Drop the coverage edge of `test_case`. Returns whether one existed.
    fn remove_coverage(&self, test_case: &TestCaseVertex) -> BeanResult<bool>;

    /// Forget some lines of `test_case`. The edge stays, even when empty.
    /// Returns whether `test_case` had a coverage edge here.
    fn remove_covered_lines(
        &self,
        test_case: &TestCaseVertex,
        lines: impl IntoIterator<Item = u32>,
    ) -> BeanResult<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestableVertex {
    base: BeanVertex,
}

impl Bean for TestableVertex {
    type Base = BeanVertex;

    fn from_base(base: BeanVertex) -> Self {
        TestableVertex { base }
    }

    fn base(&self) -> &BeanVertex {
        &self.base
    }
}

impl TestableVertex {
    pub fn id(&self) -> NodeId {
        self.base.id()
    }

    /// `(test case, lines)` for every inbound coverage edge, read under one lock
    fn coverage(&self) -> BeanResult<Vec<(NodeId, BTreeSet<u32>)>> {
        let schema = self.bean_graph().schema();
        let store = self.bean_graph().read();
        let edges = graph_util::adjacent_edges(&store, self.id(), Direction::Incoming, &schema.edges.covers)?;
        let coverage: BeanResult<Vec<_>> = edges
            .into_iter()
            .map(|edge| {
                let lines = parse_lines(Element::Edge(edge.id), &schema.lines_key, edge.get_property(&schema.lines_key))?;
                Ok((edge.source, lines))
            })
            .collect();
        coverage
    }

    /// Coverage edges from `test_case` to this testable
    fn edges_from<'a>(&self, store: &'a GraphStore, test_case: NodeId) -> BeanResult<Vec<&'a Edge>> {
        let covers = &self.bean_graph().schema().edges.covers;
        let mut edges = graph_util::adjacent_edges(store, self.id(), Direction::Incoming, covers)?;
        edges.retain(|edge| edge.source == test_case);
        Ok(edges)
    }

    fn test_cases_matching(&self, filter: impl Fn(&BTreeSet<u32>) -> bool) -> BeanResult<Vec<TestCaseVertex>> {
        let ids: BTreeSet<NodeId> = self
            .coverage()?
            .into_iter()
            .filter(|(_, lines)| filter(lines))
            .map(|(test_case, _)| test_case)
            .collect();
        self.bean_graph().bind_all(ids)
    }
}

impl Testable for TestableVertex {
    fn component(&self) -> BeanResult<ComponentVertex> {
        let testable = &self.bean_graph().schema().edges.testable;
        self.base.single_adjacent(Direction::Incoming, testable)
    }

    fn covering_test_cases(&self) -> BeanResult<Vec<TestCaseVertex>> {
        self.test_cases_matching(|_| true)
    }

    fn test_cases_covering_line(&self, line: u32) -> BeanResult<Vec<TestCaseVertex>> {
        self.test_cases_matching(|lines| lines.contains(&line))
    }

    fn covered_lines(&self) -> BeanResult<BTreeSet<u32>> {
        Ok(self.coverage()?.into_iter().flat_map(|(_, lines)| lines).collect())
    }

    fn coverage_blocks(&self) -> BeanResult<Vec<CoverageBlock>> {
        let covers = &self.bean_graph().schema().edges.covers;
        self.base.edges(Direction::Incoming, covers)
    }

    fn test_cases_by_lines(&self) -> BeanResult<BTreeMap<u32, usize>> {
        let mut hits: BTreeMap<u32, BTreeSet<NodeId>> = BTreeMap::new();
        for (test_case, lines) in self.coverage()? {
            for line in lines {
                hits.entry(line).or_default().insert(test_case);
            }
        }
        Ok(hits.into_iter().map(|(line, tests)| (line, tests.len())).collect())
    }
}

impl MutableTestable for TestableVertex {
    fn add_coverage(
        &self,
        test_case: &TestCaseVertex,
        lines: impl IntoIterator<Item = u32>,
    ) -> BeanResult<CoverageBlock> {
        self.bean_graph().ensure_same_store(test_case)?;
        let schema = self.bean_graph().schema();
        let key = &schema.lines_key;

        let edge_id = {
            let mut store = self.bean_graph().write();
            let existing: Vec<(EdgeId, Option<_>)> = self
                .edges_from(&store, test_case.id())?
                .into_iter()
                .map(|edge| (edge.id, edge.get_property(key).cloned()))
                .collect();

            match existing.as_slice() {
                [] => {
                    let lines: BTreeSet<u32> = lines.into_iter().collect();
                    let mut props = PropertyMap::new();
                    props.insert(key.clone(), lines_value(&lines));
                    store.create_edge_with_properties(
                        test_case.id(),
                        self.id(),
                        schema.edges.covers.clone(),
                        props,
                    )?
                }
                [(edge_id, value)] => {
                    let mut merged = parse_lines(Element::Edge(*edge_id), key, value.as_ref())?;
                    merged.extend(lines);
                    store.set_edge_property(*edge_id, key.as_str(), lines_value(&merged))?;
                    *edge_id
                }
                duplicates => {
                    return Err(BeanError::Integrity {
                        node: self.id(),
                        direction: Direction::Incoming,
                        edge_type: schema.edges.covers.clone(),
                        expected: "at most one per test case",
                        found: duplicates.len(),
                    })
                }
            }
        };

        debug!(testable = %self.id(), test_case = %test_case.id(), edge = %edge_id, "recorded coverage");
        self.bean_graph().bind(edge_id)
    }

    fn remove_coverage(&self, test_case: &TestCaseVertex) -> BeanResult<bool> {
        self.bean_graph().ensure_same_store(test_case)?;
        let mut store = self.bean_graph().write();
        let edge_ids: Vec<EdgeId> = self
            .edges_from(&store, test_case.id())?
            .into_iter()
            .map(|edge| edge.id)
            .collect();

        for edge_id in &edge_ids {
            store.delete_edge(*edge_id)?;
        }
        if !edge_ids.is_empty() {
            debug!(testable = %self.id(), test_case = %test_case.id(), "removed coverage");
        }
        Ok(!edge_ids.is_empty())
    }

    fn remove_covered_lines(
        &self,
        test_case: &TestCaseVertex,
        lines: impl IntoIterator<Item = u32>,
    ) -> BeanResult<bool> {
        self.bean_graph().ensure_same_store(test_case)?;
        let key = &self.bean_graph().schema().lines_key;
        let removed: BTreeSet<u32> = lines.into_iter().collect();

        let mut store = self.bean_graph().write();
        let updates = self
            .edges_from(&store, test_case.id())?
            .into_iter()
            .map(|edge| {
                let mut remaining = parse_lines(Element::Edge(edge.id), key, edge.get_property(key))?;
                remaining.retain(|line| !removed.contains(line));
                Ok((edge.id, remaining))
            })
            .collect::<BeanResult<Vec<_>>>()?;

        let found = !updates.is_empty();
        for (edge_id, remaining) in updates {
            store.set_edge_property(edge_id, key.as_str(), lines_value(&remaining))?;
        }
        Ok(found)
    }
}
