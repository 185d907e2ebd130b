//! Test perspective of a component: the test cases it holds

use super::component::ComponentVertex;
use super::test_case::{TestCase, TestCaseVertex};
use crate::bean::{Bean, BeanResult, BeanVertex};
use crate::graph::{Direction, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestPlanVertex {
    base: BeanVertex,
}

impl Bean for TestPlanVertex {
    type Base = BeanVertex;

    fn from_base(base: BeanVertex) -> Self {
        TestPlanVertex { base }
    }

    fn base(&self) -> &BeanVertex {
        &self.base
    }
}

impl TestPlanVertex {
    pub fn id(&self) -> NodeId {
        self.base.id()
    }

    pub fn component(&self) -> BeanResult<ComponentVertex> {
        let test_plan = &self.bean_graph().schema().edges.test_plan;
        self.base.single_adjacent(Direction::Incoming, test_plan)
    }

    pub fn test_cases(&self) -> BeanResult<Vec<TestCaseVertex>> {
        let test_case = &self.bean_graph().schema().edges.test_case;
        self.base.adjacents(Direction::Outgoing, test_case)
    }

    /// Test cases named `name`; a plan may run the same name more than once
    pub fn test_cases_by_name(&self, name: &str) -> BeanResult<Vec<TestCaseVertex>> {
        let mut matching = Vec::new();
        for test_case in self.test_cases()? {
            if test_case.name()? == name {
                matching.push(test_case);
            }
        }
        Ok(matching)
    }
}
