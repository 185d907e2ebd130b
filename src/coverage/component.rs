//! Structural units: projects, modules, files

use super::test_plan::TestPlanVertex;
use super::testable::TestableVertex;
use crate::bean::{Bean, BeanResult, BeanVertex};
use crate::graph::{Direction, NodeId};

pub const KEY: &str = "key";
pub const QUALIFIER: &str = "qualifier";
pub const NAME: &str = "name";
pub const PATH: &str = "path";

pub trait Component {
    /// Unique key of the component, e.g. `org.example:core:src/Foo.java`
    fn key(&self) -> BeanResult<String>;

    /// Kind of component, e.g. `FIL` or `UTS`
    fn qualifier(&self) -> BeanResult<String>;

    fn name(&self) -> BeanResult<Option<String>>;

    fn path(&self) -> BeanResult<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentVertex {
    base: BeanVertex,
}

impl Bean for ComponentVertex {
    type Base = BeanVertex;

    fn from_base(base: BeanVertex) -> Self {
        ComponentVertex { base }
    }

    fn base(&self) -> &BeanVertex {
        &self.base
    }
}

impl Component for ComponentVertex {
    fn key(&self) -> BeanResult<String> {
        self.base.required_string(KEY)
    }

    fn qualifier(&self) -> BeanResult<String> {
        self.base.required_string(QUALIFIER)
    }

    fn name(&self) -> BeanResult<Option<String>> {
        self.base.string_property(NAME)
    }

    fn path(&self) -> BeanResult<Option<String>> {
        self.base.string_property(PATH)
    }
}

impl ComponentVertex {
    pub fn id(&self) -> NodeId {
        self.base.id()
    }

    /// Enclosing component. A component with several parents is corrupt.
    pub fn parent(&self) -> BeanResult<Option<ComponentVertex>> {
        let child = &self.bean_graph().schema().edges.child;
        self.base.optional_adjacent(Direction::Incoming, child)
    }

    pub fn children(&self) -> BeanResult<Vec<ComponentVertex>> {
        let child = &self.bean_graph().schema().edges.child;
        self.base.adjacents(Direction::Outgoing, child)
    }

    /// Testable perspective, when the component has coverage data
    pub fn testable(&self) -> BeanResult<Option<TestableVertex>> {
        let testable = &self.bean_graph().schema().edges.testable;
        self.base.optional_adjacent(Direction::Outgoing, testable)
    }

    /// Test plan perspective, when the component holds tests
    pub fn test_plan(&self) -> BeanResult<Option<TestPlanVertex>> {
        let test_plan = &self.bean_graph().schema().edges.test_plan;
        self.base.optional_adjacent(Direction::Outgoing, test_plan)
    }
}
