use anyhow::Context;
use testgraph::{
    BeanGraph, Component, ComponentVertex, CoverageReport, GraphSchema, GraphStore,
    MutableTestCase, MutableTestable, TestCase, TestCaseVertex, TestStatus, Testable,
    TestableVertex,
};
use std::sync::{Arc, RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Testgraph v{}", testgraph::version());
    println!("==========================================");
    println!();

    let schema = match std::env::args().nth(1) {
        Some(path) => GraphSchema::load(&path).with_context(|| format!("loading schema {}", path))?,
        None => GraphSchema::default(),
    };

    let graph = build_sample(schema)?;
    demo_navigation(&graph)?;
    demo_report(&graph)?;

    Ok(())
}

/// One source file with a testable unit, and a test file whose plan runs two tests
fn build_sample(schema: GraphSchema) -> anyhow::Result<BeanGraph> {
    println!("=== Demo 1: Sample Graph ===");
    let edges = schema.edges.clone();
    let mut store = GraphStore::new();

    let project = store.create_node("component");
    store.set_node_property(project, "key", "org.example:calc")?;
    store.set_node_property(project, "qualifier", "TRK")?;

    let source = store.create_node("component");
    store.set_node_property(source, "key", "org.example:calc:src/Calculator.java")?;
    store.set_node_property(source, "qualifier", "FIL")?;
    store.set_node_property(source, "path", "src/Calculator.java")?;
    store.create_edge(project, source, edges.child.clone())?;

    let tests = store.create_node("component");
    store.set_node_property(tests, "key", "org.example:calc:test/CalculatorTest.java")?;
    store.set_node_property(tests, "qualifier", "UTS")?;
    store.create_edge(project, tests, edges.child.clone())?;

    let testable = store.create_node("testable");
    store.create_edge(source, testable, edges.testable.clone())?;

    let plan = store.create_node("testplan");
    store.create_edge(tests, plan, edges.test_plan.clone())?;

    for name in ["should_add", "should_divide"] {
        let test_case = store.create_node("testcase");
        store.set_node_property(test_case, "name", name)?;
        store.create_edge(plan, test_case, edges.test_case.clone())?;
    }

    let graph = BeanGraph::with_schema(Arc::new(RwLock::new(store)), schema);
    {
        let store = graph.read();
        println!("✓ Created {} vertices, {} edges", store.node_count(), store.edge_count());
    }

    let testable: TestableVertex = graph.wrap(testable)?;
    let tests: ComponentVertex = graph.wrap(tests)?;
    let plan = tests.test_plan()?.context("test component without a plan")?;

    let add = plan.test_cases_by_name("should_add")?;
    let divide = plan.test_cases_by_name("should_divide")?;
    for (test_case, lines, status) in [
        (add.first(), vec![3, 4, 5], TestStatus::Ok),
        (divide.first(), vec![3, 8, 9, 10], TestStatus::Failure),
    ] {
        let test_case: &TestCaseVertex = test_case.context("test case missing from plan")?;
        test_case.set_status(status)?;
        test_case.set_duration_ms(12)?;
        testable.add_coverage(test_case, lines)?;
    }
    if let Some(test_case) = divide.first() {
        test_case.set_message("division by zero")?;
    }

    info!(testable = %testable.id(), "sample coverage recorded");
    Ok(graph)
}

fn demo_navigation(graph: &BeanGraph) -> anyhow::Result<()> {
    println!("\n=== Demo 2: Navigation ===");
    let testables = graph.read().get_nodes_by_label(&"testable".into()).iter().map(|n| n.id).collect::<Vec<_>>();

    for id in testables {
        let testable: TestableVertex = graph.wrap(id)?;
        let component = testable.component()?;
        println!("Testable of {}", component.key()?);
        if let Some(parent) = component.parent()? {
            println!("  in project {}", parent.key()?);
        }
        for test_case in testable.covering_test_cases()? {
            println!(
                "  covered by {} [{}] lines {:?}",
                test_case.name()?,
                test_case.status()?.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                test_case.covered_lines_of(&testable)?,
            );
        }
        println!("  line 3 hit by {} test(s)", testable.count_test_cases_covering_line(3)?);
    }
    Ok(())
}

fn demo_report(graph: &BeanGraph) -> anyhow::Result<()> {
    println!("\n=== Demo 3: Coverage Report ===");
    let testables = graph.read().get_nodes_by_label(&"testable".into()).iter().map(|n| n.id).collect::<Vec<_>>();

    for id in testables {
        let testable: TestableVertex = graph.wrap(id)?;
        let report = CoverageReport::build(&testable)?;
        println!("{}", report.to_json()?);
    }
    Ok(())
}
