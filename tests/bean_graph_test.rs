//! Factory, label dispatch and schema configuration tests

use std::io::Write;
use std::sync::{Arc, RwLock};
use std::thread;
use testgraph::bean::graph_util;
use testgraph::*;

#[test]
fn test_wrap_preserves_element() {
    let mut store = GraphStore::new();
    let component = store.create_node("component");
    let testable = store.create_node("testable");
    let test_case = store.create_node("testcase");
    store.create_edge(component, testable, "testable").unwrap();
    let covers = store.create_edge(test_case, testable, "covers").unwrap();
    let graph = BeanGraph::from_store(store);

    let view: ComponentVertex = graph.wrap(component).unwrap();
    assert_eq!(view.element(), Element::Vertex(component));

    let block: CoverageBlock = graph.wrap(covers).unwrap();
    assert_eq!(block.element(), Element::Edge(covers));
    assert_eq!(block.element().kind(), bean::ElementKind::Edge);

    let again: ComponentVertex = graph.wrap(component).unwrap();
    assert_eq!(view, again);
    assert!(again.bean_graph().same_store(&graph));
}

#[test]
fn test_wrap_edge_as_vertex_view_is_configuration_error() {
    let mut store = GraphStore::new();
    let a = store.create_node("testcase");
    let b = store.create_node("testable");
    let edge = store.create_edge(a, b, "covers").unwrap();
    let graph = BeanGraph::from_store(store);

    let err = graph.wrap::<TestableVertex>(edge).unwrap_err();
    assert!(err.is_configuration());
    assert!(!err.is_integrity());

    let err = graph.wrap::<CoverageBlock>(a).unwrap_err();
    assert!(err.is_configuration());

    let block: CoverageBlock = graph.wrap(edge).unwrap();
    assert!(block.lines().unwrap().is_empty());
}

#[test]
fn test_wrap_missing_element_propagates_store_error() {
    let graph = BeanGraph::from_store(GraphStore::new());

    let err = graph.wrap::<ComponentVertex>(NodeId::new(9)).unwrap_err();
    assert_eq!(err, BeanError::Graph(GraphError::NodeNotFound(NodeId::new(9))));

    let err = graph.wrap::<CoverageBlock>(EdgeId::new(3)).unwrap_err();
    assert_eq!(err, BeanError::Graph(GraphError::EdgeNotFound(EdgeId::new(3))));
}

#[test]
fn test_label_dispatch() {
    let mut store = GraphStore::new();
    let component = store.create_node("component");
    let testable = store.create_node("testable");
    let test_case = store.create_node("testcase");
    let test_plan = store.create_node("testplan");
    let unknown = store.create_node("Person");
    let graph = BeanGraph::from_store(store);

    assert_eq!(AnyBean::wrap(&graph, component).unwrap().kind(), BeanKind::Component);
    assert_eq!(AnyBean::wrap(&graph, testable).unwrap().kind(), BeanKind::Testable);
    assert_eq!(AnyBean::wrap(&graph, test_case).unwrap().kind(), BeanKind::TestCase);
    assert_eq!(AnyBean::wrap(&graph, test_plan).unwrap().kind(), BeanKind::TestPlan);
    assert_eq!(AnyBean::wrap(&graph, test_case).unwrap().id(), test_case);

    let err = AnyBean::wrap(&graph, unknown).unwrap_err();
    assert!(err.is_configuration());

    let err = AnyBean::wrap(&graph, NodeId::new(100)).unwrap_err();
    assert_eq!(err, BeanError::Graph(GraphError::NodeNotFound(NodeId::new(100))));
}

#[test]
fn test_label_dispatch_first_registered_label_wins() {
    let mut store = GraphStore::new();
    let node = store.create_node("Person");
    store.add_label_to_node(node, "testable").unwrap();
    store.add_label_to_node(node, "component").unwrap();
    let graph = BeanGraph::from_store(store);

    // "Person" is unregistered, "component" sorts before "testable"
    match AnyBean::wrap(&graph, node).unwrap() {
        AnyBean::Component(view) => assert_eq!(view.id(), node),
        other => panic!("expected component, got {:?}", other),
    }
}

#[test]
fn test_custom_schema_drives_navigation() {
    let schema = GraphSchema::from_yaml_str(
        r#"
edges:
  testable: HAS_TESTABLE
  covers: COVERS
lines_key: hits
"#,
    )
    .unwrap();
    assert_eq!(schema.edges.test_plan, EdgeType::new("testplan"));

    let mut store = GraphStore::new();
    let component = store.create_node("component");
    let testable = store.create_node("testable");
    let test_case = store.create_node("testcase");
    store.create_edge(component, testable, "HAS_TESTABLE").unwrap();
    let edge = store.create_edge(test_case, testable, "COVERS").unwrap();
    store
        .set_edge_property(edge, "hits", PropertyValue::Array(vec![8i64.into(), 6i64.into()]))
        .unwrap();
    // ignored under this schema
    store.create_edge(test_case, testable, "covers").unwrap();

    let graph = BeanGraph::with_schema(Arc::new(RwLock::new(store)), schema);
    let view: TestableVertex = graph.wrap(testable).unwrap();

    assert_eq!(view.component().unwrap().id(), component);
    assert_eq!(view.covered_lines().unwrap().into_iter().collect::<Vec<_>>(), vec![6, 8]);
    assert_eq!(view.covering_test_cases().unwrap().len(), 1);
}

#[test]
fn test_schema_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "edges:\n  child: CONTAINS\nlabels:\n  File: component\n  Test: test_case").unwrap();

    let schema = GraphSchema::load(file.path()).unwrap();
    assert_eq!(schema.edges.child, EdgeType::new("CONTAINS"));
    assert_eq!(schema.kind_of(&Label::new("File")), Some(BeanKind::Component));
    assert_eq!(schema.kind_of(&Label::new("component")), None);
    assert_eq!(schema.lines_key, "lines");
}

#[test]
fn test_schema_rejects_ambiguous_edge_types() {
    let err = GraphSchema::from_yaml_str("edges:\n  covers: testable\n").unwrap_err();
    assert!(matches!(err, SchemaError::Invalid(_)));

    let err = GraphSchema::load("/nonexistent/schema.yaml").unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}

#[test]
fn test_traversal_directions() {
    let mut store = GraphStore::new();
    let parent = store.create_node("component");
    let child = store.create_node("component");
    let grandchild = store.create_node("component");
    store.create_edge(parent, child, "child").unwrap();
    store.create_edge(child, grandchild, "child").unwrap();
    let child_type = EdgeType::new("child");

    assert_eq!(graph_util::single_adjacent(&store, child, Direction::Incoming, &child_type).unwrap(), parent);
    assert_eq!(graph_util::single_adjacent(&store, child, Direction::Outgoing, &child_type).unwrap(), grandchild);

    let mut both = graph_util::adjacents(&store, child, Direction::Both, &child_type).unwrap();
    both.sort();
    assert_eq!(both, vec![parent, grandchild]);

    let err = graph_util::single_adjacent(&store, child, Direction::Both, &child_type).unwrap_err();
    assert!(matches!(err, BeanError::Integrity { found: 2, .. }));

    assert_eq!(graph_util::optional_adjacent(&store, parent, Direction::Incoming, &child_type).unwrap(), None);
    assert!(graph_util::adjacents(&store, grandchild, Direction::Outgoing, &child_type).unwrap().is_empty());

    let err = graph_util::adjacents(&store, NodeId::new(77), Direction::Outgoing, &child_type).unwrap_err();
    assert_eq!(err, BeanError::Graph(GraphError::NodeNotFound(NodeId::new(77))));
}

#[test]
fn test_poisoned_lock_is_recovered() {
    let mut store = GraphStore::new();
    let component = store.create_node("component");
    let testable = store.create_node("testable");
    let test_case = store.create_node("testcase");
    store.create_edge(component, testable, "testable").unwrap();
    let edge = store.create_edge(test_case, testable, "covers").unwrap();
    store
        .set_edge_property(edge, "lines", PropertyValue::Array(vec![2i64.into(), 1i64.into()]))
        .unwrap();
    let graph = BeanGraph::from_store(store);

    let writer = graph.clone();
    let result = thread::spawn(move || {
        let _guard = writer.write();
        panic!("writer died holding the lock");
    })
    .join();
    assert!(result.is_err());
    assert!(graph.store().is_poisoned());

    let view: TestableVertex = graph.wrap(testable).unwrap();
    assert_eq!(view.component().unwrap().id(), component);
    assert_eq!(view.covered_lines().unwrap().into_iter().collect::<Vec<_>>(), vec![1, 2]);

    let test: TestCaseVertex = graph.wrap(test_case).unwrap();
    view.add_coverage(&test, [3]).unwrap();
    assert_eq!(view.covered_lines().unwrap().len(), 3);
}

#[test]
fn test_views_shared_across_threads() {
    let mut store = GraphStore::new();
    let component = store.create_node("component");
    let testable = store.create_node("testable");
    store.create_edge(component, testable, "testable").unwrap();
    let test_cases: Vec<NodeId> = (0..8).map(|_| store.create_node("testcase")).collect();
    let graph = BeanGraph::from_store(store);

    let handles: Vec<_> = test_cases
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let graph = graph.clone();
            thread::spawn(move || {
                let view: TestableVertex = graph.wrap(testable).unwrap();
                let test_case: TestCaseVertex = graph.wrap(id).unwrap();
                view.add_coverage(&test_case, [i as u32, 100]).unwrap();
                view.component().unwrap().id()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), component);
    }

    let view: TestableVertex = graph.wrap(testable).unwrap();
    assert_eq!(view.covering_test_cases().unwrap().len(), 8);
    assert_eq!(view.count_test_cases_covering_line(100).unwrap(), 8);
    assert_eq!(view.covered_lines().unwrap().len(), 9);
}
