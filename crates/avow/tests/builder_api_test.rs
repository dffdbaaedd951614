//! Integration tests for the DiagramBuilder API
//!
//! These tests place avows the way the editor does and check the extracted
//! layers, aggregates and diagnostics.

use avow::{
    DiagramBuilder,
    component::ComponentKind,
    config::{AppConfig, EditorMode, ExtractionConfig},
    diagram::{Diagram, DiagramIndex},
    error::{ErrorCode, Severity},
    geometry::{Bounds, Point, Size},
    graph::{Circuit, Node},
    identifier::{Id, NodeId},
    values::ComponentParameter,
};

fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds {
    Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
}

fn place(circuit: &mut Circuit, name: &str, bounds: Bounds) -> NodeId {
    circuit.insert(Node::new(Id::new(name), ComponentKind::Resistor, bounds))
}

fn layer_names(diagram: &Diagram) -> Vec<Vec<String>> {
    diagram
        .layers()
        .map(|(layer, _)| {
            diagram
                .layer_names(layer)
                .iter()
                .map(ToString::to_string)
                .collect()
        })
        .collect()
}

fn chain() -> Circuit {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 1.0, 5.0));
    place(&mut circuit, "B", rect(0.0, 5.0, 1.0, 5.0));
    place(&mut circuit, "C", rect(0.0, 10.0, 1.0, 5.0));
    circuit
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_series_chain() {
    let mut circuit = chain();

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert!(extraction.errors().is_empty(), "{:?}", extraction.errors());
    let diagram = extraction.diagram();
    assert_eq!(
        layer_names(diagram),
        vec![vec!["CELL"], vec!["A"], vec!["B"], vec!["C"]]
    );
    assert_eq!(diagram.voltage(), 15.0);
    assert_eq!(diagram.current(), 1.0);
    assert_eq!(
        diagram.source().values().value(ComponentParameter::Resistance),
        0.0
    );

    for (_, node) in circuit.iter() {
        assert_eq!(node.values().value(ComponentParameter::Voltage), 5.0);
        assert_eq!(node.values().value(ComponentParameter::Current), 1.0);
        assert_eq!(node.values().value(ComponentParameter::Resistance), 5.0);
    }
}

#[test]
fn test_clean_rectangle() {
    // Two parallel branches of equal voltage rejoining at D.
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 1.0, 2.0));
    place(&mut circuit, "B", rect(1.0, 0.0, 1.0, 2.0));
    place(&mut circuit, "D", rect(0.0, 2.0, 2.0, 3.0));

    let diagram = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract")
        .into_result()
        .expect("Rectangle should be valid");

    assert_eq!(diagram.layer_count(), 3);
    assert_eq!(
        layer_names(&diagram),
        vec![vec!["CELL"], vec!["A", "B"], vec!["D"]]
    );
    assert_eq!(diagram.voltage(), 5.0);
    assert_eq!(diagram.current(), 2.0);
}

#[test]
fn test_diamond_moves_join_below_deeper_branch() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 2.0, 1.0));
    place(&mut circuit, "B", rect(0.0, 1.0, 1.0, 1.0));
    place(&mut circuit, "B2", rect(0.0, 2.0, 1.0, 1.0));
    place(&mut circuit, "C", rect(1.0, 1.0, 1.0, 2.0));
    place(&mut circuit, "D", rect(0.0, 3.0, 2.0, 1.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert!(extraction.is_valid(), "{:?}", extraction.errors());
    let diagram = extraction.diagram();
    assert_eq!(
        layer_names(diagram),
        vec![
            vec!["CELL"],
            vec!["A"],
            vec!["B", "C"],
            vec!["B2"],
            vec!["D"]
        ]
    );
    assert_eq!(diagram.voltage(), 4.0);
    assert_eq!(diagram.current(), 2.0);
}

#[test]
fn test_every_node_in_exactly_one_layer() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 2.0, 1.0));
    place(&mut circuit, "B", rect(0.0, 1.0, 1.0, 1.0));
    place(&mut circuit, "B2", rect(0.0, 2.0, 1.0, 1.0));
    place(&mut circuit, "C", rect(1.0, 1.0, 1.0, 2.0));
    place(&mut circuit, "D", rect(0.0, 3.0, 2.0, 1.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");
    let diagram = extraction.diagram();

    for index in 0..diagram.nodes().len() {
        let appearances = diagram
            .layers()
            .filter(|(_, members)| members.iter().any(|m| m.index() == index))
            .count();
        assert_eq!(appearances, 1, "node {index} appears {appearances} times");
    }
}

#[test]
fn test_two_isolated_avows_are_unconnected() {
    // Different heights, so the two sides would not match either.
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 1.0, 1.0));
    place(&mut circuit, "B", rect(5.0, 5.0, 1.0, 3.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    let errors = extraction.errors();
    assert_eq!(errors.count(ErrorCode::E101), 2);
    assert_eq!(errors.count(ErrorCode::E201), 0);
    assert!(!extraction.is_valid());
    for diagnostic in errors.iter() {
        assert_eq!(diagnostic.tag(), Some("UNCONNECTED"));
        assert_eq!(diagnostic.context().len(), 2);
    }
}

#[test]
fn test_single_avow_is_the_whole_diagram() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 2.0, 3.0));

    let diagram = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract")
        .into_result()
        .expect("A single avow is valid");

    assert_eq!(diagram.layer_count(), 2);
    assert_eq!(diagram.voltage(), 3.0);
    assert_eq!(diagram.current(), 2.0);
}

#[test]
fn test_isolated_avow_next_to_a_diagram() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 1.0, 1.0));
    place(&mut circuit, "B", rect(0.0, 1.0, 1.0, 1.0));
    let stray = place(&mut circuit, "S", rect(5.0, 0.0, 1.0, 2.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    let unconnected: Vec<_> = extraction
        .errors()
        .iter()
        .filter(|d| d.code() == Some(ErrorCode::E101))
        .collect();
    assert_eq!(unconnected.len(), 1);
    assert_eq!(unconnected[0].node(), Some(stray));
}

#[test]
fn test_empty_circuit_has_no_components() {
    let mut circuit = Circuit::new();

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert_eq!(extraction.errors().count(ErrorCode::E001), 1);
    let diagram = extraction.diagram();
    assert_eq!(diagram.layer_count(), 1);
    assert_eq!(diagram.layer(0), Some([DiagramIndex::SOURCE].as_slice()));
    assert_eq!(diagram.source().name(), "CELL");
    assert_eq!(diagram.source().kind(), ComponentKind::Cell);
}

#[test]
fn test_overlapping_avows_are_blocked() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 2.0, 2.0));
    place(&mut circuit, "B", rect(1.0, 1.0, 2.0, 2.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert_eq!(extraction.errors().count(ErrorCode::E102), 2);
    assert_eq!(extraction.errors().count(ErrorCode::E201), 0);
}

#[test]
fn test_isolated_avow_beside_a_taller_diagram() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 1.0, 2.0));
    place(&mut circuit, "B", rect(0.0, 2.0, 1.0, 3.0));
    place(&mut circuit, "S", rect(5.0, 0.0, 2.0, 1.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert_eq!(extraction.errors().count(ErrorCode::E101), 1);
    assert_eq!(extraction.errors().count(ErrorCode::E201), 0);
    assert_eq!(extraction.diagram().voltage(), 0.0);
}

#[test]
fn test_gap_is_a_layout_error() {
    // B only covers half of A's bottom edge.
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 2.0, 1.0));
    place(&mut circuit, "B", rect(0.0, 1.0, 1.0, 1.0));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert_eq!(extraction.errors().count(ErrorCode::E201), 1);
    assert_eq!(extraction.errors().count(ErrorCode::E101), 0);
    assert_eq!(extraction.diagram().voltage(), 0.0);

    let errors = extraction.into_result().expect_err("Diagram is invalid");
    assert!(errors.has_errors());
}

#[test]
fn test_solver_mode_downgrades_unconnected() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 1.0, 1.0));
    place(&mut circuit, "B", rect(5.0, 5.0, 1.0, 1.0));
    let config = AppConfig::new(ExtractionConfig::default(), EditorMode::Solver);

    let extraction = DiagramBuilder::new(config)
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert_eq!(extraction.errors().count(ErrorCode::E101), 2);
    assert!(
        extraction
            .errors()
            .iter()
            .all(|d| d.severity() == Severity::Warning)
    );
    assert!(extraction.is_valid());
}

#[test]
fn test_scale_multiplies_values() {
    let mut circuit = chain();
    let config = AppConfig::new(
        ExtractionConfig::default().with_scale(10.0),
        EditorMode::Builder,
    );

    let diagram = DiagramBuilder::new(config)
        .extract(&mut circuit)
        .expect("Failed to extract")
        .into_result()
        .expect("Chain is valid");

    assert_eq!(diagram.voltage(), 150.0);
    assert_eq!(diagram.current(), 10.0);
}

#[test]
fn test_placed_cell_names_the_source() {
    let mut circuit = chain();
    let battery = circuit.insert(Node::new(
        Id::new("Battery"),
        ComponentKind::Cell,
        rect(-3.0, 0.0, 1.0, 15.0),
    ));
    let spare = circuit.insert(Node::new(
        Id::new("Spare"),
        ComponentKind::Cell,
        rect(-6.0, 0.0, 1.0, 15.0),
    ));

    let extraction = DiagramBuilder::default()
        .extract(&mut circuit)
        .expect("Failed to extract");

    assert!(extraction.is_valid(), "{:?}", extraction.errors());
    let warnings: Vec<_> = extraction.errors().iter().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].node(), Some(spare));

    let diagram = extraction.diagram();
    assert_eq!(diagram.source().name(), "Battery");
    assert_eq!(diagram.source().node(), Some(battery));
    assert_eq!(diagram.layer_count(), 4);

    let cell = circuit.node(battery).expect("Battery exists");
    assert_eq!(cell.values().value(ComponentParameter::Voltage), 15.0);
    assert_eq!(cell.values().value(ComponentParameter::Current), 1.0);
}

#[test]
fn test_extraction_is_idempotent() {
    let mut circuit = Circuit::new();
    place(&mut circuit, "A", rect(0.0, 0.0, 2.0, 1.0));
    place(&mut circuit, "B", rect(0.0, 1.0, 1.0, 1.0));
    place(&mut circuit, "C", rect(7.0, 7.0, 1.0, 1.0));
    let builder = DiagramBuilder::default();

    let first = builder.extract(&mut circuit).expect("Failed to extract");
    let second = builder.extract(&mut circuit).expect("Failed to extract");

    assert_eq!(first, second);
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();

    let mut first = chain();
    let mut second = Circuit::new();
    place(&mut second, "X", rect(0.0, 0.0, 3.0, 3.0));

    let first = builder.extract(&mut first).expect("Failed to extract");
    let second = builder.extract(&mut second).expect("Failed to extract");

    assert_eq!(first.diagram().layer_count(), 4);
    assert_eq!(second.diagram().layer_count(), 2);
}
