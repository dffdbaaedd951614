//! Diagram extraction: layering, structural checks and source aggregates.
//!
//! Extraction runs in a fixed order:
//!
//! 1. refuse an empty circuit,
//! 2. resolve adjacency and derive every avow's values from its geometry,
//! 3. snapshot the avows into diagram nodes, ordered left to right,
//! 4. layer them breadth first from the avows with nothing above,
//! 5. report unconnected and blocked avows,
//! 6. close the loop through the source and compare both sides of the
//!    rectangle, unless unconnected avows were already reported.
//!
//! Diagnostics never stop extraction; only the layering cycle guard does.

use std::collections::{HashMap, HashSet};

use float_cmp::approx_eq;
use log::{debug, error, info, trace, warn};

use avow_core::{
    component::Direction,
    identifier::{Id, NodeId},
    values::ComponentParameter,
};

use crate::{
    config::{AppConfig, EditorMode},
    diagram::{Diagram, DiagramIndex, DiagramNode},
    error::{AvowError, DiagnosticCollector, DiagramError, DiagramErrors, ErrorCode},
    graph::Circuit,
    resolver::ConnectionResolver,
};

/// Name given to the synthesized source.
const SOURCE_NAME: &str = "CELL";

/// The outcome of one extraction: a diagram and everything wrong with it.
///
/// The diagram is returned even when errors were found; it is then partial
/// and its source carries no aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    diagram: Diagram,
    errors: DiagramErrors,
}

impl Extraction {
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Errors and warnings, in the order they were found.
    pub fn errors(&self) -> &DiagramErrors {
        &self.errors
    }

    /// Returns `true` when no error-severity diagnostic was reported.
    pub fn is_valid(&self) -> bool {
        !self.errors.has_errors()
    }

    /// The diagram if it is valid, otherwise every diagnostic.
    ///
    /// Warnings alone do not make the diagram invalid.
    pub fn into_result(self) -> Result<Diagram, DiagramErrors> {
        if self.errors.has_errors() {
            Err(self.errors)
        } else {
            Ok(self.diagram)
        }
    }

    pub fn into_parts(self) -> (Diagram, DiagramErrors) {
        (self.diagram, self.errors)
    }
}

/// Extracts a layered diagram from `circuit`.
///
/// Adjacency and derived values in `circuit` are recomputed; nothing else
/// is modified, so extracting an unchanged circuit twice gives equal
/// results.
///
/// # Errors
///
/// Returns [`AvowError::CycleGuard`] when layering or a series walk does
/// not terminate.
pub(crate) fn extract(circuit: &mut Circuit, config: &AppConfig) -> Result<Extraction, AvowError> {
    let settings = config.extraction();
    let mut collector = DiagnosticCollector::new();

    let (cells, mut placed): (Vec<NodeId>, Vec<NodeId>) = circuit
        .ids()
        .partition(|id| circuit.node(*id).is_some_and(|node| node.kind().is_cell()));
    let source = source_node(circuit, &cells, &mut collector);

    if placed.is_empty() {
        info!("No components to extract");
        collector.emit(
            DiagramError::error("there are no components to build a diagram from")
                .with_code(ErrorCode::E001)
                .with_help("place at least one avow"),
        );
        return Ok(Extraction {
            diagram: Diagram::source_only(source),
            errors: collector.finish(),
        });
    }

    info!(nodes_count = placed.len(); "Extracting diagram");

    ConnectionResolver::new(settings.snap_distance()).resolve(circuit);
    update_values(circuit, &placed, settings.scale());

    placed.sort_by(|x, y| {
        let x = circuit.node(*x).map(|n| n.bounds().min_x()).unwrap_or_default();
        let y = circuit.node(*y).map(|n| n.bounds().min_x()).unwrap_or_default();
        x.total_cmp(&y)
    });

    let context: Vec<Id> = placed
        .iter()
        .filter_map(|id| circuit.node(*id).map(|node| node.name()))
        .collect();
    let mut nodes = snapshot(circuit, &placed, source);

    let layers = layer_nodes(&nodes, settings.max_layer_rounds())?;
    for (layer, members) in layers.iter().enumerate() {
        let names: Vec<String> = members
            .iter()
            .map(|index| nodes[index.index()].name().to_string())
            .collect();
        debug!(layer = layer; "Layer members: {}", names.join(" "));
    }

    let first_layer_len = layers.get(1).map_or(0, Vec::len);
    let unconnected_reported = check_unconnected(
        circuit,
        &placed,
        first_layer_len,
        config.mode(),
        &context,
        &mut collector,
    );
    check_blocked(circuit, &placed, &context, &mut collector);

    connect_source(&mut nodes);

    let aggregates = match layers.get(1) {
        Some(first_layer) if !first_layer.is_empty() => {
            let sides = measure_sides(&nodes, first_layer)?;
            if unconnected_reported {
                // Every isolated avow is a branch of its own.
                debug!("Unconnected avows reported, skipping the rectangle check");
            } else {
                check_rectangle(sides, settings.tolerance(), &context, &mut collector);
            }
            sides.map(|sides| (sides.voltage, sides.current))
        }
        _ => {
            collector.emit(
                DiagramError::error("every avow has another avow above it")
                    .with_code(ErrorCode::E201)
                    .with_context(context.clone())
                    .with_help("the top row of avows must touch the source"),
            );
            None
        }
    };

    let mut diagram = Diagram::new(nodes, layers);
    match aggregates {
        Some((voltage, current)) if !collector.has_errors() => {
            let values = diagram.source_mut().values_mut();
            values.set_value(ComponentParameter::Voltage, voltage);
            values.set_value(ComponentParameter::Current, current);
            values.set_value(ComponentParameter::Resistance, 0.0);

            if let Some(cell) = diagram.source().node().and_then(|id| circuit.node_mut(id)) {
                *cell.values_mut() = *diagram.source().values();
            }
        }
        _ => debug!("Source aggregates left unset"),
    }

    let errors = collector.finish();
    info!(
        layers_count = diagram.layer_count(),
        diagnostics_count = errors.diagnostics().len();
        "Diagram extracted"
    );
    trace!(diagram:?; "Extracted diagram");

    Ok(Extraction { diagram, errors })
}

/// Builds the source from the first placed cell, or synthesizes one.
fn source_node(
    circuit: &Circuit,
    cells: &[NodeId],
    collector: &mut DiagnosticCollector,
) -> DiagramNode {
    let mut cells = cells
        .iter()
        .filter_map(|id| circuit.node(*id).map(|node| (*id, node.name())));

    let source = match cells.next() {
        Some((id, name)) => DiagramNode::source(name, Some(id)),
        None => DiagramNode::source(Id::new(SOURCE_NAME), None),
    };

    for (id, name) in cells {
        warn!(node:% = name; "Ignoring additional cell");
        collector.emit(
            DiagramError::warning(format!(
                "the cell {name} is ignored, a diagram has a single source"
            ))
            .with_node(id, name)
            .with_help("delete the extra cell"),
        );
    }

    source
}

/// Normalizes direction and derives voltage, current and resistance from
/// geometry.
fn update_values(circuit: &mut Circuit, placed: &[NodeId], scale: f64) {
    for id in placed {
        let Some(node) = circuit.node_mut(*id) else {
            continue;
        };
        let voltage = node.raw_voltage() * scale;
        let current = node.raw_current() * scale;

        node.set_direction(Direction::AToB);
        node.adjacency_mut().apply_direction(Direction::AToB);

        let values = node.values_mut();
        values.set_value(ComponentParameter::Voltage, voltage);
        values.set_value(ComponentParameter::Current, current);
        values.derive_resistance();
    }
}

/// Copies `placed` into diagram nodes. `placed[i]` becomes index `i + 1`.
fn snapshot(circuit: &Circuit, placed: &[NodeId], source: DiagramNode) -> Vec<DiagramNode> {
    let indices: HashMap<NodeId, DiagramIndex> = placed
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, DiagramIndex::new(i + 1)))
        .collect();
    let lookup = |ids: &[NodeId]| -> Vec<DiagramIndex> {
        ids.iter().filter_map(|id| indices.get(id).copied()).collect()
    };

    let mut nodes = Vec::with_capacity(placed.len() + 1);
    nodes.push(source);

    for id in placed {
        let Some(node) = circuit.node(*id) else {
            continue;
        };
        let adjacency = node.adjacency();
        let mut diagram_node = DiagramNode::placed(
            *id,
            node.name(),
            node.kind(),
            node.direction(),
            node.bounds(),
            *node.values(),
        );
        for index in lookup(adjacency.a_connections()) {
            diagram_node.push_a(index);
        }
        for index in lookup(adjacency.b_connections()) {
            diagram_node.push_b(index);
        }
        diagram_node.set_siblings(lookup(adjacency.siblings()));
        nodes.push(diagram_node);
    }

    nodes
}

/// Assigns every node reachable from the first layer to a layer.
///
/// A node reached again from a deeper layer is moved there and removed
/// from every earlier layer, so it ends up in the deepest layer any path
/// reaches.
fn layer_nodes(
    nodes: &[DiagramNode],
    max_rounds: usize,
) -> Result<Vec<Vec<DiagramIndex>>, AvowError> {
    let first: Vec<DiagramIndex> = (1..nodes.len())
        .map(DiagramIndex::new)
        .filter(|index| nodes[index.index()].a_connections().is_empty())
        .collect();

    let mut visited: HashSet<DiagramIndex> = first.iter().copied().collect();
    let mut layers = vec![vec![DiagramIndex::SOURCE], first];
    let mut rounds = 0;

    while let Some(current) = layers.last().filter(|layer| !layer.is_empty()).cloned() {
        rounds += 1;
        if rounds > max_rounds {
            error!(rounds = rounds; "Layering did not terminate");
            return Err(AvowError::CycleGuard { rounds });
        }

        let mut next = Vec::new();
        for index in current {
            for &down in nodes[index.index()].b_connections() {
                if !visited.insert(down) {
                    debug!(node:% = nodes[down.index()].name(); "Avow visited before, moving it down");
                    for layer in layers.iter_mut() {
                        layer.retain(|member| *member != down);
                    }
                }
                if !next.contains(&down) {
                    next.push(down);
                }
            }
        }
        layers.push(next);
    }

    // The loop ends on an empty layer.
    layers.pop();
    Ok(layers)
}

/// Reports isolated avows. Returns `true` when any was reported.
fn check_unconnected(
    circuit: &Circuit,
    placed: &[NodeId],
    first_layer_len: usize,
    mode: EditorMode,
    context: &[Id],
    collector: &mut DiagnosticCollector,
) -> bool {
    let unconnected: Vec<(NodeId, Id)> = placed
        .iter()
        .filter_map(|id| circuit.node(*id).map(|node| (*id, node)))
        .filter(|(_, node)| node.adjacency().is_isolated())
        .map(|(id, node)| (id, node.name()))
        .collect();

    // A single isolated avow is fine when it is the whole diagram.
    let reported = unconnected.len() > 1 || (unconnected.len() == 1 && first_layer_len > 1);
    if !reported {
        return false;
    }

    for (id, name) in unconnected {
        let message = format!("the avow {name} is unconnected");
        let diagnostic = match mode {
            EditorMode::Builder => DiagramError::error(message),
            EditorMode::Solver => DiagramError::warning(message),
        };
        collector.emit(
            diagnostic
                .with_code(ErrorCode::E101)
                .with_node(id, name)
                .with_context(context.to_vec())
                .with_help("delete the avow or make sure it touches another avow"),
        );
    }
    true
}

fn check_blocked(
    circuit: &Circuit,
    placed: &[NodeId],
    context: &[Id],
    collector: &mut DiagnosticCollector,
) {
    for id in placed {
        let Some(node) = circuit.node(*id) else {
            continue;
        };
        if node.adjacency().is_blocked() {
            collector.emit(
                DiagramError::error(format!("the avow {} is blocked", node.name()))
                    .with_code(ErrorCode::E102)
                    .with_node(*id, node.name())
                    .with_context(context.to_vec())
                    .with_help("delete the avow or move it"),
            );
        }
    }
}

/// Links the open ends of the diagram to the source.
fn connect_source(nodes: &mut [DiagramNode]) {
    for i in 1..nodes.len() {
        let index = DiagramIndex::new(i);
        if nodes[i].b_connections().is_empty() {
            nodes[0].push_b(index);
            nodes[i].push_b(DiagramIndex::SOURCE);
        }
        if nodes[i].a_connections().is_empty() {
            nodes[0].push_a(index);
            nodes[i].push_a(DiagramIndex::SOURCE);
        }
    }
}

/// Voltage and current measured around the edges of a diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sides {
    /// Series voltage down the leftmost branch.
    voltage: f64,
    right_voltage: f64,
    /// Current leaving the source into the first layer.
    current: f64,
    returning_current: f64,
}

/// Walks both outer branches of the diagram and sums the current at the
/// top and at the bottom.
fn measure_sides(
    nodes: &[DiagramNode],
    first_layer: &[DiagramIndex],
) -> Result<Option<Sides>, AvowError> {
    let (Some(&leftmost), Some(&rightmost)) = (first_layer.first(), first_layer.last()) else {
        return Ok(None);
    };

    let current: f64 = first_layer
        .iter()
        .map(|index| nodes[index.index()].current())
        .sum();
    let returning_current: f64 = nodes[DiagramIndex::SOURCE.index()]
        .b_connections()
        .iter()
        .map(|index| nodes[index.index()].current())
        .sum();

    let sides = Sides {
        voltage: series_voltage(nodes, leftmost)?,
        right_voltage: series_voltage(nodes, rightmost)?,
        current,
        returning_current,
    };
    debug!(sides:?; "Measured diagram sides");
    Ok(Some(sides))
}

/// Reports a layout error unless both sides carry the same voltage and
/// the current leaving the top returns at the bottom.
fn check_rectangle(
    sides: Option<Sides>,
    tolerance: f64,
    context: &[Id],
    collector: &mut DiagnosticCollector,
) {
    let Some(sides) = sides else {
        return;
    };

    if !approx_eq!(f64, sides.voltage, sides.right_voltage, epsilon = tolerance)
        || !approx_eq!(f64, sides.current, sides.returning_current, epsilon = tolerance)
    {
        collector.emit(
            DiagramError::error("an avow diagram must be a rectangle")
                .with_code(ErrorCode::E201)
                .with_context(context.to_vec())
                .with_help("make a complete box with no gaps and exactly four sides"),
        );
    }
}

/// Sums voltage down the first B-connection of each node until the source.
fn series_voltage(nodes: &[DiagramNode], start: DiagramIndex) -> Result<f64, AvowError> {
    let mut voltage = 0.0;
    let mut index = start;
    let mut steps = 0;

    loop {
        let node = &nodes[index.index()];
        voltage += node.voltage();
        steps += 1;

        match node.b_connections().first() {
            Some(next) if !nodes[next.index()].kind().is_cell() => {
                if steps > nodes.len() {
                    error!(rounds = steps; "Series walk did not terminate");
                    return Err(AvowError::CycleGuard { rounds: steps });
                }
                index = *next;
            }
            _ => return Ok(voltage),
        }
    }
}
