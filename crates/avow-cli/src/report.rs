//! The TOML report written for a valid diagram.

use serde::Serialize;

use avow::{
    component::{ComponentKind, Direction},
    diagram::{Diagram, DiagramIndex, DiagramNode},
    values::{ComponentParameter, ParameterValue},
};

/// Serializable view of an extracted diagram.
#[derive(Debug, Serialize)]
pub struct Report {
    scale: f64,
    voltage: f64,
    current: f64,
    source: ReportNode,
    layers: Vec<ReportLayer>,
}

#[derive(Debug, Serialize)]
struct ReportLayer {
    index: usize,
    avows: Vec<ReportNode>,
}

#[derive(Debug, Serialize)]
struct ReportNode {
    name: String,
    kind: ComponentKind,
    direction: Direction,
    a_connections: Vec<String>,
    b_connections: Vec<String>,
    siblings: Vec<String>,
    voltage: ParameterValue,
    current: ParameterValue,
    resistance: ParameterValue,
}

impl Report {
    pub fn new(diagram: &Diagram, scale: f64) -> Self {
        let layers = diagram
            .layers()
            .skip(1)
            .map(|(index, members)| ReportLayer {
                index,
                avows: members
                    .iter()
                    .filter_map(|member| diagram.node(*member))
                    .map(|node| ReportNode::new(diagram, node))
                    .collect(),
            })
            .collect();

        Self {
            scale,
            voltage: diagram.voltage(),
            current: diagram.current(),
            source: ReportNode::new(diagram, diagram.source()),
            layers,
        }
    }
}

impl ReportNode {
    fn new(diagram: &Diagram, node: &DiagramNode) -> Self {
        let names = |indices: &[DiagramIndex]| -> Vec<String> {
            indices
                .iter()
                .filter_map(|index| diagram.node(*index))
                .map(|other| other.name().to_string())
                .collect()
        };
        let values = node.values();

        Self {
            name: node.name().to_string(),
            kind: node.kind(),
            direction: node.direction(),
            a_connections: names(node.a_connections()),
            b_connections: names(node.b_connections()),
            siblings: names(node.siblings()),
            voltage: values.get(ComponentParameter::Voltage),
            current: values.get(ComponentParameter::Current),
            resistance: values.get(ComponentParameter::Resistance),
        }
    }
}
