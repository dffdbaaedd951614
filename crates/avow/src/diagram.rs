//! The layered diagram produced by one extraction.
//!
//! A [`Diagram`] is a self-contained snapshot: it copies names, kinds and
//! values out of the circuit and refers to its own nodes by
//! [`DiagramIndex`]. Index 0 is always the source, which is the only node
//! of layer 0.

use std::fmt;

use avow_core::{
    component::{ComponentKind, Direction},
    geometry::Bounds,
    identifier::{Id, NodeId},
    values::{ComponentParameter, ValueStore},
};

/// Position of a node inside a [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramIndex(usize);

impl DiagramIndex {
    /// The source node.
    pub const SOURCE: DiagramIndex = DiagramIndex(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_source(self) -> bool {
        self == Self::SOURCE
    }
}

impl fmt::Display for DiagramIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One node of the diagram with its electrical edges.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    node: Option<NodeId>,
    name: Id,
    kind: ComponentKind,
    direction: Direction,
    bounds: Bounds,
    values: ValueStore,
    a_connections: Vec<DiagramIndex>,
    b_connections: Vec<DiagramIndex>,
    siblings: Vec<DiagramIndex>,
}

impl DiagramNode {
    /// The synthesized voltage source. Current through it flows from B to A.
    pub(crate) fn source(name: Id, node: Option<NodeId>) -> Self {
        let mut values = ValueStore::new();
        values.set_value(ComponentParameter::Resistance, 0.0);
        Self {
            node,
            name,
            kind: ComponentKind::Cell,
            direction: Direction::BToA,
            bounds: Bounds::default(),
            values,
            a_connections: Vec::new(),
            b_connections: Vec::new(),
            siblings: Vec::new(),
        }
    }

    pub(crate) fn placed(
        node: NodeId,
        name: Id,
        kind: ComponentKind,
        direction: Direction,
        bounds: Bounds,
        values: ValueStore,
    ) -> Self {
        Self {
            node: Some(node),
            name,
            kind,
            direction,
            bounds,
            values,
            a_connections: Vec::new(),
            b_connections: Vec::new(),
            siblings: Vec::new(),
        }
    }

    /// The circuit node this was taken from. `None` for a synthesized source.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn voltage(&self) -> f64 {
        self.values.value(ComponentParameter::Voltage)
    }

    pub fn current(&self) -> f64 {
        self.values.value(ComponentParameter::Current)
    }

    pub fn a_connections(&self) -> &[DiagramIndex] {
        &self.a_connections
    }

    pub fn b_connections(&self) -> &[DiagramIndex] {
        &self.b_connections
    }

    pub fn siblings(&self) -> &[DiagramIndex] {
        &self.siblings
    }

    pub(crate) fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.values
    }

    pub(crate) fn push_a(&mut self, index: DiagramIndex) {
        if !self.a_connections.contains(&index) {
            self.a_connections.push(index);
        }
    }

    pub(crate) fn push_b(&mut self, index: DiagramIndex) {
        if !self.b_connections.contains(&index) {
            self.b_connections.push(index);
        }
    }

    pub(crate) fn set_siblings(&mut self, siblings: Vec<DiagramIndex>) {
        self.siblings = siblings;
    }
}

/// An ordered sequence of layers over a set of diagram nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    nodes: Vec<DiagramNode>,
    layers: Vec<Vec<DiagramIndex>>,
}

impl Diagram {
    /// Creates a diagram from its nodes and layers. `nodes[0]` must be the
    /// source and `layers[0]` must hold only it.
    pub(crate) fn new(nodes: Vec<DiagramNode>, layers: Vec<Vec<DiagramIndex>>) -> Self {
        Self { nodes, layers }
    }

    /// A diagram holding nothing but its source.
    pub(crate) fn source_only(source: DiagramNode) -> Self {
        Self {
            nodes: vec![source],
            layers: vec![vec![DiagramIndex::SOURCE]],
        }
    }

    pub fn source(&self) -> &DiagramNode {
        &self.nodes[DiagramIndex::SOURCE.0]
    }

    pub fn node(&self, index: DiagramIndex) -> Option<&DiagramNode> {
        self.nodes.get(index.0)
    }

    /// All nodes, source first.
    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    /// Iterates `(layer, members)` from the source outwards.
    pub fn layers(&self) -> impl Iterator<Item = (usize, &[DiagramIndex])> {
        self.layers
            .iter()
            .enumerate()
            .map(|(layer, members)| (layer, members.as_slice()))
    }

    pub fn layer(&self, layer: usize) -> Option<&[DiagramIndex]> {
        self.layers.get(layer).map(Vec::as_slice)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The layer holding `index`, if any.
    pub fn layer_of(&self, index: DiagramIndex) -> Option<usize> {
        self.layers
            .iter()
            .position(|members| members.contains(&index))
    }

    /// Names of the members of `layer`, in order.
    pub fn layer_names(&self, layer: usize) -> Vec<Id> {
        self.layer(layer)
            .unwrap_or_default()
            .iter()
            .filter_map(|index| self.node(*index).map(DiagramNode::name))
            .collect()
    }

    /// Source voltage: the sum along one series path.
    pub fn voltage(&self) -> f64 {
        self.source().voltage()
    }

    /// Source current: the sum over the first layer.
    pub fn current(&self) -> f64 {
        self.source().current()
    }

    pub(crate) fn source_mut(&mut self) -> &mut DiagramNode {
        &mut self.nodes[DiagramIndex::SOURCE.0]
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (layer, _) in self.layers() {
            let names: Vec<String> = self
                .layer_names(layer)
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(f, "layer {}: {}", layer, names.join(" "))?;
        }
        Ok(())
    }
}
