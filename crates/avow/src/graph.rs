//! The placed avows and their spatial adjacency.
//!
//! A [`Circuit`] owns every placed [`Node`] in insertion order, addressed by
//! [`NodeId`]. Neighbor lists inside a node are references by id, never
//! ownership.
//!
//! Adjacency is readable by anyone but only the
//! [`ConnectionResolver`](crate::resolver::ConnectionResolver) writes it, so
//! the Top/Bottom and Left/Right symmetry holds after every resolution.

use indexmap::IndexMap;

use avow_core::{
    component::{ComponentKind, Direction},
    geometry::Bounds,
    identifier::{Id, NodeId},
    values::ValueStore,
};

/// Neighbor lists of one node, as computed by the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjacency {
    top: Vec<NodeId>,
    bottom: Vec<NodeId>,
    left: Vec<NodeId>,
    right: Vec<NodeId>,
    siblings: Vec<NodeId>,
    a_connections: Vec<NodeId>,
    b_connections: Vec<NodeId>,
    blocked: bool,
}

impl Adjacency {
    pub fn top(&self) -> &[NodeId] {
        &self.top
    }

    pub fn bottom(&self) -> &[NodeId] {
        &self.bottom
    }

    pub fn left(&self) -> &[NodeId] {
        &self.left
    }

    pub fn right(&self) -> &[NodeId] {
        &self.right
    }

    /// Nodes in the same parallel group.
    pub fn siblings(&self) -> &[NodeId] {
        &self.siblings
    }

    /// Upstream electrical neighbors.
    pub fn a_connections(&self) -> &[NodeId] {
        &self.a_connections
    }

    /// Downstream electrical neighbors.
    pub fn b_connections(&self) -> &[NodeId] {
        &self.b_connections
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Returns `true` if the node touches nothing in any of the four
    /// directions.
    pub fn is_isolated(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty() && self.left.is_empty() && self.right.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn push_top(&mut self, id: NodeId) {
        push_unique(&mut self.top, id);
    }

    pub(crate) fn push_bottom(&mut self, id: NodeId) {
        push_unique(&mut self.bottom, id);
    }

    pub(crate) fn push_left(&mut self, id: NodeId) {
        push_unique(&mut self.left, id);
    }

    pub(crate) fn push_right(&mut self, id: NodeId) {
        push_unique(&mut self.right, id);
    }

    pub(crate) fn set_siblings(&mut self, siblings: Vec<NodeId>) {
        self.siblings = siblings;
    }

    pub(crate) fn set_blocked(&mut self) {
        self.blocked = true;
    }

    /// Sorts every neighbor list with `key`, which receives the id and
    /// whether the list is vertical (top or bottom).
    pub(crate) fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: PartialOrd,
        F: FnMut(NodeId, bool) -> K,
    {
        for (list, vertical) in [
            (&mut self.top, true),
            (&mut self.bottom, true),
            (&mut self.left, false),
            (&mut self.right, false),
        ] {
            list.sort_by(|x, y| {
                key(*x, vertical)
                    .partial_cmp(&key(*y, vertical))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    /// Derives the electrical edges from the spatial ones.
    pub(crate) fn apply_direction(&mut self, direction: Direction) {
        let (a, b) = match direction {
            Direction::AToB => (&self.top, &self.bottom),
            Direction::BToA => (&self.bottom, &self.top),
        };
        self.a_connections = a.clone();
        self.b_connections = b.clone();
    }

    fn forget(&mut self, id: NodeId) {
        for list in [
            &mut self.top,
            &mut self.bottom,
            &mut self.left,
            &mut self.right,
            &mut self.siblings,
            &mut self.a_connections,
            &mut self.b_connections,
        ] {
            list.retain(|other| *other != id);
        }
    }
}

fn push_unique(list: &mut Vec<NodeId>, id: NodeId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

/// One placed avow.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: Id,
    kind: ComponentKind,
    direction: Direction,
    bounds: Bounds,
    values: ValueStore,
    adjacency: Adjacency,
}

impl Node {
    /// Creates a resistor-like node of `kind` with all values visible and
    /// no neighbors.
    pub fn new(name: Id, kind: ComponentKind, bounds: Bounds) -> Self {
        Self {
            name,
            kind,
            direction: Direction::default(),
            bounds,
            values: ValueStore::new(),
            adjacency: Adjacency::default(),
        }
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

    pub fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.values
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Voltage before scaling: the height of the avow.
    pub fn raw_voltage(&self) -> f64 {
        f64::from(self.bounds.height())
    }

    /// Current before scaling: the width of the avow.
    pub fn raw_current(&self) -> f64 {
        f64::from(self.bounds.width())
    }

    pub fn set_name(&mut self, name: Id) {
        self.name = name;
    }

    pub fn set_kind(&mut self, kind: ComponentKind) {
        self.kind = kind;
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub(crate) fn adjacency_mut(&mut self) -> &mut Adjacency {
        &mut self.adjacency
    }
}

/// The canonical, insertion-ordered collection of placed avows.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    nodes: IndexMap<NodeId, Node>,
    next_id: NodeId,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` and returns its handle. Handles are never reused.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        self.nodes.insert(id, node);
        id
    }

    /// Removes a node and severs every reference other nodes hold to it.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&id)?;
        for other in self.nodes.values_mut() {
            other.adjacency.forget(id);
        }
        Some(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterates nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.nodes.iter_mut().map(|(id, node)| (*id, node))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use avow_core::geometry::{Point, Size};

    use super::*;

    fn node(name: &str) -> Node {
        Node::new(
            Id::new(name),
            ComponentKind::Resistor,
            Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(1.0, 2.0)),
        )
    }

    #[test]
    fn test_insert_assigns_fresh_ids() {
        let mut circuit = Circuit::new();
        let a = circuit.insert(node("A"));
        let b = circuit.insert(node("B"));
        circuit.remove(b);
        let c = circuit.insert(node("C"));

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(circuit.len(), 2);
        assert!(!circuit.contains(b));
    }

    #[test]
    fn test_raw_values_follow_geometry() {
        let node = node("A");
        assert_eq!(node.raw_voltage(), 2.0);
        assert_eq!(node.raw_current(), 1.0);
    }

    #[test]
    fn test_remove_severs_references() {
        let mut circuit = Circuit::new();
        let a = circuit.insert(node("A"));
        let b = circuit.insert(node("B"));
        {
            let adjacency = circuit.node_mut(a).map(Node::adjacency_mut);
            let adjacency = adjacency.expect("A exists");
            adjacency.push_bottom(b);
            adjacency.set_siblings(vec![b]);
            adjacency.apply_direction(Direction::AToB);
        }
        circuit
            .node_mut(b)
            .expect("B exists")
            .adjacency_mut()
            .push_top(a);

        circuit.remove(b);

        let remaining = circuit.node(a).expect("A exists").adjacency();
        assert!(remaining.bottom().is_empty());
        assert!(remaining.siblings().is_empty());
        assert!(remaining.b_connections().is_empty());
    }

    #[test]
    fn test_apply_direction() {
        let mut adjacency = Adjacency::default();
        adjacency.push_top(NodeId::new(1));
        adjacency.push_bottom(NodeId::new(2));

        adjacency.apply_direction(Direction::AToB);
        assert_eq!(adjacency.a_connections(), [NodeId::new(1)]);
        assert_eq!(adjacency.b_connections(), [NodeId::new(2)]);

        adjacency.apply_direction(Direction::BToA);
        assert_eq!(adjacency.a_connections(), [NodeId::new(2)]);
        assert_eq!(adjacency.b_connections(), [NodeId::new(1)]);
    }

    #[test]
    fn test_push_is_unique() {
        let mut adjacency = Adjacency::default();
        adjacency.push_left(NodeId::new(4));
        adjacency.push_left(NodeId::new(4));
        assert_eq!(adjacency.left().len(), 1);
        assert!(!adjacency.is_isolated());
    }
}
