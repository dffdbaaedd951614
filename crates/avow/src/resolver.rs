//! Spatial adjacency between placed avows.
//!
//! Resolution always rebuilds from scratch in three phases:
//!
//! 1. every node's adjacency and blocked flag is cleared,
//! 2. each unordered pair of nodes is classified once and both sides are
//!    written together,
//! 3. parallel groups (siblings) are derived from the finished Top lists.
//!
//! Two avows touch when they share an edge longer than the snap distance
//! and the gap between them is at most the snap distance. A third avow
//! lying across that seam blocks it.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace};

use avow_core::{
    geometry::{Bounds, Point, Size},
    identifier::NodeId,
};

use crate::graph::Circuit;

#[derive(Debug, Clone, Copy)]
enum Link {
    /// `upper` sits directly above `lower`.
    Vertical { upper: NodeId, lower: NodeId },
    /// `left` sits directly beside `right`.
    Horizontal { left: NodeId, right: NodeId },
}

/// Recomputes Top, Bottom, Left, Right, sibling and blocked state.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionResolver {
    snap_distance: f32,
}

impl ConnectionResolver {
    pub fn new(snap_distance: f32) -> Self {
        Self { snap_distance }
    }

    /// Rebuilds the adjacency of every node in `circuit`.
    ///
    /// Cells take no part: a placed cell never becomes anyone's neighbor.
    pub fn resolve(&self, circuit: &mut Circuit) {
        for (_, node) in circuit.iter_mut() {
            node.adjacency_mut().clear();
        }

        let placed: IndexMap<NodeId, Bounds> = circuit
            .iter()
            .filter(|(_, node)| !node.kind().is_cell())
            .map(|(id, node)| (id, node.bounds()))
            .collect();

        let (links, blocked) = self.pair_links(&placed);
        debug!(
            nodes = placed.len(),
            links = links.len(),
            blocked = blocked.len();
            "Resolved avow connections"
        );

        for link in &links {
            match *link {
                Link::Vertical { upper, lower } => {
                    if let Some(node) = circuit.node_mut(upper) {
                        node.adjacency_mut().push_bottom(lower);
                    }
                    if let Some(node) = circuit.node_mut(lower) {
                        node.adjacency_mut().push_top(upper);
                    }
                }
                Link::Horizontal { left, right } => {
                    if let Some(node) = circuit.node_mut(left) {
                        node.adjacency_mut().push_right(right);
                    }
                    if let Some(node) = circuit.node_mut(right) {
                        node.adjacency_mut().push_left(left);
                    }
                }
            }
        }

        for id in &blocked {
            trace!(node:% = id; "Avow is blocked");
            if let Some(node) = circuit.node_mut(*id) {
                node.adjacency_mut().set_blocked();
            }
        }

        let position = |id: NodeId, vertical: bool| {
            placed
                .get(&id)
                .map(|bounds| if vertical { bounds.min_x() } else { bounds.min_y() })
                .unwrap_or_default()
        };
        for (_, node) in circuit.iter_mut() {
            node.adjacency_mut().sort_by_key(&position);
        }

        self.resolve_siblings(circuit, &placed);
    }

    /// Classifies every unordered pair once.
    fn pair_links(&self, placed: &IndexMap<NodeId, Bounds>) -> (Vec<Link>, Vec<NodeId>) {
        let snap = self.snap_distance;
        let nodes: Vec<(NodeId, Bounds)> = placed.iter().map(|(id, b)| (*id, *b)).collect();
        let mut links = Vec::new();
        let mut blocked = Vec::new();
        for (i, &(first_id, first)) in nodes.iter().enumerate() {
            for &(second_id, second) in &nodes[i + 1..] {
                if first.overlaps(&second, snap) {
                    mark_blocked(&mut blocked, first_id);
                    mark_blocked(&mut blocked, second_id);
                    continue;
                }

                let candidate = if first.horizontal_overlap(&second) > snap {
                    let ((upper_id, upper), (lower_id, lower)) = if first.min_y() <= second.min_y() {
                        ((first_id, first), (second_id, second))
                    } else {
                        ((second_id, second), (first_id, first))
                    };
                    ((lower.min_y() - upper.max_y()).abs() <= snap).then(|| {
                        (
                            Link::Vertical {
                                upper: upper_id,
                                lower: lower_id,
                            },
                            self.horizontal_seam(upper, lower),
                        )
                    })
                } else if first.vertical_overlap(&second) > snap {
                    let ((left_id, left), (right_id, right)) = if first.min_x() <= second.min_x() {
                        ((first_id, first), (second_id, second))
                    } else {
                        ((second_id, second), (first_id, first))
                    };
                    ((right.min_x() - left.max_x()).abs() <= snap).then(|| {
                        (
                            Link::Horizontal {
                                left: left_id,
                                right: right_id,
                            },
                            self.vertical_seam(left, right),
                        )
                    })
                } else {
                    None
                };

                let Some((link, seam)) = candidate else {
                    continue;
                };

                let intruders: Vec<NodeId> = nodes
                    .iter()
                    .filter(|(id, bounds)| {
                        *id != first_id && *id != second_id && bounds.overlaps(&seam, snap / 2.0)
                    })
                    .map(|(id, _)| *id)
                    .collect();

                if intruders.is_empty() {
                    links.push(link);
                } else {
                    for id in intruders {
                        mark_blocked(&mut blocked, id);
                    }
                }
            }
        }

        (links, blocked)
    }

    /// The strip around the shared horizontal edge of two stacked avows.
    fn horizontal_seam(&self, upper: Bounds, lower: Bounds) -> Bounds {
        let snap = self.snap_distance;
        let seam = (upper.max_y() + lower.min_y()) / 2.0;
        let min_x = upper.min_x().max(lower.min_x());
        let max_x = upper.max_x().min(lower.max_x());
        Bounds::new_from_top_left(
            Point::new(min_x, seam - snap),
            Size::new(max_x - min_x, 2.0 * snap),
        )
    }

    /// The strip around the shared vertical edge of two side-by-side avows.
    fn vertical_seam(&self, left: Bounds, right: Bounds) -> Bounds {
        let snap = self.snap_distance;
        let seam = (left.max_x() + right.min_x()) / 2.0;
        let min_y = left.min_y().max(right.min_y());
        let max_y = left.max_y().min(right.max_y());
        Bounds::new_from_top_left(
            Point::new(seam - snap, min_y),
            Size::new(2.0 * snap, max_y - min_y),
        )
    }

    /// Groups nodes that share a Top neighbor. Nodes without any Top
    /// neighbor hang off the source and are siblings of each other.
    fn resolve_siblings(&self, circuit: &mut Circuit, placed: &IndexMap<NodeId, Bounds>) {
        let tops: Vec<(NodeId, HashSet<NodeId>)> = placed
            .keys()
            .filter_map(|id| {
                circuit
                    .node(*id)
                    .map(|node| (*id, node.adjacency().top().iter().copied().collect()))
            })
            .collect();

        for (id, top) in &tops {
            let mut siblings: Vec<NodeId> = tops
                .iter()
                .filter(|(other, other_top)| {
                    other != id
                        && ((top.is_empty() && other_top.is_empty())
                            || !top.is_disjoint(other_top))
                })
                .map(|(other, _)| *other)
                .collect();
            siblings.sort_by(|x, y| {
                let x = placed.get(x).map(|b| b.min_x()).unwrap_or_default();
                let y = placed.get(y).map(|b| b.min_x()).unwrap_or_default();
                x.total_cmp(&y)
            });

            if let Some(node) = circuit.node_mut(*id) {
                node.adjacency_mut().set_siblings(siblings);
            }
        }
    }
}

fn mark_blocked(blocked: &mut Vec<NodeId>, id: NodeId) {
    if !blocked.contains(&id) {
        blocked.push(id);
    }
}

impl Default for ConnectionResolver {
    fn default() -> Self {
        Self::new(0.05)
    }
}
