//! Component kinds and current directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The electrical role of a placed component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Voltage source. A diagram has exactly one, at layer 0.
    Cell,
    #[default]
    Resistor,
}

impl ComponentKind {
    pub fn is_cell(self) -> bool {
        matches!(self, Self::Cell)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::Resistor => write!(f, "resistor"),
        }
    }
}

/// Orientation of current flow through a component.
///
/// For avows, `AToB` means current enters through the top edge (the A side)
/// and leaves through the bottom edge (the B side).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "a_to_b")]
    AToB,
    #[serde(rename = "b_to_a")]
    BToA,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AToB => write!(f, "A->B"),
            Self::BToA => write!(f, "B->A"),
        }
    }
}
