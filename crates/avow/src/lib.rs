//! Avow - layered diagram extraction for AVOW circuit diagrams.
//!
//! In an AVOW diagram every resistor is a rectangle whose height is its
//! voltage and whose width is its current. Avows touching top to bottom are
//! in series, avows touching side by side are in parallel. This crate turns
//! a set of placed avows into a layered diagram rooted at a single source,
//! checks that the placement forms one closed rectangle, and computes the
//! source voltage and current.

pub mod config;
pub mod diagram;
pub mod editor;
pub mod error;
pub mod graph;
pub mod resolver;
pub mod scene;

mod extract;

pub use avow_core::{component, geometry, identifier, values};

pub use error::AvowError;
pub use extract::Extraction;

use log::{debug, info};

use config::AppConfig;
use graph::Circuit;

/// Runs diagram extraction with a fixed configuration.
///
/// # Examples
///
/// ```
/// use avow::{DiagramBuilder, config::AppConfig, graph::{Circuit, Node}};
/// use avow::{component::ComponentKind, geometry::{Bounds, Point, Size}, identifier::Id};
///
/// let mut circuit = Circuit::new();
/// for (name, y) in [("A", 0.0), ("B", 5.0), ("C", 10.0)] {
///     let bounds = Bounds::new_from_top_left(Point::new(0.0, y), Size::new(1.0, 5.0));
///     circuit.insert(Node::new(Id::new(name), ComponentKind::Resistor, bounds));
/// }
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder
///     .extract(&mut circuit)
///     .expect("layering terminates")
///     .into_result()
///     .expect("diagram is valid");
///
/// assert_eq!(diagram.layer_count(), 4);
/// assert_eq!(diagram.voltage(), 15.0);
/// assert_eq!(diagram.current(), 1.0);
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Extract the layered diagram of `circuit`.
    ///
    /// Adjacency and each avow's derived values are recomputed first. The
    /// returned [`Extraction`] holds the diagram together with every
    /// diagnostic found.
    ///
    /// # Errors
    ///
    /// Returns [`AvowError::CycleGuard`] if the adjacency graph cannot be
    /// layered.
    pub fn extract(&self, circuit: &mut Circuit) -> Result<Extraction, AvowError> {
        info!(
            mode:% = self.config.mode(),
            scale = self.config.extraction().scale();
            "Building diagram"
        );
        let extraction = extract::extract(circuit, &self.config)?;
        debug!(valid = extraction.is_valid(); "Extraction finished");
        Ok(extraction)
    }
}
