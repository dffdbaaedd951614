//! Error and diagnostic system for avow diagram extraction.
//!
//! Two kinds of failure exist:
//!
//! - [`DiagramError`] diagnostics describe problems with the placed avows
//!   themselves (unconnected, blocked, not a rectangle). They are collected,
//!   never raised, and travel next to a possibly partial diagram.
//! - [`AvowError`] covers conditions that stop an operation outright, such
//!   as I/O failures, unknown nodes or the layering cycle guard.
//!
//! # Example
//!
//! ```
//! # use avow::error::{DiagramError, ErrorCode};
//! let diag = DiagramError::error("the avow C is unconnected")
//!     .with_code(ErrorCode::E101)
//!     .with_help("delete the avow or make sure it touches another avow");
//! assert_eq!(diag.to_string(), "error[E101]: the avow C is unconnected");
//! ```

mod collector;
mod diagnostic;
mod diagram_errors;
mod error_code;
mod severity;

use std::io;

use thiserror::Error;

use avow_core::identifier::NodeId;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::DiagramError;
pub use diagram_errors::DiagramErrors;
pub use error_code::ErrorCode;
pub use severity::Severity;

/// The main error type for avow operations.
#[derive(Debug, Error)]
pub enum AvowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Unknown avow {0}")]
    UnknownNode(NodeId),

    #[error("Invalid avow size {width}x{height}, both sides must be positive")]
    InvalidSize { width: f32, height: f32 },

    /// Layering did not terminate. The adjacency graph contains a cycle.
    #[error("Layering aborted after {rounds} rounds, the avow graph contains a cycle")]
    CycleGuard { rounds: usize },

    #[error("{0}")]
    Diagram(#[from] DiagramErrors),
}
