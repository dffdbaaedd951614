//! Collector for accumulating diagnostics during one extraction.
//!
//! The [`DiagnosticCollector`] lets every check report its findings instead
//! of stopping at the first one. Reports are deduplicated: the same problem
//! on the same avow is only kept once.

use indexmap::IndexSet;

use crate::error::{DiagramError, DiagramErrors};

/// A collector for accumulating diagnostics during one extraction.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: IndexSet<DiagramError>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// A diagnostic equal to one already collected is dropped.
    pub(crate) fn emit(&mut self, diagnostic: DiagramError) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.insert(diagnostic);
    }

    /// Returns `true` if an error-severity diagnostic was emitted.
    pub(crate) fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection, keeping warnings and errors in emission order.
    pub(crate) fn finish(self) -> DiagramErrors {
        DiagramErrors::new(self.diagnostics.into_iter().collect())
    }
}
