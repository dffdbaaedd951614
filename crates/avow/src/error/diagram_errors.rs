//! The [`DiagramErrors`] type wrapping every diagnostic of one extraction.

use std::fmt;

use crate::error::{DiagramError, ErrorCode};

/// All diagnostics reported by one extraction.
///
/// Returned as the error side of
/// [`Extraction::into_result`](crate::Extraction::into_result).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramErrors {
    diagnostics: Vec<DiagramError>,
}

impl DiagramErrors {
    /// Create a new error set from diagnostics.
    pub fn new(diagnostics: Vec<DiagramError>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this set.
    pub fn diagnostics(&self) -> &[DiagramError] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagramError> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    /// Number of diagnostics carrying `code`.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.code() == Some(code))
            .count()
    }
}

impl fmt::Display for DiagramErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for DiagramErrors {}

impl From<DiagramError> for DiagramErrors {
    fn from(diagnostic: DiagramError) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}
