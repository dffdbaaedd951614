//! Error adapter for converting AvowError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When an [`AvowError::Diagram`] carries several diagram errors, each one is
//! rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity};

use avow::{
    AvowError,
    error::{DiagramError, Severity},
};

/// Adapter for a single diagram error.
///
/// Diagram errors point at avows rather than source text, so the adapter
/// carries the code, severity and help but no labels.
pub struct DiagnosticAdapter<'a> {
    diag: &'a DiagramError,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a DiagramError) -> Self {
        Self { diag }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diag.tag() {
            Some(tag) => write!(f, "{}: {}", tag, self.diag.message()),
            None => write!(f, "{}", self.diag.message()),
        }
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Adapter for non-diagram [`AvowError`] variants.
///
/// This adapter handles errors that don't have diagram information, such
/// as I/O errors, scene errors and the layering cycle guard.
pub struct ErrorAdapter<'a>(pub &'a AvowError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AvowError::Io(_) => "avow::io",
            AvowError::Scene(_) => "avow::scene",
            AvowError::UnknownNode(_) => "avow::unknown_node",
            AvowError::InvalidSize { .. } => "avow::invalid_size",
            AvowError::CycleGuard { .. } => "avow::cycle_guard",
            AvowError::Diagram(_) => return None,
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            AvowError::CycleGuard { .. } => Some(Box::new(
                "the avows form a loop, check for avows stacked onto themselves",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagram error or a non-diagram error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagram error with code and help.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A plain error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an [`AvowError`] into a list of reportable errors.
///
/// For [`AvowError::Diagram`], this returns one [`Reportable`] for each
/// diagram error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &AvowError) -> Vec<Reportable<'_>> {
    match err {
        AvowError::Diagram(errors) => errors
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Convert a single diagram error into a reportable one.
pub fn to_reportable(diag: &DiagramError) -> Reportable<'_> {
    Reportable::Diagnostic(DiagnosticAdapter::new(diag))
}

#[cfg(test)]
mod tests {
    use avow::{
        error::{DiagramErrors, ErrorCode},
        identifier::NodeId,
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = DiagramError::error("the avow A is blocked")
            .with_code(ErrorCode::E102)
            .with_help("delete the avow or move it");
        let err = AvowError::Diagram(DiagramErrors::from(diag));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "BLOCKED: the avow A is blocked");
                assert_eq!(d.code().map(|c| c.to_string()), Some("E102".to_string()));
                assert!(d.help().is_some());
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let err = AvowError::Diagram(DiagramErrors::new(vec![
            DiagramError::error("first error").with_code(ErrorCode::E101),
            DiagramError::error("second error").with_code(ErrorCode::E101),
            DiagramError::error("third error"),
        ]));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "UNCONNECTED: first error");
        assert_eq!(reportables[1].to_string(), "UNCONNECTED: second error");
        assert_eq!(reportables[2].to_string(), "third error");
    }

    #[test]
    fn test_non_diagram_error() {
        let err = AvowError::UnknownNode(NodeId::new(2));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Unknown avow #2");
                assert_eq!(
                    e.code().map(|c| c.to_string()),
                    Some("avow::unknown_node".to_string())
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_warning_severity() {
        let diag = DiagramError::warning("the avow A is unconnected");

        let reportable = to_reportable(&diag);

        assert_eq!(reportable.severity(), Some(MietteSeverity::Warning));
    }
}
