//! The core diagnostic type for diagram extraction.
//!
//! A [`DiagramError`] represents a single problem found while turning placed
//! avows into a layered diagram, with its code, the offending avow and the
//! names of every avow in the circuit for context.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use avow_core::identifier::{Id, NodeId};

use crate::error::{ErrorCode, Severity};

/// A diagnostic produced by the diagram checks.
///
/// Two diagnostics are the same problem when their code, message and
/// offending avow agree; severity, context and help do not take part in
/// equality.
///
/// # Example
///
/// ```text
/// error[E101]: the avow C is unconnected
///   = help: delete the avow or make sure it touches another avow
/// ```
#[derive(Debug, Clone)]
pub struct DiagramError {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    node: Option<(NodeId, Id)>,
    context: Vec<Id>,
    help: Option<String>,
}

impl DiagramError {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use avow::error::{DiagramError, ErrorCode};
    /// let diag = DiagramError::error("an avow diagram must be a rectangle")
    ///     .with_code(ErrorCode::E201)
    ///     .with_help("close every gap");
    /// assert_eq!(diag.tag(), Some("LAYOUT ERROR"));
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the short tag of the error code, if any.
    pub fn tag(&self) -> Option<&'static str> {
        self.code.map(|code| code.tag())
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the offending avow, if any.
    pub fn node(&self) -> Option<NodeId> {
        self.node.map(|(id, _)| id)
    }

    /// Get the display name of the offending avow, if any.
    pub fn node_name(&self) -> Option<Id> {
        self.node.map(|(_, name)| name)
    }

    /// Names of every avow that was part of the checked circuit.
    pub fn context(&self) -> &[Id] {
        &self.context
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the offending avow.
    pub fn with_node(mut self, id: NodeId, name: Id) -> Self {
        self.node = Some((id, name));
        self
    }

    /// Attach the names of the surrounding avows.
    pub fn with_context(mut self, context: Vec<Id>) -> Self {
        self.context = context;
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            node: None,
            context: Vec::new(),
            help: None,
        }
    }
}

impl PartialEq for DiagramError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message && self.node() == other.node()
    }
}

impl Eq for DiagramError {}

impl Hash for DiagramError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.message.hash(state);
        self.node().hash(state);
    }
}

impl fmt::Display for DiagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E101]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for DiagramError {}
