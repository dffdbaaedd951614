//! Error codes for diagram diagnostics.
//!
//! Error codes are organized by check:
//! - `E0xx` - Input errors
//! - `E1xx` - Placement errors
//! - `E2xx` - Topology errors

use std::fmt;

/// Error codes for categorizing diagram diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Input Errors (E0xx)
    // =========================================================================
    /// No components.
    ///
    /// Extraction was requested for a circuit without any placed avow.
    E001,

    // =========================================================================
    // Placement Errors (E1xx)
    // =========================================================================
    /// Unconnected avow.
    ///
    /// An avow touches no other avow on any of its four sides.
    E101,

    /// Blocked avow.
    ///
    /// An avow overlaps another avow, or sits in the seam between two avows
    /// that would otherwise be connected.
    E102,

    // =========================================================================
    // Topology Errors (E2xx)
    // =========================================================================
    /// Layout error.
    ///
    /// The avows do not form a closed rectangle: the series voltage down the
    /// left and right sides, or the current across the top and bottom, do
    /// not agree.
    E201,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns the short tag shown in the errors panel.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "NO COMPONENTS",
            ErrorCode::E101 => "UNCONNECTED",
            ErrorCode::E102 => "BLOCKED",
            ErrorCode::E201 => "LAYOUT ERROR",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "no components",
            ErrorCode::E101 => "unconnected avow",
            ErrorCode::E102 => "blocked avow",
            ErrorCode::E201 => "diagram is not a rectangle",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
