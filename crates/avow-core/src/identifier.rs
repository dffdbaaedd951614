//! Identifiers for avows.
//!
//! This module provides two identifier types:
//!
//! - [`Id`]: an interned display name (`"A"`, `"B"`, `"CELL"`, ...). Names
//!   are what users see and may be changed or even duplicated.
//! - [`NodeId`]: a stable opaque handle for one placed avow. Handles are
//!   never reused within a circuit, so they stay valid identities across
//!   renames.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for display names.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned display name of an avow.
///
/// # Examples
///
/// ```
/// use avow_core::identifier::Id;
///
/// let name = Id::new("A");
/// assert_eq!(name, "A");
///
/// // Names handed out to freshly built avows
/// assert_eq!(Id::sequential(0), "A");
/// assert_eq!(Id::sequential(25), "Z");
/// assert_eq!(Id::sequential(26), "AA");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the `index`-th name of the sequence `A, B, ..., Z, AA, AB, ...`.
    pub fn sequential(index: usize) -> Self {
        let mut letters = Vec::new();
        let mut n = index + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            n = (n - 1) / 26;
        }
        let name: String = letters.into_iter().rev().collect();
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Stable handle of a placed avow inside a circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw handle value.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Returns the handle that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
