//! AVOW Core Types and Definitions
//!
//! This crate provides the foundational types shared by the AVOW diagram
//! tooling. It includes:
//!
//! - **Geometry**: Placement primitives ([`geometry`] module)
//! - **Identifiers**: Interned display names and node handles ([`identifier`] module)
//! - **Components**: Component kinds and current directions ([`component`] module)
//! - **Values**: The per-component value store ([`values`] module)

pub mod component;
pub mod geometry;
pub mod identifier;
pub mod values;
