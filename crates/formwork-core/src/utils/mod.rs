//! Utility functions shared across the formwork crates.
//!
//! - [`text`]: label derivation and HTML escaping.

pub mod text;
