//! # formwork-core
//!
//! Foundation types shared by every formwork crate. This crate has no
//! dependency on the HTTP or forms layers.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings with defaults and form-level configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers (label derivation, HTML escaping)

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FormworkError, FormworkResult, ValidationError};
pub use settings::{FormSettings, Settings};
