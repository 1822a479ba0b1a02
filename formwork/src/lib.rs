//! # formwork
//!
//! Declarative forms for server-rendered Rust web applications: declare
//! fields once, bind them to request data, validate them with async
//! validators and render them back to HTML.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formwork` to get everything, or depend on individual
//! crates for finer-grained control.

/// Errors, settings and logging.
pub use formwork_core as core;

/// Request surface, query-string codec and body parsing.
#[cfg(feature = "http")]
pub use formwork_http as http;

/// Fields, validators, widgets, renderers and the form engine.
#[cfg(feature = "forms")]
pub use formwork_forms as forms;

/// Third-party crates re-exported for convenience.
pub use async_trait;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The names most applications need.
pub mod prelude {
    pub use formwork_core::{FormworkError, FormworkResult, Settings, ValidationError};

    #[cfg(feature = "http")]
    pub use formwork_http::{FormRequest, Request};

    #[cfg(feature = "forms")]
    pub use formwork_forms::fields::{self, FieldOptions};
    #[cfg(feature = "forms")]
    pub use formwork_forms::{
        render, validators, BoundForm, FieldSpec, Form, FormInput, FormOptions, Handlers, Outcome,
    };
}
