//! # formwork-forms
//!
//! Declarative, nestable forms for formwork. Fields are declared once,
//! bound to raw input, validated by chains of async validators and rendered
//! to HTML.
//!
//! ## Modules
//!
//! - [`fields`] - field kinds, options and the field factories
//! - [`bound_field`] - a field bound to input, and the view renderers see
//! - [`form`] - the form engine: creation, binding, validation, dispatch
//! - [`validators`] - the async validator contract and the built-in rules
//! - [`widgets`] - HTML inputs and the tag builder
//! - [`render`] - per-field row renderers
//! - [`value`] - parsed field data

pub mod bound_field;
pub mod fields;
pub mod form;
pub mod render;
pub mod validators;
pub mod value;
pub mod widgets;

pub use bound_field::{BoundField, FieldView};
pub use fields::{
    ClassNames, CssClasses, Field, FieldKind, FieldOptions, FieldSpec, LabelFor, Required,
};
pub use form::{BoundEntry, BoundForm, Entry, Form, FormInput, FormOptions, Handlers, Outcome};
pub use render::Renderer;
pub use validators::{Rule, Validator};
pub use value::Value;
pub use widgets::Widget;
