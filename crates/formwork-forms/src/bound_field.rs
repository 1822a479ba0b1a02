//! Bound fields: a field template paired with raw input, parsed data and an
//! error.
//!
//! A [`BoundField`] is created by [`Field::bind`] and owned by the bound
//! form that created it. Validation does not mutate it in place:
//! [`BoundField::validate`] returns the validated replacement.
//!
//! [`FieldView`] is the read-only surface widgets and renderers work
//! against. It is available for bound fields and, with no value and no
//! error, for unbound templates.

use std::sync::{Arc, LazyLock};

use formwork_core::ValidationError;
use serde_json::Value as Raw;

use crate::fields::{ClassNames, Field, LabelFor, Required};
use crate::form::BoundForm;
use crate::render::Renderer;
use crate::validators::{self, Validator};
use crate::value::{is_empty_input, Value};
use crate::widgets::tag::Tag;

static DEFAULT_CLASS_NAMES: LazyLock<ClassNames> = LazyLock::new(ClassNames::default);

/// A field bound to raw input.
#[derive(Debug, Clone)]
pub struct BoundField {
    field: Arc<Field>,
    value: Option<Raw>,
    data: Value,
    error: Option<ValidationError>,
}

impl BoundField {
    pub(crate) fn new(field: Arc<Field>, value: Option<Raw>) -> Self {
        let data = field.parse(value.as_ref());
        Self {
            field,
            value,
            data,
            error: None,
        }
    }

    /// Returns the field template.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// Returns the raw input, `None` when absent.
    pub const fn value(&self) -> Option<&Raw> {
        self.value.as_ref()
    }

    /// Returns the parsed data.
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the error message, `None` when valid or not yet validated.
    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Returns the full validation error.
    pub const fn validation_error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Returns `true` if the field carries no error.
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Validates the field against `form` and returns the validated copy.
    ///
    /// When no validator forces validation and the raw input is empty, the
    /// validator list is skipped: a required field gets exactly one
    /// required check, any other field is valid. Otherwise the validators
    /// run in declaration order and the first failure ends the run.
    pub async fn validate(&self, form: &BoundForm) -> Self {
        let forced = self.field.validators().iter().any(|v| v.force_validation());

        let error = if !forced && is_empty_input(self.value.as_ref()) {
            match self.field.required() {
                Required::No => None,
                Required::Yes => failure(validators::required().validate(form, self).await),
                Required::Custom(validator) => failure(validator.validate(form, self).await),
            }
        } else {
            let mut error = None;
            for validator in self.field.validators() {
                error = failure(validator.validate(form, self).await);
                if error.is_some() {
                    break;
                }
            }
            error
        };

        tracing::trace!(
            field = %self.name(),
            valid = error.is_none(),
            error = error.as_ref().map(|e| e.message.as_str()),
            "field validated"
        );

        Self {
            error,
            ..self.clone()
        }
    }

    /// Returns a view using the default class names.
    pub fn view(&self) -> FieldView<'_> {
        self.view_with(&DEFAULT_CLASS_NAMES)
    }

    /// Returns a view using `class_names`.
    pub fn view_with<'a>(&'a self, class_names: &'a ClassNames) -> FieldView<'a> {
        FieldView {
            field: &self.field,
            value: self.value.as_ref(),
            data: Some(&self.data),
            error: self.error(),
            class_names,
        }
    }

    /// Returns the wrapper classes.
    pub fn classes(&self) -> Vec<String> {
        self.view().classes()
    }

    /// Renders the error message element, or nothing when valid.
    pub fn error_html(&self) -> String {
        self.view().error_html()
    }

    /// Renders the `<label>`.
    pub fn label_html(&self, name: &str, label_for: &LabelFor) -> String {
        self.field.label_html(name, label_for)
    }

    /// Renders the field with `renderer`.
    pub fn to_html(&self, name: &str, renderer: &dyn Renderer) -> String {
        renderer.render(name, &self.view())
    }
}

/// Turns a validator outcome into a stored error. An error whose message
/// renders empty counts as success.
fn failure(outcome: Result<(), ValidationError>) -> Option<ValidationError> {
    let mut err = outcome.err()?;
    if err.message.is_empty() {
        err.message = err.to_string();
    }
    (!err.message.is_empty()).then_some(err)
}

/// What a widget or renderer sees of a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    field: &'a Field,
    value: Option<&'a Raw>,
    data: Option<&'a Value>,
    error: Option<&'a str>,
    class_names: &'a ClassNames,
}

impl<'a> FieldView<'a> {
    pub(crate) fn unbound(field: &'a Field) -> Self {
        Self {
            field,
            value: None,
            data: None,
            error: None,
            class_names: &DEFAULT_CLASS_NAMES,
        }
    }

    /// Returns the field template.
    pub const fn field(&self) -> &'a Field {
        self.field
    }

    /// Returns the raw input.
    pub const fn value(&self) -> Option<&'a Raw> {
        self.value
    }

    /// Returns the parsed data; `None` for an unbound field.
    pub const fn data(&self) -> Option<&'a Value> {
        self.data
    }

    /// Returns the error message.
    pub const fn error(&self) -> Option<&'a str> {
        self.error
    }

    /// Returns `true` if the widget is hidden.
    pub fn is_hidden(&self) -> bool {
        self.field.widget().is_hidden()
    }

    /// Returns the label text for `name`.
    pub fn label_text(&self, name: &str) -> String {
        self.field.label_text(name)
    }

    /// Renders the `<label>` pointing at the field's element id.
    pub fn label_html(&self, name: &str) -> String {
        self.field.label_html(name, &self.field.label_for())
    }

    /// Renders the widget.
    pub fn widget_html(&self, name: &str) -> String {
        self.field.widget().to_html(name, self)
    }

    /// Renders `<p class="error_msg ...">error</p>`, or nothing when there
    /// is no error.
    pub fn error_html(&self) -> String {
        self.error.map_or_else(String::new, |error| {
            Tag::new("p")
                .classes([self.class_names.error_message.as_str()])
                .classes(&self.field.css_classes().error)
                .text(error)
                .to_html()
        })
    }

    /// Returns the wrapper classes: the field class, the error class when
    /// there is an error, the required class when required, then the
    /// declared field classes.
    pub fn classes(&self) -> Vec<String> {
        let mut classes = vec![self.class_names.field.clone()];
        if self.error.is_some() {
            classes.push(self.class_names.error.clone());
        }
        if self.field.is_required() {
            classes.push(self.class_names.required.clone());
        }
        classes.extend(self.field.css_classes().field.iter().cloned());
        classes
    }
}
