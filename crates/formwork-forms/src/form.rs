//! The form engine.
//!
//! A [`Form`] is an ordered mapping of names to leaf [`Field`]s or nested
//! forms, created once with [`Form::create`]. Binding raw data produces a
//! [`BoundForm`], which validates its fields concurrently and renders them
//! back to markup.
//!
//! [`Form::handle`] is the one-call entry point: it reads data from an
//! empty input, a plain mapping or a request, binds and validates it, and
//! calls the matching handler.
//!
//! # Examples
//!
//! ```
//! use formwork_forms::fields::{self, FieldOptions};
//! use formwork_forms::{Form, FormInput, FormOptions, Handlers};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let form = Form::create(
//!     [("email", fields::email(FieldOptions::new().required(true)))],
//!     FormOptions::default(),
//! );
//!
//! let input = FormInput::from_value(Some(json!({"email": "a@b.com"}))).unwrap();
//! let outcome = form
//!     .handle(
//!         input,
//!         Handlers::new()
//!             .on_success(|bound| format!("welcome {}", bound.data()["email"]))
//!             .on_other(|_| "try again".to_string()),
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(outcome, "welcome a@b.com");
//! # }
//! ```

use std::sync::Arc;

use formwork_core::logging::handle_span;
use formwork_core::{FormSettings, FormworkError, FormworkResult, ValidationError};
use formwork_http::{qs, BodyParser, FormBodyParser, FormRequest};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use http::Method;
use indexmap::IndexMap;
use serde_json::{Map, Value as Raw};
use tracing::Instrument;

use crate::bound_field::BoundField;
use crate::fields::{ClassNames, Field, FieldSpec};
use crate::render::Renderer;
use crate::value::Value;

/// Options shared by a form and every form nested in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormOptions {
    /// Keep validating after the first failing field and report every
    /// error.
    pub validate_past_first_error: bool,
    /// Class names written by the renderers.
    pub class_names: ClassNames,
}

impl FormOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`validate_past_first_error`](Self::validate_past_first_error).
    #[must_use]
    pub const fn validate_past_first_error(mut self, enabled: bool) -> Self {
        self.validate_past_first_error = enabled;
        self
    }
}

impl From<&FormSettings> for FormOptions {
    fn from(settings: &FormSettings) -> Self {
        Self {
            validate_past_first_error: settings.validate_past_first_error,
            class_names: ClassNames::from(settings),
        }
    }
}

/// An entry of a [`Form`].
#[derive(Debug, Clone)]
pub enum Entry {
    /// A leaf field.
    Field(Arc<Field>),
    /// A nested form.
    Form(Arc<Form>),
}

/// A form template.
#[derive(Debug, Clone)]
pub struct Form {
    entries: IndexMap<String, Entry>,
    options: FormOptions,
}

impl Form {
    /// Creates a form from named specs, in declaration order.
    ///
    /// Each leaf field receives its name here. Plain mappings
    /// ([`FieldSpec::Fields`]) are promoted to nested forms, and every
    /// nested form adopts `options`.
    pub fn create<I, K>(fields: I, options: FormOptions) -> Self
    where
        I: IntoIterator<Item = (K, FieldSpec)>,
        K: Into<String>,
    {
        let entries = fields
            .into_iter()
            .map(|(name, spec)| {
                let name = name.into();
                let entry = match spec {
                    FieldSpec::Field(mut field) => {
                        field.set_name(name.clone());
                        Entry::Field(Arc::new(field))
                    }
                    FieldSpec::Form(form) => Entry::Form(Arc::new(form.with_options(&options))),
                    FieldSpec::Fields(fields) => {
                        Entry::Form(Arc::new(Self::create(fields, options.clone())))
                    }
                };
                (name, entry)
            })
            .collect();

        Self { entries, options }
    }

    fn with_options(mut self, options: &FormOptions) -> Self {
        self.options = options.clone();
        for entry in self.entries.values_mut() {
            if let Entry::Form(nested) = entry {
                *nested = Arc::new(nested.as_ref().clone().with_options(options));
            }
        }
        self
    }

    /// Returns the options.
    pub const fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Iterates the entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Returns the entry named `name`.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Returns the leaf field named `name`.
    pub fn field(&self, name: &str) -> Option<&Arc<Field>> {
        match self.entries.get(name)? {
            Entry::Field(field) => Some(field),
            Entry::Form(_) => None,
        }
    }

    /// Returns the nested form named `name`.
    pub fn form(&self, name: &str) -> Option<&Arc<Self>> {
        match self.entries.get(name)? {
            Entry::Form(form) => Some(form),
            Entry::Field(_) => None,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the form has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds every entry to `data[name]`.
    ///
    /// With no data every field is bound to nothing. A nested form binds to
    /// the nested object, or to nothing when the raw value is not an
    /// object.
    pub fn bind(&self, data: Option<&Map<String, Raw>>) -> BoundForm {
        let entries = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let raw = data.and_then(|data| data.get(name));
                let bound = match entry {
                    Entry::Field(field) => BoundEntry::Field(field.bind(raw)),
                    Entry::Form(form) => BoundEntry::Form(form.bind(raw.and_then(Raw::as_object))),
                };
                (name.clone(), bound)
            })
            .collect();

        tracing::debug!(fields = self.entries.len(), has_data = data.is_some(), "form bound");

        BoundForm {
            entries,
            options: self.options.clone(),
        }
    }

    /// Renders the unbound form. See [`BoundForm::to_html`].
    pub fn to_html(&self, prefix: Option<&str>, renderer: &dyn Renderer) -> String {
        self.bind(None).to_html(prefix, renderer)
    }

    /// Handles `input` with the default body parser.
    ///
    /// See [`handle_with`](Self::handle_with).
    pub async fn handle<R>(
        &self,
        input: FormInput<'_>,
        handlers: Handlers<'_, R>,
    ) -> FormworkResult<R> {
        self.handle_with(input, handlers, &FormBodyParser::default()).await
    }

    /// Handles `input`, parsing request bodies with `parser`.
    ///
    /// - Empty input calls `empty` with the unbound form.
    /// - `GET`/`HEAD` requests bind from the query string.
    /// - `POST`/`PUT`/`PATCH` requests bind from the pre-parsed body when
    ///   there is one, else from the parsed and normalized raw body.
    /// - Data is bound and validated, then `success` or `error` is called.
    ///
    /// A missing handler falls back to `other`.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::UnsupportedMethod`] for any other request
    /// method, [`FormworkError::BodyParse`] when the body cannot be parsed,
    /// and [`FormworkError::MissingHandler`] when neither the needed
    /// handler nor `other` was given. No handler is called in these cases.
    pub async fn handle_with<R>(
        &self,
        input: FormInput<'_>,
        handlers: Handlers<'_, R>,
        parser: &dyn BodyParser,
    ) -> FormworkResult<R> {
        let span = handle_span(input.kind());
        async move {
            let data = match input {
                FormInput::Empty => return self.dispatch_empty(handlers),
                FormInput::Data(data) => data,
                FormInput::Request(request) => read_request(request, parser).await?,
            };
            if data.is_empty() {
                return self.dispatch_empty(handlers);
            }

            let mut bound = self.bind(Some(&data));
            if let Err(err) = bound.validate().await {
                tracing::debug!(errors = %err, "form invalid");
            }
            if bound.is_valid() {
                tracing::debug!(branch = "success", "dispatching form");
                match (handlers.success, handlers.other) {
                    (Some(success), _) => Ok(success(bound)),
                    (None, Some(other)) => Ok(other(Outcome::Valid(bound))),
                    (None, None) => missing_handler("success"),
                }
            } else {
                tracing::debug!(branch = "error", "dispatching form");
                match (handlers.error, handlers.other) {
                    (Some(error), _) => Ok(error(bound)),
                    (None, Some(other)) => Ok(other(Outcome::Invalid(bound))),
                    (None, None) => missing_handler("error"),
                }
            }
        }
        .instrument(span)
        .await
    }

    fn dispatch_empty<R>(&self, handlers: Handlers<'_, R>) -> FormworkResult<R> {
        tracing::debug!(branch = "empty", "dispatching form");
        match (handlers.empty, handlers.other) {
            (Some(empty), _) => Ok(empty(self)),
            (None, Some(other)) => Ok(other(Outcome::Empty(self))),
            (None, None) => missing_handler("empty"),
        }
    }
}

fn missing_handler<R>(outcome: &'static str) -> FormworkResult<R> {
    tracing::warn!(outcome, "no handler for form outcome");
    Err(FormworkError::MissingHandler(outcome))
}

async fn read_request(
    request: &dyn FormRequest,
    parser: &dyn BodyParser,
) -> FormworkResult<Map<String, Raw>> {
    let method = request.method();
    if method == Method::GET || method == Method::HEAD {
        tracing::debug!(%method, "binding from query string");
        Ok(qs::parse(&request.query_string()))
    } else if method == Method::POST || method == Method::PUT || method == Method::PATCH {
        if let Some(body) = request.body() {
            tracing::debug!(%method, "binding from pre-parsed body");
            return Ok(body.clone());
        }
        let parsed = parser.parse(request).await?;
        tracing::debug!(%method, fields = parsed.fields.len(), "binding from parsed body");
        Ok(qs::parse(&qs::stringify(&parsed.fields)))
    } else {
        tracing::warn!(%method, "unsupported request method");
        Err(FormworkError::UnsupportedMethod(method.to_string()))
    }
}

// ============================================================
// Bound forms
// ============================================================

/// An entry of a [`BoundForm`].
#[derive(Debug, Clone)]
pub enum BoundEntry {
    /// A bound leaf field.
    Field(BoundField),
    /// A bound nested form.
    Form(BoundForm),
}

impl BoundEntry {
    /// Returns `true` if the entry, recursively, carries no error.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Field(field) => field.is_valid(),
            Self::Form(form) => form.is_valid(),
        }
    }

    /// Returns the parsed data of the entry.
    pub fn data(&self) -> Value {
        match self {
            Self::Field(field) => field.data().clone(),
            Self::Form(form) => Value::Object(form.data()),
        }
    }

    fn validate<'a>(
        &'a self,
        form: &'a BoundForm,
    ) -> BoxFuture<'a, (Self, Result<(), ValidationError>)> {
        match self {
            Self::Field(field) => async move {
                let validated = field.validate(form).await;
                let outcome = validated.validation_error().cloned().map_or(Ok(()), Err);
                (Self::Field(validated), outcome)
            }
            .boxed(),
            Self::Form(nested) => async move {
                let mut nested = nested.clone();
                let outcome = nested.validate().await;
                (Self::Form(nested), outcome)
            }
            .boxed(),
        }
    }
}

/// A form bound to data.
#[derive(Debug, Clone)]
pub struct BoundForm {
    entries: IndexMap<String, BoundEntry>,
    options: FormOptions,
}

impl BoundForm {
    /// Returns the options.
    pub const fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Iterates the entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BoundEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Returns the entry named `name`.
    pub fn get(&self, name: &str) -> Option<&BoundEntry> {
        self.entries.get(name)
    }

    /// Returns the bound leaf field named `name`.
    pub fn field(&self, name: &str) -> Option<&BoundField> {
        match self.entries.get(name)? {
            BoundEntry::Field(field) => Some(field),
            BoundEntry::Form(_) => None,
        }
    }

    /// Returns the bound nested form named `name`.
    pub fn form(&self, name: &str) -> Option<&Self> {
        match self.entries.get(name)? {
            BoundEntry::Form(form) => Some(form),
            BoundEntry::Field(_) => None,
        }
    }

    /// Returns the parsed data of every entry, in declaration order.
    pub fn data(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.data()))
            .collect()
    }

    /// Validates every entry concurrently.
    ///
    /// Validators see the form as it was before this pass started; each
    /// entry is replaced by its validated copy as it completes, in no
    /// particular order.
    ///
    /// Unless [`FormOptions::validate_past_first_error`] is set, the first
    /// failing entry ends the pass: entries still in flight are dropped and
    /// keep their previous state, and the error names that one entry.
    /// Otherwise every entry is validated and the error collects all of
    /// them. Nested form errors are reported under the nested form's name.
    pub async fn validate(&mut self) -> Result<(), ValidationError> {
        let snapshot = self.clone();
        let past_first_error = self.options.validate_past_first_error;

        let mut pending: FuturesUnordered<_> = snapshot
            .entries
            .iter()
            .map(|(name, entry)| entry.validate(&snapshot).map(move |done| (name, done)))
            .collect();

        let mut failure: Option<ValidationError> = None;
        while let Some((name, (validated, outcome))) = pending.next().await {
            self.entries.insert(name.clone(), validated);
            let Err(err) = outcome else {
                continue;
            };
            let err = ValidationError::for_field(name.clone(), err);
            if !past_first_error {
                tracing::debug!(field = %name, "validation stopped at first error");
                return Err(err);
            }
            match failure.as_mut() {
                Some(all) => all.merge(err),
                None => failure = Some(err),
            }
        }

        tracing::debug!(valid = failure.is_none(), "form validated");
        failure.map_or(Ok(()), Err)
    }

    /// Returns `true` if no field, recursively, carries an error.
    pub fn is_valid(&self) -> bool {
        self.entries.values().all(BoundEntry::is_valid)
    }

    /// Returns every current error as `(html name, message)`, in
    /// declaration order. Nested fields are named `outer[inner]`.
    pub fn errors(&self) -> Vec<(String, String)> {
        let mut errors = Vec::new();
        self.collect_errors(None, &mut errors);
        errors
    }

    fn collect_errors(&self, prefix: Option<&str>, errors: &mut Vec<(String, String)>) {
        for (key, entry) in &self.entries {
            let name = html_name(prefix, key);
            match entry {
                BoundEntry::Field(field) => {
                    if let Some(error) = field.error() {
                        errors.push((name, error.to_string()));
                    }
                }
                BoundEntry::Form(form) => form.collect_errors(Some(&name), errors),
            }
        }
    }

    /// Renders every field in declaration order with `renderer`.
    ///
    /// With a prefix, fields are named `prefix[key]`; nested forms extend
    /// the name, so `{a, b: {c}}` under `f` renders `f[a]` and `f[b][c]`.
    pub fn to_html(&self, prefix: Option<&str>, renderer: &dyn Renderer) -> String {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let name = html_name(prefix, key);
                match entry {
                    BoundEntry::Field(field) => {
                        renderer.render(&name, &field.view_with(&self.options.class_names))
                    }
                    BoundEntry::Form(form) => form.to_html(Some(&name), renderer),
                }
            })
            .collect()
    }
}

fn html_name(prefix: Option<&str>, key: &str) -> String {
    prefix.map_or_else(|| key.to_string(), |prefix| format!("{prefix}[{key}]"))
}

// ============================================================
// Dispatch
// ============================================================

/// What [`Form::handle`] is asked to handle.
pub enum FormInput<'r> {
    /// No input at all.
    Empty,
    /// An incoming request.
    Request(&'r dyn FormRequest),
    /// A mapping of raw values.
    Data(Map<String, Raw>),
}

impl FormInput<'_> {
    /// Classifies a raw value: absent, null or an empty object is
    /// [`Empty`](Self::Empty), any other object is [`Data`](Self::Data).
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::UnsupportedType`] for strings, numbers,
    /// booleans and arrays.
    pub fn from_value(value: Option<Raw>) -> FormworkResult<Self> {
        match value {
            None | Some(Raw::Null) => Ok(Self::Empty),
            Some(Raw::Object(map)) if map.is_empty() => Ok(Self::Empty),
            Some(Raw::Object(map)) => Ok(Self::Data(map)),
            Some(other) => {
                let kind = match other {
                    Raw::Bool(_) => "boolean",
                    Raw::Number(_) => "number",
                    Raw::String(_) => "string",
                    _ => "array",
                };
                tracing::warn!(kind, "unsupported form input");
                Err(FormworkError::UnsupportedType(kind.to_string()))
            }
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Request(_) => "request",
            Self::Data(_) => "data",
        }
    }
}

impl<'r, T: FormRequest> From<&'r T> for FormInput<'r> {
    fn from(request: &'r T) -> Self {
        Self::Request(request)
    }
}

/// The state handed to the `other` handler.
#[derive(Debug)]
pub enum Outcome<'f> {
    /// Empty input; the unbound form.
    Empty(&'f Form),
    /// Bound data that validated.
    Valid(BoundForm),
    /// Bound data with errors.
    Invalid(BoundForm),
}

type EmptyHandler<'h, R> = Box<dyn for<'f> FnOnce(&'f Form) -> R + Send + 'h>;
type BoundHandler<'h, R> = Box<dyn FnOnce(BoundForm) -> R + Send + 'h>;
type OtherHandler<'h, R> = Box<dyn for<'f> FnOnce(Outcome<'f>) -> R + Send + 'h>;

/// The handlers [`Form::handle`] dispatches to.
pub struct Handlers<'h, R> {
    empty: Option<EmptyHandler<'h, R>>,
    success: Option<BoundHandler<'h, R>>,
    error: Option<BoundHandler<'h, R>>,
    other: Option<OtherHandler<'h, R>>,
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self {
            empty: None,
            success: None,
            error: None,
            other: None,
        }
    }
}

impl<'h, R> Handlers<'h, R> {
    /// Creates a set with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the unbound form for empty input.
    #[must_use]
    pub fn on_empty(mut self, handler: impl FnOnce(&Form) -> R + Send + 'h) -> Self {
        self.empty = Some(Box::new(handler));
        self
    }

    /// Called with the bound form when it validates.
    #[must_use]
    pub fn on_success(mut self, handler: impl FnOnce(BoundForm) -> R + Send + 'h) -> Self {
        self.success = Some(Box::new(handler));
        self
    }

    /// Called with the bound form when it has errors.
    #[must_use]
    pub fn on_error(mut self, handler: impl FnOnce(BoundForm) -> R + Send + 'h) -> Self {
        self.error = Some(Box::new(handler));
        self
    }

    /// Called for any outcome without its own handler.
    #[must_use]
    pub fn on_other(mut self, handler: impl FnOnce(Outcome<'_>) -> R + Send + 'h) -> Self {
        self.other = Some(Box::new(handler));
        self
    }
}
