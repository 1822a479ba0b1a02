//! Field descriptors and the field factory.
//!
//! A [`Field`] is an immutable template: its kind (which decides how raw
//! input is parsed), its widget, its validators, whether it is required,
//! and its label and CSS classes. [`Form::create`](crate::Form::create)
//! assigns the field's name and freezes it behind an [`Arc`]; every
//! [`bind`](Field::bind) then produces an independent [`BoundField`].
//!
//! The factory functions ([`string`], [`number`], [`email`], ...) take a
//! [`FieldOptions`] and return a [`FieldSpec`] ready for composition.
//!
//! # Examples
//!
//! ```
//! use formwork_forms::fields::{self, FieldOptions};
//! use formwork_forms::{validators, Form, FormOptions};
//!
//! let form = Form::create(
//!     [
//!         ("username", fields::string(FieldOptions::new().required(true))),
//!         ("email", fields::email(FieldOptions::new())),
//!         ("age", fields::number(FieldOptions::new().validator(validators::min(18.0)))),
//!     ],
//!     FormOptions::default(),
//! );
//! assert_eq!(form.field("email").unwrap().widget().input_type(), "email");
//! ```

use std::fmt;
use std::sync::Arc;

use formwork_core::utils::text::humanize_name;
use formwork_core::FormSettings;
use serde_json::Value as Raw;

use crate::bound_field::{BoundField, FieldView};
use crate::form::{Form, FormOptions};
use crate::render::Renderer;
use crate::validators::{self, Validator};
use crate::value::{is_truthy, to_display_string, to_number, Value};
use crate::widgets::{self, Attrs, Widget};

/// How raw input is parsed into a field's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    String,
    /// A number; empty input parses to NaN.
    Number,
    /// A truthiness flag.
    Boolean,
    /// An email address.
    Email,
    /// A telephone number.
    Tel,
    /// A password.
    Password,
    /// A URL.
    Url,
    /// A `yyyy-mm-dd` date.
    Date,
    /// A list of raw values.
    Array,
}

impl FieldKind {
    /// Parses raw input. Never fails: absent, null or empty input yields
    /// the kind's empty value.
    pub fn parse(self, raw: Option<&Raw>) -> Value {
        match self {
            Self::Number => match raw {
                None | Some(Raw::Null) => Value::Number(f64::NAN),
                Some(Raw::String(s)) if s.is_empty() => Value::Number(f64::NAN),
                Some(raw) => Value::Number(to_number(raw)),
            },
            Self::Boolean => Value::Bool(raw.is_some_and(is_truthy)),
            Self::Array => match raw {
                None | Some(Raw::Null) => Value::List(Vec::new()),
                Some(Raw::Array(items)) => Value::List(items.clone()),
                Some(other) => Value::List(vec![other.clone()]),
            },
            Self::String | Self::Email | Self::Tel | Self::Password | Self::Url | Self::Date => {
                match raw {
                    None | Some(Raw::Null) => Value::Text(String::new()),
                    Some(raw) => Value::Text(to_display_string(raw)),
                }
            }
        }
    }
}

/// Whether a field must be filled in, and how that is checked.
#[derive(Clone, Default)]
pub enum Required {
    /// Empty input is valid.
    #[default]
    No,
    /// Empty input fails the built-in [`validators::required`] check.
    Yes,
    /// Empty input is checked by this validator instead.
    Custom(Arc<dyn Validator>),
}

impl Required {
    /// Returns `true` unless this is [`Required::No`].
    pub const fn is_required(&self) -> bool {
        !matches!(self, Self::No)
    }
}

impl fmt::Debug for Required {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No => f.write_str("No"),
            Self::Yes => f.write_str("Yes"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Extra CSS classes declared for a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssClasses {
    /// Added to the field's wrapper element.
    pub field: Vec<String>,
    /// Added to the field's `<label>`.
    pub label: Vec<String>,
    /// Added to the field's error message element.
    pub error: Vec<String>,
}

/// The class names the rendering helpers write for field state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    /// Always present on a field wrapper.
    pub field: String,
    /// Present when the field has an error.
    pub error: String,
    /// Present when the field is required.
    pub required: String,
    /// The class of the error message element.
    pub error_message: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::from(&FormSettings::default())
    }
}

impl From<&FormSettings> for ClassNames {
    fn from(settings: &FormSettings) -> Self {
        Self {
            field: settings.field_class.clone(),
            error: settings.error_class.clone(),
            required: settings.required_class.clone(),
            error_message: settings.error_message_class.clone(),
        }
    }
}

/// Where a `<label>` points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelFor {
    /// `id_<name>`.
    #[default]
    Default,
    /// An explicit element id.
    Id(String),
    /// No `for` attribute.
    None,
}

impl LabelFor {
    fn resolve(&self, name: &str) -> Option<String> {
        match self {
            Self::Default => Some(widgets::default_id(name)),
            Self::Id(id) => Some(id.clone()),
            Self::None => None,
        }
    }
}

/// Options accepted by every field constructor.
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// Attributes given to the default widget.
    pub attrs: Attrs,
    /// Replaces the kind's default widget.
    pub widget: Option<Arc<dyn Widget>>,
    /// Replaces the label derived from the field name.
    pub label: Option<String>,
    /// Whether empty input is an error.
    pub required: Required,
    /// Validators run, in order, on non-empty input.
    pub validators: Vec<Arc<dyn Validator>>,
    /// Extra CSS classes.
    pub css_classes: CssClasses,
}

impl FieldOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute for the default widget.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Sets the widget.
    #[must_use]
    pub fn widget(mut self, widget: impl Widget + 'static) -> Self {
        self.widget = Some(Arc::new(widget));
        self
    }

    /// Sets the label text.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the field required (or not) with the built-in check.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = if required { Required::Yes } else { Required::No };
        self
    }

    /// Marks the field required, checked by `validator`.
    #[must_use]
    pub fn required_by(mut self, validator: impl Validator + 'static) -> Self {
        self.required = Required::Custom(Arc::new(validator));
        self
    }

    /// Appends a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Sets the extra CSS classes.
    #[must_use]
    pub fn css_classes(mut self, css_classes: CssClasses) -> Self {
        self.css_classes = css_classes;
        self
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("attrs", &self.attrs)
            .field("widget", &self.widget)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .field("css_classes", &self.css_classes)
            .finish()
    }
}

/// An immutable field template.
#[derive(Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    widget: Arc<dyn Widget>,
    validators: Vec<Arc<dyn Validator>>,
    required: Required,
    label: Option<String>,
    attrs: Attrs,
    css_classes: CssClasses,
}

impl Field {
    /// Creates an unnamed field of `kind`.
    ///
    /// Email, tel and password fields default to their own input types and
    /// boolean fields to a checkbox; everything else defaults to a text
    /// input. Email, URL and date fields get their format validator placed
    /// before any declared validator.
    pub fn new(kind: FieldKind, options: FieldOptions) -> Self {
        let FieldOptions {
            attrs,
            widget,
            label,
            required,
            mut validators,
            css_classes,
        } = options;

        let widget = widget.unwrap_or_else(|| -> Arc<dyn Widget> {
            let attrs = attrs.clone();
            match kind {
                FieldKind::Email => Arc::new(widgets::email(attrs)),
                FieldKind::Tel => Arc::new(widgets::tel(attrs)),
                FieldKind::Password => Arc::new(widgets::password(attrs)),
                FieldKind::Boolean => Arc::new(widgets::checkbox(attrs)),
                _ => Arc::new(widgets::text(attrs)),
            }
        });

        let format: Option<Arc<dyn Validator>> = match kind {
            FieldKind::Email => Some(Arc::new(validators::email())),
            FieldKind::Url => Some(Arc::new(validators::url())),
            FieldKind::Date => Some(Arc::new(validators::date())),
            _ => None,
        };
        if let Some(format) = format {
            validators.insert(0, format);
        }

        Self {
            name: String::new(),
            kind,
            widget,
            validators,
            required,
            label,
            attrs,
            css_classes,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Returns the name assigned at form creation (empty before).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field kind.
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the widget.
    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    /// Returns the validators in run order.
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    /// Returns the required setting.
    pub const fn required(&self) -> &Required {
        &self.required
    }

    /// Returns `true` if empty input is an error.
    pub const fn is_required(&self) -> bool {
        self.required.is_required()
    }

    /// Returns the explicit label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the attributes given at construction.
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Returns the extra CSS classes.
    pub const fn css_classes(&self) -> &CssClasses {
        &self.css_classes
    }

    /// Parses raw input according to the field kind.
    pub fn parse(&self, raw: Option<&Raw>) -> Value {
        self.kind.parse(raw)
    }

    /// Binds raw input, producing a new, unvalidated bound field.
    pub fn bind(self: &Arc<Self>, raw: Option<&Raw>) -> BoundField {
        BoundField::new(Arc::clone(self), raw.cloned())
    }

    /// Returns the label text: the explicit label, else `name` humanized
    /// (`first_name` and `firstName` both give "First name").
    pub fn label_text(&self, name: &str) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => humanize_name(name),
        }
    }

    /// Returns where this field's label points: the `id` attribute when one
    /// was given, else the default id.
    pub fn label_for(&self) -> LabelFor {
        self.attrs
            .get("id")
            .map_or(LabelFor::Default, |id| LabelFor::Id(id.clone()))
    }

    /// Renders the `<label>`, or nothing for hidden widgets.
    pub fn label_html(&self, name: &str, label_for: &LabelFor) -> String {
        if self.widget.is_hidden() {
            return String::new();
        }
        widgets::label(self.css_classes.label.clone(), self.label_text(name))
            .to_html(label_for.resolve(name).as_deref())
    }

    /// Returns an unbound view of this field.
    pub fn view(&self) -> FieldView<'_> {
        FieldView::unbound(self)
    }

    /// Returns the wrapper classes of the unbound field.
    pub fn classes(&self) -> Vec<String> {
        self.view().classes()
    }

    /// Renders the unbound field with `renderer`.
    pub fn to_html(&self, name: &str, renderer: &dyn Renderer) -> String {
        renderer.render(name, &self.view())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("widget", &self.widget)
            .field("validators", &self.validators.len())
            .field("required", &self.required)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// An entry passed to [`Form::create`].
#[derive(Debug, Clone)]
pub enum FieldSpec {
    /// A leaf field.
    Field(Field),
    /// A nested form.
    Form(Form),
    /// A plain mapping, promoted to a nested form at creation.
    Fields(Vec<(String, FieldSpec)>),
}

impl FieldSpec {
    /// Builds a plain mapping of named specs.
    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Fields(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Field> for FieldSpec {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Form> for FieldSpec {
    fn from(form: Form) -> Self {
        Self::Form(form)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// A text field.
pub fn string(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::String, options).into()
}

/// A number field. Empty input parses to NaN.
pub fn number(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Number, options).into()
}

/// A boolean field rendered as a checkbox.
pub fn boolean(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Boolean, options).into()
}

/// An email field, validated by [`validators::email`] first.
pub fn email(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Email, options).into()
}

/// A telephone field.
pub fn tel(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Tel, options).into()
}

/// A password field.
pub fn password(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Password, options).into()
}

/// A URL field, validated by [`validators::url`] first.
pub fn url(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Url, options).into()
}

/// A date field, validated by [`validators::date`] first.
pub fn date(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Date, options).into()
}

/// A field whose data is a list of raw values.
pub fn array(options: FieldOptions) -> FieldSpec {
    Field::new(FieldKind::Array, options).into()
}

/// A nested form.
pub fn object<I, K>(fields: I) -> FieldSpec
where
    I: IntoIterator<Item = (K, FieldSpec)>,
    K: Into<String>,
{
    Form::create(fields, FormOptions::default()).into()
}
