//! Widget catalog for rendering form controls.
//!
//! A widget turns a field name and a [`FieldView`] into a markup fragment.
//! Widgets hold nothing but a fixed attribute map supplied at construction;
//! those attributes are merged into the rendered element after the computed
//! `type`, `name` and `id`, so an `id` attribute overrides the default
//! `id_<name>`.
//!
//! # Examples
//!
//! ```
//! use formwork_forms::widgets::{self, Attrs, Widget};
//!
//! let mut attrs = Attrs::new();
//! attrs.insert("placeholder".into(), "you@example.com".into());
//! let widget = widgets::email(attrs);
//! assert_eq!(widget.input_type(), "email");
//! ```

pub mod tag;

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as Raw;

use crate::bound_field::FieldView;
use crate::value::{is_truthy, to_display_string};
use tag::Tag;

/// Ordered HTML attributes.
pub type Attrs = IndexMap<String, String>;

/// A `(value, label)` option of a select widget.
pub type Choice = (String, String);

/// A renderable form control.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the `type` marker of the control (`"text"`, `"hidden"`,
    /// `"select"`, ...).
    fn input_type(&self) -> &str;

    /// Renders the control for the field named `name`.
    fn to_html(&self, name: &str, field: &FieldView<'_>) -> String;

    /// Returns `true` for controls that are not shown to the user. Labels
    /// are not rendered for hidden controls.
    fn is_hidden(&self) -> bool {
        self.input_type() == "hidden"
    }
}

/// Returns the default element id for a field name.
pub fn default_id(name: &str) -> String {
    format!("id_{name}")
}

fn control(element: &str, name: &str, attrs: &Attrs) -> Tag {
    Tag::new(element)
        .attr("name", name)
        .attr("id", default_id(name))
        .attrs(attrs)
}

fn bound_value(field: &FieldView<'_>) -> Option<String> {
    field
        .value()
        .filter(|raw| !raw.is_null())
        .map(to_display_string)
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// An `<input>` element whose `value` is the string form of the bound raw
/// value.
#[derive(Debug, Clone)]
pub struct Input {
    input_type: &'static str,
    attrs: Attrs,
}

impl Input {
    /// Creates an input of the given `type`.
    pub const fn new(input_type: &'static str, attrs: Attrs) -> Self {
        Self { input_type, attrs }
    }

    /// Returns the fixed attributes.
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

impl Widget for Input {
    fn input_type(&self) -> &str {
        self.input_type
    }

    fn to_html(&self, name: &str, field: &FieldView<'_>) -> String {
        let mut tag = Tag::new("input")
            .attr("type", self.input_type)
            .attr("name", name)
            .attr("id", default_id(name));
        if let Some(value) = bound_value(field) {
            tag = tag.attr("value", value);
        }
        tag.attrs(&self.attrs).to_html()
    }
}

/// `<input type="text">`.
pub const fn text(attrs: Attrs) -> Input {
    Input::new("text", attrs)
}

/// `<input type="email">`.
pub const fn email(attrs: Attrs) -> Input {
    Input::new("email", attrs)
}

/// `<input type="tel">`.
pub const fn tel(attrs: Attrs) -> Input {
    Input::new("tel", attrs)
}

/// `<input type="password">`.
pub const fn password(attrs: Attrs) -> Input {
    Input::new("password", attrs)
}

/// `<input type="hidden">`.
pub const fn hidden(attrs: Attrs) -> Input {
    Input::new("hidden", attrs)
}

/// `<input type="number">`.
pub const fn number(attrs: Attrs) -> Input {
    Input::new("number", attrs)
}

/// `<input type="date">`.
pub const fn date(attrs: Attrs) -> Input {
    Input::new("date", attrs)
}

/// `<input type="url">`.
pub const fn url(attrs: Attrs) -> Input {
    Input::new("url", attrs)
}

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

/// `<input type="checkbox">`, checked when the bound raw value is truthy.
#[derive(Debug, Clone)]
pub struct Checkbox {
    attrs: Attrs,
}

impl Widget for Checkbox {
    fn input_type(&self) -> &str {
        "checkbox"
    }

    fn to_html(&self, name: &str, field: &FieldView<'_>) -> String {
        let mut tag = Tag::new("input")
            .attr("type", "checkbox")
            .attr("name", name)
            .attr("id", default_id(name))
            .attrs(&self.attrs);
        if field.value().is_some_and(is_truthy) {
            tag = tag.flag("checked");
        }
        tag.to_html()
    }
}

/// `<input type="checkbox">`.
pub const fn checkbox(attrs: Attrs) -> Checkbox {
    Checkbox { attrs }
}

// ---------------------------------------------------------------------------
// Textarea
// ---------------------------------------------------------------------------

/// `<textarea>` with the bound value as escaped content.
#[derive(Debug, Clone)]
pub struct Textarea {
    attrs: Attrs,
}

impl Widget for Textarea {
    fn input_type(&self) -> &str {
        "textarea"
    }

    fn to_html(&self, name: &str, field: &FieldView<'_>) -> String {
        control("textarea", name, &self.attrs)
            .text(&bound_value(field).unwrap_or_default())
            .to_html()
    }
}

/// `<textarea>`.
pub const fn textarea(attrs: Attrs) -> Textarea {
    Textarea { attrs }
}

// ---------------------------------------------------------------------------
// Selects
// ---------------------------------------------------------------------------

/// `<select>` with one `<option>` per choice. Options whose value matches
/// the bound value (or any element of a bound array) are `selected`.
#[derive(Debug, Clone)]
pub struct Select {
    choices: Vec<Choice>,
    attrs: Attrs,
    multiple: bool,
}

impl Select {
    /// Returns the choices in display order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}

impl Widget for Select {
    fn input_type(&self) -> &str {
        if self.multiple {
            "multipleSelect"
        } else {
            "select"
        }
    }

    fn to_html(&self, name: &str, field: &FieldView<'_>) -> String {
        let selected: Vec<String> = match field.value() {
            Some(Raw::Array(items)) => items.iter().map(to_display_string).collect(),
            Some(raw) if !raw.is_null() => vec![to_display_string(raw)],
            _ => Vec::new(),
        };

        let options: String = self
            .choices
            .iter()
            .map(|(value, label)| {
                let mut option = Tag::new("option").attr("value", value.as_str());
                if selected.contains(value) {
                    option = option.flag("selected");
                }
                option.text(label).to_html()
            })
            .collect();

        let mut tag = control("select", name, &self.attrs);
        if self.multiple {
            tag = tag.flag("multiple");
        }
        tag.html(&options).to_html()
    }
}

/// `<select>`.
pub const fn select(choices: Vec<Choice>, attrs: Attrs) -> Select {
    Select {
        choices,
        attrs,
        multiple: false,
    }
}

/// `<select multiple>`.
pub const fn multiple_select(choices: Vec<Choice>, attrs: Attrs) -> Select {
    Select {
        choices,
        attrs,
        multiple: true,
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// A `<label>` element.
#[derive(Debug, Clone, Default)]
pub struct Label {
    classes: Vec<String>,
    content: String,
}

impl Label {
    /// Renders the label, pointing at `for_id` when given.
    pub fn to_html(&self, for_id: Option<&str>) -> String {
        let mut tag = Tag::new("label");
        if let Some(id) = for_id {
            tag = tag.attr("for", id);
        }
        tag.classes(&self.classes).text(&self.content).to_html()
    }
}

/// A `<label>` with the given classes and text.
pub fn label(classes: Vec<String>, content: impl Into<String>) -> Label {
    Label {
        classes,
        content: content.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ClassNames;
    use crate::{fields, Form, FormOptions};
    use serde_json::json;

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn render(widget: &dyn Widget, raw: Option<Raw>) -> String {
        let form = Form::create(
            [("f", fields::string(fields::FieldOptions::new()))],
            FormOptions::default(),
        );
        let field = form.field("f").unwrap();
        let bound = field.bind(raw.as_ref());
        let names = ClassNames::default();
        widget.to_html("f", &bound.view_with(&names))
    }

    #[test]
    fn test_text_input_unbound() {
        assert_eq!(
            render(&text(Attrs::new()), None),
            r#"<input type="text" name="f" id="id_f" />"#
        );
    }

    #[test]
    fn test_text_input_value_escaped() {
        assert_eq!(
            render(&text(Attrs::new()), Some(json!("<b>\"x\"</b>"))),
            r#"<input type="text" name="f" id="id_f" value="&lt;b&gt;&quot;x&quot;&lt;/b&gt;" />"#
        );
    }

    #[test]
    fn test_input_null_value_omitted() {
        let html = render(&number(Attrs::new()), Some(json!(null)));
        assert!(!html.contains("value="));
    }

    #[test]
    fn test_input_attrs_override_id() {
        let html = render(
            &email(attrs(&[("id", "signup-email"), ("class", "wide")])),
            Some(json!("a@b.com")),
        );
        assert_eq!(
            html,
            r#"<input type="email" name="f" id="signup-email" value="a@b.com" class="wide" />"#
        );
    }

    #[test]
    fn test_input_types() {
        assert_eq!(tel(Attrs::new()).input_type(), "tel");
        assert_eq!(password(Attrs::new()).input_type(), "password");
        assert_eq!(date(Attrs::new()).input_type(), "date");
        assert_eq!(url(Attrs::new()).input_type(), "url");
        assert!(hidden(Attrs::new()).is_hidden());
        assert!(!text(Attrs::new()).is_hidden());
    }

    #[test]
    fn test_checkbox_checked() {
        let widget = checkbox(Attrs::new());
        assert_eq!(
            render(&widget, Some(json!("on"))),
            r#"<input type="checkbox" name="f" id="id_f" checked />"#
        );
        assert!(!render(&widget, Some(json!(""))).contains("checked"));
        assert!(!render(&widget, None).contains("checked"));
    }

    #[test]
    fn test_textarea() {
        assert_eq!(
            render(&textarea(attrs(&[("rows", "3")])), Some(json!("a < b"))),
            r#"<textarea name="f" id="id_f" rows="3">a &lt; b</textarea>"#
        );
    }

    #[test]
    fn test_select_marks_selected() {
        let widget = select(
            vec![("r".into(), "Red".into()), ("g".into(), "Green".into())],
            Attrs::new(),
        );
        assert_eq!(widget.input_type(), "select");
        assert_eq!(
            render(&widget, Some(json!("g"))),
            concat!(
                r#"<select name="f" id="id_f">"#,
                r#"<option value="r">Red</option>"#,
                r#"<option value="g" selected>Green</option>"#,
                "</select>"
            )
        );
    }

    #[test]
    fn test_multiple_select() {
        let widget = multiple_select(
            vec![
                ("1".into(), "One".into()),
                ("2".into(), "Two".into()),
                ("3".into(), "Three".into()),
            ],
            Attrs::new(),
        );
        let html = render(&widget, Some(json!(["1", 3])));
        assert!(html.starts_with(r#"<select name="f" id="id_f" multiple>"#));
        assert!(html.contains(r#"<option value="1" selected>One</option>"#));
        assert!(html.contains(r#"<option value="2">Two</option>"#));
        assert!(html.contains(r#"<option value="3" selected>Three</option>"#));
    }

    #[test]
    fn test_label() {
        let widget = label(vec!["lbl".into()], "E-mail & phone");
        assert_eq!(
            widget.to_html(Some("id_contact")),
            r#"<label for="id_contact" class="lbl">E-mail &amp; phone</label>"#
        );
        assert_eq!(
            label(Vec::new(), "Name").to_html(None),
            "<label>Name</label>"
        );
    }
}
