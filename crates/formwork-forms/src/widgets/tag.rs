//! A small HTML element builder.
//!
//! Every attribute value and every text child passed through [`Tag`] is
//! escaped; only [`Tag::html`] accepts pre-rendered markup.

use std::fmt;

use formwork_core::utils::text::escape_html;
use indexmap::IndexMap;

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// An HTML element under construction.
///
/// # Examples
///
/// ```
/// use formwork_forms::widgets::tag::Tag;
///
/// let html = Tag::new("input")
///     .attr("type", "text")
///     .attr("value", "a \"quoted\" <value>")
///     .flag("required")
///     .to_html();
/// assert_eq!(
///     html,
///     r#"<input type="text" value="a &quot;quoted&quot; &lt;value&gt;" required />"#
/// );
///
/// let html = Tag::new("p").classes(["error_msg"]).text("Too short").to_html();
/// assert_eq!(html, r#"<p class="error_msg">Too short</p>"#);
/// ```
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
    attrs: IndexMap<String, Option<String>>,
    content: String,
}

impl Tag {
    /// Starts an element named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: IndexMap::new(),
            content: String::new(),
        }
    }

    /// Sets an attribute. Setting an existing attribute replaces its value
    /// but keeps its position.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), Some(value.into()));
        self
    }

    /// Sets every attribute of `attrs`, in order.
    #[must_use]
    pub fn attrs<'a>(mut self, attrs: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (name, value) in attrs {
            self.attrs.insert(name.clone(), Some(value.clone()));
        }
        self
    }

    /// Sets a boolean attribute such as `checked` or `multiple`.
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), None);
        self
    }

    /// Appends classes to the `class` attribute. Empty class names are
    /// skipped, and no attribute is written when nothing remains.
    #[must_use]
    pub fn classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = self
            .attrs
            .get("class")
            .and_then(Clone::clone)
            .map(|existing| vec![existing])
            .unwrap_or_default();
        list.extend(
            classes
                .into_iter()
                .filter(|c| !c.as_ref().is_empty())
                .map(|c| c.as_ref().to_string()),
        );
        if !list.is_empty() {
            self.attrs.insert("class".to_string(), Some(list.join(" ")));
        }
        self
    }

    /// Appends escaped text content.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.content.push_str(&escape_html(text));
        self
    }

    /// Appends pre-rendered markup.
    #[must_use]
    pub fn html(mut self, html: &str) -> Self {
        self.content.push_str(html);
        self
    }

    /// Renders the element.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attrs {
            match value {
                Some(value) => write!(f, r#" {name}="{}""#, escape_html(value))?,
                None => write!(f, " {name}")?,
            }
        }
        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            f.write_str(" />")
        } else {
            write!(f, ">{}</{}>", self.content, self.name)
        }
    }
}
