//! Per-field renderers.
//!
//! A renderer receives the field's HTML name and its [`FieldView`] and
//! returns the markup of one form row. Any
//! `Fn(&str, &FieldView<'_>) -> String` is a [`Renderer`], so the
//! functions of this module can be passed directly:
//!
//! ```
//! use formwork_forms::fields::{self, FieldOptions};
//! use formwork_forms::{render, Form, FormOptions};
//!
//! let form = Form::create(
//!     [("name", fields::string(FieldOptions::new()))],
//!     FormOptions::default(),
//! );
//! let html = form.to_html(None, &render::li);
//! assert!(html.starts_with(r#"<li class="field">"#));
//! ```

use crate::bound_field::FieldView;
use crate::widgets::tag::Tag;

/// Renders one field row.
pub trait Renderer: Send + Sync {
    /// Renders the field named `name`.
    fn render(&self, name: &str, field: &FieldView<'_>) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&str, &FieldView<'_>) -> String + Send + Sync,
{
    fn render(&self, name: &str, field: &FieldView<'_>) -> String {
        self(name, field)
    }
}

fn wrap(element: &str, name: &str, field: &FieldView<'_>) -> String {
    Tag::new(element)
        .classes(field.classes())
        .html(&field.error_html())
        .html(&field.label_html(name))
        .html(&field.widget_html(name))
        .to_html()
}

/// `<div class="field ...">error label widget</div>`. The default renderer.
pub fn div(name: &str, field: &FieldView<'_>) -> String {
    wrap("div", name, field)
}

/// `<p class="field ...">error label widget</p>`.
pub fn p(name: &str, field: &FieldView<'_>) -> String {
    wrap("p", name, field)
}

/// `<li class="field ...">error label widget</li>`.
pub fn li(name: &str, field: &FieldView<'_>) -> String {
    wrap("li", name, field)
}

/// `<tr class="field ..."><th>label</th><td>error widget</td></tr>`.
pub fn table(name: &str, field: &FieldView<'_>) -> String {
    let th = Tag::new("th").html(&field.label_html(name)).to_html();
    let td = Tag::new("td")
        .html(&field.error_html())
        .html(&field.widget_html(name))
        .to_html();
    Tag::new("tr")
        .classes(field.classes())
        .html(&th)
        .html(&td)
        .to_html()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{self, FieldOptions};
    use crate::widgets::{self, Attrs};
    use crate::{Form, FormOptions};
    use serde_json::{json, Map};

    async fn invalid_form() -> crate::BoundForm {
        let form = Form::create(
            [("email", fields::email(FieldOptions::new().required(true)))],
            FormOptions::default(),
        );
        let mut data = Map::new();
        data.insert("email".into(), json!("nope"));
        let mut bound = form.bind(Some(&data));
        let _ = bound.validate().await;
        bound
    }

    #[tokio::test]
    async fn test_div() {
        let bound = invalid_form().await;
        assert_eq!(
            bound.to_html(None, &div),
            concat!(
                r#"<div class="field error required">"#,
                r#"<p class="error_msg">Please enter a valid email address.</p>"#,
                r#"<label for="id_email">Email</label>"#,
                r#"<input type="email" name="email" id="id_email" value="nope" />"#,
                "</div>"
            )
        );
    }

    #[tokio::test]
    async fn test_p_and_li_wrappers() {
        let bound = invalid_form().await;
        let html = bound.to_html(None, &p);
        assert!(html.starts_with(r#"<p class="field error required"><p class="error_msg">"#));
        assert!(html.ends_with("</p>"));
        let html = bound.to_html(None, &li);
        assert!(html.starts_with(r#"<li class="field error required">"#));
        assert!(html.ends_with("</li>"));
    }

    #[tokio::test]
    async fn test_table() {
        let bound = invalid_form().await;
        assert_eq!(
            bound.to_html(None, &table),
            concat!(
                r#"<tr class="field error required">"#,
                r#"<th><label for="id_email">Email</label></th>"#,
                r#"<td><p class="error_msg">Please enter a valid email address.</p>"#,
                r#"<input type="email" name="email" id="id_email" value="nope" /></td>"#,
                "</tr>"
            )
        );
    }

    #[test]
    fn test_hidden_field_has_no_label() {
        let form = Form::create(
            [(
                "token",
                fields::string(FieldOptions::new().widget(widgets::hidden(Attrs::new()))),
            )],
            FormOptions::default(),
        );
        assert_eq!(
            form.to_html(None, &div),
            r#"<div class="field"><input type="hidden" name="token" id="id_token" /></div>"#
        );
    }

    #[test]
    fn test_closure_renderer() {
        let form = Form::create(
            [("name", fields::string(FieldOptions::new()))],
            FormOptions::default(),
        );
        let bare = |name: &str, field: &FieldView<'_>| field.widget_html(name);
        assert_eq!(
            form.to_html(Some("user"), &bare),
            r#"<input type="text" name="user[name]" id="id_user[name]" />"#
        );
    }
}
