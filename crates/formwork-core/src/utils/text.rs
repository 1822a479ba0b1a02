//! String utility functions.
//!
//! Label derivation for form fields and HTML escaping for rendered markup.

use regex::Regex;
use std::sync::OnceLock;

/// Returns `s` with its first character upper-cased.
///
/// # Examples
///
/// ```
/// use formwork_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("hello"), "Hello");
/// assert_eq!(capfirst(""), "");
/// assert_eq!(capfirst("HELLO"), "HELLO");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        let mut result = c.to_uppercase().to_string();
        result.extend(chars);
        result
    })
}

/// Derives a human-readable label from a field name.
///
/// The first character is capitalized and kept as is. In the rest, `_`
/// and `-` become spaces and every lower-case letter followed by an
/// upper-case letter is split, with the upper-case letter lowered.
///
/// # Examples
///
/// ```
/// use formwork_core::utils::text::humanize_name;
///
/// assert_eq!(humanize_name("first_name"), "First name");
/// assert_eq!(humanize_name("date-of-birth"), "Date of birth");
/// assert_eq!(humanize_name("emailAddress"), "Email address");
/// assert_eq!(humanize_name("_id"), "_id");
/// ```
pub fn humanize_name(name: &str) -> String {
    static CAMEL_RE: OnceLock<Regex> = OnceLock::new();
    let camel_re = CAMEL_RE.get_or_init(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().replace(['_', '-'], " ");
    let rest = camel_re.replace_all(&rest, |caps: &regex::Captures<'_>| {
        format!("{} {}", &caps[1], caps[2].to_lowercase())
    });
    capfirst(&format!("{first}{rest}"))
}

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their entity equivalents.
///
/// # Examples
///
/// ```
/// use formwork_core::utils::text::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── capfirst ─────────────────────────────────────────────────────

    #[test]
    fn test_capfirst_unicode() {
        assert_eq!(capfirst("élan"), "Élan");
    }

    // ── humanize_name ────────────────────────────────────────────────

    #[test]
    fn test_humanize_simple() {
        assert_eq!(humanize_name("name"), "Name");
    }

    #[test]
    fn test_humanize_separators() {
        assert_eq!(humanize_name("some_field-name"), "Some field name");
    }

    #[test]
    fn test_humanize_camel_case() {
        assert_eq!(humanize_name("phoneNumberHome"), "Phone number home");
    }

    #[test]
    fn test_humanize_leading_capital_kept() {
        assert_eq!(humanize_name("URL"), "URL");
    }

    #[test]
    fn test_humanize_leading_separator_kept() {
        assert_eq!(humanize_name("_id"), "_id");
        assert_eq!(humanize_name("-x_y"), "-x y");
    }

    #[test]
    fn test_humanize_empty() {
        assert_eq!(humanize_name(""), "");
    }

    // ── escape_html ──────────────────────────────────────────────────

    #[test]
    fn test_escape_ampersand_first() {
        assert_eq!(escape_html("a & <b>"), "a &amp; &lt;b&gt;");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_html("it's \"x\""), "it&#x27;s &quot;x&quot;");
    }

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape_html("plain"), "plain");
    }
}
