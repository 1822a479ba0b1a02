//! Asynchronous field validators.
//!
//! A [`Validator`] inspects a bound field, and optionally the whole bound
//! form, and completes once with `Ok(())` or a [`ValidationError`] whose
//! message becomes the field's error.
//!
//! The built-in rules are constructed by the functions of this module
//! ([`required`], [`email`], [`min`], ...) and return a [`Rule`] whose
//! message can be replaced with [`Rule::with_message`]. A `%s` in a
//! message is substituted, in order, with the rule's arguments.
//!
//! Closures become validators through [`from_fn`] and [`from_async_fn`].
//!
//! # Examples
//!
//! ```
//! use formwork_forms::validators;
//!
//! let rule = validators::min_length(8).with_message("Use %s characters or more.");
//! assert_eq!(rule.message(), "Use 8 characters or more.");
//! ```

use std::future::Future;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use formwork_core::ValidationError;
use regex::{Regex, RegexBuilder};
use url::{Host, Url};

use crate::bound_field::BoundField;
use crate::form::BoundForm;
use crate::value::Value;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"^[\w!#$%&'*+\-/=?^`{|}~]+(?:\.[\w!#$%&'*+\-/=?^`{|}~]+)*@(?:(?:[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4]\d|[01]?\d{1,2})\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d{1,2})\])$",
    )
    .case_insensitive(true)
    .build()
    .expect("EMAIL_REGEX: invalid regex pattern")
});

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("DATE_REGEX: invalid regex pattern")
});

static COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("COLOR_REGEX: invalid regex pattern")
});

static ALPHANUMERIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]*$").expect("ALPHANUMERIC_REGEX: invalid regex pattern")
});

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("DIGITS_REGEX: invalid regex pattern"));

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("INTEGER_REGEX: invalid regex pattern"));

/// An asynchronous check of one bound field.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validates `field`. `form` is the bound form the field belongs to, as
    /// it was when the validation pass started.
    async fn validate(&self, form: &BoundForm, field: &BoundField) -> Result<(), ValidationError>;

    /// Returns `true` if the validator must run even when the field's raw
    /// input is empty.
    fn force_validation(&self) -> bool {
        false
    }
}

// ============================================================
// Built-in rules
// ============================================================

#[derive(Debug, Clone)]
enum RuleKind {
    Required,
    Email,
    Url { include_localhost: bool },
    Date,
    MatchField(String),
    Min(f64),
    Max(f64),
    Range(f64, f64),
    MinLength(usize),
    MaxLength(usize),
    RangeLength(usize, usize),
    Regexp(Regex),
    Color,
    Alphanumeric,
    Digits,
    Integer,
}

impl RuleKind {
    const fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "invalid_email",
            Self::Url { .. } => "invalid_url",
            Self::Date => "invalid_date",
            Self::MatchField(_) => "mismatch",
            Self::Min(_) => "min_value",
            Self::Max(_) => "max_value",
            Self::Range(..) => "range",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::RangeLength(..) => "range_length",
            Self::Regexp(_) => "invalid_format",
            Self::Color => "invalid_color",
            Self::Alphanumeric => "alphanumeric",
            Self::Digits => "digits",
            Self::Integer => "integer",
        }
    }

    const fn default_message(&self) -> &'static str {
        match self {
            Self::Required => "%s is required.",
            Self::Email => "Please enter a valid email address.",
            Self::Url { .. } => "Please enter a valid URL.",
            Self::Date => r#"Inputs of type "date" must be valid dates in the format "yyyy-mm-dd""#,
            Self::MatchField(_) => "Does not match %s.",
            Self::Min(_) => "Please enter a value greater than or equal to %s.",
            Self::Max(_) => "Please enter a value less than or equal to %s.",
            Self::Range(..) => "Please enter a value between %s and %s.",
            Self::MinLength(_) => "Please enter at least %s characters.",
            Self::MaxLength(_) => "Please enter no more than %s characters.",
            Self::RangeLength(..) => "Please enter a value between %s and %s characters long.",
            Self::Regexp(_) => "Invalid format.",
            Self::Color => {
                r##"Inputs of type "color" require hex notation, e.g. "#FFF" or "#ABCDEF"."##
            }
            Self::Alphanumeric => "Letters and numbers only.",
            Self::Digits => "Numbers only.",
            Self::Integer => "Please enter an integer value.",
        }
    }

    /// The values substituted for `%s`, except for `required`, whose
    /// argument is the field's label.
    fn args(&self) -> Vec<String> {
        let num = |n: f64| Value::Number(n).to_string();
        match self {
            Self::MatchField(other) => vec![other.clone()],
            Self::Min(n) | Self::Max(n) => vec![num(*n)],
            Self::Range(lo, hi) => vec![num(*lo), num(*hi)],
            Self::MinLength(n) | Self::MaxLength(n) => vec![n.to_string()],
            Self::RangeLength(lo, hi) => vec![lo.to_string(), hi.to_string()],
            _ => Vec::new(),
        }
    }

    fn check(&self, form: &BoundForm, field: &BoundField) -> bool {
        let data = field.data();
        let text = || data.to_string();
        match self {
            Self::Required => !is_empty_data(data),
            Self::Email => EMAIL_REGEX.is_match(&text()),
            Self::Url { include_localhost } => is_valid_url(&text(), *include_localhost),
            Self::Date => is_valid_date(&text()),
            Self::MatchField(other) => form.field(other).is_some_and(|o| o.data() == data),
            Self::Min(n) => data.to_number() >= *n,
            Self::Max(n) => data.to_number() <= *n,
            Self::Range(lo, hi) => {
                let value = data.to_number();
                value >= *lo && value <= *hi
            }
            Self::MinLength(n) => data.length().is_some_and(|len| len >= *n),
            Self::MaxLength(n) => data.length().is_some_and(|len| len <= *n),
            Self::RangeLength(lo, hi) => data.length().is_some_and(|len| len >= *lo && len <= *hi),
            Self::Regexp(re) => re.is_match(&text()),
            Self::Color => COLOR_REGEX.is_match(&text()),
            Self::Alphanumeric => ALPHANUMERIC_REGEX.is_match(&text()),
            Self::Digits => DIGITS_REGEX.is_match(&text()),
            Self::Integer => INTEGER_REGEX.is_match(&text()),
        }
    }
}

/// A built-in validation rule.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    message: Option<String>,
}

impl Rule {
    const fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Replaces the default message. `%s` placeholders are substituted as
    /// in the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the short code reported with failures (e.g. `"min_length"`).
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the failure message with the rule's own arguments
    /// substituted.
    pub fn message(&self) -> String {
        format_message(self.template(), &self.kind.args())
    }

    fn template(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    fn error(&self, field: &BoundField) -> ValidationError {
        let args = match self.kind {
            RuleKind::Required => vec![field.field().label_text(field.field().name())],
            _ => self.kind.args(),
        };
        let mut err = ValidationError::new(format_message(self.template(), &args), self.code());
        for (i, arg) in args.into_iter().enumerate() {
            err = err.with_param(format!("arg{i}"), arg);
        }
        err
    }
}

#[async_trait]
impl Validator for Rule {
    async fn validate(&self, form: &BoundForm, field: &BoundField) -> Result<(), ValidationError> {
        if self.kind.check(form, field) {
            Ok(())
        } else {
            Err(self.error(field))
        }
    }
}

/// Fails when the field's data is empty. Its message receives the field's
/// label text.
pub const fn required() -> Rule {
    Rule::new(RuleKind::Required)
}

/// Requires a syntactically valid email address.
pub const fn email() -> Rule {
    Rule::new(RuleKind::Email)
}

/// Requires an `http`, `https`, `ftp` or `ftps` URL with a dotted domain
/// name or an IP address. A missing scheme is read as `http://`.
pub const fn url() -> Rule {
    Rule::new(RuleKind::Url {
        include_localhost: false,
    })
}

/// Like [`url`], optionally also accepting the host `localhost`.
pub const fn url_with_localhost(include_localhost: bool) -> Rule {
    Rule::new(RuleKind::Url { include_localhost })
}

/// Requires a real calendar date written as `yyyy-mm-dd`.
pub const fn date() -> Rule {
    Rule::new(RuleKind::Date)
}

/// Requires the data to equal the data of the field named `other`.
pub fn match_field(other: impl Into<String>) -> Rule {
    Rule::new(RuleKind::MatchField(other.into()))
}

/// Requires a numeric value of at least `n`.
pub const fn min(n: f64) -> Rule {
    Rule::new(RuleKind::Min(n))
}

/// Requires a numeric value of at most `n`.
pub const fn max(n: f64) -> Rule {
    Rule::new(RuleKind::Max(n))
}

/// Requires a numeric value within `lo..=hi`.
pub const fn range(lo: f64, hi: f64) -> Rule {
    Rule::new(RuleKind::Range(lo, hi))
}

/// Requires at least `n` characters (or list elements).
pub const fn min_length(n: usize) -> Rule {
    Rule::new(RuleKind::MinLength(n))
}

/// Requires at most `n` characters (or list elements).
pub const fn max_length(n: usize) -> Rule {
    Rule::new(RuleKind::MaxLength(n))
}

/// Requires a length within `lo..=hi`.
pub const fn range_length(lo: usize, hi: usize) -> Rule {
    Rule::new(RuleKind::RangeLength(lo, hi))
}

/// Requires the string form of the data to match `pattern`.
pub fn regexp(pattern: Regex) -> Rule {
    Rule::new(RuleKind::Regexp(pattern))
}

/// Requires a hex color, `#rgb` or `#rrggbb`.
pub const fn color() -> Rule {
    Rule::new(RuleKind::Color)
}

/// Allows ASCII letters and digits only.
pub const fn alphanumeric() -> Rule {
    Rule::new(RuleKind::Alphanumeric)
}

/// Allows ASCII digits only.
pub const fn digits() -> Rule {
    Rule::new(RuleKind::Digits)
}

/// Requires an optionally negative integer.
pub const fn integer() -> Rule {
    Rule::new(RuleKind::Integer)
}

// ============================================================
// Closures
// ============================================================

/// A validator backed by a synchronous closure. See [`from_fn`].
pub struct FnValidator<F> {
    f: F,
}

/// Wraps a synchronous predicate.
///
/// # Examples
///
/// ```
/// use formwork_core::ValidationError;
/// use formwork_forms::validators;
///
/// let no_admin = validators::from_fn(|_form, field| {
///     if field.data().as_str() == Some("admin") {
///         Err(ValidationError::invalid("That name is reserved."))
///     } else {
///         Ok(())
///     }
/// });
/// # let _ = no_admin;
/// ```
pub fn from_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&BoundForm, &BoundField) -> Result<(), ValidationError> + Send + Sync,
{
    FnValidator { f }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&BoundForm, &BoundField) -> Result<(), ValidationError> + Send + Sync,
{
    async fn validate(&self, form: &BoundForm, field: &BoundField) -> Result<(), ValidationError> {
        (self.f)(form, field)
    }
}

/// A validator backed by an asynchronous closure. See [`from_async_fn`].
pub struct AsyncFnValidator<F> {
    f: F,
}

/// Wraps an asynchronous check. The closure receives owned copies of the
/// bound form and field so the returned future can outlive the call.
///
/// # Examples
///
/// ```
/// use formwork_core::ValidationError;
/// use formwork_forms::validators;
///
/// let available = validators::from_async_fn(|_form, field| async move {
///     let taken = ["alice", "bob"];
///     match field.data().as_str() {
///         Some(name) if taken.contains(&name) => {
///             Err(ValidationError::new("Username is taken.", "taken"))
///         }
///         _ => Ok(()),
///     }
/// });
/// # let _ = available;
/// ```
pub fn from_async_fn<F, Fut>(f: F) -> AsyncFnValidator<F>
where
    F: Fn(BoundForm, BoundField) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ValidationError>> + Send,
{
    AsyncFnValidator { f }
}

#[async_trait]
impl<F, Fut> Validator for AsyncFnValidator<F>
where
    F: Fn(BoundForm, BoundField) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ValidationError>> + Send,
{
    async fn validate(&self, form: &BoundForm, field: &BoundField) -> Result<(), ValidationError> {
        (self.f)(form.clone(), field.clone()).await
    }
}

/// A validator that runs even when the field's raw input is empty.
pub struct Forced<V> {
    inner: V,
}

/// Marks `validator` as force-validating.
pub fn forced<V: Validator>(validator: V) -> Forced<V> {
    Forced { inner: validator }
}

#[async_trait]
impl<V: Validator> Validator for Forced<V> {
    async fn validate(&self, form: &BoundForm, field: &BoundField) -> Result<(), ValidationError> {
        self.inner.validate(form, field).await
    }

    fn force_validation(&self) -> bool {
        true
    }
}

// ============================================================
// Helpers
// ============================================================

/// Substitutes each `%s` in `template` with the next argument. Surplus
/// placeholders are left as they are.
fn format_message(template: &str, args: &[String]) -> String {
    let mut args = args.iter();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

fn is_empty_data(data: &Value) -> bool {
    match data {
        Value::Text(s) => s.is_empty(),
        Value::Number(n) => n.is_nan(),
        Value::Bool(b) => !b,
        Value::List(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn is_valid_url(value: &str, include_localhost: bool) -> bool {
    let parsed = match Url::parse(value) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{value}")),
        Err(e) => Err(e),
    };
    let Ok(url) = parsed else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https" | "ftp" | "ftps") {
        return false;
    }
    match url.host() {
        Some(Host::Domain("localhost")) => include_localhost,
        Some(Host::Domain(domain)) => domain.rsplit_once('.').is_some_and(|(name, tld)| {
            !name.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_valid_date(value: &str) -> bool {
    DATE_REGEX.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{self, FieldOptions};
    use crate::form::{Form, FormOptions};
    use crate::FieldSpec;
    use serde_json::{json, Map};

    fn bind(specs: Vec<(&str, FieldSpec)>, data: serde_json::Value) -> BoundForm {
        let form = Form::create(specs, FormOptions::default());
        let map: Map<String, serde_json::Value> = data.as_object().cloned().unwrap_or_default();
        form.bind(Some(&map))
    }

    async fn run(rule: &Rule, value: serde_json::Value) -> Result<(), ValidationError> {
        let form = bind(vec![("f", fields::string(FieldOptions::new()))], json!({ "f": value }));
        let field = form.field("f").unwrap();
        rule.validate(&form, field).await
    }

    async fn run_number(rule: &Rule, value: serde_json::Value) -> Result<(), ValidationError> {
        let form = bind(vec![("n", fields::number(FieldOptions::new()))], json!({ "n": value }));
        let field = form.field("n").unwrap();
        rule.validate(&form, field).await
    }

    // ── Message formatting ──────────────────────────────────────────

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message("between %s and %s", &["1".into(), "2".into()]),
            "between 1 and 2"
        );
        assert_eq!(format_message("no args", &[]), "no args");
        assert_eq!(format_message("%s and %s", &["x".into()]), "x and %s");
    }

    #[test]
    fn test_rule_messages() {
        assert_eq!(range(1.0, 10.5).message(), "Please enter a value between 1 and 10.5.");
        assert_eq!(
            range_length(2, 4).message(),
            "Please enter a value between 2 and 4 characters long."
        );
        assert_eq!(match_field("password").message(), "Does not match password.");
        assert_eq!(min_length(3).code(), "min_length");
    }

    // ── Required ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_required_uses_label_text() {
        let form = bind(
            vec![("first_name", fields::string(FieldOptions::new()))],
            json!({ "first_name": "" }),
        );
        let field = form.field("first_name").unwrap();
        let err = required().validate(&form, field).await.unwrap_err();
        assert_eq!(err.message, "First name is required.");
        assert_eq!(err.code, "required");
    }

    #[tokio::test]
    async fn test_required_custom_message() {
        let err = run(&required().with_message("Fill in %s!"), json!(""))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Fill in F!");
    }

    #[tokio::test]
    async fn test_required_passes_for_data() {
        assert!(run(&required(), json!("x")).await.is_ok());
    }

    // ── Formats ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_email() {
        assert!(run(&email(), json!("a@b.com")).await.is_ok());
        assert!(run(&email(), json!("first.last+tag@mail.example.org")).await.is_ok());
        assert!(run(&email(), json!("user@[192.168.0.1]")).await.is_ok());
        let err = run(&email(), json!("not-an-email")).await.unwrap_err();
        assert_eq!(err.message, "Please enter a valid email address.");
        assert!(run(&email(), json!("a@b")).await.is_err());
        assert!(run(&email(), json!("a b@c.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_url() {
        assert!(run(&url(), json!("http://example.com")).await.is_ok());
        assert!(run(&url(), json!("https://www.example.co.uk/path?q=1#top")).await.is_ok());
        assert!(run(&url(), json!("example.com/page")).await.is_ok());
        assert!(run(&url(), json!("http://127.0.0.1:8080/")).await.is_ok());
        assert!(run(&url(), json!("mailto:a@b.com")).await.is_err());
        assert!(run(&url(), json!("not a url")).await.is_err());
        assert!(run(&url(), json!("http://intranet")).await.is_err());
    }

    #[tokio::test]
    async fn test_url_localhost() {
        assert!(run(&url(), json!("http://localhost:3000")).await.is_err());
        assert!(run(&url_with_localhost(true), json!("http://localhost:3000"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_date() {
        assert!(run(&date(), json!("2024-02-29")).await.is_ok());
        assert!(run(&date(), json!("2023-02-29")).await.is_err());
        assert!(run(&date(), json!("2024-2-1")).await.is_err());
        let err = run(&date(), json!("yesterday")).await.unwrap_err();
        assert_eq!(
            err.message,
            r#"Inputs of type "date" must be valid dates in the format "yyyy-mm-dd""#
        );
    }

    #[tokio::test]
    async fn test_color() {
        assert!(run(&color(), json!("#FFF")).await.is_ok());
        assert!(run(&color(), json!("#a1b2c3")).await.is_ok());
        assert!(run(&color(), json!("#ABCD")).await.is_err());
        assert!(run(&color(), json!("red")).await.is_err());
    }

    #[tokio::test]
    async fn test_character_classes() {
        assert!(run(&alphanumeric(), json!("abc123")).await.is_ok());
        assert!(run(&alphanumeric(), json!("abc-123")).await.is_err());
        assert!(run(&digits(), json!("0042")).await.is_ok());
        assert!(run(&digits(), json!("4.2")).await.is_err());
        assert!(run(&integer(), json!("-42")).await.is_ok());
        assert!(run(&integer(), json!("4.2")).await.is_err());
    }

    #[tokio::test]
    async fn test_regexp() {
        let rule = regexp(Regex::new(r"^[A-Z]{3}$").unwrap());
        assert!(run(&rule, json!("ABC")).await.is_ok());
        let err = run(&rule, json!("abc")).await.unwrap_err();
        assert_eq!(err.message, "Invalid format.");
        assert_eq!(err.code, "invalid_format");
    }

    // ── Numbers and lengths ─────────────────────────────────────────

    #[tokio::test]
    async fn test_min_max_range() {
        assert!(run_number(&min(5.0), json!("5")).await.is_ok());
        let err = run_number(&min(5.0), json!(4)).await.unwrap_err();
        assert_eq!(err.message, "Please enter a value greater than or equal to 5.");
        assert_eq!(err.params.get("arg0").map(String::as_str), Some("5"));
        assert!(run_number(&max(5.0), json!(6)).await.is_err());
        assert!(run_number(&range(1.0, 3.0), json!("2")).await.is_ok());
        assert!(run_number(&range(1.0, 3.0), json!("abc")).await.is_err());
    }

    #[tokio::test]
    async fn test_lengths() {
        assert!(run(&min_length(3), json!("abc")).await.is_ok());
        let err = run(&min_length(3), json!("ab")).await.unwrap_err();
        assert_eq!(err.message, "Please enter at least 3 characters.");
        assert!(run(&max_length(3), json!("abcd")).await.is_err());
        assert!(run(&range_length(2, 3), json!("ab")).await.is_ok());
        assert!(run(&range_length(2, 3), json!("abcd")).await.is_err());
    }

    // ── Cross-field ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_match_field() {
        let form = bind(
            vec![
                ("password", fields::password(FieldOptions::new())),
                ("confirm", fields::password(FieldOptions::new())),
            ],
            json!({ "password": "s3cret", "confirm": "s3cret" }),
        );
        let confirm = form.field("confirm").unwrap();
        assert!(match_field("password").validate(&form, confirm).await.is_ok());

        let form = bind(
            vec![
                ("password", fields::password(FieldOptions::new())),
                ("confirm", fields::password(FieldOptions::new())),
            ],
            json!({ "password": "s3cret", "confirm": "other" }),
        );
        let confirm = form.field("confirm").unwrap();
        let err = match_field("password").validate(&form, confirm).await.unwrap_err();
        assert_eq!(err.message, "Does not match password.");
    }

    #[tokio::test]
    async fn test_match_field_missing_other() {
        let err = run(&match_field("nope"), json!("x")).await.unwrap_err();
        assert_eq!(err.code, "mismatch");
    }

    // ── Closures ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_from_fn() {
        let v = from_fn(|_form, field| {
            if field.data().as_str() == Some("admin") {
                Err(ValidationError::invalid("reserved"))
            } else {
                Ok(())
            }
        });
        let form = bind(vec![("f", fields::string(FieldOptions::new()))], json!({ "f": "admin" }));
        let err = v.validate(&form, form.field("f").unwrap()).await.unwrap_err();
        assert_eq!(err.message, "reserved");
        assert!(!v.force_validation());
    }

    #[tokio::test]
    async fn test_from_async_fn() {
        let v = from_async_fn(|form, field| async move {
            tokio::task::yield_now().await;
            if form.data().len() == 1 && field.data().as_str() == Some("ok") {
                Ok(())
            } else {
                Err(ValidationError::invalid("nope"))
            }
        });
        let form = bind(vec![("f", fields::string(FieldOptions::new()))], json!({ "f": "ok" }));
        assert!(v.validate(&form, form.field("f").unwrap()).await.is_ok());
    }

    #[test]
    fn test_forced() {
        assert!(forced(required()).force_validation());
        assert!(!required().force_validation());
    }
}
