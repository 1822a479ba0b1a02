//! Settings for formwork.
//!
//! [`Settings`] holds process-wide configuration: logging and the defaults
//! every form picks up unless it is created with explicit options.
//! Use [`settings_loader`](crate::settings_loader) to build one from a file.

use serde::{Deserialize, Serialize};

/// Form-level defaults.
///
/// These control validation policy and the CSS class names written by the
/// rendering helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// When `true`, a validation pass keeps validating after the first
    /// failing field and reports every error.
    pub validate_past_first_error: bool,
    /// Class always present on a field wrapper.
    pub field_class: String,
    /// Class added to a field wrapper whose field has an error.
    pub error_class: String,
    /// Class added to a field wrapper whose field is required.
    pub required_class: String,
    /// Class of the element that carries a field's error message.
    pub error_message_class: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            validate_past_first_error: false,
            field_class: "field".to_string(),
            error_class: "error".to_string(),
            required_class: "required".to_string(),
            error_message_class: "error_msg".to_string(),
        }
    }
}

/// The complete set of settings.
///
/// # Examples
///
/// ```
/// use formwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(!settings.forms.validate_past_first_error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "formwork_forms=debug").
    pub log_level: String,
    /// Form defaults.
    pub forms: FormSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            forms: FormSettings::default(),
        }
    }
}
