//! Logging integration.
//!
//! Provides a helper for configuring the [`tracing`] subscriber from
//! [`Settings`](crate::settings::Settings) and a span constructor used around
//! form handling so that every field-level event carries the input kind.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug",
/// "formwork_forms=trace"). In debug mode a pretty, human-readable format is
/// used; otherwise a structured JSON format is used. Installing a subscriber
/// twice is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one form-handling pass.
///
/// `input` names the shape being handled ("empty", "request", "data").
///
/// # Examples
///
/// ```
/// use formwork_core::logging::handle_span;
///
/// let span = handle_span("data");
/// let _guard = span.enter();
/// tracing::info!("handling form");
/// ```
pub fn handle_span(input: &str) -> tracing::Span {
    tracing::debug_span!("form_handle", input = input)
}
