//! The request-like object a form is handled from.
//!
//! The form engine only needs a handful of things from a request: its
//! method, its URL (for the query string of read requests), and either an
//! already-parsed body or the raw body bytes with their content type.
//! [`FormRequest`] captures exactly that surface so that any server's
//! request type can be adapted; [`Request`] is the implementation shipped
//! with this crate.

use std::sync::LazyLock;

use http::{HeaderMap, Method};
use serde_json::{Map, Value};
use url::Url;

static BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("BASE_URL: invalid base URL"));

/// The capability surface a form needs from an incoming request.
pub trait FormRequest: Send + Sync {
    /// Returns the HTTP method.
    fn method(&self) -> &Method;

    /// Returns the request URL: a path with an optional query string, or an
    /// absolute URL.
    fn url(&self) -> &str;

    /// Returns the body if a middleware already parsed it into a mapping.
    fn body(&self) -> Option<&Map<String, Value>> {
        None
    }

    /// Returns the content type of the raw body, if known.
    fn content_type(&self) -> Option<&str> {
        None
    }

    /// Returns the raw body bytes.
    fn raw_body(&self) -> &[u8] {
        &[]
    }

    /// Returns the query string of [`url`](Self::url), without the `?`.
    ///
    /// An unparseable URL yields an empty query string.
    fn query_string(&self) -> String {
        Url::options()
            .base_url(Some(&*BASE_URL))
            .parse(self.url())
            .ok()
            .and_then(|url| url.query().map(str::to_string))
            .unwrap_or_default()
    }
}

/// A request that owns its method, URL, headers and body.
///
/// # Examples
///
/// ```
/// use formwork_http::{FormRequest, Request};
///
/// let request = Request::builder()
///     .method(http::Method::GET)
///     .url("/signup?email=a%40b.com")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.query_string(), "email=a%40b.com");
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    headers: HeaderMap,
    content_type: Option<String>,
    body: Vec<u8>,
    parsed_body: Option<Map<String, Value>>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Creates a `Request` from `http` request parts and the body bytes an
    /// application server already read.
    pub fn from_parts(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            method: parts.method,
            url: parts.uri.to_string(),
            headers: parts.headers,
            content_type,
            body,
            parsed_body: None,
        }
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Stores an already-parsed body, as body-decoding middleware would.
    pub fn set_parsed_body(&mut self, body: Map<String, Value>) {
        self.parsed_body = Some(body);
    }
}

impl FormRequest for Request {
    fn method(&self) -> &Method {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn body(&self) -> Option<&Map<String, Value>> {
        self.parsed_body.as_ref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn raw_body(&self) -> &[u8] {
        &self.body
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: HeaderMap,
    content_type: Option<String>,
    body: Vec<u8>,
    parsed_body: Option<Map<String, Value>>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            url: "/".to_string(),
            headers: HeaderMap::new(),
            content_type: None,
            body: Vec::new(),
            parsed_body: None,
        }
    }
}

impl RequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            if name == http::header::CONTENT_TYPE {
                self.content_type = Some(value.to_str().unwrap_or_default().to_string());
            }
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the content type of the raw body.
    #[must_use]
    pub fn content_type(self, content_type: &str) -> Self {
        self.header(http::header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw body bytes.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets an already-parsed body.
    #[must_use]
    pub fn parsed_body(mut self, body: Map<String, Value>) -> Self {
        self.parsed_body = Some(body);
        self
    }

    /// Builds the [`Request`].
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            content_type: self.content_type,
            body: self.body,
            parsed_body: self.parsed_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let request = Request::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url(), "/");
        assert!(request.body().is_none());
        assert!(request.raw_body().is_empty());
        assert_eq!(request.query_string(), "");
    }

    #[test]
    fn test_query_string_relative_url() {
        let request = Request::builder().url("/form?a=1&b=2#top").build();
        assert_eq!(request.query_string(), "a=1&b=2");
    }

    #[test]
    fn test_query_string_absolute_url() {
        let request = Request::builder()
            .url("https://example.com/form?x=y")
            .build();
        assert_eq!(request.query_string(), "x=y");
    }

    #[test]
    fn test_content_type_header() {
        let request = Request::builder()
            .method(Method::POST)
            .content_type("application/x-www-form-urlencoded")
            .body("a=1")
            .build();
        assert_eq!(
            request.content_type(),
            Some("application/x-www-form-urlencoded")
        );
        assert!(request.headers().contains_key(http::header::CONTENT_TYPE));
        assert_eq!(request.raw_body(), b"a=1");
    }

    #[test]
    fn test_parsed_body() {
        let body = json!({"name": "Ada"}).as_object().cloned().unwrap();
        let mut request = Request::builder().method(Method::POST).build();
        assert!(request.body().is_none());
        request.set_parsed_body(body.clone());
        assert_eq!(request.body(), Some(&body));
    }

    #[test]
    fn test_from_parts() {
        let (parts, ()) = http::Request::builder()
            .method(Method::PUT)
            .uri("/items/1?draft=1")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(())
            .unwrap()
            .into_parts();
        let request = Request::from_parts(parts, b"title=x".to_vec());
        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.query_string(), "draft=1");
        assert_eq!(
            request.content_type(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.raw_body(), b"title=x");
    }
}
