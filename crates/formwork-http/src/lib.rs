//! # formwork-http
//!
//! The HTTP-facing collaborators of the form engine:
//!
//! - [`request`] - the request-like object a form can be handled from
//! - [`qs`] - a nested, array-aware query-string codec
//! - [`body`] - request-body parsing for url-encoded and multipart bodies
//! - [`error`] - errors raised while reading a request
//!
//! Nothing here performs socket I/O; requests are built from data an
//! application server already read.

pub mod body;
pub mod error;
pub mod qs;
pub mod request;

pub use body::{BodyParser, FormBodyParser, ParsedBody, UploadedFile};
pub use error::HttpError;
pub use request::{FormRequest, Request, RequestBuilder};
