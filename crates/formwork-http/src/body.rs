//! Request-body parsing.
//!
//! A write request whose body was not decoded by a middleware is handed to
//! a [`BodyParser`]. [`FormBodyParser`] understands
//! `application/x-www-form-urlencoded` and `multipart/form-data` bodies.
//! Parsed fields are flat (`user[name]` stays one key); the form engine
//! normalizes them through the [`qs`](crate::qs) codec afterwards.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::{future, stream};
use serde_json::{Map, Value};

use crate::error::HttpError;
use crate::qs;
use crate::request::FormRequest;

/// Default maximum size of one uploaded file (2.5 MB).
pub const FILE_UPLOAD_MAX_MEMORY_SIZE: usize = 2_621_440;

/// Default maximum size of a whole body (20 MB).
pub const BODY_MAX_SIZE: usize = 20 * 1024 * 1024;

/// An uploaded file from a multipart form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The original filename as provided by the client.
    pub name: String,
    /// The MIME content type of the file.
    pub content_type: String,
    /// The size of the file content in bytes.
    pub size: usize,
    /// The raw file content.
    pub content: Vec<u8>,
}

/// The result of parsing a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBody {
    /// Regular form fields. A repeated name holds an array of strings.
    pub fields: Map<String, Value>,
    /// Uploaded files, keyed by field name.
    pub files: HashMap<String, Vec<UploadedFile>>,
}

/// Parses the body of a write request into fields and files.
#[async_trait]
pub trait BodyParser: Send + Sync {
    /// Parses `request`'s raw body.
    async fn parse(&self, request: &dyn FormRequest) -> Result<ParsedBody, HttpError>;
}

/// Parser for url-encoded and multipart bodies.
#[derive(Debug, Clone)]
pub struct FormBodyParser {
    max_body_size: usize,
    max_file_size: usize,
}

impl Default for FormBodyParser {
    fn default() -> Self {
        Self {
            max_body_size: BODY_MAX_SIZE,
            max_file_size: FILE_UPLOAD_MAX_MEMORY_SIZE,
        }
    }
}

impl FormBodyParser {
    /// Creates a parser with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum accepted body size.
    #[must_use]
    pub const fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Sets the maximum accepted size of one uploaded file.
    #[must_use]
    pub const fn max_file_size(mut self, limit: usize) -> Self {
        self.max_file_size = limit;
        self
    }
}

#[async_trait]
impl BodyParser for FormBodyParser {
    async fn parse(&self, request: &dyn FormRequest) -> Result<ParsedBody, HttpError> {
        let body = request.raw_body();
        if body.len() > self.max_body_size {
            return Err(HttpError::BodyTooLarge {
                size: body.len(),
                limit: self.max_body_size,
            });
        }

        let content_type = request.content_type().unwrap_or_default();
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/x-www-form-urlencoded" => {
                let text = std::str::from_utf8(body).map_err(|_| HttpError::InvalidEncoding)?;
                Ok(ParsedBody {
                    fields: qs::parse_flat(text),
                    files: HashMap::new(),
                })
            }
            "multipart/form-data" => {
                let boundary = multer::parse_boundary(content_type)
                    .map_err(|_| HttpError::MissingBoundary)?;
                parse_multipart(body, &boundary, self.max_file_size).await
            }
            "" if body.is_empty() => Ok(ParsedBody::default()),
            _ => Err(HttpError::UnsupportedContentType(content_type.to_string())),
        }
    }
}

/// Parses a multipart/form-data body.
///
/// Parts are read as bytes: file contents are kept verbatim and regular
/// fields must be UTF-8. A part with a `filename` is a file upload; an
/// empty file input (empty filename and no content) is skipped.
///
/// # Errors
///
/// Returns [`HttpError::FileTooLarge`] if a file exceeds `max_file_size`,
/// [`HttpError::InvalidEncoding`] for a non-UTF-8 field value and
/// [`HttpError::Multipart`] for a malformed body.
pub async fn parse_multipart(
    body: &[u8],
    boundary: &str,
    max_file_size: usize,
) -> Result<ParsedBody, HttpError> {
    let stream = stream::once(future::ready(Ok::<_, std::io::Error>(body.to_vec())));
    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut parsed = ParsedBody::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let filename = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .map_or_else(|| "text/plain".to_string(), ToString::to_string);
        let content = field.bytes().await.map_err(multipart_error)?;

        match filename {
            Some(filename) if filename.is_empty() && content.is_empty() => {}
            Some(filename) => {
                if content.len() > max_file_size {
                    return Err(HttpError::FileTooLarge {
                        name: filename,
                        limit: max_file_size,
                    });
                }
                parsed.files.entry(name).or_default().push(UploadedFile {
                    name: filename,
                    content_type,
                    size: content.len(),
                    content: content.to_vec(),
                });
            }
            None => {
                let text =
                    String::from_utf8(content.to_vec()).map_err(|_| HttpError::InvalidEncoding)?;
                qs::append_value(&mut parsed.fields, name, text);
            }
        }
    }

    tracing::trace!(
        fields = parsed.fields.len(),
        files = parsed.files.len(),
        "parsed multipart body"
    );
    Ok(parsed)
}

fn multipart_error(err: multer::Error) -> HttpError {
    HttpError::Multipart(err.to_string())
}
