//! Errors raised while reading a request.

use formwork_core::FormworkError;
use thiserror::Error;

/// A failure to read form data out of a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The body's content type is not one the parser understands.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// A `multipart/form-data` request carried no boundary parameter.
    #[error("multipart body without a boundary")]
    MissingBoundary,

    /// The body exceeds the parser's size limit.
    #[error("request body of {size} bytes exceeds the limit of {limit} bytes")]
    BodyTooLarge {
        /// Size of the rejected body.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// An uploaded file exceeds the parser's per-file limit.
    #[error("file '{name}' exceeds maximum upload size of {limit} bytes")]
    FileTooLarge {
        /// Client-supplied file name.
        name: String,
        /// Configured limit.
        limit: usize,
    },

    /// A url-encoded body or a multipart field is not valid UTF-8.
    #[error("body is not valid UTF-8")]
    InvalidEncoding,

    /// A multipart body is malformed.
    #[error("malformed multipart body: {0}")]
    Multipart(String),
}

impl From<HttpError> for FormworkError {
    fn from(err: HttpError) -> Self {
        Self::BodyParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_body_parse() {
        let err: FormworkError = HttpError::MissingBoundary.into();
        assert!(matches!(err, FormworkError::BodyParse(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_file_too_large_display() {
        let err = HttpError::FileTooLarge {
            name: "a.bin".into(),
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "file 'a.bin' exceeds maximum upload size of 10 bytes"
        );
    }
}
