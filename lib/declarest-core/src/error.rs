//! Error types for declarest.

use derive_more::{Display, Error, From};

/// Main error type for declarest operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A collection format string is not one of `CSV`, `SSV`, `TSV`, `PIPES`, `MULTI`.
    #[display("unknown collection format: '{_0}'")]
    #[from(skip)]
    UnknownCollectionFormat(#[error(not(source))] String),

    /// An HTTP verb string is not supported.
    #[display("unsupported HTTP method: {_0}")]
    #[from(skip)]
    UnsupportedMethod(#[error(not(source))] String),

    /// More than one body parameter was declared on a method.
    #[display("method '{method}' declares more than one body parameter")]
    #[from(skip)]
    DuplicateBody {
        /// The method name.
        #[error(not(source))]
        method: String,
    },

    /// The same method was registered twice.
    #[display("method '{_0}' is already registered")]
    #[from(skip)]
    DuplicateMethod(#[error(not(source))] String),

    /// No descriptor is registered under this method name.
    #[display("no descriptor registered for method '{_0}'")]
    #[from(skip)]
    UnknownMethod(#[error(not(source))] String),

    /// The descriptor registry could not be built.
    #[display("registry error: {_0}")]
    #[from(skip)]
    Registry(#[error(not(source))] String),

    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error (arguments or body).
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a registry error.
    #[must_use]
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error was raised while declaring a client,
    /// before any request was sent.
    #[must_use]
    pub const fn is_declaration(&self) -> bool {
        matches!(
            self,
            Self::UnknownCollectionFormat(_)
                | Self::UnsupportedMethod(_)
                | Self::DuplicateBody { .. }
                | Self::DuplicateMethod(_)
                | Self::Registry(_)
        )
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` when there is no body to decode.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_names_the_value() {
        let err = Error::UnknownCollectionFormat("CSVX".to_string());
        insta::assert_snapshot!(err.to_string(), @"unknown collection format: 'CSVX'");
    }

    #[test]
    fn error_display() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");

        let err = Error::DuplicateBody {
            method: "create".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "method 'create' declares more than one body parameter"
        );

        let err = Error::UnknownMethod("missing".to_string());
        assert_eq!(
            err.to_string(),
            "no descriptor registered for method 'missing'"
        );
    }

    #[test]
    fn declaration_errors() {
        assert!(Error::UnknownCollectionFormat("x".to_string()).is_declaration());
        assert!(Error::DuplicateMethod("get".to_string()).is_declaration());
        assert!(!Error::Timeout.is_declaration());
        assert!(!Error::connection("refused").is_declaration());
    }

    #[test]
    fn error_status_and_body() {
        let body = bytes::Bytes::from(r#"{"error": "not found"}"#);
        let err = Error::http_with_body(404, "Not Found", body.clone());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&body));

        assert_eq!(Error::Timeout.status(), None);
        assert!(Error::Timeout.body().is_none());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let body = bytes::Bytes::from(r#"{"error": "not found"}"#);
        let err = Error::http_with_body(404, "Not Found", body);

        let decoded = err
            .decode_body::<ApiError>()
            .expect("should have body")
            .expect("should decode");
        assert_eq!(
            decoded,
            ApiError {
                error: "not found".to_string()
            }
        );

        assert!(Error::http(404, "Not Found").decode_body::<ApiError>().is_none());
    }
}
