//! Categorized errors for courier.
//!
//! Every failure that leaves the pipeline is an [`Error`]: a closed
//! [`ErrorKind`] tag plus an open, ordered map of [`ContextValue`]s. Two
//! reserved keys ([`keys::RESPONSE`] and [`keys::STATUS_CODE`]) carry the
//! partial response and its status when one was received before the failure.

use std::collections::BTreeMap;

use derive_more::{Display, Error, From};

use crate::Response;

/// Boxed error returned by custom serializers and other caller-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Reserved and well-known context keys.
pub mod keys {
    /// Human-readable description of the failure.
    pub const DESCRIPTION: &str = "description";
    /// The [`Response`](crate::Response) received before the failure.
    pub const RESPONSE: &str = "response";
    /// The numeric HTTP status code received before the failure.
    pub const STATUS_CODE: &str = "status_code";
    /// Media type the caller expected.
    pub const EXPECTED: &str = "expected";
    /// Media type the server sent.
    pub const RECEIVED: &str = "received";
    /// Location of the offending value inside a parameter bag or body.
    pub const PATH: &str = "path";
}

/// The closed set of error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Malformed URL, transport or session failure, anything uncategorized.
    #[display("general")]
    General,
    /// Status code outside `200..300`.
    #[display("status code")]
    StatusCode,
    /// Response content type does not match the accept type.
    #[display("content type")]
    ContentType,
    /// Request body could not be built.
    #[display("serializer")]
    Serializer,
    /// Response body could not be parsed into the requested shape.
    #[display("parser")]
    Parser,
    /// Response body is missing or not in the requested encoding.
    #[display("decoder")]
    Decoder,
}

/// A value stored in an error's context map.
#[derive(Debug, Clone, PartialEq, From)]
pub enum ContextValue {
    /// Free text.
    String(String),
    /// Integer, used for status codes.
    Integer(i64),
    /// The response received before the failure.
    Response(Box<Response>),
}

impl ContextValue {
    /// The string, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// The integer, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The response, if this is a response value.
    #[must_use]
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<u16> for ContextValue {
    fn from(value: u16) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Response> for ContextValue {
    fn from(response: Response) -> Self {
        Self::Response(Box::new(response))
    }
}

/// Main error type for courier operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct Error {
    kind: ErrorKind,
    context: BTreeMap<String, ContextValue>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{} error: {description}", self.kind),
            None => write!(f, "{} error", self.kind),
        }
    }
}

impl Error {
    /// Create an error with an empty context.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: BTreeMap::new(),
        }
    }

    /// Create an error carrying a description.
    #[must_use]
    pub fn with_description(kind: ErrorKind, description: impl Into<String>) -> Self {
        Self::new(kind).with_context(keys::DESCRIPTION, description.into())
    }

    /// Create a general error.
    #[must_use]
    pub fn general(description: impl Into<String>) -> Self {
        Self::with_description(ErrorKind::General, description)
    }

    /// Create a status code error for the given status.
    #[must_use]
    pub fn status_code(status: u16) -> Self {
        Self::with_description(ErrorKind::StatusCode, format!("status code not OK: {status}"))
            .with_context(keys::STATUS_CODE, status)
    }

    /// Create a content type error naming both media types.
    #[must_use]
    pub fn content_type(expected: impl Into<String>, received: impl Into<String>) -> Self {
        let expected = expected.into();
        let received = received.into();
        Self::with_description(
            ErrorKind::ContentType,
            format!("expecting Content-Type [{expected}] but got [{received}]"),
        )
        .with_context(keys::EXPECTED, expected)
        .with_context(keys::RECEIVED, received)
    }

    /// Create a serializer error.
    #[must_use]
    pub fn serializer(description: impl Into<String>) -> Self {
        Self::with_description(ErrorKind::Serializer, description)
    }

    /// Create a parser error.
    #[must_use]
    pub fn parser(description: impl Into<String>) -> Self {
        Self::with_description(ErrorKind::Parser, description)
    }

    /// Create a decoder error.
    #[must_use]
    pub fn decoder(description: impl Into<String>) -> Self {
        Self::with_description(ErrorKind::Decoder, description)
    }

    /// Categorize an arbitrary error.
    ///
    /// A courier [`Error`] keeps its context and takes the new kind; any other
    /// error becomes a description.
    #[must_use]
    pub fn from_boxed(kind: ErrorKind, err: BoxError) -> Self {
        match err.downcast::<Self>() {
            Ok(err) => (*err).with_kind(kind),
            Err(err) => Self::with_description(kind, err.to_string()),
        }
    }

    /// Set a context entry, replacing any previous value under that key.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Same context, different kind.
    #[must_use]
    pub fn with_kind(self, kind: ErrorKind) -> Self {
        Self {
            kind,
            context: self.context,
        }
    }

    /// Merge entries into the context. Keys already present win.
    #[must_use]
    pub fn merge_context(
        mut self,
        entries: impl IntoIterator<Item = (String, ContextValue)>,
    ) -> Self {
        for (key, value) in entries {
            self.context.entry(key).or_insert(value);
        }
        self
    }

    /// Attach the response received before the failure, and its status code.
    ///
    /// Keys already present win, and the kind is preserved.
    #[must_use]
    pub fn with_response(self, response: Response) -> Self {
        let status = response.status();
        self.merge_context([
            (keys::RESPONSE.to_string(), ContextValue::from(response)),
            (keys::STATUS_CODE.to_string(), ContextValue::from(status)),
        ])
    }

    /// The error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The full context map.
    #[must_use]
    pub const fn context(&self) -> &BTreeMap<String, ContextValue> {
        &self.context
    }

    /// A single context entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.context.get(key)
    }

    /// Human-readable description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get(keys::DESCRIPTION).and_then(ContextValue::as_str)
    }

    /// The response received before the failure, if any.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.get(keys::RESPONSE).and_then(ContextValue::as_response)
    }

    /// The HTTP status code received before the failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.get(keys::STATUS_CODE)
            .and_then(ContextValue::as_integer)
            .and_then(|status| u16::try_from(status).ok())
    }

    /// Returns `true` for [`ErrorKind::General`].
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.kind == ErrorKind::General
    }

    /// Returns `true` for [`ErrorKind::StatusCode`].
    #[must_use]
    pub fn is_status_code(&self) -> bool {
        self.kind == ErrorKind::StatusCode
    }

    /// Returns `true` for [`ErrorKind::ContentType`].
    #[must_use]
    pub fn is_content_type(&self) -> bool {
        self.kind == ErrorKind::ContentType
    }

    /// Returns `true` for [`ErrorKind::Serializer`].
    #[must_use]
    pub fn is_serializer(&self) -> bool {
        self.kind == ErrorKind::Serializer
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
