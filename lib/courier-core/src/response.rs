//! HTTP response handling.
//!
//! [`Response`] is what a successful invocation returns: status, headers as
//! received, and the raw body. Decoding into application types is left to the
//! caller, with [`Response::json`], [`Response::text`] and [`Response::bytes`]
//! as thin helpers.
//!
//! # Example
//!
//! ```ignore
//! let characters: CharacterList = response.json()?;
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Result, error::keys};

/// HTTP response with status, headers, and an optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Option<Bytes>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Creates a response with a single `Content-Type` header.
    ///
    /// Handy for canned test responses.
    ///
    /// ```
    /// use courier_core::Response;
    ///
    /// let response = Response::with_content_type(200, "application/json", "{}");
    /// assert_eq!(response.header("Content-Type"), Some("application/json"));
    /// ```
    #[must_use]
    pub fn with_content_type(
        status: u16,
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), content_type.into());
        Self::new(status, headers, Some(body.into()))
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers, keys as received.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str).or_else(|| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Response body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, Option<Bytes>) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// The body bytes, for callers decoding binary payloads such as images.
    ///
    /// # Errors
    ///
    /// Returns a decoder error if the response has no body.
    pub fn bytes(&self) -> Result<&Bytes> {
        self.body
            .as_ref()
            .ok_or_else(|| Error::decoder("no body data found"))
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decoder error if there is no body, or a parser error carrying
    /// the JSON path of the failing field.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let bytes = self.bytes()?;
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            Error::parser(err.inner().to_string()).with_context(keys::PATH, path)
        })
    }

    /// The body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns a decoder error if there is no body or it is not valid UTF-8.
    pub fn text(&self) -> Result<String> {
        let bytes = self.bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|err| Error::decoder(err.to_string()))
    }
}
