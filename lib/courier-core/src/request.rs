//! Transport-level HTTP requests.
//!
//! A [`Request`] is what the request builder produces from a
//! [`Service`](crate::Service) and what a [`Transport`](crate::Transport)
//! executes.
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, Request};
//! use std::time::Duration;
//!
//! let request = Request::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .timeout(Duration::from_secs(5))
//!     .build();
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::{DEFAULT_TIMEOUT, Method};

/// An HTTP request with method, URL, timeout, headers, and optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: url::Url,
    timeout: Duration,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Maximum time to wait for the response.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Sets a header, replacing any header with the same name in any case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_header(&mut self.headers, name.into(), value.into());
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (method, url, timeout, headers, body).
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Method,
        url::Url,
        Duration,
        HashMap<String, String>,
        Option<Bytes>,
    ) {
        (
            self.method,
            self.url,
            self.timeout,
            self.headers,
            self.body,
        )
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    timeout: Duration,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            timeout: DEFAULT_TIMEOUT,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any header with the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Sets multiple headers, in iteration order.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            set_header(&mut self.headers, name, value);
        }
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            timeout: self.timeout,
            headers: self.headers,
            body: self.body,
        }
    }
}

fn set_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}
