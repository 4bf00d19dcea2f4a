//! Service descriptors.
//!
//! A [`Service`] packages everything needed for one call: method, URL,
//! timeout, accept and content types, body or parameters, headers, and the
//! optional custom serializer, session delegate and canned test response.
//! Build one per call with [`Service::builder`]; building never fails, the
//! URL is only checked when the request is built.
//!
//! # Example
//!
//! ```
//! use courier_core::{AcceptType, ContentType, Method, Param, Service};
//!
//! let service = Service::builder(Method::Post, "https://api.example.com/quotes")
//!     .accept(AcceptType::Json)
//!     .content_type(ContentType::Form)
//!     .parameter("author", "Homer")
//!     .parameter("text", Param::from("Mmm... donuts"))
//!     .build();
//!
//! assert_eq!(service.url(), "https://api.example.com/quotes");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::{
    AcceptType, ContentType, Method, Param, Parameters, RequestSerializer, Response,
    SessionDelegate,
};

/// Timeout used when the caller does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable description of one network service call.
#[derive(Clone)]
pub struct Service {
    method: Method,
    url: String,
    timeout: Duration,
    accept: AcceptType,
    content_type: Option<ContentType>,
    body: Option<Bytes>,
    parameters: Option<Parameters>,
    headers: Option<BTreeMap<String, String>>,
    serializer: Option<Arc<dyn RequestSerializer>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    test_response: Option<Response>,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("accept", &self.accept)
            .field("content_type", &self.content_type)
            .field("body", &self.body)
            .field("parameters", &self.parameters)
            .field("headers", &self.headers)
            .field("serializer", &self.serializer.is_some())
            .field("delegate", &self.delegate.is_some())
            .field("test_response", &self.test_response)
            .finish()
    }
}

impl Service {
    /// Creates a new [`ServiceBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: impl Into<String>) -> ServiceBuilder {
        ServiceBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL, unparsed.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Maximum time to wait for the response.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Media type expected in the response.
    #[must_use]
    pub const fn accept(&self) -> &AcceptType {
        &self.accept
    }

    /// Media type of the request body.
    #[must_use]
    pub const fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }

    /// Pre-built request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Parameters to serialize when there is no pre-built body.
    #[must_use]
    pub const fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }

    /// Additional request headers.
    #[must_use]
    pub const fn headers(&self) -> Option<&BTreeMap<String, String>> {
        self.headers.as_ref()
    }

    /// Custom serializer for the parameters.
    #[must_use]
    pub fn serializer(&self) -> Option<&dyn RequestSerializer> {
        self.serializer.as_deref()
    }

    /// Per-call session delegate.
    #[must_use]
    pub fn delegate(&self) -> Option<&dyn SessionDelegate> {
        self.delegate.as_deref()
    }

    /// Canned response used instead of the network.
    #[must_use]
    pub const fn test_response(&self) -> Option<&Response> {
        self.test_response.as_ref()
    }
}

/// Builder for [`Service`].
#[derive(Debug, Clone)]
pub struct ServiceBuilder {
    service: Service,
}

impl ServiceBuilder {
    /// Creates a builder with the default timeout and [`AcceptType::Any`].
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            service: Service {
                method,
                url: url.into(),
                timeout: DEFAULT_TIMEOUT,
                accept: AcceptType::default(),
                content_type: None,
                body: None,
                parameters: None,
                headers: None,
                serializer: None,
                delegate: None,
                test_response: None,
            },
        }
    }

    /// Set the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.service.timeout = timeout;
        self
    }

    /// Set the expected response media type.
    #[must_use]
    pub fn accept(mut self, accept: AcceptType) -> Self {
        self.service.accept = accept;
        self
    }

    /// Set the request body media type.
    #[must_use]
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.service.content_type = Some(content_type);
        self
    }

    /// Set a pre-built body. It takes precedence over any parameters.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.service.body = Some(body.into());
        self
    }

    /// Replace the parameters.
    #[must_use]
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.service.parameters = Some(parameters);
        self
    }

    /// Add a single parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.service
            .parameters
            .get_or_insert_with(Parameters::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a header; the value is converted to its string form.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.service
            .headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.to_string());
        self
    }

    /// Use a custom serializer instead of the content-type default.
    #[must_use]
    pub fn serializer(mut self, serializer: impl RequestSerializer + 'static) -> Self {
        self.service.serializer = Some(Arc::new(serializer));
        self
    }

    /// Attach a session delegate.
    #[must_use]
    pub fn delegate(mut self, delegate: impl SessionDelegate + 'static) -> Self {
        self.service.delegate = Some(Arc::new(delegate));
        self
    }

    /// Answer with this response instead of calling the network.
    #[must_use]
    pub fn test_response(mut self, response: Response) -> Self {
        self.service.test_response = Some(response);
        self
    }

    /// Build the service.
    #[must_use]
    pub fn build(self) -> Service {
        self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let service = Service::builder(Method::Get, "https://x/ok").build();

        assert_eq!(service.method(), &Method::Get);
        assert_eq!(service.url(), "https://x/ok");
        assert_eq!(service.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(service.accept(), &AcceptType::Any);
        assert!(service.content_type().is_none());
        assert!(service.body().is_none());
        assert!(service.parameters().is_none());
        assert!(service.headers().is_none());
        assert!(service.serializer().is_none());
        assert!(service.delegate().is_none());
        assert!(service.test_response().is_none());
    }

    #[test]
    fn builder_never_fails_on_bad_url() {
        let service = Service::builder(Method::Get, "not a url").build();
        assert_eq!(service.url(), "not a url");
    }

    #[test]
    fn header_values_are_stringified() {
        let service = Service::builder(Method::Get, "https://x/ok")
            .header("X-Page", 3)
            .header("X-Debug", true)
            .build();

        let headers = service.headers().expect("headers");
        assert_eq!(headers.get("X-Page").map(String::as_str), Some("3"));
        assert_eq!(headers.get("X-Debug").map(String::as_str), Some("true"));
    }

    #[test]
    fn parameters_accumulate() {
        let service = Service::builder(Method::Post, "https://x/ok")
            .parameter("a", "1")
            .parameter("b", 2)
            .build();

        let parameters = service.parameters().expect("parameters");
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("b"), Some(&Param::Integer(2)));
    }

    #[test]
    fn debug_hides_trait_objects() {
        let service = Service::builder(Method::Get, "https://x/ok")
            .serializer(crate::JsonSerializer)
            .build();
        let debug = format!("{service:?}");
        assert!(debug.contains("serializer: true"));
    }
}
