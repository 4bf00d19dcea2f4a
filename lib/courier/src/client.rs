//! The client facade: invoke services on a shared transport.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service as TowerService;
use tracing::{debug, trace};

#[cfg(doc)]
use crate::ErrorKind;
use crate::{
    BoxedService, ClientConfig, ClientConfigBuilder, Error, HyperTransport, Request, Response,
    Result, Service, Transport, build_request,
    middleware::LoggingLayer,
    transport::LayerFn,
    validate,
};

/// Service client over a shared transport.
///
/// Cloning is cheap: clones share the transport, and therefore its session,
/// its connection pool and its concurrency limit.
///
/// # Example
///
/// ```ignore
/// use courier::prelude::*;
///
/// let courier = Courier::builder()
///     .max_concurrent_requests(2)
///     .with_logging()
///     .build();
///
/// let service = Service::builder(Method::Get, "https://api.example.com/status")
///     .accept(AcceptType::Json)
///     .build();
///
/// let response = courier.invoke(&service).await?;
/// ```
pub struct Courier<T: Transport = HyperTransport> {
    transport: Arc<T>,
}

impl<T: Transport> Clone for Courier<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Courier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Courier")
            .field("transport", &self.transport)
            .finish()
    }
}

impl Courier {
    /// Create a client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration (no middleware).
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(HyperTransport::with_config(config))
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> CourierBuilder {
        CourierBuilder::default()
    }
}

impl Default for Courier {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Courier<T> {
    /// Create a client over any transport, e.g. a simulated one.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Get the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the shared session.
    ///
    /// Calls still pending on the previous session fail with a
    /// [`ErrorKind::General`] error; calls made afterwards use the new one.
    pub fn reset_session(&self) {
        self.transport.reset();
    }

    /// Invoke a service and return its validated response.
    ///
    /// When the service carries a test response, no request is built or
    /// sent: the canned response goes through the same validation and is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::General`] for a malformed URL or a transport failure.
    /// - [`ErrorKind::Serializer`] when the body cannot be produced.
    /// - [`ErrorKind::StatusCode`] or [`ErrorKind::ContentType`] when
    ///   validation fails; those carry the response under
    ///   [`keys::RESPONSE`](crate::keys::RESPONSE).
    pub async fn invoke(&self, service: &Service) -> Result<Response> {
        if let Some(canned) = service.test_response() {
            debug!(
                method = %service.method(),
                url = service.url(),
                status = canned.status(),
                "using test response"
            );
            return Self::checked(canned.clone(), service);
        }

        let mut request = build_request(service)?;
        if let Some(delegate) = service.delegate() {
            delegate.will_send(&mut request);
        }

        let method = request.method().clone();
        let url = request.url().to_string();
        trace!(%method, %url, "invoking service");

        let start = Instant::now();
        let response = self.transport.execute(request).await?;
        debug!(
            %method,
            %url,
            status = response.status(),
            elapsed_ms = elapsed_ms(start.elapsed()),
            "response received"
        );

        if let Some(delegate) = service.delegate() {
            delegate.did_receive(&response);
        }

        Self::checked(response, service)
    }

    fn checked(response: Response, service: &Service) -> Result<Response> {
        match validate(&response, service.accept()) {
            Ok(()) => Ok(response),
            Err(err) => Err(err.with_response(response)),
        }
    }
}

// Saturating conversion to u64
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for [`Courier`].
///
/// Layers added here wrap every session the transport opens, including the
/// ones created by [`Courier::reset_session`].
///
/// # Example
///
/// ```ignore
/// use courier::Courier;
/// use std::time::Duration;
///
/// let courier = Courier::builder()
///     .max_concurrent_requests(8)
///     .connect_timeout(Duration::from_secs(5))
///     .with_logging()
///     .build();
/// ```
#[derive(Default)]
pub struct CourierBuilder {
    config: ClientConfigBuilder,
    layers: Vec<LayerFn>,
}

impl std::fmt::Debug for CourierBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourierBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl CourierBuilder {
    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Use a whole configuration, replacing anything set so far.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = ClientConfig::builder()
            .max_concurrent_requests(config.max_concurrent_requests)
            .connect_timeout(config.connect_timeout)
            .pool_idle_per_host(config.pool_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout);
        self
    }

    /// Set how many calls may run at once on a session.
    #[must_use]
    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.config = self.config.max_concurrent_requests(max);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Add a Tower layer to every session.
    ///
    /// Layers are applied in order, so the last one added sees calls first.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: TowerService<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        <L::Service as TowerService<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Alias for [`layer`](Self::layer).
    #[must_use]
    pub fn with<L>(self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: TowerService<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        <L::Service as TowerService<Request>>::Future: Send,
    {
        self.layer(layer)
    }

    /// Add info-level request logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (includes headers and body sizes).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the client and open its first session.
    #[must_use]
    pub fn build(self) -> Courier {
        let config = self.config.build();
        Courier::with_transport(HyperTransport::with_layers(config, self.layers))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::{check, let_assert};

    use super::*;
    use crate::{AcceptType, ContentType, ErrorKind, Method, SessionDelegate, keys};

    /// Records requests and answers with a fixed response.
    #[derive(Debug)]
    struct Simulated {
        response: Response,
        requests: Mutex<Vec<Request>>,
        resets: AtomicUsize,
    }

    impl Simulated {
        fn new(response: Response) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
                resets: AtomicUsize::new(0),
            }
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl Transport for Simulated {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.requests.lock().expect("lock").push(request);
            Ok(self.response.clone())
        }

        fn reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn json_ok() -> Response {
        Response::with_content_type(200, "application/json", r#"{"ok":true}"#)
    }

    #[tokio::test]
    async fn canned_response_skips_transport() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let service = Service::builder(Method::Get, "https://x/ok")
            .accept(AcceptType::Json)
            .test_response(json_ok())
            .build();

        let response = courier.invoke(&service).await.expect("response");

        check!(response == json_ok());
        check!(courier.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn canned_error_carries_response() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let not_found = Response::with_content_type(404, "application/json", "{}");
        let service = Service::builder(Method::Get, "https://x/ok")
            .accept(AcceptType::Json)
            .test_response(not_found.clone())
            .build();

        let_assert!(Err(err) = courier.invoke(&service).await);
        check!(err.kind() == ErrorKind::StatusCode);
        check!(err.status() == Some(404));
        check!(err.response() == Some(&not_found));
    }

    #[tokio::test]
    async fn content_type_mismatch_from_transport() {
        let html = Response::with_content_type(200, "text/html", "<html/>");
        let courier = Courier::with_transport(Simulated::new(html.clone()));
        let service = Service::builder(Method::Get, "https://x/page")
            .accept(AcceptType::Json)
            .build();

        let_assert!(Err(err) = courier.invoke(&service).await);
        check!(err.kind() == ErrorKind::ContentType);
        check!(err.get(keys::EXPECTED).and_then(|v| v.as_str()) == Some("application/json"));
        check!(err.get(keys::RECEIVED).and_then(|v| v.as_str()) == Some("text/html"));
        check!(err.response() == Some(&html));
        check!(err.status() == Some(200));
    }

    #[tokio::test]
    async fn built_request_reaches_transport() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let service = Service::builder(Method::Post, "https://x/items")
            .content_type(ContentType::Json)
            .accept(AcceptType::Json)
            .parameter("name", "widget")
            .build();

        courier.invoke(&service).await.expect("response");

        let requests = courier.transport().requests();
        let_assert!([request] = requests.as_slice());
        check!(request.method() == &Method::Post);
        check!(request.header("content-type") == Some("application/json"));
        check!(request.header("accept") == Some("application/json"));
        check!(request.body().map(|b| b.as_ref()) == Some(br#"{"name":"widget"}"#.as_slice()));
    }

    #[tokio::test]
    async fn malformed_url_never_reaches_transport() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let service = Service::builder(Method::Get, "not a url").build();

        let_assert!(Err(err) = courier.invoke(&service).await);
        check!(err.kind() == ErrorKind::General);
        check!(courier.transport().requests().is_empty());
    }

    #[derive(Clone, Default)]
    struct Tagging {
        received: Arc<AtomicUsize>,
    }

    impl SessionDelegate for Tagging {
        fn will_send(&self, request: &mut Request) {
            request.set_header("X-Trace", "abc");
        }

        fn did_receive(&self, _response: &Response) {
            self.received.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn delegate_hooks_run_around_the_exchange() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let delegate = Tagging::default();
        let service = Service::builder(Method::Get, "https://x/ok")
            .delegate(delegate.clone())
            .build();

        courier.invoke(&service).await.expect("response");

        let requests = courier.transport().requests();
        check!(requests[0].header("X-Trace") == Some("abc"));
        check!(delegate.received.load(Ordering::SeqCst) == 1);
    }

    #[tokio::test]
    async fn delegate_skipped_for_canned_response() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let delegate = Tagging::default();
        let service = Service::builder(Method::Get, "https://x/ok")
            .delegate(delegate.clone())
            .test_response(json_ok())
            .build();

        courier.invoke(&service).await.expect("response");
        check!(delegate.received.load(Ordering::SeqCst) == 0);
    }

    #[test]
    fn reset_session_forwards_to_transport() {
        let courier = Courier::with_transport(Simulated::new(json_ok()));
        let cloned = courier.clone();

        courier.reset_session();
        cloned.reset_session();

        check!(courier.transport().resets.load(Ordering::SeqCst) == 2);
    }

    #[test]
    fn builder_applies_config() {
        let courier = Courier::builder()
            .max_concurrent_requests(2)
            .pool_idle_per_host(8)
            .with_logging()
            .build();

        check!(courier.transport().config().max_concurrent_requests == 2);
        check!(courier.transport().config().pool_idle_per_host == 8);
    }

    #[test]
    fn builder_takes_whole_config() {
        let config = ClientConfig::builder().max_concurrent_requests(6).build();
        let courier = Courier::builder().config(config).build();

        check!(courier.transport().config().max_concurrent_requests == 6);
    }

    #[test]
    fn courier_is_debug() {
        let debug = format!("{:?}", Courier::new());
        check!(debug.contains("Courier"));
        check!(debug.contains("HyperTransport"));
    }
}
