//! Sessions: a pooled hyper client behind a tower service stack.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::sync::watch;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use tower_service::Service;
use tracing::{debug, trace};

use crate::{ClientConfig, Error, Request, Response, Result, connector::https_connector};

/// Type-erased service for middleware composition.
///
/// Every session runs its calls through one of these.
pub type BoxedService = BoxCloneService<Request, Response, Error>;

// ============================================================================
// Raw Session (hyper access)
// ============================================================================

/// Pooled HTTP client for one session.
#[derive(Clone)]
pub(crate) struct RawSession {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawSession {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config));

        Self { inner }
    }

    /// Build a hyper request from a courier request.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, _timeout, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::try_from(&method)?)
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|err| Error::general(format!("invalid request: {err}")))
    }

    /// Extract response headers as a `HashMap`.
    ///
    /// Repeated headers are joined with `", "`; bytes that are not valid
    /// UTF-8 are replaced, never dropped.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        let mut extracted: HashMap<String, String> = HashMap::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes());
            extracted
                .entry(name.to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }
        extracted
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let hyper_request = Self::build_hyper_request(request)?;

        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|err| Error::general(format!("invalid response: {err}")))?
            .to_bytes();

        let body = (!body.is_empty()).then_some(body);
        Ok(Response::new(status, headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::general(format!("connection error: {msg}"));
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::general(format!("TLS error: {msg}"));
        }

        Error::general(format!("invalid response: {msg}"))
    }
}

impl Service<Request> for RawSession {
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let session = self.clone();
        Box::pin(async move { session.execute(request).await })
    }
}

// ============================================================================
// Session
// ============================================================================

/// One generation of the shared session.
///
/// Once invalidated, every call still waiting on this session, queued or in
/// flight, fails with a general error.
pub(crate) struct Session {
    id: u64,
    service: Mutex<BoxedService>,
    invalidated: watch::Sender<bool>,
}

impl Session {
    pub(crate) fn new(id: u64, service: BoxedService) -> Self {
        debug!(session = id, "session created");
        Self {
            id,
            service: Mutex::new(service),
            invalidated: watch::Sender::new(false),
        }
    }

    pub(crate) const fn id(&self) -> u64 {
        self.id
    }

    #[cfg(test)]
    pub(crate) fn is_invalidated(&self) -> bool {
        *self.invalidated.borrow()
    }

    /// Cancel everything still running on this session.
    pub(crate) fn invalidate(&self) {
        self.invalidated.send_replace(true);
        debug!(session = self.id, "session invalidated");
    }

    /// Run a call on this session.
    ///
    /// The request timeout starts now, so time spent waiting for a
    /// concurrency slot counts against it.
    pub(crate) async fn call(&self, request: Request) -> Result<Response> {
        // Lock, clone the service, and release the lock immediately
        let service = self
            .service
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut invalidated = self.invalidated.subscribe();
        let timeout = request.timeout();

        trace!(session = self.id, method = %request.method(), url = %request.url(), "dispatching");
        let exchange = async {
            tokio::select! {
                biased;
                () = async {
                    let _ = invalidated.wait_for(|invalidated| *invalidated).await;
                } => Err(Error::general("session invalidated")),
                result = service.oneshot(request) => result,
            }
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| Error::general(format!("request timed out after {timeout:?}")))?
    }
}
