//! Session-backed transport using hyper-util.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tower::Layer;
use tower::limit::ConcurrencyLimitLayer;
use tower::util::BoxCloneService;
use tracing::debug;

use crate::session::{RawSession, Session};
use crate::{BoxedService, ClientConfig, Request, Response, Result, Transport};

pub(crate) type LayerFn = Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>;

/// Transport over one shared, resettable session.
///
/// Each session owns its own connection pool and its own concurrency limit
/// ([`ClientConfig::max_concurrent_requests`]); calls beyond the limit wait
/// for a slot. [`Transport::reset`] swaps in a brand new session and fails
/// every call still pending on the old one.
///
/// # Example
///
/// ```ignore
/// use courier::{ClientConfig, HyperTransport, Transport};
///
/// let transport = HyperTransport::with_config(
///     ClientConfig::builder().max_concurrent_requests(2).build(),
/// );
/// transport.reset();
/// assert_eq!(transport.session_id(), 1);
/// ```
pub struct HyperTransport {
    config: ClientConfig,
    layers: Vec<LayerFn>,
    generation: AtomicU64,
    session: RwLock<Arc<Session>>,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .field("session_id", &self.session_id())
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration (no middleware).
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_layers(config, Vec::new())
    }

    pub(crate) fn with_layers(config: ClientConfig, layers: Vec<LayerFn>) -> Self {
        let session = Self::open_session(0, &config, &layers);
        Self {
            config,
            layers,
            generation: AtomicU64::new(0),
            session: RwLock::new(Arc::new(session)),
        }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Identifier of the current session; starts at 0 and grows by one per reset.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.current().id()
    }

    fn current(&self) -> Arc<Session> {
        Arc::clone(&self.session.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn open_session(id: u64, config: &ClientConfig, layers: &[LayerFn]) -> Session {
        let raw = RawSession::new(config);

        // The limit sits right above the raw session so user layers see queued calls
        let mut service: BoxedService = BoxCloneService::new(
            ConcurrencyLimitLayer::new(config.max_concurrent_requests).layer(raw),
        );

        // Apply user layers in order (last added = outermost)
        for layer_fn in layers {
            service = layer_fn(service);
        }

        Session::new(id, service)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let session = self.current();
        session.call(request).await
    }

    fn reset(&self) {
        let mut current = self.session.write().unwrap_or_else(PoisonError::into_inner);
        let id = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let fresh = Arc::new(Self::open_session(id, &self.config, &self.layers));
        let previous = std::mem::replace(&mut *current, fresh);

        // Still under the write lock: nothing can pick up the old session now
        previous.invalidate();
        debug!(previous = previous.id(), session = id, "session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reset_bumps_session_id() {
        let transport = HyperTransport::new();
        assert_eq!(transport.session_id(), 0);

        transport.reset();
        transport.reset();
        assert_eq!(transport.session_id(), 2);
    }

    #[tokio::test]
    async fn reset_invalidates_previous_session() {
        let transport = HyperTransport::new();
        let before = transport.current();

        transport.reset();

        assert!(before.is_invalidated());
        assert!(!transport.current().is_invalidated());
    }

    #[test]
    fn transport_is_debug() {
        let transport = HyperTransport::new();
        let debug = format!("{transport:?}");
        assert!(debug.contains("HyperTransport"));
        assert!(debug.contains("session_id"));
    }
}
