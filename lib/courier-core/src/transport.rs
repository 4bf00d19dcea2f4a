//! Transport and session delegate traits.
//!
//! - [`Transport`] - Executes built requests on a shared, resettable session
//! - [`SessionDelegate`] - Per-call hooks around the network exchange
//!
//! The `courier` crate provides the hyper-based transport. Implement
//! [`Transport`] directly to simulate the network in tests.

use std::future::Future;

use crate::{Request, Response, Result};

/// Executes HTTP requests on a long-lived session.
///
/// Implementations must be safe for many concurrent callers.
///
/// # Example
///
/// ```
/// use courier_core::{Request, Response, Result, Transport};
///
/// struct AlwaysOk;
///
/// impl Transport for AlwaysOk {
///     async fn execute(&self, _request: Request) -> Result<Response> {
///         Ok(Response::with_content_type(200, "text/plain", "ok"))
///     }
///
///     fn reset(&self) {}
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Execute a request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`General`](crate::ErrorKind::General) error when the
    /// exchange fails below HTTP: connection, TLS, timeout, or an
    /// invalidated session. HTTP statuses are never errors here.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;

    /// Replace the session with a fresh one.
    ///
    /// Calls still pending on the previous session fail; calls started
    /// afterwards use the new session.
    fn reset(&self);
}

/// Hooks run around the network exchange of a single call.
///
/// Both hooks default to doing nothing. Delegates are not consulted when a
/// service carries a test response.
pub trait SessionDelegate: Send + Sync {
    /// Called with the built request just before it is sent.
    fn will_send(&self, request: &mut Request) {
        let _ = request;
    }

    /// Called with the raw response before it is validated.
    fn did_receive(&self, response: &Response) {
        let _ = response;
    }
}
