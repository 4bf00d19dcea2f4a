//! Tower middleware layers for courier sessions.
//!
//! Layers registered on a [`CourierBuilder`](crate::CourierBuilder) wrap every
//! session, including the ones created by a reset. They run above the
//! session's concurrency limit, so a layer sees a call as soon as it is
//! submitted, even if it then waits for a slot.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs calls and outcomes using `tracing`
//! - [`ConcurrencyLimitLayer`] - Extra concurrency limit on top of the session one
//!
//! # Example
//!
//! ```ignore
//! use courier::Courier;
//! use courier::middleware::LoggingLayer;
//!
//! let courier = Courier::builder()
//!     .max_concurrent_requests(8)
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::ServiceBuilder;
pub use tower::limit::ConcurrencyLimitLayer;
