//! Async service client for Rust.
//!
//! Describe a call with a [`Service`], hand it to [`Courier::invoke`], and get
//! back either a validated [`Response`] or a categorized [`Error`].
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Character {
//!     name: String,
//! }
//!
//! let courier = Courier::new();
//!
//! let service = Service::builder(Method::Get, "https://api.example.com/characters/1")
//!     .accept(AcceptType::Json)
//!     .build();
//!
//! let character: Character = courier.invoke(&service).await?.json()?;
//! ```
//!
//! Canned responses take the network out of the picture while keeping the
//! same validation:
//!
//! ```ignore
//! let service = Service::builder(Method::Get, "https://x/ok")
//!     .accept(AcceptType::Json)
//!     .test_response(Response::with_content_type(404, "application/json", "{}"))
//!     .build();
//!
//! let err = courier.invoke(&service).await.unwrap_err();
//! assert_eq!(err.status(), Some(404));
//! ```

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod session;
mod transport;

pub use client::{Courier, CourierBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_MAX_CONCURRENT_REQUESTS};
pub use session::BoxedService;
pub use transport::HyperTransport;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    AcceptType, BoxError, ContentType, ContextValue, DEFAULT_TIMEOUT, Error, ErrorKind,
    FormSerializer, JsonSerializer, Method, Param, Parameters, Request, RequestSerializer,
    Response, Result, Service, ServiceBuilder, SessionDelegate, Transport, build_request,
    check_content_type, check_status, keys, media_type, validate,
};

// Re-export http types for status codes and headers
pub use courier_core::{StatusCode, header};
