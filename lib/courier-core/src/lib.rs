//! Core types and pipeline stages for the courier service client.
//!
//! This crate is transport-agnostic. It provides:
//! - [`Service`] and [`ServiceBuilder`] - Declarative description of one call
//! - [`Method`], [`AcceptType`], [`ContentType`] - Request vocabulary
//! - [`Param`] and [`Parameters`] - Dynamic parameter bag for request bodies
//! - [`RequestSerializer`], [`JsonSerializer`], [`FormSerializer`] - Body encoders
//! - [`build_request`] - Turns a [`Service`] into a [`Request`]
//! - [`validate`] - Status and content-type checks on a [`Response`]
//! - [`Error`], [`ErrorKind`] and [`Result`] - Categorized errors
//! - [`Transport`] and [`SessionDelegate`] - Seams for the runtime crate

mod builder;
mod error;
mod media;
mod method;
mod param;
pub mod prelude;
mod request;
mod response;
mod serializer;
mod service;
mod transport;
mod validate;

pub use builder::build_request;
pub use error::{BoxError, ContextValue, Error, ErrorKind, Result, keys};
pub use media::{AcceptType, ContentType, media_type};
pub use method::Method;
pub use param::{Param, Parameters};
pub use request::Request;
pub use response::Response;
pub use serializer::{FormSerializer, JsonSerializer, RequestSerializer};
pub use service::{DEFAULT_TIMEOUT, Service, ServiceBuilder};
pub use transport::{SessionDelegate, Transport};
pub use validate::{check_content_type, check_status, validate};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
