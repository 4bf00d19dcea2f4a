//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    AcceptType, ContentType, Error, ErrorKind, Method, Param, Parameters, RequestSerializer,
    Response, Result, Service, ServiceBuilder, SessionDelegate, Transport,
};
