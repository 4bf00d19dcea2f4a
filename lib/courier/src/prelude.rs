//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    AcceptType, ClientConfig, ContentType, Courier, Error, ErrorKind, Method, Param, Parameters,
    Request, Response, Result, Service, SessionDelegate, StatusCode, Transport, header, keys,
};
pub use serde::{Deserialize, Serialize};
