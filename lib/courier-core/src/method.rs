//! HTTP method types.

use derive_more::Display;

use crate::Error;

/// HTTP request method.
///
/// Enumerated methods render as their canonical upper-case name; a
/// [`Method::Custom`] token is passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// HEAD method - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// CONNECT method - establish a tunnel.
    #[display("CONNECT")]
    Connect,
    /// OPTIONS method - retrieve allowed methods.
    #[display("OPTIONS")]
    Options,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// QUERY method - safe query with a request body.
    #[display("QUERY")]
    Query,
    /// TRACE method - loop-back diagnostic.
    #[display("TRACE")]
    Trace,
    /// Any other method token, sent as-is.
    #[display("{_0}")]
    Custom(String),
}

impl Method {
    /// The method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Query => "QUERY",
            Self::Trace => "TRACE",
            Self::Custom(token) => token,
        }
    }

    /// Returns `true` if the method is safe (does not modify resources).
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(
            self,
            Self::Get | Self::Head | Self::Options | Self::Query | Self::Trace
        )
    }

    /// Returns `true` if the method is idempotent.
    #[must_use]
    pub const fn is_idempotent(&self) -> bool {
        matches!(
            self,
            Self::Get
                | Self::Head
                | Self::Options
                | Self::Query
                | Self::Trace
                | Self::Put
                | Self::Delete
        )
    }
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        match value {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "CONNECT" => Self::Connect,
            "OPTIONS" => Self::Options,
            "PATCH" => Self::Patch,
            "QUERY" => Self::Query,
            "TRACE" => Self::Trace,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl TryFrom<&Method> for http::Method {
    type Error = Error;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match method {
            Method::Get => Ok(Self::GET),
            Method::Post => Ok(Self::POST),
            Method::Put => Ok(Self::PUT),
            Method::Delete => Ok(Self::DELETE),
            Method::Head => Ok(Self::HEAD),
            Method::Connect => Ok(Self::CONNECT),
            Method::Options => Ok(Self::OPTIONS),
            Method::Patch => Ok(Self::PATCH),
            Method::Trace => Ok(Self::TRACE),
            other => Self::from_bytes(other.as_str().as_bytes())
                .map_err(|err| Error::general(format!("invalid HTTP method {other:?}: {err}"))),
        }
    }
}
