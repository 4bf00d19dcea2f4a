//! Media types used for the `Accept` and `Content-Type` headers.

/// Media type the caller expects in the response.
///
/// [`AcceptType::Any`] disables content-type validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AcceptType {
    /// `application/xml`
    Xml,
    /// `application/json`
    Json,
    /// `text/html`
    Html,
    /// `text/plain`
    Text,
    /// `text/javascript`
    Javascript,
    /// `*/*`
    #[default]
    Any,
    /// Any other media type.
    Custom(String),
}

impl AcceptType {
    /// Get the MIME type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
            Self::Html => "text/html",
            Self::Text => "text/plain",
            Self::Javascript => "text/javascript",
            Self::Any => "*/*",
            Self::Custom(media_type) => media_type,
        }
    }
}

impl std::fmt::Display for AcceptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type of a request body.
///
/// Selects the built-in serializer when a service carries parameters but
/// neither a pre-built body nor a custom serializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/xml`
    Xml,
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
    /// Any other media type.
    Custom(String),
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
            Self::Custom(media_type) => media_type,
        }
    }

    /// Parse a `Content-Type` header value.
    ///
    /// Parameters such as `charset` are ignored when matching the known types;
    /// an unknown type keeps the whole header value.
    ///
    /// ```
    /// use courier_core::ContentType;
    ///
    /// assert_eq!(
    ///     ContentType::from_header_value("application/json; charset=utf-8"),
    ///     ContentType::Json
    /// );
    /// assert_eq!(
    ///     ContentType::from_header_value("text/csv; header=present"),
    ///     ContentType::Custom("text/csv; header=present".to_string())
    /// );
    /// ```
    #[must_use]
    pub fn from_header_value(value: &str) -> Self {
        match media_type(value) {
            "application/xml" => Self::Xml,
            "application/json" => Self::Json,
            "application/x-www-form-urlencoded" => Self::Form,
            _ => Self::Custom(value.to_string()),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The media type of a `Content-Type` header value, without its parameters.
///
/// Everything before the first `;` is kept as-is, surrounding whitespace
/// included.
///
/// ```
/// assert_eq!(courier_core::media_type("text/html; charset=utf-8"), "text/html");
/// assert_eq!(courier_core::media_type(""), "");
/// ```
#[must_use]
pub fn media_type(header_value: &str) -> &str {
    header_value
        .split_once(';')
        .map_or(header_value, |(media_type, _parameters)| media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_type_as_str() {
        assert_eq!(AcceptType::Xml.as_str(), "application/xml");
        assert_eq!(AcceptType::Json.as_str(), "application/json");
        assert_eq!(AcceptType::Html.as_str(), "text/html");
        assert_eq!(AcceptType::Text.as_str(), "text/plain");
        assert_eq!(AcceptType::Javascript.as_str(), "text/javascript");
        assert_eq!(AcceptType::Any.as_str(), "*/*");
        assert_eq!(
            AcceptType::Custom("image/png".to_string()).as_str(),
            "image/png"
        );
    }

    #[test]
    fn accept_type_default_is_any() {
        assert_eq!(AcceptType::default(), AcceptType::Any);
    }

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Xml.as_str(), "application/xml");
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::Form.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }

    #[test]
    fn content_type_from_header_value() {
        assert_eq!(
            ContentType::from_header_value("application/xml"),
            ContentType::Xml
        );
        assert_eq!(
            ContentType::from_header_value("application/x-www-form-urlencoded;charset=utf-8"),
            ContentType::Form
        );
        assert_eq!(
            ContentType::from_header_value("text/plain"),
            ContentType::Custom("text/plain".to_string())
        );
    }

    #[test]
    fn media_type_strips_parameters() {
        assert_eq!(media_type("application/json"), "application/json");
        assert_eq!(
            media_type("application/json; charset=utf-8"),
            "application/json"
        );
        assert_eq!(media_type("text/html;charset=utf-8"), "text/html");
        assert_eq!(media_type(";charset=utf-8"), "");
    }

    #[test]
    fn media_type_keeps_whitespace() {
        assert_eq!(media_type(" application/json"), " application/json");
        assert_eq!(media_type("text/html ; charset=utf-8"), "text/html ");
    }
}
