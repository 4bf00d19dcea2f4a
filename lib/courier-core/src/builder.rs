//! Building transport requests from service descriptors.

use bytes::Bytes;

use crate::{
    ContentType, Error, ErrorKind, FormSerializer, JsonSerializer, Request, RequestSerializer,
    Result, Service,
};

/// Build the transport request for a service.
///
/// Caller headers go first so that `Content-Type` (when the service has one)
/// and `Accept` always win. A pre-built body is used as-is; otherwise the
/// parameters, if any, are serialized with the custom serializer or the
/// default one for the content type.
///
/// # Errors
///
/// - [`ErrorKind::General`] if the URL cannot be parsed.
/// - [`ErrorKind::Serializer`] if no serializer applies or serialization fails.
///
/// # Example
///
/// ```
/// use courier_core::{AcceptType, Method, Service, build_request};
///
/// let service = Service::builder(Method::Get, "https://api.example.com/characters")
///     .accept(AcceptType::Json)
///     .build();
///
/// let request = build_request(&service).unwrap();
/// assert_eq!(request.header("Accept"), Some("application/json"));
/// assert!(request.body().is_none());
/// ```
pub fn build_request(service: &Service) -> Result<Request> {
    let url = url::Url::parse(service.url())
        .map_err(|err| Error::general(format!("invalid URL {:?}: {err}", service.url())))?;

    let mut builder = Request::builder(service.method().clone(), url).timeout(service.timeout());

    if let Some(headers) = service.headers() {
        builder = builder.headers(
            headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
    }
    if let Some(content_type) = service.content_type() {
        builder = builder.header("Content-Type", content_type.as_str());
    }
    builder = builder.header("Accept", service.accept().as_str());

    if let Some(body) = resolve_body(service)? {
        builder = builder.body(body);
    }

    Ok(builder.build())
}

fn resolve_body(service: &Service) -> Result<Option<Bytes>> {
    if let Some(body) = service.body() {
        return Ok(Some(body.clone()));
    }

    let Some(parameters) = service.parameters().filter(|parameters| !parameters.is_empty()) else {
        return Ok(None);
    };

    let result = match (service.serializer(), service.content_type()) {
        (Some(serializer), _) => serializer.serialize(parameters),
        (None, Some(ContentType::Json)) => JsonSerializer.serialize(parameters),
        (None, Some(ContentType::Form)) => FormSerializer.serialize(parameters),
        (None, other) => {
            let content_type = other.map_or("none", ContentType::as_str);
            return Err(Error::serializer(format!(
                "no default serializer for content type: {content_type}"
            )));
        }
    };

    result
        .map(Some)
        .map_err(|err| Error::from_boxed(ErrorKind::Serializer, err))
}
