//! Response validation.

use crate::{AcceptType, Error, Response, Result, media_type};

/// Check the status code and the content type of a response.
///
/// Canned test responses go through this exact check too.
///
/// # Errors
///
/// - [`ErrorKind::StatusCode`](crate::ErrorKind::StatusCode) when the status is
///   outside `200..300`.
/// - [`ErrorKind::ContentType`](crate::ErrorKind::ContentType) when the media
///   type differs from the accept type (never for [`AcceptType::Any`]).
///
/// The returned error does not carry the response yet; see
/// [`Error::with_response`].
pub fn validate(response: &Response, accept: &AcceptType) -> Result<()> {
    check_status(response.status())?;
    check_content_type(response, accept)
}

/// Fail with a status code error unless `status` is in `200..300`.
///
/// # Errors
///
/// Returns [`ErrorKind::StatusCode`](crate::ErrorKind::StatusCode) carrying the status.
pub fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(Error::status_code(status))
    }
}

/// Fail unless the response media type matches the accept type exactly.
///
/// A missing `Content-Type` header reads as the empty media type.
///
/// # Errors
///
/// Returns [`ErrorKind::ContentType`](crate::ErrorKind::ContentType) naming
/// both media types.
pub fn check_content_type(response: &Response, accept: &AcceptType) -> Result<()> {
    if *accept == AcceptType::Any {
        return Ok(());
    }

    let received = response.header("Content-Type").map_or("", media_type);
    let expected = accept.as_str();
    if received == expected {
        Ok(())
    } else {
        Err(Error::content_type(expected, received))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{ErrorKind, error::keys};

    fn response(status: u16, content_type: Option<&str>) -> Response {
        let mut headers = HashMap::new();
        if let Some(content_type) = content_type {
            headers.insert("Content-Type".to_string(), content_type.to_string());
        }
        Response::new(status, headers, None)
    }

    #[test]
    fn status_fails_iff_outside_2xx() {
        for status in 100..=599_u16 {
            let result = check_status(status);
            let expected_ok = (200..300).contains(&status);
            check!(result.is_ok() == expected_ok, "status {status}");
            if let Err(err) = result {
                check!(err.kind() == ErrorKind::StatusCode);
                check!(err.status() == Some(status));
            }
        }
        check!(check_status(0).is_err());
        check!(check_status(u16::MAX).is_err());
    }

    #[test]
    fn any_accepts_every_content_type() {
        for content_type in [
            None,
            Some(""),
            Some("text/html"),
            Some("application/json; charset=utf-8"),
            Some("image/png"),
        ] {
            check!(validate(&response(200, content_type), &AcceptType::Any).is_ok());
        }
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let response = response(200, Some("application/json; charset=utf-8"));
        check!(validate(&response, &AcceptType::Json).is_ok());
    }

    #[test]
    fn padded_media_type_is_a_mismatch() {
        let_assert!(
            Err(err) = validate(&response(200, Some(" application/json")), &AcceptType::Json)
        );
        check!(err.kind() == ErrorKind::ContentType);
        check!(err.get(keys::RECEIVED).and_then(crate::ContextValue::as_str) == Some(" application/json"));
    }

    #[test]
    fn content_type_header_name_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        let response = Response::new(200, headers, None);

        check!(validate(&response, &AcceptType::Text).is_ok());
    }

    #[test]
    fn mismatch_names_both_types() {
        let_assert!(
            Err(err) = validate(&response(200, Some("text/html")), &AcceptType::Json)
        );
        check!(err.kind() == ErrorKind::ContentType);
        check!(
            err.description() == Some("expecting Content-Type [application/json] but got [text/html]")
        );
        check!(err.get(keys::EXPECTED).and_then(crate::ContextValue::as_str) == Some("application/json"));
        check!(err.get(keys::RECEIVED).and_then(crate::ContextValue::as_str) == Some("text/html"));
    }

    #[test]
    fn missing_header_reads_as_empty() {
        let_assert!(Err(err) = validate(&response(200, None), &AcceptType::Xml));
        check!(err.get(keys::RECEIVED).and_then(crate::ContextValue::as_str) == Some(""));
    }

    #[test]
    fn custom_accept_type() {
        let accept = AcceptType::Custom("image/png".to_string());
        check!(validate(&response(200, Some("image/png")), &accept).is_ok());
        check!(validate(&response(200, Some("image/jpeg")), &accept).is_err());
    }

    #[test]
    fn status_checked_before_content_type() {
        let_assert!(
            Err(err) = validate(&response(500, Some("text/html")), &AcceptType::Json)
        );
        check!(err.kind() == ErrorKind::StatusCode);
    }
}
