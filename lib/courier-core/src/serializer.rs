//! Request body serializers.
//!
//! A [`RequestSerializer`] turns a [`Parameters`] bag into body bytes. The
//! request builder picks [`JsonSerializer`] or [`FormSerializer`] from the
//! service content type unless the service carries its own serializer.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{BoxError, Error, Parameters, error::keys};

/// Encodes a parameter bag into request body bytes.
///
/// Errors returned here are reported to the caller as
/// [`ErrorKind::Serializer`](crate::ErrorKind::Serializer); returning a
/// courier [`Error`] keeps its context.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use courier_core::{BoxError, Parameters, RequestSerializer};
///
/// struct KeysOnly;
///
/// impl RequestSerializer for KeysOnly {
///     fn serialize(&self, parameters: &Parameters) -> Result<Bytes, BoxError> {
///         let keys: Vec<&str> = parameters.keys().map(String::as_str).collect();
///         Ok(Bytes::from(keys.join(",")))
///     }
/// }
/// ```
pub trait RequestSerializer: Send + Sync {
    /// Encode the parameters.
    fn serialize(&self, parameters: &Parameters) -> Result<Bytes, BoxError>;
}

/// Serializes parameters as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl RequestSerializer for JsonSerializer {
    fn serialize(&self, parameters: &Parameters) -> Result<Bytes, BoxError> {
        if let Some(path) = parameters
            .iter()
            .find_map(|(key, value)| value.find_non_encodable(key))
        {
            return Err(
                Error::serializer(format!("will not produce a valid JSON object: {path}"))
                    .with_context(keys::PATH, path)
                    .into(),
            );
        }

        let body = serde_json::to_vec(parameters)
            .map_err(|err| Error::serializer(format!("JSON serialization error: {err}")))?;
        Ok(Bytes::from(body))
    }
}

/// URL query characters, less `+` and `&`.
///
/// Everything outside this set is percent-encoded, so a literal `+` or `&`
/// in a key or value never reads as a space or a pair separator.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'@')
    .remove(b'_')
    .remove(b'~');

/// Serializes a one-level parameter map as `application/x-www-form-urlencoded`.
///
/// ```
/// use courier_core::{FormSerializer, Param, Parameters, RequestSerializer};
///
/// let mut params = Parameters::new();
/// params.insert("a".to_string(), Param::from("1"));
/// params.insert("b".to_string(), Param::from("x+y&z"));
///
/// let body = FormSerializer.serialize(&params).unwrap();
/// assert_eq!(body.as_ref(), b"a=1&b=x%2By%26z");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FormSerializer;

impl FormSerializer {
    fn encode(text: &str) -> String {
        utf8_percent_encode(text, FORM_ENCODE_SET).to_string()
    }
}

impl RequestSerializer for FormSerializer {
    fn serialize(&self, parameters: &Parameters) -> Result<Bytes, BoxError> {
        if let Some((key, _)) = parameters.iter().find(|(_, value)| !value.is_scalar()) {
            return Err(Error::serializer(
                "parameters must be a one-level mapping of string keys to scalar values",
            )
            .with_context(keys::PATH, key.as_str())
            .into());
        }

        let body = parameters
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    Self::encode(key),
                    Self::encode(&value.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        Ok(Bytes::from(body))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{ErrorKind, Param};

    fn params(entries: &[(&str, Param)]) -> Parameters {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    fn categorize(err: BoxError) -> Error {
        Error::from_boxed(ErrorKind::Serializer, err)
    }

    #[test]
    fn json_serialize() {
        let body = JsonSerializer
            .serialize(&params(&[
                ("name", Param::from("Marge")),
                ("age", Param::from(36)),
                ("kids", Param::from(vec![Param::from("Bart"), Param::from("Lisa")])),
            ]))
            .expect("serialize");

        let value: serde_json::Value = serde_json::from_slice(&body).expect("valid json");
        check!(
            value
                == serde_json::json!({"name": "Marge", "age": 36, "kids": ["Bart", "Lisa"]})
        );
    }

    #[test]
    fn json_rejects_non_finite_numbers() {
        let mut nested = BTreeMap::new();
        nested.insert("ratio".to_string(), Param::from(f64::NAN));

        let_assert!(
            Err(err) = JsonSerializer.serialize(&params(&[("stats", Param::from(nested))]))
        );
        let err = categorize(err);
        check!(err.kind() == ErrorKind::Serializer);
        check!(err.get(keys::PATH).and_then(crate::ContextValue::as_str) == Some("stats.ratio"));
    }

    #[test]
    fn form_serialize() {
        let body = FormSerializer
            .serialize(&params(&[
                ("name", Param::from("Ned Flanders")),
                ("neighbor", Param::from(true)),
                ("age", Param::from(60)),
            ]))
            .expect("serialize");

        assert_eq!(body.as_ref(), b"age=60&name=Ned%20Flanders&neighbor=true");
    }

    #[test]
    fn form_escapes_plus_and_ampersand() {
        let body = FormSerializer
            .serialize(&params(&[("a", Param::from("1")), ("b", Param::from("x+y&z"))]))
            .expect("serialize");
        let text = std::str::from_utf8(&body).expect("ascii");

        // The only literal '&' separates the two pairs
        check!(text.matches('&').count() == 1);
        check!(!text.contains('+'));

        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(&body)
            .into_owned()
            .collect();
        check!(
            decoded
                == vec![
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "x+y&z".to_string()),
                ]
        );
    }

    #[test]
    fn form_has_no_trailing_separator() {
        let body = FormSerializer
            .serialize(&params(&[("only", Param::from("one"))]))
            .expect("serialize");
        assert_eq!(body.as_ref(), b"only=one");
    }

    #[test]
    fn form_rejects_nested_values() {
        let_assert!(
            Err(err) = FormSerializer.serialize(&params(&[
                ("ok", Param::from("1")),
                ("list", Param::from(vec![Param::from(1)])),
            ]))
        );
        let err = categorize(err);
        check!(err.kind() == ErrorKind::Serializer);
        let_assert!(Some(description) = err.description());
        check!(description.contains("one-level mapping"));
        check!(err.get(keys::PATH).and_then(crate::ContextValue::as_str) == Some("list"));
    }

    #[test]
    fn form_encodes_unicode() {
        let body = FormSerializer
            .serialize(&params(&[("name", Param::from("Moe's Tavérn"))]))
            .expect("serialize");
        assert_eq!(body.as_ref(), b"name=Moe's%20Tav%C3%A9rn");
    }
}
