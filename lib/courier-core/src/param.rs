//! Dynamic request parameters.

use std::collections::BTreeMap;

use serde::Serialize;

/// Parameter bag for a request body, keyed by name.
///
/// Keys are kept in order, which also fixes the order of form-encoded pairs.
pub type Parameters = BTreeMap<String, Param>;

/// A dynamically typed parameter value.
///
/// # Example
///
/// ```
/// use courier_core::{Param, Parameters};
///
/// let mut params = Parameters::new();
/// params.insert("name".to_string(), Param::from("Homer"));
/// params.insert("age".to_string(), Param::from(39));
/// params.insert("tags".to_string(), Param::from(vec![Param::from("dad")]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number. Non-finite values cannot be sent as JSON.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    List(Vec<Param>),
    /// A nested mapping.
    Map(BTreeMap<String, Param>),
}

impl Param {
    /// Returns `true` for scalar values (anything but lists and maps).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Path of the first value that has no JSON representation, if any.
    ///
    /// `root` names this value; nested entries append `.key` or `[index]`.
    #[must_use]
    pub fn find_non_encodable(&self, root: &str) -> Option<String> {
        match self {
            Self::Float(value) if !value.is_finite() => Some(root.to_string()),
            Self::List(values) => values
                .iter()
                .enumerate()
                .find_map(|(index, value)| value.find_non_encodable(&format!("{root}[{index}]"))),
            Self::Map(entries) => entries
                .iter()
                .find_map(|(key, value)| value.find_non_encodable(&format!("{root}.{key}"))),
            _ => None,
        }
    }
}

/// Scalars render as plain text, nested values as JSON.
impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::List(_) | Self::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Param>> for Param {
    fn from(values: Vec<Param>) -> Self {
        Self::List(values)
    }
}

impl From<BTreeMap<String, Param>> for Param {
    fn from(entries: BTreeMap<String, Param>) -> Self {
        Self::Map(entries)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Param {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            Value::String(value) => Self::String(value),
            Value::Array(values) => Self::List(values.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
