//! Advanced-search request shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Queryable attribute; dotted paths reach nested fields.
    pub field: String,
    /// Comparator such as `equals`, `contains`, or `>=`.
    pub operator: String,
    /// Operand. Numbers and booleans are accepted and kept as text.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl Rule {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Modifiers applied across every rule of a request.
///
/// Flags arrive as strings or booleans from different clients and are
/// kept raw; see `Extras::is_set`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_all: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_any: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_word: Option<Value>,
    /// Target collection type name.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
    /// Organizational-unit scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
}

impl Extras {
    /// A flag is set when present, non-empty, and not `false`, `0`, or `no`.
    pub fn is_set(flag: Option<&Value>) -> bool {
        match flag {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => {
                let s = s.trim();
                !(s.is_empty()
                    || s == "0"
                    || s.eq_ignore_ascii_case("false")
                    || s.eq_ignore_ascii_case("no"))
            }
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
        }
    }
}

/// A rule list plus extras.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSearchRequest {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub extras: Extras,
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "rule value must be a scalar, got {other}"
        ))),
    }
}
