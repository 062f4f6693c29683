//! Backend-neutral filter predicates.
//!
//! A [`Predicate`] is a structured condition tree. Store backends either
//! translate it into their own query language or evaluate it directly with
//! [`Predicate::matches`]; both must agree on the semantics documented on
//! each variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordering comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Textual equality.
    Eq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

/// A structured condition over document fields.
///
/// Field names are dotted paths into nested objects (`"meta.level"`).
/// A condition on a missing or `null` field is false; wrap it in
/// [`Predicate::Not`] to select documents lacking the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every document.
    All,
    /// `Eq` compares the textual rendering of scalars (`3` equals `"3"`,
    /// `true` equals `"true"`), and also matches a stored number that is
    /// numerically equal to a numeric operand (`3.0` equals `3`). Ordering
    /// operators compare numerically when
    /// the operand is numeric and the field holds a number, and
    /// lexicographically when both are strings.
    Compare {
        /// Field path.
        field: String,
        /// Operator.
        op: CompareOp,
        /// Operand.
        value: Value,
    },
    /// Case-insensitive substring containment.
    Contains {
        /// Field path.
        field: String,
        /// Substring to look for.
        value: String,
    },
    /// Case-insensitive prefix match.
    StartsWith {
        /// Field path.
        field: String,
        /// Expected prefix.
        value: String,
    },
    /// Case-insensitive suffix match.
    EndsWith {
        /// Field path.
        field: String,
        /// Expected suffix.
        value: String,
    },
    /// Case-insensitive whole-word match: `value` must appear bounded by
    /// non-word characters or the ends of the text.
    Word {
        /// Field path.
        field: String,
        /// Word to look for.
        value: String,
    },
    /// Set membership, with the same equality rules as `Compare { Eq }`.
    In {
        /// Field path.
        field: String,
        /// Candidate values.
        values: Vec<Value>,
    },
    /// Negation.
    Not {
        /// Negated condition.
        predicate: Box<Predicate>,
    },
    /// Conjunction; empty means true.
    And {
        /// Operands.
        predicates: Vec<Predicate>,
    },
    /// Disjunction; empty means false.
    Or {
        /// Operands.
        predicates: Vec<Predicate>,
    },
}

impl Predicate {
    /// Equality on a field.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    /// Negate a predicate.
    pub fn negate(predicate: Predicate) -> Self {
        Self::Not {
            predicate: Box::new(predicate),
        }
    }

    /// Conjunction, collapsing trivial cases.
    pub fn and(mut predicates: Vec<Predicate>) -> Self {
        predicates.retain(|p| *p != Predicate::All);
        match predicates.len() {
            0 => Self::All,
            1 => predicates.remove(0),
            _ => Self::And { predicates },
        }
    }

    /// Disjunction, collapsing a single operand.
    pub fn or(mut predicates: Vec<Predicate>) -> Self {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        Self::Or { predicates }
    }

    /// Evaluate the predicate against a JSON document.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::All => true,
            Self::Compare { field, op, value } => {
                lookup(doc, field).is_some_and(|actual| compare(actual, *op, value))
            }
            Self::Contains { field, value } => {
                text_at(doc, field).is_some_and(|t| t.to_lowercase().contains(&value.to_lowercase()))
            }
            Self::StartsWith { field, value } => text_at(doc, field)
                .is_some_and(|t| t.to_lowercase().starts_with(&value.to_lowercase())),
            Self::EndsWith { field, value } => text_at(doc, field)
                .is_some_and(|t| t.to_lowercase().ends_with(&value.to_lowercase())),
            Self::Word { field, value } => {
                text_at(doc, field).is_some_and(|t| contains_word(&t, value))
            }
            Self::In { field, values } => lookup(doc, field)
                .is_some_and(|actual| values.iter().any(|candidate| scalar_eq(actual, candidate))),
            Self::Not { predicate } => !predicate.matches(doc),
            Self::And { predicates } => predicates.iter().all(|p| p.matches(doc)),
            Self::Or { predicates } => predicates.iter().any(|p| p.matches(doc)),
        }
    }
}

/// Whether a field path is acceptable in a predicate.
///
/// Paths are non-empty, dot-separated segments of ASCII letters, digits,
/// and underscores.
pub fn is_valid_field(field: &str) -> bool {
    !field.is_empty()
        && field.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Resolve a dotted field path inside a document.
pub fn lookup<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(doc, |current, segment| current.as_object()?.get(segment))
}

/// Textual rendering of a scalar; `None` for null, arrays, and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an operand as a number, accepting numeric strings.
pub fn numeric_operand(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn text_at(doc: &Value, field: &str) -> Option<String> {
    lookup(doc, field).and_then(scalar_text)
}

fn compare(actual: &Value, op: CompareOp, operand: &Value) -> bool {
    if op == CompareOp::Eq {
        return scalar_eq(actual, operand);
    }

    let ordering = if let Some(rhs) = numeric_operand(operand) {
        match actual {
            Value::Number(n) => n.as_f64().and_then(|lhs| lhs.partial_cmp(&rhs)),
            _ => None,
        }
    } else {
        match (actual, operand) {
            (Value::String(lhs), Value::String(rhs)) => Some(lhs.as_str().cmp(rhs.as_str())),
            _ => None,
        }
    };

    ordering.is_some_and(|ord| match op {
        CompareOp::Gt => ord.is_gt(),
        CompareOp::Gte => ord.is_ge(),
        CompareOp::Lt => ord.is_lt(),
        CompareOp::Lte => ord.is_le(),
        CompareOp::Eq => ord.is_eq(),
    })
}

/// Text equality, or numeric equality when `actual` is a stored number.
fn scalar_eq(actual: &Value, operand: &Value) -> bool {
    let Some(expected) = scalar_text(operand) else {
        return false;
    };
    if scalar_text(actual).is_some_and(|t| t == expected) {
        return true;
    }
    match (actual, numeric_operand(operand)) {
        (Value::Number(n), Some(rhs)) => n.as_f64() == Some(rhs),
        _ => false,
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    let haystack = text.to_lowercase();
    let needle = word.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(&needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(name: &str) -> Value {
        json!({"name": name, "credits": 4, "active": true, "meta": {"level": "intro"}})
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let p = Predicate::Contains {
            field: "name".into(),
            value: "lab".into(),
        };
        assert!(p.matches(&course("Laboratory Safety")));
        assert!(!p.matches(&course("Orientation")));
    }

    #[test]
    fn test_eq_uses_text_rendering() {
        assert!(Predicate::eq("credits", "4").matches(&course("x")));
        assert!(Predicate::eq("active", "true").matches(&course("x")));
        assert!(Predicate::eq("meta.level", "intro").matches(&course("x")));
        assert!(!Predicate::eq("missing", "x").matches(&course("x")));
    }

    #[test]
    fn test_numeric_and_lexicographic_comparison() {
        let gt = |field: &str, value: Value| Predicate::Compare {
            field: field.into(),
            op: CompareOp::Gt,
            value,
        };
        assert!(gt("credits", json!("3")).matches(&course("x")));
        assert!(!gt("credits", json!(4)).matches(&course("x")));
        assert!(gt("name", json!("Alpha")).matches(&course("Beta")));
        // numeric operand never matches a string field
        assert!(!gt("name", json!("1")).matches(&course("Beta")));
    }

    #[test]
    fn test_word_respects_boundaries() {
        let p = Predicate::Word {
            field: "name".into(),
            value: "lab".into(),
        };
        assert!(p.matches(&course("Chemistry Lab 101")));
        assert!(!p.matches(&course("Laboratory Safety")));
        assert!(p.matches(&course("lab")));
    }

    #[test]
    fn test_in_and_not() {
        let p = Predicate::In {
            field: "credits".into(),
            values: vec![json!("3"), json!("4")],
        };
        assert!(p.matches(&course("x")));
        assert!(!Predicate::negate(p).matches(&course("x")));
        assert!(Predicate::negate(Predicate::eq("missing", "x")).matches(&course("x")));
    }

    #[test]
    fn test_integer_operand_matches_float_storage() {
        let doc = json!({"name": "Algebra", "credits": 3.0});
        assert!(Predicate::eq("credits", 3).matches(&doc));
        assert!(Predicate::eq("credits", "3").matches(&doc));
        assert!(!Predicate::eq("credits", "4").matches(&doc));
        let in_list = Predicate::In {
            field: "credits".into(),
            values: vec![json!("3"), json!("4")],
        };
        assert!(in_list.matches(&doc));
        assert!(!Predicate::negate(in_list).matches(&doc));
        // stored strings stay textual
        assert!(!Predicate::eq("code", 3).matches(&json!({"code": "3.0"})));
    }

    #[test]
    fn test_and_or_collapse() {
        assert_eq!(Predicate::and(vec![]), Predicate::All);
        assert_eq!(
            Predicate::and(vec![Predicate::All, Predicate::eq("a", 1)]),
            Predicate::eq("a", 1)
        );
        assert!(!Predicate::Or { predicates: vec![] }.matches(&course("x")));
    }

    #[test]
    fn test_valid_field_names() {
        assert!(is_valid_field("name"));
        assert!(is_valid_field("meta.level_2"));
        assert!(!is_valid_field(""));
        assert!(!is_valid_field("a..b"));
        assert!(!is_valid_field("name'; drop"));
    }
}
