//! Translation of advanced-search rules and extras into a predicate.

use std::str::FromStr;

use serde_json::Value;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_core::types::filter::is_valid_field;
use coursehub_core::types::{Collection, CompareOp, Predicate};
use coursehub_entity::search::{Extras, Rule};

/// A recognized rule comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
}

impl FromStr for Operator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" | "=" | "==" => Self::Equals,
            "notequals" | "ne" | "!=" | "<>" => Self::NotEquals,
            "contains" | "like" => Self::Contains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "greaterthan" | "gt" | ">" => Self::GreaterThan,
            "greaterthanorequal" | "gte" | ">=" => Self::GreaterThanOrEqual,
            "lessthan" | "lt" | "<" => Self::LessThan,
            "lessthanorequal" | "lte" | "<=" => Self::LessThanOrEqual,
            "in" => Self::In,
            "notin" | "nin" => Self::NotIn,
            _ => return Err(AppError::unsupported_operator(s)),
        };
        Ok(op)
    }
}

/// The normalized form of an advanced-search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Requested collection type, unresolved.
    pub collection: Option<String>,
    /// Filter over that collection.
    pub predicate: Predicate,
}

/// How every rule is evaluated when an extras combinator is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Override {
    None,
    NotContains,
    SameWord,
    Containment,
}

/// Translate rules and extras into a [`SearchQuery`].
///
/// Every operator is validated even when a combinator replaces it, so a
/// request with an unknown comparator always fails.
pub fn build(rules: &[Rule], extras: &Extras) -> AppResult<SearchQuery> {
    let mode = if Extras::is_set(extras.not_contains.as_ref()) {
        Override::NotContains
    } else if Extras::is_set(extras.same_word.as_ref()) {
        Override::SameWord
    } else if Extras::is_set(extras.like_all.as_ref()) || Extras::is_set(extras.like_any.as_ref())
    {
        Override::Containment
    } else {
        Override::None
    };

    let predicates = rules
        .iter()
        .map(|rule| rule_predicate(rule, mode))
        .collect::<AppResult<Vec<_>>>()?;

    let combined = if predicates.is_empty() {
        Predicate::All
    } else if Extras::is_set(extras.like_any.as_ref()) {
        Predicate::or(predicates)
    } else {
        Predicate::and(predicates)
    };

    let collection = extras
        .collection_type
        .as_ref()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let predicate = match extras.ou {
        Some(ou) => {
            let scope = collection
                .as_deref()
                .and_then(Collection::from_type_name)
                .map_or("ou", |c| c.scope_field());
            Predicate::and(vec![combined, Predicate::eq(scope, ou)])
        }
        None => combined,
    };

    Ok(SearchQuery {
        collection,
        predicate,
    })
}

/// Resolve a search `type` to a collection.
pub fn resolve_collection(type_name: Option<&str>) -> AppResult<Collection> {
    let name = type_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("Search type is required"))?;
    Collection::from_type_name(name)
        .ok_or_else(|| AppError::validation(format!("Unknown search type: '{name}'")))
}

fn rule_predicate(rule: &Rule, mode: Override) -> AppResult<Predicate> {
    let operator: Operator = rule.operator.parse()?;
    let field = rule.field.trim();
    if !is_valid_field(field) {
        return Err(AppError::validation(format!(
            "Invalid field name: '{}'",
            rule.field
        )));
    }

    let field = field.to_string();
    let value = rule.value.clone();
    let predicate = match mode {
        Override::NotContains => Predicate::negate(Predicate::Contains { field, value }),
        Override::SameWord => Predicate::Word { field, value },
        Override::Containment => Predicate::Contains { field, value },
        Override::None => operator_predicate(operator, field, value),
    };
    Ok(predicate)
}

fn operator_predicate(operator: Operator, field: String, value: String) -> Predicate {
    let compare = |op| Predicate::Compare {
        field: field.clone(),
        op,
        value: Value::String(value.clone()),
    };
    let list = || {
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Value::String(v.to_string()))
            .collect::<Vec<_>>()
    };

    match operator {
        Operator::Equals => compare(CompareOp::Eq),
        Operator::NotEquals => Predicate::negate(compare(CompareOp::Eq)),
        Operator::Contains => Predicate::Contains {
            field: field.clone(),
            value: value.clone(),
        },
        Operator::StartsWith => Predicate::StartsWith {
            field: field.clone(),
            value: value.clone(),
        },
        Operator::EndsWith => Predicate::EndsWith {
            field: field.clone(),
            value: value.clone(),
        },
        Operator::GreaterThan => compare(CompareOp::Gt),
        Operator::GreaterThanOrEqual => compare(CompareOp::Gte),
        Operator::LessThan => compare(CompareOp::Lt),
        Operator::LessThanOrEqual => compare(CompareOp::Lte),
        Operator::In => Predicate::In {
            field: field.clone(),
            values: list(),
        },
        Operator::NotIn => Predicate::negate(Predicate::In {
            field: field.clone(),
            values: list(),
        }),
    }
}
