//! In-process aggregation pipeline for dashboard analytics.
//!
//! Pipelines use the familiar document-database stage syntax
//! (`$match`, `$group`, `$sort`, `$skip`, `$limit`, `$project`, `$count`).
//! They are parsed up front so malformed input fails before any storage
//! call, then executed over the documents fetched from the store.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::filter::{CompareOp, Predicate, is_valid_field, lookup};

/// A parsed, validated pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pushdown: Predicate,
    stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Match(Predicate),
    Group(Grouping),
    Sort(Vec<(String, bool)>),
    Skip(usize),
    Limit(usize),
    Project(Projection),
    Count(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Field(String),
    Literal(Value),
    Object(Vec<(String, Expr)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccumulatorOp {
    Sum,
    Avg,
    Min,
    Max,
    Push,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
struct Grouping {
    key: Expr,
    accumulators: Vec<(String, AccumulatorOp, Expr)>,
}

#[derive(Debug, Clone, PartialEq)]
enum Projection {
    Include(Vec<String>, bool),
    Exclude(Vec<String>),
}

impl Pipeline {
    /// Parse raw stages. Unknown or malformed stages fail with a
    /// validation error.
    pub fn parse(stages: &[Value]) -> AppResult<Self> {
        let mut parsed = stages
            .iter()
            .enumerate()
            .map(|(i, stage)| parse_stage(stage).map_err(|e| at_stage(i, e)))
            .collect::<AppResult<Vec<_>>>()?;

        let pushdown = match parsed.first() {
            Some(Stage::Match(_)) => match parsed.remove(0) {
                Stage::Match(predicate) => predicate,
                _ => Predicate::All,
            },
            _ => Predicate::All,
        };

        Ok(Self {
            pushdown,
            stages: parsed,
        })
    }

    /// Filter that can be evaluated by the store before the pipeline runs.
    pub fn pushdown(&self) -> &Predicate {
        &self.pushdown
    }

    /// Execute the remaining stages over `docs`.
    pub fn run(&self, docs: Vec<Value>) -> Vec<Value> {
        self.stages
            .iter()
            .fold(docs, |docs, stage| apply_stage(stage, docs))
    }
}

fn at_stage(index: usize, err: AppError) -> AppError {
    AppError::validation(format!("Pipeline stage {index}: {}", err.message))
}

fn parse_stage(stage: &Value) -> AppResult<Stage> {
    let object = stage
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| AppError::validation("each stage must be an object with one operator"))?;
    let (name, stage_body) = object
        .iter()
        .next()
        .ok_or_else(|| AppError::validation("empty stage"))?;

    match name.as_str() {
        "$match" => parse_match(stage_body).map(Stage::Match),
        "$group" => parse_group(stage_body).map(Stage::Group),
        "$sort" => parse_sort(stage_body).map(Stage::Sort),
        "$skip" => parse_count_arg(stage_body, "$skip").map(Stage::Skip),
        "$limit" => parse_count_arg(stage_body, "$limit").map(Stage::Limit),
        "$project" => parse_project(stage_body).map(Stage::Project),
        "$count" => match stage_body.as_str() {
            Some(field) if is_valid_field(field) && !field.contains('.') => {
                Ok(Stage::Count(field.to_string()))
            }
            _ => Err(AppError::validation("$count expects a field name")),
        },
        other => Err(AppError::validation(format!("unsupported stage '{other}'"))),
    }
}

/// Parse a `$match` document into a predicate.
pub fn parse_match(stage_body: &Value) -> AppResult<Predicate> {
    let object = stage_body
        .as_object()
        .ok_or_else(|| AppError::validation("$match expects an object"))?;
    let mut predicates = Vec::with_capacity(object.len());
    for (key, value) in object {
        let predicate = match key.as_str() {
            "$and" | "$or" => {
                let branches = value
                    .as_array()
                    .ok_or_else(|| AppError::validation(format!("{key} expects an array")))?
                    .iter()
                    .map(parse_match)
                    .collect::<AppResult<Vec<_>>>()?;
                if key == "$and" {
                    Predicate::And {
                        predicates: branches,
                    }
                } else {
                    Predicate::Or {
                        predicates: branches,
                    }
                }
            }
            field if is_valid_field(field) => parse_field_condition(field, value)?,
            other => return Err(AppError::validation(format!("invalid field '{other}'"))),
        };
        predicates.push(predicate);
    }
    Ok(Predicate::and(predicates))
}

fn parse_field_condition(field: &str, value: &Value) -> AppResult<Predicate> {
    match value {
        Value::Object(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
            let conditions = ops
                .iter()
                .map(|(op, operand)| parse_operator(field, op, operand))
                .collect::<AppResult<Vec<_>>>()?;
            Ok(Predicate::and(conditions))
        }
        Value::Object(_) | Value::Array(_) => Err(AppError::validation(format!(
            "field '{field}' must be compared with a scalar or operator object"
        ))),
        scalar => Ok(Predicate::eq(field, scalar.clone())),
    }
}

fn parse_operator(field: &str, op: &str, operand: &Value) -> AppResult<Predicate> {
    let compare = |op| Predicate::Compare {
        field: field.to_string(),
        op,
        value: operand.clone(),
    };
    let list = || {
        operand
            .as_array()
            .cloned()
            .ok_or_else(|| AppError::validation(format!("{op} expects an array")))
    };
    Ok(match op {
        "$eq" => compare(CompareOp::Eq),
        "$ne" => Predicate::negate(compare(CompareOp::Eq)),
        "$gt" => compare(CompareOp::Gt),
        "$gte" => compare(CompareOp::Gte),
        "$lt" => compare(CompareOp::Lt),
        "$lte" => compare(CompareOp::Lte),
        "$in" => Predicate::In {
            field: field.to_string(),
            values: list()?,
        },
        "$nin" => Predicate::negate(Predicate::In {
            field: field.to_string(),
            values: list()?,
        }),
        other => {
            return Err(AppError::validation(format!(
                "unsupported match operator '{other}'"
            )));
        }
    })
}

fn parse_expr(value: &Value) -> AppResult<Expr> {
    match value {
        Value::String(s) if s.starts_with('$') => {
            let field = &s[1..];
            if is_valid_field(field) {
                Ok(Expr::Field(field.to_string()))
            } else {
                Err(AppError::validation(format!("invalid field reference '{s}'")))
            }
        }
        Value::Object(fields) => fields
            .iter()
            .map(|(k, v)| parse_expr(v).map(|e| (k.clone(), e)))
            .collect::<AppResult<Vec<_>>>()
            .map(Expr::Object),
        literal => Ok(Expr::Literal(literal.clone())),
    }
}

fn parse_group(stage_body: &Value) -> AppResult<Grouping> {
    let object = stage_body
        .as_object()
        .ok_or_else(|| AppError::validation("$group expects an object"))?;
    let key = object
        .get("_id")
        .ok_or_else(|| AppError::validation("$group requires an _id"))
        .and_then(parse_expr)?;

    let mut accumulators = Vec::new();
    for (name, acc) in object.iter().filter(|(k, _)| k.as_str() != "_id") {
        let (op_name, arg) = acc
            .as_object()
            .filter(|o| o.len() == 1)
            .and_then(|o| o.iter().next())
            .ok_or_else(|| {
                AppError::validation(format!("accumulator '{name}' must have one operator"))
            })?;
        let op = match op_name.as_str() {
            "$sum" => AccumulatorOp::Sum,
            "$avg" => AccumulatorOp::Avg,
            "$min" => AccumulatorOp::Min,
            "$max" => AccumulatorOp::Max,
            "$push" => AccumulatorOp::Push,
            "$first" => AccumulatorOp::First,
            "$last" => AccumulatorOp::Last,
            other => {
                return Err(AppError::validation(format!(
                    "unsupported accumulator '{other}'"
                )));
            }
        };
        accumulators.push((name.clone(), op, parse_expr(arg)?));
    }
    Ok(Grouping { key, accumulators })
}

fn parse_sort(stage_body: &Value) -> AppResult<Vec<(String, bool)>> {
    let object = stage_body
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or_else(|| AppError::validation("$sort expects a non-empty object"))?;
    object
        .iter()
        .map(|(field, dir)| {
            if !is_valid_field(field) {
                return Err(AppError::validation(format!("invalid sort field '{field}'")));
            }
            match dir.as_i64() {
                Some(1) => Ok((field.clone(), true)),
                Some(-1) => Ok((field.clone(), false)),
                _ => Err(AppError::validation(format!(
                    "sort direction for '{field}' must be 1 or -1"
                ))),
            }
        })
        .collect()
}

fn parse_count_arg(stage_body: &Value, stage: &str) -> AppResult<usize> {
    stage_body.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| AppError::validation(format!("{stage} expects a non-negative integer")))
}

fn parse_project(stage_body: &Value) -> AppResult<Projection> {
    let object = stage_body
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or_else(|| AppError::validation("$project expects a non-empty object"))?;

    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for (field, flag) in object {
        if !is_valid_field(field) || field.contains('.') {
            return Err(AppError::validation(format!(
                "$project supports top-level fields only, got '{field}'"
            )));
        }
        let keep = match flag {
            Value::Bool(b) => *b,
            Value::Number(n) if n.as_i64() == Some(1) => true,
            Value::Number(n) if n.as_i64() == Some(0) => false,
            _ => {
                return Err(AppError::validation(format!(
                    "projection for '{field}' must be 0/1 or a boolean"
                )));
            }
        };
        if keep {
            include.push(field.clone());
        } else {
            exclude.push(field.clone());
        }
    }

    if include.is_empty() {
        return Ok(Projection::Exclude(exclude));
    }
    // identifiers are the only exclusions allowed alongside inclusions
    if exclude.iter().any(|f| f != "id" && f != "_id") {
        return Err(AppError::validation(
            "$project cannot mix inclusion and exclusion",
        ));
    }
    Ok(Projection::Include(include, exclude.is_empty()))
}

fn apply_stage(stage: &Stage, docs: Vec<Value>) -> Vec<Value> {
    match stage {
        Stage::Match(predicate) => docs.into_iter().filter(|d| predicate.matches(d)).collect(),
        Stage::Group(grouping) => group(grouping, docs),
        Stage::Sort(keys) => {
            let mut docs = docs;
            docs.sort_by(|a, b| {
                keys.iter()
                    .map(|(field, ascending)| {
                        let ord = cmp_values(lookup(a, field), lookup(b, field));
                        if *ascending { ord } else { ord.reverse() }
                    })
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
            docs
        }
        Stage::Skip(n) => docs.into_iter().skip(*n).collect(),
        Stage::Limit(n) => docs.into_iter().take(*n).collect(),
        Stage::Project(projection) => docs.into_iter().map(|d| project(projection, d)).collect(),
        Stage::Count(field) => {
            let mut out = Map::new();
            out.insert(field.clone(), Value::from(docs.len() as u64));
            vec![Value::Object(out)]
        }
    }
}

fn eval(expr: &Expr, doc: &Value) -> Value {
    match expr {
        Expr::Field(field) => lookup(doc, field).cloned().unwrap_or(Value::Null),
        Expr::Literal(value) => value.clone(),
        Expr::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, e)| (k.clone(), eval(e, doc)))
                .collect(),
        ),
    }
}

#[derive(Default)]
struct Accumulated {
    sum: f64,
    all_int: bool,
    numeric_count: u64,
    best: Option<Value>,
    items: Vec<Value>,
    seen: bool,
}

fn group(grouping: &Grouping, docs: Vec<Value>) -> Vec<Value> {
    let mut order: Vec<(Value, Vec<Accumulated>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in &docs {
        let key = eval(&grouping.key, doc);
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            let accs = grouping
                .accumulators
                .iter()
                .map(|_| Accumulated {
                    all_int: true,
                    ..Default::default()
                })
                .collect();
            order.push((key.clone(), accs));
            order.len() - 1
        });

        for ((_, op, expr), acc) in grouping.accumulators.iter().zip(order[slot].1.iter_mut()) {
            accumulate(*op, eval(expr, doc), acc);
        }
    }

    order
        .into_iter()
        .map(|(key, accs)| {
            let mut out = Map::new();
            out.insert("_id".to_string(), key);
            for ((name, op, _), acc) in grouping.accumulators.iter().zip(accs) {
                out.insert(name.clone(), finish(*op, acc));
            }
            Value::Object(out)
        })
        .collect()
}

fn accumulate(op: AccumulatorOp, value: Value, acc: &mut Accumulated) {
    match op {
        AccumulatorOp::Sum | AccumulatorOp::Avg => {
            if let Value::Number(n) = &value {
                acc.sum += n.as_f64().unwrap_or(0.0);
                acc.all_int &= n.is_i64() || n.is_u64();
                acc.numeric_count += 1;
            }
        }
        AccumulatorOp::Min | AccumulatorOp::Max => {
            if value.is_null() {
                return;
            }
            let replace = match &acc.best {
                None => true,
                Some(best) => {
                    let ord = cmp_values(Some(&value), Some(best));
                    if op == AccumulatorOp::Min { ord.is_lt() } else { ord.is_gt() }
                }
            };
            if replace {
                acc.best = Some(value);
            }
        }
        AccumulatorOp::Push => acc.items.push(value),
        AccumulatorOp::First => {
            if !acc.seen {
                acc.best = Some(value);
            }
        }
        AccumulatorOp::Last => acc.best = Some(value),
    }
    acc.seen = true;
}

fn finish(op: AccumulatorOp, acc: Accumulated) -> Value {
    match op {
        AccumulatorOp::Sum if acc.all_int => Value::from(acc.sum as i64),
        AccumulatorOp::Sum => float(acc.sum),
        AccumulatorOp::Avg if acc.numeric_count == 0 => Value::Null,
        AccumulatorOp::Avg => float(acc.sum / acc.numeric_count as f64),
        AccumulatorOp::Push => Value::Array(acc.items),
        AccumulatorOp::Min | AccumulatorOp::Max | AccumulatorOp::First | AccumulatorOp::Last => {
            acc.best.unwrap_or(Value::Null)
        }
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn project(projection: &Projection, doc: Value) -> Value {
    let Value::Object(mut fields) = doc else {
        return doc;
    };
    match projection {
        Projection::Include(keep, keep_ids) => {
            fields.retain(|k, _| {
                keep.iter().any(|f| f == k) || (*keep_ids && (k == "id" || k == "_id"))
            });
        }
        Projection::Exclude(drop) => fields.retain(|k, _| !drop.iter().any(|f| f == k)),
    }
    Value::Object(fields)
}

/// Rank of a JSON type in sort order: missing/null, numbers, strings,
/// objects, arrays, booleans.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn cmp_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x @ Value::Object(_)), Some(y @ Value::Object(_)))
        | (Some(x @ Value::Array(_)), Some(y @ Value::Array(_))) => {
            x.to_string().cmp(&y.to_string())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
