//! Translation of [`Predicate`] trees into PostgreSQL conditions over the
//! `documents.body` JSONB column.
//!
//! Every operand and field path is sent as a bound parameter. The rules
//! mirror `Predicate::matches` so both backends select the same documents.

use sqlx::{Encode, Postgres, QueryBuilder, Type};

use coursehub_core::types::filter::{CompareOp, Predicate, numeric_operand, scalar_text};

/// Append `predicate` as a boolean SQL expression.
pub fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::All => {
            qb.push("TRUE");
        }
        Predicate::Compare { field, op, value } => push_compare(qb, field, *op, value),
        Predicate::Contains { field, value } => {
            push_like(qb, field, format!("%{}%", escape_like(value)));
        }
        Predicate::StartsWith { field, value } => {
            push_like(qb, field, format!("{}%", escape_like(value)));
        }
        Predicate::EndsWith { field, value } => {
            push_like(qb, field, format!("%{}", escape_like(value)));
        }
        Predicate::Word { field, value } => {
            if value.is_empty() {
                qb.push("FALSE");
                return;
            }
            qb.push("(");
            push_scalar_text(qb, field);
            qb.push(" ~* ");
            qb.push_bind(word_pattern(value));
            qb.push(")");
        }
        Predicate::In { field, values } => {
            let candidates: Vec<String> = values.iter().filter_map(scalar_text).collect();
            let numbers: Vec<f64> = values.iter().filter_map(numeric_operand).collect();
            qb.push("(");
            push_scalar_text(qb, field);
            qb.push(" = ANY(");
            qb.push_bind(candidates);
            qb.push(")");
            if !numbers.is_empty() {
                qb.push(" OR ");
                push_numeric(qb, field, "= ANY", numbers);
            }
            qb.push(")");
        }
        Predicate::Not { predicate } => {
            qb.push("(NOT COALESCE(");
            push_predicate(qb, predicate);
            qb.push(", FALSE))");
        }
        Predicate::And { predicates } => push_joined(qb, predicates, " AND ", "TRUE"),
        Predicate::Or { predicates } => push_joined(qb, predicates, " OR ", "FALSE"),
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Postgres>,
    predicates: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if predicates.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        qb.push("COALESCE(");
        push_predicate(qb, predicate);
        qb.push(", FALSE)");
    }
    qb.push(")");
}

fn path(field: &str) -> Vec<String> {
    field.split('.').map(str::to_string).collect()
}

/// Text of a scalar at `field`; NULL for missing, null, arrays, objects.
fn push_scalar_text(qb: &mut QueryBuilder<'_, Postgres>, field: &str) {
    qb.push("(CASE WHEN jsonb_typeof(body #> ");
    qb.push_bind(path(field));
    qb.push(") IN ('string', 'number', 'boolean') THEN body #>> ");
    qb.push_bind(path(field));
    qb.push(" END)");
}

fn push_like(qb: &mut QueryBuilder<'_, Postgres>, field: &str, pattern: String) {
    qb.push("(");
    push_scalar_text(qb, field);
    qb.push(" ILIKE ");
    qb.push_bind(pattern);
    qb.push(" ESCAPE '\\')");
}

fn push_compare(
    qb: &mut QueryBuilder<'_, Postgres>,
    field: &str,
    op: CompareOp,
    value: &serde_json::Value,
) {
    let sql_op = match op {
        CompareOp::Eq => "=",
        CompareOp::Gt => ">",
        CompareOp::Gte => ">=",
        CompareOp::Lt => "<",
        CompareOp::Lte => "<=",
    };

    if op == CompareOp::Eq {
        let Some(text) = scalar_text(value) else {
            qb.push("FALSE");
            return;
        };
        qb.push("(");
        push_scalar_text(qb, field);
        qb.push(" = ");
        qb.push_bind(text);
        if let Some(number) = numeric_operand(value) {
            qb.push(" OR ");
            push_numeric(qb, field, "=", number);
        }
        qb.push(")");
        return;
    }

    if let Some(number) = numeric_operand(value) {
        push_numeric(qb, field, sql_op, number);
        return;
    }

    let serde_json::Value::String(text) = value else {
        qb.push("FALSE");
        return;
    };
    qb.push("(CASE WHEN jsonb_typeof(body #> ");
    qb.push_bind(path(field));
    qb.push(") = 'string' THEN (body #>> ");
    qb.push_bind(path(field));
    qb.push(") COLLATE \"C\" ");
    qb.push(sql_op);
    qb.push(" ");
    qb.push_bind(text.clone());
    qb.push(" ELSE FALSE END)");
}

/// `(<field>)::float8 <op> (<operand>)` when the field holds a JSON
/// number, FALSE otherwise.
fn push_numeric<'a, T>(
    qb: &mut QueryBuilder<'a, Postgres>,
    field: &str,
    sql_op: &str,
    operand: T,
) where
    T: 'a + Encode<'a, Postgres> + Type<Postgres>,
{
    qb.push("(CASE WHEN jsonb_typeof(body #> ");
    qb.push_bind(path(field));
    qb.push(") = 'number' THEN (body #>> ");
    qb.push_bind(path(field));
    qb.push(")::float8 ");
    qb.push(sql_op);
    qb.push(" (");
    qb.push_bind(operand);
    qb.push(") ELSE FALSE END)");
}

/// Escape `LIKE` wildcards so the operand matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Case-insensitive regex matching `word` bounded by non-word characters.
fn word_pattern(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len() * 2);
    for ch in word.chars() {
        if !ch.is_alphanumeric() && ch != '_' && !ch.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("(^|[^[:alnum:]_]){escaped}([^[:alnum:]_]|$)")
}
