//! Query translation for the PostgreSQL store
//!
//! Documents live in `(id TEXT PRIMARY KEY, data JSONB NOT NULL)` tables.
//! Criteria, sort order and window become SQL with every value bound as a
//! parameter. These are standalone functions so the generated SQL can be
//! checked without a database.

use mm_queries::{Condition, DocumentQuery, FilterCriteria, SortDirection, SortOrder};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

/// Split a dotted field into a JSONB path
pub fn json_path(field: &str) -> Vec<String> {
    field.split('.').map(str::to_string).collect()
}

/// Text form of a value as produced by `#>>`
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_operand(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Append ` WHERE ...` for the query's criteria, if any
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &[FilterCriteria]) {
    let conditions: Vec<_> = criteria
        .iter()
        .flat_map(|c| c.conditions().iter())
        .collect();
    if conditions.is_empty() {
        return;
    }

    builder.push(" WHERE ");
    for (i, (field, condition)) in conditions.into_iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        push_condition(builder, field, condition);
    }
}

fn push_text_path(builder: &mut QueryBuilder<'_, Postgres>, field: &str) {
    builder.push("(data #>> ");
    builder.push_bind(json_path(field));
    builder.push(")");
}

/// The JSON value being compared: a path into `data`, or the `elem` row of
/// an array expansion
#[derive(Clone, Copy)]
enum Target<'p> {
    Path(&'p [String]),
    Element,
}

impl Target<'_> {
    fn push_json(self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Target::Path(path) => {
                builder.push("(data #> ");
                builder.push_bind(path.to_vec());
                builder.push(")");
            }
            Target::Element => {
                builder.push("(elem)");
            }
        }
    }

    fn push_text(self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Target::Path(path) => {
                builder.push("(data #>> ");
                builder.push_bind(path.to_vec());
                builder.push(")");
            }
            Target::Element => {
                builder.push("(elem #>> '{}')");
            }
        }
    }
}

fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, field: &str, condition: &Condition) {
    let path = json_path(field);
    match condition {
        Condition::Equals(Value::Null) => {
            push_text_path(builder, field);
            builder.push(" IS NULL");
        }
        Condition::Equals(value) => push_equals(builder, &path, value),
        Condition::In(values) if values.is_empty() => {
            builder.push("FALSE");
        }
        Condition::In(values) => {
            builder.push("(");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_equals(builder, &path, value);
            }
            builder.push(")");
        }
        Condition::Compare(comparisons) => {
            builder.push("(");
            for (i, (op, operand)) in comparisons.iter().enumerate() {
                if i > 0 {
                    builder.push(" AND ");
                }
                let sql_op = match op {
                    mm_queries::ComparisonOperator::Gt => ">",
                    mm_queries::ComparisonOperator::Gte => ">=",
                    mm_queries::ComparisonOperator::Lt => "<",
                    mm_queries::ComparisonOperator::Lte => "<=",
                };
                push_comparison(builder, field, sql_op, operand);
            }
            builder.push(")");
        }
        Condition::Embedded(map) => push_embedded(builder, &path, map),
    }
}

/// Equality with the in-memory store's rules: a stored array matches when
/// any element does; stored numbers compare numerically.
fn push_equals(builder: &mut QueryBuilder<'_, Postgres>, path: &[String], value: &Value) {
    if is_structured(value) {
        push_json_equals(builder, Target::Path(path), value);
        return;
    }
    builder.push("(CASE jsonb_typeof");
    Target::Path(path).push_json(builder);
    builder.push(" WHEN 'array' THEN EXISTS (SELECT 1 FROM jsonb_array_elements");
    Target::Path(path).push_json(builder);
    builder.push(" AS elem WHERE ");
    push_scalar_equals(builder, Target::Element, value);
    builder.push(") ELSE ");
    push_scalar_equals(builder, Target::Path(path), value);
    builder.push(" END)");
}

fn push_scalar_equals(builder: &mut QueryBuilder<'_, Postgres>, target: Target<'_>, value: &Value) {
    let text = value_text(value);
    let number = numeric_operand(value);
    let null_text = text == "null";
    if number.is_none() && !null_text {
        target.push_text(builder);
        builder.push(" = ");
        builder.push_bind(text);
        return;
    }

    builder.push("(CASE jsonb_typeof");
    target.push_json(builder);
    if let Some(number) = number {
        builder.push(" WHEN 'number' THEN ");
        target.push_text(builder);
        builder.push("::float8 = ");
        builder.push_bind(number);
    }
    if null_text {
        builder.push(" WHEN 'null' THEN TRUE");
    }
    builder.push(" ELSE ");
    target.push_text(builder);
    builder.push(" = ");
    builder.push_bind(text);
    builder.push(" END)");
}

fn push_json_equals(builder: &mut QueryBuilder<'_, Postgres>, target: Target<'_>, value: &Value) {
    target.push_json(builder);
    builder.push(" = ");
    builder.push_bind(Json(value.clone()));
}

/// Same keys as `map`, each value equal under the scalar rules
fn push_embedded(
    builder: &mut QueryBuilder<'_, Postgres>,
    path: &[String],
    map: &serde_json::Map<String, Value>,
) {
    builder.push("(jsonb_typeof");
    Target::Path(path).push_json(builder);
    builder.push(" = 'object' AND (SELECT COUNT(*) FROM jsonb_object_keys");
    Target::Path(path).push_json(builder);
    builder.push(") = ");
    builder.push_bind(i64::try_from(map.len()).unwrap_or(i64::MAX));
    for (key, value) in map {
        let mut key_path = path.to_vec();
        key_path.push(key.clone());
        builder.push(" AND ");
        if is_structured(value) {
            push_json_equals(builder, Target::Path(&key_path), value);
        } else {
            push_scalar_equals(builder, Target::Path(&key_path), value);
        }
    }
    builder.push(")");
}

fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Numeric operands compare numerically against JSON numbers and textually
/// against everything else; other operands always compare as text.
fn push_comparison(
    builder: &mut QueryBuilder<'_, Postgres>,
    field: &str,
    sql_op: &str,
    operand: &Value,
) {
    match numeric_operand(operand) {
        Some(number) => {
            builder.push("(CASE WHEN jsonb_typeof(data #> ");
            builder.push_bind(json_path(field));
            builder.push(") = 'number' THEN (data #>> ");
            builder.push_bind(json_path(field));
            builder.push(")::float8 ");
            builder.push(sql_op);
            builder.push(" ");
            builder.push_bind(number);
            builder.push(" ELSE ");
            push_text_path(builder, field);
            builder.push(" ");
            builder.push(sql_op);
            builder.push(" ");
            builder.push_bind(value_text(operand));
            builder.push(" END)");
        }
        None => {
            push_text_path(builder, field);
            builder.push(" ");
            builder.push(sql_op);
            builder.push(" ");
            builder.push_bind(value_text(operand));
        }
    }
}

/// Append ` ORDER BY ...`; missing values sort lowest
pub fn push_order_by(builder: &mut QueryBuilder<'_, Postgres>, sort: &SortOrder) {
    if sort.is_empty() {
        return;
    }
    builder.push(" ORDER BY ");
    for (i, criterion) in sort.criteria().iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push("data #> ");
        builder.push_bind(json_path(&criterion.field));
        builder.push(match criterion.direction {
            SortDirection::Asc => " ASC NULLS FIRST",
            SortDirection::Desc => " DESC NULLS LAST",
        });
    }
}

/// Append ` LIMIT ... OFFSET ...`
pub fn push_window(builder: &mut QueryBuilder<'_, Postgres>, query: &DocumentQuery) {
    if let Some(limit) = query.limit() {
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    if query.skip() > 0 {
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.skip()).unwrap_or(i64::MAX));
    }
}

/// `SELECT data FROM <collection> ...` for a full query
pub fn select_query<'a>(table: &str, query: &DocumentQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT data FROM \"{}\"", table));
    push_where(&mut builder, query.criteria());
    push_order_by(&mut builder, query.sort());
    push_window(&mut builder, query);
    builder
}

/// `SELECT COUNT(*) FROM <collection> ...` for a query's criteria
pub fn count_query<'a>(table: &str, query: &DocumentQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM \"{}\"", table));
    push_where(&mut builder, query.criteria());
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_queries::{QueryFeatures, RawQuery};

    fn features(query: &str) -> DocumentQuery {
        QueryFeatures::new(DocumentQuery::new(), RawQuery::parse(query).unwrap())
            .apply_all()
            .build()
    }

    #[test]
    fn test_select_without_parameters() {
        let query = DocumentQuery::new();
        let builder = select_query("users", &query);
        assert_eq!(builder.sql(), "SELECT data FROM \"users\"");
    }

    #[test]
    fn test_select_with_equality_and_window() {
        let query = features("role=mentor&page=2&limit=10");
        let builder = select_query("users", &query);
        assert_eq!(
            builder.sql(),
            "SELECT data FROM \"users\" WHERE (CASE jsonb_typeof(data #> $1) \
             WHEN 'array' THEN EXISTS (SELECT 1 FROM jsonb_array_elements(data #> $2) AS elem \
             WHERE (elem #>> '{}') = $3) ELSE (data #>> $4) = $5 END) \
             ORDER BY data #> $6 DESC NULLS LAST LIMIT $7 OFFSET $8"
        );
    }

    #[test]
    fn test_numeric_comparison() {
        let query = DocumentQuery::matching(
            FilterCriteria::from_raw(&RawQuery::parse("age[gte]=30").unwrap(), &[]),
        );
        let builder = count_query("users", &query);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM \"users\" WHERE ((CASE WHEN jsonb_typeof(data #> $1) = 'number' \
             THEN (data #>> $2)::float8 >= $3 ELSE (data #>> $4) >= $5 END))"
        );
    }

    #[test]
    fn test_text_comparison_and_in() {
        let query = features("createdAt[lt]=2024-01-01&role=mentor&role=admin&sort=name,-age");
        let builder = select_query("users", &query);
        assert_eq!(
            builder.sql(),
            "SELECT data FROM \"users\" WHERE ((data #>> $1) < $2) AND \
             ((CASE jsonb_typeof(data #> $3) WHEN 'array' THEN EXISTS (SELECT 1 FROM \
             jsonb_array_elements(data #> $4) AS elem WHERE (elem #>> '{}') = $5) \
             ELSE (data #>> $6) = $7 END) OR \
             (CASE jsonb_typeof(data #> $8) WHEN 'array' THEN EXISTS (SELECT 1 FROM \
             jsonb_array_elements(data #> $9) AS elem WHERE (elem #>> '{}') = $10) \
             ELSE (data #>> $11) = $12 END)) \
             ORDER BY data #> $13 ASC NULLS FIRST, data #> $14 DESC NULLS LAST LIMIT $15"
        );
    }

    #[test]
    fn test_embedded_document() {
        let query = DocumentQuery::matching(
            FilterCriteria::from_raw(&RawQuery::parse("address[city]=Toronto").unwrap(), &[]),
        );
        let builder = count_query("users", &query);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM \"users\" WHERE (jsonb_typeof(data #> $1) = 'object' AND \
             (SELECT COUNT(*) FROM jsonb_object_keys(data #> $2)) = $3 AND (data #>> $4) = $5)"
        );
    }

    #[test]
    fn test_numeric_equality_and_array_elements() {
        let query = DocumentQuery::matching(
            FilterCriteria::from_raw(&RawQuery::parse("age=34.0").unwrap(), &[]),
        );
        let builder = count_query("users", &query);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM \"users\" WHERE (CASE jsonb_typeof(data #> $1) \
             WHEN 'array' THEN EXISTS (SELECT 1 FROM jsonb_array_elements(data #> $2) AS elem \
             WHERE (CASE jsonb_typeof(elem) WHEN 'number' THEN (elem #>> '{}')::float8 = $3 \
             ELSE (elem #>> '{}') = $4 END)) \
             ELSE (CASE jsonb_typeof(data #> $5) WHEN 'number' THEN (data #>> $6)::float8 = $7 \
             ELSE (data #>> $8) = $9 END) END)"
        );
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let criteria = FilterCriteria::new().with("role", Condition::In(vec![]));
        let query = DocumentQuery::matching(criteria);
        let builder = count_query("users", &query);
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM \"users\" WHERE FALSE");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&Value::from("a")), "a");
        assert_eq!(value_text(&Value::from(3)), "3");
        assert_eq!(value_text(&Value::from(true)), "true");
        assert_eq!(json_path("address.city"), vec!["address", "city"]);
    }
}
