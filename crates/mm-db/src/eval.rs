//! In-memory query evaluation
//!
//! Query values arrive as strings from the query string. They are coerced
//! to the type of the stored value before comparing, so `age[gte]=30`
//! matches a stored number and `active=true` a stored boolean.

use std::cmp::Ordering;

use mm_queries::{Condition, FilterCriteria, SortDirection, SortOrder};
use serde_json::{Map, Value};

use crate::repository::JsonDocument;

const MAX_PATH_DEPTH: usize = 32;

/// Whether the document satisfies every set of criteria
pub fn matches_all(doc: &JsonDocument, criteria: &[FilterCriteria]) -> bool {
    criteria.iter().all(|c| matches_criteria(doc, c))
}

pub fn matches_criteria(doc: &JsonDocument, criteria: &FilterCriteria) -> bool {
    criteria
        .conditions()
        .iter()
        .all(|(field, condition)| matches_condition(get_path(doc, field), condition))
}

fn matches_condition(stored: Option<&Value>, condition: &Condition) -> bool {
    match condition {
        Condition::Equals(Value::Null) => matches!(stored, None | Some(Value::Null)),
        Condition::Equals(expected) => stored.is_some_and(|v| equals_any_element(v, expected)),
        Condition::In(values) => {
            stored.is_some_and(|v| values.iter().any(|expected| equals_any_element(v, expected)))
        }
        Condition::Compare(comparisons) => stored.is_some_and(|v| {
            comparisons.iter().all(|(op, operand)| {
                compare_coerced(v, operand).is_some_and(|ordering| op.accepts(ordering))
            })
        }),
        Condition::Embedded(expected) => match stored {
            Some(Value::Object(actual)) => embedded_equals(actual, expected),
            _ => false,
        },
    }
}

/// Arrays match when any element matches
fn equals_any_element(stored: &Value, expected: &Value) -> bool {
    match stored {
        Value::Array(items) if !expected.is_array() => {
            items.iter().any(|item| values_equal(item, expected))
        }
        _ => values_equal(stored, expected),
    }
}

fn embedded_equals(actual: &Map<String, Value>, expected: &Map<String, Value>) -> bool {
    actual.len() == expected.len()
        && expected
            .iter()
            .all(|(key, value)| actual.get(key).is_some_and(|v| values_equal(v, value)))
}

/// Equality after coercing `expected` to the stored value's type
pub fn values_equal(stored: &Value, expected: &Value) -> bool {
    compare_coerced(stored, expected) == Some(Ordering::Equal) || stored == expected
}

/// Order `stored` against `operand`, coercing string operands.
///
/// `None` when the two cannot be compared.
pub fn compare_coerced(stored: &Value, operand: &Value) -> Option<Ordering> {
    match (stored, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Number(a), Value::String(s)) => {
            let b: f64 = s.trim().parse().ok()?;
            a.as_f64()?.partial_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::Number(b)) => Some(a.as_str().cmp(b.to_string().as_str())),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::String(s)) => match s.as_str() {
            "true" => Some(a.cmp(&true)),
            "false" => Some(a.cmp(&false)),
            _ => None,
        },
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, Value::String(s)) if s == "null" => Some(Ordering::Equal),
        _ => None,
    }
}

/// Total order used for sorting; missing and null sort lowest
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match (x, y) {
            (Value::Number(m), Value::Number(n)) => {
                let m = m.as_f64().unwrap_or(f64::NAN);
                let n = n.as_f64().unwrap_or(f64::NAN);
                m.total_cmp(&n)
            }
            (Value::String(m), Value::String(n)) => m.cmp(n),
            (Value::Bool(m), Value::Bool(n)) => m.cmp(n),
            _ => type_rank(x).cmp(&type_rank(y)),
        },
        (Some(x), None) => type_rank(x).cmp(&0),
        (None, Some(y)) => 0.cmp(&type_rank(y)),
        (None, None) => Ordering::Equal,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub fn compare_docs(a: &JsonDocument, b: &JsonDocument, sort: &SortOrder) -> Ordering {
    for criterion in sort.criteria() {
        let ordering = compare_values(get_path(a, &criterion.field), get_path(b, &criterion.field));
        if ordering != Ordering::Equal {
            return match criterion.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
        }
    }
    Ordering::Equal
}

/// Look up a dotted path (`address.city`)
pub fn get_path<'a>(doc: &'a JsonDocument, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for (depth, part) in parts.enumerate() {
        if depth >= MAX_PATH_DEPTH {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_queries::{ComparisonOperator, RawQuery};
    use serde_json::json;

    fn doc(value: Value) -> JsonDocument {
        value.as_object().cloned().unwrap()
    }

    fn criteria(query: &str) -> FilterCriteria {
        FilterCriteria::from_raw(&RawQuery::parse(query).unwrap(), mm_queries::RESERVED_KEYS)
    }

    #[test]
    fn test_string_operands_are_coerced() {
        let mentor = doc(json!({ "role": "mentor", "age": 34, "active": true }));

        assert!(matches_criteria(&mentor, &criteria("role=mentor&age[gte]=30")));
        assert!(matches_criteria(&mentor, &criteria("age=34&active=true")));
        assert!(matches_criteria(&mentor, &criteria("age=34.0")));
        assert!(!matches_criteria(&mentor, &criteria("age[lt]=30")));
        assert!(!matches_criteria(&mentor, &criteria("active=false")));
        assert!(!matches_criteria(&mentor, &criteria("age[gte]=abc")));
    }

    #[test]
    fn test_missing_fields_do_not_match() {
        let user = doc(json!({ "name": "Ada" }));
        assert!(!matches_criteria(&user, &criteria("age[gte]=1")));
        assert!(!matches_criteria(&user, &criteria("role=mentor")));
        assert!(matches_criteria(&user, &FilterCriteria::new().eq("bio", Value::Null)));
    }

    #[test]
    fn test_in_and_arrays() {
        let user = doc(json!({ "role": "admin", "tags": ["rust", "go"] }));
        assert!(matches_criteria(&user, &criteria("role=mentor&role=admin")));
        assert!(matches_criteria(&user, &criteria("tags=rust")));
        assert!(!matches_criteria(&user, &criteria("tags=java")));
    }

    #[test]
    fn test_dotted_paths_and_embedded() {
        let user = doc(json!({ "address": { "city": "Toronto", "zip": "M5V" } }));
        assert!(matches_criteria(&user, &FilterCriteria::new().eq("address.city", "Toronto")));
        assert!(!matches_criteria(&user, &criteria("address[city]=Toronto")));
        assert!(matches_criteria(&user, &criteria("address[city]=Toronto&address[zip]=M5V")));
        assert_eq!(get_path(&user, "address.city.name"), None);
    }

    #[test]
    fn test_compare_builder_values() {
        let session = doc(json!({ "createdAt": "2024-03-01T10:00:00.000Z" }));
        let after = FilterCriteria::new().compare(
            "createdAt",
            ComparisonOperator::Gte,
            "2024-01-01",
        );
        assert!(matches_criteria(&session, &after));
    }

    #[test]
    fn test_sort_order_with_missing_values() {
        let mut docs = vec![
            doc(json!({ "name": "b", "age": 30 })),
            doc(json!({ "name": "a" })),
            doc(json!({ "name": "c", "age": 20 })),
        ];
        docs.sort_by(|a, b| compare_docs(a, b, &SortOrder::by_asc("age")));
        let names: Vec<_> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);

        docs.sort_by(|a, b| compare_docs(a, b, &SortOrder::by_desc("age")));
        let names: Vec<_> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_multi_key_sort() {
        let mut docs = vec![
            doc(json!({ "name": "x", "age": 30 })),
            doc(json!({ "name": "a", "age": 20 })),
            doc(json!({ "name": "a", "age": 40 })),
        ];
        docs.sort_by(|a, b| compare_docs(a, b, &SortOrder::parse_param("name,-age")));
        let ages: Vec<_> = docs.iter().map(|d| d["age"].as_i64().unwrap()).collect();
        assert_eq!(ages, vec![40, 20, 30]);
    }
}
