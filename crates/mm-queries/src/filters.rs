//! Filter criteria
//!
//! Every non-reserved query parameter becomes a condition on the document
//! field of the same name. Bracketed comparison operators (`age[gte]=30`)
//! are rewritten structurally to their `$`-prefixed form; values are never
//! touched, so `role=gte` stays a literal match.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::params::{RawQuery, RawValue};

/// Ordered comparison operators accepted in bracketed parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOperator {
    /// Recognize an operator key, bare (`gte`) or already prefixed (`$gte`)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.strip_prefix('$').unwrap_or(key) {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    /// Operator name as used in the rendered filter document
    pub fn as_mongo(&self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
        }
    }

    /// Whether `ordering` (stored value compared to the operand) satisfies this operator
    pub fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Gt => ordering == Greater,
            Self::Gte => ordering != Less,
            Self::Lt => ordering == Less,
            Self::Lte => ordering != Greater,
        }
    }
}

/// Rewrite a nested parameter key to its prefixed operator form.
///
/// Recognized operators gain a single `$`; anything else is returned
/// unchanged. Applying it twice gives the same result as applying it once.
pub fn rewrite_operator_key(key: &str) -> Cow<'_, str> {
    match ComparisonOperator::from_key(key) {
        Some(op) => Cow::Borrowed(op.as_mongo()),
        None => Cow::Borrowed(key),
    }
}

/// A condition on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Equals(Value),
    /// Field equals any of the values
    In(Vec<Value>),
    /// Field satisfies every comparison
    Compare(Vec<(ComparisonOperator, Value)>),
    /// Field equals the given sub-document exactly
    Embedded(Map<String, Value>),
}

impl Condition {
    fn to_value(&self) -> Value {
        match self {
            Condition::Equals(value) => value.clone(),
            Condition::In(values) => {
                let mut map = Map::new();
                map.insert("$in".to_string(), Value::Array(values.clone()));
                Value::Object(map)
            }
            Condition::Compare(comparisons) => {
                let map = comparisons
                    .iter()
                    .map(|(op, value)| (op.as_mongo().to_string(), value.clone()))
                    .collect();
                Value::Object(map)
            }
            Condition::Embedded(map) => Value::Object(map.clone()),
        }
    }
}

/// Ordered set of field conditions, combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    conditions: Vec<(String, Condition)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition (builder pattern)
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.conditions.push((field.into(), condition));
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Equals(value.into()))
    }

    pub fn is_in<V: Into<Value>>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.with(field, Condition::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn compare(
        self,
        field: impl Into<String>,
        op: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Self {
        self.with(field, Condition::Compare(vec![(op, value.into())]))
    }

    /// Convert raw parameters, skipping the given reserved keys
    pub fn from_raw(raw: &RawQuery, reserved: &[&str]) -> Self {
        let conditions = raw
            .iter()
            .filter(|(key, _)| !reserved.contains(key))
            .map(|(key, value)| (key.to_string(), condition_from_raw(value)))
            .collect();
        Self { conditions }
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|(field, _)| field.as_str())
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Render as a filter document, e.g. `{"price": {"$gte": "10"}}`.
    ///
    /// A field given twice keeps its last condition in the rendered form.
    pub fn to_document(&self) -> Value {
        let map = self
            .conditions
            .iter()
            .map(|(field, condition)| (field.clone(), condition.to_value()))
            .collect();
        Value::Object(map)
    }
}

fn condition_from_raw(value: &RawValue) -> Condition {
    match value {
        RawValue::Scalar(s) => Condition::Equals(Value::String(s.clone())),
        RawValue::List(items) => {
            Condition::In(items.iter().cloned().map(Value::String).collect())
        }
        RawValue::Nested(nested) => {
            let operators: Option<Vec<_>> = nested
                .iter()
                .map(|(key, v)| {
                    ComparisonOperator::from_key(key).map(|op| (op, Value::String(v.clone())))
                })
                .collect();

            match operators {
                Some(comparisons) => Condition::Compare(comparisons),
                None => Condition::Embedded(
                    nested
                        .iter()
                        .map(|(key, v)| (rewrite_operator_key(key).into_owned(), Value::String(v.clone())))
                        .collect(),
                ),
            }
        }
    }
}
