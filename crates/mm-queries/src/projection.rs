//! Field projection
//!
//! Controls which top-level fields of a document are returned.

use serde_json::{Map, Value};

use mm_core::types::{ID_FIELD, VERSION_FIELD};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    /// Return every field
    #[default]
    All,
    /// Return only the listed fields; `_id` is kept unless `with_id` is false
    Include { fields: Vec<String>, with_id: bool },
    /// Return everything except the listed fields
    Exclude(Vec<String>),
}

impl Projection {
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Include {
            fields: fields.into_iter().map(Into::into).collect(),
            with_id: true,
        }
    }

    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Exclude(fields.into_iter().map(Into::into).collect())
    }

    /// Hide the internal version counter
    pub fn without_version() -> Self {
        Self::exclude([VERSION_FIELD])
    }

    /// Parse a `fields` parameter such as `name,email` or `-bio,-photo`.
    ///
    /// When every token is `-`-prefixed the result excludes those fields.
    /// Otherwise the plain tokens are included, and a `-_id` token drops the
    /// identifier from the result. Other negated tokens are ignored in that
    /// case. No usable tokens yields [`Projection::All`].
    pub fn parse(param: &str) -> Self {
        let tokens: Vec<&str> = param
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != "-")
            .collect();

        if tokens.is_empty() {
            return Projection::All;
        }

        if tokens.iter().all(|t| t.starts_with('-')) {
            return Self::exclude(tokens.iter().map(|t| &t[1..]));
        }

        let with_id = !tokens.iter().any(|t| *t == "-_id");
        let fields = tokens
            .iter()
            .filter(|t| !t.starts_with('-'))
            .map(|t| t.to_string())
            .collect();
        Projection::Include { fields, with_id }
    }

    /// Whether `field` survives this projection
    pub fn keeps(&self, field: &str) -> bool {
        match self {
            Projection::All => true,
            Projection::Include { fields, with_id } => {
                (field == ID_FIELD && *with_id) || fields.iter().any(|f| f == field)
            }
            Projection::Exclude(fields) => !fields.iter().any(|f| f == field),
        }
    }

    /// Apply to a document
    pub fn apply(&self, document: &Map<String, Value>) -> Map<String, Value> {
        document
            .iter()
            .filter(|(key, _)| self.keeps(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Apply to a JSON value; non-objects are returned unchanged
    pub fn apply_value(&self, value: Value) -> Value {
        match value {
            Value::Object(map) if !matches!(self, Projection::All) => {
                Value::Object(self.apply(&map))
            }
            other => other,
        }
    }
}
