//! Raw query-string parameters
//!
//! Parses `application/x-www-form-urlencoded` query strings into a mapping of
//! parameter name to a scalar, a list (repeated key or `key[]`), or a
//! one-level nested mapping (`field[op]=value`).

use std::borrow::Cow;
use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised while parsing a query string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid query parameter '{0}': cannot mix a plain value with bracketed values")]
    ConflictingParameter(String),

    #[error("Invalid query parameter '{field}[{key}]': given more than once")]
    DuplicateNestedKey { field: String, key: String },
}

/// A single raw parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// `name=value`
    Scalar(String),
    /// `name=a&name=b` or `name[]=a`
    List(Vec<String>),
    /// `name[key]=value`
    Nested(BTreeMap<String, String>),
}

impl RawValue {
    /// Textual form used by the control parameters (`sort`, `fields`, ...).
    ///
    /// Lists are joined with commas; nested values have no textual form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Scalar(s) => Some(Cow::Borrowed(s)),
            RawValue::List(items) => Some(Cow::Owned(items.join(","))),
            RawValue::Nested(_) => None,
        }
    }
}

/// Parsed query-string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    params: BTreeMap<String, RawValue>,
}

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`)
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Build from decoded key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        for (key, value) in pairs {
            raw.insert(key.as_ref(), value.into())?;
        }
        Ok(raw)
    }

    /// Add one decoded parameter
    pub fn insert(&mut self, key: &str, value: String) -> Result<(), QueryError> {
        if key.is_empty() {
            return Ok(());
        }

        match split_bracket(key) {
            Some((name, "")) => self.push_list(name, value),
            Some((name, sub)) => self.insert_nested(name, sub, value),
            None => self.insert_plain(key, value),
        }
    }

    fn insert_plain(&mut self, key: &str, value: String) -> Result<(), QueryError> {
        match self.params.get_mut(key) {
            None => {
                self.params.insert(key.to_string(), RawValue::Scalar(value));
            }
            Some(RawValue::Scalar(existing)) => {
                let first = std::mem::take(existing);
                self.params
                    .insert(key.to_string(), RawValue::List(vec![first, value]));
            }
            Some(RawValue::List(items)) => items.push(value),
            Some(RawValue::Nested(_)) => {
                return Err(QueryError::ConflictingParameter(key.to_string()));
            }
        }
        Ok(())
    }

    fn push_list(&mut self, name: &str, value: String) -> Result<(), QueryError> {
        match self.params.get_mut(name) {
            None => {
                self.params
                    .insert(name.to_string(), RawValue::List(vec![value]));
                Ok(())
            }
            Some(RawValue::Nested(_)) => Err(QueryError::ConflictingParameter(name.to_string())),
            Some(_) => self.insert_plain(name, value),
        }
    }

    fn insert_nested(&mut self, name: &str, sub: &str, value: String) -> Result<(), QueryError> {
        match self.params.get_mut(name) {
            None => {
                let mut nested = BTreeMap::new();
                nested.insert(sub.to_string(), value);
                self.params.insert(name.to_string(), RawValue::Nested(nested));
            }
            Some(RawValue::Nested(nested)) => {
                if nested.contains_key(sub) {
                    return Err(QueryError::DuplicateNestedKey {
                        field: name.to_string(),
                        key: sub.to_string(),
                    });
                }
                nested.insert(sub.to_string(), value);
            }
            Some(_) => return Err(QueryError::ConflictingParameter(name.to_string())),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.params.get(key)
    }

    /// Textual value of a control parameter, if present
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.params.get(key).and_then(RawValue::as_text)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Split `name[sub]` into `(name, sub)`.
///
/// Only a single bracket level is recognized; anything else (`a[b][c]`,
/// `[x]`, `a]`) is not split and stays a plain key.
fn split_bracket(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let inner = key.strip_suffix(']')?.get(open + 1..)?;
    let name = &key[..open];
    if name.is_empty() || inner.contains('[') || inner.contains(']') {
        return None;
    }
    Some((name, inner))
}
