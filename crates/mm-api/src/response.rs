//! Success envelopes
//!
//! `{"status": "success", "results": n, "data": {...}}`; `results` only on
//! listings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mm_services::Listing;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: Value,
}

impl Envelope {
    /// Wrap a single resource as `data.<name>`
    pub fn one<T: Serialize>(name: &str, resource: &T) -> Self {
        let value = serde_json::to_value(resource).unwrap_or(Value::Null);
        let mut data = Map::new();
        data.insert(name.to_string(), value);
        Self {
            status: "success",
            results: None,
            data: Value::Object(data),
        }
    }

    /// Wrap a page of documents as `data.<name>` with its count
    pub fn list(name: &str, listing: Listing) -> Self {
        let results = listing.results();
        let documents: Vec<Value> = listing.documents.into_iter().map(Value::Object).collect();
        Self {
            status: "success",
            results: Some(results),
            data: json!({ name: documents }),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response for deletions
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope() {
        let mut doc = Map::new();
        doc.insert("name".into(), json!("Grace"));
        let envelope = Envelope::list("mentors", Listing::new(vec![doc]));

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": "success", "results": 1, "data": {"mentors": [{"name": "Grace"}]}})
        );
    }

    #[test]
    fn test_single_envelope() {
        let envelope = Envelope::one("session", &json!({"_id": "s1"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": "success", "data": {"session": {"_id": "s1"}}})
        );
    }
}
