//! Document query
//!
//! The immutable description of a list query: filter criteria, sort order,
//! projection and the skip/limit window. Stores execute it; nothing here
//! performs I/O.

use serde_json::Value;

use crate::filters::FilterCriteria;
use crate::projection::Projection;
use crate::sorts::SortOrder;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    criteria: Vec<FilterCriteria>,
    sort: SortOrder,
    projection: Projection,
    skip: u64,
    limit: Option<u64>,
}

impl DocumentQuery {
    /// Query matching every document, unsorted, unbounded
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a single set of criteria
    pub fn matching(criteria: FilterCriteria) -> Self {
        Self::new().narrow(criteria)
    }

    /// AND the given criteria with the existing ones
    pub fn narrow(mut self, criteria: FilterCriteria) -> Self {
        if !criteria.is_empty() {
            self.criteria.push(criteria);
        }
        self
    }

    pub fn order_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn window(mut self, skip: u64, limit: u64) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }

    pub fn criteria(&self) -> &[FilterCriteria] {
        &self.criteria
    }

    pub fn sort(&self) -> &SortOrder {
        &self.sort
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Same filter, no ordering, projection or window
    pub fn unwindowed(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            ..Self::default()
        }
    }

    /// Render the combined filter document.
    ///
    /// No criteria render as `{}`, a single set as itself, several as
    /// `{"$and": [...]}`.
    pub fn filter_document(&self) -> Value {
        match self.criteria.as_slice() {
            [] => Value::Object(Default::default()),
            [single] => single.to_document(),
            many => serde_json::json!({
                "$and": many.iter().map(FilterCriteria::to_document).collect::<Vec<_>>()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorts::SortCriterion;
    use serde_json::json;

    #[test]
    fn test_empty_query() {
        let query = DocumentQuery::new();
        assert!(query.criteria().is_empty());
        assert_eq!(query.filter_document(), json!({}));
        assert_eq!(query.limit(), None);
        assert_eq!(query.projection(), &Projection::All);
    }

    #[test]
    fn test_narrow_combines_with_and() {
        let query = DocumentQuery::matching(FilterCriteria::new().eq("role", "mentor"))
            .narrow(FilterCriteria::new())
            .narrow(FilterCriteria::new().eq("active", true));

        assert_eq!(query.criteria().len(), 2);
        assert_eq!(
            query.filter_document(),
            json!({ "$and": [{ "role": "mentor" }, { "active": true }] })
        );
    }

    #[test]
    fn test_builder_methods() {
        let query = DocumentQuery::new()
            .order_by(SortOrder::new().then(SortCriterion::asc("name")))
            .project(Projection::include(["name"]))
            .window(20, 10);

        assert_eq!(query.skip(), 20);
        assert_eq!(query.limit(), Some(10));
        assert!(query.sort().sorts_by("name"));

        let bare = query.unwindowed();
        assert_eq!(bare.skip(), 0);
        assert!(bare.sort().is_empty());
    }
}
