//! List queries
//!
//! Every list endpoint runs the request parameters through [`QueryFeatures`]
//! on top of a base criteria set.

use mm_core::pagination::PageLimits;
use mm_db::JsonDocument;
use mm_queries::{DocumentQuery, FilterCriteria, QueryFeatures, RawQuery};

/// Compose the list query for `raw` narrowed by `base`
pub fn list_query(base: FilterCriteria, raw: RawQuery, limits: PageLimits) -> DocumentQuery {
    QueryFeatures::with_limits(DocumentQuery::matching(base), raw, limits)
        .apply_all()
        .build()
}

/// One page of documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub documents: Vec<JsonDocument>,
}

impl Listing {
    pub fn new(documents: Vec<JsonDocument>) -> Self {
        Self { documents }
    }

    /// Number of documents on this page
    pub fn results(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_keeps_base_criteria() {
        let raw = RawQuery::parse("role=mentor&limit=5000").unwrap();
        let limits = PageLimits {
            default_limit: 20,
            max_limit: 50,
        };
        let query = list_query(FilterCriteria::new().eq("active", true), raw, limits);

        assert_eq!(query.criteria().len(), 2);
        assert_eq!(query.limit(), Some(50));
        assert_eq!(query.sort().to_param(), "-createdAt");
    }
}
