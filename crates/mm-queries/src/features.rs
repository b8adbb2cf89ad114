//! Query features
//!
//! Turns the raw parameters of a list request into a [`DocumentQuery`].
//! Each step consumes the pipeline and returns the next stage:
//!
//! ```text
//! QueryFeatures::new(query, raw).filter().sort().limit_fields().paginate().build()
//! ```
//!
//! Steps never fail. Unusable pagination values fall back to the defaults.

use mm_core::pagination::{PageLimits, PageWindow};

use crate::filters::FilterCriteria;
use crate::params::RawQuery;
use crate::projection::Projection;
use crate::query::DocumentQuery;
use crate::sorts::SortOrder;

/// Parameters that control the query rather than filter it
pub const RESERVED_KEYS: &[&str] = &["sort", "page", "limit", "fields"];

#[derive(Debug, Clone)]
pub struct QueryFeatures {
    query: DocumentQuery,
    raw: RawQuery,
    limits: PageLimits,
}

impl QueryFeatures {
    pub fn new(query: DocumentQuery, raw: RawQuery) -> Self {
        Self::with_limits(query, raw, PageLimits::default())
    }

    pub fn with_limits(query: DocumentQuery, raw: RawQuery, limits: PageLimits) -> Self {
        Self { query, raw, limits }
    }

    /// Narrow the query by every non-reserved parameter
    pub fn filter(self) -> Self {
        let criteria = FilterCriteria::from_raw(&self.raw, RESERVED_KEYS);
        Self {
            query: self.query.narrow(criteria),
            ..self
        }
    }

    /// Order by the `sort` parameter, newest first when absent
    pub fn sort(self) -> Self {
        let requested = self
            .raw
            .text("sort")
            .map(|param| SortOrder::parse_param(&param))
            .filter(|order| !order.is_empty());
        let order = requested.unwrap_or_else(SortOrder::newest_first);
        Self {
            query: self.query.order_by(order),
            ..self
        }
    }

    /// Project to the `fields` parameter, hiding `__v` when absent
    pub fn limit_fields(self) -> Self {
        let projection = match self.raw.text("fields") {
            Some(param) => Projection::parse(&param),
            None => Projection::without_version(),
        };
        Self {
            query: self.query.project(projection),
            ..self
        }
    }

    /// Apply the `page` / `limit` window
    pub fn paginate(self) -> Self {
        let window = self.page_window();
        Self {
            query: self.query.window(window.skip(), window.limit),
            ..self
        }
    }

    /// Run every step in the conventional order
    pub fn apply_all(self) -> Self {
        self.filter().sort().limit_fields().paginate()
    }

    /// The window `paginate` applies
    pub fn page_window(&self) -> PageWindow {
        PageWindow::from_raw(
            self.raw.text("page").as_deref(),
            self.raw.text("limit").as_deref(),
            self.limits,
        )
    }

    pub fn query(&self) -> &DocumentQuery {
        &self.query
    }

    pub fn raw(&self) -> &RawQuery {
        &self.raw
    }

    pub fn build(self) -> DocumentQuery {
        self.query
    }
}
