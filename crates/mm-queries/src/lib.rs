//! # mm-queries
//!
//! Query system for Mentor Match list endpoints.
//!
//! This crate turns an HTTP query string into a filtered, sorted,
//! field-limited, paginated [`DocumentQuery`]. Execution happens elsewhere
//! (see `mm-db`); nothing here performs I/O.
//!
//! ## Structure
//!
//! - `params` - Raw query-string parameters with one level of bracket nesting
//! - `filters` - Filter criteria and comparison operators
//! - `sorts` - Sort orders and directions
//! - `projection` - Field selection
//! - `query` - The composed, unexecuted document query
//! - `features` - The four-step `QueryFeatures` pipeline
//!
//! ## Example
//!
//! ```
//! use mm_queries::{DocumentQuery, QueryFeatures, RawQuery};
//!
//! let raw = RawQuery::parse("role=mentor&age[gte]=30&sort=-createdAt&fields=name,bio&page=1&limit=2")?;
//! let query = QueryFeatures::new(DocumentQuery::new(), raw)
//!     .filter()
//!     .sort()
//!     .limit_fields()
//!     .paginate()
//!     .build();
//!
//! assert_eq!(query.limit(), Some(2));
//! assert_eq!(query.skip(), 0);
//! # Ok::<(), mm_queries::QueryError>(())
//! ```

pub mod params;
pub mod filters;
pub mod sorts;
pub mod projection;
pub mod query;
pub mod features;

// Re-exports for convenience
pub use params::{QueryError, RawQuery, RawValue};
pub use filters::{ComparisonOperator, Condition, FilterCriteria};
pub use sorts::{SortCriterion, SortDirection, SortOrder};
pub use projection::Projection;
pub use query::DocumentQuery;
pub use features::{QueryFeatures, RESERVED_KEYS};
