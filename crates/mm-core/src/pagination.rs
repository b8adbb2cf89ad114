//! Pagination window
//!
//! List endpoints page through results with `page` and `limit` query
//! parameters. Missing or unusable values fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Page used when none (or a non-numeric one) is requested
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none (or a non-numeric one) is requested
pub const DEFAULT_LIMIT: u64 = 100;

/// Largest page size a client may request
pub const MAX_LIMIT: u64 = 1000;

/// Pagination window (1-indexed page plus page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Limits applied when coercing raw pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl PageWindow {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Build a window from raw query-string values.
    ///
    /// Each value must parse as a finite number of at least one after
    /// truncation; anything else takes the default. The limit is clamped to
    /// `limits.max_limit`.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, limits: PageLimits) -> Self {
        let page = page.and_then(coerce_positive).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(coerce_positive)
            .unwrap_or(limits.default_limit)
            .min(limits.max_limit.max(1));

        Self::new(page, limit)
    }

    /// Number of records to skip
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Coerce a raw parameter to a positive integer
fn coerce_positive(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let value = value.trunc();
    if value < 1.0 {
        return None;
    }
    if value >= u64::MAX as f64 {
        return Some(u64::MAX);
    }
    Some(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let window = PageWindow::from_raw(None, None, PageLimits::default());
        assert_eq!(window, PageWindow { page: 1, limit: 100 });
        assert_eq!(window.skip(), 0);
    }

    #[test]
    fn test_explicit_values() {
        let window = PageWindow::from_raw(Some("2"), Some("10"), PageLimits::default());
        assert_eq!(window.skip(), 10);
        assert_eq!(window.limit, 10);
    }

    #[test]
    fn test_non_numeric_falls_back() {
        let window = PageWindow::from_raw(Some("abc"), Some(""), PageLimits::default());
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 100);
        assert_eq!(window.skip(), 0);
    }

    #[test]
    fn test_non_positive_falls_back() {
        let window = PageWindow::from_raw(Some("0"), Some("-5"), PageLimits::default());
        assert_eq!(window, PageWindow::default());
    }

    #[test]
    fn test_fraction_and_whitespace() {
        let window = PageWindow::from_raw(Some(" 3 "), Some("2.9"), PageLimits::default());
        assert_eq!(window.page, 3);
        assert_eq!(window.limit, 2);
        assert_eq!(window.skip(), 4);
    }

    #[test]
    fn test_limit_is_clamped() {
        let limits = PageLimits {
            default_limit: 100,
            max_limit: 500,
        };
        let window = PageWindow::from_raw(Some("1"), Some("100000"), limits);
        assert_eq!(window.limit, 500);

        let window = PageWindow::from_raw(Some("nan"), Some("inf"), limits);
        assert_eq!(window, PageWindow::new(1, 100));
    }
}
