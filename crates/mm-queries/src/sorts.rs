//! Sort orders
//!
//! Sort orders define how query results should be ordered. The request form
//! is a comma-separated list of field names, `-` marking descending order.

use mm_core::types::CREATED_AT_FIELD;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" | "1" => Some(Self::Asc),
            "desc" | "descending" | "-1" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A single sort criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    /// The document field to sort by
    pub field: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse a single token (`name` or `-name`)
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        match token.strip_prefix('-') {
            Some(field) => {
                let field = field.trim();
                (!field.is_empty()).then(|| Self::desc(field))
            }
            None => (!token.is_empty()).then(|| Self::asc(token)),
        }
    }

    /// Render back to request form
    pub fn to_param(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("-{}", self.field),
        }
    }

    pub fn reversed(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }
}

/// Collection of sort criteria, highest priority first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    pub fn new() -> Self {
        Self { criteria: vec![] }
    }

    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            criteria: vec![SortCriterion::new(field, direction)],
        }
    }

    pub fn by_asc(field: impl Into<String>) -> Self {
        Self::by(field, SortDirection::Asc)
    }

    pub fn by_desc(field: impl Into<String>) -> Self {
        Self::by(field, SortDirection::Desc)
    }

    /// Newest first
    pub fn newest_first() -> Self {
        Self::by_desc(CREATED_AT_FIELD)
    }

    /// Parse a `sort` parameter such as `name,-age`.
    ///
    /// Tokens are separated by commas (or whitespace), trimmed, and empty
    /// tokens are skipped.
    pub fn parse_param(param: &str) -> Self {
        let criteria = param
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(SortCriterion::parse)
            .collect();
        Self { criteria }
    }

    /// Add a sort criterion (builder pattern)
    pub fn then(mut self, criterion: SortCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn then_asc(self, field: impl Into<String>) -> Self {
        self.then(SortCriterion::asc(field))
    }

    pub fn then_desc(self, field: impl Into<String>) -> Self {
        self.then(SortCriterion::desc(field))
    }

    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Get the primary (first) sort criterion
    pub fn primary(&self) -> Option<&SortCriterion> {
        self.criteria.first()
    }

    pub fn sorts_by(&self, field: &str) -> bool {
        self.criteria.iter().any(|c| c.field == field)
    }

    /// Render back to request form (`name -age`)
    pub fn to_param(&self) -> String {
        self.criteria
            .iter()
            .map(SortCriterion::to_param)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("sideways"), None);
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_sort_criterion() {
        let criterion = SortCriterion::parse("-createdAt").unwrap();
        assert_eq!(criterion.field, "createdAt");
        assert_eq!(criterion.direction, SortDirection::Desc);
        assert_eq!(criterion.to_param(), "-createdAt");

        let reversed = criterion.reversed();
        assert_eq!(reversed.direction, SortDirection::Asc);

        assert_eq!(SortCriterion::parse("  "), None);
        assert_eq!(SortCriterion::parse("-"), None);
    }

    #[test]
    fn test_parse_param_keeps_priority() {
        let order = SortOrder::parse_param("name,-age");
        assert_eq!(order, SortOrder::by_asc("name").then_desc("age"));
        assert_eq!(order.to_param(), "name -age");
        assert_eq!(order.primary().unwrap().field, "name");
    }

    #[test]
    fn test_parse_param_skips_empty_tokens() {
        let order = SortOrder::parse_param(" name , ,-age,, ");
        assert_eq!(order.len(), 2);
        assert!(order.sorts_by("name"));
        assert!(order.sorts_by("age"));

        assert!(SortOrder::parse_param(",,").is_empty());
    }

    #[test]
    fn test_newest_first() {
        let order = SortOrder::newest_first();
        assert_eq!(order.to_param(), "-createdAt");
    }
}
