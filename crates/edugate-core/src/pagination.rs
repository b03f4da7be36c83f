//! Pagination utilities for list endpoints.
//!
//! Supports `limit` + `offset` or `limit` + `page` query parameters.
//! When `page` is provided it takes precedence over `offset`.
//!
//! ```ignore
//! // GET /api/courses?limit=20&page=3
//! let limit = params.limit();   // 20
//! let offset = params.offset(); // 40
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query strings may carry empty values (`?page=`), which are treated as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number, 1-indexed
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1).saturating_mul(self.limit()),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }

    /// Builds the response metadata once the total count is known.
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let offset = self.offset();
        PaginationMeta {
            total,
            limit,
            offset: self.page.is_none().then_some(offset),
            page: self.page(),
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-3), None, None).limit(), 1);
        assert_eq!(params(Some(500), None, None).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let p = params(Some(20), Some(5), Some(3));
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_negative_offset_and_page() {
        assert_eq!(params(None, Some(-5), None).offset(), 0);
        assert_eq!(params(None, None, Some(-2)).offset(), 0);
        assert_eq!(params(None, None, Some(-2)).page(), Some(1));
    }

    #[test]
    fn test_meta_has_more() {
        let p = params(Some(10), Some(0), None);
        let meta = p.meta(25);
        assert!(meta.has_more);
        assert_eq!(meta.offset, Some(0));
        assert_eq!(meta.page, None);

        let last = params(Some(10), None, Some(3)).meta(25);
        assert!(!last.has_more);
        assert_eq!(last.offset, None);
        assert_eq!(last.page, Some(3));
    }

    #[test]
    fn test_extreme_page_and_offset_saturate() {
        let by_page = params(Some(MAX_LIMIT), None, Some(i64::MAX));
        assert_eq!(by_page.offset(), i64::MAX);
        let meta = by_page.meta(25);
        assert!(!meta.has_more);
        assert_eq!(meta.page, Some(i64::MAX));

        let by_offset = params(None, Some(i64::MAX), None);
        assert_eq!(by_offset.offset(), i64::MAX);
        assert!(!by_offset.meta(25).has_more);
    }

    #[test]
    fn test_deserialize_empty_strings() {
        let p: PaginationParams =
            serde_json::from_str(r#"{"limit":"","offset":"7","page":null}"#).unwrap();
        assert_eq!(p.limit, None);
        assert_eq!(p.offset, Some(7));
        assert_eq!(p.page, None);
    }
}
