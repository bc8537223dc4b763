//! Offset-based pagination protocol shared by every entity listing.
//!
//! Two pieces: [`PageRequest`] describes what the caller asked for, and
//! [`Page`] is the envelope every `find_all` returns. The envelope always
//! reflects what was actually returned, never the caller's nominal request:
//! an `all_records` fetch reports `limit = total`, `page = 1`, `pages = 1`
//! regardless of what limit the caller had set.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default page size when the caller does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Pagination parameters for a listing request.
///
/// `page` is 1-based. When `all_records` is set, `page` and `limit` are
/// ignored and the entire matching set is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub all_records: bool,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page,
            limit,
            all_records: false,
        }
    }

    /// Request the entire matching set, ignoring page/limit.
    pub fn all() -> Self {
        Self {
            all_records: true,
            ..Self::default()
        }
    }

    /// Reject non-positive `page` or `limit`.
    ///
    /// Skipped for `all_records` requests, where both values are unused.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.all_records {
            return Ok(());
        }
        if self.limit <= 0 {
            return Err(CoreError::InvalidPagination(format!(
                "limit must be positive, got {}",
                self.limit
            )));
        }
        if self.page <= 0 {
            return Err(CoreError::InvalidPagination(format!(
                "page must be positive, got {}",
                self.page
            )));
        }
        Ok(())
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            all_records: false,
        }
    }
}

/// The pagination envelope returned by every `find_all`.
///
/// This shape is the one persisted contract that must remain bit-stable
/// across entity types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    /// Build the envelope from a fetched page and a separately-counted total.
    ///
    /// `total` must come from a count query over the same filter, not from
    /// `records.len()`, since the last page can be shorter than the limit.
    pub fn from_query(records: Vec<T>, total: i64, request: &PageRequest) -> Self {
        if request.all_records {
            return Self {
                records,
                total,
                limit: total,
                page: 1,
                pages: 1,
            };
        }
        let pages = if total == 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            records,
            total,
            limit: request.limit,
            page: request.page,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(2, 7).offset(), 7);
    }

    #[test]
    fn last_short_page_envelope() {
        // 25 matching rows, limit 10, page 3 -> 5 records, 3 pages.
        let records = vec![(); 5];
        let page = Page::from_query(records, 25, &PageRequest::new(3, 10));
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.total, 25);
        assert_eq!(page.limit, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn exact_multiple_of_limit() {
        let page = Page::from_query(vec![(); 10], 30, &PageRequest::new(1, 10));
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page = Page::<()>::from_query(vec![], 0, &PageRequest::new(1, 10));
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn all_records_envelope_reflects_what_was_returned() {
        let page = Page::from_query(vec![(); 25], 25, &PageRequest::all());
        assert_eq!(page.limit, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn all_records_on_empty_set() {
        let page = Page::<()>::from_query(vec![], 0, &PageRequest::all());
        assert_eq!(page.limit, 0);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn rejects_non_positive_limit() {
        assert!(PageRequest::new(1, 0).validate().is_err());
        assert!(PageRequest::new(1, -5).validate().is_err());
    }

    #[test]
    fn rejects_non_positive_page() {
        assert!(PageRequest::new(0, 10).validate().is_err());
        assert!(PageRequest::new(-1, 10).validate().is_err());
    }

    #[test]
    fn all_records_skips_validation() {
        let request = PageRequest {
            page: 0,
            limit: 0,
            all_records: true,
        };
        assert!(request.validate().is_ok());
    }
}
