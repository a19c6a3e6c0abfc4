//! Common types used across the system

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 5,
        }
    }
}

impl Pagination {
    /// Clamp to sane bounds: page >= 1, 1 <= per_page <= 100
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Row offset for the current page
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            ((total_items + u64::from(pagination.per_page) - 1) / u64::from(pagination.per_page))
                as u32
        };
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total_items,
            total_pages,
        }
    }
}

/// Date range for report queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 5);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination {
            page: 3,
            per_page: 5,
        };
        assert_eq!(p.offset(), 10);
        assert_eq!(p.limit(), 5);
    }

    #[test]
    fn test_pagination_normalized() {
        let p = Pagination {
            page: 0,
            per_page: 0,
        }
        .normalized();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 1);

        let p = Pagination {
            page: 2,
            per_page: 500,
        }
        .normalized();
        assert_eq!(p.per_page, 100);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(
            Pagination {
                page: 1,
                per_page: 5,
            },
            12,
        );
        assert_eq!(meta.total_pages, 3);

        let meta = PaginationMeta::new(
            Pagination {
                page: 1,
                per_page: 5,
            },
            10,
        );
        assert_eq!(meta.total_pages, 2);

        let meta = PaginationMeta::new(Pagination::default(), 0);
        assert_eq!(meta.total_pages, 0);
    }
}
