//! Reporting service for the super admin dashboard and the indent register

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::types::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Headline counts for the super admin dashboard
#[derive(Debug, Serialize)]
pub struct SystemCounts {
    pub users: i64,
    pub products: i64,
    pub suppliers: i64,
    pub received_orders: i64,
}

/// One fulfilled order in the indent register
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct IndentRegisterEntry {
    pub indent_no: String,
    pub staff_name: String,
    pub received_at: Option<DateTime<Utc>>,
    pub item_count: i64,
    pub total_quantity: i64,
}

/// Register filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct RegisterFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RegisterFilter {
    /// Resolve the optional bounds into a concrete date range
    fn resolve(&self) -> DateRange {
        DateRange {
            start: self
                .start_date
                .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
            end: self
                .end_date
                .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap()),
        }
    }
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get headline counts across the system
    pub async fn system_counts(&self) -> AppResult<SystemCounts> {
        // Registered users
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        // Catalog size
        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;

        // Supplier register size
        let suppliers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.db)
            .await?;

        // Fulfilled orders
        let received_orders: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM carts WHERE status = 'received'")
                .fetch_one(&self.db)
                .await?;

        Ok(SystemCounts {
            users,
            products,
            suppliers,
            received_orders,
        })
    }

    /// Get the indent register: every fulfilled order with its totals,
    /// optionally restricted to a received-date window (end inclusive)
    pub async fn indent_register(
        &self,
        filter: &RegisterFilter,
    ) -> AppResult<Vec<IndentRegisterEntry>> {
        let range = filter.resolve();

        let entries = sqlx::query_as::<_, IndentRegisterEntry>(
            r#"
            SELECT
                COALESCE(c.indent_no, '') as indent_no,
                u.name as staff_name,
                c.received_at,
                COUNT(ci.id) as item_count,
                COALESCE(SUM(ci.quantity), 0) as total_quantity
            FROM carts c
            JOIN users u ON c.staff_id = u.id
            LEFT JOIN cart_items ci ON ci.cart_id = c.id
            WHERE c.status = 'received'
              AND c.received_at >= $1
              AND c.received_at < $2::DATE + 1
            GROUP BY c.id, c.indent_no, u.name, c.received_at
            ORDER BY c.received_at DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
