//! Per-day indent number sequencer
//!
//! Sequence state lives in the indent_sequences table, one row per calendar
//! day. The upsert below is atomic under concurrent transactions, so two
//! orders received at the same moment always draw distinct numbers.

use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};

use crate::error::{AppError, AppResult};
use shared::models::IndentNumber;

/// Allocates date-scoped indent numbers inside a fulfillment transaction
#[derive(Clone)]
pub struct IndentSequencer {
    prefix: String,
}

impl IndentSequencer {
    /// Create a sequencer with the configured indent number prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Draw the next indent number for the given day.
    ///
    /// Must run inside the caller's transaction: the drawn number is only
    /// consumed if that transaction commits, which keeps the per-day
    /// sequence dense.
    pub async fn next(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        date: NaiveDate,
    ) -> AppResult<IndentNumber> {
        let sequence = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO indent_sequences (seq_date, last_value)
            VALUES ($1, 1)
            ON CONFLICT (seq_date)
            DO UPDATE SET last_value = indent_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(date)
        .fetch_one(&mut **tx)
        .await?;

        IndentNumber::new(&self.prefix, date, sequence as u32)
            .map_err(|e| AppError::Internal(format!("indent number allocation: {}", e)))
    }
}
