// ABOUTME: Available slot storage and range queries
// ABOUTME: Persists bookable time windows with their booked flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::{get_date, get_datetime, get_uuid, Database};
use crate::models::AvailableSlot;

impl Database {
    /// Insert one slot
    ///
    /// # Errors
    ///
    /// Returns an error on database failure, including a uniqueness
    /// violation when an identical window already exists for the company
    pub async fn create_slot(&self, slot: &AvailableSlot) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO available_slots (id, company_id, date, start_time, end_time, is_booked)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(slot.id.to_string())
        .bind(slot.company_id.to_string())
        .bind(slot.date.format("%Y-%m-%d").to_string())
        .bind(slot.start_time.to_rfc3339())
        .bind(slot.end_time.to_rfc3339())
        .bind(slot.is_booked)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get slot by id
    pub async fn get_slot(&self, slot_id: Uuid) -> Result<Option<AvailableSlot>> {
        let row = sqlx::query("SELECT * FROM available_slots WHERE id = ?1")
            .bind(slot_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| row_to_slot(&row)).transpose()
    }

    /// List a company's slots fully contained in `[range_start, range_end]`,
    /// ascending by start time
    pub async fn list_slots(
        &self,
        company_id: Uuid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<AvailableSlot>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM available_slots
            WHERE company_id = ?1 AND start_time >= ?2 AND end_time <= ?3
            ORDER BY start_time ASC
            ",
        )
        .bind(company_id.to_string())
        .bind(range_start.to_rfc3339())
        .bind(range_end.to_rfc3339())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(|row| row_to_slot(row)).collect()
    }

    /// Flip a slot's booked flag
    pub async fn set_slot_booked(&self, slot_id: Uuid, is_booked: bool) -> Result<()> {
        sqlx::query("UPDATE available_slots SET is_booked = ?2 WHERE id = ?1")
            .bind(slot_id.to_string())
            .bind(is_booked)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Delete all of a company's slots (explicit purge)
    pub async fn delete_slots_for_company(&self, company_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM available_slots WHERE company_id = ?1")
            .bind(company_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}

pub(crate) fn row_to_slot(row: &sqlx::sqlite::SqliteRow) -> Result<AvailableSlot> {
    Ok(AvailableSlot {
        id: get_uuid(row, "id")?,
        company_id: get_uuid(row, "company_id")?,
        date: get_date(row, "date")?,
        start_time: get_datetime(row, "start_time")?,
        end_time: get_datetime(row, "end_time")?,
        is_booked: row.try_get("is_booked")?,
    })
}
