// ABOUTME: Read-only aggregate queries for company reports
// ABOUTME: Counts bookings over a slot date range and catalog/client rows per company
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::Row;
use uuid::Uuid;

use super::Database;

impl Database {
    /// Count a company's bookings whose slot falls inside the inclusive
    /// date range
    pub async fn count_bookings_in_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<i64> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS n
            FROM bookings b
            JOIN available_slots s ON s.id = b.available_slot_id
            WHERE b.company_id = ?1 AND s.date >= ?2 AND s.date <= ?3
            ",
        )
        .bind(company_id.to_string())
        .bind(period_start.format("%Y-%m-%d").to_string())
        .bind(period_end.format("%Y-%m-%d").to_string())
        .fetch_one(self.pool())
        .await?;

        Ok(row.try_get("n")?)
    }

    /// Count a company's products
    pub async fn count_products(&self, company_id: Uuid) -> Result<i64> {
        Self::count_for_company(self, "products", company_id).await
    }

    /// Count a company's services
    pub async fn count_services(&self, company_id: Uuid) -> Result<i64> {
        Self::count_for_company(self, "services", company_id).await
    }

    /// Count a company's clients
    pub async fn count_clients(&self, company_id: Uuid) -> Result<i64> {
        Self::count_for_company(self, "clients", company_id).await
    }

    async fn count_for_company(&self, table: &str, company_id: Uuid) -> Result<i64> {
        // Table names come from the callers above, never from input
        let row = sqlx::query(&format!(
            "SELECT COUNT(*) AS n FROM {table} WHERE company_id = ?1"
        ))
        .bind(company_id.to_string())
        .fetch_one(self.pool())
        .await?;

        Ok(row.try_get("n")?)
    }
}
