// ABOUTME: Service catalog storage queries
// ABOUTME: CRUD for a company's offered services with expected durations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::Service;

impl Database {
    /// Insert a new service
    pub async fn create_service(&self, service: &Service) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO services (id, company_id, name, description, price, expected_minutes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(service.id.to_string())
        .bind(service.company_id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.expected_minutes)
        .bind(service.created_at.to_rfc3339())
        .bind(service.updated_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get service by id
    pub async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>> {
        let row = sqlx::query("SELECT * FROM services WHERE id = ?1")
            .bind(service_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_service(&row)).transpose()
    }

    /// List a company's services
    pub async fn list_services(&self, company_id: Uuid) -> Result<Vec<Service>> {
        let rows = sqlx::query("SELECT * FROM services WHERE company_id = ?1 ORDER BY name")
            .bind(company_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::row_to_service).collect()
    }

    /// Update a service, refreshing its `updated_at`
    pub async fn update_service(&self, service: &Service) -> Result<()> {
        sqlx::query(
            r"
            UPDATE services
            SET name = ?2, description = ?3, price = ?4, expected_minutes = ?5, updated_at = ?6
            WHERE id = ?1
            ",
        )
        .bind(service.id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.expected_minutes)
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete a service
    pub async fn delete_service(&self, service_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM services WHERE id = ?1")
            .bind(service_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    fn row_to_service(row: &sqlx::sqlite::SqliteRow) -> Result<Service> {
        Ok(Service {
            id: get_uuid(row, "id")?,
            company_id: get_uuid(row, "company_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            expected_minutes: row.try_get("expected_minutes")?,
            created_at: get_datetime(row, "created_at")?,
            updated_at: get_datetime(row, "updated_at")?,
        })
    }
}
