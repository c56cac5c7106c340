// ABOUTME: Company (tenant) storage queries
// ABOUTME: CRUD and ownership lookups for the tenant unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::Company;

impl Database {
    /// Insert a new company
    ///
    /// # Errors
    ///
    /// Returns an error on database failure, including a uniqueness
    /// violation when the user already has a company with this name
    pub async fn create_company(&self, company: &Company) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO companies (id, user_id, name, address, address_number, zip_code, cell_phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(company.id.to_string())
        .bind(company.user_id.to_string())
        .bind(&company.name)
        .bind(&company.address)
        .bind(company.address_number)
        .bind(&company.zip_code)
        .bind(&company.cell_phone)
        .bind(company.created_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get company by id
    pub async fn get_company(&self, company_id: Uuid) -> Result<Option<Company>> {
        let row = sqlx::query("SELECT * FROM companies WHERE id = ?1")
            .bind(company_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_company(&row)).transpose()
    }

    /// List companies owned by a user
    pub async fn list_companies(&self, user_id: Uuid) -> Result<Vec<Company>> {
        let rows = sqlx::query("SELECT * FROM companies WHERE user_id = ?1 ORDER BY created_at")
            .bind(user_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::row_to_company).collect()
    }

    /// Find a company owned by a user with the given name
    pub async fn get_company_by_user_and_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<Option<Company>> {
        let row = sqlx::query("SELECT * FROM companies WHERE user_id = ?1 AND name = ?2")
            .bind(user_id.to_string())
            .bind(name)
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_company(&row)).transpose()
    }

    /// Update a company's profile fields
    pub async fn update_company(&self, company: &Company) -> Result<()> {
        sqlx::query(
            r"
            UPDATE companies
            SET name = ?2, address = ?3, address_number = ?4, zip_code = ?5, cell_phone = ?6
            WHERE id = ?1
            ",
        )
        .bind(company.id.to_string())
        .bind(&company.name)
        .bind(&company.address)
        .bind(company.address_number)
        .bind(&company.zip_code)
        .bind(&company.cell_phone)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete a company and all dependent rows
    pub async fn delete_company(&self, company_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM companies WHERE id = ?1")
            .bind(company_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    fn row_to_company(row: &sqlx::sqlite::SqliteRow) -> Result<Company> {
        Ok(Company {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            address_number: row.try_get("address_number")?,
            zip_code: row.try_get("zip_code")?,
            cell_phone: row.try_get("cell_phone")?,
            created_at: get_datetime(row, "created_at")?,
        })
    }
}
