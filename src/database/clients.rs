// ABOUTME: Client account storage queries
// ABOUTME: Registration and lookup of a company's clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::Client;

impl Database {
    /// Insert a new client
    ///
    /// # Errors
    ///
    /// Returns an error on database failure, including a uniqueness
    /// violation when the email is already registered
    pub async fn create_client(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO clients (id, company_id, name, email, password_hash, cell_phone, registered_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(client.id.to_string())
        .bind(client.company_id.to_string())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.password_hash)
        .bind(&client.cell_phone)
        .bind(client.registered_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get client by id
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT * FROM clients WHERE id = ?1")
            .bind(client_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_client(&row)).transpose()
    }

    /// Get client by email
    pub async fn get_client_by_email(&self, email: &str) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT * FROM clients WHERE email = ?1")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_client(&row)).transpose()
    }

    /// List a company's clients
    pub async fn list_clients(&self, company_id: Uuid) -> Result<Vec<Client>> {
        let rows =
            sqlx::query("SELECT * FROM clients WHERE company_id = ?1 ORDER BY registered_at")
                .bind(company_id.to_string())
                .fetch_all(self.pool())
                .await?;

        rows.iter().map(Self::row_to_client).collect()
    }

    /// Search a company's clients by name prefix
    pub async fn find_clients_by_name(
        &self,
        company_id: Uuid,
        name_prefix: &str,
    ) -> Result<Vec<Client>> {
        let rows = sqlx::query(
            "SELECT * FROM clients WHERE company_id = ?1 AND name LIKE ?2 ORDER BY name",
        )
        .bind(company_id.to_string())
        .bind(format!("{name_prefix}%"))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(Self::row_to_client).collect()
    }

    fn row_to_client(row: &sqlx::sqlite::SqliteRow) -> Result<Client> {
        Ok(Client {
            id: get_uuid(row, "id")?,
            company_id: get_uuid(row, "company_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            cell_phone: row.try_get("cell_phone")?,
            registered_at: get_datetime(row, "registered_at")?,
        })
    }
}
