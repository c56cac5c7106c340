// ABOUTME: User account storage queries
// ABOUTME: Create and lookup of registered company owners
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::User;

impl Database {
    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error on database failure, including a uniqueness
    /// violation when the email is already registered
    pub async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, cell_phone, tax_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.cell_phone)
        .bind(&user.tax_id)
        .bind(user.created_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get user by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// Update a user's profile fields and credentials
    pub async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r"
            UPDATE users
            SET name = ?2, email = ?3, password_hash = ?4, cell_phone = ?5, tax_id = ?6
            WHERE id = ?1
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.cell_phone)
        .bind(&user.tax_id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        Ok(User {
            id: get_uuid(row, "id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            cell_phone: row.try_get("cell_phone")?,
            tax_id: row.try_get("tax_id")?,
            created_at: get_datetime(row, "created_at")?,
        })
    }
}
