// ABOUTME: Refresh token storage queries
// ABOUTME: Issuance, lookup and rotation of refresh tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::RefreshToken;

impl Database {
    /// Insert a refresh token
    pub async fn create_refresh_token(&self, token: &RefreshToken) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, user_id, issued_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(token.id.to_string())
        .bind(token.user_id.to_string())
        .bind(token.issued_at.to_rfc3339())
        .bind(token.expires_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get a refresh token by id
    pub async fn get_refresh_token(&self, token_id: Uuid) -> Result<Option<RefreshToken>> {
        let row = sqlx::query("SELECT * FROM refresh_tokens WHERE id = ?1")
            .bind(token_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| {
            Ok(RefreshToken {
                id: get_uuid(&row, "id")?,
                user_id: get_uuid(&row, "user_id")?,
                issued_at: get_datetime(&row, "issued_at")?,
                expires_at: get_datetime(&row, "expires_at")?,
            })
        })
        .transpose()
    }

    /// Delete a refresh token (rotation or sign-out)
    pub async fn delete_refresh_token(&self, token_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE id = ?1")
            .bind(token_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
