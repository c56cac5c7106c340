// ABOUTME: User authentication route handlers for registration and login
// ABOUTME: Provides sign-up, sign-in and refresh-token endpoints issuing JWT access tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication routes for user account management
//!
//! Sign-up and sign-in issue an HS256 access token plus a stored refresh
//! token; refresh-token exchanges a live refresh token for a fresh access
//! token, rotating the refresh token in the process.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{RefreshToken, User};
use crate::server::ServerResources;

/// Sign-up request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub tax_id: String,
    pub cell_phone: String,
}

/// Sign-in request
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Refresh-token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Uuid,
}

/// Token pair returned by every authentication endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Uuid,
    pub expires_in: i64,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/sign-up", post(Self::handle_sign_up))
            .route("/auth/sign-in", post(Self::handle_sign_in))
            .route("/auth/refresh-token", post(Self::handle_refresh_token))
            .with_state(resources)
    }

    fn validate_sign_up(request: &SignUpRequest) -> Result<(), AppError> {
        if request.name.len() < 4 {
            return Err(AppError::invalid_input("name must have at least 4 characters"));
        }
        if !request.email.contains('@') {
            return Err(AppError::invalid_input("email is not valid"));
        }
        if request.password.len() < 6 {
            return Err(AppError::invalid_input(
                "password must have at least 6 characters",
            ));
        }
        if request.tax_id.len() < 11 {
            return Err(AppError::invalid_input("taxId must have at least 11 digits"));
        }
        if request.cell_phone.len() < 10 {
            return Err(AppError::invalid_input(
                "cellPhone must have at least 10 digits",
            ));
        }
        Ok(())
    }

    /// Handle user registration
    async fn handle_sign_up(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SignUpRequest>,
    ) -> Result<Response, AppError> {
        Self::validate_sign_up(&request)?;

        let existing = resources
            .database
            .get_user_by_email(&request.email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::invalid_input("User already exists"));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| AppError::internal(e.to_string()))?;

        let user = User {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            password_hash,
            cell_phone: request.cell_phone,
            tax_id: request.tax_id,
            created_at: Utc::now(),
        };

        resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(user_id = %user.id, "user registered");

        let tokens = Self::issue_tokens(&resources, &user).await?;
        Ok((StatusCode::CREATED, Json(tokens)).into_response())
    }

    /// Handle user login
    async fn handle_sign_in(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SignInRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .get_user_by_email(&request.email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        let password_matches = verify_password(&request.password, &user.password_hash)
            .map_err(|e| AppError::internal(e.to_string()))?;

        if !password_matches {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        info!(user_id = %user.id, "user signed in");

        let tokens = Self::issue_tokens(&resources, &user).await?;
        Ok((StatusCode::OK, Json(tokens)).into_response())
    }

    /// Handle refresh token exchange with rotation
    async fn handle_refresh_token(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RefreshTokenRequest>,
    ) -> Result<Response, AppError> {
        let stored = resources
            .database
            .get_refresh_token(request.refresh_token)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::auth_invalid("Refresh token not recognized"))?;

        if !stored.is_valid_at(Utc::now()) {
            // Expired tokens are purged on sight
            resources
                .database
                .delete_refresh_token(stored.id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            return Err(AppError::auth_expired());
        }

        let user = resources
            .database
            .get_user(stored.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("User"))?;

        resources
            .database
            .delete_refresh_token(stored.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let tokens = Self::issue_tokens(&resources, &user).await?;
        Ok((StatusCode::OK, Json(tokens)).into_response())
    }

    /// Generate an access token and persist a fresh refresh token
    async fn issue_tokens(
        resources: &Arc<ServerResources>,
        user: &User,
    ) -> Result<TokenResponse, AppError> {
        let access_token = resources
            .auth_manager
            .generate_token(user)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

        let now = Utc::now();
        let refresh_token = RefreshToken {
            id: Uuid::new_v4(),
            user_id: user.id,
            issued_at: now,
            expires_at: now + Duration::days(resources.config.refresh_token_expiry_days),
        };

        resources
            .database
            .create_refresh_token(&refresh_token)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(TokenResponse {
            access_token,
            refresh_token: refresh_token.id,
            expires_in: resources.auth_manager.expires_in_secs(),
        })
    }
}
