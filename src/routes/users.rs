// ABOUTME: User profile route handlers
// ABOUTME: Self-service profile fetch and update with current-password verification
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User profile routes
//!
//! A user may only read or update their own account; the path id must match
//! the authenticated identity.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::authenticate;
use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::User;
use crate::server::ServerResources;

/// Request body for updating a user profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    /// Current password, verified before anything changes
    pub password: String,
    #[serde(rename = "new_password")]
    pub new_password: String,
    pub cell_phone: String,
    pub tax_id: String,
}

/// User profile routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/user/:id", get(Self::handle_get))
            .route("/user/:id", put(Self::handle_update))
            .with_state(resources)
    }

    async fn own_user(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
        id: Uuid,
    ) -> Result<User, AppError> {
        let auth = authenticate(headers, resources)?;
        if id != auth.user_id {
            return Err(AppError::permission_denied(
                "Users may only manage their own account",
            ));
        }

        resources
            .database
            .get_user(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Handle fetching the authenticated user's profile
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = Self::own_user(&resources, &headers, id).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    /// Handle updating the authenticated user's profile and password
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdateUserRequest>,
    ) -> Result<Response, AppError> {
        let mut user = Self::own_user(&resources, &headers, id).await?;

        if !request.email.contains('@') {
            return Err(AppError::invalid_input("email is not valid"));
        }
        if request.new_password.len() < 6 {
            return Err(AppError::invalid_input(
                "new_password must have at least 6 characters",
            ));
        }
        if request.tax_id.len() < 11 {
            return Err(AppError::invalid_input("taxId must have at least 11 digits"));
        }

        let password_matches = verify_password(&request.password, &user.password_hash)
            .map_err(|e| AppError::internal(e.to_string()))?;
        if !password_matches {
            return Err(AppError::auth_invalid("Current password incorrect"));
        }

        if request.email != user.email {
            let taken = resources
                .database
                .get_user_by_email(&request.email)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .is_some();
            if taken {
                return Err(AppError::invalid_input("Email already exists"));
            }
        }

        user.name = request.name;
        user.email = request.email;
        user.password_hash = hash_password(&request.new_password)
            .map_err(|e| AppError::internal(e.to_string()))?;
        user.cell_phone = request.cell_phone;
        user.tax_id = request.tax_id;

        resources
            .database
            .update_user(&user)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(user_id = %user.id, "user profile updated");

        Ok((StatusCode::OK, Json(user)).into_response())
    }
}
