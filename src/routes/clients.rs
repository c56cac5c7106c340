// ABOUTME: Client registration and lookup route handlers
// ABOUTME: Registers a company's clients and lists or searches them by name
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client routes
//!
//! Clients are registered under a company with a hashed password so they can
//! later authenticate against a client-facing surface.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{authenticate, authorize_company};
use crate::auth::hash_password;
use crate::errors::AppError;
use crate::models::Client;
use crate::server::ServerResources;

/// Request body for registering a client
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub cell_phone: String,
}

/// Query for listing a company's clients
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsQuery {
    pub company_id: Uuid,
}

/// Client routes implementation
pub struct ClientRoutes;

impl ClientRoutes {
    /// Create all client routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/client", post(Self::handle_register))
            .route("/client", get(Self::handle_list))
            .route("/client/:client_name", get(Self::handle_find_by_name))
            .with_state(resources)
    }

    /// Handle client registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<RegisterClientRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;

        if request.password.len() < 6 {
            return Err(AppError::invalid_input(
                "password must have at least 6 characters",
            ));
        }
        if !request.email.contains('@') {
            return Err(AppError::invalid_input("email is not valid"));
        }

        let existing = resources
            .database
            .get_client_by_email(&request.email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::invalid_input("Email already exists"));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| AppError::internal(e.to_string()))?;

        let client = Client {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: request.name,
            email: request.email,
            password_hash,
            cell_phone: request.cell_phone,
            registered_at: Utc::now(),
        };

        resources
            .database
            .create_client(&client)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(client_id = %client.id, company_id = %company.id, "client registered");

        Ok((StatusCode::CREATED, Json(client)).into_response())
    }

    /// Handle listing a company's clients
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListClientsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let clients = resources
            .database
            .list_clients(company.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(clients)).into_response())
    }

    /// Handle searching clients by name prefix
    async fn handle_find_by_name(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_name): Path<String>,
        Query(query): Query<ListClientsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let clients = resources
            .database
            .find_clients_by_name(company.id, &client_name)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(clients)).into_response())
    }
}
