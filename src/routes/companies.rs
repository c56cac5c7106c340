// ABOUTME: Company management route handlers for multi-tenant operations
// ABOUTME: Provides REST endpoints for creating, listing, updating and deleting companies
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Company management routes
//!
//! The company is the tenant unit: slots, bookings, products, services and
//! sales all hang off one. All handlers require valid JWT authentication and
//! operate on companies owned by the authenticated user.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{authenticate, authorize_company};
use crate::errors::AppError;
use crate::models::Company;
use crate::server::ServerResources;

/// Request body for creating or updating a company
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub name: String,
    pub address: String,
    pub address_number: i64,
    pub zip_code: String,
    pub cell_phone: String,
}

/// Company management routes
pub struct CompanyRoutes;

impl CompanyRoutes {
    /// Create all company management routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/company", post(Self::handle_create))
            .route("/company", get(Self::handle_list))
            .route("/company/:id", get(Self::handle_get))
            .route("/company/:id", put(Self::handle_update))
            .route("/company/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle company creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CompanyRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let existing = resources
            .database
            .get_company_by_user_and_name(auth.user_id, &request.name)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::invalid_input("Company already exists"));
        }

        let company = Company {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            name: request.name,
            address: request.address,
            address_number: request.address_number,
            zip_code: request.zip_code,
            cell_phone: request.cell_phone,
            created_at: Utc::now(),
        };

        resources
            .database
            .create_company(&company)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(company_id = %company.id, user_id = %auth.user_id, "company created");

        Ok((StatusCode::CREATED, Json(company)).into_response())
    }

    /// Handle listing the user's companies
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let companies = resources
            .database
            .list_companies(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(companies)).into_response())
    }

    /// Handle fetching one company
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, id).await?;

        Ok((StatusCode::OK, Json(company)).into_response())
    }

    /// Handle updating a company
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(request): Json<CompanyRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let mut company = authorize_company(&resources, &auth, id).await?;

        company.name = request.name;
        company.address = request.address;
        company.address_number = request.address_number;
        company.zip_code = request.zip_code;
        company.cell_phone = request.cell_phone;

        resources
            .database
            .update_company(&company)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(company)).into_response())
    }

    /// Handle deleting a company
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, id).await?;

        resources
            .database
            .delete_company(company.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(company_id = %company.id, "company deleted");

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
