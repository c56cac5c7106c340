// ABOUTME: Service catalog route handlers
// ABOUTME: CRUD endpoints for a company's offered services and their expected durations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service routes
//!
//! A service's `expectedMinutes` drives the booking capacity check, so it
//! must be strictly positive.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{authenticate, authorize_company};
use crate::errors::AppError;
use crate::models::Service;
use crate::server::ServerResources;

/// Request body for creating or updating a service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub company_id: Uuid,
    pub name: String,
    pub description: String,
    /// Price in cents
    pub price: i64,
    pub expected_minutes: i64,
}

/// Query for listing a company's services
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListServicesQuery {
    pub company_id: Uuid,
}

/// Service routes implementation
pub struct ServiceRoutes;

impl ServiceRoutes {
    /// Create all service routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/service", post(Self::handle_create))
            .route("/service", get(Self::handle_list))
            .route("/service/:id", get(Self::handle_get))
            .route("/service/:id", put(Self::handle_update))
            .route("/service/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn validate(request: &ServiceRequest) -> Result<(), AppError> {
        if request.price < 0 {
            return Err(AppError::invalid_input("price must not be negative"));
        }
        if request.expected_minutes <= 0 {
            return Err(AppError::invalid_input(
                "expectedMinutes must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Handle service creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ServiceRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;
        Self::validate(&request)?;

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: request.name,
            description: request.description,
            price: request.price,
            expected_minutes: request.expected_minutes,
            created_at: now,
            updated_at: now,
        };

        resources
            .database
            .create_service(&service)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::CREATED, Json(service)).into_response())
    }

    /// Handle listing a company's services
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListServicesQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let services = resources
            .database
            .list_services(company.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(services)).into_response())
    }

    /// Handle fetching one service
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let service = resources
            .database
            .get_service(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Service"))?;

        authorize_company(&resources, &auth, service.company_id).await?;

        Ok((StatusCode::OK, Json(service)).into_response())
    }

    /// Handle updating a service
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(request): Json<ServiceRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;
        Self::validate(&request)?;

        let mut service = resources
            .database
            .get_service(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Service"))?;

        if service.company_id != company.id {
            return Err(AppError::not_found("Service"));
        }

        service.name = request.name;
        service.description = request.description;
        service.price = request.price;
        service.expected_minutes = request.expected_minutes;
        service.updated_at = Utc::now();

        resources
            .database
            .update_service(&service)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(service)).into_response())
    }

    /// Handle deleting a service
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let service = resources
            .database
            .get_service(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Service"))?;

        authorize_company(&resources, &auth, service.company_id).await?;

        resources
            .database
            .delete_service(service.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
