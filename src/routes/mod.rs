// ABOUTME: HTTP route assembly and shared request authentication
// ABOUTME: Merges per-entity routers and extracts the bearer identity for handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # HTTP Routes
//!
//! Thin axum handlers over the storage and scheduling layers. Every
//! authenticated handler extracts the bearer token itself and threads the
//! resolved identity into the operation it performs; there is no ambient
//! request-scoped identity.

/// Sign-up, sign-in and refresh-token endpoints
pub mod auth;
/// Booking (schedule) endpoints
pub mod bookings;
/// Client registration and lookup endpoints
pub mod clients;
/// Company CRUD endpoints
pub mod companies;
/// Health check endpoints
pub mod health;
/// Product CRUD endpoints
pub mod products;
/// Report summary endpoints
pub mod reports;
/// Sale recording endpoints
pub mod sales;
/// Service CRUD endpoints
pub mod services;
/// Available slot generation and listing endpoints
pub mod slots;
/// User profile endpoints
pub mod users;

use axum::http::HeaderMap;
use axum::Router;
use std::sync::Arc;

use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::server::ServerResources;

/// Assemble the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(companies::CompanyRoutes::routes(resources.clone()))
        .merge(clients::ClientRoutes::routes(resources.clone()))
        .merge(products::ProductRoutes::routes(resources.clone()))
        .merge(services::ServiceRoutes::routes(resources.clone()))
        .merge(slots::SlotRoutes::routes(resources.clone()))
        .merge(bookings::BookingRoutes::routes(resources.clone()))
        .merge(sales::SaleRoutes::routes(resources.clone()))
        .merge(reports::ReportRoutes::routes(resources.clone()))
        .merge(users::UserRoutes::routes(resources))
}

/// Extract and authenticate the user from the authorization header
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<AuthResult, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;

    resources
        .auth_manager
        .authenticate(token)
        .map_err(|e| AppError::auth_invalid(format!("Authentication failed: {e}")))
}

/// Resolve a company and verify it belongs to the authenticated user
pub(crate) async fn authorize_company(
    resources: &Arc<ServerResources>,
    auth: &AuthResult,
    company_id: uuid::Uuid,
) -> Result<crate::models::Company, AppError> {
    let company = resources
        .database
        .get_company(company_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Company"))?;

    if company.user_id != auth.user_id {
        return Err(AppError::permission_denied(
            "Company does not belong to the authenticated user",
        ));
    }

    Ok(company)
}
