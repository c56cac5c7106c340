// ABOUTME: Booking (schedule) route handlers delegating to the booking coordinator
// ABOUTME: Creates, lists, fetches and cancels bookings against available slots
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schedule routes
//!
//! Creation goes through the [`crate::scheduling::BookingCoordinator`], which
//! owns referent validation, the capacity check and the atomic slot claim.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{authenticate, authorize_company};
use crate::errors::AppError;
use crate::scheduling::{BookingRequest, ProductLine};
use crate::server::ServerResources;

/// A requested product line item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLineRequest {
    pub product_id: Uuid,
    pub quantity: i64,
    pub discount: Option<i64>,
}

/// Request body for creating a booking
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub available_schedule_id: Uuid,
    #[serde(default)]
    pub services: Vec<Uuid>,
    #[serde(default)]
    pub products: Vec<ProductLineRequest>,
}

/// Query for listing a company's bookings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub company_id: Uuid,
}

/// Schedule routes implementation
pub struct BookingRoutes;

impl BookingRoutes {
    /// Create all schedule routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/schedule", post(Self::handle_create))
            .route("/schedule", get(Self::handle_list))
            .route("/schedule/:id", get(Self::handle_get))
            .route("/schedule/:id", delete(Self::handle_cancel))
            .with_state(resources)
    }

    /// Handle booking creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateBookingRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;

        let booking = resources
            .coordinator
            .book(BookingRequest {
                company_id: company.id,
                client_id: request.client_id,
                available_slot_id: request.available_schedule_id,
                services: request.services,
                products: request
                    .products
                    .into_iter()
                    .map(|line| ProductLine {
                        product_id: line.product_id,
                        quantity: line.quantity,
                        discount: line.discount,
                    })
                    .collect(),
            })
            .await?;

        Ok((StatusCode::CREATED, Json(booking)).into_response())
    }

    /// Handle listing a company's bookings
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListBookingsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let bookings = resources.coordinator.list(company.id).await?;

        Ok((StatusCode::OK, Json(bookings)).into_response())
    }

    /// Handle fetching one booking
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let booking = resources.coordinator.get(id).await?;
        authorize_company(&resources, &auth, booking.company_id).await?;

        Ok((StatusCode::OK, Json(booking)).into_response())
    }

    /// Handle booking cancellation
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let booking = resources.coordinator.get(id).await?;
        authorize_company(&resources, &auth, booking.company_id).await?;

        resources.coordinator.cancel(id).await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
