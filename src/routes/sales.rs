// ABOUTME: Sale recording route handlers
// ABOUTME: Records a client's sale with product line items and an optional booking reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sale routes

use axum::{
    extract::{Query, State},
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
use crate::errors::AppError;
use crate::models::{Sale, SaleProduct};
use crate::server::ServerResources;

/// A product line item on a sale
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleProductRequest {
    pub product_id: Uuid,
    pub quantity: i64,
    pub discount: Option<i64>,
}

/// Request body for recording a sale
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub schedule_id: Option<Uuid>,
    #[serde(default)]
    pub products: Vec<SaleProductRequest>,
}

/// Query for listing a company's sales
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesQuery {
    pub company_id: Uuid,
}

/// Sale routes implementation
pub struct SaleRoutes;

impl SaleRoutes {
    /// Create all sale routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/sale", post(Self::handle_create))
            .route("/sale", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle sale recording.
    ///
    /// The total is computed server side from the referenced products'
    /// current prices minus any per-line discount. When the sale references
    /// a booking, that booking's reserved product items are copied into the
    /// sale and their value is part of the total.
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateSaleRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;

        let client = resources
            .database
            .get_client(request.client_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Client"))?;

        let mut total = 0i64;

        if let Some(schedule_id) = request.schedule_id {
            let booking = resources
                .database
                .get_booking(schedule_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .ok_or_else(|| AppError::not_found("Schedule"))?;

            if booking.company_id != company.id {
                return Err(AppError::not_found("Schedule"));
            }

            // The booking's reserved products are copied into the sale, so
            // their value belongs in the total
            total += resources
                .database
                .booking_products_value(booking.id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
        }

        let sale_id = Uuid::new_v4();
        let mut items = Vec::with_capacity(request.products.len());

        for line in &request.products {
            let product = resources
                .database
                .get_product(line.product_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .ok_or_else(|| AppError::not_found("Product"))?;

            if line.quantity <= 0 {
                return Err(AppError::invalid_input("quantity must be positive"));
            }

            total += product.price * line.quantity - line.discount.unwrap_or(0);

            items.push(SaleProduct {
                id: Uuid::new_v4(),
                sale_id,
                product_id: product.id,
                quantity: line.quantity,
                discount: line.discount,
            });
        }

        let sale = Sale {
            id: sale_id,
            company_id: company.id,
            client_id: client.id,
            booking_id: request.schedule_id,
            total,
            created_at: Utc::now(),
        };

        resources
            .database
            .create_sale(&sale, &items)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(
            sale_id = %sale.id,
            company_id = %company.id,
            client_id = %client.id,
            total,
            "sale recorded"
        );

        Ok((StatusCode::CREATED, Json(sale)).into_response())
    }

    /// Handle listing a company's sales
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListSalesQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let sales = resources
            .database
            .list_sales(company.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(sales)).into_response())
    }
}
