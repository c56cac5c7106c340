// ABOUTME: Product catalog route handlers
// ABOUTME: CRUD endpoints for a company's sellable products
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product routes

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
use crate::models::Product;
use crate::server::ServerResources;

/// Request body for creating or updating a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub company_id: Uuid,
    pub name: String,
    pub description: String,
    /// Price in cents
    pub price: i64,
    pub quantity: i64,
}

/// Query for listing a company's products
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub company_id: Uuid,
}

/// Product routes implementation
pub struct ProductRoutes;

impl ProductRoutes {
    /// Create all product routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/product", post(Self::handle_create))
            .route("/product", get(Self::handle_list))
            .route("/product/:id", get(Self::handle_get))
            .route("/product/:id", put(Self::handle_update))
            .route("/product/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn validate(request: &ProductRequest) -> Result<(), AppError> {
        if request.price < 0 {
            return Err(AppError::invalid_input("price must not be negative"));
        }
        if request.quantity < 0 {
            return Err(AppError::invalid_input("quantity must not be negative"));
        }
        Ok(())
    }

    /// Handle product creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ProductRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;
        Self::validate(&request)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
            created_at: now,
            updated_at: now,
        };

        resources
            .database
            .create_product(&product)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::CREATED, Json(product)).into_response())
    }

    /// Handle listing a company's products
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListProductsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let products = resources
            .database
            .list_products(company.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(products)).into_response())
    }

    /// Handle fetching one product
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let product = resources
            .database
            .get_product(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Product"))?;

        authorize_company(&resources, &auth, product.company_id).await?;

        Ok((StatusCode::OK, Json(product)).into_response())
    }

    /// Handle updating a product
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(request): Json<ProductRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;
        Self::validate(&request)?;

        let mut product = resources
            .database
            .get_product(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Product"))?;

        if product.company_id != company.id {
            return Err(AppError::not_found("Product"));
        }

        product.name = request.name;
        product.description = request.description;
        product.price = request.price;
        product.quantity = request.quantity;
        product.updated_at = Utc::now();

        resources
            .database
            .update_product(&product)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(product)).into_response())
    }

    /// Handle deleting a product
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let product = resources
            .database
            .get_product(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Product"))?;

        authorize_company(&resources, &auth, product.company_id).await?;

        resources
            .database
            .delete_product(product.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
