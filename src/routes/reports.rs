// ABOUTME: Read-only report route handlers
// ABOUTME: Booking counts over a period plus product, service and client summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report routes
//!
//! Aggregates over a single company's data. Listings reuse the entity
//! queries and project the fields a summary needs.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{authenticate, authorize_company};
use crate::errors::AppError;
use crate::server::ServerResources;

/// Query for the schedule summary
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummaryQuery {
    pub company_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Query for the per-company summaries
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyReportQuery {
    pub company_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleSummary {
    total_schedules: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductStockEntry {
    id: Uuid,
    name: String,
    quantity: i64,
    price: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductStock {
    products: Vec<ProductStockEntry>,
    total_products: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceSummaryEntry {
    id: Uuid,
    name: String,
    price: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceSummary {
    services: Vec<ServiceSummaryEntry>,
    total_services: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientSummaryEntry {
    id: Uuid,
    name: String,
    email: String,
    cell_phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientSummary {
    clients: Vec<ClientSummaryEntry>,
    total_clients: i64,
}

/// Report routes implementation
pub struct ReportRoutes;

impl ReportRoutes {
    /// Create all report routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/report/schedule-summary", get(Self::handle_schedule_summary))
            .route("/report/product-stock", get(Self::handle_product_stock))
            .route("/report/service-summary", get(Self::handle_service_summary))
            .route("/report/client-summary", get(Self::handle_client_summary))
            .with_state(resources)
    }

    /// Handle the booking count over a slot date range
    async fn handle_schedule_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ScheduleSummaryQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        if query.start_date > query.end_date {
            return Err(AppError::invalid_input(
                "startDate must not be after endDate",
            ));
        }

        let total_schedules = resources
            .database
            .count_bookings_in_period(company.id, query.start_date, query.end_date)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(ScheduleSummary { total_schedules })).into_response())
    }

    /// Handle the product stock summary
    async fn handle_product_stock(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CompanyReportQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let (products, total_products) = tokio::try_join!(
            resources.database.list_products(company.id),
            resources.database.count_products(company.id),
        )
        .map_err(|e| AppError::database(e.to_string()))?;

        let products = products
            .into_iter()
            .map(|p| ProductStockEntry {
                id: p.id,
                name: p.name,
                quantity: p.quantity,
                price: p.price,
            })
            .collect();

        Ok((
            StatusCode::OK,
            Json(ProductStock {
                products,
                total_products,
            }),
        )
            .into_response())
    }

    /// Handle the service summary
    async fn handle_service_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CompanyReportQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let (services, total_services) = tokio::try_join!(
            resources.database.list_services(company.id),
            resources.database.count_services(company.id),
        )
        .map_err(|e| AppError::database(e.to_string()))?;

        let services = services
            .into_iter()
            .map(|s| ServiceSummaryEntry {
                id: s.id,
                name: s.name,
                price: s.price,
            })
            .collect();

        Ok((
            StatusCode::OK,
            Json(ServiceSummary {
                services,
                total_services,
            }),
        )
            .into_response())
    }

    /// Handle the client summary
    async fn handle_client_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CompanyReportQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        let (clients, total_clients) = tokio::try_join!(
            resources.database.list_clients(company.id),
            resources.database.count_clients(company.id),
        )
        .map_err(|e| AppError::database(e.to_string()))?;

        let clients = clients
            .into_iter()
            .map(|c| ClientSummaryEntry {
                id: c.id,
                name: c.name,
                email: c.email,
                cell_phone: c.cell_phone,
            })
            .collect();

        Ok((
            StatusCode::OK,
            Json(ClientSummary {
                clients,
                total_clients,
            }),
        )
            .into_response())
    }
}
