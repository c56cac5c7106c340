// ABOUTME: Available slot generation and listing route handlers
// ABOUTME: Expands a weekly availability pattern into stored slots and queries them by range
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Available schedule routes
//!
//! Generation is idempotent: windows that already exist for the company are
//! skipped through the uniqueness constraint rather than duplicated, so the
//! same pattern can be re-submitted for an extended period.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{authenticate, authorize_company};
use crate::database::is_unique_violation;
use crate::errors::AppError;
use crate::scheduling::{generate_slots, GenerationParams};
use crate::server::ServerResources;

/// Request body for generating available slots
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlotsRequest {
    pub company_id: Uuid,
    /// Daily window start, `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    /// Daily window end, `HH:MM` or `HH:MM:SS`
    pub end_time: String,
    pub interval_in_minutes: i64,
    /// Weekday indices, 0 = Sunday through 6 = Saturday
    pub days: Vec<u8>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Query for listing a company's slots in a date range
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSlotsQuery {
    pub company_id: Uuid,
    pub initial_date: NaiveDate,
    pub final_date: NaiveDate,
}

/// Available schedule routes implementation
pub struct SlotRoutes;

impl SlotRoutes {
    /// Create all available schedule routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/schedule/available", post(Self::handle_generate))
            .route("/schedule/available", get(Self::handle_list))
            .with_state(resources)
    }

    fn parse_time_of_day(value: &str, field: &str) -> Result<NaiveTime, AppError> {
        NaiveTime::parse_from_str(value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
            .map_err(|_| {
                AppError::invalid_format(field, format!("{field} must be HH:MM or HH:MM:SS"))
            })
    }

    /// Handle slot generation for a company
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<GenerateSlotsRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, request.company_id).await?;

        let params = GenerationParams {
            company_id: company.id,
            start_time_of_day: Self::parse_time_of_day(&request.start_time, "startTime")?,
            end_time_of_day: Self::parse_time_of_day(&request.end_time, "endTime")?,
            interval_minutes: request.interval_in_minutes,
            days_of_week: request.days,
            period_start: request.period_start,
            period_end: request.period_end,
        };

        let drafts = generate_slots(&params)?;

        // Existing identical windows are skipped, everything else still lands
        let mut created = 0u64;
        for slot in &drafts {
            match resources.database.create_slot(slot).await {
                Ok(()) => created += 1,
                Err(e) if is_unique_violation(&e) => {}
                Err(e) => return Err(AppError::database(e.to_string())),
            }
        }

        info!(
            company_id = %company.id,
            generated = drafts.len(),
            created,
            "available schedules created"
        );

        Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Schedules created",
                "count": created,
            })),
        )
            .into_response())
    }

    /// Handle listing a company's slots inside a date range
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListSlotsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let company = authorize_company(&resources, &auth, query.company_id).await?;

        if query.initial_date > query.final_date {
            return Err(AppError::invalid_input(
                "initialDate must not be after finalDate",
            ));
        }

        let range_start: DateTime<Utc> = query
            .initial_date
            .and_time(NaiveTime::MIN)
            .and_utc();
        let range_end: DateTime<Utc> = match query.final_date.succ_opt() {
            Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
            None => return Err(AppError::invalid_input("finalDate is out of range")),
        };

        let slots = resources
            .database
            .list_slots(company.id, range_start, range_end)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(slots)).into_response())
    }
}
