// ABOUTME: Booking coordinator validating requests and committing them atomically
// ABOUTME: Performs referent checks, the capacity check, and the transactional slot claim
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Booking Coordinator
//!
//! Validates a booking request against its referenced entities, computes
//! whether the slot's duration covers the requested services, and commits
//! the booking with its line items in one transaction that also claims the
//! slot. Two concurrent requests for the same slot cannot both succeed: the
//! loser observes a conflict through the uniqueness constraint on the slot
//! reference.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::{is_unique_violation, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingProduct, BookingService, Situation};

/// A requested product line item
#[derive(Debug, Clone)]
pub struct ProductLine {
    pub product_id: Uuid,
    pub quantity: i64,
    pub discount: Option<i64>,
}

/// A validated booking request
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub available_slot_id: Uuid,
    pub services: Vec<Uuid>,
    pub products: Vec<ProductLine>,
}

/// Coordinates booking creation and cancellation against the store
#[derive(Clone)]
pub struct BookingCoordinator {
    database: Database,
}

impl BookingCoordinator {
    /// Create a coordinator over the given database
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Create a booking for a client against an available slot.
    ///
    /// The referenced company, client, slot, products and services must all
    /// exist (404 otherwise), and the slot must belong to the booking's
    /// company. The booking is committed with its line items and the slot
    /// claim as one atomic unit. Capacity shortfall is not a rejection: when
    /// the slot is shorter than the summed expected service minutes the
    /// booking is created as `PENDING` instead of `CONFIRMED`.
    ///
    /// # Errors
    ///
    /// - `404` when any referenced entity is missing
    /// - `409` when another booking already claimed the slot
    /// - `500` on storage failure
    pub async fn book(&self, request: BookingRequest) -> AppResult<Booking> {
        let (company, client, slot) = tokio::try_join!(
            self.database.get_company(request.company_id),
            self.database.get_client(request.client_id),
            self.database.get_slot(request.available_slot_id),
        )
        .map_err(|e| AppError::database(e.to_string()))?;

        let company = company.ok_or_else(|| AppError::not_found("Company"))?;
        let client = client.ok_or_else(|| AppError::not_found("Client"))?;
        let slot = slot.ok_or_else(|| AppError::not_found("Available schedule"))?;

        // A slot from another tenant is indistinguishable from a missing one
        if slot.company_id != company.id {
            return Err(AppError::not_found("Available schedule"));
        }

        for line in &request.products {
            self.database
                .get_product(line.product_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .ok_or_else(|| AppError::not_found("Product"))?;
        }

        let mut expected_minutes = 0;
        for service_id in &request.services {
            let service = self
                .database
                .get_service(*service_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .ok_or_else(|| AppError::not_found("Service"))?;
            expected_minutes += service.expected_minutes;
        }

        let available_minutes = slot.duration_minutes();
        let situation = if available_minutes >= expected_minutes {
            Situation::Confirmed
        } else {
            warn!(
                slot_id = %slot.id,
                available_minutes,
                expected_minutes,
                "slot shorter than requested services, booking created as pending"
            );
            Situation::Pending
        };

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            company_id: company.id,
            client_id: client.id,
            available_slot_id: slot.id,
            situation,
            created_at: now,
            updated_at: now,
        };

        let products: Vec<BookingProduct> = request
            .products
            .iter()
            .map(|line| BookingProduct {
                id: Uuid::new_v4(),
                booking_id: booking.id,
                product_id: line.product_id,
                quantity: line.quantity,
                discount: line.discount,
            })
            .collect();

        let services: Vec<BookingService> = request
            .services
            .iter()
            .map(|service_id| BookingService {
                id: Uuid::new_v4(),
                booking_id: booking.id,
                service_id: *service_id,
            })
            .collect();

        self.database
            .create_booking(&booking, &products, &services)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::conflict("Schedule with this available schedule already exists")
                } else {
                    AppError::database(e.to_string())
                }
            })?;

        info!(
            booking_id = %booking.id,
            company_id = %company.id,
            client_id = %client.id,
            slot_id = %slot.id,
            situation = situation.as_str(),
            "booking created"
        );

        Ok(booking)
    }

    /// Cancel a booking: release its slot and delete the record, atomically
    ///
    /// # Errors
    ///
    /// - `404` when the booking does not exist
    /// - `500` on storage failure
    pub async fn cancel(&self, booking_id: Uuid) -> AppResult<()> {
        let booking = self
            .database
            .get_booking(booking_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Schedule"))?;

        self.database
            .delete_booking(&booking)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(
            booking_id = %booking.id,
            slot_id = %booking.available_slot_id,
            "booking canceled, slot released"
        );

        Ok(())
    }

    /// List a company's bookings
    ///
    /// # Errors
    ///
    /// Returns `500` on storage failure
    pub async fn list(&self, company_id: Uuid) -> AppResult<Vec<Booking>> {
        self.database
            .list_bookings(company_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))
    }

    /// Get one booking by id
    ///
    /// # Errors
    ///
    /// - `404` when the booking does not exist
    /// - `500` on storage failure
    pub async fn get(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.database
            .get_booking(booking_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Schedule"))
    }
}
