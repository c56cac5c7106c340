// ABOUTME: Common data models for tenants, catalog entries, slots, bookings and sales
// ABOUTME: Serde-serializable structs shared by the database, scheduling and route layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Data Models
//!
//! Core domain types for the Agendly server. Companies are the tenant unit:
//! every slot, booking, product, service and sale belongs to exactly one
//! company, and a company belongs to the user account that registered it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account (company owner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Bcrypt hash, never serialized to API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub cell_phone: String,
    pub tax_id: String,
    pub created_at: DateTime<Utc>,
}

/// A refresh token issued alongside an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Whether the token is still exchangeable
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A company (tenant) owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub address_number: i64,
    pub zip_code: String,
    pub cell_phone: String,
    pub created_at: DateTime<Utc>,
}

/// A client who books schedules with a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub cell_phone: String,
    pub registered_at: DateTime<Utc>,
}

/// A product a company sells, with stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: String,
    /// Price in cents
    pub price: i64,
    /// Units in stock
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A service a company offers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: String,
    /// Price in cents
    pub price: i64,
    /// Expected duration, used by the booking capacity check
    pub expected_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookable time window belonging to a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Calendar day of the slot, normalized to the slot's start
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
}

impl AvailableSlot {
    /// Slot duration in whole minutes
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Situation {
    Pending,
    Confirmed,
    Canceled,
    Done,
}

impl Situation {
    /// Database representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Canceled => "CANCELED",
            Self::Done => "DONE",
        }
    }

    /// Parse from the database representation
    #[must_use]
    pub fn from_str_or_pending(s: &str) -> Self {
        match s {
            "CONFIRMED" => Self::Confirmed,
            "CANCELED" => Self::Canceled,
            "DONE" => Self::Done,
            _ => Self::Pending,
        }
    }
}

/// A client's reservation against one available slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub available_slot_id: Uuid,
    pub situation: Situation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product line item owned by a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingProduct {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    /// Discount in cents, if negotiated
    pub discount: Option<i64>,
}

/// Service line item owned by a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingService {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub service_id: Uuid,
}

/// A recorded sale, optionally tied to a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub booking_id: Option<Uuid>,
    /// Total in cents
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

/// Product line item owned by a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleProduct {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub discount: Option<i64>,
}
