// ABOUTME: Availability generation and the booking workflow
// ABOUTME: Groups the slot generator and the transactional booking coordinator
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Scheduling
//!
//! The availability-and-booking workflow: [`generator`] turns a recurring
//! weekly pattern into concrete bookable slots, [`coordinator`] validates
//! booking requests and commits them atomically against the slot store.

/// Transactional booking creation and cancellation
pub mod coordinator;

/// Pure slot generation from a weekly availability pattern
pub mod generator;

pub use coordinator::{BookingCoordinator, BookingRequest, ProductLine};
pub use generator::{generate_slots, GenerationParams};
