// ABOUTME: Main library entry point for the Agendly scheduling platform
// ABOUTME: Provides the REST API, booking workflow, and multi-tenant data access
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Agendly Server
//!
//! A multi-tenant scheduling and commerce backend: companies define services,
//! products and bookable time slots; clients book slots; sales are recorded.
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Models**: Common data structures for tenants, slots and bookings
//! - **Database**: SQLite-backed storage with per-entity query modules
//! - **Scheduling**: Slot generation and the transactional booking workflow
//! - **Routes**: Thin axum handlers over the scheduling and storage layers
//! - **Config**: Environment-based configuration management

/// Authentication and token management
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Multi-tenant database management
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Common data models for tenants, slots, bookings and sales
pub mod models;

/// `HTTP` routes for authentication, tenant CRUD and the booking workflow
pub mod routes;

/// Availability generation and the booking coordinator
pub mod scheduling;

/// Server resource wiring and the serve loop
pub mod server;
