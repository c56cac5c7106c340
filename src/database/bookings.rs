// ABOUTME: Booking and line-item storage with transactional create and cancel
// ABOUTME: Enforces one-active-booking-per-slot through the slot reference uniqueness constraint
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::{Booking, BookingProduct, BookingService, Situation};

impl Database {
    /// Create a booking with its line items and claim its slot, atomically.
    ///
    /// The booking row, every product and service line item, and the slot's
    /// booked flag are committed as one unit. A concurrent booking against
    /// the same slot loses with a uniqueness violation on the slot reference
    /// and rolls back the whole transaction.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure; callers can distinguish the
    /// slot-already-claimed case with [`super::is_unique_violation`]
    pub async fn create_booking(
        &self,
        booking: &Booking,
        products: &[BookingProduct],
        services: &[BookingService],
    ) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            INSERT INTO bookings (id, company_id, client_id, available_slot_id, situation, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(booking.id.to_string())
        .bind(booking.company_id.to_string())
        .bind(booking.client_id.to_string())
        .bind(booking.available_slot_id.to_string())
        .bind(booking.situation.as_str())
        .bind(booking.created_at.to_rfc3339())
        .bind(booking.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for item in products {
            sqlx::query(
                r"
                INSERT INTO booking_products (id, booking_id, product_id, quantity, discount)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(item.id.to_string())
            .bind(item.booking_id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .bind(item.discount)
            .execute(&mut *tx)
            .await?;
        }

        for item in services {
            sqlx::query(
                r"
                INSERT INTO booking_services (id, booking_id, service_id)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(item.id.to_string())
            .bind(item.booking_id.to_string())
            .bind(item.service_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE available_slots SET is_booked = 1 WHERE id = ?1")
            .bind(booking.available_slot_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Get booking by id
    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = ?1")
            .bind(booking_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_booking(&row)).transpose()
    }

    /// List a company's bookings
    pub async fn list_bookings(&self, company_id: Uuid) -> Result<Vec<Booking>> {
        let rows = sqlx::query("SELECT * FROM bookings WHERE company_id = ?1 ORDER BY created_at")
            .bind(company_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::row_to_booking).collect()
    }

    /// Delete a booking and release its slot, atomically.
    ///
    /// Line items are removed by the ON DELETE CASCADE rules. A failure on
    /// either step rolls back both, so a released slot without its booking
    /// removed (or the reverse) is never observable.
    pub async fn delete_booking(&self, booking: &Booking) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("UPDATE available_slots SET is_booked = 0 WHERE id = ?1")
            .bind(booking.available_slot_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(booking.id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// List a booking's product line items
    pub async fn get_booking_products(&self, booking_id: Uuid) -> Result<Vec<BookingProduct>> {
        let rows = sqlx::query("SELECT * FROM booking_products WHERE booking_id = ?1")
            .bind(booking_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter()
            .map(|row| {
                Ok(BookingProduct {
                    id: get_uuid(row, "id")?,
                    booking_id: get_uuid(row, "booking_id")?,
                    product_id: get_uuid(row, "product_id")?,
                    quantity: row.try_get("quantity")?,
                    discount: row.try_get("discount")?,
                })
            })
            .collect()
    }

    /// List a booking's service line items
    pub async fn get_booking_services(&self, booking_id: Uuid) -> Result<Vec<BookingService>> {
        let rows = sqlx::query("SELECT * FROM booking_services WHERE booking_id = ?1")
            .bind(booking_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter()
            .map(|row| {
                Ok(BookingService {
                    id: get_uuid(row, "id")?,
                    booking_id: get_uuid(row, "booking_id")?,
                    service_id: get_uuid(row, "service_id")?,
                })
            })
            .collect()
    }

    fn row_to_booking(row: &sqlx::sqlite::SqliteRow) -> Result<Booking> {
        let situation: String = row.try_get("situation")?;

        Ok(Booking {
            id: get_uuid(row, "id")?,
            company_id: get_uuid(row, "company_id")?,
            client_id: get_uuid(row, "client_id")?,
            available_slot_id: get_uuid(row, "available_slot_id")?,
            situation: Situation::from_str_or_pending(&situation),
            created_at: get_datetime(row, "created_at")?,
            updated_at: get_datetime(row, "updated_at")?,
        })
    }
}
