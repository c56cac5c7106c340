// ABOUTME: Sale recording with transactional line-item copies
// ABOUTME: Persists sales and copies booking product items into the sale
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, get_uuid_opt, Database};
use crate::models::{Sale, SaleProduct};

impl Database {
    /// Record a sale with its product line items, atomically.
    ///
    /// When the sale references a booking, that booking's product line items
    /// are copied into the sale inside the same transaction, so the sale
    /// reflects what the booking reserved even if the booking is later
    /// deleted.
    pub async fn create_sale(&self, sale: &Sale, products: &[SaleProduct]) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            INSERT INTO sales (id, company_id, client_id, booking_id, total, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(sale.id.to_string())
        .bind(sale.company_id.to_string())
        .bind(sale.client_id.to_string())
        .bind(sale.booking_id.map(|id| id.to_string()))
        .bind(sale.total)
        .bind(sale.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for item in products {
            sqlx::query(
                r"
                INSERT INTO sale_products (id, sale_id, product_id, quantity, discount)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(item.id.to_string())
            .bind(item.sale_id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .bind(item.discount)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(booking_id) = sale.booking_id {
            let rows = sqlx::query("SELECT * FROM booking_products WHERE booking_id = ?1")
                .bind(booking_id.to_string())
                .fetch_all(&mut *tx)
                .await?;

            for row in rows {
                let product_id: String = row.try_get("product_id")?;
                let quantity: i64 = row.try_get("quantity")?;
                let discount: Option<i64> = row.try_get("discount")?;

                sqlx::query(
                    r"
                    INSERT INTO sale_products (id, sale_id, product_id, quantity, discount)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(sale.id.to_string())
                .bind(product_id)
                .bind(quantity)
                .bind(discount)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Value of a booking's reserved products at current prices, in cents.
    ///
    /// This is what the line items copied by [`Self::create_sale`] are worth,
    /// so callers can fold it into the sale total before recording.
    pub async fn booking_products_value(&self, booking_id: Uuid) -> Result<i64> {
        let rows = sqlx::query(
            r"
            SELECT bp.quantity, bp.discount, p.price
            FROM booking_products bp
            JOIN products p ON p.id = bp.product_id
            WHERE bp.booking_id = ?1
            ",
        )
        .bind(booking_id.to_string())
        .fetch_all(self.pool())
        .await?;

        let mut total = 0i64;
        for row in rows {
            let quantity: i64 = row.try_get("quantity")?;
            let discount: Option<i64> = row.try_get("discount")?;
            let price: i64 = row.try_get("price")?;
            total += price * quantity - discount.unwrap_or(0);
        }

        Ok(total)
    }

    /// Get sale by id
    pub async fn get_sale(&self, sale_id: Uuid) -> Result<Option<Sale>> {
        let row = sqlx::query("SELECT * FROM sales WHERE id = ?1")
            .bind(sale_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_sale(&row)).transpose()
    }

    /// List a company's sales
    pub async fn list_sales(&self, company_id: Uuid) -> Result<Vec<Sale>> {
        let rows = sqlx::query("SELECT * FROM sales WHERE company_id = ?1 ORDER BY created_at")
            .bind(company_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::row_to_sale).collect()
    }

    /// List a sale's product line items
    pub async fn get_sale_products(&self, sale_id: Uuid) -> Result<Vec<SaleProduct>> {
        let rows = sqlx::query("SELECT * FROM sale_products WHERE sale_id = ?1")
            .bind(sale_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter()
            .map(|row| {
                Ok(SaleProduct {
                    id: get_uuid(row, "id")?,
                    sale_id: get_uuid(row, "sale_id")?,
                    product_id: get_uuid(row, "product_id")?,
                    quantity: row.try_get("quantity")?,
                    discount: row.try_get("discount")?,
                })
            })
            .collect()
    }

    fn row_to_sale(row: &sqlx::sqlite::SqliteRow) -> Result<Sale> {
        Ok(Sale {
            id: get_uuid(row, "id")?,
            company_id: get_uuid(row, "company_id")?,
            client_id: get_uuid(row, "client_id")?,
            booking_id: get_uuid_opt(row, "booking_id")?,
            total: row.try_get("total")?,
            created_at: get_datetime(row, "created_at")?,
        })
    }
}
