// ABOUTME: Product catalog storage queries
// ABOUTME: CRUD for a company's sellable products and stock
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::{get_datetime, get_uuid, Database};
use crate::models::Product;

impl Database {
    /// Insert a new product
    pub async fn create_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO products (id, company_id, name, description, price, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(product.id.to_string())
        .bind(product.company_id.to_string())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.created_at.to_rfc3339())
        .bind(product.updated_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get product by id
    pub async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?1")
            .bind(product_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_product(&row)).transpose()
    }

    /// List a company's products
    pub async fn list_products(&self, company_id: Uuid) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products WHERE company_id = ?1 ORDER BY name")
            .bind(company_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::row_to_product).collect()
    }

    /// Update a product, refreshing its `updated_at`
    pub async fn update_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r"
            UPDATE products
            SET name = ?2, description = ?3, price = ?4, quantity = ?5, updated_at = ?6
            WHERE id = ?1
            ",
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete a product
    pub async fn delete_product(&self, product_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(product_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product> {
        Ok(Product {
            id: get_uuid(row, "id")?,
            company_id: get_uuid(row, "company_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            created_at: get_datetime(row, "created_at")?,
            updated_at: get_datetime(row, "updated_at")?,
        })
    }
}
