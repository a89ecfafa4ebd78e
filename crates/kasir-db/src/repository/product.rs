//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations (list, get, insert, update, delete)
//! - Stock adjustments outside of checkout
//!
//! Payloads are validated by the caller (`kasir_core::validation`); the table's
//! CHECK constraints are the last line.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::timestamp;
use kasir_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product in id order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its generated id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        let name = product.name.trim();
        debug!(name = %name, "Inserting product");

        let now = timestamp::encode(Utc::now());

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(product.price)
        .bind(product.stock)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(Product {
            id,
            name: name.to_string(),
            price: product.price,
            stock: product.stock,
        })
    }

    /// Replaces name, price and stock of an existing product.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no product has this id.
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        let name = product.name.trim();
        debug!(id = id, name = %name, "Updating product");

        let now = timestamp::encode(Utc::now());

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, price = ?3, stock = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(product.price)
        .bind(product.stock)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(Product {
            id,
            name: name.to_string(),
            price: product.price,
            stock: product.stock,
        })
    }

    /// Deletes a product.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if no product has this id
    /// - `DbError::ForeignKeyViolation` if sales history references it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Updates stock level by a delta amount.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Amount to add (positive) or remove (negative)
    pub async fn update_stock(&self, id: i64, delta: i64) -> DbResult<()> {
        debug!(id = id, delta = delta, "Updating stock");

        let now = timestamp::encode(Utc::now());

        let result = sqlx::query(
            "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(delta)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{memory_db, seed_menu};
    use kasir_core::{CheckoutItem, StockPolicy};

    fn es_jeruk() -> NewProduct {
        NewProduct {
            name: "  es jeruk ".to_string(),
            price: 4_000,
            stock: 50,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_trims_name() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        let menu = seed_menu(&db).await;
        assert_eq!(menu.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let created = db.products().insert(&es_jeruk()).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.name, "es jeruk");

        let fetched = db.products().get_by_id(4).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(db.products().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        let names: Vec<String> = db
            .products()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["bebek bumbu hitam", "ayam bumbu hitam", "es teh"]);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        assert!(db.products().get_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        let updated = db.products().update(3, &es_jeruk()).await.unwrap();
        assert_eq!(updated.name, "es jeruk");
        assert_eq!(db.products().get_by_id(3).await.unwrap(), Some(updated));

        let err = db.products().update(99, &es_jeruk()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        db.products().delete(2).await.unwrap();
        assert!(db.products().get_by_id(2).await.unwrap().is_none());

        let err = db.products().delete(2).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_sold_product_is_refused() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;
        db.transactions()
            .checkout(&[CheckoutItem::new(1, 1)])
            .await
            .unwrap();

        let err = db.products().delete(1).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.products().get_by_id(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_stock_delta() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        db.products().update_stock(3, -20).await.unwrap();
        db.products().update_stock(3, 5).await.unwrap();
        assert_eq!(db.products().get_by_id(3).await.unwrap().unwrap().stock, 105);

        assert!(db.products().update_stock(42, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_negative_price_hits_check_constraint() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        let bad = NewProduct {
            price: -1,
            ..es_jeruk()
        };
        assert!(db.products().insert(&bad).await.is_err());
    }
}
