//! # Checkout Scope
//!
//! One SQLite transaction holding the write lock for the duration of a
//! checkout. Every statement of the checkout runs on the scope's connection.
//!
//! ```text
//! begin() ──► claim write lock ──► lookup / decrement ... ──► header ──► details ──► commit()
//!                                           │
//!                                           └── error / drop / timeout ──► rollback
//! ```
//!
//! A scope dropped without [`CheckoutScope::commit`] is rolled back by sqlx,
//! so an early `?` return or a cancelled future leaves no partial writes.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::timestamp;
use kasir_core::{ProductSnapshot, TransactionDetail};

/// An open checkout transaction.
pub struct CheckoutScope {
    tx: sqlx::Transaction<'static, Sqlite>,
}

impl CheckoutScope {
    pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // A deferred transaction that reads first cannot always upgrade to a
        // writer. Taking the write lock up front makes concurrent checkouts
        // queue on the busy timeout instead.
        sqlx::query("UPDATE products SET stock = stock WHERE 0")
            .execute(&mut *tx)
            .await?;

        debug!("Checkout scope opened");
        Ok(CheckoutScope { tx })
    }

    /// Reads name, price and stock of a product, seeing this scope's own writes.
    pub async fn lookup_product(&mut self, product_id: i64) -> DbResult<Option<ProductSnapshot>> {
        let snapshot = sqlx::query_as::<_, ProductSnapshot>(
            "SELECT name, price, stock FROM products WHERE id = ?1",
        )
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(snapshot)
    }

    /// Subtracts `quantity` from the product's stock. No floor is applied here.
    pub async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET stock = stock - ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        Ok(())
    }

    /// Writes the transaction row and returns its generated id.
    pub async fn insert_transaction_header(
        &mut self,
        total_amount: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (total_amount, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(total_amount)
        .bind(timestamp::encode(created_at))
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    /// Writes all detail rows in a single multi-row INSERT.
    pub async fn bulk_insert_details(&mut self, details: &[TransactionDetail]) -> DbResult<()> {
        if details.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO transaction_details (transaction_id, product_id, product_name, quantity, subtotal) ",
        );
        builder.push_values(details, |mut row, detail| {
            row.push_bind(detail.transaction_id)
                .push_bind(detail.product_id)
                .push_bind(detail.product_name.clone())
                .push_bind(detail.quantity)
                .push_bind(detail.subtotal);
        });

        let result = builder.build().execute(&mut *self.tx).await?;
        debug!(rows = result.rows_affected(), "Inserted transaction details");
        Ok(())
    }

    /// Makes every write of this scope visible at once.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    /// Discards every write of this scope.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

impl std::fmt::Debug for CheckoutScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutScope").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
