//! # Transaction Repository
//!
//! Runs checkouts: validates the request, then drives a [`CheckoutScope`]
//! line by line and commits header plus details together.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(items)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_checkout_items ──✗──► Rejected (nothing opened)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutScope::begin          (write lock held from here)             │
//! │       │                                                                 │
//! │       ▼  for each line, in request order                                │
//! │  lookup_product ──✗ missing──► Rejected(ProductNotFound)  ─┐           │
//! │  ledger.record  ──✗ stock / overflow──► Rejected          ─┤ rollback  │
//! │  decrement_stock ──✗──► Storage                           ─┘           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert_transaction_header(total) → id                                 │
//! │  bulk_insert_details(lines stamped with id)                            │
//! │  commit                                                                 │
//! │                                                                         │
//! │  Whole flow bounded by checkout_timeout → Storage(TimedOut)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product listed on several lines is decremented once per line, and each
//! later line reads the stock left by the earlier ones.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::{CheckoutError, DbError};
use crate::repository::scope::CheckoutScope;
use crate::timestamp;
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, CheckoutLedger, CoreError, StockPolicy, Transaction, TransactionDetail};

/// Knobs applied to every checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub timeout: Duration,
    pub stock_policy: StockPolicy,
}

/// Repository for checkouts.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    settings: CheckoutSettings,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool, settings: CheckoutSettings) -> Self {
        TransactionRepository { pool, settings }
    }

    /// Checks out `items` stamped with the current time.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> Result<Transaction, CheckoutError> {
        self.checkout_at(items, Utc::now()).await
    }

    /// Checks out `items` stamped with `created_at`.
    ///
    /// ## Returns
    /// The committed transaction, its details in request order.
    ///
    /// ## Errors
    /// - `CheckoutError::Rejected` for empty/invalid requests, unknown
    ///   products, insufficient stock or amount overflow
    /// - `CheckoutError::Storage` for database failures and the deadline
    ///
    /// On any error nothing is written.
    pub async fn checkout_at(
        &self,
        items: &[CheckoutItem],
        created_at: DateTime<Utc>,
    ) -> Result<Transaction, CheckoutError> {
        validate_checkout_items(items)?;

        let created_at = timestamp::truncate(created_at);
        debug!(lines = items.len(), "Starting checkout");

        let outcome = tokio::time::timeout(self.settings.timeout, self.run(items, created_at))
            .await
            .unwrap_or_else(|_| {
                Err(DbError::TimedOut(format!(
                    "checkout exceeded {:?}",
                    self.settings.timeout
                ))
                .into())
            });

        match &outcome {
            Ok(transaction) => info!(
                transaction_id = transaction.id,
                total_amount = transaction.total_amount,
                lines = transaction.details.len(),
                "Checkout committed"
            ),
            Err(CheckoutError::Rejected(reason)) => warn!(%reason, "Checkout rejected"),
            Err(CheckoutError::Storage(err)) => error!(error = %err, "Checkout failed"),
        }

        outcome
    }

    async fn run(
        &self,
        items: &[CheckoutItem],
        created_at: DateTime<Utc>,
    ) -> Result<Transaction, CheckoutError> {
        let mut scope = CheckoutScope::begin(&self.pool).await?;
        let mut ledger = CheckoutLedger::with_capacity(self.settings.stock_policy, items.len());

        for item in items {
            let snapshot = scope
                .lookup_product(item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound {
                    product_id: item.product_id,
                })?;

            ledger.record(item, &snapshot)?;
            scope.decrement_stock(item.product_id, item.quantity).await?;
        }

        let (total, drafts) = ledger.into_parts();
        let id = scope
            .insert_transaction_header(total.units(), created_at)
            .await?;

        let details: Vec<TransactionDetail> =
            drafts.into_iter().map(|draft| draft.into_detail(id)).collect();
        scope.bulk_insert_details(&details).await?;
        scope.commit().await?;

        Ok(Transaction {
            id,
            total_amount: total.units(),
            created_at,
            details,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
