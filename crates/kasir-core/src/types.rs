//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │  Transaction    │   │  TransactionDetail  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  transaction_id(FK) │   │
//! │  │  name           │   │  total_amount   │◄──│  product_id         │   │
//! │  │  price          │   │  created_at     │   │  product_name (snap)│   │
//! │  │  stock          │   │  details        │   │  quantity, subtotal │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  CheckoutItem   │   │     Report      │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  product_id     │   │  total_revenue  │                             │
//! │  │  quantity       │   │  total_txns     │                             │
//! │  └─────────────────┘   │  best_selling   │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All monetary fields are integers in the smallest currency unit; see
//! [`Money`](crate::money::Money) for arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::NO_SALES_SENTINEL;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Storage-generated identifier.
    pub id: i64,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit price in smallest currency units.
    pub price: i64,

    /// Current stock level. Can be negative under the permissive stock policy.
    pub stock: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_units(self.price)
    }
}

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
}

/// The slice of a product row a checkout needs, read inside the checkout scope.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSnapshot {
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

/// A detail row before its transaction header exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailDraft {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub subtotal: i64,
}

impl DetailDraft {
    /// Stamps the draft with the generated transaction id.
    pub fn into_detail(self, transaction_id: i64) -> TransactionDetail {
        TransactionDetail {
            transaction_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            subtotal: self.subtotal,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A line of a committed transaction.
/// Uses snapshot pattern to freeze the product name and price at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// unit price × quantity at time of sale.
    pub subtotal: i64,
}

/// A committed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Always equal to the sum of `details[..].subtotal`.
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Recomputes the total from the details.
    pub fn details_total(&self) -> Money {
        self.details.iter().map(|d| Money::from_units(d.subtotal)).sum()
    }
}

// =============================================================================
// Report
// =============================================================================

/// Best-selling product of a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BestSelling {
    pub name: String,
    pub qty_sold: i64,
}

impl BestSelling {
    /// Placeholder used when nothing was sold in the window.
    pub fn none_sold() -> Self {
        BestSelling {
            name: NO_SALES_SENTINEL.to_string(),
            qty_sold: 0,
        }
    }

    pub fn is_none_sold(&self) -> bool {
        self.qty_sold == 0 && self.name == NO_SALES_SENTINEL
    }
}

/// Sales summary over a half-open time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total_revenue: i64,
    pub total_transactions: i64,
    pub best_selling: BestSelling,
}

impl Report {
    /// A report for a window with no transactions.
    pub fn empty() -> Self {
        Report {
            total_revenue: 0,
            total_transactions: 0,
            best_selling: BestSelling::none_sold(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
