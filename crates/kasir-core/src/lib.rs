//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate holds the checkout and reporting rules as pure functions with
//! zero I/O dependencies. The database layer (`kasir-db`) drives these rules
//! inside its storage transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (kasir-api)                         │   │
//! │  │    /api/products ──► /api/checkout ──► /api/report              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ Checkout  │  │   rules   │  │   │
//! │  │   │  Report   │  │           │  │  Ledger   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, checkout scope, reports      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, Report, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Running totals and line snapshots for one checkout
//! - [`window`] - Half-open report windows
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_units(15_000);
//! let subtotal = price.checked_multiply_quantity(2).unwrap();
//! assert_eq!(subtotal.units(), 30_000);
//! assert_eq!(subtotal.to_string(), "Rp30.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;
pub mod window;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{CheckoutLedger, StockPolicy};
pub use money::Money;
pub use types::*;
pub use window::ReportWindow;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single checkout.
///
/// Keeps the bulk detail insert well inside SQLite's bound-parameter limit.
pub const MAX_CHECKOUT_ITEMS: usize = 100;

/// Maximum quantity of a single line.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Name reported as best seller when nothing was sold in the window.
pub const NO_SALES_SENTINEL: &str = "-";
