//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.transactions().checkout(&items)                            │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │       │                                                                 │
//! │       │  opens                                                          │
//! │       ▼                                                                 │
//! │  CheckoutScope (one SQLite transaction)                                │
//! │  ├── lookup_product / decrement_stock   × N lines                      │
//! │  ├── insert_transaction_header                                         │
//! │  ├── bulk_insert_details                                               │
//! │  └── commit   (drop without commit = rollback)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and stock
//! - [`TransactionRepository`](transaction::TransactionRepository) - Checkout
//! - [`ReportRepository`](report::ReportRepository) - Sales aggregation
//! - [`CheckoutScope`](scope::CheckoutScope) - The atomic write scope under checkout

pub mod product;
pub mod report;
pub mod scope;
pub mod transaction;
