//! HTTP routes.
//!
//! ```text
//! GET    /health
//! GET    /api/products          POST /api/products
//! GET    /api/products/{id}     PUT  /api/products/{id}    DELETE /api/products/{id}
//! POST   /api/checkout
//! GET    /api/report/today
//! GET    /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
//! ```

pub mod checkout;
pub mod health;
pub mod products;
pub mod report;
