//! # Report Repository
//!
//! Sales aggregation over a [`ReportWindow`].
//!
//! ```text
//! transactions (created_at in [start, end))
//!   ├── SUM(total_amount), COUNT(id)           → total_revenue, total_transactions
//!   └── transaction_details
//!         GROUP BY product_id
//!         ORDER BY SUM(quantity) DESC, product_id ASC
//!         LIMIT 1                              → best_selling (or "-" / 0)
//! ```
//!
//! [`ReportRepository::get_report`] runs both queries on one read
//! transaction so the three figures describe the same committed state.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::timestamp;
use kasir_core::{BestSelling, Report, ReportWindow};

/// Repository for sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Revenue and transaction count inside `window`.
    pub async fn sum_revenue_and_count(&self, window: &ReportWindow) -> DbResult<(i64, i64)> {
        let mut conn = self.pool.acquire().await?;
        revenue_and_count(&mut conn, window).await
    }

    /// The product with the most units sold inside `window`.
    ///
    /// Ties go to the lower product id. Returns [`BestSelling::none_sold`]
    /// when the window holds no sales.
    pub async fn best_selling_product(&self, window: &ReportWindow) -> DbResult<BestSelling> {
        let mut conn = self.pool.acquire().await?;
        best_selling(&mut conn, window).await
    }

    /// Full report for `window`.
    pub async fn get_report(&self, window: &ReportWindow) -> DbResult<Report> {
        debug!(start = %window.start(), end = %window.end(), "Building report");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let (total_revenue, total_transactions) = revenue_and_count(&mut tx, window).await?;
        let best_selling = best_selling(&mut tx, window).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Report {
            total_revenue,
            total_transactions,
            best_selling,
        })
    }

    /// Report for the UTC day containing `now`.
    pub async fn today_report(&self, now: DateTime<Utc>) -> DbResult<Report> {
        let window = ReportWindow::today(now).map_err(|e| DbError::Internal(e.to_string()))?;
        self.get_report(&window).await
    }
}

async fn revenue_and_count(conn: &mut SqliteConnection, window: &ReportWindow) -> DbResult<(i64, i64)> {
    let totals: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_amount), 0), COUNT(id)
        FROM transactions
        WHERE created_at >= ?1 AND created_at < ?2
        "#,
    )
    .bind(timestamp::encode(window.start()))
    .bind(timestamp::encode(window.end()))
    .fetch_one(conn)
    .await?;

    Ok(totals)
}

async fn best_selling(conn: &mut SqliteConnection, window: &ReportWindow) -> DbResult<BestSelling> {
    // Deleted products keep their sales under the name recorded at sale time
    let best = sqlx::query_as::<_, BestSelling>(
        r#"
        SELECT COALESCE(p.name, MAX(td.product_name)) AS name,
               SUM(td.quantity) AS qty_sold
        FROM transaction_details td
        JOIN transactions t ON t.id = td.transaction_id
        LEFT JOIN products p ON p.id = td.product_id
        WHERE t.created_at >= ?1 AND t.created_at < ?2
        GROUP BY td.product_id
        ORDER BY qty_sold DESC, td.product_id ASC
        LIMIT 1
        "#,
    )
    .bind(timestamp::encode(window.start()))
    .bind(timestamp::encode(window.end()))
    .fetch_optional(conn)
    .await?;

    Ok(best.unwrap_or_else(BestSelling::none_sold))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{memory_db, seed_menu};
    use crate::Database;
    use chrono::{NaiveDate, TimeZone};
    use kasir_core::{CheckoutItem, StockPolicy};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> ReportWindow {
        ReportWindow::day(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    async fn sell(db: &Database, items: &[CheckoutItem], when: DateTime<Utc>) {
        db.transactions().checkout_at(items, when).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_window_report() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        let report = db.reports().get_report(&day(2026, 10, 14)).await.unwrap();
        assert_eq!(report, Report::empty());
        assert_eq!(report.best_selling.name, "-");
    }

    #[tokio::test]
    async fn test_report_totals_and_best_seller() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        sell(&db, &[CheckoutItem::new(1, 2)], at(2026, 10, 14, 9)).await;
        sell(&db, &[CheckoutItem::new(3, 3), CheckoutItem::new(1, 1)], at(2026, 10, 14, 12)).await;
        sell(&db, &[CheckoutItem::new(3, 2)], at(2026, 10, 14, 18)).await;

        let report = db.reports().get_report(&day(2026, 10, 14)).await.unwrap();
        assert_eq!(report.total_transactions, 3);
        assert_eq!(report.total_revenue, 30_000 + 24_000 + 6_000);
        assert_eq!(report.best_selling.name, "es teh");
        assert_eq!(report.best_selling.qty_sold, 5);
    }

    #[tokio::test]
    async fn test_quantities_summed_across_transactions() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        sell(&db, &[CheckoutItem::new(2, 3)], at(2026, 10, 14, 9)).await;
        sell(&db, &[CheckoutItem::new(2, 5), CheckoutItem::new(1, 1)], at(2026, 10, 14, 10)).await;

        let window = day(2026, 10, 14);
        let report = db.reports().get_report(&window).await.unwrap();
        assert_eq!(report.best_selling.name, "ayam bumbu hitam");
        assert_eq!(report.best_selling.qty_sold, 8);
        assert_eq!(report.total_revenue, 36_000 + 75_000);

        // Reading twice changes nothing
        assert_eq!(db.reports().get_report(&window).await.unwrap(), report);
    }

    #[tokio::test]
    async fn test_window_bounds_are_half_open() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        let midnight = at(2026, 10, 15, 0);
        sell(&db, &[CheckoutItem::new(2, 1)], midnight - chrono::Duration::microseconds(1)).await;
        sell(&db, &[CheckoutItem::new(2, 1)], midnight).await;

        let (revenue, count) = db
            .reports()
            .sum_revenue_and_count(&day(2026, 10, 14))
            .await
            .unwrap();
        assert_eq!((revenue, count), (12_000, 1));

        let (_, next) = db
            .reports()
            .sum_revenue_and_count(&day(2026, 10, 15))
            .await
            .unwrap();
        assert_eq!(next, 1);
    }

    #[tokio::test]
    async fn test_best_seller_tie_goes_to_lower_id() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        sell(&db, &[CheckoutItem::new(3, 4)], at(2026, 10, 14, 9)).await;
        sell(&db, &[CheckoutItem::new(2, 4)], at(2026, 10, 14, 10)).await;

        let best = db
            .reports()
            .best_selling_product(&day(2026, 10, 14))
            .await
            .unwrap();
        assert_eq!(best.name, "ayam bumbu hitam");
        assert_eq!(best.qty_sold, 4);
    }

    #[tokio::test]
    async fn test_best_seller_uses_current_name() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        sell(&db, &[CheckoutItem::new(3, 1)], at(2026, 10, 14, 9)).await;
        db.products()
            .update(
                3,
                &kasir_core::NewProduct {
                    name: "es teh manis".to_string(),
                    price: 3_000,
                    stock: 100,
                },
            )
            .await
            .unwrap();

        let best = db
            .reports()
            .best_selling_product(&day(2026, 10, 14))
            .await
            .unwrap();
        assert_eq!(best.name, "es teh manis");
    }

    #[tokio::test]
    async fn test_multi_day_range() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        sell(&db, &[CheckoutItem::new(1, 1)], at(2026, 1, 1, 8)).await;
        sell(&db, &[CheckoutItem::new(1, 1)], at(2026, 1, 31, 23)).await;
        sell(&db, &[CheckoutItem::new(1, 1)], at(2026, 2, 1, 0)).await;

        let january = ReportWindow::dates(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap();
        let report = db.reports().get_report(&january).await.unwrap();
        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.total_revenue, 30_000);
    }

    #[tokio::test]
    async fn test_today_report() {
        let db = memory_db(StockPolicy::AllowNegative).await;
        seed_menu(&db).await;

        let now = at(2026, 10, 14, 15);
        sell(&db, &[CheckoutItem::new(3, 2)], at(2026, 10, 14, 1)).await;
        sell(&db, &[CheckoutItem::new(3, 2)], at(2026, 10, 13, 23)).await;

        let report = db.reports().today_report(now).await.unwrap();
        assert_eq!(report.total_transactions, 1);
        assert_eq!(report.total_revenue, 6_000);
    }
}
