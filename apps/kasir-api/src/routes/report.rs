//! Sales report endpoints.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{NaiveDate, Utc};
use kasir_core::validation::parse_report_date;
use kasir_core::{Report, ReportWindow};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::AppState;

/// Inclusive day range; a missing bound means today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportQuery {
    pub fn window(&self, today: NaiveDate) -> ApiResult<ReportWindow> {
        let start = match &self.start_date {
            Some(raw) => parse_report_date("start_date", raw)?,
            None => today,
        };
        let end = match &self.end_date {
            Some(raw) => parse_report_date("end_date", raw)?,
            None => today,
        };
        Ok(ReportWindow::dates(start, end)?)
    }
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/report",
        Router::new()
            .route("/", get(range_report))
            .route("/today", get(today_report)),
    )
}

async fn today_report(State(state): State<AppState>) -> ApiResult<Json<Report>> {
    let report = state.db.reports().today_report(Utc::now()).await?;
    Ok(Json(report))
}

async fn range_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> ApiResult<Json<Report>> {
    let window = query.window(Utc::now().date_naive())?;
    let report = state.db.reports().get_report(&window).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{send, test_app};
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use kasir_core::{CheckoutItem, StockPolicy};
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_query_defaults_to_today() {
        let today = ymd(2026, 10, 14);
        let window = ReportQuery::default().window(today).unwrap();
        assert_eq!(window, ReportWindow::day(today).unwrap());

        let only_start = ReportQuery {
            start_date: Some("2026-10-01".into()),
            end_date: None,
        };
        assert_eq!(
            only_start.window(today).unwrap(),
            ReportWindow::dates(ymd(2026, 10, 1), today).unwrap()
        );
    }

    #[test]
    fn test_query_rejects_bad_dates() {
        let today = ymd(2026, 10, 14);
        let bad_format = ReportQuery {
            start_date: Some("14/10/2026".into()),
            end_date: None,
        };
        assert!(bad_format.window(today).is_err());

        let reversed = ReportQuery {
            start_date: Some("2026-10-14".into()),
            end_date: Some("2026-10-01".into()),
        };
        assert!(reversed.window(today).is_err());
    }

    #[tokio::test]
    async fn test_today_report_empty() {
        let (app, _db) = test_app(StockPolicy::AllowNegative).await;
        let (status, body) = send(&app, "GET", "/api/report/today", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "total_revenue": 0,
                "total_transactions": 0,
                "best_selling": {"name": "-", "qty_sold": 0}
            })
        );
    }

    #[tokio::test]
    async fn test_today_report_after_checkout() {
        let (app, _db) = test_app(StockPolicy::AllowNegative).await;
        send(
            &app,
            "POST",
            "/api/checkout",
            Some(json!({"items": [{"product_id": 3, "quantity": 4}]})),
        )
        .await;

        let (status, body) = send(&app, "GET", "/api/report/today", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_revenue"], 12_000);
        assert_eq!(body["total_transactions"], 1);
        assert_eq!(body["best_selling"], json!({"name": "es teh", "qty_sold": 4}));
    }

    #[tokio::test]
    async fn test_range_report() {
        let (app, db) = test_app(StockPolicy::AllowNegative).await;
        let sale_day = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        db.transactions()
            .checkout_at(&[CheckoutItem::new(1, 1)], sale_day)
            .await
            .unwrap();

        let (status, body) = send(
            &app,
            "GET",
            "/api/report?start_date=2026-01-01&end_date=2026-01-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_revenue"], 15_000);

        let (status, body) = send(
            &app,
            "GET",
            "/api/report?start_date=2026-01-16&end_date=2026-01-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_transactions"], 0);

        let (status, body) = send(&app, "GET", "/api/report?start_date=yesterday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
