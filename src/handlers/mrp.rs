use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::aggregator::{self, status_bucket, StatusBucket};
use crate::errors::ApiError;
use crate::models::SoResult;

use super::common::success_response;
use super::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard))
        .route("/summary", get(customer_summary))
        .route("/buyer-view", get(buyer_view))
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub bu: Option<String>,
    pub customer: Option<String>,
    pub fg: Option<String>,
    /// "MM/YYYY" or "Blank" (SOs with no due_ship).
    pub due_ship: Option<String>,
    /// One of "ready-to-ship", "production-needed", "action-required", or absent/"".
    pub status: Option<String>,
}

/// `GET /mrp` — full dashboard snapshot.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<axum::response::Response, ApiError> {
    let run = state.cache.get_or_run(&state.engine).await?;

    let mut orders: Vec<SoResult> = run.results.clone();

    if let Some(bu) = params.bu.as_deref().filter(|s| !s.is_empty()) {
        orders.retain(|o| o.business_unit == bu);
    }
    if let Some(customer) = params.customer.as_deref().filter(|s| !s.is_empty()) {
        orders.retain(|o| o.customer == customer);
    }
    if let Some(fg) = params.fg.as_deref().filter(|s| !s.is_empty()) {
        orders.retain(|o| o.part_number == fg);
    }
    if let Some(due_ship) = params.due_ship.as_deref().filter(|s| !s.is_empty()) {
        let predicate = parse_due_ship_filter(due_ship)?;
        orders.retain(|o| predicate(o.due_ship));
    }
    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        let bucket = parse_status_bucket(status)?;
        orders.retain(|o| status_bucket(o.status) == bucket);
    }

    let view = aggregator::dashboard_view(&orders);
    Ok(success_response(view))
}

/// Returns a predicate over `due_ship` matching the query param's "MM/YYYY"
/// or "Blank" form.
fn parse_due_ship_filter(raw: &str) -> Result<Box<dyn Fn(Option<NaiveDate>) -> bool>, ApiError> {
    if raw.eq_ignore_ascii_case("blank") {
        return Ok(Box::new(|due: Option<NaiveDate>| due.is_none()));
    }

    let (month_str, year_str) = raw.split_once('/').ok_or_else(|| {
        ApiError::BadRequest(format!("due_ship must be MM/YYYY or 'Blank', got '{raw}'"))
    })?;
    let month: u32 = month_str
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid month in due_ship '{raw}'")))?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid year in due_ship '{raw}'")))?;
    if !(1..=12).contains(&month) {
        return Err(ApiError::BadRequest(format!("month out of range in due_ship '{raw}'")));
    }

    Ok(Box::new(move |due: Option<NaiveDate>| {
        due.map(|d| d.month() == month && d.year() == year).unwrap_or(false)
    }))
}

fn parse_status_bucket(raw: &str) -> Result<StatusBucket, ApiError> {
    match raw {
        "ready-to-ship" => Ok(StatusBucket::ReadyToShip),
        "production-needed" => Ok(StatusBucket::ProductionNeeded),
        "action-required" => Ok(StatusBucket::ActionRequired),
        other => Err(ApiError::BadRequest(format!("unknown status bucket '{other}'"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerSummaryParams {
    pub customer: String,
}

/// `GET /mrp/summary?customer=…`.
async fn customer_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CustomerSummaryParams>,
) -> Result<axum::response::Response, ApiError> {
    if params.customer.trim().is_empty() {
        return Err(ApiError::BadRequest("customer is required".to_string()));
    }
    let run = state.cache.get_or_run(&state.engine).await?;
    let summary = aggregator::customer_summary(&run.results, &params.customer);
    Ok(success_response(summary))
}

#[derive(Debug, Deserialize)]
pub struct BuyerViewParams {
    /// "all" or an integer number of days.
    #[serde(default)]
    pub urgency_days: Option<String>,
    pub customer: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Urgency {
    All,
    WithinDays(i64),
}

fn parse_urgency(raw: Option<&str>) -> Result<Urgency, ApiError> {
    match raw {
        None => Ok(Urgency::All),
        Some(s) if s.eq_ignore_ascii_case("all") || s.is_empty() => Ok(Urgency::All),
        Some(s) => s
            .parse::<i64>()
            .map(Urgency::WithinDays)
            .map_err(|_| ApiError::BadRequest(format!("invalid urgency_days '{s}'"))),
    }
}

/// `GET /mrp/buyer-view?urgency_days=N&customer=&q=` — purchasing shortage
/// report, sorted by earliest due_ship then component part.
async fn buyer_view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BuyerViewParams>,
) -> Result<axum::response::Response, ApiError> {
    let urgency = parse_urgency(params.urgency_days.as_deref())?;
    let run = state.cache.get_or_run(&state.engine).await?;

    let filtered_results: Vec<SoResult> = match params.customer.as_deref().filter(|s| !s.is_empty()) {
        Some(customer) => run.results.iter().filter(|r| r.customer == customer).cloned().collect(),
        None => run.results.clone(),
    };

    let mut report = aggregator::purchasing_shortage_report(
        &filtered_results,
        &run.approved_snapshot,
        &run.open_po_snapshot,
    );

    if let Some(q) = params.q.as_deref().filter(|s| !s.is_empty()) {
        let needle = q.to_ascii_lowercase();
        report.retain(|entry| entry.component_part.to_ascii_lowercase().contains(&needle));
    }

    if let Urgency::WithinDays(days) = urgency {
        let today = Utc::now().date_naive();
        report.retain(|entry| match entry.earliest_due_ship {
            Some(due) => (due - today).num_days() <= days,
            None => false,
        });
    }

    Ok(success_response(report))
}
