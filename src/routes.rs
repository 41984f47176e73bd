//! API route handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use sales_forecast::{ForecastRow, ModelStatus};
use sales_ledger::{InsertOutcome, MonthBatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use water_quality::SiteReport;

/// Longest forecast horizon a request may ask for
pub const MAX_HORIZON_DAYS: usize = 3650;

fn check_horizon(days: usize) -> Result<usize, ApiError> {
    if days > MAX_HORIZON_DAYS {
        return Err(ApiError::Validation(format!(
            "Horizon of {} days exceeds the limit of {}",
            days, MAX_HORIZON_DAYS
        )));
    }
    Ok(days)
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub days: usize,
}

#[derive(Debug, Deserialize)]
pub struct SalesInsertRequest {
    pub branch: i64,
    pub date: String,
    pub sales: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MonthDataRequest {
    pub today: Option<String>,
    pub data: Option<Vec<i64>>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MonthDataResponse {
    pub message: String,
    pub code: u16,
    pub data: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WaterParams {
    pub site_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: ModelStatus,
}

/// Liveness probe with the forecast model state
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
        model: state.model.status(),
    })
}

/// `GET /predictAll?days=N`
pub async fn predict_all(
    State(state): State<AppState>,
    params: Result<Query<PredictParams>, QueryRejection>,
) -> Result<Json<Vec<ForecastRow>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let rows = state.model.predict(check_horizon(params.days)?)?;
    Ok(Json(rows))
}

/// `POST /sales/insert`
pub async fn insert_sales(
    State(state): State<AppState>,
    payload: Result<Json<SalesInsertRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let date = sales_ledger::parse_date(&req.date)?;

    let _guard = state.ledger_lock.lock().await;
    let ledgers = Arc::clone(&state.ledgers);
    let outcome =
        tokio::task::spawn_blocking(move || ledgers.insert_sale(req.branch, date, req.sales))
            .await??;

    info!(
        branch = req.branch,
        %date,
        sales = req.sales,
        replaced = matches!(outcome, InsertOutcome::Replaced { .. }),
        "inserted branch sales"
    );

    Ok(Json(MessageResponse {
        message: "Data inserted successfully".to_string(),
    }))
}

/// `POST /insert/data`
///
/// Overwrites the month in the aggregate ledger, refits the model and returns
/// the next `count` point forecasts.
pub async fn insert_month(
    State(state): State<AppState>,
    payload: Result<Json<MonthDataRequest>, JsonRejection>,
) -> Result<Json<MonthDataResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let (today, data, count) = match (req.today, req.data, req.count) {
        (Some(today), Some(data), Some(count)) => (today, data, count),
        _ => {
            return Err(ApiError::Validation(
                "today, data and count are required".to_string(),
            ))
        }
    };
    let count = check_horizon(count)?;
    let batch = MonthBatch::new(sales_ledger::parse_date(&today)?, data);

    let _guard = state.ledger_lock.lock().await;
    let ledgers = Arc::clone(&state.ledgers);
    let model = Arc::clone(&state.model);
    let rows = tokio::task::spawn_blocking(move || -> Result<Vec<ForecastRow>, ApiError> {
        let written = ledgers.replace_month(&batch)?;
        info!(today = %batch.today(), written, "replaced month of aggregate sales");
        model.refit_preprocessed_from_csv(ledgers.aggregate_path())?;
        Ok(model.predict(count)?)
    })
    .await??;

    Ok(Json(MonthDataResponse {
        message: "Data inserted and model retrained successfully".to_string(),
        code: 200,
        data: rows.iter().map(|row| row.yhat).collect(),
    }))
}

/// `GET /water/quality?site_id=S`
pub async fn water_quality(
    State(state): State<AppState>,
    params: Result<Query<WaterParams>, QueryRejection>,
) -> Result<Json<SiteReport>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let site_id = params
        .site_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("site_id is required".to_string()))?;

    let report = state.water.site_report(&site_id).await?;
    Ok(Json(report))
}
