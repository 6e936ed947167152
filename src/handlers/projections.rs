use std::sync::Arc;

use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{map_service_error, ApiError};
use crate::models::RiskType;

use super::common::success_response;
use super::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/update-projection", post(update_projection))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectionRequest {
    #[validate(length(min = 1, message = "so_number is required"))]
    pub so_number: String,
    #[validate(length(min = 1, message = "part_number is required"))]
    pub part_number: String,
    pub risk_type: String,
    pub quantity: Decimal,
}

#[derive(Debug, Serialize)]
struct UpdateProjectionResponse {
    so_number: String,
    part_number: String,
    risk_type: RiskType,
    quantity: Decimal,
}

/// `POST /scheduling/api/update-projection`. The only endpoint
/// that writes — it calls the Local Projection Store and nothing else; it
/// never triggers an MRP run.
async fn update_projection(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProjectionRequest>,
) -> Result<axum::response::Response, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let risk_type: RiskType = payload
        .risk_type
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown risk_type '{}'", payload.risk_type)))?;

    // The actor identity is supplied by the external auth collaborator
    // (out of scope here); "scheduling-ui" stands in for it.
    let saved = state
        .projections
        .upsert_projection(&payload.so_number, &payload.part_number, risk_type, payload.quantity, "scheduling-ui")
        .await
        .map_err(map_service_error)?;

    Ok(success_response(UpdateProjectionResponse {
        so_number: saved.so_number,
        part_number: saved.part_number,
        risk_type: saved.risk_type,
        quantity: saved.quantity,
    }))
}
