use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CompletedRide, MonthlySummary, RideFacts, UserId, VehicleProfile};
use super::ledger::{LedgerError, RewardLedger};
use super::service::{RideError, RideRewardService};

/// Router builder exposing HTTP endpoints for scoring, ride completion,
/// month close, and standing lookups.
pub fn reward_router<L>(service: Arc<RideRewardService<L>>) -> Router
where
    L: RewardLedger + 'static,
{
    Router::new()
        .route("/api/v1/rewards/score", post(score_handler::<L>))
        .route("/api/v1/rides/complete", post(complete_ride_handler::<L>))
        .route(
            "/api/v1/rewards/month-close",
            post(month_close_handler::<L>),
        )
        .route(
            "/api/v1/rewards/:user_id/standing",
            get(standing_handler::<L>),
        )
        .with_state(service)
}

/// Payload pairing a ride completion with the owning vehicle's profile.
/// Profile lookup belongs to the caller; this service only scores.
#[derive(Debug, Deserialize)]
pub struct RideCompletionRequest {
    pub ride: CompletedRide,
    pub vehicle: VehicleProfile,
}

#[derive(Debug, Deserialize)]
pub struct MonthCloseRequest {
    pub user_id: UserId,
    pub summary: MonthlySummary,
    pub vehicle: VehicleProfile,
}

pub(crate) async fn score_handler<L>(
    State(service): State<Arc<RideRewardService<L>>>,
    axum::Json(facts): axum::Json<RideFacts>,
) -> Response
where
    L: RewardLedger + 'static,
{
    match service.engine().score(&facts) {
        Ok(calculation) => (StatusCode::OK, axum::Json(calculation)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn complete_ride_handler<L>(
    State(service): State<Arc<RideRewardService<L>>>,
    axum::Json(request): axum::Json<RideCompletionRequest>,
) -> Response
where
    L: RewardLedger + 'static,
{
    match service.complete_ride(&request.ride, &request.vehicle) {
        Ok(outcome) => (StatusCode::ACCEPTED, axum::Json(outcome)).into_response(),
        Err(RideError::Ledger(LedgerError::DuplicateSource(source))) => {
            let payload = json!({
                "error": format!("reward already recorded for {source}"),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(error @ RideError::Ledger(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn month_close_handler<L>(
    State(service): State<Arc<RideRewardService<L>>>,
    axum::Json(request): axum::Json<MonthCloseRequest>,
) -> Response
where
    L: RewardLedger + 'static,
{
    match service.close_month(&request.user_id, &request.summary, &request.vehicle) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(RideError::Ledger(LedgerError::DuplicateSource(source))) => {
            let payload = json!({
                "error": format!("reward already recorded for {source}"),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(error @ RideError::Ledger(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn standing_handler<L>(
    State(service): State<Arc<RideRewardService<L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    L: RewardLedger + 'static,
{
    match service.standing(&UserId(user_id)) {
        Ok(standing) => (StatusCode::OK, axum::Json(standing)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
