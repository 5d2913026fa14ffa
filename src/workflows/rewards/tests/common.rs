use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::rewards::domain::{
    CompletedRide, RewardEntry, RideFacts, SessionId, UserId, VehicleId, VehicleProfile,
    VehicleType,
};
use crate::workflows::rewards::ledger::{InMemoryLedger, LedgerError, RewardLedger};
use crate::workflows::rewards::scoring::{RewardEngine, ScoringConfig};
use crate::workflows::rewards::{reward_router, RideRewardService};

pub(super) fn engine() -> RewardEngine {
    RewardEngine::new(ScoringConfig::default())
}

pub(super) fn facts(
    distance_km: f64,
    vehicle_type: VehicleType,
    actual_mileage: f64,
    expected_mileage: f64,
) -> RideFacts {
    RideFacts {
        distance_km,
        vehicle_type,
        actual_mileage,
        expected_mileage,
    }
}

pub(super) fn ev_vehicle() -> VehicleProfile {
    VehicleProfile {
        vehicle_id: VehicleId("veh-ev-1".to_string()),
        vehicle_type: VehicleType::Ev,
        expected_mileage: 5.0,
        current_odometer: 12_000.0,
    }
}

pub(super) fn diesel_vehicle() -> VehicleProfile {
    VehicleProfile {
        vehicle_id: VehicleId("veh-diesel-1".to_string()),
        vehicle_type: VehicleType::Diesel,
        expected_mileage: 18.0,
        current_odometer: 54_300.0,
    }
}

pub(super) fn rider() -> UserId {
    UserId("user-1".to_string())
}

pub(super) fn ride(
    suffix: &str,
    vehicle: &VehicleProfile,
    start_odometer: f64,
    end_odometer: f64,
    fuel_consumed: Option<f64>,
) -> CompletedRide {
    CompletedRide {
        session_id: SessionId(format!("session-{suffix}")),
        user_id: rider(),
        vehicle_id: vehicle.vehicle_id.clone(),
        start_odometer,
        end_odometer,
        fuel_consumed,
    }
}

pub(super) fn build_service() -> (RideRewardService<InMemoryLedger>, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::default());
    let service = RideRewardService::new(ledger.clone(), ScoringConfig::default());
    (service, ledger)
}

pub(super) fn reward_router_with_service(
    service: RideRewardService<InMemoryLedger>,
) -> axum::Router {
    reward_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Ledger that refuses every operation, for failure-path tests.
pub(super) struct UnavailableLedger;

impl RewardLedger for UnavailableLedger {
    fn append(&self, _entry: RewardEntry) -> Result<RewardEntry, LedgerError> {
        Err(LedgerError::Unavailable("history store offline".to_string()))
    }

    fn entries_for_user(&self, _user_id: &UserId) -> Result<Vec<RewardEntry>, LedgerError> {
        Err(LedgerError::Unavailable("history store offline".to_string()))
    }
}
