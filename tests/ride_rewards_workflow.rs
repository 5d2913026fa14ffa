use std::sync::Arc;

use chrono::NaiveDate;
use ridewise::workflows::rewards::{
    CompletedRide, InMemoryLedger, LedgerError, MonthlySummary, RewardTier, RideError,
    RideRewardService, ScoringConfig, SessionId, UserId, VehicleId, VehicleProfile, VehicleType,
};

fn commuter() -> UserId {
    UserId("rider-42".to_string())
}

fn city_ev() -> VehicleProfile {
    VehicleProfile {
        vehicle_id: VehicleId("veh-city-ev".to_string()),
        vehicle_type: VehicleType::Ev,
        expected_mileage: 5.0,
        current_odometer: 8_000.0,
    }
}

fn commute(session: &str, start: f64, end: f64, fuel: Option<f64>) -> CompletedRide {
    CompletedRide {
        session_id: SessionId(session.to_string()),
        user_id: commuter(),
        vehicle_id: city_ev().vehicle_id,
        start_odometer: start,
        end_odometer: end,
        fuel_consumed: fuel,
    }
}

fn service() -> (RideRewardService<InMemoryLedger>, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::default());
    let service = RideRewardService::new(ledger.clone(), ScoringConfig::default());
    (service, ledger)
}

#[test]
fn a_month_of_commuting_accumulates_points_and_advances_tiers() {
    let (service, ledger) = service();
    let vehicle = city_ev();

    // Three 100 km rides at rated efficiency: 176 points each.
    for (session, start, end) in [
        ("jun-01", 8_000.0, 8_100.0),
        ("jun-02", 8_100.0, 8_200.0),
        ("jun-03", 8_200.0, 8_300.0),
    ] {
        let outcome = service
            .complete_ride(&commute(session, start, end, Some(20.0)), &vehicle)
            .expect("ride completes");
        assert_eq!(outcome.calculation.total_points, 176);
    }

    let standing = service.standing(&commuter()).expect("standing resolves");
    assert_eq!(standing.total_points, 528);
    assert_eq!(standing.tier, RewardTier::Gold);

    // Month close on a qualifying month adds the flat bonus on top.
    let summary = MonthlySummary {
        vehicle_id: vehicle.vehicle_id.clone(),
        month: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        session_count: 12,
        total_distance_km: 300.0,
        avg_mileage: 5.0,
    };
    let close = service
        .close_month(&commuter(), &summary, &vehicle)
        .expect("month closes");
    assert_eq!(close.bonus_points, 50);

    let standing = service.standing(&commuter()).expect("standing resolves");
    assert_eq!(standing.total_points, 578);
    assert_eq!(standing.tier, RewardTier::Gold);

    // Every award is visible as its own history entry.
    assert_eq!(ledger.entries().len(), 4);
}

#[test]
fn replayed_completions_never_double_score() {
    let (service, ledger) = service();
    let vehicle = city_ev();
    let ride = commute("jun-replay", 8_000.0, 8_050.0, None);

    service
        .complete_ride(&ride, &vehicle)
        .expect("first completion succeeds");

    match service.complete_ride(&ride, &vehicle) {
        Err(RideError::Ledger(LedgerError::DuplicateSource(_))) => {}
        other => panic!("expected duplicate rejection, got {other:?}"),
    }

    assert_eq!(ledger.entries().len(), 1);
}

#[test]
fn corrections_are_new_entries_not_rewrites() {
    let (service, ledger) = service();
    let vehicle = city_ev();

    service
        .complete_ride(&commute("jun-10", 8_000.0, 8_080.0, None), &vehicle)
        .expect("ride completes");
    let recorded = ledger.entries();

    // A correction arrives as a fresh session entry; the first award is
    // untouched.
    service
        .complete_ride(&commute("jun-10-correction", 8_000.0, 8_090.0, None), &vehicle)
        .expect("correction completes");

    let entries = ledger.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], recorded[0]);
}
