use std::sync::Arc;

use chrono::NaiveDate;

use super::common::*;
use crate::workflows::rewards::domain::{
    MonthlySummary, RewardSource, RewardTier, VehicleId,
};
use crate::workflows::rewards::ledger::LedgerError;
use crate::workflows::rewards::scoring::ScoringConfig;
use crate::workflows::rewards::service::{RideError, RideRewardService};

fn june() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

fn qualifying_summary(vehicle_id: &VehicleId) -> MonthlySummary {
    MonthlySummary {
        vehicle_id: vehicle_id.clone(),
        month: june(),
        session_count: 12,
        total_distance_km: 840.0,
        avg_mileage: 4.8,
    }
}

#[test]
fn completing_a_logged_ride_scores_and_appends() {
    let (service, ledger) = build_service();
    let vehicle = ev_vehicle();
    // 100 km on 20 kWh is 5.0 km/kWh, exactly the rated figure.
    let ride = ride("a1", &vehicle, 12_000.0, 12_100.0, Some(20.0));

    let outcome = service
        .complete_ride(&ride, &vehicle)
        .expect("ride completes");

    assert_eq!(outcome.distance_km, 100.0);
    assert_eq!(outcome.calculation.total_points, 176);

    let entries = ledger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].points, 176);
    assert_eq!(entries[0].reason, "Ride completed: 100.0 km");
    assert_eq!(
        entries[0].source,
        RewardSource::RideSession(ride.session_id.clone())
    );
}

#[test]
fn unlogged_rides_score_at_rated_efficiency() {
    let (service, _ledger) = build_service();
    let vehicle = ev_vehicle();
    let ride = ride("a2", &vehicle, 12_000.0, 12_100.0, None);

    let outcome = service
        .complete_ride(&ride, &vehicle)
        .expect("ride completes");

    // Estimated consumption puts the ratio at exactly 1.0, so the flat
    // bonus applies.
    assert!((outcome.calculation.efficiency_bonus - 16.0).abs() < 1e-9);
    assert_eq!(outcome.calculation.total_points, 176);
}

#[test]
fn completing_the_same_session_twice_is_rejected() {
    let (service, ledger) = build_service();
    let vehicle = ev_vehicle();
    let ride = ride("dup", &vehicle, 12_000.0, 12_050.0, None);

    service
        .complete_ride(&ride, &vehicle)
        .expect("first completion succeeds");
    let total_after_first = ledger.entries().iter().map(|e| e.points).sum::<u32>();

    match service.complete_ride(&ride, &vehicle) {
        Err(RideError::Ledger(LedgerError::DuplicateSource(_))) => {}
        other => panic!("expected duplicate source error, got {other:?}"),
    }

    let total_after_second = ledger.entries().iter().map(|e| e.points).sum::<u32>();
    assert_eq!(total_after_first, total_after_second);
}

#[test]
fn rejects_rides_where_the_odometer_did_not_advance() {
    let (service, ledger) = build_service();
    let vehicle = diesel_vehicle();
    let ride = ride("odo", &vehicle, 54_300.0, 54_300.0, None);

    match service.complete_ride(&ride, &vehicle) {
        Err(RideError::OdometerNotAdvanced { start, end }) => {
            assert_eq!(start, end);
        }
        other => panic!("expected odometer error, got {other:?}"),
    }
    assert!(ledger.entries().is_empty());
}

#[test]
fn rejects_mismatched_vehicle_profiles() {
    let (service, _ledger) = build_service();
    let vehicle = diesel_vehicle();
    let mut ride = ride("mix", &vehicle, 54_300.0, 54_360.0, None);
    ride.vehicle_id = VehicleId("veh-other".to_string());

    match service.complete_ride(&ride, &vehicle) {
        Err(RideError::VehicleMismatch { ride, profile }) => {
            assert_eq!(ride.0, "veh-other");
            assert_eq!(profile, vehicle.vehicle_id);
        }
        other => panic!("expected vehicle mismatch, got {other:?}"),
    }
}

#[test]
fn rejects_non_positive_fuel_quantities() {
    let (service, _ledger) = build_service();
    let vehicle = diesel_vehicle();
    let ride = ride("fuel", &vehicle, 54_300.0, 54_360.0, Some(0.0));

    match service.complete_ride(&ride, &vehicle) {
        Err(RideError::NonPositiveFuel(value)) => assert_eq!(value, 0.0),
        other => panic!("expected fuel error, got {other:?}"),
    }
}

#[test]
fn closing_a_qualifying_month_appends_the_bonus() {
    let (service, ledger) = build_service();
    let vehicle = ev_vehicle();
    let summary = qualifying_summary(&vehicle.vehicle_id);

    let outcome = service
        .close_month(&rider(), &summary, &vehicle)
        .expect("month closes");

    assert_eq!(outcome.bonus_points, 50);
    let entries = ledger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].reason, "Monthly consistency bonus: 2025-06");
    assert_eq!(
        entries[0].source,
        RewardSource::MonthlyReport(summary.report_id())
    );
}

#[test]
fn closing_the_same_month_twice_is_rejected() {
    let (service, _ledger) = build_service();
    let vehicle = ev_vehicle();
    let summary = qualifying_summary(&vehicle.vehicle_id);

    service
        .close_month(&rider(), &summary, &vehicle)
        .expect("first close succeeds");

    match service.close_month(&rider(), &summary, &vehicle) {
        Err(RideError::Ledger(LedgerError::DuplicateSource(_))) => {}
        other => panic!("expected duplicate source error, got {other:?}"),
    }
}

#[test]
fn non_qualifying_months_close_without_a_ledger_entry() {
    let (service, ledger) = build_service();
    let vehicle = ev_vehicle();
    let summary = MonthlySummary {
        session_count: 4,
        ..qualifying_summary(&vehicle.vehicle_id)
    };

    let outcome = service
        .close_month(&rider(), &summary, &vehicle)
        .expect("month closes");

    assert_eq!(outcome.bonus_points, 0);
    assert!(ledger.entries().is_empty());
}

#[test]
fn standing_is_derived_from_the_ledger_on_every_call() {
    let (service, _ledger) = build_service();
    let vehicle = ev_vehicle();

    let before = service.standing(&rider()).expect("standing resolves");
    assert_eq!(before.total_points, 0);
    assert_eq!(before.tier, RewardTier::Bronze);

    for (index, (start, end)) in [(0.0, 100.0), (100.0, 200.0), (200.0, 300.0)]
        .iter()
        .enumerate()
    {
        let ride = ride(&format!("st-{index}"), &vehicle, *start, *end, None);
        service
            .complete_ride(&ride, &vehicle)
            .expect("ride completes");
    }

    let after = service.standing(&rider()).expect("standing resolves");
    assert_eq!(after.total_points, 3 * 176);
    assert_eq!(after.tier, RewardTier::Gold);
    assert_eq!(after.tier_label, "Gold");
}

#[test]
fn ledger_failures_surface_as_service_errors() {
    let service = RideRewardService::new(Arc::new(UnavailableLedger), ScoringConfig::default());

    match service.standing(&rider()) {
        Err(RideError::Ledger(LedgerError::Unavailable(_))) => {}
        other => panic!("expected unavailable error, got {other:?}"),
    }
}
