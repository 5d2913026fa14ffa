use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::{
    CompletedRide, MonthlySummary, RewardCalculation, RewardEntry, RewardSource, RewardTier,
    RideFacts, SessionId, UserId, VehicleId, VehicleProfile,
};
use super::ledger::{LedgerError, RewardLedger};
use super::scoring::{RewardEngine, ScoringConfig, ScoringError};

/// Service sequencing "complete ride, score, persist" and "close month,
/// evaluate, persist" over the reward ledger.
pub struct RideRewardService<L> {
    ledger: Arc<L>,
    engine: RewardEngine,
}

impl<L> RideRewardService<L>
where
    L: RewardLedger + 'static,
{
    pub fn new(ledger: Arc<L>, config: ScoringConfig) -> Self {
        Self {
            ledger,
            engine: RewardEngine::new(config),
        }
    }

    pub fn engine(&self) -> &RewardEngine {
        &self.engine
    }

    /// Score a completed ride and append the award to the ledger.
    ///
    /// Distance comes from the odometer pair. Actual mileage comes from the
    /// logged fuel/energy quantity when one exists; without one the ride is
    /// scored at the vehicle's rated efficiency, so the efficiency ratio is
    /// exactly 1.0. Completing the same session twice fails on the ledger's
    /// uniqueness rule and never scores twice.
    pub fn complete_ride(
        &self,
        ride: &CompletedRide,
        vehicle: &VehicleProfile,
    ) -> Result<RideOutcome, RideError> {
        if ride.vehicle_id != vehicle.vehicle_id {
            return Err(RideError::VehicleMismatch {
                ride: ride.vehicle_id.clone(),
                profile: vehicle.vehicle_id.clone(),
            });
        }
        if ride.end_odometer <= ride.start_odometer {
            return Err(RideError::OdometerNotAdvanced {
                start: ride.start_odometer,
                end: ride.end_odometer,
            });
        }

        let distance_km = ride.distance_km();
        let actual_mileage = match ride.fuel_consumed {
            Some(fuel) if fuel <= 0.0 || !fuel.is_finite() => {
                return Err(RideError::NonPositiveFuel(fuel));
            }
            Some(fuel) => distance_km / fuel,
            None => vehicle.expected_mileage,
        };

        let calculation = self.engine.score(&RideFacts {
            distance_km,
            vehicle_type: vehicle.vehicle_type,
            actual_mileage,
            expected_mileage: vehicle.expected_mileage,
        })?;

        self.ledger.append(RewardEntry {
            user_id: ride.user_id.clone(),
            vehicle_id: ride.vehicle_id.clone(),
            source: RewardSource::RideSession(ride.session_id.clone()),
            points: calculation.total_points,
            reason: format!("Ride completed: {distance_km:.1} km"),
            recorded_at: Utc::now(),
        })?;

        Ok(RideOutcome {
            session_id: ride.session_id.clone(),
            distance_km,
            calculation,
        })
    }

    /// Evaluate a closed month and append the consistency bonus when earned.
    ///
    /// A month that does not qualify returns zero and leaves the ledger
    /// untouched. The bonus entry is keyed by vehicle and month, so closing
    /// the same month twice fails rather than double-paying.
    pub fn close_month(
        &self,
        user_id: &UserId,
        summary: &MonthlySummary,
        vehicle: &VehicleProfile,
    ) -> Result<MonthCloseOutcome, RideError> {
        if summary.vehicle_id != vehicle.vehicle_id {
            return Err(RideError::VehicleMismatch {
                ride: summary.vehicle_id.clone(),
                profile: vehicle.vehicle_id.clone(),
            });
        }

        let facts = summary.efficiency_facts(vehicle.expected_mileage);
        let bonus_points = self.engine.consistency_bonus(&facts)?;

        if bonus_points > 0 {
            self.ledger.append(RewardEntry {
                user_id: user_id.clone(),
                vehicle_id: summary.vehicle_id.clone(),
                source: RewardSource::MonthlyReport(summary.report_id()),
                points: bonus_points,
                reason: format!("Monthly consistency bonus: {}", summary.month.format("%Y-%m")),
                recorded_at: Utc::now(),
            })?;
        }

        Ok(MonthCloseOutcome {
            month: summary.month.format("%Y-%m").to_string(),
            session_count: summary.session_count,
            bonus_points,
        })
    }

    /// Current point total and tier for one account holder, derived from the
    /// ledger on every call.
    pub fn standing(&self, user_id: &UserId) -> Result<RewardStanding, RideError> {
        let total_points = self.ledger.total_for_user(user_id)?;
        let tier = self.engine.classify(total_points);
        Ok(RewardStanding {
            user_id: user_id.clone(),
            total_points,
            tier,
            tier_label: tier.label(),
        })
    }
}

/// Result of a scored ride, echoing the derived distance for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideOutcome {
    pub session_id: SessionId,
    pub distance_km: f64,
    pub calculation: RewardCalculation,
}

/// Result of a month close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCloseOutcome {
    pub month: String,
    pub session_count: u32,
    pub bonus_points: u32,
}

/// Point total and derived tier exposed to API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardStanding {
    pub user_id: UserId,
    pub total_points: u64,
    pub tier: RewardTier,
    pub tier_label: &'static str,
}

/// Error raised by the reward workflow service.
#[derive(Debug, thiserror::Error)]
pub enum RideError {
    #[error("end odometer {end} must exceed start odometer {start}")]
    OdometerNotAdvanced { start: f64, end: f64 },
    #[error("fuel consumed must be a positive quantity, got {0}")]
    NonPositiveFuel(f64),
    #[error("ride references vehicle {ride:?}, profile is for {profile:?}")]
    VehicleMismatch { ride: VehicleId, profile: VehicleId },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
