mod config;
mod policy;

pub use config::{
    ConsistencyPolicy, EfficiencyBands, ScoringConfig, TierThresholds, VehicleMultipliers,
};

use super::domain::{MonthlyEfficiencyFacts, RewardCalculation, RewardTier, RideFacts};

/// Stateless engine applying the reward policy to ride and monthly facts.
///
/// Every operation is a pure function of its input and the injected
/// [`ScoringConfig`]; the same facts always produce the same award.
pub struct RewardEngine {
    config: ScoringConfig,
}

impl RewardEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one completed ride.
    ///
    /// Base points scale with distance alone, the propulsion multiplier is a
    /// table lookup, and the efficiency bonus is piecewise on the
    /// actual-to-rated mileage ratio. The returned calculation keeps all
    /// intermediate figures so the award can be explained later.
    pub fn score(&self, facts: &RideFacts) -> Result<RewardCalculation, ScoringError> {
        ensure_finite("distance_km", facts.distance_km)?;
        ensure_finite("actual_mileage", facts.actual_mileage)?;
        ensure_finite("expected_mileage", facts.expected_mileage)?;

        if facts.distance_km < 0.0 {
            return Err(ScoringError::NegativeDistance(facts.distance_km));
        }
        if facts.expected_mileage <= 0.0 {
            return Err(ScoringError::NonPositiveExpectedMileage(
                facts.expected_mileage,
            ));
        }

        let base_points = facts.distance_km * self.config.points_per_km;
        let multiplier = self.config.multipliers.lookup(facts.vehicle_type);
        let points_after_multiplier = base_points * multiplier;

        let efficiency_ratio = facts.actual_mileage / facts.expected_mileage;
        let efficiency_bonus = policy::efficiency_bonus(
            points_after_multiplier,
            efficiency_ratio,
            &self.config.efficiency,
        );

        Ok(RewardCalculation {
            base_points,
            multiplier,
            efficiency_bonus,
            total_points: policy::settle_points(points_after_multiplier, efficiency_bonus),
        })
    }

    /// Flat monthly bonus for riders who stayed engaged and efficient.
    ///
    /// A step function, unlike the per-ride bonus: either the month qualifies
    /// for the full bonus or it earns nothing.
    pub fn consistency_bonus(
        &self,
        facts: &MonthlyEfficiencyFacts,
    ) -> Result<u32, ScoringError> {
        ensure_finite("avg_mileage", facts.avg_mileage)?;
        ensure_finite("expected_mileage", facts.expected_mileage)?;

        if facts.expected_mileage <= 0.0 {
            return Err(ScoringError::NonPositiveExpectedMileage(
                facts.expected_mileage,
            ));
        }

        let policy = &self.config.consistency;
        if facts.session_count < policy.min_sessions {
            return Ok(0);
        }

        let efficiency_ratio = facts.avg_mileage / facts.expected_mileage;
        if efficiency_ratio >= policy.min_ratio {
            Ok(policy.bonus_points)
        } else {
            Ok(0)
        }
    }

    /// Map a running point total to its loyalty tier.
    pub fn classify(&self, total_points: u64) -> RewardTier {
        self.config.tiers.classify(total_points)
    }
}

impl Default for RewardEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Precondition violations surfaced to the caller; the engine never scores
/// an invalid ride.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("ride distance cannot be negative, got {0} km")]
    NegativeDistance(f64),
    #[error("expected mileage must be positive, got {0}")]
    NonPositiveExpectedMileage(f64),
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::NonFinite { field })
    }
}
