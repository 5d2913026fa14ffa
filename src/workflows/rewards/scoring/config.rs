use serde::{Deserialize, Serialize};

use super::super::domain::{RewardTier, VehicleType};

/// Policy constants for the reward program.
///
/// Every tunable lives here so the numbers can be audited in one place; the
/// scoring functions themselves carry no literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base award per kilometer ridden.
    pub points_per_km: f64,
    pub multipliers: VehicleMultipliers,
    pub efficiency: EfficiencyBands,
    pub consistency: ConsistencyPolicy,
    pub tiers: TierThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_km: 1.0,
            multipliers: VehicleMultipliers::default(),
            efficiency: EfficiencyBands::default(),
            consistency: ConsistencyPolicy::default(),
            tiers: TierThresholds::default(),
        }
    }
}

/// Per-propulsion reward multipliers, favoring lower-emission types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleMultipliers {
    pub ev: f64,
    pub cng: f64,
    pub petrol: f64,
    pub diesel: f64,
}

impl VehicleMultipliers {
    pub fn lookup(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::Ev => self.ev,
            VehicleType::Cng => self.cng,
            VehicleType::Petrol => self.petrol,
            VehicleType::Diesel => self.diesel,
        }
    }
}

impl Default for VehicleMultipliers {
    fn default() -> Self {
        Self {
            ev: 1.6,
            cng: 1.3,
            petrol: 1.0,
            diesel: 0.9,
        }
    }
}

/// Breakpoints and rates for the piecewise efficiency bonus.
///
/// Invariant when retuning: `(1.0 - partial_floor) * partial_slope` must equal
/// `full_bonus_rate`, so the partial band meets the flat band at ratio 1.0
/// without a jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyBands {
    /// Bonus rate once the driver matches or beats rated efficiency.
    pub full_bonus_rate: f64,
    /// Ratio at which partial credit starts from zero.
    pub partial_floor: f64,
    /// Slope of the partial-credit band.
    pub partial_slope: f64,
    /// Flat penalty rate below the partial-credit floor.
    pub penalty_rate: f64,
}

impl EfficiencyBands {
    /// True when the partial band is continuous with the flat band at ratio 1.0.
    pub fn is_continuous(&self) -> bool {
        let at_boundary = (1.0 - self.partial_floor) * self.partial_slope;
        (at_boundary - self.full_bonus_rate).abs() < 1e-9
    }
}

impl Default for EfficiencyBands {
    fn default() -> Self {
        Self {
            full_bonus_rate: 0.10,
            partial_floor: 0.8,
            partial_slope: 0.5,
            penalty_rate: 0.10,
        }
    }
}

/// Flat monthly bonus awarded for sustained engagement and efficiency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyPolicy {
    /// Rides required in the month before the bonus is considered.
    pub min_sessions: u32,
    /// Minimum average-to-rated efficiency ratio.
    pub min_ratio: f64,
    pub bonus_points: u32,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            min_sessions: 10,
            min_ratio: 0.9,
            bonus_points: 50,
        }
    }
}

/// Inclusive lower bounds for each tier above Bronze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub silver: u64,
    pub gold: u64,
    pub platinum: u64,
}

impl TierThresholds {
    /// Ordered lookup, highest threshold first, so boundaries are
    /// inclusive-lower.
    pub fn classify(&self, total_points: u64) -> RewardTier {
        if total_points >= self.platinum {
            RewardTier::Platinum
        } else if total_points >= self.gold {
            RewardTier::Gold
        } else if total_points >= self.silver {
            RewardTier::Silver
        } else {
            RewardTier::Bronze
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            silver: 250,
            gold: 500,
            platinum: 1000,
        }
    }
}
