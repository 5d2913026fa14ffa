use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of propulsion types the reward program recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Ev,
    Cng,
    Petrol,
    Diesel,
}

impl VehicleType {
    pub const fn label(self) -> &'static str {
        match self {
            VehicleType::Ev => "Electric",
            VehicleType::Cng => "CNG",
            VehicleType::Petrol => "Petrol",
            VehicleType::Diesel => "Diesel",
        }
    }

    /// Wire name used in payloads and CLI arguments.
    pub const fn as_str(self) -> &'static str {
        match self {
            VehicleType::Ev => "ev",
            VehicleType::Cng => "cng",
            VehicleType::Petrol => "petrol",
            VehicleType::Diesel => "diesel",
        }
    }

    /// Unit the mileage figures are expressed in for this propulsion type.
    pub const fn mileage_unit(self) -> &'static str {
        match self {
            VehicleType::Ev => "km/kWh",
            VehicleType::Cng | VehicleType::Petrol | VehicleType::Diesel => "km/L",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when untrusted input names a vehicle type outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle type '{0}' (expected ev, cng, petrol, or diesel)")]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ev" => Ok(VehicleType::Ev),
            "cng" => Ok(VehicleType::Cng),
            "petrol" => Ok(VehicleType::Petrol),
            "diesel" => Ok(VehicleType::Diesel),
            other => Err(UnknownVehicleType(other.to_string())),
        }
    }
}

/// Scoring input for one completed ride.
///
/// `actual_mileage` and `expected_mileage` share a unit (km/L or km/kWh);
/// only their ratio enters the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RideFacts {
    pub distance_km: f64,
    pub vehicle_type: VehicleType,
    pub actual_mileage: f64,
    pub expected_mileage: f64,
}

/// Itemized point award for one ride, kept whole so every award can be audited.
///
/// Invariant: `total_points = max(0, round(base_points * multiplier + efficiency_bonus))`,
/// rounded half-away-from-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardCalculation {
    pub base_points: f64,
    pub multiplier: f64,
    pub efficiency_bonus: f64,
    pub total_points: u32,
}

/// Aggregate efficiency facts for one vehicle over one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEfficiencyFacts {
    pub session_count: u32,
    pub avg_mileage: f64,
    pub expected_mileage: f64,
}

/// Loyalty tier derived from a running point total. Tiers are never stored;
/// they are recomputed from ledger totals so the two cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl RewardTier {
    pub const fn label(self) -> &'static str {
        match self {
            RewardTier::Bronze => "Bronze",
            RewardTier::Silver => "Silver",
            RewardTier::Gold => "Gold",
            RewardTier::Platinum => "Platinum",
        }
    }

    /// Tiers from lowest to highest threshold.
    pub const fn ordered() -> [RewardTier; 4] {
        [
            RewardTier::Bronze,
            RewardTier::Silver,
            RewardTier::Gold,
            RewardTier::Platinum,
        ]
    }
}

/// Identifier wrapper for ride sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Identifier wrapper for monthly reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Identifier wrapper for registered vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

/// Identifier wrapper for account holders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Static slice of a vehicle record the reward workflow consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub vehicle_id: VehicleId,
    pub vehicle_type: VehicleType,
    /// Rated efficiency from the registration form, in km/L or km/kWh.
    pub expected_mileage: f64,
    pub current_odometer: f64,
}

/// Completion request for a tracked ride. Distance is derived from the
/// odometer pair, never supplied directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRide {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub vehicle_id: VehicleId,
    pub start_odometer: f64,
    pub end_odometer: f64,
    /// Liters or kWh consumed, when a matching fuel/charge log exists.
    /// Absent, the ride is scored at the vehicle's rated efficiency.
    #[serde(default)]
    pub fuel_consumed: Option<f64>,
}

impl CompletedRide {
    pub fn distance_km(&self) -> f64 {
        self.end_odometer - self.start_odometer
    }
}

/// What a ledger entry was awarded for. Doubles as the idempotency key:
/// each source is awarded at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardSource {
    RideSession(SessionId),
    MonthlyReport(ReportId),
}

impl fmt::Display for RewardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardSource::RideSession(id) => write!(f, "session {}", id.0),
            RewardSource::MonthlyReport(id) => write!(f, "report {}", id.0),
        }
    }
}

/// Append-only reward history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub user_id: UserId,
    pub vehicle_id: VehicleId,
    pub source: RewardSource,
    pub points: u32,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregates for one vehicle over one calendar month, as produced by the
/// usage importer or an external report job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub vehicle_id: VehicleId,
    /// First day of the reported month.
    pub month: NaiveDate,
    pub session_count: u32,
    pub total_distance_km: f64,
    pub avg_mileage: f64,
}

impl MonthlySummary {
    pub fn efficiency_facts(&self, expected_mileage: f64) -> MonthlyEfficiencyFacts {
        MonthlyEfficiencyFacts {
            session_count: self.session_count,
            avg_mileage: self.avg_mileage,
            expected_mileage,
        }
    }

    pub fn report_id(&self) -> ReportId {
        ReportId(format!("{}-{}", self.vehicle_id.0, self.month.format("%Y-%m")))
    }
}
