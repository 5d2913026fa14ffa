//! Presentation accents for tiers and vehicle types.
//!
//! Clients that render badges pull from here; nothing in the scoring engine
//! consumes these values.

use super::domain::{RewardTier, VehicleType};

pub const fn tier_accent(tier: RewardTier) -> &'static str {
    match tier {
        RewardTier::Bronze => "#d97706",
        RewardTier::Silver => "#d1d5db",
        RewardTier::Gold => "#fbbf24",
        RewardTier::Platinum => "#e5e7eb",
    }
}

pub const fn vehicle_accent(vehicle_type: VehicleType) -> &'static str {
    match vehicle_type {
        VehicleType::Ev => "#22c55e",
        VehicleType::Cng => "#84cc16",
        VehicleType::Petrol => "#fbbf24",
        VehicleType::Diesel => "#92400e",
    }
}

/// Card gradient endpoints for vehicle badges.
pub const fn vehicle_gradient(vehicle_type: VehicleType) -> [&'static str; 2] {
    match vehicle_type {
        VehicleType::Ev => ["#22c55e", "#15803d"],
        VehicleType::Cng => ["#84cc16", "#65a30d"],
        VehicleType::Petrol => ["#fbbf24", "#f59e0b"],
        VehicleType::Diesel => ["#92400e", "#7c2d12"],
    }
}
