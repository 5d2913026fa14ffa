//! Reward scoring engine and the workflow that persists its awards.
//!
//! The engine itself is three pure functions over injected policy constants:
//! per-ride scoring, the monthly consistency bonus, and tier classification.
//! Everything stateful (the append-only ledger, the completion workflow, the
//! HTTP surface) sits around it and can be swapped without touching policy.

pub mod display;
pub mod domain;
pub mod ledger;
pub mod monthly;
pub mod router;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CompletedRide, MonthlyEfficiencyFacts, MonthlySummary, ReportId, RewardCalculation,
    RewardEntry, RewardSource, RewardTier, RideFacts, SessionId, UnknownVehicleType, UserId,
    VehicleId, VehicleProfile, VehicleType,
};
pub use ledger::{InMemoryLedger, LedgerError, RewardLedger};
pub use monthly::{MonthlyUsageImporter, UsageImportError};
pub use router::{reward_router, MonthCloseRequest, RideCompletionRequest};
pub use scoring::{
    ConsistencyPolicy, EfficiencyBands, RewardEngine, ScoringConfig, ScoringError, TierThresholds,
    VehicleMultipliers,
};
pub use service::{
    MonthCloseOutcome, RewardStanding, RideError, RideOutcome, RideRewardService,
};
