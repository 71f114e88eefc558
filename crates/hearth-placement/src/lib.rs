//! Hearth placement engine — happiness-maximizing homestead assignment.
//!
//! This crate decides where homeless villagers should live. It never
//! touches a live village: callers hand it a snapshot (villagers,
//! homesteads, a score oracle) and receive a [`Plan`] to apply themselves
//! (that's `hearth-assign`).
//!
//! # Components
//!
//! - **`scorer`** — Score oracle contract, tier fallback, per-call score memo
//! - **`distributor`** — Incremental greedy final-occupancy targets
//! - **`allocator`** — Slots, villager ranking, positional pairing into a plan
//! - **`convert`** — Snapshot → placement types, snapshot-backed oracle, bed stats

pub mod allocator;
pub mod convert;
pub mod distributor;
pub mod scorer;

pub use allocator::{
    Assignment, Plan, PlanDiagnostics, PlanOptions, Slot, build_slots, plan_batch_assignment,
    plan_single_newest_assignment, rank_villagers,
};
pub use convert::{
    BedStats, SnapshotOracle, bed_stats, config_to_options, occupancy_multiplier,
    snapshot_to_homesteads, snapshot_to_villagers,
};
pub use distributor::{Distribution, Target, distribute};
pub use hearth_core::{PickOrder, ScoringPolicy};
pub use scorer::{Homestead, OracleError, ScoreBook, ScoreOracle, Villager, tier_rank, tier_score};
