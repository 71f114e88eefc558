//! hearth-assign — applying placement plans to a village.
//!
//! The placement engine only plans. This crate closes the loop:
//!
//! - Reads a snapshot from a [`Village`] and plans with `hearth-placement`
//! - Applies each assignment, collecting per-pair failures without aborting
//! - Releases every housed villager ("make all homeless")
//! - Runs delayed single-villager assignment after spawns
//!
//! # Architecture
//!
//! ```text
//! AutoAssigner (tokio task, debounced trigger)
//!   └── AssignmentService (one cycle at a time)
//!       ├── Village (snapshot, assign, release)
//!       ├── hearth-placement (plan)
//!       └── apply_plan (per-pair outcomes)
//! ```

pub mod apply;
pub mod auto;
pub mod error;
pub mod service;
pub mod village;

pub use apply::{ApplyReport, FailedAssignment, apply_plan};
pub use auto::{AutoAssignHandle, AutoAssigner};
pub use error::{AssignError, AssignResult, PlacementError};
pub use service::{AssignmentOutcome, AssignmentService};
pub use village::{SnapshotVillage, Village};
