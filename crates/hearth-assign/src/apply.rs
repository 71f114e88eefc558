//! Plan executor — applies a `Plan` to a village.
//!
//! Each assignment is applied on its own. A rejected pair is recorded and
//! logged, and the remaining pairs still go through.

use tracing::{debug, error, info};

use hearth_placement::{Assignment, Plan};

use crate::error::PlacementError;
use crate::village::Village;

/// An assignment the village refused.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAssignment {
    pub assignment: Assignment,
    pub error: PlacementError,
}

/// Result of applying a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub placed: Vec<Assignment>,
    pub failed: Vec<FailedAssignment>,
}

impl ApplyReport {
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply every assignment in `plan`, in plan order.
pub fn apply_plan<V: Village + ?Sized>(plan: &Plan, village: &mut V) -> ApplyReport {
    let mut report = ApplyReport::default();

    for assignment in &plan.assignments {
        match village.assign(assignment.villager, &assignment.homestead) {
            Ok(()) => {
                debug!(
                    villager = assignment.villager,
                    homestead = %assignment.homestead,
                    score = assignment.predicted_score,
                    occupancy = assignment.final_occupancy,
                    "assigned villager"
                );
                report.placed.push(assignment.clone());
            }
            Err(e) => {
                error!(
                    villager = assignment.villager,
                    homestead = %assignment.homestead,
                    error = %e,
                    "failed to assign villager"
                );
                report.failed.push(FailedAssignment {
                    assignment: assignment.clone(),
                    error: e,
                });
            }
        }
    }

    if !plan.assignments.is_empty() {
        info!(
            placed = report.placed.len(),
            failed = report.failed.len(),
            "plan applied"
        );
    }
    report
}
