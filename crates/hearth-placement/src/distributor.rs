//! Greedy distribution — how many villagers each homestead should end up with.
//!
//! Villagers are placed one at a time on a simulated copy of the occupancy
//! counts. Each step re-scores every homestead that still has a free bed at
//! `occupancy + 1` and takes the best (or worst) one. Re-scoring every step
//! matters: a homestead's marginal value changes as it fills, and the
//! occupancy curve is not assumed to be monotonic.
//!
//! Ties go to the lowest homestead id, so the result does not depend on the
//! order the caller enumerated homesteads in.

use serde::Serialize;
use tracing::debug;

use hearth_core::{HomesteadId, PickOrder};

use crate::scorer::{Homestead, ScoreBook};

/// Final occupancy a homestead should reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub homestead: HomesteadId,
    /// Occupants before this plan.
    pub occupants: u32,
    pub final_occupancy: u32,
}

impl Target {
    pub fn new_assignments(&self) -> u32 {
        self.final_occupancy.saturating_sub(self.occupants)
    }
}

/// Output of [`distribute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    /// Only homesteads that gain occupants, in id order.
    pub targets: Vec<Target>,
    /// Villagers that did not fit anywhere.
    pub unplaced: u32,
}

impl Distribution {
    pub fn placed(&self) -> u32 {
        self.targets.iter().map(Target::new_assignments).sum()
    }

    pub fn target_for(&self, homestead: &str) -> Option<u32> {
        self.targets
            .iter()
            .find(|t| t.homestead == homestead)
            .map(|t| t.final_occupancy)
    }
}

/// Decide final occupancies for `count` villagers across `homesteads`.
///
/// Ineligible and full homesteads are ignored. Scores come from
/// [`ScoreBook::realistic`] regardless of the slot scoring policy.
pub fn distribute(
    homesteads: &[Homestead],
    count: u32,
    pick: PickOrder,
    book: &mut ScoreBook<'_>,
) -> Distribution {
    let mut candidates: Vec<&Homestead> = homesteads.iter().filter(|h| h.is_candidate()).collect();
    candidates.sort_by(|a, b| a.id.cmp(&b.id));

    let mut simulated: Vec<u32> = candidates.iter().map(|h| h.occupants).collect();
    let mut remaining = count;

    debug!(
        villagers = count,
        homesteads = candidates.len(),
        ?pick,
        "greedy distribution starting"
    );

    while remaining > 0 {
        let mut chosen: Option<(usize, f64)> = None;

        for (idx, (homestead, &occupancy)) in candidates.iter().zip(&simulated).enumerate() {
            if occupancy >= homestead.capacity {
                continue;
            }
            let score = book.realistic(homestead, occupancy + 1);
            let better = match chosen {
                None => true,
                Some((_, best)) => match pick {
                    PickOrder::BestFirst => score > best,
                    PickOrder::WorstFirst => score < best,
                },
            };
            if better {
                chosen = Some((idx, score));
            }
        }

        let Some((idx, score)) = chosen else {
            break;
        };
        let (Some(homestead), Some(occupancy)) = (candidates.get(idx), simulated.get_mut(idx)) else {
            break;
        };
        *occupancy += 1;
        remaining -= 1;

        debug!(
            homestead = %homestead.id,
            occupancy = *occupancy,
            capacity = homestead.capacity,
            score,
            "placed villager"
        );
    }

    let targets: Vec<Target> = candidates
        .iter()
        .zip(simulated)
        .filter(|(h, occupancy)| *occupancy > h.occupants)
        .map(|(h, occupancy)| Target {
            homestead: h.id.clone(),
            occupants: h.occupants,
            final_occupancy: occupancy,
        })
        .collect();

    debug!(
        placed = count - remaining,
        requested = count,
        "distribution complete"
    );

    Distribution {
        targets,
        unplaced: remaining,
    }
}
