//! Allocation engine — turns distribution targets into a ranked plan.
//!
//! Given homeless villagers and candidate homesteads, the allocator:
//! 1. Asks the distributor for final-occupancy targets
//! 2. Emits one slot per new bed, scored once per `(homestead, target)`
//! 3. Ranks slots by predicted score and villagers by tier
//! 4. Pairs villager `i` with slot `i`
//!
//! The plan is advisory. Applying it is the caller's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use hearth_core::{HomesteadId, PickOrder, ScoringPolicy, VillagerId};

use crate::distributor::{Distribution, Target, distribute};
use crate::scorer::{Homestead, ScoreBook, ScoreOracle, Villager};

/// One free bed at a homestead, tagged with the happiness predicted once
/// the homestead reaches `final_occupancy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub homestead: HomesteadId,
    pub final_occupancy: u32,
    pub predicted_score: f64,
}

/// A single villager → homestead decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub villager: VillagerId,
    pub homestead: HomesteadId,
    pub predicted_score: f64,
    pub final_occupancy: u32,
}

/// Extra information about how a plan was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanDiagnostics {
    /// Distribution targets the slots were built from.
    pub targets: Vec<Target>,
    /// Homesteads scored by tier because the oracle failed for them.
    pub fallbacks: Vec<HomesteadId>,
    /// Slots left without a villager.
    pub surplus_slots: u32,
}

/// Output of one allocation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    /// In application order: best slots first.
    pub assignments: Vec<Assignment>,
    /// Villagers in the pool that got no slot.
    pub unplaced: u32,
    /// Free beds left across candidate homesteads once the plan is applied.
    pub remaining_capacity: u32,
    pub diagnostics: PlanDiagnostics,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Caller-selected policy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Serve higher tiers first.
    pub tier_based: bool,
    pub scoring: ScoringPolicy,
    pub pick: PickOrder,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            tier_based: true,
            scoring: ScoringPolicy::Realistic,
            pick: PickOrder::BestFirst,
        }
    }
}

/// Build slots for every target, best predicted score first.
///
/// The sort is stable: equal scores keep target order (homestead id), then
/// emission order.
pub fn build_slots(
    homesteads: &[Homestead],
    distribution: &Distribution,
    policy: ScoringPolicy,
    book: &mut ScoreBook<'_>,
) -> Vec<Slot> {
    let by_id: HashMap<&str, &Homestead> = homesteads.iter().map(|h| (h.id.as_str(), h)).collect();
    let mut slots = Vec::new();

    for target in &distribution.targets {
        let Some(homestead) = by_id.get(target.homestead.as_str()) else {
            continue;
        };
        let new_assignments = target.new_assignments();
        if new_assignments == 0 {
            continue;
        }

        let predicted_score = book.score(homestead, target.final_occupancy, policy);
        slots.extend((0..new_assignments).map(|_| Slot {
            homestead: target.homestead.clone(),
            final_occupancy: target.final_occupancy,
            predicted_score,
        }));
    }

    slots.sort_by(|a, b| b.predicted_score.total_cmp(&a.predicted_score));
    debug!(slots = slots.len(), "created housing slots with final occupancy prediction");
    slots
}

/// Order villagers for pairing.
///
/// Tier-based: highest tier first, ties keep enumeration order.
/// Otherwise enumeration order is kept as-is.
pub fn rank_villagers<'v>(villagers: &[&'v Villager], tier_based: bool) -> Vec<&'v Villager> {
    let mut ranked = villagers.to_vec();
    if tier_based {
        ranked.sort_by(|a, b| b.tier.cmp(&a.tier));
        debug!(villagers = ranked.len(), "sorted villagers by proficiency tier");
    }
    ranked
}

/// Plan housing for every homeless villager.
pub fn plan_batch_assignment(
    villagers: &[Villager],
    homesteads: &[Homestead],
    options: &PlanOptions,
    oracle: &dyn ScoreOracle,
) -> Plan {
    let homeless = homeless_pool(villagers);
    if !homeless.is_empty() {
        info!(villagers = homeless.len(), "found homeless villagers");
    }
    let ranked = rank_villagers(&homeless, options.tier_based);
    plan_for(&ranked, homesteads, options, oracle)
}

/// Plan housing for the newest homeless villager only.
///
/// "Newest" is the highest villager id; tier never decides who is picked.
pub fn plan_single_newest_assignment(
    villagers: &[Villager],
    homesteads: &[Homestead],
    options: &PlanOptions,
    oracle: &dyn ScoreOracle,
) -> Plan {
    let homeless = homeless_pool(villagers);
    let ranked = rank_villagers(&homeless, options.tier_based);

    let Some(newest) = ranked.iter().copied().max_by_key(|v| v.id) else {
        return plan_for(&[], homesteads, options, oracle);
    };
    info!(
        villager = newest.id,
        tier = newest.tier,
        "auto-assign: targeting newest villager"
    );
    plan_for(&[newest], homesteads, options, oracle)
}

fn homeless_pool(villagers: &[Villager]) -> Vec<&Villager> {
    villagers.iter().filter(|v| v.is_homeless()).collect()
}

fn plan_for(
    pool: &[&Villager],
    homesteads: &[Homestead],
    options: &PlanOptions,
    oracle: &dyn ScoreOracle,
) -> Plan {
    let free_beds: u32 = homesteads
        .iter()
        .filter(|h| h.is_candidate())
        .map(Homestead::free_beds)
        .sum();
    let requested = u32::try_from(pool.len()).unwrap_or(u32::MAX);

    if pool.is_empty() {
        debug!("no homeless villagers found");
        return Plan {
            remaining_capacity: free_beds,
            ..Plan::default()
        };
    }
    if free_beds == 0 {
        warn!(villagers = requested, "no available homesteads");
        return Plan {
            unplaced: requested,
            ..Plan::default()
        };
    }

    let candidates = homesteads.iter().filter(|h| h.is_candidate()).count();
    info!(
        villagers = requested,
        homesteads = candidates,
        "assigning villagers to available homesteads"
    );

    let mut book = ScoreBook::new(oracle);
    let distribution = distribute(homesteads, requested, options.pick, &mut book);
    let slots = build_slots(homesteads, &distribution, options.scoring, &mut book);

    let assignments: Vec<Assignment> = pool
        .iter()
        .zip(&slots)
        .map(|(villager, slot)| {
            debug!(
                villager = villager.id,
                tier = u32::from(villager.tier) + 1,
                homestead = %slot.homestead,
                score = slot.predicted_score,
                occupancy = slot.final_occupancy,
                "planned assignment"
            );
            Assignment {
                villager: villager.id,
                homestead: slot.homestead.clone(),
                predicted_score: slot.predicted_score,
                final_occupancy: slot.final_occupancy,
            }
        })
        .collect();

    let assigned = u32::try_from(assignments.len()).unwrap_or(u32::MAX);
    let unplaced = requested.saturating_sub(assigned);
    let surplus_slots = u32::try_from(slots.len())
        .unwrap_or(u32::MAX)
        .saturating_sub(assigned);

    if unplaced > 0 {
        warn!(unplaced, "not enough free beds for every homeless villager");
    }

    Plan {
        assignments,
        unplaced,
        remaining_capacity: free_beds.saturating_sub(assigned),
        diagnostics: PlanDiagnostics {
            targets: distribution.targets,
            fallbacks: book.into_fallbacks(),
            surplus_slots,
        },
    }
}
