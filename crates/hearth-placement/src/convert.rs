//! Type conversions between village snapshots and placement types.
//!
//! Bridges `hearth_core::{VillageSnapshot, HearthConfig}` to the placement
//! engine's `Villager`, `Homestead` and `PlanOptions`, and provides
//! [`SnapshotOracle`], a score oracle backed by the scores recorded in the
//! snapshot.

use std::collections::HashMap;

use serde::Serialize;

use hearth_core::{
    CurveKey, HearthConfig, HomesteadRecord, VillageSnapshot, VillagerRecord,
};

use crate::allocator::PlanOptions;
use crate::scorer::{Homestead, OracleError, ScoreOracle, Villager};

/// Convert a [`VillagerRecord`] to a placement [`Villager`].
pub fn villager_from_record(record: &VillagerRecord) -> Villager {
    Villager {
        id: record.id,
        tier: record.tier,
        homestead: record.homestead.clone(),
    }
}

/// Convert a [`HomesteadRecord`] to a placement [`Homestead`].
///
/// A homestead is eligible when it is active, of a known class, and in the
/// main village. `include_outposts` lifts the last condition.
pub fn homestead_from_record(record: &HomesteadRecord, include_outposts: bool) -> Homestead {
    let class = record.class();
    let in_village = include_outposts || record.outpost_id == 0;
    Homestead {
        id: record.id.clone(),
        class,
        occupants: record.occupants,
        capacity: record.capacity,
        eligible: record.active && class.is_known() && in_village,
    }
}

pub fn snapshot_to_villagers(snapshot: &VillageSnapshot) -> Vec<Villager> {
    snapshot.villagers.iter().map(villager_from_record).collect()
}

pub fn snapshot_to_homesteads(snapshot: &VillageSnapshot, include_outposts: bool) -> Vec<Homestead> {
    snapshot
        .homesteads
        .iter()
        .map(|h| homestead_from_record(h, include_outposts))
        .collect()
}

/// Convert the `[housing]` section of a [`HearthConfig`] to [`PlanOptions`].
pub fn config_to_options(config: &HearthConfig) -> PlanOptions {
    PlanOptions {
        tier_based: config.housing.tier_based_housing,
        scoring: config.housing.scoring_policy(),
        pick: config.housing.pick_order,
    }
}

/// Bed counts across eligible homesteads, full ones included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BedStats {
    pub total: u32,
    pub used: u32,
    pub free: u32,
}

pub fn bed_stats(homesteads: &[Homestead]) -> BedStats {
    let (total, used) = homesteads
        .iter()
        .filter(|h| h.eligible)
        .fold((0u32, 0u32), |(total, used), h| {
            (total.saturating_add(h.capacity), used.saturating_add(h.occupants))
        });
    BedStats {
        total,
        used,
        free: total.saturating_sub(used),
    }
}

/// Evaluate an occupancy multiplier curve.
///
/// Keyframes are interpolated linearly and clamped at both ends. An empty
/// curve gives `1 / max(1, occupants)`.
pub fn occupancy_multiplier(curve: &[CurveKey], occupants: u32) -> f64 {
    let x = f64::from(occupants);

    let mut keys: Vec<CurveKey> = curve.to_vec();
    keys.sort_by(|a, b| a.occupants.total_cmp(&b.occupants));

    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return 1.0 / x.max(1.0);
    };
    if x <= first.occupants {
        return first.multiplier;
    }
    if x >= last.occupants {
        return last.multiplier;
    }

    for pair in keys.windows(2) {
        let [lo, hi] = pair else { continue };
        if x <= hi.occupants {
            let span = hi.occupants - lo.occupants;
            if span <= f64::EPSILON {
                return hi.multiplier;
            }
            let t = (x - lo.occupants) / span;
            return lo.multiplier + t * (hi.multiplier - lo.multiplier);
        }
    }
    last.multiplier
}

/// Score oracle backed by the base scores and curves in a snapshot.
///
/// `score = base_score * occupancy_multiplier(curve, final_occupancy)`.
/// Homesteads without a base score report [`OracleError::Unavailable`],
/// which sends them to tier fallback.
pub struct SnapshotOracle<'a> {
    records: HashMap<&'a str, &'a HomesteadRecord>,
}

impl<'a> SnapshotOracle<'a> {
    pub fn new(snapshot: &'a VillageSnapshot) -> Self {
        Self {
            records: snapshot
                .homesteads
                .iter()
                .map(|h| (h.id.as_str(), h))
                .collect(),
        }
    }
}

impl ScoreOracle for SnapshotOracle<'_> {
    fn score(&self, homestead: &Homestead, final_occupancy: u32) -> Result<f64, OracleError> {
        let record = self
            .records
            .get(homestead.id.as_str())
            .ok_or_else(|| OracleError::Unavailable(homestead.id.clone()))?;
        let base = record
            .base_score
            .ok_or_else(|| OracleError::Unavailable(homestead.id.clone()))?;
        Ok(base * occupancy_multiplier(&record.occupancy_curve, final_occupancy))
    }
}
