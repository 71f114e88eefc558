//! Homestead scoring for placement decisions.
//!
//! Happiness predictions come from an injected [`ScoreOracle`]. When the
//! oracle cannot score a homestead, that homestead falls back to a static
//! class ranking for the rest of the call:
//!
//! ```text
//! tier_score = tier_rank(class) * 100
//! tier_rank:  house_l2 = 3, house_l1 = 2, shelter_l1 = 1, unknown = 0
//! ```
//!
//! [`ScoreBook`] memoizes oracle answers per `(homestead, final occupancy)`
//! so one allocation call never asks the same question twice.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;
use tracing::warn;

use hearth_core::{HomesteadClass, HomesteadId, ScoringPolicy, VillagerId};

/// A homestead candidate for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Homestead {
    pub id: HomesteadId,
    pub class: HomesteadClass,
    pub occupants: u32,
    pub capacity: u32,
    /// Decided by the caller (main village, active, known class, ...).
    pub eligible: bool,
}

impl Homestead {
    pub fn free_beds(&self) -> u32 {
        self.capacity.saturating_sub(self.occupants)
    }

    /// Eligible and has at least one free bed.
    pub fn is_candidate(&self) -> bool {
        self.eligible && self.free_beds() > 0
    }
}

/// A villager that may need housing.
#[derive(Debug, Clone, PartialEq)]
pub struct Villager {
    pub id: VillagerId,
    pub tier: u8,
    pub homestead: Option<HomesteadId>,
}

impl Villager {
    pub fn is_homeless(&self) -> bool {
        self.homestead.is_none()
    }
}

/// Why the oracle could not score a homestead.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no score data for homestead {0}")]
    Unavailable(HomesteadId),

    #[error("scoring failed for homestead {homestead} at {occupancy} occupants: {reason}")]
    Failed {
        homestead: HomesteadId,
        occupancy: u32,
        reason: String,
    },
}

/// Predicts happiness for a homestead once it holds `final_occupancy` villagers.
///
/// Implementations must be deterministic for a fixed snapshot.
/// `final_occupancy` ranges over `1..=capacity`.
pub trait ScoreOracle {
    fn score(&self, homestead: &Homestead, final_occupancy: u32) -> Result<f64, OracleError>;
}

impl<F> ScoreOracle for F
where
    F: Fn(&Homestead, u32) -> Result<f64, OracleError>,
{
    fn score(&self, homestead: &Homestead, final_occupancy: u32) -> Result<f64, OracleError> {
        self(homestead, final_occupancy)
    }
}

/// Static class ranking used when happiness scoring is off or unavailable.
pub fn tier_rank(class: HomesteadClass) -> u32 {
    match class {
        HomesteadClass::HouseL2 => 3,
        HomesteadClass::HouseL1 => 2,
        HomesteadClass::ShelterL1 => 1,
        HomesteadClass::Unknown => 0,
    }
}

pub fn tier_score(homestead: &Homestead) -> f64 {
    f64::from(tier_rank(homestead.class)) * 100.0
}

/// Per-call score memo with sticky tier fallback.
pub struct ScoreBook<'a> {
    oracle: &'a dyn ScoreOracle,
    realistic: HashMap<HomesteadId, BTreeMap<u32, f64>>,
    fallbacks: BTreeSet<HomesteadId>,
}

impl<'a> ScoreBook<'a> {
    pub fn new(oracle: &'a dyn ScoreOracle) -> Self {
        Self {
            oracle,
            realistic: HashMap::new(),
            fallbacks: BTreeSet::new(),
        }
    }

    /// Predicted happiness at `final_occupancy`, falling back to the tier score.
    ///
    /// A pair that was already answered keeps its answer even if the
    /// homestead later falls back.
    pub fn realistic(&mut self, homestead: &Homestead, final_occupancy: u32) -> f64 {
        if let Some(&score) = self
            .realistic
            .get(&homestead.id)
            .and_then(|scores| scores.get(&final_occupancy))
        {
            return score;
        }

        if self.fallbacks.contains(&homestead.id) {
            return tier_score(homestead);
        }

        match self.oracle.score(homestead, final_occupancy) {
            Ok(score) if score.is_finite() => {
                self.realistic
                    .entry(homestead.id.clone())
                    .or_default()
                    .insert(final_occupancy, score);
                score
            }
            Ok(score) => {
                warn!(
                    homestead = %homestead.id,
                    occupancy = final_occupancy,
                    score,
                    "oracle returned a non-finite score, using tier fallback"
                );
                self.fall_back(homestead)
            }
            Err(e) => {
                warn!(
                    homestead = %homestead.id,
                    occupancy = final_occupancy,
                    error = %e,
                    "oracle failed, using tier fallback"
                );
                self.fall_back(homestead)
            }
        }
    }

    /// Score under the caller's chosen policy.
    pub fn score(&mut self, homestead: &Homestead, final_occupancy: u32, policy: ScoringPolicy) -> f64 {
        match policy {
            ScoringPolicy::Realistic => self.realistic(homestead, final_occupancy),
            ScoringPolicy::TierFallback => tier_score(homestead),
        }
    }

    pub fn is_fallback(&self, homestead: &str) -> bool {
        self.fallbacks.contains(homestead)
    }

    /// Homesteads that fell back to tier scoring, in id order.
    pub fn into_fallbacks(self) -> Vec<HomesteadId> {
        self.fallbacks.into_iter().collect()
    }

    fn fall_back(&mut self, homestead: &Homestead) -> f64 {
        self.fallbacks.insert(homestead.id.clone());
        tier_score(homestead)
    }
}
