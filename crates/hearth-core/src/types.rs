//! Shared types used across Hearth crates.
//!
//! A [`VillageSnapshot`] is an immutable picture of the village at one
//! instant: every villager with its housing state and every homestead with
//! its occupancy. Snapshots are plain serde values loaded from JSON or TOML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Unique identifier for a villager. Higher ids were created later.
pub type VillagerId = u64;

/// Unique identifier for a homestead.
pub type HomesteadId = String;

// ── Policies ──────────────────────────────────────────────────────

/// How slot scores are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Ask the score oracle for the predicted happiness.
    #[default]
    Realistic,
    /// Rank homesteads by class only (`tier_rank * 100`).
    TierFallback,
}

/// Which end of the score range the distributor fills first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickOrder {
    #[default]
    BestFirst,
    WorstFirst,
}

// ── Homestead classes ─────────────────────────────────────────────

/// Building class of a homestead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomesteadClass {
    ShelterL1,
    HouseL1,
    HouseL2,
    Unknown,
}

impl HomesteadClass {
    /// Parse a class from its snapshot name.
    ///
    /// Accepts `house_l2` as well as the in-game prefab name
    /// `House_L2(Clone)`. Anything else maps to [`HomesteadClass::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        let name = name.strip_suffix("(Clone)").unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "shelter_l1" => Self::ShelterL1,
            "house_l1" => Self::HouseL1,
            "house_l2" => Self::HouseL2,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

// ── Snapshot records ──────────────────────────────────────────────

/// A villager as seen in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VillagerRecord {
    pub id: VillagerId,
    #[serde(default)]
    pub name: String,
    /// Proficiency tier (0-based).
    #[serde(default)]
    pub tier: u8,
    /// Homestead the villager lives in, `None` when homeless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homestead: Option<HomesteadId>,
}

impl VillagerRecord {
    pub fn is_homeless(&self) -> bool {
        self.homestead.is_none()
    }
}

/// One keyframe of a homestead's occupancy multiplier curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveKey {
    pub occupants: f64,
    pub multiplier: f64,
}

/// A homestead as seen in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomesteadRecord {
    pub id: HomesteadId,
    /// Class name, e.g. `house_l1` or `House_L1(Clone)`.
    pub kind: String,
    #[serde(default)]
    pub occupants: u32,
    pub capacity: u32,
    /// 0 for the main village.
    #[serde(default)]
    pub outpost_id: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Comfort plus area desirability, when the world could report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupancy_curve: Vec<CurveKey>,
}

fn default_active() -> bool {
    true
}

impl HomesteadRecord {
    pub fn class(&self) -> HomesteadClass {
        HomesteadClass::from_name(&self.kind)
    }

    pub fn free_beds(&self) -> u32 {
        self.capacity.saturating_sub(self.occupants)
    }
}

/// Point-in-time view of the village.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VillageSnapshot {
    #[serde(default)]
    pub villagers: Vec<VillagerRecord>,
    #[serde(default)]
    pub homesteads: Vec<HomesteadRecord>,
}

impl VillageSnapshot {
    /// Load a snapshot from a `.json` or `.toml` file and validate it.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: VillageSnapshot = match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(CoreError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Write the snapshot, picking the format from the file extension.
    pub fn write_to_file(&self, path: &Path) -> CoreResult<()> {
        let content = match extension(path).as_deref() {
            Some("json") => self.to_json_string()?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(CoreError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject snapshots with duplicate villager or homestead ids.
    pub fn validate(&self) -> CoreResult<()> {
        let mut villagers = HashSet::new();
        for v in &self.villagers {
            if !villagers.insert(v.id) {
                return Err(CoreError::DuplicateVillager(v.id));
            }
        }
        let mut homesteads = HashSet::new();
        for h in &self.homesteads {
            if !homesteads.insert(h.id.as_str()) {
                return Err(CoreError::DuplicateHomestead(h.id.clone()));
            }
        }
        Ok(())
    }

    pub fn homeless(&self) -> impl Iterator<Item = &VillagerRecord> {
        self.villagers.iter().filter(|v| v.is_homeless())
    }

    pub fn villager_mut(&mut self, id: VillagerId) -> Option<&mut VillagerRecord> {
        self.villagers.iter_mut().find(|v| v.id == id)
    }

    pub fn homestead_mut(&mut self, id: &str) -> Option<&mut HomesteadRecord> {
        self.homesteads.iter_mut().find(|h| h.id == id)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
