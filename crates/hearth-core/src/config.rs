//! hearth.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::types::{PickOrder, ScoringPolicy};

/// Shortest allowed auto-assign delay in seconds.
pub const MIN_AUTO_ASSIGN_DELAY_SECS: f64 = 1.0;
/// Longest allowed auto-assign delay in seconds.
pub const MAX_AUTO_ASSIGN_DELAY_SECS: f64 = 10.0;
/// Auto-assign delay used when the config omits it.
pub const DEFAULT_AUTO_ASSIGN_DELAY_SECS: f64 = 3.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HearthConfig {
    pub general: GeneralConfig,
    pub housing: HousingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master switch. When off, assignment and release requests are
    /// ignored. Bed statistics stay readable.
    pub enabled: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingConfig {
    /// House newly spawned villagers automatically.
    pub auto_house_new_villagers: bool,
    /// Seconds between a spawn and its auto-assignment.
    pub auto_assign_delay_secs: f64,
    /// Serve higher proficiency tiers first.
    pub tier_based_housing: bool,
    /// Score slots with predicted happiness instead of house class.
    pub use_happiness_scoring: bool,
    /// Consider outpost homesteads as well as the main village.
    pub include_outposts: bool,
    pub pick_order: PickOrder,
}

impl Default for HousingConfig {
    fn default() -> Self {
        Self {
            auto_house_new_villagers: true,
            auto_assign_delay_secs: DEFAULT_AUTO_ASSIGN_DELAY_SECS,
            tier_based_housing: true,
            use_happiness_scoring: true,
            include_outposts: false,
            pick_order: PickOrder::BestFirst,
        }
    }
}

impl HousingConfig {
    pub fn scoring_policy(&self) -> ScoringPolicy {
        if self.use_happiness_scoring {
            ScoringPolicy::Realistic
        } else {
            ScoringPolicy::TierFallback
        }
    }

    /// Auto-assign delay clamped to `1..=10` seconds.
    ///
    /// Non-finite values fall back to the default delay.
    pub fn auto_assign_delay(&self) -> Duration {
        let secs = if self.auto_assign_delay_secs.is_finite() {
            self.auto_assign_delay_secs
                .clamp(MIN_AUTO_ASSIGN_DELAY_SECS, MAX_AUTO_ASSIGN_DELAY_SECS)
        } else {
            DEFAULT_AUTO_ASSIGN_DELAY_SECS
        };
        Duration::from_secs_f64(secs)
    }
}

impl HearthConfig {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HearthConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a hearth.toml with every option spelled out.
    pub fn scaffold() -> Self {
        Self::default()
    }

    /// Whether spawn triggers should lead to an assignment at all.
    pub fn auto_assign_enabled(&self) -> bool {
        self.general.enabled && self.housing.auto_house_new_villagers
    }
}
