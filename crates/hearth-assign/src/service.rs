//! Assignment service — snapshot, plan, apply.

use std::sync::Arc;

use tracing::{debug, info, warn};

use hearth_core::HearthConfig;
use hearth_placement::{
    BedStats, Plan, ScoreOracle, SnapshotOracle, bed_stats, config_to_options,
    plan_batch_assignment, plan_single_newest_assignment, snapshot_to_homesteads,
    snapshot_to_villagers,
};

use crate::apply::{ApplyReport, apply_plan};
use crate::error::AssignResult;
use crate::village::Village;

/// What one assignment cycle decided and what actually happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentOutcome {
    pub plan: Plan,
    pub report: ApplyReport,
}

/// Oracle shared across cycles, overriding the snapshot scores.
pub type SharedOracle = Arc<dyn ScoreOracle + Send + Sync>;

/// Runs assignment cycles against a [`Village`].
///
/// Every cycle takes `&mut self`, so cycles on one village never overlap.
pub struct AssignmentService<V> {
    village: V,
    config: HearthConfig,
    oracle: Option<SharedOracle>,
}

impl<V: Village> AssignmentService<V> {
    pub fn new(village: V, config: HearthConfig) -> Self {
        Self {
            village,
            config,
            oracle: None,
        }
    }

    /// Score with `oracle` instead of the scores carried by the snapshot.
    pub fn with_oracle(mut self, oracle: SharedOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &HearthConfig {
        &self.config
    }

    pub fn village(&self) -> &V {
        &self.village
    }

    pub fn into_village(self) -> V {
        self.village
    }

    /// House homeless villagers: all of them, or only the newest.
    pub fn assign_homeless(&mut self, only_newest: bool) -> AssignResult<AssignmentOutcome> {
        if !self.config.general.enabled {
            debug!("assignment disabled in config");
            return Ok(AssignmentOutcome::default());
        }

        let snapshot = self.village.snapshot()?;
        let villagers = snapshot_to_villagers(&snapshot);
        let homesteads = snapshot_to_homesteads(&snapshot, self.config.housing.include_outposts);
        let options = config_to_options(&self.config);

        let snapshot_oracle = SnapshotOracle::new(&snapshot);
        let oracle: &dyn ScoreOracle = match &self.oracle {
            Some(shared) => shared.as_ref(),
            None => &snapshot_oracle,
        };

        let plan = if only_newest {
            plan_single_newest_assignment(&villagers, &homesteads, &options, oracle)
        } else {
            plan_batch_assignment(&villagers, &homesteads, &options, oracle)
        };

        let report = apply_plan(&plan, &mut self.village);
        if !plan.is_empty() {
            info!(
                placed = report.placed_count(),
                unplaced = plan.unplaced,
                fallbacks = plan.diagnostics.fallbacks.len(),
                "assignment complete"
            );
        }

        Ok(AssignmentOutcome { plan, report })
    }

    /// Release every housed villager. Returns how many were released.
    pub fn make_all_homeless(&mut self) -> AssignResult<u32> {
        if !self.config.general.enabled {
            debug!("release disabled in config");
            return Ok(0);
        }

        let snapshot = self.village.snapshot()?;
        let mut released = 0u32;

        for villager in snapshot.villagers.iter().filter(|v| !v.is_homeless()) {
            match self.village.release(villager.id) {
                Ok(()) => released += 1,
                Err(e) => warn!(villager = villager.id, error = %e, "failed to release villager"),
            }
        }

        info!(released, "made villagers homeless");
        Ok(released)
    }

    /// Bed counts across homesteads the config makes eligible.
    pub fn bed_stats(&self) -> AssignResult<BedStats> {
        let snapshot = self.village.snapshot()?;
        let homesteads = snapshot_to_homesteads(&snapshot, self.config.housing.include_outposts);
        Ok(bed_stats(&homesteads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{HomesteadRecord, VillageSnapshot, VillagerId, VillagerRecord};
    use hearth_placement::{Homestead, OracleError};

    use crate::error::PlacementError;
    use crate::village::SnapshotVillage;

    fn villager(id: VillagerId, tier: u8, homestead: Option<&str>) -> VillagerRecord {
        VillagerRecord {
            id,
            name: format!("villager-{id}"),
            tier,
            homestead: homestead.map(str::to_string),
        }
    }

    fn homestead(id: &str, kind: &str, occupants: u32, capacity: u32, base: Option<f64>) -> HomesteadRecord {
        HomesteadRecord {
            id: id.to_string(),
            kind: kind.to_string(),
            occupants,
            capacity,
            outpost_id: 0,
            active: true,
            base_score: base,
            occupancy_curve: Vec::new(),
        }
    }

    fn test_snapshot() -> VillageSnapshot {
        VillageSnapshot {
            villagers: vec![
                villager(1, 0, None),
                villager(2, 3, None),
                villager(3, 1, Some("hut")),
            ],
            homesteads: vec![
                homestead("hut", "shelter_l1", 1, 2, Some(20.0)),
                homestead("longhouse", "house_l2", 0, 4, Some(80.0)),
            ],
        }
    }

    #[test]
    fn assigns_all_homeless() {
        let mut service = AssignmentService::new(SnapshotVillage::new(test_snapshot()), HearthConfig::default());

        let outcome = service.assign_homeless(false).unwrap();

        assert_eq!(outcome.report.placed_count(), 2);
        assert!(outcome.report.is_clean());
        let state = service.village().state();
        assert!(state.villagers.iter().all(|v| v.homestead.is_some()));
    }

    #[test]
    fn assigns_only_newest() {
        let mut service = AssignmentService::new(SnapshotVillage::new(test_snapshot()), HearthConfig::default());

        let outcome = service.assign_homeless(true).unwrap();

        assert_eq!(outcome.plan.assignments.len(), 1);
        assert_eq!(outcome.plan.assignments[0].villager, 2);
        assert!(service.village().state().villagers[0].homestead.is_none());
    }

    #[test]
    fn disabled_config_is_noop() {
        let mut config = HearthConfig::default();
        config.general.enabled = false;
        let mut service = AssignmentService::new(SnapshotVillage::new(test_snapshot()), config);

        let outcome = service.assign_homeless(false).unwrap();

        assert_eq!(outcome, AssignmentOutcome::default());
        assert!(service.village().state().villagers[0].homestead.is_none());
    }

    #[test]
    fn injected_oracle_overrides_snapshot_scores() {
        let prefers_hut = |h: &Homestead, _: u32| -> Result<f64, OracleError> {
            Ok(if h.id == "hut" { 100.0 } else { 1.0 })
        };
        let mut service = AssignmentService::new(SnapshotVillage::new(test_snapshot()), HearthConfig::default())
            .with_oracle(Arc::new(prefers_hut));

        let outcome = service.assign_homeless(true).unwrap();

        assert_eq!(outcome.plan.assignments[0].homestead, "hut");
    }

    #[test]
    fn make_all_homeless_releases_everyone() {
        let mut service = AssignmentService::new(SnapshotVillage::new(test_snapshot()), HearthConfig::default());
        service.assign_homeless(false).unwrap();

        let released = service.make_all_homeless().unwrap();

        assert_eq!(released, 3);
        let state = service.village().state();
        assert!(state.villagers.iter().all(|v| v.homestead.is_none()));
        assert!(state.homesteads.iter().all(|h| h.occupants == 0));
    }

    #[test]
    fn disabled_config_keeps_everyone_housed() {
        let mut config = HearthConfig::default();
        config.general.enabled = false;
        let mut service = AssignmentService::new(SnapshotVillage::new(test_snapshot()), config);

        assert_eq!(service.make_all_homeless().unwrap(), 0);
        assert_eq!(service.village().state().villagers[2].homestead.as_deref(), Some("hut"));
        assert_eq!(service.village().state().homesteads[0].occupants, 1);
        // Bed counts stay readable.
        assert_eq!(service.bed_stats().unwrap().free, 5);
    }

    #[test]
    fn bed_stats_follow_outpost_setting() {
        let mut snapshot = test_snapshot();
        let mut outpost = homestead("camp", "house_l1", 0, 3, None);
        outpost.outpost_id = 4;
        snapshot.homesteads.push(outpost);

        let service = AssignmentService::new(SnapshotVillage::new(snapshot.clone()), HearthConfig::default());
        assert_eq!(service.bed_stats().unwrap(), BedStats { total: 6, used: 1, free: 5 });

        let mut config = HearthConfig::default();
        config.housing.include_outposts = true;
        let service = AssignmentService::new(SnapshotVillage::new(snapshot), config);
        assert_eq!(service.bed_stats().unwrap().free, 8);
    }

    struct StubbornVillage {
        inner: SnapshotVillage,
        refuse: VillagerId,
    }

    impl Village for StubbornVillage {
        fn snapshot(&self) -> AssignResult<VillageSnapshot> {
            self.inner.snapshot()
        }

        fn assign(&mut self, villager: VillagerId, homestead: &str) -> Result<(), PlacementError> {
            if villager == self.refuse {
                return Err(PlacementError::Rejected("workstation busy".to_string()));
            }
            self.inner.assign(villager, homestead)
        }

        fn release(&mut self, villager: VillagerId) -> Result<(), PlacementError> {
            self.inner.release(villager)
        }
    }

    #[test]
    fn placement_failure_is_reported_not_fatal() {
        let village = StubbornVillage {
            inner: SnapshotVillage::new(test_snapshot()),
            refuse: 2,
        };
        let mut service = AssignmentService::new(village, HearthConfig::default());

        let outcome = service.assign_homeless(false).unwrap();

        assert_eq!(outcome.report.placed_count(), 1);
        assert_eq!(outcome.report.failed.len(), 1);
        assert_eq!(outcome.report.failed[0].assignment.villager, 2);
    }
}
