//! The village seen from the assignment side.
//!
//! [`Village`] is everything the service needs from the outside world: a
//! coherent snapshot, and primitives to move one villager in or out of a
//! homestead. [`SnapshotVillage`] implements it over an in-memory snapshot.

use hearth_core::{VillageSnapshot, VillagerId};

use crate::error::{AssignResult, PlacementError};

pub trait Village {
    /// A coherent picture of villagers and homesteads.
    fn snapshot(&self) -> AssignResult<VillageSnapshot>;

    /// Move a homeless villager into a homestead.
    fn assign(&mut self, villager: VillagerId, homestead: &str) -> Result<(), PlacementError>;

    /// Make a housed villager homeless.
    fn release(&mut self, villager: VillagerId) -> Result<(), PlacementError>;
}

/// A village that lives entirely in a [`VillageSnapshot`].
///
/// Assignments update both the villager's homestead and the homestead's
/// occupant count, and refuse to overfill.
#[derive(Debug, Clone, Default)]
pub struct SnapshotVillage {
    state: VillageSnapshot,
}

impl SnapshotVillage {
    pub fn new(state: VillageSnapshot) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &VillageSnapshot {
        &self.state
    }

    pub fn into_snapshot(self) -> VillageSnapshot {
        self.state
    }
}

impl Village for SnapshotVillage {
    fn snapshot(&self) -> AssignResult<VillageSnapshot> {
        Ok(self.state.clone())
    }

    fn assign(&mut self, villager: VillagerId, homestead: &str) -> Result<(), PlacementError> {
        let record = self
            .state
            .villagers
            .iter()
            .find(|v| v.id == villager)
            .ok_or(PlacementError::VillagerNotFound(villager))?;
        if let Some(current) = &record.homestead {
            return Err(PlacementError::AlreadyHoused {
                villager,
                homestead: current.clone(),
            });
        }

        let target = self
            .state
            .homestead_mut(homestead)
            .ok_or_else(|| PlacementError::HomesteadNotFound(homestead.to_string()))?;
        if target.free_beds() == 0 {
            return Err(PlacementError::HomesteadFull(homestead.to_string()));
        }
        target.occupants += 1;

        if let Some(record) = self.state.villager_mut(villager) {
            record.homestead = Some(homestead.to_string());
        }
        Ok(())
    }

    fn release(&mut self, villager: VillagerId) -> Result<(), PlacementError> {
        let record = self
            .state
            .villager_mut(villager)
            .ok_or(PlacementError::VillagerNotFound(villager))?;
        let homestead = record.homestead.take().ok_or(PlacementError::NotHoused(villager))?;

        if let Some(h) = self.state.homestead_mut(&homestead) {
            h.occupants = h.occupants.saturating_sub(1);
        }
        Ok(())
    }
}
