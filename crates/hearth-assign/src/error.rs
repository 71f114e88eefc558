//! Assignment error types.

use thiserror::Error;

use hearth_core::{CoreError, HomesteadId, VillagerId};

/// Why a single villager could not be moved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("villager not found: {0}")]
    VillagerNotFound(VillagerId),

    #[error("homestead not found: {0}")]
    HomesteadNotFound(HomesteadId),

    #[error("homestead is full: {0}")]
    HomesteadFull(HomesteadId),

    #[error("villager {villager} already lives in {homestead}")]
    AlreadyHoused {
        villager: VillagerId,
        homestead: HomesteadId,
    },

    #[error("villager has no homestead: {0}")]
    NotHoused(VillagerId),

    #[error("placement rejected: {0}")]
    Rejected(String),
}

/// Errors that abort a whole assignment cycle.
#[derive(Debug, Error)]
pub enum AssignError {
    #[error("snapshot error: {0}")]
    Snapshot(#[from] CoreError),
}

pub type AssignResult<T> = Result<T, AssignError>;
