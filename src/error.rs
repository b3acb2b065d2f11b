//! Spot contract errors

use thiserror::Error;

use crate::sim::{ItemId, SpotId};

/// Misuse of the spot assign/remove contract
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotError {
    /// Assign onto a spot that still holds an item
    #[error("{spot} already holds {current}, cannot assign {incoming}")]
    Occupied {
        spot: SpotId,
        current: ItemId,
        incoming: ItemId,
    },

    /// Item handle not present in the animator
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// Spot index outside the managed collection
    #[error("Unknown spot: {0}")]
    UnknownSpot(SpotId),
}

/// Result type for spot operations
pub type Result<T> = std::result::Result<T, SpotError>;
