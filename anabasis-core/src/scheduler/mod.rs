//! Floor scheduler
//!
//! A SCAN discipline, the elevator analog of disk-head scheduling: keep
//! traveling in the current direction while requests remain ahead, then
//! reverse. One scheduler serves every shaft layout; the per-deployment
//! quirks live in [`FloorPlan`].

pub mod plan;
pub mod scan;

pub use plan::{DeadReckoning, FloorPlan, StallPolicy};
pub use scan::{Motion, Scheduler, TickCommand};

/// Cabin travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Toward higher floor indices
    Up,
    /// Toward the ground
    Down,
}

impl Direction {
    /// The reverse travel direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}
