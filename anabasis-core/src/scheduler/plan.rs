//! Shaft layout parameters
//!
//! One scheduler serves every shaft; the differences between deployments
//! (floor count, sensor placement quirks, the sensorless bottom floor) are
//! data here, never forked control loops.

/// Arrival by step count for a floor with no physical sensor
///
/// Some shafts have no sensor at the bottom of the travel. Arrival at that
/// floor is inferred by driving a fixed number of half-steps past the last
/// sensed floor. The step budget is a per-shaft calibration value; it does
/// not transfer between shafts with different gearing or floor spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeadReckoning {
    /// The sensorless floor, reachable only from above
    pub floor: u8,
    /// Half-steps to drive past the last sensed floor before declaring
    /// arrival
    pub steps: u32,
}

/// Per-shaft layout the scheduler is parameterized by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorPlan {
    /// Number of served floors, ground = 0
    pub floor_count: u8,
    /// When descending, arrival at floor F is read from the sensor this
    /// many floors above F. Compensates shafts whose sensors trip early on
    /// the way down; 0 reads the destination's own sensor.
    pub descent_sensor_offset: u8,
    /// Optional sensorless floor at the bottom of the travel
    pub dead_reckoning: Option<DeadReckoning>,
}

impl FloorPlan {
    /// A plan with no sensor quirks
    pub const fn simple(floor_count: u8) -> Self {
        Self {
            floor_count,
            descent_sensor_offset: 0,
            dead_reckoning: None,
        }
    }
}

/// When to give up on a destination that is not getting closer
///
/// A jammed cabin or a dead sensor must not wedge the control loop with
/// the motor churning. A seek that makes no sensor progress for a full
/// window is retried, and once the window budget is spent the destination
/// is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StallPolicy {
    /// Drive ticks per no-progress window
    pub ticks_per_window: u32,
    /// Windows allowed before the seek is abandoned
    pub max_windows: u8,
}
