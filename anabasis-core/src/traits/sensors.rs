//! Floor presence sensing
//!
//! One boolean per floor: "is the cabin physically at floor F right now".
//! Boards back this with an active-low IR barrier per floor, except where a
//! shaft has none (see the dead-reckoning floor in the scheduler plan).

use anabasis_hal::gpio::InputPin;

use crate::requests::MAX_FLOORS;

/// Floor presence sensor bank
///
/// A floor index with no mapped sensor must read `false` - never present -
/// so the scheduler merely cannot stop there by sensor; asking about an
/// unmapped floor is never a fault.
pub trait SensorArray {
    /// The cabin is physically present at `floor`
    fn cabin_present(&self, floor: u8) -> bool;
}

/// Sensor bank over one optional input line per floor
///
/// The barrier pulls its line low while the cabin blocks it, so "present"
/// is the low level. Unmapped slots and out-of-range floor indices read
/// not-present.
pub struct FloorSensorBank<I> {
    inputs: [Option<I>; MAX_FLOORS],
}

impl<I: InputPin> FloorSensorBank<I> {
    /// Bind the per-floor inputs, `None` where no sensor exists
    pub fn new(inputs: [Option<I>; MAX_FLOORS]) -> Self {
        Self { inputs }
    }
}

impl<I: InputPin> SensorArray for FloorSensorBank<I> {
    fn cabin_present(&self, floor: u8) -> bool {
        match self.inputs.get(floor as usize) {
            Some(Some(pin)) => pin.is_low(),
            _ => false,
        }
    }
}
