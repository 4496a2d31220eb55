//! GPIO adapters over embassy-rp

use anabasis_hal::gpio::{InputPin, OutputPin};
use embassy_rp::gpio::{Input, Level, Output};

/// Coil drive line
///
/// Wraps an embassy-rp output and applies the configured inversion, so the
/// sequencer's "energized" is always `set_high` regardless of how the
/// driver board buffers the line.
pub struct CoilPin {
    out: Output<'static>,
    inverted: bool,
}

impl CoilPin {
    /// Wrap an output, `inverted` per the pin's configuration
    pub fn new(out: Output<'static>, inverted: bool) -> Self {
        Self { out, inverted }
    }
}

impl OutputPin for CoilPin {
    fn set_high(&mut self) {
        self.out.set_level(Level::from(!self.inverted));
    }

    fn set_low(&mut self) {
        self.out.set_level(Level::from(self.inverted));
    }

    fn is_set_high(&self) -> bool {
        (self.out.is_set_high()) != self.inverted
    }
}

/// Floor sensor line
///
/// Raw line level; the core's sensor bank owns the active-low
/// interpretation.
pub struct SensePin {
    input: Input<'static>,
}

impl SensePin {
    /// Wrap an input already configured with the wanted pull
    pub fn new(input: Input<'static>) -> Self {
        Self { input }
    }
}

impl InputPin for SensePin {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
