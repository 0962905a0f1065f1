//! Two-digit multiplexed seven-segment display driver and reader.

use crate::convert::DisplayDigits;
use crate::segment::{decode, Digit};

/// Bit of the display output that selects the units digit.
pub const DIGIT_SELECT_BIT: u8 = 1 << 7;

/// Latched digits and the multiplexer phase.
///
/// The latch is written once per window by the UNITS state. The multiplexer
/// alternates between the digits on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisplayLatch {
    digits: DisplayDigits,
    select_units: bool,
}

impl DisplayLatch {
    /// Digits currently shown.
    #[must_use]
    pub const fn digits(&self) -> DisplayDigits {
        self.digits
    }

    /// Returns `true` while the units digit is being driven.
    #[must_use]
    pub const fn units_selected(&self) -> bool {
        self.select_units
    }

    /// Next latch contents after one tick, optionally loading new digits.
    #[must_use]
    pub const fn advanced(&self, load: Option<DisplayDigits>) -> Self {
        let digits = match load {
            Some(digits) => digits,
            None => self.digits,
        };
        Self {
            digits,
            select_units: !self.select_units,
        }
    }

    /// Pin-level output: segments in bits [6:0], digit select in bit 7.
    #[must_use]
    pub const fn output(&self) -> u8 {
        if self.select_units {
            self.digits.units.segments() | DIGIT_SELECT_BIT
        } else {
            self.digits.tens.segments()
        }
    }
}

/// Reassembles the displayed value from consecutive display outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayReader {
    tens: Option<Digit>,
    units: Option<Digit>,
}

impl DisplayReader {
    /// Creates a reader with no digits observed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tens: None,
            units: None,
        }
    }

    /// Feeds one display output. Unrecognised patterns are ignored.
    pub fn observe(&mut self, output: u8) {
        let Some(digit) = decode(output) else {
            return;
        };
        if output & DIGIT_SELECT_BIT == 0 {
            self.tens = Some(digit);
        } else {
            self.units = Some(digit);
        }
    }

    /// Two-digit value once both digits have been observed.
    #[must_use]
    pub fn value(&self) -> Option<u8> {
        Some(self.tens?.get() * 10 + self.units?.get())
    }
}
