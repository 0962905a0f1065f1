//! Edge-count snapshot to two-digit decimal conversion.

use crate::segment::Digit;

/// Largest value the two-digit display can show.
pub const DISPLAY_MAX: u8 = 99;

/// Policy for window counts that do not fit in two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DisplayOverflow {
    /// Counts of 100 or more display as 99.
    #[default]
    Saturate,
    /// Counts display modulo 100.
    Wrap,
}

impl DisplayOverflow {
    /// Maps a raw snapshot into the displayable range `0..=99`.
    #[must_use]
    pub const fn condition(self, snapshot: u8) -> u8 {
        if snapshot <= DISPLAY_MAX {
            return snapshot;
        }
        match self {
            Self::Saturate => DISPLAY_MAX,
            Self::Wrap => snapshot % 100,
        }
    }
}

/// The pair of digits shown on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisplayDigits {
    /// Tens digit.
    pub tens: Digit,
    /// Units digit.
    pub units: Digit,
}

impl DisplayDigits {
    /// Closed-form decomposition of a snapshot under `overflow`.
    #[must_use]
    pub const fn from_count(snapshot: u8, overflow: DisplayOverflow) -> Self {
        let value = overflow.condition(snapshot);
        Self {
            tens: Digit::low_decimal(value / 10),
            units: Digit::low_decimal(value),
        }
    }

    /// Two-digit value shown by the display.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.tens.get() * 10 + self.units.get()
    }
}

/// Working registers of the iterative conversion run in the TENS state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Converter {
    remaining: u8,
    tens: u8,
}

impl Converter {
    /// Loads a fresh snapshot at window close.
    #[must_use]
    pub const fn start(snapshot: u8, overflow: DisplayOverflow) -> Self {
        Self {
            remaining: overflow.condition(snapshot),
            tens: 0,
        }
    }

    /// Rebuilds converter registers from raw values, or `None` if they could
    /// not arise from a conditioned snapshot.
    #[must_use]
    pub const fn from_raw(remaining: u8, tens: u8) -> Option<Self> {
        if tens <= 9 && remaining <= DISPLAY_MAX - tens * 10 {
            Some(Self { remaining, tens })
        } else {
            None
        }
    }

    /// Value still to be split into tens.
    #[must_use]
    pub const fn remaining(self) -> u8 {
        self.remaining
    }

    /// Tens digit accumulated so far.
    #[must_use]
    pub const fn tens(self) -> u8 {
        self.tens
    }

    /// One TENS tick: subtracts ten when possible. The flag reports whether
    /// the remainder is now a single digit and the machine may move on.
    #[must_use]
    pub const fn step_tens(self) -> (Self, bool) {
        let next = if self.remaining >= 10 {
            Self {
                remaining: self.remaining - 10,
                tens: self.tens + 1,
            }
        } else {
            self
        };
        (next, next.remaining < 10)
    }

    /// Digits held by the converter once the TENS state has finished.
    #[must_use]
    pub const fn digits(self) -> DisplayDigits {
        debug_assert!(self.tens < 10 && self.remaining < 10);
        DisplayDigits {
            tens: Digit::low_decimal(self.tens),
            units: Digit::low_decimal(self.remaining),
        }
    }
}
