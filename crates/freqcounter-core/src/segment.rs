//! Seven-segment encoding for the two display digits.
//!
//! Segment bit `n` drives segment `a + n`; bit 7 is never set by the table so
//! the display output can reuse it as the digit select line.

use crate::CounterError;

/// Number of distinct displayable digits.
pub const DIGIT_COUNT: usize = 10;

/// Segment patterns for digits `0..=9`, indexed by digit value.
pub const SEGMENT_TABLE: [u8; DIGIT_COUNT] = [63, 6, 91, 79, 102, 109, 124, 7, 127, 103];

/// Mask of the bits a segment pattern may occupy.
pub const SEGMENT_MASK: u8 = 0x7F;

/// A decimal digit known to be in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Digit(u8);

impl Digit {
    /// The digit zero.
    pub const ZERO: Self = Self(0);
    /// The digit nine, used when a count saturates.
    pub const NINE: Self = Self(9);

    /// Validates a raw digit.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidDigit`] when `value > 9`.
    pub const fn new(value: u8) -> Result<Self, CounterError> {
        if value < 10 {
            Ok(Self(value))
        } else {
            Err(CounterError::InvalidDigit { digit: value })
        }
    }

    /// Takes the least significant decimal digit of `value`.
    #[must_use]
    pub const fn low_decimal(value: u8) -> Self {
        Self(value % 10)
    }

    /// Raw digit value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Segment pattern for this digit.
    #[must_use]
    pub const fn segments(self) -> u8 {
        SEGMENT_TABLE[self.0 as usize]
    }
}

impl TryFrom<u8> for Digit {
    type Error = CounterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

/// Encodes a raw digit into its segment pattern.
///
/// # Errors
///
/// Returns [`CounterError::InvalidDigit`] for any input outside `0..=9`.
pub const fn encode(digit: u8) -> Result<u8, CounterError> {
    match Digit::new(digit) {
        Ok(digit) => Ok(digit.segments()),
        Err(err) => Err(err),
    }
}

/// Decodes a segment pattern back into its digit. Bit 7 is ignored.
#[must_use]
pub fn decode(pattern: u8) -> Option<Digit> {
    let segments = pattern & SEGMENT_MASK;
    SEGMENT_TABLE
        .iter()
        .zip(0_u8..)
        .find_map(|(entry, value)| (*entry == segments).then_some(Digit(value)))
}
