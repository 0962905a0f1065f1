/// Width of the period register and window counter in bits.
pub const PERIOD_BITS: u32 = 12;
/// Number of period bits that are hard-wired to zero.
pub const PERIOD_FIXED_LOW_BITS: u32 = 4;
/// Mask of the settable period bits.
pub const PERIOD_MASK: u16 = ((1 << PERIOD_BITS) - 1) & !((1 << PERIOD_FIXED_LOW_BITS) - 1);
/// Shortest effective window; a period of zero is stretched to this length.
pub const MIN_WINDOW_TICKS: u16 = 1 << PERIOD_FIXED_LOW_BITS;
/// Mask of the 12-bit window counter.
pub const WINDOW_MASK: u16 = (1 << PERIOD_BITS) - 1;
/// Width of the edge counter in bits.
pub const EDGE_BITS: u32 = 7;
/// Largest value the edge counter holds before saturating.
pub const EDGE_MAX: u8 = (1 << EDGE_BITS) - 1;

const CLK_DEBUG_SHIFT: u32 = 9;
const EDGE_DEBUG_SHIFT: u32 = 4;
const DEBUG_FIELD_MASK: u8 = 0b111;

/// Sampling-window length register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PeriodRegister(u16);

impl PeriodRegister {
    /// Register value after loading `top8` into the settable bits.
    #[must_use]
    pub const fn from_top_bits(top8: u8) -> Self {
        Self((top8 as u16) << PERIOD_FIXED_LOW_BITS)
    }

    /// Builds a register from a raw 12-bit value, or `None` if the value
    /// has bits outside the settable range.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw & !PERIOD_MASK == 0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Raw register value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The eight bits a host can load.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn top_bits(self) -> u8 {
        (self.0 >> PERIOD_FIXED_LOW_BITS) as u8
    }

    /// Number of ticks in one sampling window.
    #[must_use]
    pub const fn window_ticks(self) -> u16 {
        if self.0 < MIN_WINDOW_TICKS {
            MIN_WINDOW_TICKS
        } else {
            self.0
        }
    }
}

/// Free-running timebase that splits time into sampling windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WindowCounter(u16);

impl WindowCounter {
    /// Builds a counter from a raw value, or `None` when it exceeds 12 bits.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw & !WINDOW_MASK == 0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Current count.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Advances one tick within a window of `period`. Returns the next
    /// counter and whether the window closed on this tick.
    #[must_use]
    pub const fn advanced(self, period: PeriodRegister) -> (Self, bool) {
        if self.0 + 1 >= period.window_ticks() {
            (Self(0), true)
        } else {
            (Self(self.0 + 1), false)
        }
    }

    /// Bits [11:9], exposed on the debug bus.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn debug_bits(self) -> u8 {
        (self.0 >> CLK_DEBUG_SHIFT) as u8 & DEBUG_FIELD_MASK
    }
}

/// Count of synchronized rising edges in the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EdgeCounter(u8);

impl EdgeCounter {
    /// Builds a counter from a raw value, or `None` when it exceeds 7 bits.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if raw <= EDGE_MAX {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Current count.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Counts one more edge, saturating at [`EDGE_MAX`].
    #[must_use]
    pub const fn incremented(self) -> Self {
        if self.0 < EDGE_MAX {
            Self(self.0 + 1)
        } else {
            self
        }
    }

    /// Bits [6:4], exposed on the debug bus.
    #[must_use]
    pub const fn debug_bits(self) -> u8 {
        (self.0 >> EDGE_DEBUG_SHIFT) & DEBUG_FIELD_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EdgeCounter, PeriodRegister, WindowCounter, EDGE_MAX, MIN_WINDOW_TICKS, PERIOD_MASK,
    };

    #[test]
    fn load_forces_low_nibble_to_zero() {
        assert_eq!(PeriodRegister::from_top_bits(0x3E).value(), 0x3E0);
        assert_eq!(PeriodRegister::from_top_bits(0xFF).value(), 0xFF0);
        assert_eq!(PeriodRegister::from_top_bits(0x60).top_bits(), 0x60);
        assert_eq!(PERIOD_MASK, 0xFF0);
    }

    #[test]
    fn raw_period_rejects_low_nibble_and_high_bits() {
        assert!(PeriodRegister::from_raw(0x3E0).is_some());
        assert!(PeriodRegister::from_raw(0x3E7).is_none());
        assert!(PeriodRegister::from_raw(0x1000).is_none());
    }

    #[test]
    fn zero_period_is_stretched_to_minimum_window() {
        let zero = PeriodRegister::default();
        assert_eq!(zero.value(), 0);
        assert_eq!(zero.window_ticks(), MIN_WINDOW_TICKS);
    }

    #[test]
    fn window_wraps_at_period_boundary() {
        let period = PeriodRegister::from_top_bits(1);
        let mut counter = WindowCounter::default();
        let mut closes = 0;
        for _ in 0..48 {
            let (next, closed) = counter.advanced(period);
            counter = next;
            if closed {
                closes += 1;
                assert_eq!(counter.value(), 0);
            }
        }
        assert_eq!(closes, 3);
    }

    #[test]
    fn counter_beyond_shortened_window_wraps_next_tick() {
        let counter = WindowCounter::from_raw(0x500).expect("12-bit value");
        let (next, closed) = counter.advanced(PeriodRegister::from_top_bits(0x10));
        assert!(closed);
        assert_eq!(next.value(), 0);
    }

    #[test]
    fn debug_bits_select_high_order_fields() {
        assert_eq!(WindowCounter::from_raw(511).map(WindowCounter::debug_bits), Some(0));
        assert_eq!(WindowCounter::from_raw(512).map(WindowCounter::debug_bits), Some(1));
        assert_eq!(WindowCounter::from_raw(0xFFF).map(WindowCounter::debug_bits), Some(7));
        assert_eq!(EdgeCounter::from_raw(15).map(EdgeCounter::debug_bits), Some(0));
        assert_eq!(EdgeCounter::from_raw(32).map(EdgeCounter::debug_bits), Some(2));
        assert_eq!(EdgeCounter::from_raw(EDGE_MAX).map(EdgeCounter::debug_bits), Some(7));
    }

    #[test]
    fn edge_counter_saturates() {
        let full = EdgeCounter::from_raw(EDGE_MAX).expect("7-bit value");
        assert_eq!(full.incremented(), full);
        assert!(EdgeCounter::from_raw(EDGE_MAX + 1).is_none());
    }
}
