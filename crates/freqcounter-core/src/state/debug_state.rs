/// Phase of the debug state machine within one sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum DebugState {
    /// Counting edges; lasts for the remainder of the window.
    #[default]
    Window = 0,
    /// Deriving the tens digit, one subtraction of ten per tick.
    Tens = 1,
    /// Latching the units digit into the display; exactly one tick.
    Units = 2,
}

impl DebugState {
    /// Stable two-bit encoding exposed on the debug bus.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes the two-bit bus encoding.
    #[must_use]
    pub const fn from_u8(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Window),
            1 => Some(Self::Tens),
            2 => Some(Self::Units),
            _ => None,
        }
    }

    /// Returns `true` while a conversion is in flight.
    #[must_use]
    pub const fn is_converting(self) -> bool {
        matches!(self, Self::Tens | Self::Units)
    }
}
