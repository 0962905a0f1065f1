//! Bidirectional pin group shared by the period input and the debug output.

/// Output-enable value while the pins are inputs.
pub const BUS_OE_INPUT: u8 = 0x00;
/// Output-enable value while the pins drive debug data.
pub const BUS_OE_OUTPUT: u8 = 0xFF;

/// Resolved direction and contents of the bidirectional pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusPins {
    /// Host drives the pins; carries the period input bits.
    Input(u8),
    /// Core drives the pins; carries packed debug fields.
    Output(u8),
}

impl Default for BusPins {
    fn default() -> Self {
        Self::Input(0)
    }
}

impl BusPins {
    /// Resolves the pins for the registered mode flag.
    #[must_use]
    pub const fn resolve(debug_mode: bool, host_bits: u8, debug_bits: u8) -> Self {
        if debug_mode {
            Self::Output(debug_bits)
        } else {
            Self::Input(host_bits)
        }
    }

    /// Output-enable mask matching the direction.
    #[must_use]
    pub const fn output_enable(self) -> u8 {
        match self {
            Self::Input(_) => BUS_OE_INPUT,
            Self::Output(_) => BUS_OE_OUTPUT,
        }
    }

    /// Level on the pins, whichever side drives them.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Input(bits) | Self::Output(bits) => bits,
        }
    }

    /// Debug byte when the core is driving, else `None`.
    #[must_use]
    pub const fn driven(self) -> Option<u8> {
        match self {
            Self::Output(bits) => Some(bits),
            Self::Input(_) => None,
        }
    }
}
