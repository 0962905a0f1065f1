//! Debug introspection fields and their packing on the bidirectional bus.

use crate::DebugState;

/// Bit offset of the debug state field on the bus.
pub const DEBUG_STATE_SHIFT: u8 = 6;
/// Bit offset of the edge count field on the bus.
pub const DEBUG_EDGE_COUNT_SHIFT: u8 = 3;
/// Bit offset of the clock count field on the bus.
pub const DEBUG_CLK_COUNT_SHIFT: u8 = 0;

const STATE_MASK: u8 = 0b11;
const COUNT_MASK: u8 = 0b111;

/// Named internal signals the debug machine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DebugFields {
    /// Debug state machine phase.
    pub state: DebugState,
    /// Edge counter bits [6:4].
    pub edge_count: u8,
    /// Window counter bits [11:9].
    pub clk_count: u8,
}

impl DebugFields {
    /// Packs the fields into one bus byte: `[7:6]` state, `[5:3]` edge
    /// count, `[2:0]` clock count.
    #[must_use]
    pub const fn pack(self) -> u8 {
        (self.state.as_u8() & STATE_MASK) << DEBUG_STATE_SHIFT
            | (self.edge_count & COUNT_MASK) << DEBUG_EDGE_COUNT_SHIFT
            | (self.clk_count & COUNT_MASK) << DEBUG_CLK_COUNT_SHIFT
    }

    /// Unpacks a bus byte, or `None` if the state field is not a valid state.
    #[must_use]
    pub const fn unpack(bits: u8) -> Option<Self> {
        let Some(state) = DebugState::from_u8((bits >> DEBUG_STATE_SHIFT) & STATE_MASK) else {
            return None;
        };
        Some(Self {
            state,
            edge_count: (bits >> DEBUG_EDGE_COUNT_SHIFT) & COUNT_MASK,
            clk_count: (bits >> DEBUG_CLK_COUNT_SHIFT) & COUNT_MASK,
        })
    }
}
