//! Two-stage synchronizer and rising-edge detector for the external signal.

/// Number of register stages between the raw pin and edge detection.
pub const SYNC_STAGES: usize = 2;

/// Shift register that carries the asynchronous input into the clock domain.
///
/// `stages[0]` samples the raw pin, `stages[1]` is the synchronized value and
/// `last` holds the synchronized value of the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Synchronizer {
    stages: [bool; SYNC_STAGES],
    last: bool,
}

impl Synchronizer {
    /// Synchronized signal level.
    #[must_use]
    pub const fn synchronized(&self) -> bool {
        self.stages[SYNC_STAGES - 1]
    }

    /// Combinational rising-edge detect on the synchronized signal.
    #[must_use]
    pub const fn rising_edge(&self) -> bool {
        self.synchronized() && !self.last
    }

    /// Raw stage contents, first stage first.
    #[must_use]
    pub const fn stages(&self) -> [bool; SYNC_STAGES] {
        self.stages
    }

    /// Next register contents after sampling `raw` on a clock edge.
    #[must_use]
    pub const fn shifted(&self, raw: bool) -> Self {
        Self {
            stages: [raw, self.stages[0]],
            last: self.stages[1],
        }
    }
}
