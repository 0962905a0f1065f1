use thiserror::Error;

/// Error taxonomy for the counter model and its host-facing helpers.
///
/// The per-tick transition is total and never produces one of these; they
/// are raised only at API boundaries where the host hands in raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CounterError {
    /// A seven-segment digit outside `0..=9` was requested.
    #[error("digit {digit} has no seven-segment encoding")]
    InvalidDigit {
        /// Offending raw digit value.
        digit: u8,
    },
    /// Snapshot carried a wire version this build does not understand.
    #[error("unsupported snapshot version {version}")]
    UnsupportedSnapshotVersion {
        /// Raw version number found in the snapshot.
        version: u16,
    },
    /// Snapshot contents violate a register invariant.
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// Which invariant was violated.
        reason: &'static str,
    },
    /// Clock or stimulus timing parameters cannot be simulated.
    #[error("invalid timing: {reason}")]
    InvalidTiming {
        /// Which timing parameter was rejected.
        reason: &'static str,
    },
}

impl CounterError {
    /// Returns `true` for errors caused by a logic defect upstream of the
    /// display path rather than by host configuration.
    #[must_use]
    pub const fn is_logic_defect(self) -> bool {
        matches!(self, Self::InvalidDigit { .. })
    }
}
