use std::io;

use freqcounter_core::CounterError;
use thiserror::Error;

/// Failures of a simulation session.
#[derive(Debug, Error)]
pub enum SimError {
    /// The requested clock, gate or stimulus cannot be simulated.
    #[error(transparent)]
    Counter(#[from] CounterError),
    /// Writing the waveform failed.
    #[error("waveform output failed: {0}")]
    Io(#[from] io::Error),
    /// A frequency of zero display units has no signal period.
    #[error("input frequency must be at least 1 display unit")]
    ZeroFrequency,
}
