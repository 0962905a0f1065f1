//! Simulation sessions and waveform output for the frequency counter model.

#[cfg(test)]
use tempfile as _;
use tracing_subscriber as _;

/// Session failures.
pub mod error;
pub use error::SimError;

/// Calibrated sweep and single-frequency runs.
pub mod session;
pub use session::{
    run_single, run_sweep, Calibration, Reading, RunRequest, RunSummary, READING_TOLERANCE,
    RESET_TICKS,
};

/// VCD waveform writer.
pub mod waveform;
pub use waveform::{WaveformWriter, MODULE_NAME};
