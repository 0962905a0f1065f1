//! Measurement sessions driven through the core testbench.
//!
//! Frequencies are given in display units: one unit is one rising edge per
//! gate time, so with a 100 us gate a reading of 31 means 310 kHz.

use std::io::Write;

use freqcounter_core::{
    gate_window_ticks, CounterConfig, DebugFields, SquareWave, Testbench, TENS_MAX_TICKS,
};
use tracing::{debug, info, warn};

use crate::error::SimError;
use crate::waveform::WaveformWriter;

/// Ticks of reset, and of idle time after it, before measuring.
pub const RESET_TICKS: u64 = 5;

/// Largest distance between a reading and its input that still passes.
pub const READING_TOLERANCE: u64 = 1;

/// Clock and gate shared by every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// Core clock frequency in Hz.
    pub clock_hz: u64,
    /// Requested gate time in picoseconds.
    pub gate_ps: u64,
    /// Windows to let pass after the input changes before reading.
    pub settle_windows: u64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            clock_hz: 10_000_000,
            gate_ps: 100_000_000,
            settle_windows: 4,
        }
    }
}

impl Calibration {
    /// Period in picoseconds of a signal at `units` display units.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ZeroFrequency`] when `units` is zero.
    pub const fn signal_period_ps(&self, units: u64) -> Result<u64, SimError> {
        if units == 0 {
            return Err(SimError::ZeroFrequency);
        }
        Ok(self.gate_ps / units)
    }

    /// Builds a reset testbench with the period register loaded for the gate.
    /// Returns the bench and the requested window length in ticks.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Counter`] when the clock or gate is unusable.
    pub fn prepare(&self, config: CounterConfig) -> Result<(Testbench, u16), SimError> {
        let window = gate_window_ticks(self.clock_hz, self.gate_ps)?;
        let mut bench = Testbench::new(self.clock_hz, config)?;
        bench.reset(RESET_TICKS);
        bench.run_cycles(RESET_TICKS);
        let achieved = bench.load_period(window);
        if achieved != window {
            warn!(
                requested = window,
                achieved, "gate does not align with the period register"
            );
        }
        info!(
            clock_hz = self.clock_hz,
            window_ticks = achieved,
            "period register loaded"
        );
        Ok((bench, window))
    }

    /// Ticks to run after an input change before reading the display.
    #[must_use]
    pub fn settle_ticks(&self, window: u16) -> u64 {
        u64::from(window) * self.settle_windows
    }
}

/// One sweep point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Input frequency in display units.
    pub input: u64,
    /// Value read back from the display, if both digits decoded.
    pub displayed: Option<u8>,
}

impl Reading {
    /// Distance between the displayed value and the input.
    #[must_use]
    pub fn error(&self) -> Option<u64> {
        self.displayed
            .map(|shown| u64::from(shown).abs_diff(self.input))
    }

    /// Returns `true` if the reading is within [`READING_TOLERANCE`].
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error().is_some_and(|error| error <= READING_TOLERANCE)
    }
}

/// Measures each frequency in turn on one counter, without resetting
/// between inputs.
///
/// # Errors
///
/// Returns [`SimError`] for an unusable calibration or a zero frequency.
pub fn run_sweep(
    calibration: &Calibration,
    config: CounterConfig,
    frequencies: &[u64],
) -> Result<Vec<Reading>, SimError> {
    let (mut bench, window) = calibration.prepare(config)?;
    let mut readings = Vec::with_capacity(frequencies.len());

    for &input in frequencies {
        bench.start_signal(calibration.signal_period_ps(input)?, 0)?;
        bench.run_cycles(calibration.settle_ticks(window));
        let reading = Reading {
            input,
            displayed: bench.read_display(),
        };
        debug!(input, displayed = ?reading.displayed, "sweep point");
        readings.push(reading);
        bench.stop_signal();
    }

    Ok(readings)
}

/// Parameters of a single-frequency run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    /// Input frequency in display units.
    pub input: u64,
    /// Ticks to simulate after calibration; defaults to the settle time.
    pub cycles: Option<u64>,
    /// Drives the debug mode input during the run.
    pub debug_mode: bool,
}

/// Final observations of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks simulated after calibration.
    pub cycles: u64,
    /// Value read back from the display.
    pub displayed: Option<u8>,
    /// Debug fields after the last tick.
    pub debug: DebugFields,
    /// Output enables of the bidirectional pins after the last tick.
    pub bus_oe: u8,
    /// Stimulus used for the run.
    pub signal: SquareWave,
}

/// Runs one input frequency, optionally recording every tick after
/// calibration to `waveform`.
///
/// # Errors
///
/// Returns [`SimError`] for an unusable calibration, a zero frequency or a
/// waveform write failure.
pub fn run_single<W: Write>(
    calibration: &Calibration,
    config: CounterConfig,
    request: &RunRequest,
    mut waveform: Option<&mut WaveformWriter<W>>,
) -> Result<RunSummary, SimError> {
    let (mut bench, window) = calibration.prepare(config)?;
    bench.set_debug_mode(request.debug_mode);
    let signal = bench.start_signal(calibration.signal_period_ps(request.input)?, 0)?;

    // Leave room for a full conversion so the read sees a settled latch.
    let cycles = request
        .cycles
        .unwrap_or_else(|| calibration.settle_ticks(window) + u64::from(TENS_MAX_TICKS));
    for _ in 0..cycles {
        let time_ps = bench.now_ps();
        let outputs = bench.clock();
        if let Some(writer) = waveform.as_deref_mut() {
            writer.record(time_ps, bench.inputs(), &outputs)?;
        }
    }
    if let Some(writer) = waveform {
        writer.flush()?;
    }

    let outputs = bench.outputs();
    let summary = RunSummary {
        cycles,
        displayed: bench.read_display(),
        debug: outputs.debug,
        bus_oe: outputs.bus_oe,
        signal,
    };
    info!(input = request.input, displayed = ?summary.displayed, "run finished");
    Ok(summary)
}
