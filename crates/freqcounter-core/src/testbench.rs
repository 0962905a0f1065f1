//! Time-based driver for exercising the counter like a simulator would.
//!
//! The [`Testbench`] owns a counter and a picosecond clock. Every tick samples
//! the attached [`SquareWave`] at the time of the rising clock edge, so the
//! stimulus is genuinely asynchronous to the counter clock.

use crate::timing::{achieved_window_ticks, clock_period_ps, period_top_bits};
use crate::{CounterConfig, CounterError, DisplayReader, FrequencyCounter, Inputs, Outputs, TraceSink};

/// Periodic stimulus, high for the first half of each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquareWave {
    period_ps: u64,
    start_ps: u64,
}

impl SquareWave {
    /// Wave with its first rising edge at `start_ps`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidTiming`] for periods shorter than 2 ps,
    /// which have no distinct high and low halves.
    pub const fn new(period_ps: u64, start_ps: u64) -> Result<Self, CounterError> {
        if period_ps < 2 {
            return Err(CounterError::InvalidTiming {
                reason: "signal period must be at least 2 ps",
            });
        }
        Ok(Self {
            period_ps,
            start_ps,
        })
    }

    /// Period in picoseconds.
    #[must_use]
    pub const fn period_ps(&self) -> u64 {
        self.period_ps
    }

    /// Level at `time_ps`; low before the wave starts.
    #[must_use]
    pub const fn level_at(&self, time_ps: u64) -> bool {
        if time_ps < self.start_ps {
            return false;
        }
        (time_ps - self.start_ps) % self.period_ps < self.period_ps / 2
    }

    /// Number of rising edges at or before `time_ps`.
    #[must_use]
    pub const fn rising_edges_through(&self, time_ps: u64) -> u64 {
        if time_ps < self.start_ps {
            0
        } else {
            (time_ps - self.start_ps) / self.period_ps + 1
        }
    }

    /// Time of the first rising edge strictly after `time_ps`.
    #[must_use]
    pub const fn next_rising_edge_after(&self, time_ps: u64) -> u64 {
        self.start_ps + self.rising_edges_through(time_ps) * self.period_ps
    }
}

/// Clocked driver around one [`FrequencyCounter`].
#[derive(Debug, Clone)]
pub struct Testbench {
    counter: FrequencyCounter,
    clock_period_ps: u64,
    now_ps: u64,
    inputs: Inputs,
    signal: Option<SquareWave>,
    outputs: Outputs,
}

impl Testbench {
    /// Creates a testbench with the counter clocked at `clock_hz`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidTiming`] for an unusable clock.
    pub fn new(clock_hz: u64, config: CounterConfig) -> Result<Self, CounterError> {
        let counter = FrequencyCounter::new(config);
        let inputs = Inputs::default();
        let outputs = counter.outputs(&inputs);
        Ok(Self {
            counter,
            clock_period_ps: clock_period_ps(clock_hz)?,
            now_ps: 0,
            inputs,
            signal: None,
            outputs,
        })
    }

    /// The driven counter.
    #[must_use]
    pub const fn counter(&self) -> &FrequencyCounter {
        &self.counter
    }

    /// Time of the next rising clock edge.
    #[must_use]
    pub const fn now_ps(&self) -> u64 {
        self.now_ps
    }

    /// Clock period in picoseconds.
    #[must_use]
    pub const fn clock_period_ps(&self) -> u64 {
        self.clock_period_ps
    }

    /// Inputs applied on the most recent tick.
    #[must_use]
    pub const fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Pin levels after the most recent tick.
    #[must_use]
    pub const fn outputs(&self) -> Outputs {
        self.outputs
    }

    /// Attached stimulus, if any.
    #[must_use]
    pub const fn signal(&self) -> Option<SquareWave> {
        self.signal
    }

    /// Sets the debug mode input for following ticks.
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.inputs.debug_mode = enabled;
    }

    /// Drives the signal input to a fixed level, detaching any wave.
    pub fn drive_signal(&mut self, level: bool) {
        self.signal = None;
        self.inputs.signal = level;
    }

    /// Starts a square wave of `period_ps` whose first rising edge is
    /// `offset_ps` after the next clock edge.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidTiming`] for an unusable period.
    pub fn start_signal(&mut self, period_ps: u64, offset_ps: u64) -> Result<SquareWave, CounterError> {
        let wave = SquareWave::new(period_ps, self.now_ps + offset_ps)?;
        self.signal = Some(wave);
        Ok(wave)
    }

    /// Detaches the wave; the input holds its last sampled level.
    pub fn stop_signal(&mut self) {
        self.signal = None;
    }

    /// Takes one clock tick.
    pub fn clock(&mut self) -> Outputs {
        self.sample_signal();
        self.outputs = self.counter.step(&self.inputs);
        self.now_ps += self.clock_period_ps;
        self.outputs
    }

    /// Takes one clock tick, forwarding trace events to `sink`.
    pub fn clock_traced(&mut self, sink: &mut dyn TraceSink) -> Outputs {
        self.sample_signal();
        self.outputs = self.counter.step_traced(&self.inputs, sink);
        self.now_ps += self.clock_period_ps;
        self.outputs
    }

    /// Takes `cycles` ticks and returns the final outputs.
    pub fn run_cycles(&mut self, cycles: u64) -> Outputs {
        for _ in 0..cycles {
            self.clock();
        }
        self.outputs
    }

    /// Ticks until `done` accepts the outputs, up to `limit` ticks. Returns
    /// the number of ticks taken, or `None` if the limit was reached first.
    pub fn run_until(&mut self, limit: u64, mut done: impl FnMut(&Outputs) -> bool) -> Option<u64> {
        for taken in 1..=limit {
            if done(&self.clock()) {
                return Some(taken);
            }
        }
        None
    }

    /// Ticks every clock edge that falls before `time_ps`.
    pub fn run_until_time(&mut self, time_ps: u64) -> Outputs {
        while self.now_ps < time_ps {
            self.clock();
        }
        self.outputs
    }

    /// Holds reset for `cycles` ticks with debug mode off, then releases it
    /// without ticking.
    pub fn reset(&mut self, cycles: u64) {
        self.inputs.rst_n = false;
        self.inputs.debug_mode = false;
        self.run_cycles(cycles);
        self.inputs.rst_n = true;
    }

    /// Loads the period register for a window of roughly `window_ticks`:
    /// strobes the top 8 bits for one tick and waits one more. Returns the
    /// achieved window length.
    pub fn load_period(&mut self, window_ticks: u16) -> u16 {
        self.inputs.debug_mode = false;
        self.inputs.period_in = period_top_bits(window_ticks);
        self.inputs.load_period = true;
        self.clock();
        self.inputs.load_period = false;
        self.clock();
        achieved_window_ticks(window_ticks)
    }

    /// Reads the two-digit display value over two ticks of the multiplexer.
    pub fn read_display(&mut self) -> Option<u8> {
        let mut reader = DisplayReader::new();
        reader.observe(self.outputs.display);
        reader.observe(self.clock().display);
        reader.value()
    }

    fn sample_signal(&mut self) {
        if let Some(wave) = self.signal {
            self.inputs.signal = wave.level_at(self.now_ps);
        }
    }
}
