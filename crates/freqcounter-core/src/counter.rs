//! Owning wrapper that threads [`CoreState`] through the transition function.

use tracing::{debug, trace};

use crate::tick::{next_state, outputs, TickEvents};
use crate::{
    CoreState, CounterConfig, CounterError, CounterSnapshot, Inputs, Outputs, SnapshotVersion,
    TraceSink,
};

/// A single counter core plus its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyCounter {
    state: CoreState,
    config: CounterConfig,
    cycles: u64,
}

impl FrequencyCounter {
    /// Creates a counter in its reset state.
    #[must_use]
    pub fn new(config: CounterConfig) -> Self {
        Self {
            state: CoreState::default(),
            config,
            cycles: 0,
        }
    }

    /// Register state.
    #[must_use]
    pub const fn state(&self) -> &CoreState {
        &self.state
    }

    /// Configuration the counter was built with.
    #[must_use]
    pub const fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Number of ticks taken since construction or the last restore.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Pin levels for the current registers.
    #[must_use]
    pub const fn outputs(&self, inputs: &Inputs) -> Outputs {
        outputs(&self.state, inputs)
    }

    /// Advances one tick.
    pub fn step(&mut self, inputs: &Inputs) -> Outputs {
        let events = self.advance(inputs);
        self.log(&events);
        outputs(&self.state, inputs)
    }

    /// Advances one tick and reports its events to `sink` when tracing is
    /// enabled in the configuration.
    pub fn step_traced(&mut self, inputs: &Inputs, sink: &mut dyn TraceSink) -> Outputs {
        let events = self.advance(inputs);
        self.log(&events);
        if self.config.tracing_enabled {
            events.emit(sink);
        }
        outputs(&self.state, inputs)
    }

    /// Forces every register to its reset value without taking a tick.
    pub fn reset(&mut self) {
        debug!(cycle = self.cycles, "counter reset");
        self.state.reset_canonical();
    }

    /// Captures the register state.
    #[must_use]
    pub const fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot::from_core_state(SnapshotVersion::V1, &self.state)
    }

    /// Replaces the register state with a validated snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidSnapshot`] when the snapshot violates a
    /// register invariant; the current state is left untouched.
    pub fn restore(&mut self, snapshot: CounterSnapshot) -> Result<(), CounterError> {
        self.state = snapshot.try_into_core_state()?;
        self.cycles = 0;
        debug!(period = self.state.period.value(), "counter state restored");
        Ok(())
    }

    fn advance(&mut self, inputs: &Inputs) -> TickEvents {
        let (next, events) = next_state(&self.state, inputs, &self.config);
        self.state = next;
        self.cycles = self.cycles.wrapping_add(1);
        events
    }

    fn log(&self, events: &TickEvents) {
        if events.reset {
            trace!(cycle = self.cycles, "reset asserted");
        }
        if let Some(period) = events.period_loaded {
            debug!(
                cycle = self.cycles,
                period = period.value(),
                window_ticks = period.window_ticks(),
                "period loaded"
            );
        }
        if let Some(snapshot) = events.window_closed {
            trace!(cycle = self.cycles, snapshot, "window closed");
        }
        if let Some(digits) = events.display_updated {
            trace!(cycle = self.cycles, value = digits.value(), "display updated");
        }
    }
}
