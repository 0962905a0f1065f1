//! Public host-facing API contract: configuration, pin-level inputs and
//! outputs, the register state, snapshots and trace hooks.

use crate::{
    BusPins, Converter, CounterError, DebugFields, DebugState, Digit, DisplayDigits,
    DisplayLatch, DisplayOverflow, EdgeCounter, PeriodRegister, Synchronizer, WindowCounter,
};

/// Immutable configuration for a counter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CounterConfig {
    /// How window counts above 99 are shown.
    pub display_overflow: DisplayOverflow,
    /// Enables deterministic trace callback dispatch.
    pub tracing_enabled: bool,
}

/// Pin levels sampled on one rising clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Inputs {
    /// Active-low synchronous reset.
    pub rst_n: bool,
    /// External signal under measurement, asynchronous to the clock.
    pub signal: bool,
    /// One-tick strobe committing `period_in` to the period register.
    pub load_period: bool,
    /// Selects bus direction and contents.
    pub debug_mode: bool,
    /// Host drive on the bidirectional pins: top 8 bits of the period.
    pub period_in: u8,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            rst_n: true,
            signal: false,
            load_period: false,
            debug_mode: false,
            period_in: 0,
        }
    }
}

impl Inputs {
    /// Inputs holding the core in reset.
    #[must_use]
    pub const fn in_reset() -> Self {
        Self {
            rst_n: false,
            signal: false,
            load_period: false,
            debug_mode: false,
            period_in: 0,
        }
    }
}

/// Pin levels and named internal signals observable after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Outputs {
    /// Segments in bits [6:0], digit select in bit 7 (set for units).
    pub display: u8,
    /// Bidirectional pin direction and level.
    pub bus: BusPins,
    /// Output enables of the bidirectional pins.
    pub bus_oe: u8,
    /// Debug fields, observable regardless of the bus direction.
    pub debug: DebugFields,
}

/// Every register of the counter core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreState {
    /// Sampling-window length.
    pub period: PeriodRegister,
    /// Position within the current window.
    pub window: WindowCounter,
    /// External signal synchronizer and edge detector.
    pub sync: Synchronizer,
    /// Edges counted in the current window.
    pub edges: EdgeCounter,
    /// Digit conversion working registers.
    pub converter: Converter,
    /// Debug state machine phase.
    pub debug_state: DebugState,
    /// Display latch and multiplexer phase.
    pub display: DisplayLatch,
    /// Registered `debug_mode` input; drives the bus direction.
    pub debug_mode: bool,
}

impl CoreState {
    /// Named debug signals derived from the current registers.
    #[must_use]
    pub const fn debug_fields(&self) -> DebugFields {
        DebugFields {
            state: self.debug_state,
            edge_count: self.edges.debug_bits(),
            clk_count: self.window.debug_bits(),
        }
    }

    /// Digits currently latched for display.
    #[must_use]
    pub const fn displayed(&self) -> DisplayDigits {
        self.display.digits()
    }

    /// Applies reset semantics: every register returns to its reset value.
    pub fn reset_canonical(&mut self) {
        *self = Self::default();
    }
}

/// Stable snapshot wire-version identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SnapshotVersion {
    /// Initial schema revision.
    V1 = 1,
}

impl SnapshotVersion {
    /// Wire value of this version.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for SnapshotVersion {
    type Error = CounterError;

    fn try_from(version: u16) -> Result<Self, Self::Error> {
        match version {
            1 => Ok(Self::V1),
            _ => Err(CounterError::UnsupportedSnapshotVersion { version }),
        }
    }
}

/// Serializable full-state snapshot used for save/restore and replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CounterSnapshot {
    /// Snapshot schema version.
    pub version: SnapshotVersion,
    /// Full register state.
    pub state: CoreState,
}

impl CounterSnapshot {
    /// Captures `state` under `version`.
    #[must_use]
    pub const fn from_core_state(version: SnapshotVersion, state: &CoreState) -> Self {
        Self {
            version,
            state: *state,
        }
    }

    /// Validates register invariants and returns the captured state.
    ///
    /// Deserialized snapshots bypass the register constructors, so every
    /// field is rechecked here.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidSnapshot`] naming the first violated
    /// invariant.
    pub fn try_into_core_state(self) -> Result<CoreState, CounterError> {
        let state = self.state;
        let invalid = |reason| CounterError::InvalidSnapshot { reason };

        PeriodRegister::from_raw(state.period.value())
            .ok_or_else(|| invalid("period register has bits outside [11:4]"))?;
        WindowCounter::from_raw(state.window.value())
            .ok_or_else(|| invalid("window counter exceeds 12 bits"))?;
        EdgeCounter::from_raw(state.edges.value())
            .ok_or_else(|| invalid("edge counter exceeds 7 bits"))?;
        Converter::from_raw(state.converter.remaining(), state.converter.tens())
            .ok_or_else(|| invalid("converter registers out of range"))?;

        let digits = state.display.digits();
        Digit::new(digits.tens.get()).map_err(|_| invalid("tens digit out of range"))?;
        Digit::new(digits.units.get()).map_err(|_| invalid("units digit out of range"))?;

        Ok(state)
    }
}

/// Deterministic trace events emitted at tick boundaries when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// A tick was taken with reset asserted.
    Reset,
    /// The period register accepted a load.
    PeriodLoaded {
        /// New register value.
        period: u16,
    },
    /// The window counter wrapped.
    WindowClosed {
        /// Edge count captured before the counter restarted.
        snapshot: u8,
    },
    /// The debug state machine changed phase.
    StateChanged {
        /// Phase before the tick.
        from: DebugState,
        /// Phase after the tick.
        to: DebugState,
    },
    /// The display latch took new digits.
    DisplayUpdated {
        /// Newly displayed two-digit value.
        value: u8,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in tick order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CoreState, CounterConfig, CounterSnapshot, Inputs, SnapshotVersion, TraceEvent,
        TraceSink,
    };
    use crate::{CounterError, DebugState, DisplayOverflow, EdgeCounter, PeriodRegister};

    #[test]
    fn default_config_saturates_without_tracing() {
        let config = CounterConfig::default();
        assert_eq!(config.display_overflow, DisplayOverflow::Saturate);
        assert!(!config.tracing_enabled);
    }

    #[test]
    fn default_inputs_release_reset() {
        assert!(Inputs::default().rst_n);
        assert!(!Inputs::in_reset().rst_n);
    }

    #[test]
    fn canonical_reset_clears_every_register() {
        let mut state = CoreState {
            period: PeriodRegister::from_top_bits(0x3E),
            edges: EdgeCounter::from_raw(77).expect("7-bit value"),
            debug_state: DebugState::Tens,
            debug_mode: true,
            ..CoreState::default()
        };

        state.reset_canonical();

        assert_eq!(state, CoreState::default());
        assert_eq!(state.debug_fields().pack(), 0);
    }

    #[test]
    fn snapshot_version_parsing_is_strict() {
        assert_eq!(SnapshotVersion::try_from(1), Ok(SnapshotVersion::V1));
        assert_eq!(
            SnapshotVersion::try_from(2),
            Err(CounterError::UnsupportedSnapshotVersion { version: 2 })
        );
        assert_eq!(SnapshotVersion::V1.as_u16(), 1);
    }

    #[test]
    fn snapshot_of_valid_state_restores_unchanged() {
        let state = CoreState {
            period: PeriodRegister::from_top_bits(0x60),
            edges: EdgeCounter::from_raw(12).expect("7-bit value"),
            ..CoreState::default()
        };
        let snapshot = CounterSnapshot::from_core_state(SnapshotVersion::V1, &state);
        assert_eq!(snapshot.try_into_core_state(), Ok(state));
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink = Vec::new();
        sink.on_event(TraceEvent::Reset);
        sink.on_event(TraceEvent::WindowClosed { snapshot: 3 });
        assert_eq!(
            sink,
            vec![TraceEvent::Reset, TraceEvent::WindowClosed { snapshot: 3 }]
        );
    }
}
