//! Cycle-accurate model of a windowed frequency counter.

/// Period register, window and edge counters, and the debug phase.
pub mod state;
pub use state::{
    DebugState, EdgeCounter, PeriodRegister, WindowCounter, EDGE_BITS, EDGE_MAX,
    MIN_WINDOW_TICKS, PERIOD_BITS, PERIOD_FIXED_LOW_BITS, PERIOD_MASK, WINDOW_MASK,
};

/// Seven-segment digit encoding.
pub mod segment;
pub use segment::{decode, encode, Digit, DIGIT_COUNT, SEGMENT_MASK, SEGMENT_TABLE};

/// Two-stage synchronizer and rising-edge detector.
pub mod sync;
pub use sync::{Synchronizer, SYNC_STAGES};

/// Count-to-digits conversion by repeated subtraction.
pub mod convert;
pub use convert::{Converter, DisplayDigits, DisplayOverflow, DISPLAY_MAX};

/// Display latch, digit multiplexer and host-side decoder.
pub mod display;
pub use display::{DisplayLatch, DisplayReader, DIGIT_SELECT_BIT};

/// Debug field packing for the bidirectional pins.
pub mod debug;
pub use debug::{DebugFields, DEBUG_CLK_COUNT_SHIFT, DEBUG_EDGE_COUNT_SHIFT, DEBUG_STATE_SHIFT};

/// Bidirectional pin direction.
pub mod bus;
pub use bus::{BusPins, BUS_OE_INPUT, BUS_OE_OUTPUT};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreState, CounterConfig, CounterSnapshot, Inputs, Outputs, SnapshotVersion, TraceEvent,
    TraceSink,
};

/// Clock-edge transition function and combinational outputs.
pub mod tick;
pub use tick::{next_state, outputs, tick, TickEvents};

/// Owning counter wrapper with logging, snapshots and tracing.
pub mod counter;
pub use counter::FrequencyCounter;

/// Error taxonomy.
pub mod fault;
pub use fault::CounterError;

/// Phase budgets and clock calibration helpers.
pub mod timing;
pub use timing::{
    achieved_window_ticks, clock_period_ps, gate_window_ticks, period_top_bits, phase_budget,
    window_phase_ticks, CONVERSION_MAX_TICKS, PHASE_BUDGET_TABLE, PS_PER_SECOND,
    TENS_MAX_TICKS, UNITS_TICKS,
};

/// Picosecond-clocked driver with square-wave stimulus.
pub mod testbench;
pub use testbench::{SquareWave, Testbench};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
