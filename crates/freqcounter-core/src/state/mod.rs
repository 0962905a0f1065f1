//! Register-level state of the counter core.

/// Period, window and edge counter registers.
pub mod registers;
/// Debug state machine states.
pub mod debug_state;

pub use debug_state::DebugState;
pub use registers::{
    EdgeCounter, PeriodRegister, WindowCounter, EDGE_BITS, EDGE_MAX, MIN_WINDOW_TICKS,
    PERIOD_BITS, PERIOD_FIXED_LOW_BITS, PERIOD_MASK, WINDOW_MASK,
};
