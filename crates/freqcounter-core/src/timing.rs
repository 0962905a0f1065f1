//! Fixed phase budgets and clock-to-window calibration helpers.

use crate::{CounterError, DebugState, PeriodRegister, MIN_WINDOW_TICKS};

/// Picoseconds per second.
pub const PS_PER_SECOND: u64 = 1_000_000_000_000;

/// Longest TENS phase: nine subtractions for a displayed value of 99.
pub const TENS_MAX_TICKS: u16 = 9;

/// The UNITS phase always lasts one tick.
pub const UNITS_TICKS: u16 = 1;

/// Upper bound on ticks per window spent in the conversion phases.
pub const CONVERSION_MAX_TICKS: u16 = TENS_MAX_TICKS + UNITS_TICKS;

/// Longest duration of each bounded debug phase, in ticks.
pub const PHASE_BUDGET_TABLE: &[(DebugState, u16)] = &[
    (DebugState::Tens, TENS_MAX_TICKS),
    (DebugState::Units, UNITS_TICKS),
];

/// Looks up the tick budget for a phase. `Window` has no fixed budget.
#[must_use]
pub fn phase_budget(state: DebugState) -> Option<u16> {
    PHASE_BUDGET_TABLE
        .iter()
        .find_map(|(entry, ticks)| (*entry == state).then_some(*ticks))
}

/// Ticks spent in WINDOW for a window of `window_ticks` whose conversion
/// produced `tens` in the tens place.
#[must_use]
pub const fn window_phase_ticks(window_ticks: u16, tens: u8) -> u16 {
    let tens_ticks = if tens == 0 { 1 } else { tens as u16 };
    window_ticks.saturating_sub(tens_ticks + UNITS_TICKS)
}

/// Clock period in picoseconds.
///
/// # Errors
///
/// Returns [`CounterError::InvalidTiming`] for a zero frequency or one too
/// high to represent with picosecond resolution.
pub const fn clock_period_ps(clock_hz: u64) -> Result<u64, CounterError> {
    if clock_hz == 0 {
        return Err(CounterError::InvalidTiming {
            reason: "clock frequency is zero",
        });
    }
    let period = PS_PER_SECOND / clock_hz;
    if period == 0 {
        return Err(CounterError::InvalidTiming {
            reason: "clock frequency exceeds picosecond resolution",
        });
    }
    Ok(period)
}

/// Number of clock ticks in a gate time of `gate_ps`, rounded down.
///
/// # Errors
///
/// Returns [`CounterError::InvalidTiming`] when the clock is invalid or the
/// gate does not fit the 12-bit period register.
pub fn gate_window_ticks(clock_hz: u64, gate_ps: u64) -> Result<u16, CounterError> {
    let ticks = gate_ps / clock_period_ps(clock_hz)?;
    if ticks < u64::from(MIN_WINDOW_TICKS) {
        return Err(CounterError::InvalidTiming {
            reason: "gate time shorter than the minimum window",
        });
    }
    u16::try_from(ticks)
        .ok()
        .filter(|ticks| *ticks <= crate::WINDOW_MASK)
        .ok_or(CounterError::InvalidTiming {
            reason: "gate time exceeds the 12-bit period register",
        })
}

/// Top eight bits to load for a desired window length; the low nibble is
/// dropped, so the achieved window may be up to 15 ticks shorter.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn period_top_bits(window_ticks: u16) -> u8 {
    let top = window_ticks >> 4;
    if top > 0xFF {
        0xFF
    } else {
        top as u8
    }
}

/// Window length achieved by loading `window_ticks`.
#[must_use]
pub const fn achieved_window_ticks(window_ticks: u16) -> u16 {
    PeriodRegister::from_top_bits(period_top_bits(window_ticks)).window_ticks()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{
        achieved_window_ticks, clock_period_ps, gate_window_ticks, period_top_bits,
        phase_budget, window_phase_ticks, CONVERSION_MAX_TICKS, PHASE_BUDGET_TABLE,
    };
    use crate::{CounterError, DebugState};

    #[test]
    fn table_contains_unique_phases() {
        let phases: HashSet<_> = PHASE_BUDGET_TABLE.iter().map(|(phase, _)| *phase).collect();
        assert_eq!(phases.len(), PHASE_BUDGET_TABLE.len());
        assert_eq!(phase_budget(DebugState::Tens), Some(9));
        assert_eq!(phase_budget(DebugState::Units), Some(1));
        assert_eq!(phase_budget(DebugState::Window), None);
        assert_eq!(CONVERSION_MAX_TICKS, 10);
    }

    #[test]
    fn window_phase_fills_remainder_of_window() {
        assert_eq!(window_phase_ticks(992, 0), 990);
        assert_eq!(window_phase_ticks(992, 9), 982);
    }

    #[test]
    fn ten_megahertz_clock_calibrates_to_992_tick_window() {
        assert_eq!(clock_period_ps(10_000_000), Ok(100_000));
        let ticks = gate_window_ticks(10_000_000, 100_000_000).expect("100 us gate fits");
        assert_eq!(ticks, 1000);
        assert_eq!(period_top_bits(ticks), 0x3E);
        assert_eq!(achieved_window_ticks(ticks), 992);
        assert_eq!(achieved_window_ticks(999), 992);
    }

    #[test]
    fn invalid_timings_are_rejected() {
        assert!(matches!(
            clock_period_ps(0),
            Err(CounterError::InvalidTiming { .. })
        ));
        assert!(gate_window_ticks(10_000_000, 1_000).is_err());
        assert!(gate_window_ticks(10_000_000, 1_000_000_000).is_err());
    }

    #[test]
    fn top_bits_saturate_at_register_width() {
        assert_eq!(period_top_bits(0xFFFF), 0xFF);
        assert_eq!(period_top_bits(0x600), 0x60);
    }
}
