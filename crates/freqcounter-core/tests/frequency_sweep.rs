//! Display convergence against a calibrated 100 us gate on a 10 MHz clock.

use freqcounter_core::{
    gate_window_ticks, CounterConfig, DebugState, DisplayOverflow, Testbench, TraceEvent,
};
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

const CLOCK_HZ: u64 = 10_000_000;
/// The display counts edges per 100 us, so a reading of N is N * 10 kHz.
const GATE_PS: u64 = 100_000_000;
const REQUESTED_WINDOW: u16 = 999;
const SETTLE_WINDOWS: u64 = 4;

fn calibrated_bench(config: CounterConfig) -> (Testbench, u16) {
    let mut bench = Testbench::new(CLOCK_HZ, config).expect("10 MHz clock is valid");
    bench.reset(5);
    bench.run_cycles(5);
    let achieved = bench.load_period(REQUESTED_WINDOW);
    (bench, achieved)
}

fn signal_period_ps(display_units: u64) -> u64 {
    GATE_PS / display_units
}

#[test]
fn calibration_matches_ten_megahertz_clock() {
    let (bench, achieved) = calibrated_bench(CounterConfig::default());
    assert_eq!(achieved, 992);
    assert_eq!(bench.counter().state().period.top_bits(), 0x3E);
    assert_eq!(gate_window_ticks(CLOCK_HZ, GATE_PS), Ok(1_000));
}

#[rstest]
#[case(10)]
#[case(15)]
#[case(31)]
#[case(69)]
#[case(75)]
#[case(90)]
fn display_converges_within_one_unit(#[case] display_units: u64) {
    let (mut bench, _) = calibrated_bench(CounterConfig::default());
    bench
        .start_signal(signal_period_ps(display_units), 0)
        .expect("signal period is valid");

    bench.run_cycles(u64::from(REQUESTED_WINDOW) * SETTLE_WINDOWS);
    let shown = u64::from(bench.read_display().expect("both digits are driven"));

    assert!(
        shown.abs_diff(display_units) <= 1,
        "input {display_units}, displayed {shown}"
    );
}

#[test]
fn sweep_without_reset_between_frequencies() {
    let (mut bench, _) = calibrated_bench(CounterConfig::default());

    for display_units in [10, 15, 31, 69, 75, 90] {
        bench
            .start_signal(signal_period_ps(display_units), 0)
            .expect("signal period is valid");
        bench.run_cycles(u64::from(REQUESTED_WINDOW) * SETTLE_WINDOWS);
        let shown = u64::from(bench.read_display().expect("both digits are driven"));
        assert!(
            shown.abs_diff(display_units) <= 1,
            "input {display_units}, displayed {shown}"
        );
        bench.stop_signal();
    }
}

#[rstest]
#[case(DisplayOverflow::Saturate, 99)]
#[case(DisplayOverflow::Wrap, 24)]
fn counts_above_two_digits_follow_overflow_policy(
    #[case] display_overflow: DisplayOverflow,
    #[case] expected: u8,
) {
    let config = CounterConfig {
        display_overflow,
        ..CounterConfig::default()
    };
    let (mut bench, _) = calibrated_bench(config);
    // One edge every 8 ticks puts 124 edges in a 992-tick window.
    bench
        .start_signal(bench.clock_period_ps() * 8, 0)
        .expect("signal period is valid");
    bench.run_cycles(u64::from(REQUESTED_WINDOW) * SETTLE_WINDOWS);

    let shown = bench.read_display().expect("both digits are driven");
    let expected = i16::from(expected);
    assert!(
        (i16::from(shown) - expected).abs() <= 1,
        "policy {display_overflow:?}, displayed {shown}"
    );
}

#[test]
fn trace_reports_each_window_close_in_order() {
    let config = CounterConfig {
        tracing_enabled: true,
        ..CounterConfig::default()
    };
    let (mut bench, achieved) = calibrated_bench(config);
    bench
        .start_signal(signal_period_ps(31), 0)
        .expect("signal period is valid");

    let mut sink = Vec::new();
    for _ in 0..u64::from(achieved) * 3 {
        bench.clock_traced(&mut sink);
    }

    let closes = sink
        .iter()
        .filter(|event| matches!(event, TraceEvent::WindowClosed { .. }))
        .count();
    assert_eq!(closes, 3);

    let updates: Vec<u8> = sink
        .iter()
        .filter_map(|event| match event {
            TraceEvent::DisplayUpdated { value } => Some(*value),
            _ => None,
        })
        .collect();
    let last = *updates.last().expect("at least one display update");
    assert!(last.abs_diff(31) <= 1, "displayed {last}");

    assert!(sink.iter().any(|event| matches!(
        event,
        TraceEvent::StateChanged {
            from: DebugState::Tens,
            to: DebugState::Units
        }
    )));
}
