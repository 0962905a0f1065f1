//! Deterministic trace fingerprint for cross-host comparison.
//!
//! Runs a fixed stimulus through a traced counter, restores a mid-run
//! snapshot and replays the tail, then hashes the events of both passes.
//! The replayed tail must match the original.

use freqcounter_core::{CounterConfig, FrequencyCounter, Inputs, TraceEvent, TraceSink};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

const TOTAL_TICKS: u64 = 6_000;
const SNAPSHOT_TICK: u64 = 2_500;

struct HashSink {
    hash: u64,
    events: u64,
}

impl HashSink {
    fn new() -> Self {
        Self {
            hash: 0xcbf2_9ce4_8422_2325,
            events: 0,
        }
    }

    fn mix(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash ^= u64::from(*byte);
            self.hash = self.hash.wrapping_mul(0x1000_0000_01B3);
        }
    }
}

impl TraceSink for HashSink {
    fn on_event(&mut self, event: TraceEvent) {
        self.events += 1;
        match event {
            TraceEvent::Reset => self.mix(&[0x10]),
            TraceEvent::PeriodLoaded { period } => {
                self.mix(&[0x11]);
                self.mix(&period.to_le_bytes());
            }
            TraceEvent::WindowClosed { snapshot } => self.mix(&[0x12, snapshot]),
            TraceEvent::StateChanged { from, to } => self.mix(&[0x13, from.as_u8(), to.as_u8()]),
            TraceEvent::DisplayUpdated { value } => self.mix(&[0x14, value]),
        }
    }
}

fn stimulus(tick: u64) -> Inputs {
    Inputs {
        rst_n: tick >= 5,
        // Irregular spacing so every window holds a different count.
        signal: (tick * tick / 7) % 11 < 5,
        load_period: tick == 10,
        debug_mode: tick % 1_000 > 500,
        period_in: 0x3E,
    }
}

fn main() {
    let config = CounterConfig {
        tracing_enabled: true,
        ..CounterConfig::default()
    };
    let mut counter = FrequencyCounter::new(config);
    let mut head = HashSink::new();
    let mut tail = HashSink::new();

    for tick in 0..SNAPSHOT_TICK {
        counter.step_traced(&stimulus(tick), &mut head);
    }
    let snapshot = counter.snapshot();
    for tick in SNAPSHOT_TICK..TOTAL_TICKS {
        counter.step_traced(&stimulus(tick), &mut tail);
    }
    let final_state = *counter.state();

    let mut replay = HashSink::new();
    counter
        .restore(snapshot)
        .expect("snapshot from a live counter restores");
    for tick in SNAPSHOT_TICK..TOTAL_TICKS {
        counter.step_traced(&stimulus(tick), &mut replay);
    }

    assert_eq!(replay.hash, tail.hash, "replayed tail diverged");
    assert_eq!(*counter.state(), final_state, "replayed state diverged");

    println!(
        "{:016x} {:016x} events={}",
        head.hash,
        tail.hash,
        head.events + tail.events
    );
}
