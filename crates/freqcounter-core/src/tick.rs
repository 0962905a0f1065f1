//! Clock-edge transition function.
//!
//! [`next_state`] is the register update for one rising edge and [`outputs`]
//! is the combinational logic that drives the pins from the registers. Both
//! are pure; [`tick`] composes them.

use crate::{
    BusPins, CoreState, CounterConfig, Converter, DebugState, DisplayDigits, Inputs, Outputs,
    PeriodRegister, TraceEvent, TraceSink,
};

/// Notable register updates that happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TickEvents {
    /// The tick was taken with reset asserted.
    pub reset: bool,
    /// Period register value committed by a load strobe.
    pub period_loaded: Option<PeriodRegister>,
    /// Edge count captured when the window closed.
    pub window_closed: Option<u8>,
    /// Debug machine phase change, as `(from, to)`.
    pub state_changed: Option<(DebugState, DebugState)>,
    /// Digits written into the display latch.
    pub display_updated: Option<DisplayDigits>,
}

impl TickEvents {
    /// Replays the events into `sink` in a fixed order.
    pub fn emit(&self, sink: &mut dyn TraceSink) {
        if self.reset {
            sink.on_event(TraceEvent::Reset);
        }
        if let Some(period) = self.period_loaded {
            sink.on_event(TraceEvent::PeriodLoaded {
                period: period.value(),
            });
        }
        if let Some(snapshot) = self.window_closed {
            sink.on_event(TraceEvent::WindowClosed { snapshot });
        }
        if let Some((from, to)) = self.state_changed {
            sink.on_event(TraceEvent::StateChanged { from, to });
        }
        if let Some(digits) = self.display_updated {
            sink.on_event(TraceEvent::DisplayUpdated {
                value: digits.value(),
            });
        }
    }
}

/// Register contents after one rising clock edge.
#[must_use]
pub fn next_state(
    state: &CoreState,
    inputs: &Inputs,
    config: &CounterConfig,
) -> (CoreState, TickEvents) {
    if !inputs.rst_n {
        let events = TickEvents {
            reset: true,
            ..TickEvents::default()
        };
        return (CoreState::default(), events);
    }

    let mut events = TickEvents::default();

    // Pins are outputs in debug mode, so there is nothing to load from.
    let period = if inputs.load_period && !inputs.debug_mode {
        let loaded = PeriodRegister::from_top_bits(inputs.period_in);
        events.period_loaded = Some(loaded);
        loaded
    } else {
        state.period
    };

    let (window, closed) = state.window.advanced(state.period);

    let sync = state.sync.shifted(inputs.signal);
    let edge = state.sync.rising_edge();

    let edges = if closed {
        events.window_closed = Some(state.edges.value());
        if edge {
            crate::EdgeCounter::default().incremented()
        } else {
            crate::EdgeCounter::default()
        }
    } else if edge {
        state.edges.incremented()
    } else {
        state.edges
    };

    let mut converter = state.converter;
    let mut load_display = None;
    let debug_state = if closed {
        converter = Converter::start(state.edges.value(), config.display_overflow);
        DebugState::Tens
    } else {
        match state.debug_state {
            DebugState::Window => DebugState::Window,
            DebugState::Tens => {
                let (next, done) = converter.step_tens();
                converter = next;
                if done {
                    DebugState::Units
                } else {
                    DebugState::Tens
                }
            }
            DebugState::Units => {
                load_display = Some(converter.digits());
                DebugState::Window
            }
        }
    };

    if debug_state != state.debug_state {
        events.state_changed = Some((state.debug_state, debug_state));
    }
    events.display_updated = load_display;

    let next = CoreState {
        period,
        window,
        sync,
        edges,
        converter,
        debug_state,
        display: state.display.advanced(load_display),
        debug_mode: inputs.debug_mode,
    };
    (next, events)
}

/// Pin levels driven by `state`, with `inputs` supplying the host side of
/// the bidirectional pins.
#[must_use]
pub const fn outputs(state: &CoreState, inputs: &Inputs) -> Outputs {
    let debug = state.debug_fields();
    let bus = BusPins::resolve(state.debug_mode, inputs.period_in, debug.pack());
    Outputs {
        display: state.display.output(),
        bus,
        bus_oe: bus.output_enable(),
        debug,
    }
}

/// Advances one tick and returns the new state with the pin levels it
/// drives.
#[must_use]
pub fn tick(state: &CoreState, inputs: &Inputs, config: &CounterConfig) -> (CoreState, Outputs) {
    let (next, _) = next_state(state, inputs, config);
    let pins = outputs(&next, inputs);
    (next, pins)
}

#[cfg(test)]
mod tests {
    use super::{next_state, outputs, tick};
    use crate::{
        CoreState, CounterConfig, DebugState, EdgeCounter, Inputs, PeriodRegister, BUS_OE_INPUT,
        BUS_OE_OUTPUT,
    };

    fn run(state: &mut CoreState, inputs: &Inputs, ticks: usize) {
        let config = CounterConfig::default();
        for _ in 0..ticks {
            *state = next_state(state, inputs, &config).0;
        }
    }

    #[test]
    fn load_takes_effect_on_following_tick() {
        let config = CounterConfig::default();
        let state = CoreState::default();
        let inputs = Inputs {
            load_period: true,
            period_in: 0x3E,
            ..Inputs::default()
        };

        let (next, events) = next_state(&state, &inputs, &config);
        assert_eq!(next.period.value(), 0x3E0);
        assert_eq!(events.period_loaded, Some(PeriodRegister::from_top_bits(0x3E)));
        assert_eq!(next.window.value(), 1);
    }

    #[test]
    fn load_is_ignored_while_pins_are_outputs() {
        let config = CounterConfig::default();
        let inputs = Inputs {
            load_period: true,
            debug_mode: true,
            period_in: 0x3E,
            ..Inputs::default()
        };
        let (next, events) = next_state(&CoreState::default(), &inputs, &config);
        assert_eq!(next.period.value(), 0);
        assert_eq!(events.period_loaded, None);
    }

    #[test]
    fn reset_holds_every_register_at_zero() {
        let mut state = CoreState {
            period: PeriodRegister::from_top_bits(0x10),
            edges: EdgeCounter::from_raw(40).expect("7-bit value"),
            debug_state: DebugState::Tens,
            debug_mode: true,
            ..CoreState::default()
        };
        let inputs = Inputs {
            signal: true,
            debug_mode: true,
            ..Inputs::in_reset()
        };
        run(&mut state, &inputs, 3);
        assert_eq!(state, CoreState::default());
    }

    #[test]
    fn edge_on_closing_tick_is_kept_for_next_window() {
        let config = CounterConfig::default();
        let mut state = CoreState::default();
        run(&mut state, &Inputs::default(), 13);
        let high = Inputs {
            signal: true,
            ..Inputs::default()
        };
        // Two samples put the level through the synchronizer; the edge is
        // detected on the sixteenth tick, which closes the window.
        run(&mut state, &high, 2);
        assert_eq!(state.window.value(), 15);
        assert!(state.sync.rising_edge());

        let (next, events) = next_state(&state, &high, &config);
        assert_eq!(events.window_closed, Some(0));
        assert_eq!(next.edges.value(), 1);
        assert_eq!(next.window.value(), 0);
    }

    #[test]
    fn bus_direction_follows_registered_mode() {
        let config = CounterConfig::default();
        let debug = Inputs {
            debug_mode: true,
            period_in: 0x55,
            ..Inputs::default()
        };
        assert_eq!(outputs(&CoreState::default(), &debug).bus_oe, BUS_OE_INPUT);

        let (_, pins) = tick(&CoreState::default(), &debug, &config);
        assert_eq!(pins.bus_oe, BUS_OE_OUTPUT);
        assert_eq!(pins.bus.driven(), Some(pins.debug.pack()));
    }
}
