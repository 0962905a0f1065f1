//! VCD waveform dump of the counter pins and debug fields.

use std::io::{self, Write};

use freqcounter_core::{Inputs, Outputs};
use vcd::{IdCode, TimescaleUnit, Value, Writer as VcdWriter};

/// Scope name used for every signal in the dump.
pub const MODULE_NAME: &str = "freqcounter";

const BYTE_WIDTH: u32 = 8;
const STATE_WIDTH: u32 = 2;
const COUNT_WIDTH: u32 = 3;

const fn bool_to_vcd(bit: bool) -> Value {
    if bit {
        Value::V1
    } else {
        Value::V0
    }
}

fn bits(value: u8, width: u32) -> impl Iterator<Item = Value> {
    (0..width).rev().map(move |bit| bool_to_vcd((value >> bit) & 1 == 1))
}

#[derive(Debug, Clone, Copy)]
struct SignalIds {
    clk: IdCode,
    rst_n: IdCode,
    signal: IdCode,
    debug_mode: IdCode,
    display: IdCode,
    bus: IdCode,
    bus_oe: IdCode,
    dbg_state: IdCode,
    dbg_edge_count: IdCode,
    dbg_clk_count: IdCode,
}

/// Writes one sample per clock tick, emitting only the signals that changed.
pub struct WaveformWriter<W: Write> {
    vcd: VcdWriter<W>,
    ids: SignalIds,
    half_period_ps: u64,
    last: Option<(Inputs, Outputs)>,
}

impl<W: Write> WaveformWriter<W> {
    /// Writes the VCD header for a clock of `clock_period_ps`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn new(out: W, clock_period_ps: u64) -> io::Result<Self> {
        let mut vcd = VcdWriter::new(out);
        vcd.timescale(1, TimescaleUnit::PS)?;
        vcd.add_module(MODULE_NAME)?;
        let ids = SignalIds {
            clk: vcd.add_wire(1, "clk")?,
            rst_n: vcd.add_wire(1, "rst_n")?,
            signal: vcd.add_wire(1, "signal")?,
            debug_mode: vcd.add_wire(1, "debug_mode")?,
            display: vcd.add_wire(BYTE_WIDTH, "display")?,
            bus: vcd.add_wire(BYTE_WIDTH, "bus")?,
            bus_oe: vcd.add_wire(BYTE_WIDTH, "bus_oe")?,
            dbg_state: vcd.add_wire(STATE_WIDTH, "dbg_state")?,
            dbg_edge_count: vcd.add_wire(COUNT_WIDTH, "dbg_edge_count")?,
            dbg_clk_count: vcd.add_wire(COUNT_WIDTH, "dbg_clk_count")?,
        };
        vcd.upscope()?;
        vcd.enddefinitions()?;

        Ok(Self {
            vcd,
            ids,
            half_period_ps: clock_period_ps / 2,
            last: None,
        })
    }

    /// Records the tick whose rising clock edge is at `time_ps`, with the
    /// inputs sampled on it and the outputs it produced.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn record(&mut self, time_ps: u64, inputs: &Inputs, outputs: &Outputs) -> io::Result<()> {
        self.vcd.timestamp(time_ps)?;
        self.vcd.change_scalar(self.ids.clk, Value::V1)?;

        let previous = self.last;
        let changed = |pick: fn(&Inputs, &Outputs) -> u8| match previous {
            Some((last_in, last_out)) => pick(&last_in, &last_out) != pick(inputs, outputs),
            None => true,
        };

        let scalars: [(IdCode, fn(&Inputs, &Outputs) -> u8); 3] = [
            (self.ids.rst_n, |inputs, _| u8::from(inputs.rst_n)),
            (self.ids.signal, |inputs, _| u8::from(inputs.signal)),
            (self.ids.debug_mode, |inputs, _| u8::from(inputs.debug_mode)),
        ];
        for (id, pick) in scalars {
            if changed(pick) {
                self.vcd.change_scalar(id, bool_to_vcd(pick(inputs, outputs) != 0))?;
            }
        }

        let vectors: [(IdCode, u32, fn(&Inputs, &Outputs) -> u8); 6] = [
            (self.ids.display, BYTE_WIDTH, |_, outputs| outputs.display),
            (self.ids.bus, BYTE_WIDTH, |_, outputs| outputs.bus.bits()),
            (self.ids.bus_oe, BYTE_WIDTH, |_, outputs| outputs.bus_oe),
            (self.ids.dbg_state, STATE_WIDTH, |_, outputs| {
                outputs.debug.state.as_u8()
            }),
            (self.ids.dbg_edge_count, COUNT_WIDTH, |_, outputs| {
                outputs.debug.edge_count
            }),
            (self.ids.dbg_clk_count, COUNT_WIDTH, |_, outputs| {
                outputs.debug.clk_count
            }),
        ];
        for (id, width, pick) in vectors {
            if changed(pick) {
                self.vcd.change_vector(id, bits(pick(inputs, outputs), width))?;
            }
        }

        self.vcd.timestamp(time_ps + self.half_period_ps)?;
        self.vcd.change_scalar(self.ids.clk, Value::V0)?;
        self.last = Some((*inputs, *outputs));
        Ok(())
    }

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.vcd.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::WaveformWriter;
    use freqcounter_core::{CounterConfig, FrequencyCounter, Inputs};

    fn dump(ticks: usize) -> String {
        let mut out = Vec::new();
        {
            let mut waveform = WaveformWriter::new(&mut out, 100_000).expect("header writes");
            let mut counter = FrequencyCounter::new(CounterConfig::default());
            let inputs = Inputs {
                debug_mode: true,
                ..Inputs::default()
            };
            for tick in 0..ticks {
                let outputs = counter.step(&inputs);
                let time = u64::try_from(tick).expect("tick fits u64") * 100_000;
                waveform.record(time, &inputs, &outputs).expect("sample writes");
            }
            waveform.flush().expect("flush succeeds");
        }
        String::from_utf8(out).expect("vcd is ascii")
    }

    #[test]
    fn header_declares_every_signal() {
        let text = dump(0);
        assert!(text.contains("$timescale 1 ps $end"));
        for name in [
            "clk",
            "rst_n",
            "signal",
            "debug_mode",
            "display",
            "bus",
            "bus_oe",
            "dbg_state",
            "dbg_edge_count",
            "dbg_clk_count",
        ] {
            assert!(
                text.lines().any(|line| line.starts_with("$var") && line.contains(&format!(" {name} "))),
                "missing {name}"
            );
        }
        assert!(text.contains("$enddefinitions $end"));
    }

    #[test]
    fn clock_toggles_at_half_period() {
        let text = dump(2);
        assert!(text.contains("#0\n"));
        assert!(text.contains("#50000\n"));
        assert!(text.contains("#100000\n"));
        assert!(text.contains("#150000\n"));
    }

    #[test]
    fn unchanged_signals_are_not_repeated() {
        // Only bus_oe reads all ones, and it holds that value from the first
        // tick on.
        let text = dump(3);
        let all_ones = text.lines().filter(|line| line.starts_with("b11111111 ")).count();
        assert_eq!(all_ones, 1);
    }
}
