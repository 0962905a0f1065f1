//! CLI entry point for the frequency counter simulator.

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use freqcounter_core::{CounterConfig, DebugFields, DisplayOverflow, PS_PER_SECOND};
use freqcounter_sim::{
    run_single, run_sweep, Calibration, RunRequest, RunSummary, SimError, WaveformWriter,
};
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};
use vcd as _;

const LOG_ENV_VAR: &str = "FREQCOUNTER_LOG";
const DEFAULT_FREQUENCIES: [u64; 6] = [10, 15, 31, 69, 75, 90];
const PS_PER_US: u64 = PS_PER_SECOND / 1_000_000;

const USAGE_TEXT: &str = "\
Usage: freqcounter-sim <command> [options]

Commands:
  sweep                 Measure several input frequencies and check each reading
  run --freq <units>    Measure one input frequency

Options:
  --clock-mhz <n>       Core clock in MHz (default: 10)
  --gate-us <n>         Gate time in microseconds (default: 100)
  --windows <n>         Windows to settle before reading (default: 4)
  --wrap                Show counts above 99 modulo 100 instead of as 99
  --freqs <a,b,...>     Input frequencies (sweep only; default: 10,15,31,69,75,90)
  --freq <n>            Input frequency (run only)
  --cycles <n>          Ticks to simulate (run only; default: settle time)
  --debug               Drive debug mode and print the debug bus (run only)
  --vcd <file>          Write a waveform of the measurement (run only)
  -h, --help            Show this help message

Frequencies are in display units: rising edges per gate time.
Set FREQCOUNTER_LOG (for example to debug) to enable logging on stderr.

Examples:
  freqcounter-sim sweep
  freqcounter-sim sweep --freqs 5,50,95 --gate-us 200
  freqcounter-sim run --freq 31 --debug --vcd run.vcd
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Sweep(SweepArgs),
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommonArgs {
    clock_mhz: u64,
    gate_us: u64,
    windows: u64,
    wrap: bool,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            clock_mhz: 10,
            gate_us: 100,
            windows: 4,
            wrap: false,
        }
    }
}

impl CommonArgs {
    fn calibration(&self) -> Calibration {
        Calibration {
            clock_hz: self.clock_mhz.saturating_mul(1_000_000),
            gate_ps: self.gate_us.saturating_mul(PS_PER_US),
            settle_windows: self.windows,
        }
    }

    fn counter_config(&self) -> CounterConfig {
        CounterConfig {
            display_overflow: if self.wrap {
                DisplayOverflow::Wrap
            } else {
                DisplayOverflow::Saturate
            },
            ..CounterConfig::default()
        }
    }

    /// Consumes `arg` if it is a shared option.
    fn accept(
        &mut self,
        arg: &OsString,
        args: &mut impl Iterator<Item = OsString>,
    ) -> Result<bool, String> {
        if arg == "--clock-mhz" {
            self.clock_mhz = parse_value("--clock-mhz", args.next())?;
        } else if arg == "--gate-us" {
            self.gate_us = parse_value("--gate-us", args.next())?;
        } else if arg == "--windows" {
            self.windows = parse_value("--windows", args.next())?;
        } else if arg == "--wrap" {
            self.wrap = true;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SweepArgs {
    common: CommonArgs,
    frequencies: Vec<u64>,
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    common: CommonArgs,
    frequency: u64,
    cycles: Option<u64>,
    debug: bool,
    vcd: Option<PathBuf>,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "sweep" => parse_sweep_args(args)
            .map(Command::Sweep)
            .map(ParseResult::Command),
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_value<T: FromStr>(flag: &str, value: Option<OsString>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    let text = value.to_string_lossy();
    text.parse()
        .map_err(|_| format!("invalid value for {flag}: {text}"))
}

fn parse_list(flag: &str, value: Option<OsString>) -> Result<Vec<u64>, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    let text = value.to_string_lossy();
    text.split(',')
        .map(|item| {
            item.trim()
                .parse()
                .map_err(|_| format!("invalid value for {flag}: {item}"))
        })
        .collect()
}

#[allow(clippy::while_let_on_iterator)]
fn parse_sweep_args(mut args: impl Iterator<Item = OsString>) -> Result<SweepArgs, String> {
    let mut common = CommonArgs::default();
    let mut frequencies = DEFAULT_FREQUENCIES.to_vec();

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if common.accept(&arg, &mut args)? {
            continue;
        }

        if arg == "--freqs" {
            frequencies = parse_list("--freqs", args.next())?;
            continue;
        }

        return Err(format!("unknown option: {}", arg.to_string_lossy()));
    }

    if frequencies.is_empty() {
        return Err("no frequencies to sweep".to_string());
    }
    Ok(SweepArgs {
        common,
        frequencies,
    })
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut common = CommonArgs::default();
    let mut frequency: Option<u64> = None;
    let mut cycles: Option<u64> = None;
    let mut debug = false;
    let mut vcd: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if common.accept(&arg, &mut args)? {
            continue;
        }

        if arg == "--freq" {
            frequency = Some(parse_value("--freq", args.next())?);
        } else if arg == "--cycles" {
            cycles = Some(parse_value("--cycles", args.next())?);
        } else if arg == "--debug" {
            debug = true;
        } else if arg == "--vcd" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --vcd".to_string())?;
            vcd = Some(PathBuf::from(value));
        } else {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }
    }

    let frequency = frequency.ok_or_else(|| "missing --freq".to_string())?;
    Ok(RunArgs {
        common,
        frequency,
        cycles,
        debug,
        vcd,
    })
}

fn init_logging() {
    let subscriber = Registry::default()
        .with(EnvFilter::from_env(LOG_ENV_VAR))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true),
        );
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialised");
    }
}

fn run_sweep_command(args: &SweepArgs) -> Result<(), i32> {
    let readings = match run_sweep(
        &args.common.calibration(),
        args.common.counter_config(),
        &args.frequencies,
    ) {
        Ok(readings) => readings,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    for reading in &readings {
        let shown = reading
            .displayed
            .map_or_else(|| "--".to_string(), |value| format!("{value:02}"));
        let verdict = if reading.passed() { "ok" } else { "FAIL" };
        println!("input {:>3}  display {shown}  {verdict}", reading.input);
    }

    let failed = readings.iter().filter(|reading| !reading.passed()).count();
    println!();
    println!("Sweep Summary: {} passed, {failed} failed", readings.len() - failed);

    if failed == 0 {
        Ok(())
    } else {
        Err(1)
    }
}

fn open_waveform(
    path: &Path,
    clock_period_ps: u64,
) -> Result<WaveformWriter<BufWriter<File>>, SimError> {
    let file = File::create(path)?;
    Ok(WaveformWriter::new(BufWriter::new(file), clock_period_ps)?)
}

fn print_debug(fields: DebugFields, bus_oe: u8) {
    println!(
        "debug   state {:?}  edge_count {}  clk_count {}  bus 0x{:02X}  bus_oe 0x{bus_oe:02X}",
        fields.state,
        fields.edge_count,
        fields.clk_count,
        fields.pack()
    );
}

fn execute_run(args: &RunArgs) -> Result<RunSummary, SimError> {
    let calibration = args.common.calibration();
    let config = args.common.counter_config();
    let request = RunRequest {
        input: args.frequency,
        cycles: args.cycles,
        debug_mode: args.debug,
    };

    match &args.vcd {
        Some(path) => {
            let clock_period_ps = freqcounter_core::clock_period_ps(calibration.clock_hz)?;
            let mut waveform = open_waveform(path, clock_period_ps)?;
            run_single(&calibration, config, &request, Some(&mut waveform))
        }
        None => run_single::<io::Sink>(&calibration, config, &request, None),
    }
}

fn run_run_command(args: &RunArgs) -> Result<(), i32> {
    let result = execute_run(args);

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    let shown = summary
        .displayed
        .map_or_else(|| "--".to_string(), |value| format!("{value:02}"));
    println!(
        "input {}  period {} ps  cycles {}  display {shown}",
        args.frequency,
        summary.signal.period_ps(),
        summary.cycles
    );
    if args.debug {
        print_debug(summary.debug, summary.bus_oe);
    }
    if let Some(path) = &args.vcd {
        println!("waveform -> {}", path.display());
    }
    Ok(())
}

fn main() {
    init_logging();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Sweep(args))) => match run_sweep_command(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Run(args))) => match run_run_command(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn os_args(args: &[&str]) -> impl Iterator<Item = OsString> {
        args.iter().map(OsString::from).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_sweep_defaults() {
        let result = parse_sweep_args(std::iter::empty()).expect("empty sweep args should parse");
        assert_eq!(
            result,
            SweepArgs {
                common: CommonArgs::default(),
                frequencies: DEFAULT_FREQUENCIES.to_vec(),
            }
        );
    }

    #[test]
    fn parses_sweep_options() {
        let result = parse_sweep_args(os_args(&[
            "--freqs",
            "5, 50,95",
            "--gate-us",
            "200",
            "--wrap",
        ]))
        .expect("valid sweep args should parse");

        assert_eq!(result.frequencies, vec![5, 50, 95]);
        assert_eq!(result.common.gate_us, 200);
        assert!(result.common.wrap);
        assert_eq!(
            result.common.counter_config().display_overflow,
            DisplayOverflow::Wrap
        );
    }

    #[test]
    fn parses_run_command() {
        let result = parse_run_args(os_args(&[
            "--freq",
            "31",
            "--clock-mhz",
            "20",
            "--debug",
            "--vcd",
            "run.vcd",
            "--cycles",
            "500",
        ]))
        .expect("valid run args should parse");

        assert_eq!(
            result,
            RunArgs {
                common: CommonArgs {
                    clock_mhz: 20,
                    ..CommonArgs::default()
                },
                frequency: 31,
                cycles: Some(500),
                debug: true,
                vcd: Some(PathBuf::from("run.vcd")),
            }
        );
    }

    #[test]
    fn calibration_converts_units() {
        let calibration = CommonArgs::default().calibration();
        assert_eq!(calibration.clock_hz, 10_000_000);
        assert_eq!(calibration.gate_ps, 100_000_000);
        assert_eq!(calibration.settle_windows, 4);
    }

    #[test]
    fn parses_help_flag() {
        let result = parse_args(os_args(&["--help"])).expect("help should parse without error");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn rejects_unknown_command() {
        let error = parse_args(os_args(&["measure"])).expect_err("unknown command should fail");
        assert!(error.contains("unknown command"));
    }

    #[test]
    fn run_requires_frequency() {
        let error = parse_run_args(os_args(&["--debug"])).expect_err("missing freq should fail");
        assert!(error.contains("missing --freq"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        let error = parse_sweep_args(os_args(&["--freqs", "10,x"]))
            .expect_err("bad list should fail");
        assert!(error.contains("invalid value for --freqs"));

        let error = parse_run_args(os_args(&["--freq"])).expect_err("missing value should fail");
        assert!(error.contains("missing value for --freq"));
    }

    #[test]
    fn sweep_rejects_run_options() {
        let error = parse_sweep_args(os_args(&["--debug"])).expect_err("sweep has no --debug");
        assert!(error.contains("unknown option"));
    }
}
