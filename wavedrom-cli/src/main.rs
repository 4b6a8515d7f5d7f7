//! WaveDrom Recorder CLI Application
//!
//! Command-line front end for the wavedrom-recorder library. It adds:
//! - Protocol and recorder configuration from a TOML file
//! - Trace loading (JSON array or JSON Lines)
//! - Writing the WaveDrom JSON document to a file or stdout

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use wavedrom_recorder::{ClockPolicy, HexCase, RecorderConfig, WaveformRecorder};

mod config;
mod trace;

/// WaveDrom Recorder - Turn bus traces into WaveDrom timing diagrams
#[derive(Parser, Debug)]
#[command(name = "wavedrom-cli")]
#[command(about = "Convert per-cycle bus snapshots into WaveDrom JSON", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml) describing the protocol
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Trace file (JSON array or JSON Lines, `-` for stdin)
    #[arg(short, long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Output file for the WaveDrom JSON (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Clock lane encoding
    #[arg(long, value_enum)]
    clock: Option<ClockArg>,

    /// Casing of data value labels
    #[arg(long, value_enum)]
    hex: Option<HexArg>,

    /// Fail on snapshots that lack a declared signal
    #[arg(long)]
    strict: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Maximum number of cycles to record
    #[arg(long, value_name = "COUNT")]
    max_cycles: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClockArg {
    Pulse,
    Alternating,
}

impl From<ClockArg> for ClockPolicy {
    fn from(arg: ClockArg) -> Self {
        match arg {
            ClockArg::Pulse => ClockPolicy::Pulse,
            ClockArg::Alternating => ClockPolicy::Alternating,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HexArg {
    Lower,
    Upper,
}

impl From<HexArg> for HexCase {
    fn from(arg: HexArg) -> Self {
        match arg {
            HexArg::Lower => HexCase::Lower,
            HexArg::Upper => HexCase::Upper,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("WaveDrom Recorder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using recorder library v{}", wavedrom_recorder::VERSION);

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    log::info!("Loading configuration from: {:?}", args.config);
    let app_config = config::load_config(&args.config)?;
    log::debug!("Configuration loaded successfully");

    let recorder_config = merge_recorder_config(app_config.recorder, args);

    let mut recorder = WaveformRecorder::from_protocol(&app_config.protocol, recorder_config)
        .with_context(|| format!("Invalid protocol '{}'", app_config.protocol.name))?;

    let trace_path = args
        .trace
        .clone()
        .or(app_config.input.trace)
        .context("No trace given (use --trace or [input] trace in the config)")?;

    log::info!("Loading trace: {:?}", trace_path);
    let snapshots = trace::load_trace(&trace_path)?;

    let max_cycles = args.max_cycles.or(app_config.input.max_cycles);
    let limit = max_cycles.unwrap_or(snapshots.len()).min(snapshots.len());
    if limit < snapshots.len() {
        log::info!("Recording first {} of {} cycles", limit, snapshots.len());
    }

    recorder
        .record_all(&snapshots[..limit])
        .with_context(|| format!("Failed to record trace {:?}", trace_path))?;

    log::info!(
        "Recorded {} cycles for {} signals",
        recorder.cycles(),
        1 + recorder.signal_set().controls().len() + recorder.signal_set().data().len()
    );

    let json = if args.pretty || app_config.output.pretty {
        recorder.to_json_pretty()?
    } else {
        recorder.to_json()?
    };

    match args.output.as_ref().or(app_config.output.file.as_ref()) {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            log::info!("Waveform written to {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}

/// Command-line flags take precedence over the configuration file
fn merge_recorder_config(mut config: RecorderConfig, args: &Args) -> RecorderConfig {
    if let Some(clock) = args.clock {
        config = config.with_clock_policy(clock.into());
    }
    if let Some(hex) = args.hex {
        config = config.with_hex_case(hex.into());
    }
    if args.strict {
        config = config.with_strict(true);
    }
    config
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "wavedrom-cli",
            "--config",
            "config.toml",
            "--clock",
            "alternating",
            "--hex",
            "upper",
            "--strict",
        ]);

        let merged = merge_recorder_config(RecorderConfig::new(), &args);
        assert_eq!(merged.clock_policy, ClockPolicy::Alternating);
        assert_eq!(merged.hex_case, HexCase::Upper);
        assert!(merged.strict);
    }

    #[test]
    fn test_config_kept_without_flags() {
        let args = Args::parse_from(["wavedrom-cli", "-c", "config.toml"]);
        let base = RecorderConfig::new().with_hex_case(HexCase::Upper).with_strict(true);

        let merged = merge_recorder_config(base, &args);
        assert_eq!(merged, base);
    }

    #[test]
    fn test_run_writes_waveform() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let trace_path = dir.path().join("trace.jsonl");
        let output_path = dir.path().join("wave.json");

        fs::write(
            &config_path,
            "[protocol]\nclock = \"CLK\"\ncontrols = [\"EN\"]\ndata = [{ name = \"D\" }]\n",
        )
        .unwrap();
        fs::write(
            &trace_path,
            "{\"EN\": 1, \"D\": 10}\n{\"EN\": 1, \"D\": 10}\n{\"EN\": 0, \"D\": 20}\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "wavedrom-cli",
            "-c",
            config_path.to_str().unwrap(),
            "-t",
            trace_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({
                "signal": [
                    {"name": "CLK", "wave": "PPP"},
                    {"name": "EN", "wave": "1.0"},
                    {"name": "D", "wave": "=.=", "data": ["0xa", "0x14"]}
                ]
            })
        );
    }

    #[test]
    fn test_run_honours_max_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let trace_path = dir.path().join("trace.json");
        let output_path = dir.path().join("wave.json");

        fs::write(
            &config_path,
            format!(
                "[protocol]\nclock = \"CLK\"\ncontrols = [\"EN\"]\n\n[input]\ntrace = '{}'\nmax_cycles = 2\n\n[output]\nfile = '{}'\n",
                trace_path.display(),
                output_path.display()
            ),
        )
        .unwrap();
        fs::write(&trace_path, r#"[{"EN": 1}, {"EN": 0}, {"EN": 1}]"#).unwrap();

        let args = Args::parse_from(["wavedrom-cli", "-c", config_path.to_str().unwrap()]);
        run(&args).unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        assert!(written.contains(r#""wave":"10""#));
        assert!(written.contains(r#""wave":"PP""#));
    }
}
