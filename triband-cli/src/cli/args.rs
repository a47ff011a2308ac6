//! CLI argument definitions for `triband`.

use clap::{Arg, ArgAction, Command};

fn settings_arg() -> Arg {
    Arg::new("settings")
        .long("settings")
        .short('S')
        .alias("settings-json")
        .value_name("PATH")
        .help("Path to a ChainSettings JSON file (defaults when omitted)")
}

fn sample_rate_arg() -> Arg {
    Arg::new("sample-rate")
        .long("sample-rate")
        .short('r')
        .value_name("HZ")
        .default_value("48000")
        .help("Sample rate used to design the filters")
}

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("Triband")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect the triband EQ core")
        .arg_required_else_help(true)
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Suppress log output"),
        )
        .arg(
            Arg::new("bench-dsp")
                .long("bench-dsp")
                .action(ArgAction::SetTrue)
                .help("Run a synthetic filter-chain and analyzer benchmark and exit"),
        )
        .arg(
            Arg::new("bench-sweep")
                .long("bench-sweep")
                .action(ArgAction::SetTrue)
                .help("Run the analyzer benchmark over every FFT size and exit"),
        )
        .arg(
            Arg::new("bench-fft-order")
                .long("bench-fft-order")
                .value_name("ORDER")
                .default_value("11")
                .help("FFT order (11, 12 or 13) for the analyzer benchmark"),
        )
        .arg(
            Arg::new("bench-block-size")
                .long("bench-block-size")
                .value_name("SAMPLES")
                .default_value("512")
                .help("Host block size for the benchmark"),
        )
        .arg(
            Arg::new("bench-input-seconds")
                .long("bench-input-seconds")
                .value_name("SECONDS")
                .default_value("10.0")
                .help("Input length in seconds for the benchmark"),
        )
        .arg(
            Arg::new("bench-iterations")
                .long("bench-iterations")
                .value_name("COUNT")
                .default_value("5")
                .help("Number of iterations for the benchmark"),
        )
        .subcommand(
            Command::new("curve")
                .about("Print the analytic response curve, one line per pixel")
                .arg(settings_arg())
                .arg(sample_rate_arg())
                .arg(
                    Arg::new("width")
                        .long("width")
                        .short('w')
                        .value_name("PIXELS")
                        .default_value("64")
                        .help("Number of pixels to trace"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the curve as a JSON array of [pixel, dB]"),
                ),
        )
        .subcommand(
            Command::new("analyze")
                .about("Run a sine through the EQ and the spectrum analyzer")
                .arg(settings_arg())
                .arg(sample_rate_arg())
                .arg(
                    Arg::new("analyzer")
                        .long("analyzer")
                        .short('A')
                        .alias("analyzer-json")
                        .value_name("PATH")
                        .help("Path to an AnalyzerConfig JSON file"),
                )
                .arg(
                    Arg::new("freq")
                        .long("freq")
                        .short('f')
                        .value_name("HZ")
                        .default_value("1000")
                        .help("Test tone frequency"),
                )
                .arg(
                    Arg::new("block-size")
                        .long("block-size")
                        .short('b')
                        .value_name("SAMPLES")
                        .default_value("512")
                        .help("Host block size"),
                )
                .arg(
                    Arg::new("blocks")
                        .long("blocks")
                        .value_name("COUNT")
                        .default_value("32")
                        .help("Number of blocks to process"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .short('w')
                        .value_name("PIXELS")
                        .default_value("600")
                        .help("Display width used for the spectrum path"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Emit default JSON payloads")
                .subcommand_required(true)
                .subcommand(
                    Command::new("settings-json").about("Print a default ChainSettings JSON payload"),
                )
                .subcommand(
                    Command::new("analyzer-json")
                        .about("Print a default AnalyzerConfig JSON payload"),
                )
                .subcommand(
                    Command::new("state")
                        .about("Print the saved parameter state for a settings file")
                        .arg(settings_arg()),
                ),
        )
}
