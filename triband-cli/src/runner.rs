use std::error::Error;
use std::fmt::Display;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;

use clap::ArgMatches;
use log::{error, info};
use triband_lib::analysis::path::Rect;
use triband_lib::analysis::response::ResponseCurve;
use triband_lib::analysis::spectrum::SpectrumAnalyzer;
use triband_lib::analysis::AnalyzerConfig;
use triband_lib::constants::{MAX_FREQ_HZ, MIN_FREQ_HZ};
use triband_lib::dsp::scale::map_to_log10;
use triband_lib::params::save_state;
use triband_lib::{AnalyzerView, ChainSettings, Channel, EqError, EqProcessor, SharedParameters};

use crate::cli;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

pub fn run(args: &ArgMatches) -> Result<i32> {
    // Benchmarks take precedence over subcommands.
    if let Some(code) = cli::bench::maybe_run_bench(args)? {
        return Ok(code);
    }

    match args.subcommand() {
        Some(("curve", sub)) => run_curve(sub),
        Some(("analyze", sub)) => run_analyze(sub),
        Some(("create", sub)) => run_create(sub),
        _ => {
            error!("No command given");
            Ok(1)
        }
    }
}

/// Parse a string-valued argument, naming the flag in the error.
pub fn parse_value<T>(args: &ArgMatches, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = args
        .get_one::<String>(name)
        .ok_or_else(|| format!("missing --{}", name))?;
    raw.parse::<T>()
        .map_err(|err| format!("invalid --{} value '{}': {}", name, raw, err).into())
}

fn parse_sample_rate(args: &ArgMatches) -> Result<f64> {
    let sample_rate: f64 = parse_value(args, "sample-rate")?;
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(EqError::InvalidSampleRate(sample_rate).into());
    }
    Ok(sample_rate)
}

fn load_settings(args: &ArgMatches) -> Result<ChainSettings> {
    match args.get_one::<String>("settings") {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| format!("failed to read settings {}: {}", path, err))?;
            let settings: ChainSettings = serde_json::from_str(&text)
                .map_err(|err| format!("failed to parse settings {}: {}", path, err))?;
            info!("Loaded settings from {}", path);
            Ok(settings)
        }
        None => Ok(ChainSettings::default()),
    }
}

fn load_analyzer_config(args: &ArgMatches) -> Result<AnalyzerConfig> {
    match args.get_one::<String>("analyzer") {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| format!("failed to read analyzer config {}: {}", path, err))?;
            let config: AnalyzerConfig = serde_json::from_str(&text)
                .map_err(|err| format!("failed to parse analyzer config {}: {}", path, err))?;
            Ok(config.sanitized())
        }
        None => Ok(AnalyzerConfig::default()),
    }
}

fn shared_parameters(settings: &ChainSettings) -> Arc<SharedParameters> {
    let params = Arc::new(SharedParameters::new());
    params.set_snapshot(settings);
    params
}

fn run_curve(args: &ArgMatches) -> Result<i32> {
    let settings = load_settings(args)?;
    let sample_rate = parse_sample_rate(args)?;
    let width: usize = parse_value(args, "width")?;
    if width == 0 {
        return Err("--width must be at least 1".into());
    }

    let params = shared_parameters(&settings);
    let mut curve = ResponseCurve::new(width, sample_rate);
    curve.poll(&params);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string(curve.curve())?);
        return Ok(0);
    }

    for (pixel, db) in curve.curve() {
        let freq = map_to_log10(*pixel as f64 / width as f64, MIN_FREQ_HZ, MAX_FREQ_HZ);
        println!("{:>5} {:>10.1} Hz {:>8.2} dB", pixel, freq, db);
    }
    Ok(0)
}

fn tone(phase: &mut f64, freq: f64, sample_rate: f64, len: usize) -> Vec<f32> {
    let step = 2.0 * std::f64::consts::PI * freq / sample_rate;
    (0..len)
        .map(|_| {
            *phase += step;
            (phase.sin() * 0.5) as f32
        })
        .collect()
}

fn run_analyze(args: &ArgMatches) -> Result<i32> {
    let settings = load_settings(args)?;
    let config = load_analyzer_config(args)?;
    let sample_rate = parse_sample_rate(args)?;
    let freq: f64 = parse_value(args, "freq")?;
    let block_size: usize = parse_value(args, "block-size")?;
    let blocks: usize = parse_value(args, "blocks")?;
    let width: f32 = parse_value(args, "width")?;

    let params = shared_parameters(&settings);
    let mut eq = EqProcessor::new(Arc::clone(&params)).with_fifo_capacity(config.fifo_capacity);
    let taps = eq.prepare(sample_rate, block_size)?;
    let mut view = AnalyzerView::new(
        Arc::clone(&params),
        config,
        Rect::new(0.0, 0.0, width, 200.0),
    );
    view.attach(taps)?;

    let mut processed: Vec<f32> = Vec::with_capacity(blocks * block_size);
    let mut phase = 0.0_f64;
    for _ in 0..blocks {
        let mut left = tone(&mut phase, freq, sample_rate, block_size);
        let mut right = left.clone();
        eq.process_block(&mut left, &mut right);
        processed.extend_from_slice(&left);
        view.tick();
    }
    view.tick();

    let mut spectrum = SpectrumAnalyzer::new(config.fft_order, 1)?;
    spectrum.analyze(&processed, config.floor_db);
    let frame = spectrum
        .pull_frame()
        .ok_or("analyzer did not produce a frame")?;
    let (bin, db) = frame
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |best, (bin, db)| if db > best.1 { (bin, db) } else { best });
    let bin_width = sample_rate / spectrum.fft_size() as f64;

    println!(
        "peak bin {} ({:.1} Hz) at {:.2} dB, fft size {}",
        bin,
        bin as f64 * bin_width,
        db,
        spectrum.fft_size()
    );
    let points = view
        .live_channel_path(Channel::Left)
        .map(|path| path.len())
        .unwrap_or(0);
    println!("left spectrum path: {} points", points);
    Ok(0)
}

fn run_create(args: &ArgMatches) -> Result<i32> {
    match args.subcommand() {
        Some(("settings-json", _)) => {
            println!("{}", serde_json::to_string_pretty(&ChainSettings::default())?);
            Ok(0)
        }
        Some(("analyzer-json", _)) => {
            println!("{}", serde_json::to_string_pretty(&AnalyzerConfig::default())?);
            Ok(0)
        }
        Some(("state", sub)) => {
            let settings = load_settings(sub)?;
            let params = shared_parameters(&settings);
            let blob = save_state(&params)?;
            println!("{}", String::from_utf8_lossy(&blob));
            Ok(0)
        }
        _ => {
            error!("Unknown create target");
            Ok(1)
        }
    }
}
