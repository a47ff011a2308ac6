//! Synthetic benchmarks for the filter chain and the spectrum analyzer.

use std::time::Instant;

use rand::Rng;

use crate::analysis::config::FftOrder;
use crate::analysis::spectrum::SpectrumAnalyzer;
use crate::constants::ANALYZER_FLOOR_DB;
use crate::dsp::chain::FilterChain;
use crate::params::{ChainSettings, Slope};

/// Configuration parameters for a benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct DspBenchConfig {
    pub sample_rate: u32,
    pub input_seconds: f32,
    pub block_size: usize,
    pub fft_order: FftOrder,
    pub iterations: usize,
}

impl Default for DspBenchConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            input_seconds: 10.0,
            block_size: 512,
            fft_order: FftOrder::Order2048,
            iterations: 5,
        }
    }
}

/// Timing results from a benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct DspBenchResult {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub audio_time_ms: f64,
    pub rt_factor: f64,
    pub blocks: usize,
}

/// Heaviest chain the parameters allow: 48 dB/oct on both cuts, peak active.
fn worst_case_settings() -> ChainSettings {
    ChainSettings {
        low_cut_freq: 80.0,
        high_cut_freq: 12_000.0,
        peak_freq: 1_000.0,
        peak_gain_db: 6.0,
        peak_quality: 1.4,
        low_cut_slope: Slope::Db48,
        high_cut_slope: Slope::Db48,
        ..ChainSettings::default()
    }
}

fn noise(len: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(-1.0_f32..1.0_f32)).collect()
}

fn summarize(times: &[f64], input_len: usize, sample_rate: u32, blocks: usize) -> DspBenchResult {
    let min_ms = times.iter().copied().fold(f64::INFINITY, |a, b| a.min(b));
    let max_ms = times.iter().copied().fold(0.0_f64, |a, b| a.max(b));
    let avg_ms = times.iter().sum::<f64>() / times.len() as f64;
    let audio_time_ms = (input_len as f64 / sample_rate as f64) * 1000.0;
    let rt_factor = if audio_time_ms > 0.0 {
        avg_ms / audio_time_ms
    } else {
        0.0
    };

    DspBenchResult {
        avg_ms,
        min_ms: if min_ms.is_finite() { min_ms } else { 0.0 },
        max_ms,
        audio_time_ms,
        rt_factor,
        blocks,
    }
}

/// Time the worst-case filter chain over white noise, block by block.
pub fn bench_filter_chain(config: DspBenchConfig) -> DspBenchResult {
    let input_len = (config.sample_rate as f32 * config.input_seconds).max(1.0) as usize;
    let block_size = config.block_size.max(1);
    let input = noise(input_len);
    let mut chain = FilterChain::from_settings(&worst_case_settings(), config.sample_rate as f64);
    let mut work = input.clone();
    let mut times: Vec<f64> = Vec::with_capacity(config.iterations.max(1));

    for _ in 0..config.iterations.max(1) {
        work.copy_from_slice(&input);
        let start = Instant::now();
        for block in work.chunks_mut(block_size) {
            chain.process(block);
        }
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    let blocks = (input_len + block_size - 1) / block_size;
    summarize(&times, input_len, config.sample_rate, blocks)
}

/// Time the analyzer as the UI tick would drive it: one FFT per block.
pub fn bench_spectrum(config: DspBenchConfig) -> DspBenchResult {
    let input_len = (config.sample_rate as f32 * config.input_seconds).max(1.0) as usize;
    let block_size = config.block_size.max(1);
    let fft_size = config.fft_order.fft_size();
    let input = noise(input_len);
    let mut times: Vec<f64> = Vec::with_capacity(config.iterations.max(1));
    let mut blocks = 0;

    for _ in 0..config.iterations.max(1) {
        let mut analyzer = match SpectrumAnalyzer::new(config.fft_order, 2) {
            Ok(analyzer) => analyzer,
            Err(_) => break,
        };
        blocks = 0;
        let start = Instant::now();
        let mut end = block_size.min(input_len);
        while end <= input_len {
            let begin = end.saturating_sub(fft_size);
            analyzer.analyze(&input[begin..end], ANALYZER_FLOOR_DB);
            analyzer.pull_frame();
            blocks += 1;
            end += block_size;
        }
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    if times.is_empty() {
        times.push(0.0);
    }
    summarize(&times, input_len, config.sample_rate, blocks)
}

/// Run the spectrum benchmark for each FFT order using a shared base config.
pub fn bench_spectrum_sweep(
    base: DspBenchConfig,
    orders: &[FftOrder],
) -> Vec<(usize, DspBenchResult)> {
    let mut results = Vec::new();
    for &fft_order in orders {
        let config = DspBenchConfig { fft_order, ..base };
        results.push((fft_order.fft_size(), bench_spectrum(config)));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_report_sane_numbers() {
        let config = DspBenchConfig {
            input_seconds: 0.1,
            iterations: 2,
            ..DspBenchConfig::default()
        };
        let chain = bench_filter_chain(config);
        assert_eq!(chain.blocks, 10);
        assert!(chain.min_ms <= chain.max_ms);

        let sweep = bench_spectrum_sweep(config, &[FftOrder::Order2048, FftOrder::Order4096]);
        assert_eq!(sweep.len(), 2);
        assert_eq!(sweep[0].0, 2_048);
        assert!(sweep.iter().all(|(_, result)| result.blocks == 9));
    }
}
