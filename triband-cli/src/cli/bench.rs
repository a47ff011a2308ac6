use clap::ArgMatches;

use crate::runner::Result;

pub fn maybe_run_bench(args: &ArgMatches) -> Result<Option<i32>> {
    // Dispatches benchmark sub-modes and returns an exit code if handled.
    if args.get_flag("bench-dsp") {
        return run_single_bench(args);
    }
    if args.get_flag("bench-sweep") {
        return run_sweep_bench(args);
    }
    Ok(None)
}

#[cfg(feature = "bench")]
fn bench_config(args: &ArgMatches) -> Result<triband_lib::diagnostics::bench::DspBenchConfig> {
    use crate::runner::parse_value;
    use triband_lib::analysis::FftOrder;

    let order: usize = parse_value(args, "bench-fft-order")?;
    Ok(triband_lib::diagnostics::bench::DspBenchConfig {
        sample_rate: 48_000,
        input_seconds: parse_value(args, "bench-input-seconds")?,
        block_size: parse_value(args, "bench-block-size")?,
        fft_order: FftOrder::from_order(order)?,
        iterations: parse_value(args, "bench-iterations")?,
    })
}

fn run_single_bench(_args: &ArgMatches) -> Result<Option<i32>> {
    #[cfg(not(feature = "bench"))]
    {
        eprintln!("Benchmarking requires the `bench` feature.");
        return Ok(Some(1));
    }
    #[cfg(feature = "bench")]
    {
        use triband_lib::diagnostics::bench::{bench_filter_chain, bench_spectrum};

        let config = bench_config(_args)?;
        let chain = bench_filter_chain(config);
        let spectrum = bench_spectrum(config);

        println!(
            "Chain bench (block={} input={}s iters={}): avg {:.2}ms (min {:.2}ms max {:.2}ms), audio {:.2}ms, rt {:.4}x, blocks {}",
            config.block_size,
            config.input_seconds,
            config.iterations,
            chain.avg_ms,
            chain.min_ms,
            chain.max_ms,
            chain.audio_time_ms,
            chain.rt_factor,
            chain.blocks
        );
        println!(
            "Spectrum bench (fft={} block={} iters={}): avg {:.2}ms (min {:.2}ms max {:.2}ms), rt {:.4}x, frames {}",
            config.fft_order.fft_size(),
            config.block_size,
            config.iterations,
            spectrum.avg_ms,
            spectrum.min_ms,
            spectrum.max_ms,
            spectrum.rt_factor,
            spectrum.blocks
        );

        return Ok(Some(0));
    }
}

fn run_sweep_bench(_args: &ArgMatches) -> Result<Option<i32>> {
    #[cfg(not(feature = "bench"))]
    {
        eprintln!("Benchmarking requires the `bench` feature.");
        return Ok(Some(1));
    }
    #[cfg(feature = "bench")]
    {
        use triband_lib::analysis::FftOrder;
        use triband_lib::diagnostics::bench::bench_spectrum_sweep;

        let base = bench_config(_args)?;
        let orders = [FftOrder::Order2048, FftOrder::Order4096, FftOrder::Order8192];
        let results = bench_spectrum_sweep(base, &orders);

        println!(
            "Spectrum sweep (block={} input={}s iters={})",
            base.block_size, base.input_seconds, base.iterations
        );
        println!("fft_size | avg_ms | min_ms | max_ms | rt_x   | frames");
        for (fft_size, result) in results {
            println!(
                "{:>8} | {:>6.2} | {:>6.2} | {:>6.2} | {:>6.4} | {:>6}",
                fft_size,
                result.avg_ms,
                result.min_ms,
                result.max_ms,
                result.rt_factor,
                result.blocks
            );
        }

        return Ok(Some(0));
    }
}
