use std::sync::Arc;
use std::thread;

use triband_lib::analysis::path::Rect;
use triband_lib::analysis::response::{combined_magnitude, trace};
use triband_lib::analysis::AnalyzerConfig;
use triband_lib::dsp::chain::{ChainPosition, FilterChain};
use triband_lib::params::{load_state, save_state};
use triband_lib::{AnalyzerView, ChainSettings, Channel, EqProcessor, ParameterId, SharedParameters, Slope};

const SAMPLE_RATE: f64 = 48_000.0;

fn sine(phase: &mut f64, freq: f64, len: usize) -> Vec<f32> {
    (0..len)
        .map(|_| {
            *phase += 2.0 * std::f64::consts::PI * freq / SAMPLE_RATE;
            (phase.sin() * 0.5) as f32
        })
        .collect()
}

#[test]
fn default_settings_give_a_flat_midrange_curve() {
    let params = Arc::new(SharedParameters::new());
    let mut view = AnalyzerView::new(params, AnalyzerConfig::default(), Rect::new(0.0, 0.0, 800.0, 200.0));
    view.tick();

    let curve = view.response_curve();
    assert_eq!(curve.len(), 800);
    for (pixel, db) in curve {
        let freq = 20.0 * 1000.0_f64.powf(*pixel as f64 / 800.0);
        if (100.0..=10_000.0).contains(&freq) {
            assert!(db.abs() <= 0.5, "{freq} Hz at {db} dB");
        }
    }
}

#[test]
fn full_peak_boost_tops_out_near_one_kilohertz() {
    let params = Arc::new(SharedParameters::new());
    params.set_snapshot(&ChainSettings {
        peak_freq: 1_000.0,
        peak_gain_db: 24.0,
        peak_quality: 1.0,
        ..ChainSettings::default()
    });
    let mut view = AnalyzerView::new(params, AnalyzerConfig::default(), Rect::new(0.0, 0.0, 800.0, 200.0));
    view.tick();

    let (pixel, db) = view
        .response_curve()
        .iter()
        .copied()
        .fold((0, f64::MIN), |best, point| if point.1 > best.1 { point } else { best });
    // 800 * log(1000 / 20) / log(1000) = 453.1
    assert!(pixel.abs_diff(453) <= 1, "peak at pixel {pixel}");
    assert!((db - 24.0).abs() <= 0.5, "peak at {db} dB");
}

#[test]
fn bypassed_low_cut_is_absent_from_the_magnitude() {
    let bypassed = FilterChain::from_settings(
        &ChainSettings {
            low_cut_freq: 250.0,
            low_cut_slope: Slope::Db24,
            low_cut_bypassed: true,
            ..ChainSettings::default()
        },
        SAMPLE_RATE,
    );
    let mut absent = bypassed.clone();
    absent.set_section_bypassed(ChainPosition::LowCut, 0, true);
    absent.set_section_bypassed(ChainPosition::LowCut, 1, true);
    absent.set_bypassed(ChainPosition::LowCut, false);

    let with_stage = combined_magnitude(&bypassed, 20.0, SAMPLE_RATE);
    let without_stage = combined_magnitude(&absent, 20.0, SAMPLE_RATE);
    assert_eq!(with_stage, without_stage);
    assert!(bypassed.magnitude_at(ChainPosition::LowCut, 0, 20.0, SAMPLE_RATE) < 0.1);

    let unbypassed = trace(&FilterChain::from_settings(&ChainSettings::default(), SAMPLE_RATE), 10, SAMPLE_RATE);
    assert!(unbypassed.iter().all(|(_, db)| db.is_finite()));
}

#[test]
fn audio_and_ui_threads_run_independently() {
    let params = Arc::new(SharedParameters::new());
    let mut eq = EqProcessor::new(Arc::clone(&params));
    let mut view = AnalyzerView::new(
        Arc::clone(&params),
        AnalyzerConfig::default(),
        Rect::new(0.0, 0.0, 600.0, 150.0),
    );
    view.attach(eq.prepare(SAMPLE_RATE, 480).expect("prepare")).expect("attach");

    let audio = thread::spawn(move || {
        let (mut left_phase, mut right_phase) = (0.0, 0.0);
        for _ in 0..200 {
            let mut left = sine(&mut left_phase, 1_000.0, 480);
            let mut right = sine(&mut right_phase, 6_000.0, 480);
            eq.process_block(&mut left, &mut right);
        }
        eq
    });

    let mut left_updates = 0;
    while !audio.is_finished() {
        if view.tick().left_path {
            left_updates += 1;
        }
        thread::yield_now();
    }
    let _eq = audio.join().expect("audio thread");
    if view.tick().left_path {
        left_updates += 1;
    }

    assert!(left_updates > 0);
    let left = view.live_channel_path(Channel::Left).expect("left path");
    let right = view.live_channel_path(Channel::Right).expect("right path");
    let loudest_x = |points: &[triband_lib::analysis::Point]| {
        points
            .iter()
            .skip(1)
            .fold((0.0_f32, f32::MAX), |best, point| if point.y < best.1 { (point.x, point.y) } else { best })
            .0
    };
    assert!(loudest_x(left.points()) < loudest_x(right.points()));
}

#[test]
fn saved_state_restores_into_a_fresh_processor() {
    let source = SharedParameters::new();
    source.set_parameter(ParameterId::LowCutFreq, 180.0);
    source.set_parameter(ParameterId::LowCutSlope, 3.0);
    source.set_parameter(ParameterId::PeakGain, -7.5);
    let blob = save_state(&source).expect("save");

    let params = Arc::new(SharedParameters::new());
    load_state(&params, &blob).expect("load");
    let mut eq = EqProcessor::new(Arc::clone(&params));
    let _taps = eq.prepare(SAMPLE_RATE, 64).expect("prepare");

    let settings = params.snapshot();
    assert_eq!(settings.low_cut_slope, Slope::Db48);
    assert_eq!(settings.peak_gain_db, -7.5);
    let low_cut = eq.chain(Channel::Left).cut_filter(ChainPosition::LowCut).expect("low cut");
    assert_eq!(low_cut.active_sections(), 4);
}
