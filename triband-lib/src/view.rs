//! UI-rate side of the EQ: live spectrum paths and the response overlay.

use std::sync::Arc;

use log::{debug, info};

use crate::analysis::channel::ChannelAnalyzer;
use crate::analysis::config::AnalyzerConfig;
use crate::analysis::path::{DisplayPath, Rect};
use crate::analysis::response::ResponseCurve;
use crate::constants::DEFAULT_SAMPLE_RATE;
use crate::error::EqError;
use crate::params::SharedParameters;
use crate::processor::{AnalyzerTaps, Channel};

/// What changed during one [`AnalyzerView::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub left_path: bool,
    pub right_path: bool,
    pub response_curve: bool,
}

impl TickOutcome {
    /// Whether anything visible changed.
    pub fn needs_repaint(&self) -> bool {
        self.left_path || self.right_path || self.response_curve
    }
}

/// Everything a display reads, refreshed by calling [`AnalyzerView::tick`]
/// at UI rate (about 60 Hz).
///
/// Pulls from the processor through FIFOs and the shared parameter store; it
/// never holds a reference to the processor itself.
pub struct AnalyzerView {
    params: Arc<SharedParameters>,
    config: AnalyzerConfig,
    bounds: Rect,
    sample_rate: f64,
    left: Option<ChannelAnalyzer>,
    right: Option<ChannelAnalyzer>,
    curve: ResponseCurve,
}

impl AnalyzerView {
    pub fn new(params: Arc<SharedParameters>, config: AnalyzerConfig, bounds: Rect) -> Self {
        let width = bounds.width.max(0.0) as usize;
        Self {
            params,
            config: config.sanitized(),
            bounds,
            sample_rate: DEFAULT_SAMPLE_RATE,
            left: None,
            right: None,
            curve: ResponseCurve::new(width, DEFAULT_SAMPLE_RATE),
        }
    }

    /// Connect to the FIFOs returned by [`crate::EqProcessor::prepare`].
    ///
    /// Replaces any earlier connection and retraces the response curve for the
    /// new sample rate.
    pub fn attach(&mut self, taps: AnalyzerTaps) -> Result<(), EqError> {
        self.left = Some(ChannelAnalyzer::new(taps.left, &self.config)?);
        self.right = Some(ChannelAnalyzer::new(taps.right, &self.config)?);
        self.sample_rate = taps.sample_rate;
        self.curve.set_sample_rate(taps.sample_rate, &self.params.snapshot());
        info!(
            "analyzer attached: fft size {}, {} Hz",
            self.config.fft_order.fft_size(),
            taps.sample_rate
        );
        Ok(())
    }

    /// One UI refresh.
    ///
    /// Picks up the sample rate the audio side last ran at. With analysis
    /// enabled both channels drain and analyse their FIFOs; disabled, queued
    /// samples are discarded unanalysed. The response curve is retraced only
    /// if a parameter or the sample rate changed since the previous tick.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        let sample_rate = self.params.sample_rate();
        let rate_changed = sample_rate != self.sample_rate;
        if rate_changed {
            debug!("analyzer follows sample rate {} Hz", sample_rate);
            self.sample_rate = sample_rate;
        }

        if self.params.analyzer_enabled() {
            if let Some(left) = self.left.as_mut() {
                outcome.left_path = left.process(&self.bounds, self.sample_rate);
            }
            if let Some(right) = self.right.as_mut() {
                outcome.right_path = right.process(&self.bounds, self.sample_rate);
            }
        } else {
            for analyzer in [self.left.as_mut(), self.right.as_mut()].into_iter().flatten() {
                analyzer.discard_pending();
            }
        }

        outcome.response_curve = if rate_changed {
            self.params.take_ui_change();
            self.curve.set_sample_rate(sample_rate, &self.params.snapshot());
            true
        } else {
            self.curve.poll(&self.params)
        };
        outcome
    }

    /// Resize the display. The response curve follows the new width.
    pub fn set_bounds(&mut self, bounds: Rect) {
        debug!("analyzer bounds {:?}", bounds);
        self.bounds = bounds;
        self.curve.set_width(bounds.width.max(0.0) as usize);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Rate used for bin mapping and the response overlay.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn set_analysis_enabled(&self, enabled: bool) {
        self.params.set_analyzer_enabled(enabled);
    }

    pub fn analysis_enabled(&self) -> bool {
        self.params.analyzer_enabled()
    }

    /// `(pixel, dB)` overlay for the current parameters.
    pub fn response_curve(&self) -> &[(usize, f64)] {
        self.curve.curve()
    }

    /// Response overlay as a polyline inside the current bounds.
    pub fn response_path(&self) -> DisplayPath {
        self.curve.response_path(&self.bounds)
    }

    /// Latest spectrum path of `channel`, `None` before [`AnalyzerView::attach`].
    pub fn live_channel_path(&self, channel: Channel) -> Option<&DisplayPath> {
        let analyzer = match channel {
            Channel::Left => self.left.as_ref(),
            Channel::Right => self.right.as_ref(),
        };
        analyzer.map(ChannelAnalyzer::path)
    }

    pub fn response(&self) -> &ResponseCurve {
        &self.curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterId;
    use crate::processor::EqProcessor;

    fn sine_block(phase: &mut f32, freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|_| {
                *phase += 2.0 * std::f32::consts::PI * freq / 48_000.0;
                phase.sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn unattached_view_still_traces_the_curve() {
        let params = Arc::new(SharedParameters::new());
        let mut view = AnalyzerView::new(params, AnalyzerConfig::default(), Rect::new(0.0, 0.0, 200.0, 80.0));
        assert!(view.live_channel_path(Channel::Left).is_none());
        let outcome = view.tick();
        assert!(outcome.response_curve);
        assert!(!outcome.left_path);
        assert_eq!(view.response_curve().len(), 200);
    }

    #[test]
    fn tick_turns_audio_into_paths() {
        let params = Arc::new(SharedParameters::new());
        let mut eq = EqProcessor::new(Arc::clone(&params));
        let mut view = AnalyzerView::new(
            Arc::clone(&params),
            AnalyzerConfig::default(),
            Rect::new(0.0, 0.0, 500.0, 120.0),
        );
        view.attach(eq.prepare(48_000.0, 256).expect("prepare")).expect("attach");

        let (mut left_phase, mut right_phase) = (0.0_f32, 0.0_f32);
        for _ in 0..8 {
            let mut left = sine_block(&mut left_phase, 1_000.0, 256);
            let mut right = sine_block(&mut right_phase, 4_000.0, 256);
            eq.process_block(&mut left, &mut right);
        }

        let outcome = view.tick();
        assert!(outcome.left_path && outcome.right_path);
        assert!(outcome.needs_repaint());
        assert!(!view.live_channel_path(Channel::Left).map_or(true, DisplayPath::is_empty));
        assert!(!view.tick().needs_repaint());
    }

    #[test]
    fn host_rate_change_moves_the_live_path_and_the_curve() {
        let params = Arc::new(SharedParameters::new());
        let mut eq = EqProcessor::new(Arc::clone(&params));
        let bounds = Rect::new(0.0, 0.0, 500.0, 120.0);
        let mut view = AnalyzerView::new(Arc::clone(&params), AnalyzerConfig::default(), bounds);
        view.attach(eq.prepare(48_000.0, 512).expect("prepare")).expect("attach");
        view.tick();
        let traced = view.response().recomputes();

        let (mut left_phase, mut right_phase) = (0.0_f32, 0.0_f32);
        for _ in 0..8 {
            let mut left: Vec<f32> = (0..512)
                .map(|_| {
                    left_phase += 2.0 * std::f32::consts::PI * 4_000.0 / 96_000.0;
                    left_phase.sin() * 0.5
                })
                .collect();
            let mut right: Vec<f32> = (0..512)
                .map(|_| {
                    right_phase += 2.0 * std::f32::consts::PI * 4_000.0 / 96_000.0;
                    right_phase.sin() * 0.5
                })
                .collect();
            eq.on_audio_block(&mut left, 96_000.0, Channel::Left);
            eq.on_audio_block(&mut right, 96_000.0, Channel::Right);
        }

        let outcome = view.tick();
        assert!(outcome.left_path && outcome.response_curve);
        assert_eq!(view.sample_rate(), 96_000.0);
        assert_eq!(view.response().sample_rate(), 96_000.0);
        assert_eq!(view.response().recomputes(), traced + 1);

        let loudest_x = view
            .live_channel_path(Channel::Left)
            .expect("left path")
            .iter()
            .skip(1)
            .fold((0.0_f32, f32::MAX), |best, point| {
                if point.y < best.1 {
                    (point.x, point.y)
                } else {
                    best
                }
            })
            .0;
        let expected = crate::analysis::path::frequency_to_x(4_000.0, &bounds);
        assert!((loudest_x - expected).abs() <= 3.0, "tone drawn at {loudest_x}, expected {expected}");
        assert!(!view.tick().response_curve);
    }

    #[test]
    fn disabled_analysis_skips_fft_work() {
        let params = Arc::new(SharedParameters::new());
        let mut eq = EqProcessor::new(Arc::clone(&params));
        let mut view = AnalyzerView::new(
            Arc::clone(&params),
            AnalyzerConfig::default(),
            Rect::new(0.0, 0.0, 300.0, 100.0),
        );
        view.attach(eq.prepare(48_000.0, 512).expect("prepare")).expect("attach");
        view.set_analysis_enabled(false);
        assert!(!view.analysis_enabled());

        let mut left = vec![0.3_f32; 512];
        let mut right = vec![0.3_f32; 512];
        eq.process_block(&mut left, &mut right);
        let outcome = view.tick();
        assert!(!outcome.left_path && !outcome.right_path);

        view.set_analysis_enabled(true);
        assert!(!view.tick().left_path);
    }

    #[test]
    fn parameter_edits_retrace_once_per_tick() {
        let params = Arc::new(SharedParameters::new());
        let mut view = AnalyzerView::new(Arc::clone(&params), AnalyzerConfig::default(), Rect::new(0.0, 0.0, 300.0, 100.0));
        view.tick();
        let traced = view.response().recomputes();

        params.set_parameter(ParameterId::PeakGain, 12.0);
        params.set_parameter(ParameterId::PeakFreq, 3_000.0);
        assert!(view.tick().response_curve);
        assert!(!view.tick().response_curve);
        assert_eq!(view.response().recomputes(), traced + 1);

        let max_db = view
            .response_curve()
            .iter()
            .fold(f64::MIN, |best, point| best.max(point.1));
        assert!((max_db - 12.0).abs() < 0.5);
    }

    #[test]
    fn resizing_retraces_at_the_new_width() {
        let params = Arc::new(SharedParameters::new());
        let mut view = AnalyzerView::new(params, AnalyzerConfig::default(), Rect::new(0.0, 0.0, 300.0, 100.0));
        view.tick();
        view.set_bounds(Rect::new(0.0, 0.0, 640.0, 100.0));
        assert_eq!(view.response_curve().len(), 640);
        assert_eq!(view.response_path().len(), 640);
    }
}
