//! UI-side analysis pipeline for one channel.

use dasp_ring_buffer::Fixed;

use super::config::AnalyzerConfig;
use super::path::{DisplayPath, PathGenerator, Rect};
use super::spectrum::SpectrumAnalyzer;
use crate::audio::buffer::BlockConsumer;
use crate::error::EqError;

/// Drains one channel's sample FIFO and keeps its newest spectrum path.
///
/// Every received block slides into an `fft_size` window (oldest samples fall
/// out), the window is analysed, each resulting frame becomes a path, and only
/// the last path survives the tick.
pub struct ChannelAnalyzer {
    samples: BlockConsumer<f32>,
    block: Vec<f32>,
    history: Fixed<Vec<f32>>,
    window: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    frame: Vec<f32>,
    paths: PathGenerator,
    floor_db: f32,
    latest: DisplayPath,
}

impl ChannelAnalyzer {
    pub fn new(samples: BlockConsumer<f32>, config: &AnalyzerConfig) -> Result<Self, EqError> {
        let config = config.sanitized();
        let fft_size = config.fft_order.fft_size();
        Ok(Self {
            block: vec![0.0; samples.block_size()],
            samples,
            history: Fixed::from(vec![0.0; fft_size]),
            window: vec![0.0; fft_size],
            spectrum: SpectrumAnalyzer::new(config.fft_order, config.fifo_capacity)?,
            frame: vec![0.0; config.fft_order.bins()],
            paths: PathGenerator::new(config.path_stride, config.fifo_capacity)?,
            floor_db: config.floor_db,
            latest: DisplayPath::default(),
        })
    }

    /// Run one UI tick. Returns `true` when a new path replaced the old one.
    pub fn process(&mut self, bounds: &Rect, sample_rate: f64) -> bool {
        while self.samples.available_for_reading() > 0 {
            if !self.samples.pull(&mut self.block) {
                break;
            }
            for sample in &self.block {
                self.history.push(*sample);
            }
            for (slot, sample) in self.window.iter_mut().zip(self.history.iter()) {
                *slot = *sample;
            }
            self.spectrum.analyze(&self.window, self.floor_db);
        }

        let fft_size = self.spectrum.fft_size();
        let bin_width_hz = sample_rate / fft_size as f64;
        while self.spectrum.pending_frames() > 0 {
            if !self.spectrum.pull_frame_into(&mut self.frame) {
                break;
            }
            self.paths
                .generate(&self.frame, bounds, fft_size, bin_width_hz, self.floor_db);
        }

        match self.paths.latest_path() {
            Some(path) => {
                self.latest = path;
                true
            }
            None => false,
        }
    }

    /// Drop queued samples without analysing them.
    pub fn discard_pending(&mut self) {
        self.samples.clear();
    }

    /// Most recent spectrum path; empty until the first block was analysed.
    pub fn path(&self) -> &DisplayPath {
        &self.latest
    }

    pub fn fft_size(&self) -> usize {
        self.spectrum.fft_size()
    }

    /// Blocks the audio side could not queue because this analyzer lagged.
    pub fn dropped_blocks(&self) -> u64 {
        self.samples.dropped_blocks()
    }
}
