//! Windowed FFT magnitude analysis.
//!
//! The transform backend follows the crate features: `real-fft` (default) uses
//! `realfft`, otherwise `complex-fft` runs a full complex transform through
//! `rustfft` on a zero-imaginary buffer. Both produce the same magnitudes.

#[cfg(not(any(feature = "real-fft", feature = "complex-fft")))]
compile_error!("enable either the `real-fft` or the `complex-fft` feature");

#[cfg(not(feature = "real-fft"))]
mod complex_fft {
    use std::sync::Arc;

    use rustfft::{num_complex::Complex, Fft, FftPlanner};

    pub struct ForwardFft {
        plan: Arc<dyn Fft<f32>>,
        input: Vec<f32>,
        buffer: Vec<Complex<f32>>,
        scratch: Vec<Complex<f32>>,
    }

    impl ForwardFft {
        pub fn new(fft_size: usize) -> Self {
            let mut planner = FftPlanner::<f32>::new();
            let plan = planner.plan_fft_forward(fft_size);
            let scratch = vec![Complex::new(0.0, 0.0); plan.get_inplace_scratch_len()];
            Self {
                plan,
                input: vec![0.0; fft_size],
                buffer: vec![Complex::new(0.0, 0.0); fft_size],
                scratch,
            }
        }

        pub fn input_mut(&mut self) -> &mut [f32] {
            &mut self.input
        }

        pub fn magnitudes(&mut self, magnitudes: &mut [f32]) -> bool {
            for (slot, sample) in self.buffer.iter_mut().zip(self.input.iter()) {
                *slot = Complex::new(*sample, 0.0);
            }
            self.plan
                .process_with_scratch(&mut self.buffer, &mut self.scratch);
            for (magnitude, bin) in magnitudes.iter_mut().zip(self.buffer.iter()) {
                *magnitude = bin.norm();
            }
            true
        }
    }
}

#[cfg(feature = "real-fft")]
mod real_fft {
    use std::sync::Arc;

    use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};

    pub struct ForwardFft {
        input: Vec<f32>,
        spectrum: Vec<Complex32>,
        scratch: Vec<Complex32>,
        plan: Arc<dyn RealToComplex<f32>>,
    }

    impl ForwardFft {
        pub fn new(fft_size: usize) -> Self {
            let mut planner = RealFftPlanner::<f32>::new();
            let plan = planner.plan_fft_forward(fft_size);
            Self {
                input: plan.make_input_vec(),
                spectrum: plan.make_output_vec(),
                scratch: plan.make_scratch_vec(),
                plan,
            }
        }

        pub fn input_mut(&mut self) -> &mut [f32] {
            &mut self.input
        }

        /// Transform the input buffer and write `|X[k]|` for the leading bins.
        ///
        /// The input buffer is used as scratch and must be refilled before the
        /// next call.
        pub fn magnitudes(&mut self, magnitudes: &mut [f32]) -> bool {
            if self
                .plan
                .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)
                .is_err()
            {
                return false;
            }
            for (magnitude, bin) in magnitudes.iter_mut().zip(self.spectrum.iter()) {
                *magnitude = bin.norm();
            }
            true
        }
    }
}

#[cfg(not(feature = "real-fft"))]
use complex_fft::ForwardFft;
#[cfg(feature = "real-fft")]
use real_fft::ForwardFft;

use log::debug;

use super::config::FftOrder;
use super::window::blackman_harris;
use crate::audio::buffer::{block_fifo, BlockConsumer, BlockProducer};
use crate::dsp::scale::gain_to_decibels_f32;
use crate::error::EqError;

/// Turns time-domain windows into dB spectral frames and queues them.
///
/// A frame holds `fft_size / 2` values, one per bin from DC upward, each in
/// `floor_db..` and always finite.
pub struct SpectrumAnalyzer {
    order: FftOrder,
    window: Vec<f32>,
    fft: ForwardFft,
    magnitudes: Vec<f32>,
    frames_in: BlockProducer<f32>,
    frames_out: BlockConsumer<f32>,
}

impl SpectrumAnalyzer {
    /// Plan the transform and allocate every buffer up front.
    pub fn new(order: FftOrder, frame_capacity: usize) -> Result<Self, EqError> {
        let (frames_in, frames_out) = block_fifo(frame_capacity, order.bins())?;
        debug!(
            "spectrum analyzer prepared: fft size {}, {} queued frames",
            order.fft_size(),
            frame_capacity
        );
        Ok(Self {
            order,
            window: blackman_harris(order.fft_size()),
            fft: ForwardFft::new(order.fft_size()),
            magnitudes: vec![0.0; order.bins()],
            frames_in,
            frames_out,
        })
    }

    pub fn order(&self) -> FftOrder {
        self.order
    }

    pub fn fft_size(&self) -> usize {
        self.order.fft_size()
    }

    pub fn bins(&self) -> usize {
        self.order.bins()
    }

    /// Analyse the newest `fft_size` samples of `samples` and queue a frame.
    ///
    /// Shorter input is zero-padded at the front. Magnitudes are normalised by
    /// the bin count before conversion to dB. Returns `false` when the frame
    /// could not be queued.
    pub fn analyze(&mut self, samples: &[f32], floor_db: f32) -> bool {
        let fft_size = self.fft_size();
        let recent = &samples[samples.len().saturating_sub(fft_size)..];
        let pad = fft_size - recent.len();

        let input = self.fft.input_mut();
        input[..pad].fill(0.0);
        for ((slot, sample), weight) in input[pad..]
            .iter_mut()
            .zip(recent.iter())
            .zip(self.window[pad..].iter())
        {
            *slot = sample * weight;
        }

        if !self.fft.magnitudes(&mut self.magnitudes) {
            self.magnitudes.fill(floor_db);
            return self.frames_in.push(&self.magnitudes);
        }

        let norm = self.bins() as f32;
        for magnitude in &mut self.magnitudes {
            *magnitude = gain_to_decibels_f32(*magnitude / norm, floor_db);
        }
        self.frames_in.push(&self.magnitudes)
    }

    /// Frames waiting to be pulled.
    pub fn pending_frames(&self) -> usize {
        self.frames_out.available_for_reading()
    }

    /// Take the oldest queued frame.
    pub fn pull_frame(&mut self) -> Option<Vec<f32>> {
        let mut frame = vec![0.0; self.bins()];
        self.pull_frame_into(&mut frame).then_some(frame)
    }

    /// Allocation-free variant of [`SpectrumAnalyzer::pull_frame`].
    pub fn pull_frame_into(&mut self, frame: &mut [f32]) -> bool {
        self.frames_out.pull(frame)
    }

    /// Frames lost because nobody pulled them in time.
    pub fn dropped_frames(&self) -> u64 {
        self.frames_out.dropped_blocks()
    }
}
