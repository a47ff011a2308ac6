//! Real-time side of the EQ: two filter chains and the analyzer taps.

use std::sync::Arc;

use log::info;

use crate::audio::buffer::{block_fifo, BlockConsumer};
use crate::audio::tap::ChannelSampleTap;
use crate::constants::{DEFAULT_SAMPLE_RATE, FIFO_CAPACITY, NUM_CHANNELS};
use crate::dsp::chain::FilterChain;
use crate::error::EqError;
use crate::params::{ChainSettings, SharedParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const ALL: [Channel; NUM_CHANNELS] = [Channel::Left, Channel::Right];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Reading ends of the per-channel sample FIFOs, handed to the UI side.
pub struct AnalyzerTaps {
    pub left: BlockConsumer<f32>,
    pub right: BlockConsumer<f32>,
    pub sample_rate: f64,
}

/// Stereo EQ processor driven by the host audio callback.
///
/// Owns one [`FilterChain`] per channel. Coefficients are redesigned from the
/// shared parameter store at block boundaries only, after the audio-side change
/// flag was observed. Nothing reachable from the block entry points blocks,
/// locks or allocates.
pub struct EqProcessor {
    params: Arc<SharedParameters>,
    chains: [FilterChain; NUM_CHANNELS],
    taps: [Option<ChannelSampleTap>; NUM_CHANNELS],
    stale: [bool; NUM_CHANNELS],
    sample_rate: f64,
    block_size: usize,
    fifo_capacity: usize,
}

impl EqProcessor {
    pub fn new(params: Arc<SharedParameters>) -> Self {
        Self {
            params,
            chains: [FilterChain::new(), FilterChain::new()],
            taps: [None, None],
            stale: [true; NUM_CHANNELS],
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: 0,
            fifo_capacity: FIFO_CAPACITY,
        }
    }

    /// Blocks each analyzer FIFO can hold; applied by the next `prepare`.
    pub fn with_fifo_capacity(mut self, capacity: usize) -> Self {
        self.fifo_capacity = capacity;
        self
    }

    /// Set up for playback.
    ///
    /// Clears filter history, builds fresh analyzer FIFOs sized for
    /// `block_size`-sample blocks and designs both chains for `sample_rate`.
    /// Any previously returned [`AnalyzerTaps`] stop receiving data.
    pub fn prepare(&mut self, sample_rate: f64, block_size: usize) -> Result<AnalyzerTaps, EqError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EqError::InvalidSampleRate(sample_rate));
        }
        if block_size == 0 {
            return Err(EqError::InvalidBlockSize(block_size));
        }

        let (left_in, left_out) = block_fifo(self.fifo_capacity, block_size)?;
        let (right_in, right_out) = block_fifo(self.fifo_capacity, block_size)?;
        self.taps = [
            Some(ChannelSampleTap::new(left_in)),
            Some(ChannelSampleTap::new(right_in)),
        ];

        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.params.publish_sample_rate(sample_rate);
        let settings = self.params.snapshot().sanitized(sample_rate);
        for chain in &mut self.chains {
            chain.reset();
            chain.update_from_settings(&settings, sample_rate);
        }
        self.params.take_audio_change();
        self.stale = [false; NUM_CHANNELS];

        info!(
            "eq prepared: {} Hz, {} samples per block, {} blocks per fifo",
            sample_rate, block_size, self.fifo_capacity
        );

        Ok(AnalyzerTaps {
            left: left_out,
            right: right_out,
            sample_rate,
        })
    }

    pub fn parameters(&self) -> &Arc<SharedParameters> {
        &self.params
    }

    /// Push a whole settings snapshot; picked up at the next block boundary.
    pub fn set_parameters_snapshot(&self, settings: &ChainSettings) {
        self.params.set_snapshot(settings);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn chain(&self, channel: Channel) -> &FilterChain {
        &self.chains[channel.index()]
    }

    /// Filter one stereo block in place and feed both analyzer taps.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.process_channel(Channel::Left, left);
        self.process_channel(Channel::Right, right);
    }

    /// Per-channel host entry point.
    ///
    /// A new `sample_rate` triggers a redesign of both chains and is published
    /// to the UI side; non-positive or non-finite rates are ignored.
    pub fn on_audio_block(&mut self, samples: &mut [f32], sample_rate: f64, channel: Channel) {
        if sample_rate.is_finite() && sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.stale = [true; NUM_CHANNELS];
            self.params.publish_sample_rate(sample_rate);
        }
        self.process_channel(channel, samples);
    }

    fn process_channel(&mut self, channel: Channel, samples: &mut [f32]) {
        if self.params.take_audio_change() {
            self.stale = [true; NUM_CHANNELS];
        }

        let index = channel.index();
        if self.stale[index] {
            let settings = self.params.snapshot().sanitized(self.sample_rate);
            self.chains[index].update_from_settings(&settings, self.sample_rate);
            self.stale[index] = false;
        }

        self.chains[index].process(samples);
        if let Some(tap) = self.taps[index].as_mut() {
            tap.push_samples(samples);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::chain::ChainPosition;
    use crate::params::ParameterId;

    fn processor() -> EqProcessor {
        EqProcessor::new(Arc::new(SharedParameters::new()))
    }

    #[test]
    fn prepare_rejects_bad_setup() {
        let mut eq = processor();
        assert!(matches!(
            eq.prepare(0.0, 512),
            Err(EqError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            eq.prepare(f64::NAN, 512),
            Err(EqError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            eq.prepare(48_000.0, 0),
            Err(EqError::InvalidBlockSize(0))
        ));
    }

    #[test]
    fn processed_blocks_reach_both_taps() {
        let mut eq = processor();
        let mut taps = eq.prepare(48_000.0, 64).expect("prepare");
        let mut left = vec![0.25_f32; 64];
        let mut right = vec![-0.25_f32; 64];
        eq.process_block(&mut left, &mut right);

        let mut out = vec![0.0_f32; 64];
        assert!(taps.left.pull(&mut out));
        assert_eq!(out, left);
        assert!(taps.right.pull(&mut out));
        assert_eq!(out, right);
    }

    #[test]
    fn parameter_changes_apply_at_the_next_block() {
        let mut eq = processor();
        let _taps = eq.prepare(48_000.0, 32).expect("prepare");
        assert!(!eq.chain(Channel::Left).is_bypassed(ChainPosition::Peak));

        eq.parameters().set_parameter(ParameterId::PeakBypassed, 1.0);
        assert!(!eq.chain(Channel::Right).is_bypassed(ChainPosition::Peak));

        let mut left = vec![0.0_f32; 32];
        let mut right = vec![0.0_f32; 32];
        eq.process_block(&mut left, &mut right);
        assert!(eq.chain(Channel::Left).is_bypassed(ChainPosition::Peak));
        assert!(eq.chain(Channel::Right).is_bypassed(ChainPosition::Peak));
    }

    #[test]
    fn per_channel_entry_refreshes_each_chain_once() {
        let mut eq = processor();
        let _taps = eq.prepare(44_100.0, 16).expect("prepare");
        eq.set_parameters_snapshot(&ChainSettings {
            high_cut_bypassed: true,
            ..ChainSettings::default()
        });

        let mut block = vec![0.0_f32; 16];
        eq.on_audio_block(&mut block, 44_100.0, Channel::Left);
        assert!(eq.chain(Channel::Left).is_bypassed(ChainPosition::HighCut));
        assert!(!eq.chain(Channel::Right).is_bypassed(ChainPosition::HighCut));
        eq.on_audio_block(&mut block, 44_100.0, Channel::Right);
        assert!(eq.chain(Channel::Right).is_bypassed(ChainPosition::HighCut));
    }

    #[test]
    fn sample_rate_change_redesigns_chains() {
        let mut eq = processor();
        let _taps = eq.prepare(48_000.0, 16).expect("prepare");
        let before = *eq
            .chain(Channel::Left)
            .coefficients(ChainPosition::Peak, 0)
            .expect("peak");
        eq.parameters().set_parameter(ParameterId::PeakGain, 6.0);
        let mut block = vec![0.0_f32; 16];
        eq.on_audio_block(&mut block, 96_000.0, Channel::Left);
        assert_eq!(eq.sample_rate(), 96_000.0);
        assert_eq!(eq.parameters().sample_rate(), 96_000.0);
        let after = *eq
            .chain(Channel::Left)
            .coefficients(ChainPosition::Peak, 0)
            .expect("peak");
        assert_ne!(before, after);
    }
}
