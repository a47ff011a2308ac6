//! Re-blocking of host buffers for the analyzer.

use super::buffer::BlockProducer;

/// Collects one channel's post-EQ samples into fixed-size blocks.
///
/// Host buffers may have any length; samples are staged until a whole block is
/// available and only then pushed. A full FIFO drops the block and staging
/// starts over, so the tap never waits on the reader.
pub struct ChannelSampleTap {
    producer: BlockProducer<f32>,
    staging: Vec<f32>,
    filled: usize,
}

impl ChannelSampleTap {
    pub fn new(producer: BlockProducer<f32>) -> Self {
        let staging = vec![0.0; producer.block_size()];
        Self {
            producer,
            staging,
            filled: 0,
        }
    }

    /// Stage `samples`, pushing every block that completes.
    ///
    /// Returns how many blocks were accepted by the FIFO.
    pub fn push_samples(&mut self, samples: &[f32]) -> usize {
        let block_size = self.staging.len();
        let mut pushed = 0;
        let mut rest = samples;

        while !rest.is_empty() {
            let take = (block_size - self.filled).min(rest.len());
            self.staging[self.filled..self.filled + take].copy_from_slice(&rest[..take]);
            self.filled += take;
            rest = &rest[take..];

            if self.filled == block_size {
                if self.producer.push(&self.staging) {
                    pushed += 1;
                }
                self.filled = 0;
            }
        }

        pushed
    }

    /// Samples waiting for the current block to complete.
    pub fn staged(&self) -> usize {
        self.filled
    }

    pub fn block_size(&self) -> usize {
        self.staging.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::buffer::block_fifo;

    #[test]
    fn odd_host_buffers_are_reblocked() {
        let (producer, mut consumer) = block_fifo::<f32>(8, 4).expect("fifo");
        let mut tap = ChannelSampleTap::new(producer);

        let samples: Vec<f32> = (0..10).map(|n| n as f32).collect();
        assert_eq!(tap.push_samples(&samples[..3]), 0);
        assert_eq!(tap.push_samples(&samples[3..10]), 2);
        assert_eq!(tap.staged(), 2);

        let mut out = [0.0_f32; 4];
        assert!(consumer.pull(&mut out));
        assert_eq!(out, [0.0, 1.0, 2.0, 3.0]);
        assert!(consumer.pull(&mut out));
        assert_eq!(out, [4.0, 5.0, 6.0, 7.0]);
        assert!(!consumer.pull(&mut out));
    }

    #[test]
    fn overload_drops_blocks_without_stalling() {
        let (producer, consumer) = block_fifo::<f32>(2, 4).expect("fifo");
        let mut tap = ChannelSampleTap::new(producer);
        assert_eq!(tap.push_samples(&[0.5; 16]), 2);
        assert_eq!(consumer.available_for_reading(), 2);
        assert_eq!(consumer.dropped_blocks(), 2);
        assert_eq!(tap.staged(), 0);
    }
}
