//! Audio-to-analysis transport: SPSC FIFOs and the per-channel sample tap.

pub mod buffer;
pub mod tap;

pub use buffer::{block_fifo, item_fifo, BlockConsumer, BlockProducer, ItemConsumer, ItemProducer};
pub use tap::ChannelSampleTap;
