//! Spectrum frames to log-frequency display polylines.

use serde::{Deserialize, Serialize};

use crate::audio::buffer::{item_fifo, ItemConsumer, ItemProducer};
use crate::constants::{MAX_FREQ_HZ, MIN_FREQ_HZ};
use crate::dsp::scale::{map_from_log10, remap};
use crate::error::EqError;

/// Display area in pixels; `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Ordered polyline. Always rebuilt as a whole, never edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayPath {
    points: Vec<Point>,
}

impl DisplayPath {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append a point unless either coordinate is non-finite.
    pub fn push(&mut self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.points.push(Point { x, y });
        true
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}

/// x position of `freq` on a log axis spanning 20 Hz..20 kHz across `bounds`.
pub fn frequency_to_x(freq: f64, bounds: &Rect) -> f32 {
    let proportion = map_from_log10(freq, MIN_FREQ_HZ, MAX_FREQ_HZ);
    bounds.left() + (proportion * bounds.width as f64).floor() as f32
}

/// Build a spectrum polyline from one dB frame.
///
/// Bin 0 anchors the path at the left edge; after that every `stride`-th bin
/// starting at bin 1 is plotted at its log-frequency x. Values map linearly
/// from `floor_db..0` onto `bottom..top`. Points that map to a non-finite
/// coordinate are skipped.
pub fn build_path(
    frame: &[f32],
    bounds: &Rect,
    fft_size: usize,
    bin_width_hz: f64,
    floor_db: f32,
    stride: usize,
) -> DisplayPath {
    let bins = (fft_size / 2).min(frame.len());
    let stride = stride.max(1);
    let mut path = DisplayPath::with_capacity(bins / stride + 1);

    let map_y = |db: f32| {
        remap(
            db as f64,
            floor_db as f64,
            0.0,
            bounds.bottom() as f64,
            bounds.top() as f64,
        ) as f32
    };

    if let Some(first) = frame.first() {
        let y = map_y(*first);
        path.push(bounds.left(), if y.is_finite() { y } else { bounds.bottom() });
    }

    for bin in (1..bins).step_by(stride) {
        let y = map_y(frame[bin]);
        let x = frequency_to_x(bin as f64 * bin_width_hz, bounds);
        path.push(x, y);
    }

    path
}

/// Generates spectrum paths and hands back only the newest one.
pub struct PathGenerator {
    stride: usize,
    producer: ItemProducer<DisplayPath>,
    consumer: ItemConsumer<DisplayPath>,
}

impl PathGenerator {
    pub fn new(stride: usize, capacity: usize) -> Result<Self, EqError> {
        let (producer, consumer) = item_fifo(capacity)?;
        Ok(Self {
            stride: stride.max(1),
            producer,
            consumer,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Build a path for `frame` and queue it. Returns `false` if it was dropped.
    pub fn generate(
        &mut self,
        frame: &[f32],
        bounds: &Rect,
        fft_size: usize,
        bin_width_hz: f64,
        floor_db: f32,
    ) -> bool {
        let path = build_path(frame, bounds, fft_size, bin_width_hz, floor_db, self.stride);
        self.producer.push(path)
    }

    pub fn pending_paths(&self) -> usize {
        self.consumer.len()
    }

    /// Drain every queued path, returning the most recent.
    pub fn latest_path(&mut self) -> Option<DisplayPath> {
        self.consumer.pop_latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 600.0,
        height: 200.0,
    };

    #[test]
    fn levels_map_between_floor_and_zero() {
        let mut frame = vec![-48.0_f32; 1_024];
        frame[1] = 0.0;
        frame[3] = -24.0;
        let path = build_path(&frame, &BOUNDS, 2_048, 48_000.0 / 2_048.0, -48.0, 2);

        let points = path.points();
        assert_eq!(points[0], Point { x: 0.0, y: 200.0 });
        assert_eq!(points[1].y, 0.0);
        assert_eq!(points[2].y, 100.0);
        assert_eq!(path.len(), 1 + 512);
    }

    #[test]
    fn x_follows_a_log_frequency_axis() {
        assert_eq!(frequency_to_x(20.0, &BOUNDS), 0.0);
        assert_eq!(frequency_to_x(20_000.0, &BOUNDS), 600.0);
        assert_eq!(frequency_to_x(632.5, &BOUNDS), 300.0);

        let frame = vec![-10.0_f32; 1_024];
        let path = build_path(&frame, &BOUNDS, 2_048, 48_000.0 / 2_048.0, -48.0, 2);
        let xs: Vec<f32> = path.iter().skip(1).map(|point| point.x).collect();
        assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let mut frame = vec![-12.0_f32; 1_024];
        frame[1] = f32::NAN;
        frame[5] = f32::INFINITY;
        let path = build_path(&frame, &BOUNDS, 2_048, 23.4375, -48.0, 2);
        assert_eq!(path.len(), 1 + 512 - 2);
        assert!(path.iter().all(|point| point.x.is_finite() && point.y.is_finite()));
    }

    #[test]
    fn generator_keeps_only_the_newest_path() {
        let mut generator = PathGenerator::new(4, 8).expect("generator");
        for level in [-40.0_f32, -20.0, -5.0] {
            let frame = vec![level; 1_024];
            assert!(generator.generate(&frame, &BOUNDS, 2_048, 23.4375, -48.0));
        }
        assert_eq!(generator.pending_paths(), 3);

        let latest = generator.latest_path().expect("path");
        let expected_y = remap(-5.0, -48.0, 0.0, 200.0, 0.0) as f32;
        assert_eq!(latest.points()[1].y, expected_y);
        assert_eq!(generator.pending_paths(), 0);
        assert!(generator.latest_path().is_none());
    }
}
