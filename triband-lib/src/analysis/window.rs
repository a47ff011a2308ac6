//! Analysis windows.

use std::f64::consts::PI;

/// 4-term Blackman-Harris window of `size` points (symmetric).
///
/// The table is normalised to unit mean, so a windowed sine keeps the
/// amplitude it would have without the window.
pub fn blackman_harris(size: usize) -> Vec<f32> {
    if size <= 1 {
        return vec![1.0; size];
    }
    let span = (size - 1) as f64;
    let raw: Vec<f64> = (0..size)
        .map(|n| {
            let phase = 2.0 * PI * n as f64 / span;
            0.358_75 - 0.488_29 * phase.cos() + 0.141_28 * (2.0 * phase).cos()
                - 0.011_68 * (3.0 * phase).cos()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    let scale = if sum > 0.0 { size as f64 / sum } else { 1.0 };
    raw.into_iter().map(|weight| (weight * scale) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_symmetric_with_tiny_edges() {
        let window = blackman_harris(2048);
        assert!(window[0] < 1e-3);
        assert!((window[0] - window[2047]).abs() < 1e-6);
        assert!((window[100] - window[1947]).abs() < 1e-5);
    }

    #[test]
    fn window_has_unit_mean() {
        let window = blackman_harris(4096);
        let mean = window.iter().map(|weight| *weight as f64).sum::<f64>() / 4096.0;
        assert!((mean - 1.0).abs() < 1e-4, "mean {mean}");
        let peak = window.iter().cloned().fold(0.0_f32, f32::max);
        assert!((peak - 1.0 / 0.358_75).abs() < 1e-2, "peak {peak}");
    }
}
