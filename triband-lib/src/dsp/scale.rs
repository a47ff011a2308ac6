//! Gain and axis conversions shared by the tracer and path generator.

/// Convert a linear gain to decibels, clamping at `floor_db`.
///
/// Zero, negative and non-finite gains all map to `floor_db`, so the result is
/// always finite for a finite floor.
pub fn gain_to_decibels(gain: f64, floor_db: f64) -> f64 {
    if !gain.is_finite() || gain <= 0.0 {
        return floor_db;
    }
    (20.0 * gain.log10()).max(floor_db)
}

/// `f32` flavour of [`gain_to_decibels`] used on spectrum bins.
pub fn gain_to_decibels_f32(gain: f32, floor_db: f32) -> f32 {
    if !gain.is_finite() || gain <= 0.0 {
        return floor_db;
    }
    (20.0 * gain.log10()).max(floor_db)
}

/// Convert decibels to a linear gain factor.
pub fn decibels_to_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Map a normalised position in `0..=1` onto a logarithmic `min..=max` range.
pub fn map_to_log10(proportion: f64, min: f64, max: f64) -> f64 {
    min * (max / min).powf(proportion)
}

/// Inverse of [`map_to_log10`]: position of `value` on a log `min..=max` axis.
pub fn map_from_log10(value: f64, min: f64, max: f64) -> f64 {
    (value / min).log10() / (max / min).log10()
}

/// Linearly remap `value` from `source_min..source_max` onto `target_min..target_max`.
pub fn remap(value: f64, source_min: f64, source_max: f64, target_min: f64, target_max: f64) -> f64 {
    target_min + (target_max - target_min) * (value - source_min) / (source_max - source_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decibels_are_finite_for_zero_and_tiny_inputs() {
        for gain in [0.0, f64::MIN_POSITIVE, 1e-300, -1.0, f64::NAN, f64::INFINITY] {
            let db = gain_to_decibels(gain, -100.0);
            assert!(db.is_finite(), "gain {gain} produced {db}");
            assert!(db >= -100.0);
        }
        assert_eq!(gain_to_decibels_f32(0.0, -48.0), -48.0);
        assert_eq!(gain_to_decibels_f32(f32::NAN, -48.0), -48.0);
    }

    #[test]
    fn unity_gain_is_zero_db() {
        assert!(gain_to_decibels(1.0, -100.0).abs() < 1e-12);
        assert!((decibels_to_gain(6.0) - 1.995_262_314_968_88).abs() < 1e-9);
    }

    #[test]
    fn log_axis_round_trips_at_edges_and_decades() {
        assert!((map_to_log10(0.0, 20.0, 20_000.0) - 20.0).abs() < 1e-9);
        assert!((map_to_log10(1.0, 20.0, 20_000.0) - 20_000.0).abs() < 1e-6);
        assert!((map_from_log10(200.0, 20.0, 20_000.0) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn remap_flips_for_screen_coordinates() {
        assert_eq!(remap(0.0, -24.0, 24.0, 100.0, 0.0), 50.0);
        assert_eq!(remap(24.0, -24.0, 24.0, 100.0, 0.0), 0.0);
    }
}
