//! 2nd-order IIR section: coefficient set, analytic response and DF-I state.

use std::f64::consts::PI;

/// Normalised biquad taps (`a0` divided out).
///
/// Plain `Copy` data: a section swaps the whole set in one assignment, so a
/// block never sees a mix of old and new taps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Unity-gain pass-through.
    pub const IDENTITY: BiquadCoefficients = BiquadCoefficients {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    pub(crate) fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (a1 / a0) as f32,
            a2: (a2 / a0) as f32,
        }
    }

    /// |H(e^{jω})| at `freq` Hz.
    ///
    /// Evaluated in `f64`; meant for display, not for the audio path.
    pub fn magnitude_at(&self, freq: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq / sample_rate;
        let (sin_w, cos_w) = w.sin_cos();
        let (sin_2w, cos_2w) = (2.0 * w).sin_cos();

        let (b0, b1, b2) = (self.b0 as f64, self.b1 as f64, self.b2 as f64);
        let (a1, a2) = (self.a1 as f64, self.a2 as f64);

        let num_re = b0 + b1 * cos_w + b2 * cos_2w;
        let num_im = -(b1 * sin_w + b2 * sin_2w);
        let den_re = 1.0 + a1 * cos_w + a2 * cos_2w;
        let den_im = -(a1 * sin_w + a2 * sin_2w);

        let numerator = (num_re * num_re + num_im * num_im).sqrt();
        let denominator = (den_re * den_re + den_im * den_im).sqrt();
        if denominator == 0.0 {
            return f64::INFINITY;
        }
        numerator / denominator
    }

    /// Both poles strictly inside the unit circle (stability triangle test).
    pub fn is_stable(&self) -> bool {
        let (a1, a2) = (self.a1 as f64, self.a2 as f64);
        a2.abs() < 1.0 && a1.abs() < 1.0 + a2
    }
}

/// Direct-form-I biquad for a single channel.
#[derive(Clone, Debug)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    x_n1: f32,
    x_n2: f32,
    y_n1: f32,
    y_n2: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(BiquadCoefficients::IDENTITY)
    }
}

impl Biquad {
    pub fn new(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            x_n1: 0.0,
            x_n2: 0.0,
            y_n1: 0.0,
            y_n2: 0.0,
        }
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    /// Replace the taps, keeping the filter history.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let y = self.coeffs.b0 * sample + self.coeffs.b1 * self.x_n1 + self.coeffs.b2 * self.x_n2
            - self.coeffs.a1 * self.y_n1
            - self.coeffs.a2 * self.y_n2;

        self.x_n2 = self.x_n1;
        self.x_n1 = sample;
        self.y_n2 = self.y_n1;
        self.y_n1 = y;

        y
    }

    /// Filter a block in place.
    pub fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.x_n1 = 0.0;
        self.x_n2 = 0.0;
        self.y_n1 = 0.0;
        self.y_n2 = 0.0;
    }
}
