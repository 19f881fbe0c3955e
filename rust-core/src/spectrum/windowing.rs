//! Hann windowing for spectral analysis
//!
//! Tapers each block to zero at both ends before the FFT to reduce spectral leakage

use num_complex::Complex;
use std::f64::consts::PI;

/// Generate Hann window coefficients
///
/// w[n] = 0.5 * (1 - cos(2πn/(M-1)))
///
/// # Arguments
/// * `length` - Number of samples (M), must be greater than 1
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn hann_window(length: usize) -> Vec<f64> {
    debug_assert!(length > 1, "Hann window needs at least 2 samples");
    let m = length as f64;

    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            0.5 * (1.0 - angle.cos())
        })
        .collect()
}

/// Precomputed Hann window for a fixed block length
#[derive(Debug, Clone)]
pub struct HannWindow {
    coefficients: Vec<f64>,
}

impl HannWindow {
    /// Create window for blocks of `length` samples (must be greater than 1)
    pub fn new(length: usize) -> Self {
        Self {
            coefficients: hann_window(length),
        }
    }

    /// Apply window to a block of PCM samples
    ///
    /// # Arguments
    /// * `block` - Exactly `len()` samples
    ///
    /// # Returns
    /// Windowed block as complex values with zero imaginary part
    pub fn apply(&self, block: &[i16]) -> Vec<Complex<f64>> {
        let mut output = vec![Complex::new(0.0, 0.0); self.coefficients.len()];
        self.apply_into(block, &mut output);
        output
    }

    /// Apply window into an existing buffer, overwriting its contents
    ///
    /// # Panics
    /// Panics if `block` or `output` is not exactly `len()` long.
    pub fn apply_into(&self, block: &[i16], output: &mut [Complex<f64>]) {
        assert_eq!(block.len(), self.coefficients.len(), "block length does not match window");
        assert_eq!(output.len(), self.coefficients.len(), "output length does not match window");

        for ((out, &sample), &w) in output
            .iter_mut()
            .zip(block.iter())
            .zip(self.coefficients.iter())
        {
            *out = Complex::new(sample as f64 * w, 0.0);
        }
    }

    /// Window coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Window length in samples
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Always false for a usable window
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Apply a Hann window sized to `block`
pub fn apply_hann_window(block: &[i16]) -> Vec<Complex<f64>> {
    HannWindow::new(block.len()).apply(block)
}
