//! Per-block spectral peak analysis
//!
//! Combines block extraction, Hann windowing and the FFT engine, reducing each
//! block's spectrum to its largest magnitude.

use super::blocks::block_count;
use super::fft::FftEngine;
use super::windowing::HannWindow;
use crate::config::{AnalysisConfig, ConfigError};
use num_complex::Complex;
use rayon::prelude::*;

/// Largest-magnitude bin of a spectrum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralPeak {
    /// Bin index (natural order)
    pub bin: usize,

    /// |X[bin]|
    pub magnitude: f64,
}

/// Find the bin with the largest magnitude
///
/// Ties go to the lowest bin. Returns `None` for an empty spectrum.
pub fn peak_magnitude(spectrum: &[Complex<f64>]) -> Option<SpectralPeak> {
    let (first, rest) = spectrum.split_first()?;
    let mut peak = SpectralPeak {
        bin: 0,
        magnitude: first.norm(),
    };

    for (offset, value) in rest.iter().enumerate() {
        let magnitude = value.norm();
        if peak.magnitude < magnitude {
            peak = SpectralPeak {
                bin: offset + 1,
                magnitude,
            };
        }
    }

    Some(peak)
}

/// Block peak analyzer
///
/// Holds the window, FFT engine and a reusable spectrum buffer for one
/// block geometry.
pub struct BlockPeakAnalyzer {
    config: AnalysisConfig,
    window: HannWindow,
    fft_engine: FftEngine,
    scratch: Vec<Complex<f64>>,
}

impl BlockPeakAnalyzer {
    /// Create new analyzer
    ///
    /// Fails if the configuration's block geometry is invalid.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let fft_engine = FftEngine::new(config.block_size)
            .map_err(|_| ConfigError::BlockSizeNotPowerOfTwo(config.block_size))?;
        let window = HannWindow::new(config.block_size);
        let scratch = vec![Complex::new(0.0, 0.0); config.block_size];

        Ok(Self {
            config,
            window,
            fft_engine,
            scratch,
        })
    }

    /// Window, transform and reduce a single block
    ///
    /// # Arguments
    /// * `block` - Exactly `block_size` samples
    ///
    /// # Panics
    /// Panics if `block` is not exactly `block_size` samples long.
    pub fn block_peak(&mut self, block: &[i16]) -> SpectralPeak {
        spectral_peak(&self.window, &self.fft_engine, block, &mut self.scratch)
    }

    /// Peak magnitude of a single block (same length rule as [`BlockPeakAnalyzer::block_peak`])
    pub fn analyze_block(&mut self, block: &[i16]) -> f64 {
        self.block_peak(block).magnitude
    }

    /// Peak magnitude of every block of `samples`, in block order
    pub fn analyze(&mut self, samples: &[i16]) -> Vec<f64> {
        let blocks = self.config.blocks(samples);
        log::debug!(
            "Analyzing {} blocks of {} samples (step {})",
            blocks.len(),
            self.config.block_size,
            self.config.step_size
        );

        let mut peaks = Vec::with_capacity(blocks.len());
        for block in blocks {
            peaks.push(self.analyze_block(block.samples));
        }
        peaks
    }

    /// Same as [`BlockPeakAnalyzer::analyze`], spread over the rayon pool
    ///
    /// Each worker owns its own spectrum buffer; results keep block order.
    pub fn analyze_parallel(&self, samples: &[i16]) -> Vec<f64> {
        let block_size = self.config.block_size;
        let step_size = self.config.step_size;
        let count = block_count(samples.len(), block_size, step_size);
        log::debug!(
            "Analyzing {} blocks on {} threads",
            count,
            rayon::current_num_threads()
        );

        (0..count)
            .into_par_iter()
            .map_init(
                || vec![Complex::new(0.0, 0.0); block_size],
                |scratch, index| {
                    let left = index * step_size;
                    let block = &samples[left..left + block_size];
                    spectral_peak(&self.window, &self.fft_engine, block, scratch).magnitude
                },
            )
            .collect()
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

fn spectral_peak(
    window: &HannWindow,
    fft_engine: &FftEngine,
    block: &[i16],
    scratch: &mut [Complex<f64>],
) -> SpectralPeak {
    window.apply_into(block, scratch);
    fft_engine.process(scratch);
    peak_magnitude(scratch).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use realfft::RealFftPlanner;
    use std::f64::consts::PI;

    fn tone(len: usize, period_bins: f64, block_size: usize, amplitude: f64) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * PI * period_bins * i as f64 / block_size as f64;
                (amplitude * phase.cos()).round() as i16
            })
            .collect()
    }

    #[test]
    fn test_peak_magnitude_first_occurrence() {
        let spectrum = vec![
            Complex::new(0.0, 1.0),
            Complex::new(-1.0, 0.0),
            Complex::new(0.5, 0.0),
            Complex::new(1.0, 0.0),
        ];
        let peak = peak_magnitude(&spectrum).unwrap();

        assert_eq!(peak.bin, 0);
        assert!((peak.magnitude - 1.0).abs() < 1e-15);
        assert!(peak_magnitude(&[]).is_none());
    }

    #[test]
    fn test_peak_magnitude_uses_norm() {
        let spectrum = vec![Complex::new(1.0, 1.0), Complex::new(3.0, -4.0), Complex::new(4.9, 0.0)];
        let peak = peak_magnitude(&spectrum).unwrap();

        assert_eq!(peak.bin, 1);
        assert!((peak.magnitude - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_waveform_yields_nothing() {
        let mut analyzer = BlockPeakAnalyzer::new(AnalysisConfig::default()).unwrap();

        assert!(analyzer.analyze(&vec![100i16; 4095]).is_empty());
        assert!(analyzer.analyze(&[]).is_empty());
        assert!(analyzer.analyze_parallel(&vec![100i16; 4095]).is_empty());
    }

    #[test]
    fn test_result_count() {
        let mut analyzer = BlockPeakAnalyzer::new(AnalysisConfig::new(64, 16)).unwrap();

        assert_eq!(analyzer.analyze(&vec![1i16; 64]).len(), 1);
        for len in [64, 65, 79, 80, 81, 500] {
            let peaks = analyzer.analyze(&vec![1i16; len]);
            assert_eq!(peaks.len(), (len - 64) / 16 + 1);
        }
    }

    #[test]
    fn test_silence_has_zero_peaks() {
        let mut analyzer = BlockPeakAnalyzer::new(AnalysisConfig::new(256, 64)).unwrap();
        let peaks = analyzer.analyze(&vec![0i16; 1024]);

        assert_eq!(peaks.len(), 13);
        assert!(peaks.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_sinusoid_peak_bin_and_magnitude() {
        let n = 4096;
        let target_bin = 100;
        let amplitude = 10_000.0;
        let mut analyzer = BlockPeakAnalyzer::new(AnalysisConfig::default()).unwrap();

        let peak = analyzer.block_peak(&tone(n, target_bin as f64, n, amplitude));

        // Real input: |X[k]| == |X[n-k]|, either mirror may win
        let bin = peak.bin.min(n - peak.bin);
        assert!((bin as i64 - target_bin as i64).abs() <= 1);

        // amplitude * n/2 scaled by the Hann coherent gain of ~0.5
        let expected = amplitude * n as f64 / 4.0;
        assert!((peak.magnitude / expected - 1.0).abs() < 0.02);

        let half = analyzer.analyze_block(&tone(n, target_bin as f64, n, amplitude / 2.0));
        assert!((peak.magnitude / half - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = AnalysisConfig::new(1024, 256);
        let samples = tone(20_000, 37.5, 1024, 8000.0);
        let mut analyzer = BlockPeakAnalyzer::new(config).unwrap();

        let sequential = analyzer.analyze(&samples);
        let parallel = analyzer.analyze_parallel(&samples);

        assert_eq!(sequential.len(), (20_000 - 1024) / 256 + 1);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_peak_matches_realfft() {
        let n = 2048;
        let samples = tone(n, 211.3, n, 12_000.0);
        let mut analyzer = BlockPeakAnalyzer::new(AnalysisConfig::new(n, 512)).unwrap();
        let ours = analyzer.analyze_block(&samples);

        let mut input: Vec<f64> = HannWindow::new(n)
            .apply(&samples)
            .iter()
            .map(|c| c.re)
            .collect();
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(n);
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output).unwrap();
        let reference = output.iter().map(|c| c.norm()).fold(0.0, f64::max);

        assert!((ours - reference).abs() < 1e-9 * reference);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert_eq!(
            BlockPeakAnalyzer::new(AnalysisConfig::new(100, 10)).err(),
            Some(ConfigError::BlockSizeNotPowerOfTwo(100))
        );
    }

    #[test]
    #[should_panic(expected = "block length does not match window")]
    fn test_short_block_is_rejected() {
        let mut analyzer = BlockPeakAnalyzer::new(AnalysisConfig::new(8, 4)).unwrap();

        let first = analyzer.analyze_block(&[1000, -1000, 500, 0, 0, 0, 0, 0]);
        assert!(first > 0.0);

        // Must not reuse the previous block's spectrum
        analyzer.analyze_block(&[0, 0, 0]);
    }

    #[test]
    fn test_parallel_drops_trailing_partial_block() {
        let config = AnalysisConfig::new(64, 16);
        let samples = tone(64 + 3 * 16 + 15, 5.0, 64, 3000.0);
        let mut analyzer = BlockPeakAnalyzer::new(config).unwrap();

        let parallel = analyzer.analyze_parallel(&samples);

        assert_eq!(parallel.len(), 4);
        assert_eq!(parallel, analyzer.analyze(&samples));
    }
}
