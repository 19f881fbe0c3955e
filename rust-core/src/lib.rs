//! Block Spectrum - per-block FFT peak magnitudes of decoded audio
//!
//! Slices a 16-bit PCM waveform into overlapping power-of-two blocks, applies a
//! Hann window, runs an in-place radix-2 FFT and reports the largest spectral
//! magnitude of every block.
//!
//! ```no_run
//! use block_spectrum::{block_peaks, AnalysisConfig, Mp3Decoder, WaveformSource};
//! use std::path::Path;
//!
//! let waveform = Mp3Decoder::new().decode(Path::new("input.mp3"))?;
//! let peaks = block_peaks(&waveform.samples, &AnalysisConfig::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod config;
pub mod output;
pub mod spectrum;

pub use audio::{DecodeError, Mp3Decoder, Waveform, WaveformSource};
pub use config::{AnalysisConfig, ConfigError, BLOCK_SIZE, STEP_SIZE};
pub use output::write_peaks;
pub use spectrum::{BlockPeakAnalyzer, FftEngine};

/// Peak spectral magnitude of every block of `samples`, in block order
///
/// Runs on the rayon pool when `config.parallel` is set; the result is the
/// same either way.
///
/// # Errors
/// Returns `ConfigError` if the block geometry is invalid.
pub fn block_peaks(samples: &[i16], config: &AnalysisConfig) -> Result<Vec<f64>, ConfigError> {
    let mut analyzer = BlockPeakAnalyzer::new(config.clone())?;

    let peaks = if config.parallel {
        analyzer.analyze_parallel(samples)
    } else {
        analyzer.analyze(samples)
    };
    Ok(peaks)
}
