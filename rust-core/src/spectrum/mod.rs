//! Block-wise spectral analysis with FFT

pub mod analysis;
pub mod blocks;
pub mod fft;
pub mod windowing;

pub use analysis::{peak_magnitude, BlockPeakAnalyzer, SpectralPeak};
pub use blocks::{block_count, Block, Blocks};
pub use fft::{fft_in_place, FftEngine, FftError};
pub use windowing::{apply_hann_window, hann_window, HannWindow};
