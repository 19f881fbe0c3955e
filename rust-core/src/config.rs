//! Analysis configuration
//!
//! Block geometry and execution mode for the block peak pipeline

use crate::spectrum::blocks::Blocks;
use thiserror::Error;

/// Default block length in samples (one FFT frame)
pub const BLOCK_SIZE: usize = 4096;

/// Default distance between the left bounds of successive blocks
pub const STEP_SIZE: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Block size must be a power of two (got {0})")]
    BlockSizeNotPowerOfTwo(usize),

    #[error("Block size must be at least 2 samples (got {0})")]
    BlockSizeTooSmall(usize),

    #[error("Step size must be greater than zero")]
    ZeroStepSize,

    #[error("Step size {step} exceeds block size {block}")]
    StepSizeExceedsBlockSize { step: usize, block: usize },
}

/// Block peak analysis configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Block length in samples (must be a power of 2, at least 2)
    pub block_size: usize,

    /// Advance between successive blocks in samples (1..=block_size)
    pub step_size: usize,

    /// Process blocks on the rayon thread pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            step_size: STEP_SIZE,
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    /// Create configuration with the given block geometry, sequential execution
    pub fn new(block_size: usize, step_size: usize) -> Self {
        Self {
            block_size,
            step_size,
            parallel: false,
        }
    }

    /// Enable or disable parallel block processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the block geometry
    ///
    /// The FFT needs a power-of-two block and the Hann window divides by
    /// `block_size - 1`, so single-sample blocks are rejected as well.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size < 2 {
            return Err(ConfigError::BlockSizeTooSmall(self.block_size));
        }
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_size));
        }
        if self.step_size == 0 {
            return Err(ConfigError::ZeroStepSize);
        }
        if self.step_size > self.block_size {
            return Err(ConfigError::StepSizeExceedsBlockSize {
                step: self.step_size,
                block: self.block_size,
            });
        }
        Ok(())
    }

    /// Overlap between adjacent blocks in samples
    pub fn overlap(&self) -> usize {
        self.block_size.saturating_sub(self.step_size)
    }

    /// Iterate over the blocks of `samples` using this geometry
    pub fn blocks<'a>(&self, samples: &'a [i16]) -> Blocks<'a> {
        Blocks::new(samples, self.block_size, self.step_size)
    }
}
