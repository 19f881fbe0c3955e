//! Sliding block extraction over a decoded waveform
//!
//! Blocks borrow the waveform; nothing is copied. A trailing partial block
//! is dropped.

use std::iter::FusedIterator;

/// Number of complete blocks in a waveform of `len` samples
///
/// `floor((len - block_size) / step_size) + 1` when `len >= block_size`, else 0.
/// `step_size` must be non-zero.
pub fn block_count(len: usize, block_size: usize, step_size: usize) -> usize {
    if len < block_size {
        0
    } else {
        (len - block_size) / step_size + 1
    }
}

/// One analysis block: `samples[left..right]` of the waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Position of the block in block order
    pub index: usize,

    /// Left bound (inclusive)
    pub left: usize,

    /// Right bound (exclusive)
    pub right: usize,

    /// The block's samples
    pub samples: &'a [i16],
}

impl<'a> Block<'a> {
    /// Block length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True only for zero-length blocks
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Iterator over successive overlapping blocks
///
/// Cloning the iterator restarts iteration from the clone point.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    samples: &'a [i16],
    block_size: usize,
    step_size: usize,
    next_index: usize,
    left: usize,
}

impl<'a> Blocks<'a> {
    /// Create block iterator
    ///
    /// # Arguments
    /// * `samples` - Whole waveform
    /// * `block_size` - Samples per block
    /// * `step_size` - Advance between left bounds, must be non-zero
    ///
    /// # Panics
    /// Panics if `step_size` is zero.
    pub fn new(samples: &'a [i16], block_size: usize, step_size: usize) -> Self {
        assert!(step_size > 0, "step size must be non-zero");
        Self {
            samples,
            block_size,
            step_size,
            next_index: 0,
            left: 0,
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let right = self.left.checked_add(self.block_size)?;
        if right > self.samples.len() {
            return None;
        }

        let block = Block {
            index: self.next_index,
            left: self.left,
            right,
            samples: &self.samples[self.left..right],
        };

        self.left += self.step_size;
        self.next_index += 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = block_count(
            self.samples.len().saturating_sub(self.left),
            self.block_size,
            self.step_size,
        );
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Blocks<'_> {}

impl FusedIterator for Blocks<'_> {}
