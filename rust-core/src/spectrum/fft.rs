//! In-place radix-2 FFT engine
//!
//! Iterative Cooley-Tukey transform: bit-reversal permutation followed by
//! log2(n) butterfly passes. Output is in natural order and unnormalized
//! (bin 0 of a constant signal `k` is `k * n`).
//!
//! Kernel sign: each pass uses the root `exp(+i * 2π / step)`.

use num_complex::Complex;
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FftError {
    #[error("FFT size must be a non-zero power of two (got {0})")]
    NotPowerOfTwo(usize),
}

/// Smallest `lg` with `2^lg >= n`
///
/// For a power-of-two `n` this is the exact exponent.
pub fn log2_ceil(n: usize) -> u32 {
    let mut lg = 0;
    while (1usize << lg) < n {
        lg += 1;
    }
    lg
}

/// Reverse the low `bits` bits of `index`
///
/// # Arguments
/// * `index` - Value to reverse, expected to be `< 2^bits`
/// * `bits` - Number of low bits taking part in the reversal
pub fn bit_reverse(index: usize, bits: u32) -> usize {
    let mut reversed = 0;
    for bit in 0..bits {
        if index & (1 << bit) != 0 {
            reversed |= 1 << (bits - 1 - bit);
        }
    }
    reversed
}

/// Transform `buffer` in place into its discrete Fourier transform
///
/// # Arguments
/// * `buffer` - Complex sequence; its length MUST be a power of two
///
/// # Panics
/// Debug builds panic if the length is not a power of two. Release builds
/// do not check, and a non-power-of-two length produces meaningless output
/// (the trailing partial group is skipped by the butterfly passes).
pub fn fft_in_place(buffer: &mut [Complex<f64>]) {
    let n = buffer.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two(), "FFT length {} is not a power of two", n);

    let lg_n = log2_ceil(n);

    for i in 0..n {
        let j = bit_reverse(i, lg_n);
        if i < j {
            buffer.swap(i, j);
        }
    }

    let mut step = 2;
    while step <= n {
        butterfly_pass(buffer, step, stage_root(step));
        step <<= 1;
    }
}

/// Primitive root of unity for a pass of the given step length
fn stage_root(step: usize) -> Complex<f64> {
    let angle = 2.0 * PI / step as f64;
    Complex::new(angle.cos(), angle.sin())
}

/// One butterfly pass over every group of `step` consecutive values
fn butterfly_pass(buffer: &mut [Complex<f64>], step: usize, root: Complex<f64>) {
    let half = step / 2;
    for group in buffer.chunks_exact_mut(step) {
        let (lower, upper) = group.split_at_mut(half);
        let mut twiddle = Complex::new(1.0, 0.0);
        for (a, b) in lower.iter_mut().zip(upper.iter_mut()) {
            let u = *a;
            let v = *b * twiddle;
            *a = u + v;
            *b = u - v;
            twiddle *= root;
        }
    }
}

/// FFT engine for a fixed power-of-two size
///
/// Caches the bit-reversal swap pairs and per-pass roots so repeated
/// transforms of same-sized blocks skip the setup work. Produces exactly
/// the same values as [`fft_in_place`].
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// FFT size (number of samples)
    size: usize,

    /// log2(size)
    log2_size: u32,

    /// Index pairs `(i, rev(i))` with `i < rev(i)`
    swaps: Vec<(usize, usize)>,

    /// Root of unity for each pass, step lengths 2, 4, ..., size
    roots: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `size` - FFT size (number of samples, must be a power of 2)
    pub fn new(size: usize) -> Result<Self, FftError> {
        if !size.is_power_of_two() {
            return Err(FftError::NotPowerOfTwo(size));
        }

        let log2_size = log2_ceil(size);
        let swaps = (0..size)
            .filter_map(|i| {
                let j = bit_reverse(i, log2_size);
                (i < j).then_some((i, j))
            })
            .collect();
        let roots = (1..=log2_size).map(|pass| stage_root(1 << pass)).collect();

        Ok(Self {
            size,
            log2_size,
            swaps,
            roots,
        })
    }

    /// Transform `buffer` in place
    ///
    /// `buffer.len()` must equal [`FftEngine::size`].
    pub fn process(&self, buffer: &mut [Complex<f64>]) {
        debug_assert_eq!(
            buffer.len(),
            self.size,
            "buffer length does not match FFT size"
        );

        for &(i, j) in &self.swaps {
            buffer.swap(i, j);
        }

        for (pass, &root) in self.roots.iter().enumerate() {
            butterfly_pass(buffer, 2 << pass, root);
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get log2 of the FFT size
    pub fn log2_size(&self) -> u32 {
        self.log2_size
    }
}
