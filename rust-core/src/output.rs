//! Text rendering of block peak results

use std::io::{self, Write};

/// Digits after the decimal point for each peak value
pub const PEAK_PRECISION: usize = 20;

/// Write one fixed-point line per peak, in the given order
///
/// # Arguments
/// * `writer` - Destination; wrap slow sinks such as stdout in a `BufWriter`
/// * `peaks` - Peak magnitudes in block order
pub fn write_peaks<W: Write>(writer: &mut W, peaks: &[f64]) -> io::Result<()> {
    for peak in peaks {
        writeln!(writer, "{:.*}", PEAK_PRECISION, peak)?;
    }
    writer.flush()
}
