//! Audio input: decoding compressed files to PCM

pub mod decoder;

pub use decoder::{DecodeError, Mp3Decoder, Waveform, WaveformSource};
