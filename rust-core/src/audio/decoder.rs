//! MP3 decoding using Symphonia
//!
//! Produces the flat interleaved 16-bit PCM buffer the block analysis runs on.
//! Channels are not separated.

use std::fs::File;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Audio file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed audio stream: {0}")]
    MalformedStream(String),

    #[error("No decodable audio track found")]
    NoAudioTrack,
}

/// Decoded PCM audio
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Waveform {
    /// Interleaved samples exactly as the decoder produced them
    pub samples: Vec<i16>,

    /// Sample rate in Hz (0 if the stream carried no audio frames)
    pub sample_rate: u32,

    /// Number of interleaved channels
    pub channels: u16,
}

impl Waveform {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels as usize;
        frames as f64 / self.sample_rate as f64
    }
}

/// Source of decoded waveforms
pub trait WaveformSource {
    /// Decode the audio file at `path`
    fn decode(&self, path: &Path) -> Result<Waveform, DecodeError>;
}

/// MP3 decoder backed by Symphonia
///
/// Corrupt frames are skipped with a warning rather than aborting the decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp3Decoder;

impl Mp3Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode an in-memory MP3 stream
    pub fn decode_bytes(&self, data: Vec<u8>) -> Result<Waveform, DecodeError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());
        let mut hint = Hint::new();
        hint.with_extension("mp3");
        decode_stream(mss, &hint)
    }
}

impl WaveformSource for Mp3Decoder {
    fn decode(&self, path: &Path) -> Result<Waveform, DecodeError> {
        log::debug!("Decoding audio file: {}", path.display());

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DecodeError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => DecodeError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let waveform = decode_stream(mss, &hint)?;
        log::info!(
            "Decoded {} samples ({} Hz, {} channels, {:.2}s) from {}",
            waveform.len(),
            waveform.sample_rate,
            waveform.channels,
            waveform.duration_seconds(),
            path.display()
        );
        Ok(waveform)
    }
}

fn decode_stream(mss: MediaSourceStream, hint: &Hint) -> Result<Waveform, DecodeError> {
    let probed = symphonia::default::get_probe()
        .format(hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::MalformedStream(format!("failed to probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::MalformedStream(format!("failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<i16>> = None;
    let mut skipped = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(DecodeError::MalformedStream(format!(
                    "failed to read packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped += 1;
                log::warn!("Skipping corrupt frame: {}", msg);
                continue;
            }
            Err(e) => {
                return Err(DecodeError::MalformedStream(format!(
                    "failed to decode packet: {}",
                    e
                )))
            }
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u16;

        let needed = decoded.capacity() * spec.channels.count();
        if sample_buf.as_ref().map_or(true, |buf| buf.capacity() < needed) {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(buf) = sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() && skipped > 0 {
        return Err(DecodeError::MalformedStream(format!(
            "all {} frames failed to decode",
            skipped
        )));
    }
    if skipped > 0 {
        log::warn!("Skipped {} corrupt frames", skipped);
    }

    Ok(Waveform::new(samples, sample_rate, channels))
}
