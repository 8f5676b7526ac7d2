//! Audio file decoding with symphonia
//!
//! Opens a file, decodes the default track and collapses all channels into
//! one mono sample sequence

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to open file: {0}")]
    Open(#[from] std::io::Error),

    #[error("unrecognized or unsupported format: {0}")]
    Probe(symphonia::core::errors::Error),

    #[error("no decodable audio track")]
    NoTrack,

    #[error("track does not declare a sample rate")]
    NoSampleRate,

    #[error("failed to create decoder: {0}")]
    Decoder(symphonia::core::errors::Error),

    #[error("no samples decoded")]
    Empty,
}

/// One mono audio signal, immutable once read
#[derive(Debug, Clone)]
pub struct Signal {
    /// Mono samples
    pub samples: Vec<f64>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Signal {
    /// Signal length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Read an audio file into a mono signal
///
/// The container and codec are probed by symphonia, so any enabled format
/// (WAV, FLAC, OGG/Vorbis, MP3, AAC, ALAC) works. Multi-channel sources are
/// collapsed by averaging all channels with equal weight.
///
/// # Arguments
/// * `path` - Path to an audio file
///
/// # Returns
/// The decoded signal, or a `ReadError` the caller may treat as
/// "skip this file"
pub fn read_signal(path: &Path) -> Result<Signal, ReadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(ReadError::Probe)?;

    let mut format = probed.format;
    let track = format.default_track().ok_or(ReadError::NoTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(ReadError::NoSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(ReadError::Decoder)?;

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            // End of stream, or a malformed tail we have no use for
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // A corrupt packet is not fatal; keep decoding
            Err(_) => continue,
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(buf) = sample_buf.as_mut() {
            let channels = decoded.spec().channels.count();
            buf.copy_interleaved_ref(decoded);

            for chunk in buf.samples().chunks(channels) {
                let mono = chunk.iter().map(|&s| s as f64).sum::<f64>() / channels as f64;
                samples.push(mono);
            }
        }
    }

    if samples.is_empty() {
        return Err(ReadError::Empty);
    }

    Ok(Signal {
        samples,
        sample_rate,
    })
}
