//! Decoding imported audio files.

use std::fmt;
use std::io::Cursor;

use tapeline_types::DecodedAudio;

#[derive(Debug)]
pub enum DecodeError {
    Wav(hound::Error),
    /// The file decoded to zero frames.
    Empty,
    Unsupported(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Wav(e) => write!(f, "WAV decode error: {}", e),
            DecodeError::Empty => write!(f, "audio contains no samples"),
            DecodeError::Unsupported(what) => write!(f, "unsupported audio: {}", what),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Wav(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hound::Error> for DecodeError {
    fn from(e: hound::Error) -> Self {
        DecodeError::Wav(e)
    }
}

/// Turns encoded file bytes into planar float samples.
pub trait Decoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, DecodeError>;
}

/// RIFF/WAVE decoder. Integer PCM is normalised by `2^(bits-1)`; float PCM is
/// passed through.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
        let reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(DecodeError::Unsupported("zero channels".into()));
        }
        if spec.sample_rate == 0 {
            return Err(DecodeError::Unsupported("zero sample rate".into()));
        }
        if spec.sample_format == hound::SampleFormat::Int
            && !(1..=32).contains(&spec.bits_per_sample)
        {
            return Err(DecodeError::Unsupported(format!(
                "{}-bit integer PCM",
                spec.bits_per_sample
            )));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_val))
                    .collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        };

        let frames = interleaved.len() / channels;
        if frames == 0 {
            return Err(DecodeError::Empty);
        }

        let mut planar = vec![Vec::with_capacity(frames); channels];
        for frame in interleaved.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                planar[ch].push(sample);
            }
        }
        Ok(DecodedAudio::from_planar(planar, spec.sample_rate))
    }
}
