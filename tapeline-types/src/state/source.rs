//! Decoded audio sources shared by clips.

use crate::SourceId;

/// Output of a decoder: planar samples plus format information.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// One buffer per channel, all the same length.
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
    /// Length in seconds
    pub total_duration: f64,
}

impl DecodedAudio {
    /// Build from planar channel data, deriving the duration from the frame count.
    pub fn from_planar(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = channels.first().map_or(0, Vec::len);
        let total_duration = if sample_rate == 0 {
            0.0
        } else {
            frames as f64 / sample_rate as f64
        };
        Self {
            channels,
            sample_rate,
            total_duration,
        }
    }

    /// Silent audio of the given length; handy for placeholders and tests.
    pub fn silence(channel_count: usize, sample_rate: u32, seconds: f64) -> Self {
        let frames = (seconds * sample_rate as f64).round() as usize;
        Self::from_planar(vec![vec![0.0; frames]; channel_count], sample_rate)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// An immutable decoded buffer. Clips hold it by `Arc`, so many clips can
/// reference the same source without copying samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub id: SourceId,
    /// Display name (usually the imported file name)
    pub name: String,
    pub audio: DecodedAudio,
}

impl AudioSource {
    pub fn new(id: SourceId, name: impl Into<String>, audio: DecodedAudio) -> Self {
        Self {
            id,
            name: name.into(),
            audio,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.audio.channel_count()
    }

    pub fn frame_count(&self) -> usize {
        self.audio.frame_count()
    }

    pub fn duration(&self) -> f64 {
        self.audio.total_duration
    }

    /// Sample at `frame` in `channel`, or silence past either end.
    #[inline]
    pub fn sample(&self, channel: usize, frame: usize) -> f32 {
        self.audio
            .channels
            .get(channel)
            .and_then(|c| c.get(frame))
            .copied()
            .unwrap_or(0.0)
    }
}
