//! Tracks: lanes of clips with an independent mute flag.

use serde::{Deserialize, Serialize};

use super::clip::Clip;
use crate::{ClipId, TrackId};

/// Rotating track palette, assigned by creation index.
pub const TRACK_PALETTE: [TrackColor; 8] = [
    TrackColor(0xFF66D4),
    TrackColor(0x52D0FF),
    TrackColor(0xFFD75A),
    TrackColor(0xFF8A4F),
    TrackColor(0x9A5BFF),
    TrackColor(0xC9FF6A),
    TrackColor(0x4BFAC9),
    TrackColor(0xFF5C7A),
];

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackColor(pub u32);

impl TrackColor {
    pub fn for_index(index: usize) -> Self {
        TRACK_PALETTE[index % TRACK_PALETTE.len()]
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

impl std::fmt::Display for TrackColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// An ordered (by creation) collection of clips sharing a lane.
/// Clips may overlap; overlapping clips both sound.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub color: TrackColor,
    pub muted: bool,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(id: TrackId, name: impl Into<String>, color: TrackColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            muted: false,
            clips: Vec::new(),
        }
    }

    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Latest clip end on this track, 0 when empty.
    pub fn end_time(&self) -> f64 {
        self.clips.iter().map(Clip::end_time).fold(0.0, f64::max)
    }
}

/// Strip the extension from a file name for use as a track name.
pub fn track_name_from_file(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name[..pos].to_string(),
        _ => file_name.to_string(),
    }
}
