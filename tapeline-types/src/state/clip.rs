//! Clips: placed, time-bounded references into a decoded source.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::source::AudioSource;
use crate::geometry::ClipGeometry;
use crate::{ClipId, TrackId};

/// Slack allowed on `offset + duration <= total_duration`. Geometry derived from
/// pixel deltas can land a few ulps past the source end.
pub const DURATION_EPSILON: f64 = 1e-9;

/// A placed reference to a segment of a decoded source. All times in seconds.
#[derive(Debug, Clone)]
pub struct Clip {
    pub id: ClipId,
    /// Owning track (back-reference, the track owns the clip)
    pub track_id: TrackId,
    pub name: String,
    pub source: Arc<AudioSource>,
    /// Position on the timeline
    pub start_time: f64,
    /// Start point within the source
    pub offset: f64,
    /// Seconds of source played
    pub duration: f64,
    /// Full length of the source
    pub total_duration: f64,
}

impl Clip {
    /// A clip covering the whole source, starting at timeline zero.
    pub fn from_source(id: ClipId, track_id: TrackId, name: impl Into<String>, source: Arc<AudioSource>) -> Self {
        let total_duration = source.duration();
        Self {
            id,
            track_id,
            name: name.into(),
            source,
            start_time: 0.0,
            offset: 0.0,
            duration: total_duration,
            total_duration,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn geometry(&self) -> ClipGeometry {
        ClipGeometry {
            start_time: self.start_time,
            offset: self.offset,
            duration: self.duration,
            total_duration: self.total_duration,
        }
    }

    pub fn satisfies_invariants(&self) -> bool {
        self.geometry().is_valid()
    }

    /// Apply a partial update, returning the merged clip without touching `self`.
    pub fn patched(&self, patch: &ClipPatch) -> Clip {
        let mut clip = self.clone();
        if let Some(start_time) = patch.start_time {
            clip.start_time = start_time;
        }
        if let Some(offset) = patch.offset {
            clip.offset = offset;
        }
        if let Some(duration) = patch.duration {
            clip.duration = duration;
        }
        if let Some(ref name) = patch.name {
            clip.name = name.clone();
        }
        clip
    }
}

/// Partial clip update. Fields left as `None` are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPatch {
    pub start_time: Option<f64>,
    pub offset: Option<f64>,
    pub duration: Option<f64>,
    pub name: Option<String>,
}

impl ClipPatch {
    pub fn start_time(start_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            ..Self::default()
        }
    }

    pub fn duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Patch carrying every geometry field (left-edge trims move all three).
    pub fn geometry(geometry: &ClipGeometry) -> Self {
        Self {
            start_time: Some(geometry.start_time),
            offset: Some(geometry.offset),
            duration: Some(geometry.duration),
            name: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.offset.is_none() && self.duration.is_none() && self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodedAudio, SourceId};

    fn source(seconds: f64) -> Arc<AudioSource> {
        Arc::new(AudioSource::new(
            SourceId::new(1),
            "loop.wav",
            DecodedAudio::silence(1, 1000, seconds),
        ))
    }

    #[test]
    fn from_source_covers_whole_source() {
        let clip = Clip::from_source(ClipId::new(1), TrackId::new(1), "loop.wav", source(4.0));
        assert_eq!(clip.start_time, 0.0);
        assert_eq!(clip.offset, 0.0);
        assert_eq!(clip.duration, 4.0);
        assert_eq!(clip.total_duration, 4.0);
        assert!(clip.satisfies_invariants());
    }

    #[test]
    fn patch_merges_only_supplied_fields() {
        let clip = Clip::from_source(ClipId::new(1), TrackId::new(1), "loop.wav", source(4.0));
        let moved = clip.patched(&ClipPatch::start_time(2.5));
        assert_eq!(moved.start_time, 2.5);
        assert_eq!(moved.offset, 0.0);
        assert_eq!(moved.duration, 4.0);
        assert_eq!(moved.name, "loop.wav");
    }

    #[test]
    fn patch_past_source_end_breaks_invariants() {
        let clip = Clip::from_source(ClipId::new(1), TrackId::new(1), "loop.wav", source(4.0));
        let patched = clip.patched(&ClipPatch {
            offset: Some(1.0),
            ..ClipPatch::default()
        });
        assert!(!patched.satisfies_invariants());
    }

    #[test]
    fn empty_patch() {
        assert!(ClipPatch::default().is_empty());
        assert!(!ClipPatch::duration(1.0).is_empty());
    }
}
