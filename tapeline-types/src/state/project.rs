//! The project aggregate root.

use super::clip::Clip;
use super::track::Track;
use crate::{ClipId, TrackId};

/// Project length ceiling for new projects, seconds.
pub const DEFAULT_DURATION_SECS: f64 = 60.0;

/// Pixels per second for new projects.
pub const DEFAULT_ZOOM: f64 = 50.0;

/// Top-level project state. Replaced whole on every transition, never
/// mutated in place by readers.
#[derive(Debug, Clone)]
pub struct ProjectState {
    /// Display order
    pub tracks: Vec<Track>,
    pub is_playing: bool,
    /// Transport position in seconds, within `[0, duration]`
    pub current_time: f64,
    /// Project length ceiling in seconds (user-settable)
    pub duration: f64,
    /// Pixels per second; display scale only
    pub zoom: f64,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectState {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_DURATION_SECS, DEFAULT_ZOOM)
    }

    /// Empty project with the given duration and zoom. Invalid values fall back
    /// to the defaults.
    pub fn with_settings(duration: f64, zoom: f64) -> Self {
        Self {
            tracks: Vec::new(),
            is_playing: false,
            current_time: 0.0,
            duration: if duration.is_finite() && duration > 0.0 {
                duration
            } else {
                DEFAULT_DURATION_SECS
            },
            zoom: if zoom.is_finite() && zoom > 0.0 {
                zoom
            } else {
                DEFAULT_ZOOM
            },
        }
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips().find(|c| c.id == id)
    }

    pub fn clip_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.clips.iter_mut())
            .find(|c| c.id == id)
    }

    /// Every clip, in track display order then creation order.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// Clips on tracks that are not muted.
    pub fn unmuted_clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks
            .iter()
            .filter(|t| !t.muted)
            .flat_map(|t| t.clips.iter())
    }

    pub fn track_of_clip(&self, id: ClipId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.clip(id).is_some())
    }

    pub fn contains_clip(&self, id: ClipId) -> bool {
        self.clip(id).is_some()
    }

    /// Latest clip end across all tracks. May exceed `duration`; content past
    /// the ceiling is simply never played or rendered.
    pub fn content_end(&self) -> f64 {
        self.tracks.iter().map(Track::end_time).fold(0.0, f64::max)
    }

    /// Clamp a transport position into `[0, duration]`.
    pub fn clamp_time(&self, t: f64) -> f64 {
        t.clamp(0.0, self.duration)
    }

    /// Whether every clip and transport invariant holds.
    pub fn is_consistent(&self) -> bool {
        let clips_ok = self.clips().all(Clip::satisfies_invariants);
        let owners_ok = self
            .tracks
            .iter()
            .all(|t| t.clips.iter().all(|c| c.track_id == t.id));
        let time_ok = self.current_time >= 0.0 && self.current_time <= self.duration;
        clips_ok && owners_ok && time_ok && self.duration > 0.0 && self.zoom > 0.0
    }
}
