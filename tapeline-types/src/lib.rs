//! # tapeline-types
//!
//! Shared type definitions for the Tapeline timeline editor.
//! This crate holds the timeline data model, the transition set that mutates it,
//! the pure reducer, and the clip trim/move arithmetic. Nothing here performs I/O
//! or talks to an audio device; that lives in tapeline-core.

pub mod action;
pub mod geometry;
pub mod reduce;
pub mod state;
pub mod time;

pub use action::*;
pub use geometry::{ClipGeometry, ClipGesture, GestureKind, GestureOutcome, LiveGeometry};
pub use state::*;

/// Unique identifier for a track.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TrackId(u32);

impl TrackId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a clip placed on the timeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ClipId(u32);

impl ClipId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a decoded audio source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SourceId(u32);

impl SourceId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id allocator. Ids handed out are never reused within a session,
/// even after the track or clip they named has been deleted.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_track: u32,
    next_clip: u32,
    next_source: u32,
    tracks_created: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_track: 1,
            next_clip: 1,
            next_source: 1,
            tracks_created: 0,
        }
    }

    pub fn track(&mut self) -> TrackId {
        let id = TrackId::new(self.next_track);
        self.next_track += 1;
        self.tracks_created += 1;
        id
    }

    pub fn clip(&mut self) -> ClipId {
        let id = ClipId::new(self.next_clip);
        self.next_clip += 1;
        id
    }

    pub fn source(&mut self) -> SourceId {
        let id = SourceId::new(self.next_source);
        self.next_source += 1;
        id
    }

    /// Number of tracks allocated so far (the creation index of the next track).
    pub fn tracks_created(&self) -> usize {
        self.tracks_created
    }
}
