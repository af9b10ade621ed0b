//! Timeline state: decoded sources, clips, tracks, and the project aggregate.

pub mod clip;
pub mod project;
pub mod source;
pub mod track;

pub use clip::{Clip, ClipPatch, DURATION_EPSILON};
pub use project::{ProjectState, DEFAULT_DURATION_SECS, DEFAULT_ZOOM};
pub use source::{AudioSource, DecodedAudio};
pub use track::{track_name_from_file, Track, TrackColor, TRACK_PALETTE};
