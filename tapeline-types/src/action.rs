//! The enumerated set of transitions that mutate `ProjectState`.

use crate::state::{Clip, ClipPatch, Track};
use crate::{ClipId, TrackId};

/// Project transitions. Each variant carries the data it needs.
///
/// Applied by [`crate::reduce::reduce`]. Callers clamp geometry before
/// issuing `UpdateClip`; a transition that would break an invariant is dropped.
#[derive(Debug, Clone)]
pub enum ProjectAction {
    /// Append a track (with any clips it already holds).
    AddTrack(Track),
    /// Append a clip to the track named by `clip.track_id`.
    AddClip(Clip),
    /// Merge the supplied fields into a clip.
    UpdateClip { id: ClipId, patch: ClipPatch },
    RemoveClip(ClipId),
    /// Remove a track and every clip on it.
    DeleteTrack(TrackId),
    SetTrackMuted { id: TrackId, muted: bool },
    SetPlaying(bool),
    /// Move the transport (clamped to `[0, duration]`).
    SetTime(f64),
    SetZoom(f64),
    SetDuration(f64),
}

impl ProjectAction {
    /// Short label for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectAction::AddTrack(_) => "AddTrack",
            ProjectAction::AddClip(_) => "AddClip",
            ProjectAction::UpdateClip { .. } => "UpdateClip",
            ProjectAction::RemoveClip(_) => "RemoveClip",
            ProjectAction::DeleteTrack(_) => "DeleteTrack",
            ProjectAction::SetTrackMuted { .. } => "SetTrackMuted",
            ProjectAction::SetPlaying(_) => "SetPlaying",
            ProjectAction::SetTime(_) => "SetTime",
            ProjectAction::SetZoom(_) => "SetZoom",
            ProjectAction::SetDuration(_) => "SetDuration",
        }
    }

    /// Transport-only transitions fire on every playback tick and are kept out
    /// of debug logs.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProjectAction::SetPlaying(_) | ProjectAction::SetTime(_))
    }
}
