//! Pure state transitions for the Tapeline timeline.
//!
//! `reduce` is the single source of truth for action → state changes. The
//! controller in tapeline-core calls it on every dispatch and swaps the result
//! in whole.
//!
//! Reducers never fail. A transition that names an unknown id or carries an
//! invalid value leaves the state as it was. They do NOT:
//! - Talk to the audio host
//! - Clamp clip geometry (gestures clamp before dispatching)
//! - Allocate ids

mod clip;
mod track;
mod transport;

use crate::{ProjectAction, ProjectState};

/// Apply `action` to a copy of `state`. Sources are shared by `Arc`, so the
/// copy never duplicates sample data.
pub fn reduce(state: &ProjectState, action: &ProjectAction) -> ProjectState {
    let mut next = state.clone();
    reduce_in_place(&mut next, action);
    next
}

/// Apply `action` directly. Returns true if the state changed.
pub fn reduce_in_place(state: &mut ProjectState, action: &ProjectAction) -> bool {
    match action {
        ProjectAction::AddTrack(_)
        | ProjectAction::DeleteTrack(_)
        | ProjectAction::SetTrackMuted { .. } => track::reduce(action, state),

        ProjectAction::AddClip(_)
        | ProjectAction::UpdateClip { .. }
        | ProjectAction::RemoveClip(_) => clip::reduce(action, state),

        ProjectAction::SetPlaying(_)
        | ProjectAction::SetTime(_)
        | ProjectAction::SetZoom(_)
        | ProjectAction::SetDuration(_) => transport::reduce(action, state),
    }
}

/// Whether `action` would change `state`. Used to log ignored transitions.
pub fn is_effective(state: &ProjectState, action: &ProjectAction) -> bool {
    let mut probe = state.clone();
    reduce_in_place(&mut probe, action)
}
