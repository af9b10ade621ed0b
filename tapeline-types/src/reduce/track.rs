use std::collections::HashSet;

use crate::{ProjectAction, ProjectState, Track};

pub(super) fn reduce(action: &ProjectAction, state: &mut ProjectState) -> bool {
    match action {
        ProjectAction::AddTrack(track) => {
            if !can_add(state, track) {
                return false;
            }
            state.tracks.push(track.clone());
            true
        }
        ProjectAction::DeleteTrack(id) => {
            let before = state.tracks.len();
            state.tracks.retain(|t| t.id != *id);
            state.tracks.len() != before
        }
        ProjectAction::SetTrackMuted { id, muted } => match state.track_mut(*id) {
            Some(track) if track.muted != *muted => {
                track.muted = *muted;
                true
            }
            _ => false,
        },
        _ => false,
    }
}

/// A new track must bring a fresh id, fresh clip ids, and clips that already
/// point back at it and satisfy their invariants.
fn can_add(state: &ProjectState, track: &Track) -> bool {
    if state.track(track.id).is_some() {
        return false;
    }
    let mut seen = HashSet::new();
    track.clips.iter().all(|c| {
        c.track_id == track.id
            && c.satisfies_invariants()
            && !state.contains_clip(c.id)
            && seen.insert(c.id)
    })
}
