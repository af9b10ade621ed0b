use crate::{ProjectAction, ProjectState};

pub(super) fn reduce(action: &ProjectAction, state: &mut ProjectState) -> bool {
    match action {
        ProjectAction::SetPlaying(playing) => {
            let changed = state.is_playing != *playing;
            state.is_playing = *playing;
            changed
        }
        ProjectAction::SetTime(t) => {
            if !t.is_finite() {
                return false;
            }
            let t = state.clamp_time(*t);
            let changed = state.current_time != t;
            state.current_time = t;
            changed
        }
        ProjectAction::SetZoom(zoom) => {
            if !zoom.is_finite() || *zoom <= 0.0 {
                return false;
            }
            let changed = state.zoom != *zoom;
            state.zoom = *zoom;
            changed
        }
        ProjectAction::SetDuration(duration) => {
            if !duration.is_finite() || *duration <= 0.0 {
                return false;
            }
            let changed = state.duration != *duration;
            state.duration = *duration;
            state.current_time = state.clamp_time(state.current_time);
            changed
        }
        _ => false,
    }
}
