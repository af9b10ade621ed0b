use crate::{ProjectAction, ProjectState};

pub(super) fn reduce(action: &ProjectAction, state: &mut ProjectState) -> bool {
    match action {
        ProjectAction::AddClip(clip) => {
            if state.contains_clip(clip.id) || !clip.satisfies_invariants() {
                return false;
            }
            match state.track_mut(clip.track_id) {
                Some(track) => {
                    track.clips.push(clip.clone());
                    true
                }
                None => false,
            }
        }
        ProjectAction::UpdateClip { id, patch } => {
            if patch.is_empty() {
                return false;
            }
            let Some(clip) = state.clip_mut(*id) else {
                return false;
            };
            let merged = clip.patched(patch);
            if !merged.satisfies_invariants() {
                return false;
            }
            let changed = merged.geometry() != clip.geometry() || merged.name != clip.name;
            *clip = merged;
            changed
        }
        ProjectAction::RemoveClip(id) => {
            for track in &mut state.tracks {
                let before = track.clips.len();
                track.clips.retain(|c| c.id != *id);
                if track.clips.len() != before {
                    return true;
                }
            }
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::reduce::reduce;
    use crate::{
        AudioSource, Clip, ClipId, ClipPatch, DecodedAudio, ProjectAction, ProjectState, SourceId,
        Track, TrackColor, TrackId,
    };

    fn source() -> Arc<AudioSource> {
        Arc::new(AudioSource::new(
            SourceId::new(1),
            "pad.wav",
            DecodedAudio::silence(2, 100, 4.0),
        ))
    }

    fn one_clip_from(src: Arc<AudioSource>) -> ProjectState {
        let c = Clip::from_source(ClipId::new(1), TrackId::new(1), "pad.wav", src);
        let track = Track::new(TrackId::new(1), "pad", TrackColor::for_index(0)).with_clip(c);
        reduce(&ProjectState::new(), &ProjectAction::AddTrack(track))
    }

    fn one_clip() -> ProjectState {
        one_clip_from(source())
    }

    #[test]
    fn test_add_clip_to_existing_track() {
        let src = source();
        let state = one_clip_from(Arc::clone(&src));
        let mut c = Clip::from_source(ClipId::new(2), TrackId::new(1), "pad.wav", Arc::clone(&src));
        c.start_time = 6.0;
        let state = reduce(&state, &ProjectAction::AddClip(c));
        assert_eq!(state.tracks[0].clips.len(), 2);
        assert!(Arc::ptr_eq(
            &state.tracks[0].clips[0].source,
            &state.tracks[0].clips[1].source
        ));
    }

    #[test]
    fn test_add_clip_to_missing_track_ignored() {
        let state = one_clip();
        let c = Clip::from_source(ClipId::new(2), TrackId::new(7), "pad.wav", source());
        let state = reduce(&state, &ProjectAction::AddClip(c));
        assert_eq!(state.clips().count(), 1);
    }

    #[test]
    fn test_update_merges_supplied_fields() {
        let state = reduce(
            &one_clip(),
            &ProjectAction::UpdateClip {
                id: ClipId::new(1),
                patch: ClipPatch::start_time(3.0),
            },
        );
        let clip = state.clip(ClipId::new(1)).unwrap();
        assert_eq!(clip.start_time, 3.0);
        assert_eq!(clip.duration, 4.0);
    }

    #[test]
    fn test_update_violating_invariants_ignored() {
        let state = one_clip();
        for patch in [
            ClipPatch::duration(5.0),
            ClipPatch::duration(0.0),
            ClipPatch::start_time(-1.0),
            ClipPatch {
                offset: Some(-0.5),
                ..ClipPatch::default()
            },
        ] {
            let next = reduce(
                &state,
                &ProjectAction::UpdateClip {
                    id: ClipId::new(1),
                    patch,
                },
            );
            let clip = next.clip(ClipId::new(1)).unwrap();
            assert_eq!(clip.geometry(), state.clip(ClipId::new(1)).unwrap().geometry());
        }
    }

    #[test]
    fn test_remove_clip_and_unknown_id() {
        let state = reduce(&one_clip(), &ProjectAction::RemoveClip(ClipId::new(9)));
        assert_eq!(state.clips().count(), 1);
        let state = reduce(&state, &ProjectAction::RemoveClip(ClipId::new(1)));
        assert_eq!(state.clips().count(), 0);
        assert_eq!(state.tracks.len(), 1);
    }
}
