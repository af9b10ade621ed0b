mod common;

use tapeline_core::import::{DecodeError, Decoder, WavDecoder};
use tapeline_types::geometry::GestureKind;
use tapeline_types::{ClipPatch, DecodedAudio, ProjectAction, TrackColor};

/// Decoder that reports a fixed duration regardless of its frames.
struct FixedDurationDecoder(f64);

impl Decoder for FixedDurationDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
        Ok(DecodedAudio {
            channels: vec![vec![0.0; 10]],
            sample_rate: 10,
            total_duration: self.0,
        })
    }
}

#[test]
fn test_import_creates_track_with_full_clip() {
    let (mut studio, _) = common::studio();
    let id = common::import(&mut studio, "bass line.wav", &common::silent_wav(2.0, 8000));

    let track = studio.state().track(id).unwrap();
    assert_eq!(track.name, "bass line");
    assert_eq!(track.color, TrackColor(0xFF66D4));
    assert!(!track.muted);
    assert_eq!(track.clips.len(), 1);

    let clip = &track.clips[0];
    assert_eq!(clip.name, "bass line.wav");
    assert_eq!(clip.start_time, 0.0);
    assert_eq!(clip.offset, 0.0);
    assert_eq!(clip.duration, 2.0);
    assert_eq!(clip.total_duration, 2.0);
}

#[test]
fn test_track_colours_rotate_by_creation_order() {
    let (mut studio, _) = common::studio();
    let wav = common::silent_wav(0.1, 8000);
    let ids: Vec<_> = (0..9)
        .map(|i| common::import(&mut studio, &format!("t{i}.wav"), &wav))
        .collect();
    // Deleting a track does not recycle its colour slot.
    studio.dispatch(ProjectAction::DeleteTrack(ids[0]));
    let tenth = common::import(&mut studio, "t9.wav", &wav);

    let state = studio.state();
    assert_eq!(state.track(ids[1]).unwrap().color, TrackColor(0x52D0FF));
    assert_eq!(state.track(ids[8]).unwrap().color, TrackColor(0xFF66D4));
    assert_eq!(state.track(tenth).unwrap().color, TrackColor(0x52D0FF));
}

#[test]
fn test_failed_decode_leaves_state_untouched() {
    let (mut studio, _) = common::studio();
    common::import(&mut studio, "a.wav", &common::silent_wav(1.0, 8000));
    let before = studio.snapshot();

    let err = studio.import("broken.wav", b"definitely not audio", &WavDecoder);
    assert!(matches!(err, Err(DecodeError::Wav(_))));
    let err = studio.import("empty.wav", &common::wav_mono(&[], 8000), &WavDecoder);
    assert!(matches!(err, Err(DecodeError::Empty)));

    assert!(std::sync::Arc::ptr_eq(&before, &studio.snapshot()));
}

#[test]
fn test_import_with_bad_duration_is_an_error() {
    let (mut studio, _) = common::studio();
    let before = studio.snapshot();

    for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = studio.import("odd.wav", b"", &FixedDurationDecoder(duration));
        assert!(matches!(err, Err(DecodeError::Unsupported(_))), "duration {duration}");
    }
    assert!(studio.state().tracks.is_empty());
    assert!(std::sync::Arc::ptr_eq(&before, &studio.snapshot()));

    let id = studio.import("ok.wav", b"", &FixedDurationDecoder(1.0)).unwrap();
    assert!(studio.state().track(id).is_some());
}

#[test]
fn test_snapshot_is_not_affected_by_later_edits() {
    let (mut studio, _) = common::studio();
    let snap = studio.snapshot();
    common::import(&mut studio, "a.wav", &common::silent_wav(1.0, 8000));
    assert!(snap.tracks.is_empty());
    assert_eq!(studio.state().tracks.len(), 1);
}

#[test]
fn test_gestures_commit_valid_geometry() {
    let (mut studio, _) = common::studio();
    let id = common::import(&mut studio, "a.wav", &common::silent_wav(4.0, 8000));
    let clip_id = studio.state().track(id).unwrap().clips[0].id;

    // Trim 1 s off the front at 50 px/s.
    let g = studio.begin_gesture(GestureKind::ResizeLeft, clip_id).unwrap();
    assert!(studio.finish_gesture(g, 50.0));
    let clip = studio.state().clip(clip_id).unwrap();
    assert_eq!((clip.start_time, clip.offset, clip.duration), (1.0, 1.0, 3.0));

    // Stretch the right edge far past the source end.
    let g = studio.begin_gesture(GestureKind::ResizeRight, clip_id).unwrap();
    assert!(!studio.finish_gesture(g, 5000.0));
    assert_eq!(studio.state().clip(clip_id).unwrap().duration, 3.0);

    // Drag the body well before zero.
    let g = studio.begin_gesture(GestureKind::Move, clip_id).unwrap();
    assert!(studio.finish_gesture(g, -10_000.0));
    let clip = studio.state().clip(clip_id).unwrap();
    assert_eq!(clip.start_time, 0.0);

    // Pull the left edge out again: offset bottoms out at zero, start stays at zero.
    let g = studio.begin_gesture(GestureKind::ResizeLeft, clip_id).unwrap();
    studio.finish_gesture(g, -10_000.0);
    let clip = studio.state().clip(clip_id).unwrap();
    assert!(clip.satisfies_invariants());
    assert_eq!(clip.start_time, 0.0);
    assert_eq!(clip.offset, 1.0);

    // A tap commits nothing.
    let g = studio.begin_gesture(GestureKind::Move, clip_id).unwrap();
    assert!(!studio.finish_gesture(g, 0.0));
}

#[test]
fn test_unclamped_update_is_ignored() {
    let (mut studio, _) = common::studio();
    let id = common::import(&mut studio, "a.wav", &common::silent_wav(2.0, 8000));
    let clip_id = studio.state().track(id).unwrap().clips[0].id;
    assert!(!studio.dispatch(ProjectAction::UpdateClip {
        id: clip_id,
        patch: ClipPatch::duration(3.0),
    }));
    assert_eq!(studio.state().clip(clip_id).unwrap().duration, 2.0);
}

#[test]
fn test_duration_input_must_be_a_positive_number() {
    let (mut studio, _) = common::studio();
    assert!(!studio.set_duration_from_input("abc"));
    assert!(!studio.set_duration_from_input("-3"));
    assert!(!studio.set_duration_from_input(""));
    assert_eq!(studio.state().duration, 60.0);
    assert!(studio.set_duration_from_input(" 90.5 "));
    assert_eq!(studio.state().duration, 90.5);
}

#[test]
fn test_zoom_steps_are_clamped() {
    let (mut studio, _) = common::studio();
    studio.zoom_in();
    assert_eq!(studio.state().zoom, 75.0);
    for _ in 0..20 {
        studio.zoom_out();
    }
    assert_eq!(studio.state().zoom, 10.0);
    for _ in 0..20 {
        studio.zoom_in();
    }
    assert_eq!(studio.state().zoom, 500.0);
}
