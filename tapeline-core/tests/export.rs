mod common;

use std::thread;

use tapeline_core::render::{ExportError, WavInfo, WAV_HEADER_LEN};
use tapeline_types::ProjectAction;

#[test]
fn test_one_second_of_muted_and_silent_audio_is_all_zero() {
    let (mut studio, _) = common::studio();
    let loud = common::import(&mut studio, "loud.wav", &common::dc_wav(20_000, 1.0, 44_100));
    common::import(&mut studio, "quiet.wav", &common::silent_wav(1.0, 44_100));
    studio.dispatch(ProjectAction::SetTrackMuted { id: loud, muted: true });
    assert!(studio.set_duration_from_input("1"));

    let bytes = studio.export_mix().unwrap();
    assert_eq!(bytes.len(), WAV_HEADER_LEN + 88_200);
    assert!(bytes[WAV_HEADER_LEN..].iter().all(|b| *b == 0));
}

#[test]
fn test_export_round_trips_format() {
    let (mut studio, _) = common::studio();
    common::import(&mut studio, "a.wav", &common::dc_wav(8192, 0.5, 22_050));
    assert!(studio.set_duration_from_input("2.5"));
    let bytes = studio.export_mix().unwrap();
    let info = WavInfo::parse(&bytes).unwrap();
    assert_eq!(info.sample_rate, 44_100);
    assert_eq!(info.channels, 1);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.frames, 110_250);
    assert_eq!(info.data_bytes() as usize, bytes.len() - WAV_HEADER_LEN);
}

#[test]
fn test_mono_clip_survives_fold_down_at_level() {
    let (mut studio, _) = common::studio();
    common::import(&mut studio, "a.wav", &common::dc_wav(16_384, 1.0, 44_100));
    assert!(studio.set_duration_from_input("1"));
    let bytes = studio.export_mix().unwrap();
    let first = i16::from_le_bytes([bytes[WAV_HEADER_LEN], bytes[WAV_HEADER_LEN + 1]]);
    // 0.5 scaled by 32767 and truncated.
    assert_eq!(first, 16_383);
}

#[test]
fn test_export_to_path_writes_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mix.wav");
    let (mut studio, _) = common::studio();
    common::import(&mut studio, "a.wav", &common::silent_wav(0.2, 8000));
    assert!(studio.set_duration_from_input("0.5"));

    let written = studio.export_to_path(&path).unwrap();
    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk.len(), written);
    assert_eq!(on_disk, studio.export_mix().unwrap());
    // Only the target remains; the temp file was renamed into place.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_concurrent_export_is_rejected() {
    let (mut studio, _) = common::studio();
    common::import(&mut studio, "a.wav", &common::silent_wav(0.1, 8000));
    let exporter = studio.exporter();
    let slot = exporter.begin().unwrap();

    let snapshot = studio.snapshot();
    let other = studio.exporter();
    let result = thread::spawn(move || other.export_mix(&snapshot)).join().unwrap();
    assert!(matches!(result, Err(ExportError::Busy)));
    assert!(matches!(studio.export_mix(), Err(ExportError::Busy)));

    drop(slot);
    assert!(studio.export_mix().is_ok());
}

#[test]
fn test_export_from_snapshot_ignores_later_edits() {
    let (mut studio, _) = common::studio();
    let track = common::import(&mut studio, "a.wav", &common::dc_wav(10_000, 0.1, 44_100));
    assert!(studio.set_duration_from_input("0.1"));
    let snapshot = studio.snapshot();
    studio.dispatch(ProjectAction::DeleteTrack(track));

    let exporter = studio.exporter();
    let from_snapshot = exporter.export_mix(&snapshot).unwrap();
    let current = studio.export_mix().unwrap();
    assert_ne!(from_snapshot, current);
    assert!(current[WAV_HEADER_LEN..].iter().all(|b| *b == 0));
}
