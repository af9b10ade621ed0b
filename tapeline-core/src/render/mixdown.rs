use tapeline_types::{Clip, ProjectState};

/// Output rate for every export.
pub const RENDER_SAMPLE_RATE: u32 = 44_100;

/// Two planar channels of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoBuffer {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: u32,
}

impl StereoBuffer {
    pub fn silent(frames: usize, sample_rate: u32) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
            sample_rate,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.left.len()
    }
}

/// Frames in a render of the whole project.
pub fn project_frames(state: &ProjectState, rate: u32) -> usize {
    (state.duration * rate as f64).floor().max(0.0) as usize
}

/// Sum every unmuted clip into a stereo buffer covering `[0, duration)`.
/// Anything past the project end is cut off.
pub fn render_stereo(state: &ProjectState, rate: u32) -> StereoBuffer {
    let mut out = StereoBuffer::silent(project_frames(state, rate), rate);
    for clip in state.unmuted_clips() {
        mix_clip(&mut out, clip);
    }
    out
}

fn mix_clip(out: &mut StereoBuffer, clip: &Clip) {
    let source = &clip.source;
    let channels = source.channel_count();
    if channels == 0 || out.sample_rate == 0 {
        return;
    }
    let rate = out.sample_rate as u64;
    let src_rate = source.sample_rate() as u64;

    let start = (clip.start_time * rate as f64).round() as usize;
    let clip_frames = (clip.duration * rate as f64).round() as usize;
    let src_start = (clip.offset * src_rate as f64).round() as u64;
    let src_end = (((clip.offset + clip.duration) * src_rate as f64).round() as u64)
        .min(source.frame_count() as u64);

    let frames = out.frame_count();
    for k in 0..clip_frames {
        let dst = start + k;
        if dst >= frames {
            break;
        }
        let src = src_start + k as u64 * src_rate / rate;
        if src >= src_end {
            break;
        }
        let src = src as usize;
        let left = source.sample(0, src);
        let right = if channels > 1 { source.sample(1, src) } else { left };
        out.left[dst] += left;
        out.right[dst] += right;
    }
}

/// Fold stereo to mono as the average of both channels.
pub fn downmix_mono(left: &[f32], right: &[f32]) -> Vec<f32> {
    left.iter().zip(right).map(|(l, r)| (l + r) / 2.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tapeline_types::{
        AudioSource, ClipId, DecodedAudio, ProjectAction, SourceId, Track, TrackColor, TrackId,
    };

    fn source(channels: Vec<Vec<f32>>, rate: u32) -> Arc<AudioSource> {
        Arc::new(AudioSource::new(
            SourceId::new(1),
            "s.wav",
            DecodedAudio::from_planar(channels, rate),
        ))
    }

    fn project_with(duration: f64, clip: Clip) -> ProjectState {
        let mut state = ProjectState::with_settings(duration, 50.0);
        let track = Track::new(clip.track_id, "s", TrackColor::for_index(0)).with_clip(clip);
        tapeline_types::reduce::reduce_in_place(&mut state, &ProjectAction::AddTrack(track));
        state
    }

    #[test]
    fn test_length_is_floor_of_duration() {
        let state = ProjectState::with_settings(1.5, 50.0);
        let buf = render_stereo(&state, 10);
        assert_eq!(buf.frame_count(), 15);
        let state = ProjectState::with_settings(0.99, 50.0);
        assert_eq!(render_stereo(&state, 10).frame_count(), 9);
    }

    #[test]
    fn test_clip_lands_at_start_and_respects_offset() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let mut clip = Clip::from_source(ClipId::new(1), TrackId::new(1), "s.wav", source(vec![samples], 10));
        clip.start_time = 0.2;
        clip.offset = 0.3;
        clip.duration = 0.4;
        let buf = render_stereo(&project_with(1.0, clip), 10);
        assert_eq!(buf.left, vec![0.0, 0.0, 3.0, 4.0, 5.0, 6.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(buf.left, buf.right);
    }

    #[test]
    fn test_stereo_source_keeps_channels() {
        let clip = Clip::from_source(
            ClipId::new(1),
            TrackId::new(1),
            "s.wav",
            source(vec![vec![1.0; 4], vec![-1.0; 4], vec![9.0; 4]], 4),
        );
        let buf = render_stereo(&project_with(1.0, clip), 4);
        assert_eq!(buf.left, vec![1.0; 4]);
        assert_eq!(buf.right, vec![-1.0; 4]);
        assert_eq!(downmix_mono(&buf.left, &buf.right), vec![0.0; 4]);
    }

    #[test]
    fn test_source_rate_addressed_by_time() {
        // 20 Hz source rendered at 10 Hz picks every other frame.
        let samples: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let clip = Clip::from_source(ClipId::new(1), TrackId::new(1), "s.wav", source(vec![samples], 20));
        let buf = render_stereo(&project_with(1.0, clip), 10);
        assert_eq!(buf.left, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0]);
    }

    #[test]
    fn test_clip_past_end_is_truncated_and_muted_skipped() {
        let mut clip = Clip::from_source(ClipId::new(1), TrackId::new(1), "s.wav", source(vec![vec![0.5; 10]], 10));
        clip.start_time = 0.8;
        let mut state = project_with(1.0, clip);
        let buf = render_stereo(&state, 10);
        assert_eq!(&buf.left[7..], &[0.0, 0.5, 0.5]);

        state.tracks[0].muted = true;
        assert!(render_stereo(&state, 10).left.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_overlapping_clips_sum() {
        let a = Clip::from_source(ClipId::new(1), TrackId::new(1), "s.wav", source(vec![vec![0.25; 10]], 10));
        let mut state = project_with(1.0, a);
        let b = Clip::from_source(ClipId::new(2), TrackId::new(1), "s.wav", source(vec![vec![0.5; 10]], 10));
        tapeline_types::reduce::reduce_in_place(&mut state, &ProjectAction::AddClip(b));
        let buf = render_stereo(&state, 10);
        assert!(buf.left.iter().all(|s| *s == 0.75));
    }
}
