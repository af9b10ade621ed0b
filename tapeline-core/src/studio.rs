//! The editing session: owns the project, the host, and the playback scheduler.
//!
//! Every change to the project goes through [`Studio::dispatch`], which runs
//! the pure reducer and swaps the result in whole. Readers holding a
//! [`Studio::snapshot`] keep a consistent view while editing continues.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tapeline_types::geometry::{self, ClipGesture, GestureKind, GestureOutcome};
use tapeline_types::reduce::reduce_in_place;
use tapeline_types::{
    track_name_from_file, AudioSource, Clip, ClipId, IdAllocator, ProjectAction, ProjectState,
    Track, TrackColor, TrackId,
};

use crate::audio::{AudioHost, HostError, PlaybackScheduler, TickOutcome, TickTask};
use crate::config::Config;
use crate::import::{DecodeError, Decoder};
use crate::render::{ExportError, Exporter};

#[derive(Debug)]
pub enum StudioError {
    Host(HostError),
}

impl fmt::Display for StudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudioError::Host(e) => write!(f, "audio host error: {}", e),
        }
    }
}

impl std::error::Error for StudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StudioError::Host(e) => Some(e),
        }
    }
}

impl From<HostError> for StudioError {
    fn from(e: HostError) -> Self {
        StudioError::Host(e)
    }
}

pub struct Studio<H: AudioHost> {
    state: Arc<ProjectState>,
    ids: IdAllocator,
    host: H,
    scheduler: PlaybackScheduler,
    exporter: Exporter,
    min_clip_width_px: f64,
}

impl<H: AudioHost> Studio<H> {
    /// Empty project with settings from `config`.
    pub fn new(host: H, config: &Config) -> Self {
        let state = ProjectState::with_settings(config.duration_secs(), config.zoom());
        Self {
            state: Arc::new(state),
            ids: IdAllocator::new(),
            host,
            scheduler: PlaybackScheduler::new(
                TickTask::new(config.tick_interval()),
                config.mute_policy(),
            ),
            exporter: Exporter::new(),
            min_clip_width_px: config.min_clip_width_px(),
        }
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    /// Shared handle to the current state; later edits do not affect it.
    pub fn snapshot(&self) -> Arc<ProjectState> {
        Arc::clone(&self.state)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    /// A handle for exporting from another thread. Shares the in-flight flag.
    pub fn exporter(&self) -> Exporter {
        self.exporter.clone()
    }

    pub fn min_clip_width_px(&self) -> f64 {
        self.min_clip_width_px
    }

    /// Apply a transition. Returns whether the project changed.
    pub fn dispatch(&mut self, action: ProjectAction) -> bool {
        let changed = self.apply(&action);
        if let ProjectAction::SetTrackMuted { id, muted } = action {
            if changed {
                if let Err(e) =
                    self.scheduler
                        .track_mute_changed(&mut self.host, &self.state, id, muted)
                {
                    log::warn!(target: "studio", "live mute of track {} failed: {}", id, e);
                }
            }
        }
        changed
    }

    fn apply(&mut self, action: &ProjectAction) -> bool {
        let mut next = ProjectState::clone(&self.state);
        let changed = reduce_in_place(&mut next, action);
        if !action.is_transport() {
            if changed {
                log::debug!(target: "studio", "{}", action.name());
            } else {
                log::debug!(target: "studio", "{} ignored", action.name());
            }
        }
        if changed {
            self.state = Arc::new(next);
        }
        changed
    }

    fn apply_all(&mut self, actions: Vec<ProjectAction>) {
        for action in actions {
            self.apply(&action);
        }
    }

    /// Resume the output device. Call from the first user gesture.
    pub fn unlock_audio(&mut self) -> Result<(), StudioError> {
        self.host.resume()?;
        Ok(())
    }

    /// Start playback from the current position.
    pub fn play(&mut self) -> Result<(), StudioError> {
        match self.scheduler.play(&mut self.host, &self.state) {
            Ok(actions) => {
                self.apply_all(actions);
                log::info!(target: "studio", "playing from {:.3}s", self.state.current_time);
                Ok(())
            }
            Err(e) => {
                log::warn!(target: "studio", "play failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn pause(&mut self) {
        let actions = self.scheduler.pause(&mut self.host);
        self.apply_all(actions);
    }

    /// Move the playhead. Playback is stopped and not resumed.
    pub fn seek(&mut self, t: f64) {
        if self.state.is_playing || self.scheduler.is_running() {
            self.pause();
        }
        self.apply(&ProjectAction::SetTime(t));
    }

    /// Advance the transport from the host clock. Call from the refresh loop.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.scheduler.tick(&mut self.host, &self.state);
        if let TickOutcome::Finished(_) = outcome {
            log::info!(target: "studio", "playback reached project end");
        }
        self.apply_all(outcome.clone().into_actions());
        outcome
    }

    /// Decode `bytes` and add it as a new track holding one clip.
    /// On failure nothing changes.
    pub fn import(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        decoder: &dyn Decoder,
    ) -> Result<TrackId, DecodeError> {
        let audio = match decoder.decode(bytes) {
            Ok(audio) if audio.frame_count() == 0 => Err(DecodeError::Empty),
            Ok(audio) if !(audio.total_duration.is_finite() && audio.total_duration > 0.0) => {
                Err(DecodeError::Unsupported(format!(
                    "inconsistent duration {}",
                    audio.total_duration
                )))
            }
            other => other,
        }
        .map_err(|e| {
            log::warn!(target: "import", "could not import {}: {}", file_name, e);
            e
        })?;

        let color = TrackColor::for_index(self.ids.tracks_created());
        let track_id = self.ids.track();
        let clip_id = self.ids.clip();
        let source = Arc::new(AudioSource::new(self.ids.source(), file_name, audio));
        log::info!(
            target: "import",
            "{}: {:.3}s, {} ch @ {} Hz",
            file_name,
            source.duration(),
            source.channel_count(),
            source.sample_rate()
        );

        let clip = Clip::from_source(clip_id, track_id, file_name, source);
        let track = Track::new(track_id, track_name_from_file(file_name), color).with_clip(clip);
        if !self.apply(&ProjectAction::AddTrack(track)) {
            log::warn!(target: "import", "could not import {}: clip rejected", file_name);
            return Err(DecodeError::Unsupported("clip geometry rejected".into()));
        }
        Ok(track_id)
    }

    /// Set the project duration from free text. Returns false (and dispatches
    /// nothing) unless the text is a positive number.
    pub fn set_duration_from_input(&mut self, input: &str) -> bool {
        match input.trim().parse::<f64>() {
            Ok(d) if d.is_finite() && d > 0.0 => {
                self.apply(&ProjectAction::SetDuration(d));
                true
            }
            _ => {
                log::debug!(target: "studio", "ignoring duration input {:?}", input);
                false
            }
        }
    }

    pub fn zoom_in(&mut self) {
        let zoom = geometry::zoom_in(self.state.zoom);
        self.apply(&ProjectAction::SetZoom(zoom));
    }

    pub fn zoom_out(&mut self) {
        let zoom = geometry::zoom_out(self.state.zoom);
        self.apply(&ProjectAction::SetZoom(zoom));
    }

    /// Start a drag on a clip at the current zoom.
    pub fn begin_gesture(&self, kind: GestureKind, clip_id: ClipId) -> Option<ClipGesture> {
        let clip = self.state.clip(clip_id)?;
        Some(ClipGesture::begin(kind, clip, self.state.zoom, self.min_clip_width_px))
    }

    /// End a drag. Returns true if a geometry change was committed.
    pub fn finish_gesture(&mut self, gesture: ClipGesture, delta_px: f64) -> bool {
        match gesture.finish(delta_px) {
            GestureOutcome::Tap => false,
            GestureOutcome::Commit(action) => self.apply(&action),
        }
    }

    pub fn export_mix(&self) -> Result<Vec<u8>, ExportError> {
        self.exporter.export_mix(&self.state)
    }

    pub fn export_to_path(&self, path: &Path) -> Result<usize, ExportError> {
        self.exporter.export_to_path(&self.state, path)
    }
}
