//! Real-time playback scheduling.
//!
//! On play, every audible clip that has not yet ended is issued to the host as
//! one segment. A tick then advances the transport from the host clock until
//! the project duration is reached. Playback keeps `origin = now - current_time`
//! at start, so project time is always `host.current_time() - origin`.

use std::sync::Arc;

use tapeline_types::{AudioSource, Clip, ClipId, ProjectAction, ProjectState, TrackId};

use super::host::{AudioHost, HostResult, SegmentHandle};
use super::ticker::TickTask;

/// When a track's mute flag is read during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutePolicy {
    /// Mute is read when playback starts; changes apply on the next play.
    #[default]
    AtPlay,
    /// Muting stops the track's segments at once; unmuting schedules its
    /// remaining clips from the current position.
    Live,
}

/// One segment to hand to the host, relative to the play position.
#[derive(Debug, Clone)]
pub struct PlayInstruction {
    pub track_id: TrackId,
    pub clip_id: ClipId,
    pub source: Arc<AudioSource>,
    /// Seconds after the play moment the segment starts
    pub host_start_delay: f64,
    /// Start point within the source
    pub source_offset: f64,
    pub play_duration: f64,
}

/// Segments to issue when playing from project time `at`.
///
/// Clips on muted tracks and clips that end at or before `at` are skipped.
/// A clip already under the playhead starts immediately, partway in.
pub fn plan_playback(state: &ProjectState, at: f64) -> Vec<PlayInstruction> {
    state
        .tracks
        .iter()
        .filter(|t| !t.muted)
        .flat_map(|t| t.clips.iter())
        .filter_map(|clip| plan_clip(clip, at))
        .collect()
}

fn plan_clip(clip: &Clip, at: f64) -> Option<PlayInstruction> {
    if clip.end_time() <= at {
        return None;
    }
    let (delay, offset, duration) = if clip.start_time >= at {
        (clip.start_time - at, clip.offset, clip.duration)
    } else {
        let into = at - clip.start_time;
        (0.0, clip.offset + into, clip.duration - into)
    };
    Some(PlayInstruction {
        track_id: clip.track_id,
        clip_id: clip.id,
        source: Arc::clone(&clip.source),
        host_start_delay: delay,
        source_offset: offset,
        play_duration: duration,
    })
}

/// A segment handed to the host and not yet stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSegment {
    pub handle: SegmentHandle,
    pub track_id: TrackId,
    pub clip_id: ClipId,
}

/// Result of one tick.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// No tick was pending.
    Idle,
    /// Transport moved; carries the `SetTime` to apply.
    Advanced(ProjectAction),
    /// The project end was reached; playback stopped.
    Finished(Vec<ProjectAction>),
}

impl TickOutcome {
    pub fn into_actions(self) -> Vec<ProjectAction> {
        match self {
            TickOutcome::Idle => Vec::new(),
            TickOutcome::Advanced(action) => vec![action],
            TickOutcome::Finished(actions) => actions,
        }
    }
}

/// Owns the host-side playback session. Never touches project state itself;
/// every method returns the transitions the caller should apply.
pub struct PlaybackScheduler {
    origin: f64,
    active: Vec<ActiveSegment>,
    ticker: TickTask,
    mute_policy: MutePolicy,
}

impl PlaybackScheduler {
    pub fn new(ticker: TickTask, mute_policy: MutePolicy) -> Self {
        Self {
            origin: 0.0,
            active: Vec::new(),
            ticker,
            mute_policy,
        }
    }

    pub fn mute_policy(&self) -> MutePolicy {
        self.mute_policy
    }

    pub fn set_mute_policy(&mut self, policy: MutePolicy) {
        self.mute_policy = policy;
    }

    pub fn ticker(&self) -> &TickTask {
        &self.ticker
    }

    /// Whether a playback session is running (tick armed).
    pub fn is_running(&self) -> bool {
        self.ticker.is_active()
    }

    pub fn active_segments(&self) -> &[ActiveSegment] {
        &self.active
    }

    /// Project time according to the host clock.
    pub fn position<H: AudioHost>(&self, host: &H) -> f64 {
        host.current_time() - self.origin
    }

    /// Start playback from `state.current_time`. Anything still sounding from
    /// a previous session is stopped first.
    pub fn play<H: AudioHost>(
        &mut self,
        host: &mut H,
        state: &ProjectState,
    ) -> HostResult<Vec<ProjectAction>> {
        host.resume()?;
        self.stop_all(host);
        self.ticker.cancel();

        let now = host.current_time();
        self.origin = now - state.current_time;

        let plan = plan_playback(state, state.current_time);
        log::debug!(
            target: "scheduler",
            "play from {:.3}s: {} segment(s), origin {:.3}",
            state.current_time,
            plan.len(),
            self.origin
        );
        if let Err(e) = self.issue(host, now, plan) {
            self.stop_all(host);
            return Err(e);
        }

        self.ticker.arm();
        Ok(vec![ProjectAction::SetPlaying(true)])
    }

    /// Advance the transport. Stops everything once `duration` is reached.
    pub fn tick<H: AudioHost>(&mut self, host: &mut H, state: &ProjectState) -> TickOutcome {
        let Some(handle) = self.ticker.begin() else {
            return TickOutcome::Idle;
        };

        let elapsed = self.position(host);
        if elapsed >= state.duration {
            log::debug!(target: "scheduler", "reached project end at {:.3}s", state.duration);
            self.stop_all(host);
            self.ticker.cancel();
            return TickOutcome::Finished(vec![
                ProjectAction::SetPlaying(false),
                ProjectAction::SetTime(state.duration),
            ]);
        }

        self.ticker.rearm(handle);
        TickOutcome::Advanced(ProjectAction::SetTime(elapsed.max(0.0)))
    }

    /// Stop every segment and the tick. `current_time` stays where it is.
    pub fn pause<H: AudioHost>(&mut self, host: &mut H) -> Vec<ProjectAction> {
        self.stop_all(host);
        self.ticker.cancel();
        vec![ProjectAction::SetPlaying(false)]
    }

    /// React to a mute change that has already been applied to `state`.
    /// Does nothing unless playing under `MutePolicy::Live`.
    pub fn track_mute_changed<H: AudioHost>(
        &mut self,
        host: &mut H,
        state: &ProjectState,
        track_id: TrackId,
        muted: bool,
    ) -> HostResult {
        if self.mute_policy != MutePolicy::Live || !self.is_running() {
            return Ok(());
        }
        if muted {
            let (stopping, keep): (Vec<_>, Vec<_>) =
                self.active.drain(..).partition(|s| s.track_id == track_id);
            self.active = keep;
            for seg in stopping {
                stop_quietly(host, seg.handle);
            }
            return Ok(());
        }

        let now = host.current_time();
        let at = now - self.origin;
        let plan: Vec<_> = plan_playback(state, at)
            .into_iter()
            .filter(|i| i.track_id == track_id)
            .filter(|i| !self.active.iter().any(|s| s.clip_id == i.clip_id))
            .collect();
        log::debug!(target: "scheduler", "track {} unmuted at {:.3}s: {} segment(s)", track_id, at, plan.len());
        self.issue(host, now, plan)
    }

    fn issue<H: AudioHost>(
        &mut self,
        host: &mut H,
        now: f64,
        plan: Vec<PlayInstruction>,
    ) -> HostResult {
        for instr in plan {
            let handle = host.schedule_segment(
                &instr.source,
                now + instr.host_start_delay,
                instr.source_offset,
                instr.play_duration,
            )?;
            self.active.push(ActiveSegment {
                handle,
                track_id: instr.track_id,
                clip_id: instr.clip_id,
            });
        }
        Ok(())
    }

    fn stop_all<H: AudioHost>(&mut self, host: &mut H) {
        for seg in std::mem::take(&mut self.active) {
            stop_quietly(host, seg.handle);
        }
    }
}

fn stop_quietly<H: AudioHost>(host: &mut H, handle: SegmentHandle) {
    if let Err(e) = host.stop(handle) {
        log::debug!(target: "scheduler", "ignoring stop of {}: {}", handle, e);
    }
}
