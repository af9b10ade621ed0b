//! Host audio trait: the playback device as the scheduler sees it.
//!
//! `AudioHost` captures what the scheduler *means* to do (play this stretch of
//! a source at that host time, stop it, read the clock) independently of the
//! device behind it. This keeps the scheduler testable without sound hardware.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tapeline_types::{AudioSource, SourceId};

/// Result type for host operations.
pub type HostResult<T = ()> = Result<T, HostError>;

/// Error from a host operation.
#[derive(Debug, Clone)]
pub struct HostError(pub String);

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for HostError {}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError(s)
    }
}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError(s.to_string())
    }
}

/// Opaque handle to one scheduled segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentHandle(pub u64);

impl fmt::Display for SegmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg#{}", self.0)
    }
}

/// The real-time output the scheduler drives. Times are host seconds on a
/// monotonic clock that starts at an arbitrary origin.
pub trait AudioHost {
    /// Play `play_duration` seconds of `source` starting `source_offset` seconds
    /// in, beginning at host time `host_start`. A start in the past plays at once.
    fn schedule_segment(
        &mut self,
        source: &Arc<AudioSource>,
        host_start: f64,
        source_offset: f64,
        play_duration: f64,
    ) -> HostResult<SegmentHandle>;

    /// Stop a segment immediately. Stopping a segment that already ended may fail.
    fn stop(&mut self, handle: SegmentHandle) -> HostResult;

    /// Host clock in seconds.
    fn current_time(&self) -> f64;

    /// Resume a suspended output. Output devices may start suspended until a
    /// user gesture; this is the unlock.
    fn resume(&mut self) -> HostResult;
}

// ─── Test Host ──────────────────────────────────────────────────────

/// An operation recorded by `TestHost` for assertion in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    Resume,
    Schedule {
        handle: SegmentHandle,
        source: SourceId,
        host_start: f64,
        source_offset: f64,
        play_duration: f64,
    },
    Stop(SegmentHandle),
}

#[derive(Debug, Clone)]
struct TestSegment {
    handle: SegmentHandle,
    host_end: f64,
    stopped: bool,
}

#[derive(Default)]
struct TestHostInner {
    ops: Vec<HostOp>,
    clock: f64,
    next_handle: u64,
    segments: Vec<TestSegment>,
    resumed: bool,
    fail_schedule_at: Option<usize>,
    schedules_seen: usize,
}

/// A host with a hand-advanced clock that records every operation.
///
/// Clones share the same log and clock, so a test can hand one clone to a
/// `Studio` and keep another for assertions.
#[derive(Clone, Default)]
pub struct TestHost {
    inner: Arc<Mutex<TestHostInner>>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TestHostInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: f64) {
        self.lock().clock += secs;
    }

    pub fn set_time(&self, secs: f64) {
        self.lock().clock = secs;
    }

    /// Make the `n`th schedule call (0-based, counted from now) fail.
    pub fn fail_schedule_at(&self, n: usize) {
        let mut inner = self.lock();
        inner.fail_schedule_at = Some(inner.schedules_seen + n);
    }

    pub fn is_resumed(&self) -> bool {
        self.lock().resumed
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<HostOp> {
        self.lock().ops.clone()
    }

    /// Clear recorded operations.
    pub fn clear(&self) {
        self.lock().ops.clear();
    }

    /// Count operations matching a predicate.
    pub fn count<F: Fn(&HostOp) -> bool>(&self, f: F) -> usize {
        self.lock().ops.iter().filter(|op| f(op)).count()
    }

    /// Return all Schedule operations.
    pub fn scheduled(&self) -> Vec<HostOp> {
        self.lock()
            .ops
            .iter()
            .filter(|op| matches!(op, HostOp::Schedule { .. }))
            .cloned()
            .collect()
    }

    /// Return every handle passed to `stop`.
    pub fn stopped(&self) -> Vec<SegmentHandle> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                HostOp::Stop(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    /// Segments neither stopped nor played out at the current clock.
    pub fn sounding(&self) -> Vec<SegmentHandle> {
        let inner = self.lock();
        inner
            .segments
            .iter()
            .filter(|s| !s.stopped && s.host_end > inner.clock)
            .map(|s| s.handle)
            .collect()
    }
}

impl AudioHost for TestHost {
    fn schedule_segment(
        &mut self,
        source: &Arc<AudioSource>,
        host_start: f64,
        source_offset: f64,
        play_duration: f64,
    ) -> HostResult<SegmentHandle> {
        let mut inner = self.lock();
        let seen = inner.schedules_seen;
        inner.schedules_seen += 1;
        if inner.fail_schedule_at == Some(seen) {
            inner.fail_schedule_at = None;
            return Err(HostError(format!("schedule of source {} rejected", source.id)));
        }
        inner.next_handle += 1;
        let handle = SegmentHandle(inner.next_handle);
        let start = host_start.max(inner.clock);
        inner.segments.push(TestSegment {
            handle,
            host_end: start + play_duration,
            stopped: false,
        });
        inner.ops.push(HostOp::Schedule {
            handle,
            source: source.id,
            host_start,
            source_offset,
            play_duration,
        });
        Ok(handle)
    }

    fn stop(&mut self, handle: SegmentHandle) -> HostResult {
        let mut inner = self.lock();
        inner.ops.push(HostOp::Stop(handle));
        let clock = inner.clock;
        match inner.segments.iter_mut().find(|s| s.handle == handle) {
            Some(seg) if !seg.stopped && seg.host_end > clock => {
                seg.stopped = true;
                Ok(())
            }
            Some(_) => Err(HostError(format!("{} already finished", handle))),
            None => Err(HostError(format!("unknown segment {}", handle))),
        }
    }

    fn current_time(&self) -> f64 {
        self.lock().clock
    }

    fn resume(&mut self) -> HostResult {
        let mut inner = self.lock();
        inner.resumed = true;
        inner.ops.push(HostOp::Resume);
        Ok(())
    }
}

// ─── NullHost ───────────────────────────────────────────────────────

/// A host that follows the wall clock and discards audio. Lets the transport
/// run headless when no output device is available.
pub struct NullHost {
    epoch: Instant,
    next_handle: u64,
}

impl Default for NullHost {
    fn default() -> Self {
        Self::new()
    }
}

impl NullHost {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            next_handle: 0,
        }
    }
}

impl AudioHost for NullHost {
    fn schedule_segment(&mut self, _: &Arc<AudioSource>, _: f64, _: f64, _: f64) -> HostResult<SegmentHandle> {
        self.next_handle += 1;
        Ok(SegmentHandle(self.next_handle))
    }
    fn stop(&mut self, _: SegmentHandle) -> HostResult { Ok(()) }
    fn current_time(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
    fn resume(&mut self) -> HostResult { Ok(()) }
}
