//! Cancellable playback tick.
//!
//! The host application's refresh loop asks the task whether a tick is due
//! (`begin`), does the work, then either re-arms or lets it lapse. Cancelling
//! bumps the generation so a handle taken before the cancel can never re-arm.

use std::time::Duration;

/// Proof that a tick was armed or is running. Only the current generation is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickState {
    Idle,
    Pending(u64),
    Running(u64),
}

#[derive(Debug, Clone)]
pub struct TickTask {
    generation: u64,
    state: TickState,
    interval: Duration,
}

impl TickTask {
    pub fn new(interval: Duration) -> Self {
        Self {
            generation: 0,
            state: TickState::Idle,
            interval,
        }
    }

    /// How often the refresh loop should call in.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm a fresh tick, superseding any pending or running one.
    pub fn arm(&mut self) -> TickHandle {
        self.generation += 1;
        self.state = TickState::Pending(self.generation);
        TickHandle {
            generation: self.generation,
        }
    }

    /// Drop any pending tick. A running tick can no longer re-arm.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.state = TickState::Idle;
    }

    /// Take the pending tick, if any, and mark it running.
    pub fn begin(&mut self) -> Option<TickHandle> {
        match self.state {
            TickState::Pending(generation) => {
                self.state = TickState::Running(generation);
                Some(TickHandle { generation })
            }
            TickState::Idle | TickState::Running(_) => None,
        }
    }

    /// Schedule the next tick from inside a running one. Returns false if the
    /// handle is stale (cancelled or superseded while running).
    pub fn rearm(&mut self, handle: TickHandle) -> bool {
        match self.state {
            TickState::Running(generation) if generation == handle.generation => {
                self.state = TickState::Pending(generation);
                true
            }
            _ => false,
        }
    }

    /// Whether a tick is pending or running.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, TickState::Idle)
    }
}
