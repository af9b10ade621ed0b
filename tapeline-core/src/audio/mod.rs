//! Real-time side: the host trait, the playback scheduler and its tick.

#[cfg(feature = "cpal")]
pub mod cpal_host;
pub mod host;
pub mod scheduler;
pub mod ticker;

#[cfg(feature = "cpal")]
pub use cpal_host::CpalHost;
pub use host::{AudioHost, HostError, HostOp, HostResult, NullHost, SegmentHandle, TestHost};
pub use scheduler::{
    plan_playback, ActiveSegment, MutePolicy, PlayInstruction, PlaybackScheduler, TickOutcome,
};
pub use ticker::{TickHandle, TickTask};
