//! Clip trim/move arithmetic and timeline pixel mapping.
//!
//! All gesture input arrives as a horizontal pixel delta measured from where
//! the gesture started. Everything here is plain arithmetic on numbers; no
//! state is touched until a [`GestureOutcome::Commit`] is dispatched.

use crate::action::ProjectAction;
use crate::state::{Clip, ClipPatch, DURATION_EPSILON};
use crate::ClipId;

/// Narrowest a clip may be dragged to, in pixels.
pub const DEFAULT_MIN_CLIP_WIDTH_PX: f64 = 10.0;

/// Pointer travel (pixels) below which a body drag counts as a tap.
pub const TAP_THRESHOLD_PX: f64 = 3.0;

pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 500.0;
pub const ZOOM_STEP: f64 = 1.5;

/// Scrollable padding past the project end, in pixels.
pub const TIMELINE_TAIL_PX: f64 = 100.0;

/// The four numbers that place a clip on the timeline and inside its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipGeometry {
    pub start_time: f64,
    pub offset: f64,
    pub duration: f64,
    pub total_duration: f64,
}

impl ClipGeometry {
    /// `start ≥ 0`, `offset ≥ 0`, `duration > 0` and the window stays inside the source.
    pub fn is_valid(&self) -> bool {
        let finite = self.start_time.is_finite()
            && self.offset.is_finite()
            && self.duration.is_finite()
            && self.total_duration.is_finite();
        finite
            && self.start_time >= 0.0
            && self.offset >= 0.0
            && self.duration > 0.0
            && self.offset + self.duration <= self.total_duration + DURATION_EPSILON
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Body drag: shift on the timeline, never before zero.
    pub fn moved(&self, delta_px: f64, zoom: f64) -> ClipGeometry {
        ClipGeometry {
            start_time: (self.start_time + delta_px / zoom).max(0.0),
            ..*self
        }
    }

    /// Live width of a right-edge drag. Not capped by the source; the cap is
    /// applied on commit and the displayed width snaps back.
    pub fn right_edge_width(&self, delta_px: f64, zoom: f64, min_px: f64) -> f64 {
        (self.duration * zoom + delta_px).max(min_px)
    }

    /// Right-edge trim: changes only `duration`.
    pub fn resized_right(&self, delta_px: f64, zoom: f64, min_px: f64) -> ClipGeometry {
        let width = self.right_edge_width(delta_px, zoom, min_px);
        let available = self.total_duration - self.offset;
        ClipGeometry {
            duration: (width / zoom).min(available),
            ..*self
        }
    }

    /// Clamp a left-edge delta. The upper bound keeps the clip at least
    /// `min_px` wide; the lower bounds stop `offset` and `start_time` going
    /// negative. The lower bound wins when they conflict.
    pub fn clamp_left_delta(&self, delta_px: f64, zoom: f64, min_px: f64) -> f64 {
        let width = self.duration * zoom;
        let upper = width - min_px;
        let lower = (-self.offset * zoom).max(-self.start_time * zoom);
        delta_px.min(upper).max(lower)
    }

    /// Left-edge trim: start, offset and duration all move by the same
    /// clamped amount, so the clip's end stays put in both timeline and source.
    pub fn resized_left(&self, delta_px: f64, zoom: f64, min_px: f64) -> ClipGeometry {
        let dt = self.clamp_left_delta(delta_px, zoom, min_px) / zoom;
        ClipGeometry {
            start_time: self.start_time + dt,
            offset: self.offset + dt,
            duration: self.duration - dt,
            total_duration: self.total_duration,
        }
    }
}

/// Which part of the clip the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    ResizeLeft,
    ResizeRight,
}

/// What the UI should draw mid-gesture, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveGeometry {
    pub left_px: f64,
    pub width_px: f64,
}

#[derive(Debug, Clone)]
pub enum GestureOutcome {
    /// No movement: the UI toggles selection, nothing is dispatched.
    Tap,
    /// Exactly one `UpdateClip`.
    Commit(ProjectAction),
}

/// A drag in progress on one clip. Holds the geometry captured when the
/// pointer went down; `preview` and `finish` take the total delta since then.
#[derive(Debug, Clone)]
pub struct ClipGesture {
    kind: GestureKind,
    clip_id: ClipId,
    origin: ClipGeometry,
    zoom: f64,
    min_px: f64,
}

impl ClipGesture {
    pub fn begin(kind: GestureKind, clip: &Clip, zoom: f64, min_px: f64) -> Self {
        Self {
            kind,
            clip_id: clip.id,
            origin: clip.geometry(),
            zoom,
            min_px: min_px.max(f64::MIN_POSITIVE),
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn clip_id(&self) -> ClipId {
        self.clip_id
    }

    /// Geometry the clip would have if the gesture ended at `delta_px`.
    pub fn committed(&self, delta_px: f64) -> ClipGeometry {
        match self.kind {
            GestureKind::Move => self.origin.moved(delta_px, self.zoom),
            GestureKind::ResizeRight => self.origin.resized_right(delta_px, self.zoom, self.min_px),
            GestureKind::ResizeLeft => self.origin.resized_left(delta_px, self.zoom, self.min_px),
        }
    }

    pub fn preview(&self, delta_px: f64) -> LiveGeometry {
        match self.kind {
            GestureKind::ResizeRight => LiveGeometry {
                left_px: self.origin.start_time * self.zoom,
                width_px: self.origin.right_edge_width(delta_px, self.zoom, self.min_px),
            },
            GestureKind::Move | GestureKind::ResizeLeft => {
                let g = self.committed(delta_px);
                LiveGeometry {
                    left_px: g.start_time * self.zoom,
                    width_px: g.duration * self.zoom,
                }
            }
        }
    }

    pub fn finish(self, delta_px: f64) -> GestureOutcome {
        let is_tap = match self.kind {
            GestureKind::Move => delta_px.abs() < TAP_THRESHOLD_PX,
            GestureKind::ResizeLeft | GestureKind::ResizeRight => delta_px == 0.0,
        };
        if is_tap || !delta_px.is_finite() {
            return GestureOutcome::Tap;
        }
        let g = self.committed(delta_px);
        let patch = match self.kind {
            GestureKind::Move => ClipPatch::start_time(g.start_time),
            GestureKind::ResizeRight => ClipPatch::duration(g.duration),
            GestureKind::ResizeLeft => ClipPatch::geometry(&g),
        };
        GestureOutcome::Commit(ProjectAction::UpdateClip {
            id: self.clip_id,
            patch,
        })
    }
}

pub fn time_to_px(seconds: f64, zoom: f64) -> f64 {
    seconds * zoom
}

pub fn px_to_time(px: f64, zoom: f64) -> f64 {
    px / zoom
}

/// Ruler click at `x` pixels from the timeline origin.
pub fn seek_time_at(x: f64, zoom: f64) -> f64 {
    (x / zoom).max(0.0)
}

pub fn zoom_in(zoom: f64) -> f64 {
    (zoom * ZOOM_STEP).min(MAX_ZOOM)
}

pub fn zoom_out(zoom: f64) -> f64 {
    (zoom / ZOOM_STEP).max(MIN_ZOOM)
}

/// Scrollable content width: fills the container, or the whole project plus a tail.
pub fn timeline_width(container_px: f64, duration: f64, zoom: f64) -> f64 {
    container_px.max(duration * zoom + TIMELINE_TAIL_PX)
}
