//! Time display helpers for the transport and ruler.

/// Seconds between labelled ruler ticks.
pub const RULER_LABEL_EVERY: u32 = 5;

/// `m:ss`, truncating fractional seconds. Negative or non-finite input shows `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// One whole-second tick on the timeline ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub second: u32,
    pub x_px: f64,
    /// Only every fifth second carries a label.
    pub label: Option<String>,
}

/// Ticks for `ceil(duration)` whole seconds starting at zero.
pub fn ruler_ticks(duration: f64, zoom: f64) -> Vec<RulerTick> {
    if !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }
    let count = duration.ceil() as u32;
    (0..count)
        .map(|second| RulerTick {
            second,
            x_px: second as f64 * zoom,
            label: (second % RULER_LABEL_EVERY == 0).then(|| format_time(second as f64)),
        })
        .collect()
}
