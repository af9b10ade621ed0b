//! Human and JSON summaries printed after a command.

use serde::Serialize;

use tapeline_core::render::WavInfo;
use tapeline_types::time::format_time;
use tapeline_types::ProjectState;

#[derive(Debug, Serialize)]
pub struct TrackReport {
    pub name: String,
    pub color: String,
    pub muted: bool,
    pub start_secs: f64,
    pub length_secs: f64,
}

#[derive(Debug, Serialize)]
pub struct MixReport {
    pub output: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub frames: u32,
    pub bytes: usize,
    pub tracks: Vec<TrackReport>,
}

impl MixReport {
    pub fn new(output: String, state: &ProjectState, info: &WavInfo, bytes: usize) -> Self {
        let tracks = state
            .tracks
            .iter()
            .map(|t| TrackReport {
                name: t.name.clone(),
                color: t.color.to_string(),
                muted: t.muted,
                start_secs: t.clips.iter().map(|c| c.start_time).reduce(f64::min).unwrap_or(0.0),
                length_secs: t.clips.iter().map(|c| c.duration).sum(),
            })
            .collect();
        Self {
            output,
            duration_secs: state.duration,
            sample_rate: info.sample_rate,
            frames: info.frames,
            bytes,
            tracks,
        }
    }

    pub fn print(&self, json: bool) -> Result<(), serde_json::Error> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }
        println!(
            "{}: {} ({} frames @ {} Hz, {} bytes)",
            self.output,
            format_time(self.duration_secs),
            self.frames,
            self.sample_rate,
            self.bytes
        );
        for (i, t) in self.tracks.iter().enumerate() {
            println!(
                "  {:>2} {} {:<24} at {} for {:.2}s{}",
                i + 1,
                t.color,
                t.name,
                format_time(t.start_secs),
                t.length_secs,
                if t.muted { " (muted)" } else { "" }
            );
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub file: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub frames: u32,
    pub duration_secs: f64,
}

impl InfoReport {
    pub fn new(file: String, info: &WavInfo) -> Self {
        Self {
            file,
            sample_rate: info.sample_rate,
            channels: info.channels,
            bits_per_sample: info.bits_per_sample,
            frames: info.frames,
            duration_secs: info.duration_secs(),
        }
    }

    pub fn print(&self, json: bool) -> Result<(), serde_json::Error> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            println!(
                "{}: {} Hz, {} ch, {}-bit, {} frames ({:.3}s)",
                self.file, self.sample_rate, self.channels, self.bits_per_sample, self.frames, self.duration_secs
            );
        }
        Ok(())
    }
}
