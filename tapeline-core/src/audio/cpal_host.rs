//! Output to the default sound device via cpal.
//!
//! The device callback runs on its own thread. Scheduling and stop requests
//! reach it over a bounded channel; the callback publishes how many frames it
//! has rendered through an atomic counter, which is the host clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use tapeline_types::AudioSource;

use super::host::{AudioHost, HostError, HostResult, SegmentHandle};

/// Commands queued between drains of the callback.
const COMMAND_QUEUE_CAPACITY: usize = 256;

enum HostCommand {
    Play(Voice),
    Stop(SegmentHandle),
}

/// A segment as the callback renders it, all positions in frames.
struct Voice {
    handle: SegmentHandle,
    source: Arc<AudioSource>,
    /// Host frame the segment starts at
    start_frame: u64,
    /// First source frame played
    source_start: u64,
    /// Output frames to play
    frames: u64,
}

impl Voice {
    fn end_frame(&self) -> u64 {
        self.start_frame + self.frames
    }

    fn frame_at(&self, host_frame: u64, output_rate: u64) -> Option<(f32, f32)> {
        if host_frame < self.start_frame || host_frame >= self.end_frame() {
            return None;
        }
        let k = host_frame - self.start_frame;
        let src = (self.source_start + k * self.source.sample_rate() as u64 / output_rate) as usize;
        let left = self.source.sample(0, src);
        let right = if self.source.channel_count() > 1 {
            self.source.sample(1, src)
        } else {
            left
        };
        Some((left, right))
    }
}

pub struct CpalHost {
    stream: Stream,
    commands: Sender<HostCommand>,
    frames_rendered: Arc<AtomicU64>,
    sample_rate: u32,
    next_handle: u64,
    /// End frame of every segment not yet stopped, to report stale stops
    ends: HashMap<SegmentHandle, u64>,
}

impl CpalHost {
    /// Open the default output device. The stream starts paused until `resume`.
    pub fn new() -> HostResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| HostError::from("No output device available"))?;
        let config = device
            .default_output_config()
            .map_err(|e| HostError(format!("Failed to get output config: {}", e)))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let (tx, rx) = crossbeam_channel::bounded::<HostCommand>(COMMAND_QUEUE_CAPACITY);
        let frames_rendered = Arc::new(AtomicU64::new(0));
        let clock = Arc::clone(&frames_rendered);
        let mixer = CallbackMixer::new(rx, sample_rate as u64, channels);

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer, clock)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer, clock)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer, clock)?,
            other => {
                return Err(HostError(format!(
                    "Unsupported output sample format: {:?}",
                    other
                )))
            }
        };

        if let Err(e) = stream.pause() {
            log::debug!(target: "host", "stream could not start paused: {}", e);
        }
        log::info!(
            target: "host",
            "opened output device at {} Hz, {} channel(s), {:?}",
            sample_rate,
            channels,
            sample_format
        );

        Ok(Self {
            stream,
            commands: tx,
            frames_rendered,
            sample_rate,
            next_handle: 0,
            ends: HashMap::new(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn current_frame(&self) -> u64 {
        self.frames_rendered.load(Ordering::Acquire)
    }

    fn send(&self, command: HostCommand) -> HostResult {
        match self.commands.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(HostError::from("output command queue full")),
            Err(TrySendError::Disconnected(_)) => Err(HostError::from("output stream closed")),
        }
    }

    fn seconds_to_frames(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate as f64).round() as u64
    }
}

impl AudioHost for CpalHost {
    fn schedule_segment(
        &mut self,
        source: &Arc<AudioSource>,
        host_start: f64,
        source_offset: f64,
        play_duration: f64,
    ) -> HostResult<SegmentHandle> {
        self.next_handle += 1;
        let handle = SegmentHandle(self.next_handle);
        let start_frame = self.seconds_to_frames(host_start).max(self.current_frame());
        let voice = Voice {
            handle,
            source: Arc::clone(source),
            start_frame,
            source_start: (source_offset.max(0.0) * source.sample_rate() as f64).round() as u64,
            frames: self.seconds_to_frames(play_duration),
        };
        let end = voice.end_frame();
        self.send(HostCommand::Play(voice))?;
        self.ends.insert(handle, end);
        Ok(handle)
    }

    fn stop(&mut self, handle: SegmentHandle) -> HostResult {
        let now = self.current_frame();
        self.ends.retain(|_, end| *end > now);
        match self.ends.remove(&handle) {
            Some(_) => self.send(HostCommand::Stop(handle)),
            None => Err(HostError(format!("{} already finished", handle))),
        }
    }

    fn current_time(&self) -> f64 {
        self.current_frame() as f64 / self.sample_rate as f64
    }

    fn resume(&mut self) -> HostResult {
        self.stream
            .play()
            .map_err(|e| HostError(format!("Failed to start output stream: {}", e)))
    }
}

/// Open an output stream whose callback mixes as f32 and converts to `T`.
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut mixer: CallbackMixer,
    clock: Arc<AtomicU64>,
) -> HostResult<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let mut mixed: Vec<f32> = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mixed.resize(data.len(), 0.0);
                let base = clock.load(Ordering::Acquire);
                let frames = mixer.render(&mut mixed, base);
                write_converted(data, &mixed);
                clock.store(base + frames, Ordering::Release);
            },
            |err| {
                log::error!(target: "host", "Audio output error: {}", err);
            },
            None,
        )
        .map_err(|e| HostError(format!("Failed to build output stream: {}", e)))
}

fn write_converted<T>(out: &mut [T], mixed: &[f32])
where
    T: Sample + FromSample<f32>,
{
    for (o, &s) in out.iter_mut().zip(mixed) {
        *o = s.to_sample::<T>();
    }
}

/// State owned by the device callback.
struct CallbackMixer {
    commands: Receiver<HostCommand>,
    voices: Vec<Voice>,
    output_rate: u64,
    channels: usize,
}

impl CallbackMixer {
    fn new(commands: Receiver<HostCommand>, output_rate: u64, channels: usize) -> Self {
        Self {
            commands,
            voices: Vec::with_capacity(64),
            output_rate,
            channels: channels.max(1),
        }
    }

    /// Fill `data` (interleaved) starting at host frame `base`. Returns frames written.
    fn render(&mut self, data: &mut [f32], base: u64) -> u64 {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                HostCommand::Play(voice) => self.voices.push(voice),
                HostCommand::Stop(handle) => self.voices.retain(|v| v.handle != handle),
            }
        }

        let channels = self.channels;
        let frames = data.len() / channels;
        for (i, frame) in data.chunks_mut(channels).enumerate() {
            let host_frame = base + i as u64;
            let (mut left, mut right) = (0.0f32, 0.0f32);
            for voice in &self.voices {
                if let Some((l, r)) = voice.frame_at(host_frame, self.output_rate) {
                    left += l;
                    right += r;
                }
            }
            if channels == 1 {
                frame[0] = (left + right) / 2.0;
            } else {
                frame[0] = left;
                frame[1] = right;
                for extra in frame.iter_mut().skip(2) {
                    *extra = 0.0;
                }
            }
        }

        let end = base + frames as u64;
        self.voices.retain(|v| v.end_frame() > end);
        frames as u64
    }
}
