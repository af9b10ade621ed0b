#![allow(dead_code)]
//! Test harness utilities for tapeline-core integration tests.

use std::io::Cursor;

use tapeline_core::audio::TestHost;
use tapeline_core::config::Config;
use tapeline_core::import::WavDecoder;
use tapeline_core::studio::Studio;
use tapeline_types::TrackId;

/// Encode a mono 16-bit WAV at `rate` holding `samples`.
pub fn wav_mono(samples: &[i16], rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// A mono WAV of `seconds` of silence.
pub fn silent_wav(seconds: f64, rate: u32) -> Vec<u8> {
    let frames = (seconds * rate as f64).round() as usize;
    wav_mono(&vec![0; frames], rate)
}

/// A mono WAV of `seconds` at a constant level.
pub fn dc_wav(level: i16, seconds: f64, rate: u32) -> Vec<u8> {
    let frames = (seconds * rate as f64).round() as usize;
    wav_mono(&vec![level; frames], rate)
}

/// Studio on a shared test host, with embedded default config, plus the probe.
pub fn studio() -> (Studio<TestHost>, TestHost) {
    studio_with(&Config::default())
}

pub fn studio_with(config: &Config) -> (Studio<TestHost>, TestHost) {
    let probe = TestHost::new();
    (Studio::new(probe.clone(), config), probe)
}

/// Import a clip, panicking on failure.
pub fn import(studio: &mut Studio<TestHost>, name: &str, bytes: &[u8]) -> TrackId {
    studio.import(name, bytes, &WavDecoder).unwrap()
}
