//! # tapeline-core
//!
//! Engine library for the Tapeline timeline editor. Owns everything with side
//! effects: configuration, the audio host, real-time playback scheduling,
//! offline mixdown and WAV export, and decoding imported files.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tapeline_core::audio::TestHost;
//! use tapeline_core::config::Config;
//! use tapeline_core::import::WavDecoder;
//! use tapeline_core::studio::Studio;
//!
//! let config = Config::load();
//! let mut studio = Studio::new(TestHost::new(), &config);
//!
//! studio.import("drums.wav", &bytes, &WavDecoder)?;
//! studio.play()?;
//! // From the refresh loop, every `config.tick_interval()`:
//! studio.tick();
//!
//! let wav = studio.export_mix()?;
//! ```
//!
//! ## Module Overview
//!
//! - [`studio`]: `Studio`, the controller that owns the project and routes every edit
//! - [`audio`]: `AudioHost` trait, test/null/cpal hosts, `PlaybackScheduler`, `TickTask`
//! - [`render`]: offline stereo render, mono fold-down, WAV encoding, `Exporter`
//! - [`import`]: `Decoder` trait and the WAV decoder
//! - [`config`]: TOML configuration with user overrides

pub mod audio;
pub mod config;
pub mod import;
pub mod render;
pub mod studio;

pub use tapeline_types as types;
