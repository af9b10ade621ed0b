//! Offline mixdown and WAV export.
//!
//! The project is rendered to a stereo buffer at a fixed rate, folded to mono
//! and written as 16-bit PCM.

pub mod export;
pub mod mixdown;
pub mod wav;

pub use export::{ExportError, Exporter};
pub use mixdown::{downmix_mono, render_stereo, StereoBuffer, RENDER_SAMPLE_RATE};
pub use wav::{encode_wav, quantize_sample, WavInfo, WAV_HEADER_LEN};
