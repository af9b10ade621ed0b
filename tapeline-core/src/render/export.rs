use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tapeline_types::ProjectState;

use super::mixdown::{downmix_mono, project_frames, render_stereo, RENDER_SAMPLE_RATE};
use super::wav::{encode_wav, WAV_HEADER_LEN};

/// Most mono 16-bit frames whose data chunk still fits a RIFF size field.
pub const MAX_WAV_FRAMES: usize = (u32::MAX as usize - WAV_HEADER_LEN) / 2;

#[derive(Debug)]
pub enum ExportError {
    /// Another export is still running.
    Busy,
    /// The project is too long for a single WAV file.
    TooLong { frames: usize },
    Encode(hound::Error),
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Busy => write!(f, "an export is already in progress"),
            ExportError::TooLong { frames } => {
                write!(f, "project too long to export ({} frames, max {})", frames, MAX_WAV_FRAMES)
            }
            ExportError::Encode(e) => write!(f, "WAV encoding failed: {}", e),
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Encode(e) => Some(e),
            ExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        ExportError::Encode(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Renders projects to WAV, one at a time.
///
/// Clones share the in-flight flag, so an export started from a worker thread
/// against a snapshot still blocks a second request from the controller.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    in_flight: Arc<AtomicBool>,
}

/// Exclusive right to run one export. Released on drop.
#[derive(Debug)]
pub struct ExportSlot {
    flag: Arc<AtomicBool>,
}

impl Drop for ExportSlot {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the exporter, failing fast with `Busy` if an export is running.
    pub fn begin(&self) -> Result<ExportSlot, ExportError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(ExportSlot {
            flag: Arc::clone(&self.in_flight),
        })
    }

    /// Render the mix to WAV bytes.
    pub fn export_mix(&self, state: &ProjectState) -> Result<Vec<u8>, ExportError> {
        self.begin()?.render(state)
    }

    /// Render and write to `path`. Returns the bytes written.
    pub fn export_to_path(&self, state: &ProjectState, path: &Path) -> Result<usize, ExportError> {
        self.begin()?.write_to(state, path)
    }
}

impl ExportSlot {
    pub fn render(&self, state: &ProjectState) -> Result<Vec<u8>, ExportError> {
        let frames = project_frames(state, RENDER_SAMPLE_RATE);
        if frames > MAX_WAV_FRAMES {
            return Err(ExportError::TooLong { frames });
        }
        let stereo = render_stereo(state, RENDER_SAMPLE_RATE);
        let mono = downmix_mono(&stereo.left, &stereo.right);
        let bytes = encode_wav(&mono, RENDER_SAMPLE_RATE)?;
        log::info!(
            target: "export",
            "rendered {} frames from {} clip(s), {} bytes",
            frames,
            state.unmuted_clips().count(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Write through a temp file in the target directory so a failed export
    /// never leaves a partial file at `path`.
    pub fn write_to(self, state: &ProjectState, path: &Path) -> Result<usize, ExportError> {
        let bytes = self.render(state)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
        log::info!(target: "export", "wrote {}", path.display());
        Ok(bytes.len())
    }
}
