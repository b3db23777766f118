use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::canvas::pixel::PixelCanvas;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ChaosError, ChaosResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Playback rate the frames are sampled for.
    pub fps: Fps,
    /// Number of frames the sampler will push.
    pub frame_count: u64,
}

/// Consumer of sampled canvas snapshots.
///
/// Ordering contract: `push_frame` is called with consecutive indices starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ChaosResult<()>;
    /// Push the canvas as frame `idx`.
    fn push_frame(&mut self, idx: FrameIndex, canvas: &PixelCanvas) -> ChaosResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ChaosResult<()>;
}

/// Writes each frame as `{dir}/{idx:05}.png`, the layout `ffmpeg -i %05d.png` expects.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl PngSequenceSink {
    /// Create a sink writing into `dir`. The directory is created in `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ChaosResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ChaosError::io(&self.dir, e))?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, canvas: &PixelCanvas) -> ChaosResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ChaosError::encode("png sequence sink not started"))?;
        if idx.0 != self.written {
            return Err(ChaosError::encode(format!(
                "frame {} pushed out of order (expected {})",
                idx.0, self.written
            )));
        }
        if canvas.width() != cfg.width || canvas.height() != cfg.height {
            return Err(ChaosError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                canvas.width(),
                canvas.height(),
                cfg.width,
                cfg.height
            )));
        }

        let path = self.dir.join(idx.file_name());
        canvas.encode_to(&path)?;
        tracing::debug!(path = %path.display(), "wrote frame");
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ChaosResult<()> {
        if let Some(cfg) = self.cfg.take()
            && self.written != cfg.frame_count
        {
            tracing::warn!(
                written = self.written,
                expected = cfg.frame_count,
                "frame sequence is shorter than planned"
            );
        }
        Ok(())
    }
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbImage)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, RgbImage)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ChaosResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, canvas: &PixelCanvas) -> ChaosResult<()> {
        self.frames.push((idx, canvas.as_image().clone()));
        Ok(())
    }

    fn end(&mut self) -> ChaosResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
