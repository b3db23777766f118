use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::Fps;
use crate::foundation::error::{ChaosError, ChaosResult};

/// Highest constant rate factor x264 accepts.
pub const MAX_CRF: u8 = 51;

/// Turns a directory of `%05d.png` frames into a video file.
pub trait VideoEncoder: Send + Sync {
    /// Check that the encoder can run at all. Called before any frame is rendered.
    fn check_ready(&self) -> ChaosResult<()> {
        Ok(())
    }

    /// Encode the frames in `frame_dir` at `fps` into `out_path` and return the written path.
    fn encode(&self, frame_dir: &Path, fps: Fps, out_path: &Path) -> ChaosResult<PathBuf>;
}

/// Encoder that shells out to the system `ffmpeg` binary (libx264).
#[derive(Clone, Debug)]
pub struct FfmpegVideoEncoder {
    /// x264 constant rate factor; 0 is lossless.
    pub crf: u8,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl Default for FfmpegVideoEncoder {
    fn default() -> Self {
        Self {
            crf: 0,
            overwrite: true,
        }
    }
}

impl FfmpegVideoEncoder {
    /// Create an encoder with the given constant rate factor.
    pub fn with_crf(crf: u8) -> Self {
        Self {
            crf,
            ..Self::default()
        }
    }

    /// Arguments passed to `ffmpeg`, without the program name.
    pub fn args(&self, frame_dir: &Path, fps: Fps, out_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        args.push(if self.overwrite { "-y" } else { "-n" }.into());
        for a in ["-loglevel", "error", "-framerate"] {
            args.push(a.into());
        }
        args.push(fps.get().to_string().into());
        args.push("-i".into());
        args.push(frame_dir.join("%05d.png").into_os_string());
        // yuv444p keeps crf 0 truly lossless for the saturated vertex colors.
        for a in ["-c:v", "libx264", "-crf"] {
            args.push(a.into());
        }
        args.push(self.crf.to_string().into());
        for a in ["-pix_fmt", "yuv444p"] {
            args.push(a.into());
        }
        args.push(out_path.as_os_str().to_owned());
        args
    }

    fn check_crf(&self) -> ChaosResult<()> {
        if self.crf > MAX_CRF {
            return Err(ChaosError::validation(format!(
                "x264 crf must be in 0..={MAX_CRF}, got {}",
                self.crf
            )));
        }
        Ok(())
    }
}

impl VideoEncoder for FfmpegVideoEncoder {
    fn check_ready(&self) -> ChaosResult<()> {
        self.check_crf()?;
        require_ffmpeg()
    }

    fn encode(&self, frame_dir: &Path, fps: Fps, out_path: &Path) -> ChaosResult<PathBuf> {
        self.check_crf()?;
        if !frame_dir.join("00000.png").is_file() {
            return Err(ChaosError::validation(format!(
                "no frames found in '{}'",
                frame_dir.display()
            )));
        }
        ensure_parent_dir(out_path)?;
        if !self.overwrite && out_path.exists() {
            return Err(ChaosError::validation(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        require_ffmpeg()?;

        tracing::info!(
            frames = %frame_dir.display(),
            out = %out_path.display(),
            fps = fps.get(),
            crf = self.crf,
            "encoding video"
        );
        let output = Command::new("ffmpeg")
            .args(self.args(frame_dir, fps, out_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ChaosError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChaosError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(out_path.to_path_buf())
    }
}

/// Whether an `ffmpeg` binary can be executed.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn require_ffmpeg() -> ChaosResult<()> {
    if !is_ffmpeg_on_path() {
        return Err(ChaosError::encode(
            "ffmpeg is required for video encoding, but was not found on PATH",
        ));
    }
    Ok(())
}

/// Create the parent directory of `path`, if it has one.
pub fn ensure_parent_dir(path: &Path) -> ChaosResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ChaosError::io(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/video.rs"]
mod tests;
