use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::chaos::walk::Rounding;
use crate::encode::video::MAX_CRF;
use crate::foundation::core::{DEFAULT_PALETTE, Fps, Position, Rgb8, Vertex};
use crate::foundation::error::{ChaosError, ChaosResult};
use crate::geometry::polygon::{DEFAULT_MARGIN, generate_vertices_with_margin, polygon_radius};
use crate::sample::sampler::FramePlan;

/// How the still image and the frame sequence relate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Two separate walks with separate random draws: the still image and the video show
    /// different realizations of the fractal.
    #[default]
    Independent,
    /// One walk feeds both outputs, so the last frame and the still image agree.
    Shared,
}

/// Video output settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoConfig {
    /// Encoded video path.
    pub out_path: PathBuf,
    /// x264 constant rate factor; 0 is lossless.
    #[serde(default)]
    pub crf: u8,
}

/// Everything a render needs. Defaults reproduce the classic 4K-wide Sierpinski render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Chaos-game iterations per run.
    pub iterations: u64,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Polygon corners; the first `vertex_count` palette entries color them.
    pub vertex_count: usize,
    /// Vertex colors as packed `0xRRGGBB` integers.
    pub palette: Vec<Rgb8>,
    /// Gap between the polygon's circle and the top/bottom edges.
    pub margin: u32,
    /// Directory receiving `{vertex_count}_{iterations}.png`.
    pub output_dir: PathBuf,
    /// Whether to capture a frame sequence.
    pub frames: bool,
    /// Where frames go. Defaults to `{output_dir}/frames`, or a temporary staging directory
    /// when only the encoded video is wanted.
    pub frames_dir: Option<PathBuf>,
    /// Video length in seconds.
    pub duration_secs: u32,
    /// Video frame rate.
    pub fps: u32,
    /// Stop at exactly `duration_secs * fps` frames. Off by default: every iteration on the
    /// cadence is sampled, which yields one or more extra frames when the iteration count is
    /// not a multiple of the frame count.
    pub cap_frames: bool,
    /// Encode the frames into a video when set.
    pub video: Option<VideoConfig>,
    /// Seed for reproducible renders; OS entropy when unset.
    pub seed: Option<u64>,
    /// Midpoint rounding of the walk.
    pub rounding: Rounding,
    /// Relationship between still image and frames.
    pub run_mode: RunMode,
    /// Run independent still and frame walks on separate threads.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000_000,
            width: 3840,
            height: 1600,
            vertex_count: 3,
            palette: DEFAULT_PALETTE.to_vec(),
            margin: DEFAULT_MARGIN,
            output_dir: PathBuf::from("out"),
            frames: true,
            frames_dir: None,
            duration_secs: 60,
            fps: 30,
            cap_frames: false,
            video: None,
            seed: None,
            rounding: Rounding::Floor,
            run_mode: RunMode::Independent,
            parallel: false,
        }
    }
}

impl RenderConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> ChaosResult<Self> {
        let f = std::fs::File::open(path).map_err(|e| ChaosError::io(path, e))?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse render config '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Reject configurations that would fail mid-run.
    pub fn validate(&self) -> ChaosResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChaosError::validation("width/height must be non-zero"));
        }
        if self.iterations == 0 {
            return Err(ChaosError::validation("iteration count must be non-zero"));
        }
        if self.vertex_count == 0 {
            return Err(ChaosError::validation("vertex count must be non-zero"));
        }
        if self.vertex_count > self.palette.len() {
            return Err(ChaosError::validation(format!(
                "vertex count ({}) exceeds the number of palette colors ({})",
                self.vertex_count,
                self.palette.len()
            )));
        }
        if polygon_radius(self.height, self.margin) <= 0 {
            return Err(ChaosError::validation(format!(
                "margin {} leaves no room for a polygon in a canvas {} pixels high",
                self.margin, self.height
            )));
        }
        // The walk never leaves the box spanned by the vertices and the center, so checking
        // the vertices is enough to keep every plot in bounds.
        if let Some(v) = self
            .vertices()
            .into_iter()
            .find(|v| !self.contains(v.x, v.y))
        {
            return Err(ChaosError::validation(format!(
                "vertex ({}, {}) falls outside the {}x{} canvas",
                v.x, v.y, self.width, self.height
            )));
        }
        if self.frames {
            self.frame_plan()?;
        } else if self.video.is_some() {
            return Err(ChaosError::validation(
                "video output requires frame capture to be enabled",
            ));
        }
        if let Some(video) = &self.video
            && video.crf > MAX_CRF
        {
            return Err(ChaosError::validation(format!(
                "x264 crf must be in 0..={MAX_CRF}, got {}",
                video.crf
            )));
        }
        Ok(())
    }

    /// Polygon corners for this canvas.
    pub fn vertices(&self) -> Vec<Vertex> {
        generate_vertices_with_margin(self.width, self.height, self.vertex_count, self.margin)
    }

    /// Colors of the vertices, index-aligned with [`RenderConfig::vertices`].
    pub fn colors(&self) -> &[Rgb8] {
        &self.palette[..self.vertex_count.min(self.palette.len())]
    }

    /// Where every walk starts.
    pub fn start(&self) -> Position {
        Position::canvas_center(self.width, self.height)
    }

    /// Validated frame rate.
    pub fn fps(&self) -> ChaosResult<Fps> {
        Fps::new(self.fps)
    }

    /// Sampling cadence of the frame sequence.
    pub fn frame_plan(&self) -> ChaosResult<FramePlan> {
        let plan = FramePlan::new(self.iterations, self.fps()?, self.duration_secs)?;
        Ok(plan.with_cap(self.cap_frames))
    }

    /// File name of the still image, `{vertex_count}_{iterations}.png`.
    pub fn still_file_name(&self) -> String {
        format!("{}_{}.png", self.vertex_count, self.iterations)
    }

    /// Full path of the still image.
    pub fn still_path(&self) -> PathBuf {
        self.output_dir.join(self.still_file_name())
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
