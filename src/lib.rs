//! chaosgame renders "chaos game" fractals.
//!
//! A cursor starts at the canvas center and repeatedly jumps halfway toward a randomly chosen
//! corner of a regular polygon, plotting each visited pixel in that corner's color. Three
//! corners give the Sierpinski triangle.
//!
//! # Pipeline overview
//!
//! 1. **Geometry**: `width, height, count -> Vec<Vertex>` ([`generate_vertices`])
//! 2. **Walk**: vertices + colors + a [`ChoiceSource`] -> lazy stream of [`Step`]s ([`ChaosWalk`])
//! 3. **Plot**: every step overwrites one pixel of a [`PixelCanvas`]
//! 4. **Sample** (optional): every `iterations / (secs * fps)` steps the canvas is pushed to a
//!    [`FrameSink`] ([`FrameSampler`]), producing `00000.png, 00001.png, ...`
//! 5. **Encode** (optional): a [`VideoEncoder`] turns the frame directory into a video
//!
//! [`render`] drives all of it from a [`RenderConfig`]; [`render_sequence`] skips the still image.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic given the random source**: seed the run ([`RenderConfig::seed`]) or inject
//!   [`ScriptedChoices`] for bit-exact output.
//! - **Fail fast**: configurations are validated before any file is written, and an
//!   out-of-bounds plot is an error, never a clamp.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod canvas;
mod chaos;
mod encode;
mod foundation;
mod geometry;
mod render;
mod sample;

pub use canvas::pixel::PixelCanvas;
pub use chaos::choice::{ChoiceSource, ScriptedChoices, seeded_rng};
pub use chaos::walk::{ChaosWalk, Rounding, Step};
pub use encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use encode::video::{
    FfmpegVideoEncoder, MAX_CRF, VideoEncoder, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use foundation::core::{DEFAULT_PALETTE, Fps, FrameIndex, Position, Rgb8, Vertex};
pub use foundation::error::{ChaosError, ChaosResult};
pub use geometry::polygon::{
    DEFAULT_MARGIN, generate_vertices, generate_vertices_with_margin, polygon_radius,
};
pub use render::config::{RenderConfig, RunMode, VideoConfig};
pub use render::pipeline::{
    RenderReport, render, render_frames, render_sequence, render_sequence_with_encoder,
    render_shared, render_still, render_with_encoder,
};
pub use sample::sampler::{FramePlan, FrameSampler};
