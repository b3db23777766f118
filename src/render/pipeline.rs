use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::canvas::pixel::PixelCanvas;
use crate::chaos::choice::{ChoiceSource, seeded_rng};
use crate::chaos::walk::{ChaosWalk, Step};
use crate::encode::sink::{FrameSink, PngSequenceSink, SinkConfig};
use crate::encode::video::{FfmpegVideoEncoder, VideoEncoder};
use crate::foundation::error::{ChaosError, ChaosResult};
use crate::render::config::{RenderConfig, RunMode};
use crate::sample::sampler::FrameSampler;

/// Outputs of a full [`render`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Path of the still image, unless only frames were rendered.
    pub still: Option<PathBuf>,
    /// Frame directory and frame count, when frames were captured into a kept directory.
    pub frames: Option<(PathBuf, u64)>,
    /// Encoded video, when configured.
    pub video: Option<PathBuf>,
}

/// Run one walk, plotting every step and handing it to `observe` afterwards.
fn plot_walk<C, F>(
    cfg: &RenderConfig,
    choices: &mut C,
    mut observe: F,
) -> ChaosResult<PixelCanvas>
where
    C: ChoiceSource + ?Sized,
    F: FnMut(&Step, &PixelCanvas) -> ChaosResult<()>,
{
    let vertices = cfg.vertices();
    let mut canvas = PixelCanvas::new(cfg.width, cfg.height)?;
    let walk = ChaosWalk::new(&vertices, cfg.colors(), cfg.iterations, cfg.start(), choices)?
        .with_rounding(cfg.rounding);
    walk.run(|step| {
        canvas.plot(step.position, step.color)?;
        observe(step, &canvas)
    })?;
    Ok(canvas)
}

fn create_dir(dir: &Path) -> ChaosResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| ChaosError::io(dir, e))
}

fn sink_config(cfg: &RenderConfig) -> ChaosResult<SinkConfig> {
    Ok(SinkConfig {
        width: cfg.width,
        height: cfg.height,
        fps: cfg.fps()?,
        frame_count: cfg.frame_plan()?.emitted_frames(),
    })
}

/// Render the still image `{vertex_count}_{iterations}.png` into `cfg.output_dir`.
#[tracing::instrument(skip_all, fields(vertices = cfg.vertex_count, iterations = cfg.iterations))]
pub fn render_still<C: ChoiceSource + ?Sized>(
    cfg: &RenderConfig,
    choices: &mut C,
) -> ChaosResult<PathBuf> {
    cfg.validate()?;
    create_dir(&cfg.output_dir)?;

    let canvas = plot_walk(cfg, choices, |_, _| Ok(()))?;
    let path = cfg.still_path();
    canvas.encode_to(&path)?;
    tracing::info!(path = %path.display(), "wrote still image");
    Ok(path)
}

/// Run a walk that only captures the frame sequence into `sink`. Returns the frame count.
#[tracing::instrument(skip_all, fields(vertices = cfg.vertex_count, iterations = cfg.iterations))]
pub fn render_frames<C, S>(cfg: &RenderConfig, choices: &mut C, sink: &mut S) -> ChaosResult<u64>
where
    C: ChoiceSource + ?Sized,
    S: FrameSink + ?Sized,
{
    cfg.validate()?;
    let mut sampler = FrameSampler::new(cfg.frame_plan()?);

    sink.begin(sink_config(cfg)?)?;
    plot_walk(cfg, choices, |step, canvas| {
        sampler.observe(step.iteration, canvas, &mut *sink).map(|_| ())
    })?;
    sink.end()?;

    tracing::info!(frames = sampler.emitted(), "captured frame sequence");
    Ok(sampler.emitted())
}

/// Run a single walk feeding both the still image and the frame sequence.
///
/// The last frame is then a snapshot of the same realization the still image shows.
#[tracing::instrument(skip_all, fields(vertices = cfg.vertex_count, iterations = cfg.iterations))]
pub fn render_shared<C, S>(
    cfg: &RenderConfig,
    choices: &mut C,
    sink: &mut S,
) -> ChaosResult<(PathBuf, u64)>
where
    C: ChoiceSource + ?Sized,
    S: FrameSink + ?Sized,
{
    cfg.validate()?;
    create_dir(&cfg.output_dir)?;
    let mut sampler = FrameSampler::new(cfg.frame_plan()?);

    sink.begin(sink_config(cfg)?)?;
    let canvas = plot_walk(cfg, choices, |step, canvas| {
        sampler.observe(step.iteration, canvas, &mut *sink).map(|_| ())
    })?;
    sink.end()?;

    let path = cfg.still_path();
    canvas.encode_to(&path)?;
    tracing::info!(
        path = %path.display(),
        frames = sampler.emitted(),
        "wrote still image and frame sequence"
    );
    Ok((path, sampler.emitted()))
}

fn ffmpeg_encoder(cfg: &RenderConfig) -> Option<FfmpegVideoEncoder> {
    cfg.video
        .as_ref()
        .map(|v| FfmpegVideoEncoder::with_crf(v.crf))
}

/// Validate `cfg` and make sure the encoder can run before any walk starts.
fn preflight(cfg: &RenderConfig, encoder: Option<&dyn VideoEncoder>) -> ChaosResult<()> {
    cfg.validate()?;
    if cfg.video.is_some()
        && let Some(enc) = encoder
    {
        enc.check_ready()?;
    }
    Ok(())
}

/// Frame directory for a run, plus the staging directory guard when frames are temporary.
fn frame_target(
    cfg: &RenderConfig,
    encoder: Option<&dyn VideoEncoder>,
) -> ChaosResult<(PathBuf, Option<TempDir>)> {
    match (&cfg.frames_dir, &cfg.video) {
        (Some(dir), _) => Ok((dir.clone(), None)),
        (None, Some(_)) if encoder.is_some() => {
            let tmp = tempfile::Builder::new()
                .prefix("chaosgame-frames-")
                .tempdir()
                .map_err(|e| ChaosError::io(std::env::temp_dir(), e))?;
            Ok((tmp.path().to_path_buf(), Some(tmp)))
        }
        (None, _) => Ok((cfg.output_dir.join("frames"), None)),
    }
}

/// Encode the captured frames when a video is configured, then drop the staging directory.
fn finish_frames(
    cfg: &RenderConfig,
    encoder: Option<&dyn VideoEncoder>,
    frame_dir: PathBuf,
    staging: Option<TempDir>,
    frame_count: u64,
) -> ChaosResult<(Option<(PathBuf, u64)>, Option<PathBuf>)> {
    let video = match (&cfg.video, encoder) {
        (Some(v), Some(enc)) => Some(enc.encode(&frame_dir, cfg.fps()?, &v.out_path)?),
        (Some(_), None) => {
            tracing::warn!("video requested but no encoder available; keeping frames only");
            None
        }
        (None, _) => None,
    };

    let frames = match staging {
        Some(tmp) => {
            tmp.close().map_err(|e| ChaosError::io(&frame_dir, e))?;
            None
        }
        None => Some((frame_dir, frame_count)),
    };
    Ok((frames, video))
}

/// Full render driven by `cfg`: still image, optional frames, optional video via `ffmpeg`.
pub fn render(cfg: &RenderConfig) -> ChaosResult<RenderReport> {
    let encoder = ffmpeg_encoder(cfg);
    render_with_encoder(cfg, encoder.as_ref().map(|e| e as &dyn VideoEncoder))
}

/// Same as [`render`] with an injected video encoder.
///
/// `encoder` is only used when `cfg.video` is set, and is checked with
/// [`VideoEncoder::check_ready`] before anything is rendered. When both are present and no
/// `frames_dir` is configured, frames are staged in a temporary directory that is removed once
/// the video is written.
#[tracing::instrument(skip_all, fields(vertices = cfg.vertex_count, iterations = cfg.iterations))]
pub fn render_with_encoder(
    cfg: &RenderConfig,
    encoder: Option<&dyn VideoEncoder>,
) -> ChaosResult<RenderReport> {
    preflight(cfg, encoder)?;
    create_dir(&cfg.output_dir)?;

    if !cfg.frames {
        let mut rng = seeded_rng(cfg.seed);
        let still = render_still(cfg, &mut rng)?;
        return Ok(RenderReport {
            still: Some(still),
            ..RenderReport::default()
        });
    }

    let (frame_dir, staging) = frame_target(cfg, encoder)?;
    tracing::info!(dir = %frame_dir.display(), mode = ?cfg.run_mode, "rendering");

    let mut sink = PngSequenceSink::new(&frame_dir);
    let (still, frame_count) = match cfg.run_mode {
        RunMode::Shared => {
            let mut rng = seeded_rng(cfg.seed);
            render_shared(cfg, &mut rng, &mut sink)?
        }
        RunMode::Independent => {
            let mut still_rng = seeded_rng(cfg.seed);
            let mut frames_rng = seeded_rng(cfg.seed.map(|s| s.wrapping_add(1)));
            if cfg.parallel {
                let (still, frames) = rayon::join(
                    || render_still(cfg, &mut still_rng),
                    || render_frames(cfg, &mut frames_rng, &mut sink),
                );
                (still?, frames?)
            } else {
                let still = render_still(cfg, &mut still_rng)?;
                (still, render_frames(cfg, &mut frames_rng, &mut sink)?)
            }
        }
    };

    let (frames, video) = finish_frames(cfg, encoder, frame_dir, staging, frame_count)?;
    Ok(RenderReport {
        still: Some(still),
        frames,
        video,
    })
}

/// Capture only the frame sequence (and its video, when configured). No still image is written.
pub fn render_sequence(cfg: &RenderConfig) -> ChaosResult<RenderReport> {
    let encoder = ffmpeg_encoder(cfg);
    render_sequence_with_encoder(cfg, encoder.as_ref().map(|e| e as &dyn VideoEncoder))
}

/// Same as [`render_sequence`] with an injected video encoder.
///
/// Frame directory selection and staging follow [`render_with_encoder`].
#[tracing::instrument(skip_all, fields(vertices = cfg.vertex_count, iterations = cfg.iterations))]
pub fn render_sequence_with_encoder(
    cfg: &RenderConfig,
    encoder: Option<&dyn VideoEncoder>,
) -> ChaosResult<RenderReport> {
    preflight(cfg, encoder)?;
    if !cfg.frames {
        return Err(ChaosError::validation(
            "frame sequence requested with frame capture disabled",
        ));
    }

    let (frame_dir, staging) = frame_target(cfg, encoder)?;
    let mut sink = PngSequenceSink::new(&frame_dir);
    let frame_count = render_frames(cfg, &mut seeded_rng(cfg.seed), &mut sink)?;

    let (frames, video) = finish_frames(cfg, encoder, frame_dir, staging, frame_count)?;
    Ok(RenderReport {
        still: None,
        frames,
        video,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
