use crate::canvas::pixel::PixelCanvas;
use crate::encode::sink::FrameSink;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ChaosError, ChaosResult};

/// Fixed sampling cadence of a frame-capturing run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePlan {
    /// Nominal frame count of the video, `duration_secs * fps`.
    pub frame_count: u64,
    /// Iterations between two consecutive frames.
    pub iterations_per_frame: u64,
    /// Iterations the run will perform.
    pub total_iterations: u64,
    /// Stop after `frame_count` frames instead of sampling every cadence hit.
    pub capped: bool,
}

impl FramePlan {
    /// Plan `duration_secs * fps` frames over `total_iterations`.
    ///
    /// Fails when there would be fewer iterations than frames, since the cadence would be zero.
    pub fn new(total_iterations: u64, fps: Fps, duration_secs: u32) -> ChaosResult<Self> {
        let frame_count = fps.frames_for_secs(duration_secs);
        if frame_count == 0 {
            return Err(ChaosError::validation(
                "video duration must be at least one second",
            ));
        }
        let iterations_per_frame = total_iterations / frame_count;
        if iterations_per_frame == 0 {
            return Err(ChaosError::validation(format!(
                "iteration count ({total_iterations}) must be at least the frame count ({frame_count})"
            )));
        }
        Ok(Self {
            frame_count,
            iterations_per_frame,
            total_iterations,
            capped: false,
        })
    }

    /// Stop at `frame_count` frames when `capped` is set.
    pub fn with_cap(mut self, capped: bool) -> Self {
        self.capped = capped;
        self
    }

    /// Frames the sampler will actually push.
    ///
    /// Every iteration on the cadence is sampled, so when `iterations_per_frame` does not divide
    /// the total evenly this exceeds `frame_count` (100M iterations at 30 fps for 60 s give 1801
    /// frames). A capped plan stops at `frame_count`.
    pub fn emitted_frames(&self) -> u64 {
        let sampled = (self.total_iterations - 1) / self.iterations_per_frame + 1;
        if self.capped {
            sampled.min(self.frame_count)
        } else {
            sampled
        }
    }

    /// Whether `iteration` falls on the cadence.
    pub fn on_cadence(&self, iteration: u64) -> bool {
        iteration.is_multiple_of(self.iterations_per_frame)
    }
}

/// Snapshots the canvas into a [`FrameSink`] every `iterations_per_frame` iterations.
///
/// Emits [`FramePlan::emitted_frames`] frames.
#[derive(Debug)]
pub struct FrameSampler {
    plan: FramePlan,
    emitted: u64,
}

impl FrameSampler {
    /// Create a sampler following `plan`.
    pub fn new(plan: FramePlan) -> Self {
        Self { plan, emitted: 0 }
    }

    /// The plan being followed.
    pub fn plan(&self) -> FramePlan {
        self.plan
    }

    /// Frames pushed so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Observe one iteration after its pixel has been plotted.
    ///
    /// Returns the index of the frame pushed to `sink`, if this iteration was sampled.
    pub fn observe<S: FrameSink + ?Sized>(
        &mut self,
        iteration: u64,
        canvas: &PixelCanvas,
        sink: &mut S,
    ) -> ChaosResult<Option<FrameIndex>> {
        let total = self.plan.emitted_frames();
        if self.emitted >= total || !self.plan.on_cadence(iteration) {
            return Ok(None);
        }

        let idx = FrameIndex(self.emitted);
        sink.push_frame(idx, canvas)?;
        self.emitted += 1;

        if self.emitted == total || self.emitted.is_multiple_of((total / 10).max(1)) {
            tracing::info!("frame {} of {}", idx.0, total);
        } else {
            tracing::debug!("frame {} of {}", idx.0, total);
        }
        Ok(Some(idx))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/sampler.rs"]
mod tests;
