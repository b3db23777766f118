use super::*;
use crate::encode::sink::{InMemorySink, SinkConfig};

/// Records pushed indices without copying pixels.
#[derive(Default)]
struct IndexSink(Vec<FrameIndex>);

impl FrameSink for IndexSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ChaosResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _canvas: &PixelCanvas) -> ChaosResult<()> {
        self.0.push(idx);
        Ok(())
    }

    fn end(&mut self) -> ChaosResult<()> {
        Ok(())
    }
}

fn fps(v: u32) -> Fps {
    Fps::new(v).unwrap()
}

#[test]
fn nine_million_iterations_make_1800_frames() {
    let plan = FramePlan::new(9_000_000, fps(30), 60).unwrap();
    assert_eq!(plan.frame_count, 1800);
    assert_eq!(plan.iterations_per_frame, 5000);

    let canvas = PixelCanvas::new(1, 1).unwrap();
    let mut sampler = FrameSampler::new(plan);
    let mut sink = IndexSink::default();
    for i in 0..9_000_000u64 {
        sampler.observe(i, &canvas, &mut sink).unwrap();
    }

    assert_eq!(plan.emitted_frames(), 1800);
    assert_eq!(sampler.emitted(), 1800);
    assert_eq!(sink.0.len(), 1800);
    assert!(sink.0.iter().enumerate().all(|(i, f)| f.0 == i as u64));
    assert_eq!(sink.0.first().unwrap().file_name(), "00000.png");
    assert_eq!(sink.0.last().unwrap().file_name(), "01799.png");
}

#[test]
fn fewer_iterations_than_frames_is_rejected() {
    let err = FramePlan::new(1799, fps(30), 60).unwrap_err();
    assert!(matches!(err, ChaosError::Validation(_)));
    assert!(err.to_string().contains("(1799)"));
    assert!(FramePlan::new(1800, fps(30), 60).is_ok());
}

#[test]
fn zero_duration_is_rejected() {
    assert!(FramePlan::new(1_000, fps(30), 0).is_err());
}

fn sampled(plan: FramePlan, iterations: u64) -> (Vec<u64>, Vec<FrameIndex>) {
    let canvas = PixelCanvas::new(1, 1).unwrap();
    let mut sampler = FrameSampler::new(plan);
    let mut sink = IndexSink::default();
    let hits = (0..iterations)
        .filter(|&i| sampler.observe(i, &canvas, &mut sink).unwrap().is_some())
        .collect();
    (hits, sink.0)
}

#[test]
fn remainder_samples_every_cadence_hit() {
    // 10 / 3 = 3 per frame: 0, 3, 6 and 9 all fall on the cadence.
    let plan = FramePlan::new(10, fps(3), 1).unwrap();
    assert_eq!(plan.emitted_frames(), 4);

    let (hits, frames) = sampled(plan, 10);
    assert_eq!(hits, vec![0, 3, 6, 9]);
    assert_eq!(frames, (0..4).map(FrameIndex).collect::<Vec<_>>());
}

#[test]
fn capped_plan_stops_at_nominal_frame_count() {
    let plan = FramePlan::new(10, fps(3), 1).unwrap().with_cap(true);
    assert_eq!(plan.emitted_frames(), 3);

    let (hits, frames) = sampled(plan, 10);
    assert_eq!(hits, vec![0, 3, 6]);
    assert_eq!(frames.last(), Some(&FrameIndex(2)));
}

#[test]
fn default_render_samples_1801_frames() {
    let plan = FramePlan::new(100_000_000, fps(30), 60).unwrap();
    assert_eq!(plan.iterations_per_frame, 55_555);
    assert!(plan.on_cadence(99_999_000));
    assert_eq!(plan.emitted_frames(), 1801);
    assert_eq!(plan.with_cap(true).emitted_frames(), 1800);
}

#[test]
fn small_cadence_can_exceed_nominal_count_by_more_than_one() {
    // 10 / 6 = 1 per frame, so all ten iterations are sampled.
    let plan = FramePlan::new(10, fps(6), 1).unwrap();
    assert_eq!(plan.emitted_frames(), 10);
    let (hits, _) = sampled(plan, 10);
    assert_eq!(hits.len(), 10);
}

#[test]
fn snapshot_reflects_canvas_at_sample_time() {
    use crate::foundation::core::Rgb8;

    let plan = FramePlan::new(4, fps(2), 1).unwrap();
    let mut canvas = PixelCanvas::new(4, 1).unwrap();
    let mut sampler = FrameSampler::new(plan);
    let mut sink = InMemorySink::new();

    for i in 0..4u64 {
        canvas.set_pixel(i as i64, 0, Rgb8::new(255, 255, 255)).unwrap();
        sampler.observe(i, &canvas, &mut sink).unwrap();
    }

    let frames = sink.frames();
    assert_eq!(frames.len(), 2);
    // Frame 0 is taken after iteration 0 has been plotted.
    assert_eq!(frames[0].1.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(frames[0].1.get_pixel(1, 0).0, [0, 0, 0]);
    assert_eq!(frames[1].1.get_pixel(2, 0).0, [255, 255, 255]);
    assert_eq!(frames[1].1.get_pixel(3, 0).0, [0, 0, 0]);
}
