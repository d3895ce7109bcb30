//! Run the pipeline over a synthetic stream and print the event feed.
//!
//! A stand-in detector scripts one accident appearing at frame 5 and a
//! second one at frame 40; the notice channel is drained from a separate
//! thread the way a notifier collaborator would.

use accident_pipeline::{
    AccidentPipeline, Detector, Frame, FrameSource, ImageData, Notice, PipelineConfig,
    RawDetection, Result,
};
use std::thread;

struct SyntheticSource {
    total: u64,
    next: u64,
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.next > self.total {
            return Ok(None);
        }
        let frame = Frame {
            index: self.next,
            image: ImageData::new(Vec::new(), 1280, 720),
        };
        self.next += 1;
        Ok(Some(frame))
    }

    fn total_frames(&self) -> Option<u64> {
        Some(self.total)
    }
}

struct SyntheticDetector;

impl Detector for SyntheticDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>> {
        let mut detections = Vec::new();
        if frame.index >= 5 {
            let drift = frame.index as f32;
            detections.push(RawDetection::new(
                100.0 + drift,
                200.0,
                180.0 + drift,
                260.0,
                0.82,
            ));
        }
        if frame.index >= 40 {
            detections.push(RawDetection::new(600.0, 300.0, 700.0, 380.0, 0.55));
        }
        Ok(detections)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut pipeline = AccidentPipeline::new(PipelineConfig::default());
    let notices = pipeline.notices();

    let reporter = thread::spawn(move || {
        for notice in notices {
            match notice {
                Notice::Event(event) => println!(
                    "EVENT  id={} frame={} severity={} ({:.0}%)",
                    event.id,
                    event.frame_index,
                    event.severity().as_str(),
                    event.severity_pct()
                ),
                Notice::Progress(p) => println!(
                    "PROGRESS {}/{} frames, {} events",
                    p.frames_processed,
                    p.total_frames.unwrap_or(0),
                    p.event_count
                ),
            }
        }
    });

    let mut source = SyntheticSource { total: 60, next: 1 };
    let mut detector = SyntheticDetector;
    let summary = pipeline.run(&mut source, &mut detector)?;

    drop(pipeline);
    reporter.join().expect("reporter thread panicked");

    println!(
        "done: {} frames, {} accidents, {:.2}s",
        summary.frames_processed,
        summary.events.len(),
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
