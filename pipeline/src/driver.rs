//! Frame pipeline driver
//!
//! Pulls frames from a source, runs the external detector, feeds admitted
//! detections to the tracker, and reports confirmed accident events plus
//! periodic progress over a single-producer channel. One driver instance
//! per video source: tracker state and identity counters are never shared.

use crate::config::PipelineConfig;
use crate::detector::Detector;
use crate::error::Result;
use crate::events::{EventLog, EventRecord, Progress};
use crate::source::FrameSource;
use crate::types::RawDetection;
use accitrack::{AccidentTracker, Detection};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What the pipeline reports while running.
#[derive(Debug, Clone)]
pub enum Notice {
    /// A distinct accident, emitted once on the frame its track confirmed
    Event(EventRecord),
    /// Periodic progress snapshot
    Progress(Progress),
}

/// Shared stop flag. Cancellation takes effect at the next frame boundary;
/// a frame's predict/match/update step is never interrupted midway.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Final accounting for one stream run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub events: Vec<EventRecord>,
    pub elapsed: Duration,
}

/// Drives one video source through detection, tracking and event
/// deduplication.
pub struct AccidentPipeline {
    config: PipelineConfig,
    tracker: AccidentTracker,
    events: EventLog,
    notices: Option<Sender<Notice>>,
    cancel: CancelHandle,
}

impl AccidentPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let tracker = AccidentTracker::new(config.tracker_config());
        Self {
            config,
            tracker,
            events: EventLog::new(),
            notices: None,
            cancel: CancelHandle::new(),
        }
    }

    /// Subscribe to events and progress. The channel is unbounded so slow
    /// consumers cannot stall the frame loop; dropping the receiver simply
    /// turns reporting off.
    pub fn notices(&mut self) -> Receiver<Notice> {
        let (tx, rx) = unbounded();
        self.notices = Some(tx);
        rx
    }

    /// Handle for stopping the loop from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Process the stream until end of stream, cancellation, or a
    /// collaborator failure. End of stream is normal termination; a
    /// detector or source failure halts the loop with the offending frame
    /// unprocessed and track state intact.
    pub fn run<S: FrameSource, D: Detector>(
        &mut self,
        source: &mut S,
        detector: &mut D,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let total_frames = source.total_frames();
        let cadence = self.config.progress_cadence(total_frames);
        let mut frames_processed = 0u64;

        log::info!(
            "pipeline started: detector={}, total_frames={:?}",
            detector.name(),
            total_frames
        );

        loop {
            if self.cancel.is_cancelled() {
                log::info!("pipeline cancelled after {} frames", frames_processed);
                break;
            }

            let frame = match source.next_frame()? {
                Some(frame) => frame,
                None => break,
            };

            let raw = detector.detect(&frame)?;
            let detections = self.admit(&raw);
            let update = self.tracker.track(&detections);

            for view in &update.newly_confirmed {
                if let Some(record) = self.events.report_if_new(view.id, frame.index, view.score) {
                    log::info!(
                        "accident {} confirmed at frame {} ({} severity, {:.0}%)",
                        record.id,
                        record.frame_index,
                        record.severity().as_str(),
                        record.severity_pct()
                    );
                    self.send(Notice::Event(record));
                }
            }

            frames_processed += 1;
            if frames_processed % cadence == 0 {
                self.send(Notice::Progress(Progress {
                    frames_processed,
                    total_frames,
                    event_count: self.events.count(),
                }));
            }

            log::debug!(
                "frame {}: {} detections, {} live tracks",
                frame.index,
                detections.len(),
                update.tracks.len()
            );
        }

        let elapsed = started.elapsed();
        log::info!(
            "processed {} frames with {} accidents detected in {:.2}s",
            frames_processed,
            self.events.count(),
            elapsed.as_secs_f64()
        );

        Ok(RunSummary {
            frames_processed,
            events: self.events.records().to_vec(),
            elapsed,
        })
    }

    /// Validate raw detector output and apply the confidence floor.
    /// Malformed boxes are dropped and logged; they never reach matching.
    fn admit(&self, raw: &[RawDetection]) -> Vec<Detection> {
        let mut admitted = Vec::with_capacity(raw.len());
        for detection in raw {
            match detection.validate() {
                Some(det) if det.score >= self.config.confidence_floor => admitted.push(det),
                Some(_) => {}
                None => log::warn!("dropping malformed detection {:?}", detection),
            }
        }
        admitted
    }

    fn send(&mut self, notice: Notice) {
        if let Some(tx) = &self.notices {
            if tx.send(notice).is_err() {
                log::warn!("notice receiver dropped, reporting disabled");
                self.notices = None;
            }
        }
    }
}
