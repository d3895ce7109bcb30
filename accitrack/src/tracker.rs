//! Frame-to-frame track lifecycle: predict, associate, update, spawn, prune

use crate::bbox::{ious, Bbox, Detection};
use crate::hungarian::HungarianSolver;
use crate::track::{Track, MEASUREMENT_NOISE, PROCESS_NOISE};
use std::collections::BTreeMap;

/// Tracker tuning. The defaults mirror the production accident-detection
/// deployment: tracks survive 20 missed frames and confirm after 3
/// consecutive matches at IoU 0.3 or better.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Consecutive missed frames before a track is dropped
    pub max_age: u32,
    /// Consecutive matched frames before a track is confirmed
    pub min_hits: u32,
    /// Minimum IoU for a (track, detection) pairing
    pub iou_threshold: f32,
    pub measurement_noise: [f32; 4],
    pub process_noise: [f32; 7],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 20,
            min_hits: 3,
            iou_threshold: 0.3,
            measurement_noise: MEASUREMENT_NOISE,
            process_noise: PROCESS_NOISE,
        }
    }
}

/// Read-only view of one live track after a frame step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackView {
    pub id: u32,
    pub bbox: Bbox,
    /// Confidence of the most recent matched detection
    pub score: f32,
    pub confirmed: bool,
}

/// Everything one frame step produced.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    /// All live tracks in ascending identity order
    pub tracks: Vec<TrackView>,
    /// Tracks that crossed the confirmation threshold this frame
    pub newly_confirmed: Vec<TrackView>,
}

/// Owns the live track set for one video source and advances it one frame
/// at a time. Not reentrant: one instance per source, one `track` call per
/// frame. Identities increase monotonically and are never reused, so a
/// track that expires and reappears comes back under a fresh identity.
#[derive(Debug)]
pub struct AccidentTracker {
    config: TrackerConfig,
    next_id: u32,
    tracks: BTreeMap<u32, Track>,
    frame_count: u64,
}

impl AccidentTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            next_id: 1,
            tracks: BTreeMap::new(),
            frame_count: 0,
        }
    }

    /// Advance every track one frame and reconcile with this frame's
    /// detections. Detections must already be validated; malformed boxes
    /// are rejected upstream and never reach the solver.
    pub fn track(&mut self, detections: &[Detection]) -> FrameUpdate {
        // 1. Predict. Tracks whose prediction degenerates (non-finite or
        //    inverted box) are culled before matching.
        let mut predicted: Vec<(u32, Bbox)> = Vec::with_capacity(self.tracks.len());
        let mut degenerate: Vec<u32> = Vec::new();
        for (id, track) in self.tracks.iter_mut() {
            let bbox = track.predict();
            if bbox.is_valid() {
                predicted.push((*id, bbox));
            } else {
                degenerate.push(*id);
            }
        }
        for id in degenerate {
            self.tracks.remove(&id);
        }

        // 2. Associate predictions with detections.
        let track_boxes: Vec<Bbox> = predicted.iter().map(|(_, b)| *b).collect();
        let detection_boxes: Vec<Bbox> = detections.iter().map(|d| d.bbox).collect();
        let similarity = ious(&track_boxes, &detection_boxes);
        let assignment = HungarianSolver::solve_iou(similarity.view(), self.config.iou_threshold);

        // 3. Update matched tracks; promote those that just reached the
        //    confirmation threshold.
        let mut newly_confirmed = Vec::new();
        for (row, col) in assignment.matches {
            let id = predicted[row].0;
            if let Some(track) = self.tracks.get_mut(&id) {
                if track.update(&detections[col]).is_ok() {
                    if !track.confirmed && track.hit_streak >= self.config.min_hits {
                        track.confirmed = true;
                        newly_confirmed.push(TrackView {
                            id,
                            bbox: track.bbox(),
                            score: track.score,
                            confirmed: true,
                        });
                    }
                } else {
                    // Singular innovation covariance: the estimate is
                    // unusable, drop the track
                    self.tracks.remove(&id);
                }
            }
        }

        // 4. Unmatched tracks were already aged by predict; prune the ones
        //    past their miss budget.
        let max_age = self.config.max_age;
        self.tracks
            .retain(|_, track| track.steps_since_update <= max_age);

        // 5. Spawn a tentative track for every unmatched detection. A spawn
        //    counts as the first hit, so min_hits <= 1 confirms on the spot.
        for col in assignment.unmatched_detections {
            let id = self.next_id;
            self.next_id += 1;
            let mut track = Track::new(
                id,
                &detections[col],
                self.config.measurement_noise,
                self.config.process_noise,
            );
            if track.hit_streak >= self.config.min_hits {
                track.confirmed = true;
                newly_confirmed.push(TrackView {
                    id,
                    bbox: track.bbox(),
                    score: track.score,
                    confirmed: true,
                });
            }
            self.tracks.insert(id, track);
        }

        self.frame_count += 1;

        FrameUpdate {
            tracks: self
                .tracks
                .values()
                .map(|track| TrackView {
                    id: track.id,
                    bbox: track.bbox(),
                    score: track.score,
                    confirmed: track.confirmed,
                })
                .collect(),
            newly_confirmed,
        }
    }

    /// Frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of live tracks, tentative and confirmed.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection::new(Bbox::new(x1, y1, x2, y2), 0.9)
    }

    fn tracker(max_age: u32, min_hits: u32) -> AccidentTracker {
        AccidentTracker::new(TrackerConfig {
            max_age,
            min_hits,
            ..TrackerConfig::default()
        })
    }

    #[test]
    fn spawns_tentative_track_without_confirming() {
        let mut tracker = tracker(20, 3);
        let update = tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        assert_eq!(update.tracks.len(), 1);
        assert_eq!(update.tracks[0].id, 1);
        assert!(!update.tracks[0].confirmed);
        assert!(update.newly_confirmed.is_empty());
    }

    #[test]
    fn identity_is_stable_across_matched_frames() {
        let mut tracker = tracker(20, 3);
        tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        for i in 1..=10 {
            let offset = i as f32 * 2.0;
            let update = tracker.track(&[det(
                10.0 + offset,
                10.0,
                50.0 + offset,
                50.0,
            )]);
            assert_eq!(update.tracks.len(), 1);
            assert_eq!(update.tracks[0].id, 1);
        }
    }

    #[test]
    fn confirms_after_exactly_min_hits_frames() {
        let mut tracker = tracker(20, 3);

        // Frame 1: spawn
        let update = tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        assert!(update.newly_confirmed.is_empty());

        // Frame 2: second consecutive match, still tentative
        let update = tracker.track(&[det(12.0, 11.0, 52.0, 51.0)]);
        assert!(update.newly_confirmed.is_empty());

        // Frame 3: third consecutive match, confirmed now
        let update = tracker.track(&[det(14.0, 12.0, 54.0, 52.0)]);
        assert_eq!(update.newly_confirmed.len(), 1);
        assert_eq!(update.newly_confirmed[0].id, 1);

        // Later frames keep matching but never re-confirm
        for i in 0..27 {
            let offset = 16.0 + i as f32;
            let update = tracker.track(&[det(offset, 12.0, offset + 40.0, 52.0)]);
            assert!(update.newly_confirmed.is_empty());
            assert!(update.tracks[0].confirmed);
        }
    }

    #[test]
    fn interrupted_streak_restarts_confirmation_count() {
        let mut tracker = tracker(20, 3);
        tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        // Miss breaks the streak at 2
        tracker.track(&[]);
        // Two more matches: streak is 2 again, no confirmation yet
        tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        let update = tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        assert!(update.newly_confirmed.is_empty());
        // Third consecutive match confirms
        let update = tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        assert_eq!(update.newly_confirmed.len(), 1);
    }

    #[test]
    fn expired_track_is_not_resurrected() {
        let mut tracker = tracker(5, 1);
        let update = tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        assert_eq!(update.newly_confirmed.len(), 1);
        assert_eq!(update.tracks[0].id, 1);

        // Go dark past the age budget: removal once misses exceed max_age
        for _ in 0..5 {
            let update = tracker.track(&[]);
            assert_eq!(update.tracks.len(), 1, "still within the miss budget");
        }
        let update = tracker.track(&[]);
        assert!(update.tracks.is_empty());

        // Same spot again: a brand new identity, not track 1
        let update = tracker.track(&[det(10.0, 10.0, 50.0, 50.0)]);
        assert_eq!(update.tracks.len(), 1);
        assert_eq!(update.tracks[0].id, 2);
    }

    #[test]
    fn crossing_tracks_keep_their_identities() {
        let mut tracker = tracker(20, 1);
        // Two tracks approaching each other
        tracker.track(&[det(0.0, 0.0, 20.0, 20.0), det(100.0, 0.0, 120.0, 20.0)]);
        let mut left = 0.0;
        let mut right = 100.0;
        for _ in 0..8 {
            left += 5.0;
            right -= 5.0;
            let update = tracker.track(&[
                det(left, 0.0, left + 20.0, 20.0),
                det(right, 0.0, right + 20.0, 20.0),
            ]);
            assert_eq!(update.tracks.len(), 2);
        }
        // After passing through each other both identities survive, and the
        // rightward mover (track 1) still owns the lower box
        let update = tracker.track(&[det(45.0, 0.0, 65.0, 20.0), det(55.0, 0.0, 75.0, 20.0)]);
        let ids: Vec<u32> = update.tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(update.tracks[0].bbox.center_x() < update.tracks[1].bbox.center_x());
    }

    #[test]
    fn two_objects_get_distinct_identities() {
        let mut tracker = tracker(20, 3);
        let update = tracker.track(&[
            det(10.0, 10.0, 50.0, 50.0),
            det(200.0, 200.0, 240.0, 240.0),
        ]);
        let ids: Vec<u32> = update.tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_frames_are_valid_input() {
        let mut tracker = tracker(20, 3);
        let update = tracker.track(&[]);
        assert!(update.tracks.is_empty());
        assert!(update.newly_confirmed.is_empty());
        assert_eq!(tracker.frame_count(), 1);
    }
}
