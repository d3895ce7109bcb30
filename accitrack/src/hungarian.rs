//! Optimal assignment of detections to predicted tracks
//!
//! Greedy nearest-neighbor matching swaps identities when tracks cross under
//! occlusion, so matching is solved globally with the Kuhn-Munkres algorithm
//! over the full similarity matrix.

use ndarray::ArrayView2;
use pathfinding::prelude::{kuhn_munkres, Matrix};

/// Fixed-point scale applied to IoU scores before integer matching.
const WEIGHT_SCALE: f32 = 10_000.0;

/// One-to-one matching between track rows and detection columns.
#[derive(Debug, Clone, Default)]
pub struct AssignmentResult {
    /// Matched (track_idx, detection_idx) pairs, sorted by track index
    pub matches: Vec<(usize, usize)>,
    /// Track rows left without a detection this frame
    pub unmatched_tracks: Vec<usize>,
    /// Detection columns that matched no track
    pub unmatched_detections: Vec<usize>,
}

pub struct HungarianSolver;

impl HungarianSolver {
    /// Maximize total IoU over one-to-one (track, detection) pairs.
    ///
    /// Pairs scoring under `min_iou` are unassignable: they enter the
    /// optimizer with a zero weight (indistinguishable from "leave
    /// unmatched") and any that still appear in the optimal permutation are
    /// dropped from the result instead of being forced. Zero tracks or zero
    /// detections yields an empty, valid assignment. Tie-breaking between
    /// equal-score pairings follows the optimizer's internal order and is
    /// not otherwise specified.
    pub fn solve_iou(similarity: ArrayView2<f32>, min_iou: f32) -> AssignmentResult {
        let n_tracks = similarity.nrows();
        let n_detections = similarity.ncols();

        if n_tracks == 0 || n_detections == 0 {
            return AssignmentResult {
                matches: Vec::new(),
                unmatched_tracks: (0..n_tracks).collect(),
                unmatched_detections: (0..n_detections).collect(),
            };
        }

        // kuhn_munkres wants rows <= columns; solve the wide case transposed
        let transpose = n_tracks > n_detections;
        let (rows, cols) = if transpose {
            (n_detections, n_tracks)
        } else {
            (n_tracks, n_detections)
        };

        let mut weights = Matrix::new(rows, cols, 0i64);
        for t in 0..n_tracks {
            for d in 0..n_detections {
                let score = similarity[(t, d)];
                if score >= min_iou {
                    let w = (score * WEIGHT_SCALE) as i64;
                    if transpose {
                        weights[(d, t)] = w;
                    } else {
                        weights[(t, d)] = w;
                    }
                }
            }
        }

        let (_, assignment) = kuhn_munkres(&weights);

        let mut matches: Vec<(usize, usize)> = assignment
            .into_iter()
            .enumerate()
            .map(|(row, col)| if transpose { (col, row) } else { (row, col) })
            .filter(|&(t, d)| similarity[(t, d)] >= min_iou)
            .collect();
        matches.sort_unstable();

        let mut track_matched = vec![false; n_tracks];
        let mut detection_matched = vec![false; n_detections];
        for &(t, d) in &matches {
            track_matched[t] = true;
            detection_matched[d] = true;
        }

        AssignmentResult {
            matches,
            unmatched_tracks: (0..n_tracks).filter(|&t| !track_matched[t]).collect(),
            unmatched_detections: (0..n_detections)
                .filter(|&d| !detection_matched[d])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn prefers_diagonal_over_cross_pairing() {
        let sim = array![[0.9, 0.1], [0.1, 0.9]];
        let result = HungarianSolver::solve_iou(sim.view(), 0.05);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn global_optimum_beats_greedy_choice() {
        // Greedy takes (0,0) = 0.55 and strands track 1; the optimal
        // permutation takes the cross pairs for 0.5 + 0.5 = 1.0 total
        let sim = array![[0.55, 0.5], [0.5, 0.0]];
        let result = HungarianSolver::solve_iou(sim.view(), 0.3);
        assert_eq!(result.matches, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn below_threshold_pairs_are_left_unmatched() {
        let sim = array![[0.2, 0.1], [0.05, 0.25]];
        let result = HungarianSolver::solve_iou(sim.view(), 0.3);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
        assert_eq!(result.unmatched_detections, vec![0, 1]);
    }

    #[test]
    fn threshold_never_forces_a_bad_match() {
        // Track 1 overlaps nothing above the floor; it must stay unmatched
        // rather than absorb detection 1 at 0.1
        let sim = array![[0.8, 0.4], [0.1, 0.1]];
        let result = HungarianSolver::solve_iou(sim.view(), 0.3);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn empty_inputs_yield_empty_assignment() {
        let none = ndarray::Array2::<f32>::zeros((0, 3));
        let result = HungarianSolver::solve_iou(none.view(), 0.3);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let none = ndarray::Array2::<f32>::zeros((2, 0));
        let result = HungarianSolver::solve_iou(none.view(), 0.3);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
    }

    #[test]
    fn handles_more_tracks_than_detections() {
        let sim = array![[0.1], [0.9], [0.6]];
        let result = HungarianSolver::solve_iou(sim.view(), 0.3);
        assert_eq!(result.matches, vec![(1, 0)]);
        assert_eq!(result.unmatched_tracks, vec![0, 2]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn handles_more_detections_than_tracks() {
        let sim = array![[0.4, 0.9, 0.2]];
        let result = HungarianSolver::solve_iou(sim.view(), 0.3);
        assert_eq!(result.matches, vec![(0, 1)]);
        assert_eq!(result.unmatched_detections, vec![0, 2]);
    }
}
