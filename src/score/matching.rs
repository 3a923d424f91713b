//! Greedy per-image matching of ground truth against detections.

use serde::Serialize;
use tracing::debug;

use crate::report::{DetectedObject, GoldenObject};
use crate::score::ScoreConfig;
use crate::score::iou::object_iou;

/// True/false positive and false negative counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreAccumulator {
    /// Ground-truth objects matched by a detection.
    pub true_positives: u64,
    /// Scored detections left unmatched.
    pub false_positives: u64,
    /// Ground-truth objects without a match.
    pub false_negatives: u64,
}

impl ScoreAccumulator {
    /// Add another set of counts.
    pub fn absorb(&mut self, other: &ScoreAccumulator) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

/// Best candidate found for one ground-truth object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Index into the image's detections, if any candidate had the same type.
    pub detection: Option<usize>,
    /// IoU with that candidate, 0 when there is none.
    pub iou: f64,
}

/// Find the remaining detection of the same type with the highest IoU.
///
/// Ties keep the earliest detection.
#[must_use]
pub fn best_match(golden: &GoldenObject, detections: &[DetectedObject], consumed: &[bool]) -> MatchResult {
    let mut best: Option<(usize, f64)> = None;

    for (idx, candidate) in detections.iter().enumerate() {
        if consumed[idx] || candidate.kind != golden.kind {
            continue;
        }

        let iou = object_iou(golden, candidate);
        if best.is_none_or(|(_, best_iou)| iou > best_iou) {
            best = Some((idx, iou));
        }
    }

    MatchResult {
        detection: best.map(|(idx, _)| idx),
        iou: best.map_or(0.0, |(_, iou)| iou),
    }
}

/// Score one image.
///
/// Ground-truth objects are processed in order; each may consume at most
/// one detection, which is then unavailable to later objects.
#[must_use]
pub fn score_image(
    golden: &[GoldenObject],
    detections: &[DetectedObject],
    config: &ScoreConfig,
) -> ScoreAccumulator {
    let mut counts = ScoreAccumulator::default();
    let mut consumed = vec![false; detections.len()];

    for labelled in golden {
        if labelled.kind >= config.ignore_type_floor {
            continue;
        }

        let result = best_match(labelled, detections, &consumed);
        debug!(golden = ?labelled, closest = ?result.detection.map(|i| detections[i]), iou = result.iou, "Golden object");

        match result.detection {
            Some(idx) if result.iou > config.iou_threshold => {
                consumed[idx] = true;
                counts.true_positives += 1;
            }
            _ => counts.false_negatives += 1,
        }
    }

    counts.false_positives = detections
        .iter()
        .zip(&consumed)
        .filter(|(obj, used)| !**used && config.penalized_types.contains(&obj.kind))
        .count() as u64;

    counts
}
