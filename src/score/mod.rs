//! Offline scoring of a run report against ground-truth labels.
//!
//! - [`iou`]: bounding-box intersection over union
//! - [`matching`]: greedy per-image assignment and confusion counters
//! - [`teams`]: scoring a folder of team submissions
//!
//! ## Example
//!
//! ```rust,ignore
//! use detect_bench::{ResultStore, Scorer, ScoreConfig};
//!
//! let report = ResultStore::load("team_a/results.json")?;
//! let card = Scorer::new(ScoreConfig::default()).score(&report, "labels".as_ref())?;
//! println!("F1: {:.3}", card.metrics.f1);
//! ```

pub mod iou;
pub mod matching;
pub mod teams;

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::DEFAULT_IMAGE_EXTENSION;
use crate::error::{Error, Result};
use crate::report::{GoldenObject, REPORT_FILE_NAME, RunReport};

pub use matching::{MatchResult, ScoreAccumulator, best_match, score_image};

/// Scoring parameters.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Extension substituted into label file names to find the image entry.
    pub image_extension: String,

    /// A match needs an IoU strictly above this.
    pub iou_threshold: f64,

    /// Ground-truth objects of this type or higher are ignored.
    pub ignore_type_floor: i64,

    /// Unmatched detections of these types count as false positives.
    pub penalized_types: RangeInclusive<i64>,

    /// Report file name inside a team directory.
    pub report_file_name: String,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            iou_threshold: 0.5,
            ignore_type_floor: 8,
            penalized_types: 1..=7,
            report_file_name: REPORT_FILE_NAME.to_string(),
        }
    }
}

/// Aggregate detection quality and speed.
///
/// A ratio whose denominator is zero is `NaN`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Metrics {
    /// TP / (TP + FP).
    pub precision: f64,
    /// TP / (TP + FN).
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Label files per second of detector runtime.
    pub throughput: f64,
}

impl Metrics {
    /// Derive metrics from global counts.
    #[must_use]
    pub fn compute(counts: &ScoreAccumulator, image_count: usize, runtime: f64) -> Self {
        let tp = counts.true_positives as f64;
        let fp = counts.false_positives as f64;
        let fneg = counts.false_negatives as f64;

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fneg);
        let f1 = if precision.is_nan() || recall.is_nan() || precision + recall == 0.0 {
            f64::NAN
        } else {
            // Same value as 2PR / (P + R), without the intermediate rounding.
            2.0 * tp / (2.0 * tp + fp + fneg)
        };

        Self {
            precision,
            recall,
            f1,
            throughput: ratio(image_count as f64, runtime),
        }
    }

    /// Whether every metric is defined.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        !(self.precision.is_nan()
            || self.recall.is_nan()
            || self.f1.is_nan()
            || self.throughput.is_nan())
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 { f64::NAN } else { num / den }
}

/// Per-image counts kept for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct ImageScore {
    /// Image file name.
    pub name: String,
    /// Counts for this image.
    pub counts: ScoreAccumulator,
}

/// Result of scoring one report.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    /// Runtime recorded in the report, seconds.
    pub runtime: f64,
    /// Energy recorded in the report, joules.
    pub energy: f64,
    /// Number of label files considered.
    pub label_files: usize,
    /// Images with labels but no entry in the report.
    pub skipped: Vec<String>,
    /// Global counts.
    pub counts: ScoreAccumulator,
    /// Derived metrics.
    pub metrics: Metrics,
    /// Counts per scored image, in label order.
    pub images: Vec<ImageScore>,
}

/// Scores reports against a label directory.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoreConfig,
}

impl Scorer {
    /// Create a scorer.
    #[must_use]
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// The scoring parameters.
    #[must_use]
    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Score `report` against every label file in `label_dir`.
    ///
    /// Label files whose image is absent from the report are skipped with a
    /// warning and count toward nothing but the image total.
    pub fn score(&self, report: &RunReport, label_dir: &Path) -> Result<ScoreCard> {
        let label_files = list_label_files(label_dir)?;

        let mut counts = ScoreAccumulator::default();
        let mut images = Vec::new();
        let mut skipped = Vec::new();

        for label in &label_files {
            let name = self.image_name(label);
            debug!(image = %name, "Scoring image");

            let Some(detections) = report.objects.get(&name) else {
                warn!(image = %name, "Skipping image because it was not in the results");
                skipped.push(name);
                continue;
            };

            let golden = load_labels(label)?;
            let image_counts = score_image(&golden, detections, &self.config);
            debug!(
                image = %name,
                true_positives = image_counts.true_positives,
                false_positives = image_counts.false_positives,
                false_negatives = image_counts.false_negatives,
                "Image scored"
            );

            counts.absorb(&image_counts);
            images.push(ImageScore {
                name,
                counts: image_counts,
            });
        }

        debug!(
            true_positives = counts.true_positives,
            false_positives = counts.false_positives,
            false_negatives = counts.false_negatives,
            "Global counts"
        );

        Ok(ScoreCard {
            runtime: report.total_runtime,
            energy: report.total_energy,
            label_files: label_files.len(),
            skipped,
            counts,
            metrics: Metrics::compute(&counts, label_files.len(), report.total_runtime),
            images,
        })
    }

    fn image_name(&self, label: &Path) -> String {
        label
            .with_extension(&self.config.image_extension)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Label files in `dir`, sorted by name. Hidden files are ignored.
pub fn list_label_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingLabels(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read the ground-truth objects of one image.
pub fn load_labels(path: &Path) -> Result<Vec<GoldenObject>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::CorruptLabel {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DetectedObject;

    fn write_labels(dir: &Path, name: &str, objects: &[DetectedObject]) {
        fs::write(dir.join(name), serde_json::to_string(objects).unwrap()).unwrap();
    }

    fn counts(tp: u64, fp: u64, fneg: u64) -> ScoreAccumulator {
        ScoreAccumulator {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fneg,
        }
    }

    #[test]
    fn test_metrics_arithmetic() {
        let metrics = Metrics::compute(&counts(8, 2, 2), 10, 4.0);
        assert_eq!(metrics.precision, 0.8);
        assert_eq!(metrics.recall, 0.8);
        assert_eq!(metrics.f1, 0.8);
        assert_eq!(metrics.throughput, 2.5);
        assert!(metrics.is_defined());
    }

    #[test]
    fn test_metrics_undefined_precision() {
        let metrics = Metrics::compute(&counts(0, 0, 3), 1, 1.0);
        assert!(metrics.precision.is_nan());
        assert_eq!(metrics.recall, 0.0);
        assert!(metrics.f1.is_nan());
        assert!(!metrics.is_defined());
    }

    #[test]
    fn test_metrics_zero_precision_and_recall() {
        let metrics = Metrics::compute(&counts(0, 2, 3), 1, 1.0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert!(metrics.f1.is_nan());
    }

    #[test]
    fn test_metrics_zero_runtime() {
        let metrics = Metrics::compute(&counts(1, 0, 0), 3, 0.0);
        assert!(metrics.throughput.is_nan());
    }

    #[test]
    fn test_score_report() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(
            dir.path(),
            "1.json",
            &[DetectedObject::new(1, 0, 0, 10, 10), DetectedObject::new(1, 1, 1, 10, 10)],
        );
        write_labels(dir.path(), "2.json", &[DetectedObject::new(3, 40, 40, 10, 10)]);
        write_labels(dir.path(), "3.json", &[DetectedObject::new(2, 0, 0, 5, 5)]);

        let mut report = RunReport::new();
        report.total_runtime = 1.5;
        report.objects.insert("1.jpg".to_string(), vec![DetectedObject::new(1, 0, 0, 10, 10)]);
        report.objects.insert(
            "2.jpg".to_string(),
            vec![DetectedObject::new(3, 41, 40, 10, 10), DetectedObject::new(5, 0, 0, 3, 3)],
        );

        let card = Scorer::default().score(&report, dir.path()).unwrap();

        assert_eq!(card.label_files, 3);
        assert_eq!(card.skipped, vec!["3.jpg"]);
        assert_eq!(card.counts, counts(2, 1, 1));
        assert_eq!(card.images.len(), 2);
        assert_eq!(card.images[0].name, "1.jpg");
        assert_eq!(card.images[0].counts, counts(1, 0, 1));
        assert_eq!(card.metrics.throughput, 2.0);
    }

    #[test]
    fn test_score_leaves_report_untouched() {
        let dir = tempfile::tempdir().unwrap();
        write_labels(dir.path(), "1.json", &[DetectedObject::new(1, 0, 0, 10, 10)]);

        let mut report = RunReport::new();
        report.total_runtime = 1.0;
        report.objects.insert("1.jpg".to_string(), vec![DetectedObject::new(1, 0, 0, 10, 10)]);
        let before = report.clone();

        let scorer = Scorer::default();
        let first = scorer.score(&report, dir.path()).unwrap();
        let second = scorer.score(&report, dir.path()).unwrap();
        assert_eq!(report, before);
        assert_eq!(first.counts, second.counts);
    }

    #[test]
    fn test_missing_label_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scorer::default()
            .score(&RunReport::new(), &dir.path().join("labels"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingLabels(_)));
    }

    #[test]
    fn test_corrupt_label() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.json"), "{not json").unwrap();

        let mut report = RunReport::new();
        report.objects.insert("1.jpg".to_string(), Vec::new());

        let err = Scorer::default().score(&report, dir.path()).unwrap_err();
        assert!(matches!(err, Error::CorruptLabel { .. }));
    }

    #[test]
    fn test_label_listing_is_sorted_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", ".hidden", "a.json"] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_label_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
