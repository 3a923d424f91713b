//! Detection results and the persisted run report.
//!
//! A [`RunReport`] accumulates the wall-clock runtime, the energy spent and
//! the objects detected per image over a complete run. It serializes to the
//! contest's report document:
//!
//! ```json
//! {
//!   "runtime": 12.5,
//!   "energy": 0.0,
//!   "objects": {
//!     "1.jpg": [{ "type": 1, "x": 10, "y": 20, "width": 30, "height": 40 }]
//!   }
//! }
//! ```

mod store;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::ImageCatalog;
use crate::error::{Error, Result};

pub use store::{REPORT_FILE_NAME, ResultStore};

/// Number of missing file names quoted in an [`Error::IncompleteResults`].
const MISSING_SAMPLE: usize = 5;

/// An object located in an image, in pixel units with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Category code. 0 means background, 8 and above are not scored.
    #[serde(rename = "type")]
    pub kind: i64,

    /// Left edge.
    pub x: i64,

    /// Top edge.
    pub y: i64,

    /// Box width.
    pub width: i64,

    /// Box height.
    pub height: i64,
}

impl DetectedObject {
    /// Create an object of category `kind` at `(x, y)` with the given size.
    #[must_use]
    pub fn new(kind: i64, x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { kind, x, y, width, height }
    }
}

/// Ground-truth objects share the shape of detections.
pub type GoldenObject = DetectedObject;

/// Detections keyed by image file name.
pub type DetectionMap = BTreeMap<String, Vec<DetectedObject>>;

/// Accumulated result of a benchmark run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Total detector wall-clock time in seconds.
    #[serde(rename = "runtime")]
    pub total_runtime: f64,

    /// Total energy in joules; zero when energy is not tracked.
    #[serde(rename = "energy", default)]
    pub total_energy: f64,

    /// Detections per image file name.
    pub objects: DetectionMap,
}

impl RunReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one batch of detections.
    ///
    /// Entries for file names already present are overwritten. Returns how
    /// many entries were replaced that way.
    pub fn merge(&mut self, batch: DetectionMap) -> usize {
        let mut replaced = 0;
        for (name, objects) in batch {
            if self.objects.insert(name, objects).is_some() {
                replaced += 1;
            }
        }
        replaced
    }

    /// Number of images with a result entry.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of detected objects over all images.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    /// Check that the result keys are exactly the catalog's file names.
    pub fn check_complete(&self, catalog: &ImageCatalog) -> Result<()> {
        let expected: BTreeSet<String> = catalog.file_names().into_iter().collect();
        let covers = expected.len() == self.objects.len()
            && expected.iter().all(|name| self.objects.contains_key(name));

        if covers {
            return Ok(());
        }

        let missing = expected
            .iter()
            .filter(|name| !self.objects.contains_key(*name))
            .take(MISSING_SAMPLE)
            .cloned()
            .collect();

        Err(Error::IncompleteResults {
            expected: catalog.len(),
            actual: self.objects.len(),
            missing,
        })
    }
}
