//! # detect-bench
//!
//! Benchmark harness and scorer for image object-detection contests.
//!
//! The library follows a **callback-first design**: the contestant supplies a
//! detection callback, and this library handles batch delivery, timing,
//! energy accounting, report persistence and scoring.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use detect_bench::{HarnessConfig, JpegDecoder, RunHarness};
//!
//! let config = HarnessConfig::builder()
//!     .image_dir("./images")
//!     .batch_size(1000)
//!     .build()?;
//!
//! let mut harness = RunHarness::from_config(&config, JpegDecoder)?;
//! let summary = harness.run(|images| {
//!     // Your detection logic here: one entry per image, keyed by file name
//!     Ok(images.iter().map(|img| (img.file_name(), detect(&img.pixels))).collect())
//! })?;
//! ```
//!
//! Scoring happens offline against a directory of label files:
//!
//! ```rust,ignore
//! use detect_bench::{ResultStore, Scorer};
//!
//! let report = ResultStore::load("results.json")?;
//! let card = Scorer::default().score(&report, "labels".as_ref())?;
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`catalog`]: Ordered contest image catalog
//! - [`decode`]: Image decoding for batches
//! - [`run`]: Batch loader, timing harness and energy instrumentation
//! - [`report`]: Run report and its persistence
//! - [`score`]: IoU matching, metrics and multi-team scoring

pub mod catalog;
pub mod decode;
pub mod error;
pub mod report;
pub mod run;
pub mod score;

// Re-export commonly used types
pub use catalog::{ImageCatalog, ImageRef};
#[cfg(feature = "jpeg-decode")]
pub use decode::JpegDecoder;
pub use decode::{ImageDecoder, PixelArray};
pub use error::{Error, Result};
pub use report::{DetectedObject, DetectionMap, GoldenObject, ResultStore, RunReport};
pub use run::{
    BatchLoader, BatchStats, EnergyProbe, HarnessConfig, HarnessState, LoadedImage, PowerMonitor,
    PowerRail, RunHarness, RunSummary, SampledPowerMonitor,
};
pub use score::teams::{Scoreboard, TeamOutcome, score_teams};
pub use score::{Metrics, ScoreAccumulator, ScoreCard, ScoreConfig, Scorer};
