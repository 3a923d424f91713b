//! The timed batch loop.
//!
//! [`RunHarness`] feeds the detector one batch at a time. Decoding happens
//! before the clock starts; the measured interval brackets exactly the
//! detector call. Batch pixels are dropped before the next batch is loaded.

use std::fmt;
use std::time::Instant;

use tracing::{info, warn};

use crate::catalog::ImageCatalog;
use crate::decode::ImageDecoder;
use crate::error::{Error, Result};
use crate::report::{DetectionMap, ResultStore, RunReport};
use crate::run::config::HarnessConfig;
use crate::run::energy::{EnergyProbe, PowerMonitor};
use crate::run::loader::{BatchLoader, LoadedImage};

/// Lifecycle of a harness. A harness runs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    /// Constructed, not yet run.
    Idle,
    /// Inside [`RunHarness::run`].
    Running,
    /// Run finished, successfully or not.
    Done,
}

impl HarnessState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurements for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    /// 1-based batch number.
    pub index: usize,
    /// Images in the batch.
    pub images: usize,
    /// Detector wall-clock time in seconds.
    pub runtime: f64,
    /// Energy in joules, zero when untracked.
    pub energy: f64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The persisted report.
    pub report: RunReport,
    /// Per-batch measurements in processing order.
    pub batches: Vec<BatchStats>,
    /// Whether `report.total_energy` was measured.
    pub energy_tracked: bool,
}

/// Drives a detector over the catalog and persists its results.
///
/// # Example
///
/// ```rust,ignore
/// use detect_bench::{HarnessConfig, JpegDecoder, RunHarness};
///
/// let config = HarnessConfig::builder().image_dir("./images").build()?;
/// let mut harness = RunHarness::from_config(&config, JpegDecoder)?;
///
/// let summary = harness.run(|images| {
///     Ok(images
///         .iter()
///         .map(|img| (img.file_name(), my_detector(&img.pixels)))
///         .collect())
/// })?;
/// println!("runtime: {:.2}s", summary.report.total_runtime);
/// ```
pub struct RunHarness<D> {
    loader: BatchLoader<D>,
    store: ResultStore,
    energy: EnergyProbe,
    state: HarnessState,
}

impl<D: ImageDecoder> RunHarness<D> {
    /// Create a harness from a loader and the store the report goes to.
    #[must_use]
    pub fn new(loader: BatchLoader<D>, store: ResultStore) -> Self {
        Self {
            loader,
            store,
            energy: EnergyProbe::Absent,
            state: HarnessState::Idle,
        }
    }

    /// Enumerate the configured image directory and build a harness over it.
    pub fn from_config(config: &HarnessConfig, decoder: D) -> Result<Self> {
        let catalog = ImageCatalog::enumerate(&config.image_dir, &config.image_extension)?;
        info!(
            images = catalog.len(),
            dir = %config.image_dir.display(),
            "Catalog enumerated"
        );
        let loader = BatchLoader::new(catalog, config.batch_size, decoder)?;
        Ok(Self::new(loader, ResultStore::new(&config.report_path)))
    }

    /// Measure energy through `monitor`.
    #[must_use]
    pub fn with_power_monitor(mut self, monitor: impl PowerMonitor + 'static) -> Self {
        self.energy = EnergyProbe::Present(Box::new(monitor));
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> HarnessState {
        self.state
    }

    /// The catalog being benchmarked.
    #[must_use]
    pub fn catalog(&self) -> &ImageCatalog {
        self.loader.catalog()
    }

    /// Run `detect` over every batch, then write the report.
    ///
    /// `detect` receives the decoded images of one batch and must return
    /// exactly one entry per image, keyed by file name. Any error aborts the
    /// run without writing a report.
    pub fn run<F>(&mut self, detect: F) -> Result<RunSummary>
    where
        F: FnMut(&[LoadedImage]) -> Result<DetectionMap>,
    {
        if self.state != HarnessState::Idle {
            return Err(Error::HarnessState(self.state.as_str()));
        }

        self.state = HarnessState::Running;
        self.loader.reset();
        let outcome = self.run_batches(detect);
        self.state = HarnessState::Done;
        let (report, batches) = outcome?;

        info!(
            runtime = report.total_runtime,
            energy = report.total_energy,
            "Done all batches"
        );

        report.check_complete(self.loader.catalog())?;
        self.store.save(&report, self.loader.catalog())?;
        info!(path = %self.store.path().display(), "Results written");

        Ok(RunSummary {
            report,
            batches,
            energy_tracked: self.energy.is_tracked(),
        })
    }

    fn run_batches<F>(&mut self, mut detect: F) -> Result<(RunReport, Vec<BatchStats>)>
    where
        F: FnMut(&[LoadedImage]) -> Result<DetectionMap>,
    {
        let mut report = RunReport::new();
        let mut batches = Vec::with_capacity(self.loader.batch_count());

        loop {
            let batch = self.loader.next_batch();
            if batch.is_empty() {
                break;
            }
            let index = self.loader.batch_index();

            // Decoding is not part of the measured interval.
            let images = self.loader.materialize(&batch)?;
            info!(batch = index, images = images.len(), "Batch starting");

            self.energy.begin()?;
            let start = Instant::now();
            let detections = detect(&images);
            let runtime = start.elapsed().as_secs_f64();
            let energy = self.energy.finish(runtime)?;
            let detections = detections?;

            report.total_runtime += runtime;
            report.total_energy += energy;

            if detections.len() != images.len() {
                return Err(Error::ResultCountMismatch {
                    provided: images.len(),
                    returned: detections.len(),
                });
            }

            let replaced = report.merge(detections);
            if replaced > 0 {
                warn!(batch = index, replaced, "Detections overwrote earlier results");
            }

            info!(batch = index, runtime, energy, "Batch done");
            batches.push(BatchStats {
                index,
                images: images.len(),
                runtime,
                energy,
            });

            drop(images);
        }

        Ok((report, batches))
    }
}
