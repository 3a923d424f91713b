//! Harness configuration.

use std::path::PathBuf;

use crate::catalog::DEFAULT_IMAGE_EXTENSION;
use crate::error::{Error, Result};
use crate::report::REPORT_FILE_NAME;

/// Images per batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Configuration for a benchmark run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory holding the contest images.
    pub image_dir: PathBuf,

    /// Maximum number of images handed to the detector at once.
    pub batch_size: usize,

    /// Extension of the contest images, without the dot.
    pub image_extension: String,

    /// Where the report is written.
    pub report_path: PathBuf,
}

impl HarnessConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }
}

/// Builder for [`HarnessConfig`].
#[derive(Debug, Default)]
pub struct HarnessConfigBuilder {
    image_dir: Option<PathBuf>,
    batch_size: Option<usize>,
    image_extension: Option<String>,
    report_path: Option<PathBuf>,
}

impl HarnessConfigBuilder {
    /// Set the image directory.
    #[must_use]
    pub fn image_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(path.into());
        self
    }

    /// Set the batch size.
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Set the image extension.
    #[must_use]
    pub fn image_extension(mut self, ext: &str) -> Self {
        self.image_extension = Some(ext.trim_start_matches('.').to_string());
        self
    }

    /// Set the report path.
    #[must_use]
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Fails if no image directory was given or the batch size is zero.
    pub fn build(self) -> Result<HarnessConfig> {
        let image_dir = self
            .image_dir
            .ok_or_else(|| Error::InvalidConfig("image_dir is required".to_string()))?;

        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be positive".to_string()));
        }

        Ok(HarnessConfig {
            image_dir,
            batch_size,
            image_extension: self
                .image_extension
                .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string()),
            report_path: self.report_path.unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME)),
        })
    }
}
