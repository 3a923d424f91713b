//! Persistence of run reports.

use std::path::{Path, PathBuf};

use crate::catalog::ImageCatalog;
use crate::error::{Error, Result};
use crate::report::RunReport;

/// Well-known file name of a contestant's report.
pub const REPORT_FILE_NAME: &str = "results.json";

/// Reads and writes [`RunReport`] documents.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl Default for ResultStore {
    /// Store writing `results.json` in the working directory.
    fn default() -> Self {
        Self::new(REPORT_FILE_NAME)
    }
}

impl ResultStore {
    /// Store writing to an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store writing `results.json` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(REPORT_FILE_NAME))
    }

    /// Location of the report document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the report after checking it covers the whole catalog.
    pub fn save(&self, report: &RunReport, catalog: &ImageCatalog) -> Result<()> {
        report.check_complete(catalog)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Read the report stored at this store's path.
    pub fn read(&self) -> Result<RunReport> {
        Self::load(&self.path)
    }

    /// Read a report document from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<RunReport> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingReport(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::CorruptReport {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ImageRef;
    use crate::report::DetectedObject;

    fn two_image_catalog() -> ImageCatalog {
        ImageCatalog::from_images(vec![
            ImageRef::new(1, "/img/1.jpg"),
            ImageRef::new(2, "/img/2.jpg"),
        ])
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_dir(dir.path());

        let mut report = RunReport::new();
        report.total_runtime = 1.25;
        report.objects.insert(
            "1.jpg".to_string(),
            vec![
                DetectedObject::new(1, 0, 0, 10, 10),
                DetectedObject::new(4, 5, 6, 7, 8),
            ],
        );
        report.objects.insert("2.jpg".to_string(), Vec::new());

        store.save(&report, &two_image_catalog()).unwrap();
        let loaded = store.read().unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_save_refuses_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_dir(dir.path());

        let mut report = RunReport::new();
        report.objects.insert("1.jpg".to_string(), Vec::new());

        let err = store.save(&report, &two_image_catalog()).unwrap_err();
        assert!(matches!(err, Error::IncompleteResults { .. }));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResultStore::load(dir.path().join(REPORT_FILE_NAME)).unwrap_err();
        assert!(matches!(err, Error::MissingReport(_)));
    }

    #[test]
    fn test_load_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        std::fs::write(&path, r#"{"runtime": "fast", "objects": []}"#).unwrap();

        let err = ResultStore::load(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptReport { .. }));
    }
}
