//! Image enumeration in a contest directory.

use std::fs;
use std::path::Path;

use crate::catalog::{ImageCatalog, ImageRef};
use crate::error::{Error, Result};

/// List `dir` (non-recursively) for files with `extension` and order them by id.
pub(crate) fn enumerate_images(dir: &Path, extension: &str) -> Result<ImageCatalog> {
    if !dir.exists() {
        return Err(Error::Catalog(format!("Path does not exist: {}", dir.display())));
    }

    if !dir.is_dir() {
        return Err(Error::Catalog(format!("Path is not a directory: {}", dir.display())));
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        Error::Catalog(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let wanted = extension.trim_start_matches('.');
    let mut images = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::Catalog(format!("Failed to read entry in {}: {}", dir.display(), e))
        })?;

        let path = entry.path();
        if !path.is_file() || !has_extension(&path, wanted) {
            continue;
        }

        let id = parse_identifier(&path)
            .ok_or_else(|| Error::MalformedCatalogEntry { path: path.clone() })?;
        images.push(ImageRef { id, path });
    }

    Ok(ImageCatalog::from_images(images))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext == extension)
}

fn parse_identifier(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_enumerate_sorts_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.jpg", "2.jpg", "1.jpg", "notes.txt", "3.png"] {
            touch(dir.path(), name);
        }

        let catalog = enumerate_images(dir.path(), "jpg").unwrap();
        assert_eq!(catalog.file_names(), vec!["1.jpg", "2.jpg", "10.jpg"]);
    }

    #[test]
    fn test_enumerate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["5.jpg", "4.jpg", "6.jpg"] {
            touch(dir.path(), name);
        }

        let first = enumerate_images(dir.path(), "jpg").unwrap();
        let second = enumerate_images(dir.path(), ".jpg").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_numeric_name_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "1.jpg");
        touch(dir.path(), "cat.jpg");

        let err = enumerate_images(dir.path(), "jpg").unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogEntry { ref path } if path.ends_with("cat.jpg")));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = enumerate_images(&dir.path().join("nope"), "jpg").unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }
}
