//! Contest image catalog.
//!
//! The catalog is the deterministic, ordered list of images a contestant is
//! benchmarked on. Images are keyed by the numeric identifier in their file
//! name (`17.jpg` has identifier 17) and always iterate in ascending
//! identifier order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use detect_bench::catalog::ImageCatalog;
//!
//! let catalog = ImageCatalog::enumerate("./images", "jpg")?;
//! for image in catalog.iter() {
//!     println!("{} -> {}", image.id, image.path.display());
//! }
//! ```

mod discovery;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Image extension used by the contest when none is configured.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// A single contest image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    /// Identifier parsed from the file stem.
    pub id: u64,

    /// Full path to the image.
    pub path: PathBuf,
}

impl ImageRef {
    /// Create an image reference.
    #[must_use]
    pub fn new(id: u64, path: impl Into<PathBuf>) -> Self {
        Self { id, path: path.into() }
    }

    /// File name used as the key in result reports (e.g. `17.jpg`).
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Ordered collection of contest images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCatalog {
    images: Vec<ImageRef>,
}

impl ImageCatalog {
    /// Enumerate the images in `dir` carrying the given extension.
    ///
    /// Fails with [`Error::MalformedCatalogEntry`](crate::Error::MalformedCatalogEntry)
    /// if a matching file does not have a numeric stem.
    pub fn enumerate(dir: impl AsRef<Path>, extension: &str) -> Result<Self> {
        discovery::enumerate_images(dir.as_ref(), extension)
    }

    /// Build a catalog from already known images, sorting them by identifier.
    #[must_use]
    pub fn from_images(mut images: Vec<ImageRef>) -> Self {
        images.sort_by_key(|img| img.id);
        Self { images }
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// All images in identifier order.
    #[must_use]
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Iterate over images in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter()
    }

    /// File names of all images, in catalog order.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.images.iter().map(ImageRef::file_name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_images_sorts_by_id() {
        let catalog = ImageCatalog::from_images(vec![
            ImageRef::new(10, "/img/10.jpg"),
            ImageRef::new(2, "/img/2.jpg"),
            ImageRef::new(7, "/img/7.jpg"),
        ]);
        let ids: Vec<u64> = catalog.iter().map(|img| img.id).collect();
        assert_eq!(ids, vec![2, 7, 10]);
    }

    #[test]
    fn test_image_ref_file_name() {
        let img = ImageRef::new(42, "/data/images/42.jpg");
        assert_eq!(img.file_name(), "42.jpg");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = ImageCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.file_names().is_empty());
    }
}
