//! Fixed-size batch slicing and decoding.

use rayon::prelude::*;

use crate::catalog::{ImageCatalog, ImageRef};
use crate::decode::{ImageDecoder, PixelArray};
use crate::error::{Error, Result};

/// An image of the current batch with its decoded pixels.
pub struct LoadedImage {
    /// The catalog entry.
    pub image: ImageRef,

    /// Decoded RGB pixels.
    pub pixels: PixelArray,
}

impl LoadedImage {
    /// File name used as the result key.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.image.file_name()
    }
}

/// Hands out contiguous batches of the catalog.
pub struct BatchLoader<D> {
    catalog: ImageCatalog,
    batch_size: usize,
    cursor: usize,
    decoder: D,
}

impl<D: ImageDecoder> BatchLoader<D> {
    /// Create a loader over `catalog`.
    pub fn new(catalog: ImageCatalog, batch_size: usize, decoder: D) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be positive".to_string()));
        }

        Ok(Self {
            catalog,
            batch_size,
            cursor: 0,
            decoder,
        })
    }

    /// The catalog being sliced.
    #[must_use]
    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches handed out so far.
    #[must_use]
    pub fn batch_index(&self) -> usize {
        self.cursor
    }

    /// Number of non-empty batches in a full pass.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.catalog.len().div_ceil(self.batch_size)
    }

    /// Return the next batch and advance the cursor.
    ///
    /// An empty batch signals that the catalog is exhausted.
    pub fn next_batch(&mut self) -> Vec<ImageRef> {
        let images = self.catalog.images();
        let start = self.cursor.saturating_mul(self.batch_size).min(images.len());
        let end = start.saturating_add(self.batch_size).min(images.len());
        self.cursor += 1;
        images[start..end].to_vec()
    }

    /// Rewind to the first batch.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Decode every image of `batch`, keeping batch order.
    ///
    /// The first failure aborts the whole batch.
    pub fn materialize(&self, batch: &[ImageRef]) -> Result<Vec<LoadedImage>> {
        batch
            .par_iter()
            .map(|image| -> Result<LoadedImage> {
                let pixels = self.decoder.decode(&image.path)?;
                Ok(LoadedImage {
                    image: image.clone(),
                    pixels,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use imgref::ImgVec;
    use rgb::RGB8;

    use super::*;

    fn catalog(count: u64) -> ImageCatalog {
        ImageCatalog::from_images(
            (1..=count)
                .map(|id| ImageRef::new(id, format!("/img/{id}.jpg")))
                .collect(),
        )
    }

    fn solid(_: &Path) -> Result<PixelArray> {
        Ok(ImgVec::new(vec![RGB8::new(9, 9, 9); 4], 2, 2))
    }

    #[test]
    fn test_batches_cover_catalog_once() {
        for (count, size) in [(0, 3), (1, 1), (7, 3), (9, 3), (10, 1000), (5, 5)] {
            let mut loader = BatchLoader::new(catalog(count), size, solid).unwrap();
            let mut seen = Vec::new();
            loop {
                let batch = loader.next_batch();
                if batch.is_empty() {
                    break;
                }
                assert!(batch.len() <= size);
                seen.extend(batch.into_iter().map(|img| img.id));
            }
            assert_eq!(seen, (1..=count).collect::<Vec<_>>());
            assert_eq!(loader.batch_index(), loader.batch_count() + 1);
        }
    }

    #[test]
    fn test_final_batch_is_partial() {
        let mut loader = BatchLoader::new(catalog(3), 2, solid).unwrap();
        assert_eq!(loader.next_batch().len(), 2);
        assert_eq!(loader.next_batch().len(), 1);
        assert!(loader.next_batch().is_empty());
        assert!(loader.next_batch().is_empty());
    }

    #[test]
    fn test_reset_restarts_pass() {
        let mut loader = BatchLoader::new(catalog(4), 3, solid).unwrap();
        let first = loader.next_batch();
        loader.next_batch();
        loader.reset();
        assert_eq!(loader.batch_index(), 0);
        assert_eq!(loader.next_batch(), first);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(BatchLoader::new(catalog(1), 0, solid).is_err());
    }

    #[test]
    fn test_materialize_keeps_order() {
        let mut loader = BatchLoader::new(catalog(5), 5, solid).unwrap();
        let batch = loader.next_batch();
        let images = loader.materialize(&batch).unwrap();

        let names: Vec<String> = images.iter().map(LoadedImage::file_name).collect();
        assert_eq!(names, vec!["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]);
        assert!(images.iter().all(|img| img.pixels.width() == 2));
    }

    #[test]
    fn test_materialize_failure_is_fatal() {
        let failing = |path: &Path| -> Result<PixelArray> {
            if path.ends_with("2.jpg") {
                Err(Error::ImageDecode {
                    path: path.to_path_buf(),
                    reason: "truncated".to_string(),
                })
            } else {
                solid(path)
            }
        };

        let mut loader = BatchLoader::new(catalog(3), 3, failing).unwrap();
        let batch = loader.next_batch();
        let err = loader.materialize(&batch).err().unwrap();
        assert!(matches!(err, Error::ImageDecode { .. }));
    }
}
