//! Catalog command.

use std::path::Path;

use anyhow::{Context, Result};
use detect_bench::{BatchLoader, ImageCatalog, PixelArray};

pub fn run(image_dir: &Path, batch_size: usize, extension: &str, verbose: bool) -> Result<()> {
    let catalog = ImageCatalog::enumerate(image_dir, extension)
        .with_context(|| format!("Failed to enumerate images in {}", image_dir.display()))?;

    // Batches are only listed here, never decoded.
    let no_decode = |path: &Path| -> detect_bench::Result<PixelArray> {
        Err(detect_bench::Error::ImageDecode {
            path: path.to_path_buf(),
            reason: "decoding disabled".to_string(),
        })
    };
    let mut loader = BatchLoader::new(catalog, batch_size, no_decode)?;

    println!("Images: {}", loader.catalog().len());
    println!("Batch size: {}", loader.batch_size());
    println!("Batches: {}", loader.batch_count());

    loop {
        let batch = loader.next_batch();
        let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
            break;
        };
        println!(
            "  Batch {:>4}: {:>5} images, ids {}..={}",
            loader.batch_index(),
            batch.len(),
            first.id,
            last.id
        );
        if verbose {
            for image in &batch {
                println!("    {}", image.file_name());
            }
        }
    }

    Ok(())
}
