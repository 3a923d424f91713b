//! Report command.

use std::path::Path;

use anyhow::{Context, Result};
use detect_bench::ResultStore;

pub fn run(path: &Path) -> Result<()> {
    let report = ResultStore::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let images = report.image_count();
    let objects = report.object_count();

    println!("Report: {}", path.display());
    println!("  Runtime: {:.3} s", report.total_runtime);
    println!("  Energy: {:.3} J", report.total_energy);
    println!("  Images: {}", images);
    println!("  Objects: {}", objects);
    if images > 0 {
        println!("  Objects per image: {:.2}", objects as f64 / images as f64);
    }

    let mut by_type = std::collections::BTreeMap::<i64, usize>::new();
    for obj in report.objects.values().flatten() {
        *by_type.entry(obj.kind).or_default() += 1;
    }
    if !by_type.is_empty() {
        println!("  By type:");
        for (kind, count) in by_type {
            println!("    {:>3}: {}", kind, count);
        }
    }

    Ok(())
}
