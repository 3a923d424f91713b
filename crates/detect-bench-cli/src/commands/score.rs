//! Score command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use detect_bench::score::teams::{Scoreboard, TeamOutcome, score_teams};
use detect_bench::{ScoreCard, Scorer};

use super::fmt_metric;

pub fn run(
    teams_folder: &Path,
    label_folder: &Path,
    multiple_teams: bool,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    if !teams_folder.is_dir() {
        bail!("teams_folder is not a directory: {}", teams_folder.display());
    }

    let scorer = Scorer::default();
    let outcomes = score_teams(&scorer, teams_folder, label_folder, multiple_teams)
        .with_context(|| format!("Failed to score {}", teams_folder.display()))?;

    for outcome in &outcomes {
        print_outcome(outcome);
        println!();
    }

    let board = Scoreboard::from_outcomes(&outcomes);

    if let Some(path) = csv {
        board
            .write_csv(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved scoreboard to: {}", path.display());
    }

    if let Some(path) = json {
        board
            .write_json(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved scores to: {}", path.display());
    }

    let failures = board.failures();
    if failures > 0 {
        bail!("{} of {} teams could not be scored", failures, outcomes.len());
    }

    Ok(())
}

fn print_outcome(outcome: &TeamOutcome) {
    println!("Scoring group {}", outcome.dir.display());
    match &outcome.result {
        Ok(card) => print_card(card),
        Err(e) => println!("Error: {e}"),
    }
}

fn print_card(card: &ScoreCard) {
    println!("Runtime (s): {:.1}", card.runtime);
    if card.energy > 0.0 {
        println!("Energy (J): {:.1}", card.energy);
    }
    println!("# images: {}", card.label_files);
    if !card.skipped.is_empty() {
        println!("  Skipped (not in results): {}", card.skipped.len());
    }
    println!("Precision: {}", fmt_metric(card.metrics.precision, 3));
    println!("Recall: {}", fmt_metric(card.metrics.recall, 3));
    println!("F1 score: {}", fmt_metric(card.metrics.f1, 3));
    println!("fps: {}", fmt_metric(card.metrics.throughput, 2));
    if !card.metrics.is_defined() {
        println!("Note: undefined metrics have a zero denominator (no detections, no labels, or zero runtime)");
    }
}
