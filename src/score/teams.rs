//! Scoring a folder of team submissions.
//!
//! Each team directory holds its own `results.json`. Teams are scored
//! independently: a missing or corrupt report fails that team only.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::report::ResultStore;
use crate::score::{ScoreCard, Scorer, list_label_files};

/// Scoring result of one team.
#[derive(Debug)]
pub struct TeamOutcome {
    /// Team name (directory name).
    pub name: String,
    /// Team directory.
    pub dir: PathBuf,
    /// Score, or why the team could not be scored.
    pub result: Result<ScoreCard>,
}

/// Directories to score under `root`.
///
/// With `multiple`, every subdirectory of `root` is a team (sorted by
/// name); otherwise `root` itself is the only team.
pub fn team_dirs(root: &Path, multiple: bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::MissingTeams(root.to_path_buf()));
    }

    if !multiple {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Score the report stored in `team_dir`.
pub fn score_team(scorer: &Scorer, team_dir: &Path, label_dir: &Path) -> Result<ScoreCard> {
    let report_path = team_dir.join(&scorer.config().report_file_name);
    info!(team = %team_dir.display(), report = %report_path.display(), "Scoring group");

    let report = ResultStore::load(&report_path)?;
    scorer.score(&report, label_dir)
}

/// Score every team under `root`.
///
/// Fails as a whole only when `root` or `label_dir` is unusable; per-team
/// failures are returned in the outcomes.
pub fn score_teams(
    scorer: &Scorer,
    root: &Path,
    label_dir: &Path,
    multiple: bool,
) -> Result<Vec<TeamOutcome>> {
    let dirs = team_dirs(root, multiple)?;
    list_label_files(label_dir)?;

    Ok(dirs
        .into_iter()
        .map(|dir| {
            let result = score_team(scorer, &dir, label_dir);
            if let Err(ref e) = result {
                error!(team = %dir.display(), error = %e, "Team could not be scored");
            }
            TeamOutcome {
                name: team_name(&dir),
                dir,
                result,
            }
        })
        .collect())
}

fn team_name(dir: &Path) -> String {
    dir.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// One row of a [`Scoreboard`].
#[derive(Debug, Clone, Serialize)]
pub struct ScoreboardEntry {
    /// Team name.
    pub team: String,
    /// Score, when the team could be scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreCard>,
    /// Failure message otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Results of a multi-team scoring pass.
#[derive(Debug, Clone, Serialize)]
pub struct Scoreboard {
    /// When scoring finished.
    pub generated_at: DateTime<Utc>,
    /// One entry per team, in scoring order.
    pub teams: Vec<ScoreboardEntry>,
}

impl Scoreboard {
    /// Collect outcomes into a scoreboard.
    #[must_use]
    pub fn from_outcomes(outcomes: &[TeamOutcome]) -> Self {
        let teams = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(card) => ScoreboardEntry {
                    team: outcome.name.clone(),
                    score: Some(card.clone()),
                    error: None,
                },
                Err(e) => ScoreboardEntry {
                    team: outcome.name.clone(),
                    score: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            teams,
        }
    }

    /// Number of teams that could not be scored.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.teams.iter().filter(|t| t.error.is_some()).count()
    }

    /// Write the full scoreboard as JSON. Undefined metrics become `null`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write one CSV row per team.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record([
            "team",
            "runtime_s",
            "energy_j",
            "images",
            "skipped",
            "true_positives",
            "false_positives",
            "false_negatives",
            "precision",
            "recall",
            "f1",
            "fps",
            "error",
        ])?;

        for entry in &self.teams {
            let row = match &entry.score {
                Some(card) => vec![
                    entry.team.clone(),
                    format!("{:.3}", card.runtime),
                    format!("{:.3}", card.energy),
                    card.label_files.to_string(),
                    card.skipped.len().to_string(),
                    card.counts.true_positives.to_string(),
                    card.counts.false_positives.to_string(),
                    card.counts.false_negatives.to_string(),
                    csv_metric(card.metrics.precision, 3),
                    csv_metric(card.metrics.recall, 3),
                    csv_metric(card.metrics.f1, 3),
                    csv_metric(card.metrics.throughput, 2),
                    String::new(),
                ],
                None => {
                    let mut row = vec![entry.team.clone()];
                    row.extend(std::iter::repeat_n(String::new(), 11));
                    row.push(entry.error.clone().unwrap_or_default());
                    row
                }
            };
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn csv_metric(value: f64, precision: usize) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:.precision$}")
    }
}
