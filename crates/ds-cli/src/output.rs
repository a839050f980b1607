//! Writing summaries to the output directory.
//!
//! Each run produces a pair of files, `<date>.<n>.json` with the grouped
//! activities and the LLM response, and `<date>.<n>.md` with just the
//! response. `n` starts at 1 and picks the first free slot, so earlier runs
//! for the same day are never overwritten.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ds_core::GroupedActivities;
use serde::Serialize;

/// Everything a run produced for one day.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub activities: GroupedActivities,
    pub response: String,
}

/// Where a summary was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// First `<date>.<n>` pair for which neither file exists yet.
pub fn next_output_paths(dir: &Path, date: NaiveDate) -> OutputPaths {
    let stem = date.format("%Y-%m-%d").to_string();
    let mut counter: u32 = 1;
    loop {
        let paths = OutputPaths {
            json: dir.join(format!("{stem}.{counter}.json")),
            markdown: dir.join(format!("{stem}.{counter}.md")),
        };
        if !paths.json.exists() && !paths.markdown.exists() {
            return paths;
        }
        counter += 1;
    }
}

/// Writes both files for `summary`, creating `dir` if needed.
pub fn write_summary(dir: &Path, date: NaiveDate, summary: &Summary) -> Result<OutputPaths> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let paths = next_output_paths(dir, date);
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
    std::fs::write(&paths.json, json)
        .with_context(|| format!("failed to write {}", paths.json.display()))?;
    std::fs::write(&paths.markdown, summary.response.trim())
        .with_context(|| format!("failed to write {}", paths.markdown.display()))?;

    tracing::debug!(json = %paths.json.display(), markdown = %paths.markdown.display(), "wrote summary");
    Ok(paths)
}
