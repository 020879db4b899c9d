//! Output formatting and persistence for series, frames and chart configs.
//!
//! Supports pretty JSON files and CSV append of ranked frames.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::frame::RankedFrame;
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// One CSV row per ranked entity.
#[derive(Debug, Serialize)]
struct FrameRow<'a> {
    period_key: &'a str,
    rank: usize,
    entity_id: &'a str,
    score: f64,
    primary_color: &'a str,
    secondary_color: &'a str,
}

/// Writes `value` as pretty JSON to `path`, creating parent directories.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {path}"))?;
    debug!(path, "JSON written");
    Ok(())
}

/// Reads a JSON file written by [`write_json`].
pub fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_slice(&bytes).with_context(|| format!("{path} is not valid JSON"))
}

/// Appends every entry of `frame` as a row of a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_frame(path: &str, frame: &RankedFrame) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = frame.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on the first frame
        .from_writer(file);

    for entry in &frame.entries {
        let [primary, secondary] = &entry.colors;
        writer.serialize(FrameRow {
            period_key: &frame.period_key,
            rank: entry.rank,
            entity_id: &entry.entity_id,
            score: entry.score,
            primary_color: primary,
            secondary_color: secondary,
        })?;
    }
    writer.flush()?;

    Ok(())
}
