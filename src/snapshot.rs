//! One month of the openrank feed and the scores derived from it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

/// Builds the `"YYYY-MM"` key a month is stored under.
pub fn period_key(year: &str, month: &str) -> String {
    format!("{year}-{month}")
}

/// A single node of the feed, reduced to the three fields the ranking needs.
///
/// A factor is `None` when the feed omitted it or sent something that is not a
/// number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
    pub entity_id: Option<String>,
    pub rank_weight: Option<f64>,
    pub magnitude: Option<f64>,
}

impl SnapshotRecord {
    pub fn new(entity_id: &str, rank_weight: f64, magnitude: f64) -> Self {
        Self {
            entity_id: Some(entity_id.to_string()),
            rank_weight: Some(rank_weight),
            magnitude: Some(magnitude),
        }
    }

    /// `rank_weight * magnitude`, or `None` if either factor is missing or the
    /// product is not finite.
    pub fn score(&self) -> Option<f64> {
        let score = self.rank_weight? * self.magnitude?;
        score.is_finite().then_some(score)
    }
}

/// Raw feed for one month. Not modified after it is fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub period_key: String,
    pub records: Vec<SnapshotRecord>,
}

/// A scored entity for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedEntry {
    pub entity_id: String,
    pub score: f64,
    pub period_key: String,
}

impl Snapshot {
    pub fn new(period_key: impl Into<String>, records: Vec<SnapshotRecord>) -> Self {
        Self {
            period_key: period_key.into(),
            records,
        }
    }

    /// Maps every complete record to an [`ExtractedEntry`], keeping feed order.
    ///
    /// Records without an id, without either factor, or whose score would not
    /// be finite are dropped. An id repeated within the month keeps the slot of
    /// its first occurrence and the score of its last.
    pub fn extract(&self) -> Vec<ExtractedEntry> {
        let mut entries: Vec<ExtractedEntry> = Vec::with_capacity(self.records.len());
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut incomplete = 0usize;
        let mut repeated = 0usize;

        for record in &self.records {
            let (Some(entity_id), Some(score)) = (record.entity_id.as_deref(), record.score())
            else {
                incomplete += 1;
                continue;
            };

            match slots.get(entity_id) {
                Some(&slot) => {
                    entries[slot].score = score;
                    repeated += 1;
                }
                None => {
                    slots.insert(entity_id, entries.len());
                    entries.push(ExtractedEntry {
                        entity_id: entity_id.to_string(),
                        score,
                        period_key: self.period_key.clone(),
                    });
                }
            }
        }

        if incomplete > 0 || repeated > 0 {
            debug!(
                period = %self.period_key,
                incomplete,
                repeated,
                kept = entries.len(),
                "Dropped snapshot records"
            );
        }

        entries
    }
}
