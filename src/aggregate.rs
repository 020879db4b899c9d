//! Month-keyed grouping of extracted scores.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::snapshot::{ExtractedEntry, period_key};

/// One `(entity_id, score)` pair. Serializes as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub String, pub f64);

impl SeriesPoint {
    pub fn entity_id(&self) -> &str {
        &self.0
    }

    pub fn score(&self) -> f64 {
        self.1
    }
}

/// Scores grouped by `"YYYY-MM"` period.
///
/// Periods iterate in ascending key order, which for zero-padded keys is
/// chronological. Within a period, points stay in the order they were
/// ingested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedSeries {
    periods: BTreeMap<String, Vec<SeriesPoint>>,
}

impl AggregatedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points for `period_key`, empty if the month was never ingested.
    pub fn get(&self, period_key: &str) -> &[SeriesPoint] {
        self.periods
            .get(period_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn periods(&self) -> impl Iterator<Item = &str> {
        self.periods.keys().map(String::as_str)
    }

    pub fn contains(&self, period_key: &str) -> bool {
        self.periods.contains_key(period_key)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Number of points across every period.
    pub fn total_points(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }
}

/// Appends `entries` under `"{year}-{month}"`, creating the period if needed.
///
/// Ingesting the same month twice appends a second copy of its entries; it
/// does not replace the first.
pub fn ingest(
    mut series: AggregatedSeries,
    year: &str,
    month: &str,
    entries: Vec<ExtractedEntry>,
) -> AggregatedSeries {
    let points = series.periods.entry(period_key(year, month)).or_default();
    points.extend(
        entries
            .into_iter()
            .map(|entry| SeriesPoint(entry.entity_id, entry.score)),
    );
    series
}

/// Every `(year, month)` pair, years outer and months inner.
pub fn month_grid(years: &[String], months: &[String]) -> Vec<(String, String)> {
    years
        .iter()
        .flat_map(|year| months.iter().map(move |month| (year.clone(), month.clone())))
        .collect()
}

/// An inclusive range of calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl MonthRange {
    /// Parses two `"YYYY-MM"` bounds.
    pub fn parse(from: &str, to: &str) -> Result<Self, ConfigError> {
        let start = parse_month(from)?;
        let end = parse_month(to)?;
        if start > end {
            return Err(ConfigError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self {
            from: start,
            to: end,
        })
    }

    /// Zero-padded `(year, month)` pairs from the first month to the last.
    pub fn months(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let mut current = Some(self.from);
        while let Some(date) = current.filter(|d| *d <= self.to) {
            out.push((format!("{:04}", date.year()), format!("{:02}", date.month())));
            current = date.checked_add_months(Months::new(1));
        }
        out
    }
}

fn parse_month(value: &str) -> Result<NaiveDate, ConfigError> {
    let invalid = || ConfigError::InvalidMonth(value.to_string());
    if value.len() != 7 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").map_err(|_| invalid())
}
