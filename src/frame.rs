//! Ranking of one period into the bars that are shown.

use std::cmp::Ordering;

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{AggregatedSeries, SeriesPoint};
use crate::colors::{ColorPair, ColorResolver, resolve_or_fallback};
use crate::error::ConfigError;

/// Ids with this suffix are automation accounts and get no avatar.
pub const BOT_SUFFIX: &str = "[bot]";

pub fn is_bot(entity_id: &str) -> bool {
    entity_id.ends_with(BOT_SUFFIX)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position within the frame.
    pub rank: usize,
    pub entity_id: String,
    pub score: f64,
    pub colors: ColorPair,
    pub decorate_avatar: bool,
}

/// The top entities of one period, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFrame {
    pub period_key: String,
    pub max_bars: usize,
    pub entries: Vec<RankedEntry>,
}

impl RankedFrame {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Sorts by score, highest first, and keeps the first `max_bars` points.
///
/// The sort is stable, so equal scores keep the order they were ingested in.
/// `-0.0` and `0.0` count as equal.
pub fn top_points(points: &[SeriesPoint], max_bars: usize) -> Vec<SeriesPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(max_bars);
    sorted
}

/// Ranks `period_key` and resolves every surviving entity's colors.
///
/// A period that was never ingested gives an empty frame. Lookups run
/// concurrently; a failed lookup gets the fallback gradient.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidMaxBars`] when `max_bars` is zero.
pub async fn build_frame<R: ColorResolver + ?Sized>(
    series: &AggregatedSeries,
    period_key: &str,
    max_bars: usize,
    resolver: &R,
) -> Result<RankedFrame, ConfigError> {
    if max_bars == 0 {
        return Err(ConfigError::InvalidMaxBars(max_bars));
    }

    let top = top_points(series.get(period_key), max_bars);
    let colors = join_all(
        top.iter()
            .map(|point| resolve_or_fallback(resolver, point.entity_id())),
    )
    .await;

    let entries: Vec<RankedEntry> = top
        .into_iter()
        .zip(colors)
        .enumerate()
        .map(|(index, (SeriesPoint(entity_id, score), colors))| RankedEntry {
            rank: index + 1,
            decorate_avatar: !is_bot(&entity_id),
            entity_id,
            score,
            colors,
        })
        .collect();

    debug!(period = period_key, bars = entries.len(), "Frame built");

    Ok(RankedFrame {
        period_key: period_key.to_string(),
        max_bars,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ingest;
    use crate::colors::{PaletteColorResolver, fallback_colors};
    use crate::snapshot::ExtractedEntry;

    fn series(period: &str, points: &[(&str, f64)]) -> AggregatedSeries {
        let (year, month) = period.split_once('-').unwrap();
        let entries = points
            .iter()
            .map(|(id, score)| ExtractedEntry {
                entity_id: id.to_string(),
                score: *score,
                period_key: period.to_string(),
            })
            .collect();
        ingest(AggregatedSeries::new(), year, month, entries)
    }

    fn ids(frame: &RankedFrame) -> Vec<(&str, f64)> {
        frame
            .entries
            .iter()
            .map(|e| (e.entity_id.as_str(), e.score))
            .collect()
    }

    #[tokio::test]
    async fn test_ties_keep_feed_order() {
        let s = series("2023-01", &[("a", 10.0), ("b", 10.0), ("c", 5.0)]);

        let frame = build_frame(&s, "2023-01", 2, &PaletteColorResolver)
            .await
            .unwrap();

        assert_eq!(ids(&frame), vec![("a", 10.0), ("b", 10.0)]);
        assert_eq!(frame.entries[0].rank, 1);
        assert_eq!(frame.entries[1].rank, 2);
    }

    #[tokio::test]
    async fn test_sorted_descending_and_truncated() {
        let s = series(
            "2023-04",
            &[("low", 1.0), ("high", 9.0), ("mid", 4.0), ("mid2", 4.0), ("top", 12.5)],
        );

        let frame = build_frame(&s, "2023-04", 4, &PaletteColorResolver)
            .await
            .unwrap();

        assert_eq!(
            ids(&frame),
            vec![("top", 12.5), ("high", 9.0), ("mid", 4.0), ("mid2", 4.0)]
        );
        assert!(frame.len() <= 4);
    }

    #[test]
    fn test_signed_zero_ties_keep_feed_order() {
        let points = vec![
            SeriesPoint("first".to_string(), -0.0),
            SeriesPoint("second".to_string(), 0.0),
            SeriesPoint("third".to_string(), 1.0),
        ];

        let order: Vec<String> = top_points(&points, 3)
            .into_iter()
            .map(|SeriesPoint(id, _)| id)
            .collect();

        assert_eq!(order, vec!["third", "first", "second"]);
    }

    #[tokio::test]
    async fn test_missing_period_is_empty_frame() {
        let frame = build_frame(&AggregatedSeries::new(), "2023-01", 10, &PaletteColorResolver)
            .await
            .unwrap();
        assert!(frame.is_empty());
    }

    #[tokio::test]
    async fn test_zero_max_bars_rejected() {
        let s = series("2023-01", &[("a", 1.0)]);
        let result = build_frame(&s, "2023-01", 0, &PaletteColorResolver).await;
        assert_eq!(result, Err(ConfigError::InvalidMaxBars(0)));
    }

    #[tokio::test]
    async fn test_bots_stay_ranked_without_avatar() {
        let s = series("2023-01", &[("dependabot[bot]", 50.0), ("alice", 3.0)]);

        let frame = build_frame(&s, "2023-01", 10, &PaletteColorResolver)
            .await
            .unwrap();

        assert_eq!(frame.entries[0].entity_id, "dependabot[bot]");
        assert!(!frame.entries[0].decorate_avatar);
        assert!(frame.entries[1].decorate_avatar);
    }

    #[tokio::test]
    async fn test_resolver_error_uses_fallback() {
        // PaletteColorResolver refuses empty ids.
        let s = series("2023-01", &[("", 2.0)]);

        let frame = build_frame(&s, "2023-01", 10, &PaletteColorResolver)
            .await
            .unwrap();

        assert_eq!(frame.entries[0].colors, fallback_colors());
    }
}
