//! Frame-by-frame composition of a whole series.

use serde::Serialize;
use tracing::info;

use crate::aggregate::AggregatedSeries;
use crate::chart::{ChartComposer, ChartConfig};
use crate::colors::ColorResolver;
use crate::config::{RaceOptions, ThemeMode};
use crate::error::ConfigError;
use crate::frame::build_frame;

/// The chart config for one period of the race.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceFrame {
    pub period_key: String,
    pub config: ChartConfig,
}

/// Ranks `period_key` and composes its chart config.
pub async fn compose_period<R: ColorResolver + ?Sized>(
    series: &AggregatedSeries,
    period_key: &str,
    options: &RaceOptions,
    theme: ThemeMode,
    resolver: &R,
    composer: &ChartComposer,
) -> Result<ChartConfig, ConfigError> {
    options.validate()?;
    let frame = build_frame(series, period_key, options.max_bars, resolver).await?;
    composer.compose(
        &frame,
        period_key,
        options.speed,
        options.enable_animation,
        theme,
    )
}

/// Composes one config per period, in chronological order.
#[tracing::instrument(skip_all, fields(periods = series.len()))]
pub async fn compose_race<R: ColorResolver + ?Sized>(
    series: &AggregatedSeries,
    options: &RaceOptions,
    theme: ThemeMode,
    resolver: &R,
    composer: &ChartComposer,
) -> Result<Vec<RaceFrame>, ConfigError> {
    options.validate()?;

    let mut frames = Vec::with_capacity(series.len());
    for period_key in series.periods() {
        let config = compose_period(series, period_key, options, theme, resolver, composer).await?;
        frames.push(RaceFrame {
            period_key: period_key.to_string(),
            config,
        });
    }

    info!(frames = frames.len(), "Race composed");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ingest;
    use crate::colors::PaletteColorResolver;
    use crate::snapshot::{Snapshot, SnapshotRecord};

    fn two_month_series() -> AggregatedSeries {
        let jan = Snapshot::new("2023-01", vec![SnapshotRecord::new("alice", 2.0, 3.0)]);
        let feb = Snapshot::new(
            "2023-02",
            vec![
                SnapshotRecord::new("alice", 1.0, 1.0),
                SnapshotRecord::new("bob", 4.0, 2.0),
            ],
        );
        let series = ingest(AggregatedSeries::new(), "2023", "02", feb.extract());
        ingest(series, "2023", "01", jan.extract())
    }

    #[tokio::test]
    async fn test_race_has_one_frame_per_period_in_order() {
        let frames = compose_race(
            &two_month_series(),
            &RaceOptions::default(),
            ThemeMode::Light,
            &PaletteColorResolver,
            &ChartComposer::default(),
        )
        .await
        .unwrap();

        let periods: Vec<&str> = frames.iter().map(|f| f.period_key.as_str()).collect();
        assert_eq!(periods, vec!["2023-01", "2023-02"]);
        assert_eq!(frames[1].config.data_points(), 2);
        assert_eq!(
            frames[1].config.series[0].data[0].value,
            ("bob".to_string(), 8.0)
        );
    }

    #[tokio::test]
    async fn test_invalid_options_fail_before_composing() {
        let options = RaceOptions {
            speed: -1.0,
            ..RaceOptions::default()
        };

        let result = compose_race(
            &two_month_series(),
            &options,
            ThemeMode::Dark,
            &PaletteColorResolver,
            &ChartComposer::default(),
        )
        .await;

        assert_eq!(result, Err(ConfigError::InvalidSpeed(-1.0)));
    }
}
