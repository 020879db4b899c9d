use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use openrank_race::aggregate::{AggregatedSeries, MonthRange, ingest};
use openrank_race::chart::{ChartComposer, compose};
use openrank_race::colors::{ColorPair, ColorResolver, PaletteColorResolver};
use openrank_race::config::{RaceOptions, ThemeMode};
use openrank_race::error::{ConfigError, FetchError, ResolverError};
use openrank_race::fetch::SnapshotSource;
use openrank_race::frame::build_frame;
use openrank_race::parser::parse_snapshot;
use openrank_race::race::compose_race;
use openrank_race::snapshot::Snapshot;
use openrank_race::sweep::sweep;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

const FIXTURE: &[u8] = include_bytes!("fixtures/project_openrank_detail_2023-01.json");

/// Serves the fixture for every listed month and 404 for the rest.
struct FixtureSource {
    available: Vec<String>,
}

#[async_trait]
impl SnapshotSource for FixtureSource {
    async fn fetch_month(&self, year: &str, month: &str) -> Result<Snapshot, FetchError> {
        let key = format!("{year}-{month}");
        if self.available.contains(&key) {
            parse_snapshot(FIXTURE, &key)
        } else {
            Err(FetchError::Http {
                status: StatusCode::NOT_FOUND,
            })
        }
    }
}

/// Fixed colors per id, failing for anything unknown.
struct TableResolver(HashMap<&'static str, [&'static str; 2]>);

#[async_trait]
impl ColorResolver for TableResolver {
    async fn get_colors(&self, entity_id: &str) -> Result<ColorPair, ResolverError> {
        self.0
            .get(entity_id)
            .map(|pair| pair.map(str::to_string))
            .ok_or_else(|| ResolverError::new(entity_id, "unknown"))
    }
}

#[test]
fn test_fixture_extraction() {
    let snapshot = parse_snapshot(FIXTURE, "2023-01").expect("Failed to parse fixture");
    let entries = snapshot.extract();

    assert_eq!(snapshot.records.len(), 7);
    assert_eq!(entries.len(), 5);
    for (entry, record) in entries.iter().zip(&snapshot.records) {
        assert_eq!(
            entry.score,
            record.rank_weight.unwrap() * record.magnitude.unwrap()
        );
        assert_eq!(entry.period_key, "2023-01");
    }
}

#[tokio::test]
async fn test_full_pipeline() {
    let snapshot = parse_snapshot(FIXTURE, "2023-01").unwrap();
    let series = ingest(AggregatedSeries::new(), "2023", "01", snapshot.extract());

    let resolver = TableResolver(HashMap::from([
        ("X-lab2017/open-digger", ["#000000", "#111111"]),
        ("frank-zsy", ["#222222", "#333333"]),
    ]));
    let frame = build_frame(&series, "2023-01", 3, &resolver).await.unwrap();

    let ranked: Vec<&str> = frame.entries.iter().map(|e| e.entity_id.as_str()).collect();
    // 21.25, then a 10.0 tie broken by feed order
    assert_eq!(ranked, vec!["X-lab2017/open-digger", "frank-zsy", "dependabot[bot]"]);
    assert!(!frame.entries[2].decorate_avatar);

    let config = compose(&frame, "2023-01", 1.0, true, ThemeMode::Dark).unwrap();
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["series"][0]["data"].as_array().unwrap().len(), 3);
    assert_eq!(
        json["series"][0]["data"][1]["itemStyle"]["color"]["colorStops"][0]["color"],
        "#222222"
    );
    assert_eq!(json["yAxis"]["max"], 3);
    assert_eq!(json["graphic"]["elements"][0]["style"]["text"], "2023-01");
    assert!(json["yAxis"]["axisLabel"]["rich"]["avatarfrankzsy"].is_object());
    assert!(json["yAxis"]["axisLabel"]["rich"]
        .get("avatardependabot[bot]")
        .is_none());
}

#[tokio::test]
async fn test_repeated_id_gives_one_bar() {
    let body = br#"{"nodes":[
        {"n":"alice","r":1,"v":2},
        {"n":"bob","r":1,"v":1},
        {"n":"alice","r":1,"v":5}
    ]}"#;
    let snapshot = parse_snapshot(body, "2023-05").unwrap();
    let series = ingest(AggregatedSeries::new(), "2023", "05", snapshot.extract());

    let frame = build_frame(&series, "2023-05", 10, &PaletteColorResolver)
        .await
        .unwrap();
    let ranked: Vec<(&str, f64)> = frame
        .entries
        .iter()
        .map(|e| (e.entity_id.as_str(), e.score))
        .collect();
    assert_eq!(ranked, vec![("alice", 5.0), ("bob", 1.0)]);

    let config = compose(&frame, "2023-05", 1.0, true, ThemeMode::Light).unwrap();
    assert_eq!(config.data_points(), 2);
}

#[tokio::test]
async fn test_missing_month_is_skipped() {
    let source = FixtureSource {
        available: vec!["2023-01".to_string(), "2023-03".to_string()],
    };
    let months = MonthRange::parse("2023-01", "2023-03").unwrap().months();

    let report = sweep(Arc::new(source), &months, 2, &CancellationToken::new()).await;

    assert_eq!(report.fetched, vec!["2023-01", "2023-03"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].period_key, "2023-02");
    assert!(report.series.get("2023-02").is_empty());
    assert_eq!(report.series.get("2023-03").len(), 5);
}

#[tokio::test]
async fn test_race_from_sweep() {
    let source = FixtureSource {
        available: vec!["2023-01".to_string(), "2023-02".to_string()],
    };
    let months = MonthRange::parse("2023-01", "2023-02").unwrap().months();
    let report = sweep(Arc::new(source), &months, 1, &CancellationToken::new()).await;

    let options = RaceOptions::new(2.0, 4, false).unwrap();
    let frames = compose_race(
        &report.series,
        &options,
        ThemeMode::Light,
        &PaletteColorResolver,
        &ChartComposer::new("https://avatars.example.test/"),
    )
    .await
    .unwrap();

    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(frame.config.data_points(), 4);
        assert_eq!(frame.config.animation_duration_update, 0.0);
    }
    let rich = frames[0].config.y_axis.axis_label.rich.as_ref().unwrap();
    assert_eq!(
        rich["avatarwillww"].background_color.image,
        "https://avatars.example.test/will-ww?s=48&v=4"
    );
}

#[test]
fn test_zero_speed_is_rejected() {
    let frame = openrank_race::frame::RankedFrame {
        period_key: "2023-01".to_string(),
        max_bars: 10,
        entries: vec![],
    };
    assert_eq!(
        compose(&frame, "2023-01", 0.0, true, ThemeMode::Light),
        Err(ConfigError::InvalidSpeed(0.0))
    );
}
