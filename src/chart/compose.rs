use std::collections::BTreeMap;

use crate::config::{DEFAULT_AVATAR_BASE_URL, ThemeMode, validate_speed};
use crate::error::ConfigError;
use crate::frame::{RankedEntry, RankedFrame, is_bot};

use super::option::{
    AxisLabel, AxisTick, BarDataPoint, BarSeries, CategoryAxis, CategoryFormatter, ChartConfig,
    ColorStop, Encode, Graphic, Grid, ItemStyle, LinearGradient, RichBackground, RichStyle,
    SeriesLabel, TextElement, TextStyle, ValueAxis,
};

/// Frame interval at speed 1.0, in milliseconds.
pub const BASE_FREQUENCY_MS: f64 = 2000.0;
/// Reordering animation of the category axis, in milliseconds.
pub const AXIS_UPDATE_MS: f64 = 200.0;
pub const DARK_TEXT_COLOR: &str = "rgba(230, 237, 243, 0.9)";
const LIGHT_WATERMARK_COLOR: &str = "rgba(100, 100, 100, 0.3)";
const AVATAR_HEIGHT: u32 = 20;

/// `BASE_FREQUENCY_MS / speed`.
pub fn frame_interval(speed: f64) -> Result<f64, ConfigError> {
    validate_speed(speed)?;
    Ok(BASE_FREQUENCY_MS / speed)
}

/// Rich-text style name for an entity's avatar. Rich names cannot hold `-`.
pub fn rich_key(entity_id: &str) -> String {
    format!("avatar{}", entity_id.replace('-', ""))
}

/// Category label with the inline avatar glyph, or the plain id for bots and
/// empty ids.
pub fn format_label(entity_id: &str) -> String {
    if entity_id.is_empty() || is_bot(entity_id) {
        return entity_id.to_string();
    }
    format!("{entity_id} {{{}|}}", rich_key(entity_id))
}

/// Builds chart configs; holds where avatar images are served from.
#[derive(Debug, Clone)]
pub struct ChartComposer {
    avatar_base_url: String,
}

impl Default for ChartComposer {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_BASE_URL)
    }
}

impl ChartComposer {
    pub fn new(avatar_base_url: impl Into<String>) -> Self {
        Self {
            avatar_base_url: avatar_base_url.into(),
        }
    }

    pub fn avatar_url(&self, entity_id: &str) -> String {
        format!(
            "{}/{entity_id}?s=48&v=4",
            self.avatar_base_url.trim_end_matches('/')
        )
    }

    /// Assembles the chart config for one frame.
    ///
    /// With `animation_enabled` false every update duration is zero and the
    /// rest of the config is unchanged.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSpeed`] for a non-positive or non-finite `speed`,
    /// [`ConfigError::InvalidMaxBars`] for a frame built with zero bars. No
    /// config is produced in either case.
    pub fn compose(
        &self,
        frame: &RankedFrame,
        period_key: &str,
        speed: f64,
        animation_enabled: bool,
        theme: ThemeMode,
    ) -> Result<ChartConfig, ConfigError> {
        let update_frequency = frame_interval(speed)?;
        if frame.max_bars == 0 {
            return Err(ConfigError::InvalidMaxBars(frame.max_bars));
        }

        let text_color = match theme {
            ThemeMode::Light => None,
            ThemeMode::Dark => Some(DARK_TEXT_COLOR.to_string()),
        };
        let animated = |duration: f64| if animation_enabled { duration } else { 0.0 };

        let mut rich = BTreeMap::new();
        let mut labels = BTreeMap::new();
        for entry in &frame.entries {
            labels.insert(entry.entity_id.clone(), format_label(&entry.entity_id));
            if entry.decorate_avatar && !entry.entity_id.is_empty() {
                rich.insert(
                    rich_key(&entry.entity_id),
                    RichStyle {
                        background_color: RichBackground {
                            image: self.avatar_url(&entry.entity_id),
                        },
                        height: AVATAR_HEIGHT,
                    },
                );
            }
        }

        Ok(ChartConfig {
            grid: Grid {
                top: 10,
                bottom: 30,
                left: 160,
                right: 50,
            },
            x_axis: ValueAxis {
                max: "dataMax",
                axis_label: AxisLabel {
                    show: true,
                    color: text_color.clone(),
                    font_size: None,
                    formatter: None,
                    rich: None,
                },
            },
            y_axis: CategoryAxis {
                kind: "category",
                inverse: true,
                max: frame.max_bars,
                axis_label: AxisLabel {
                    show: true,
                    color: text_color.clone(),
                    font_size: Some(14),
                    formatter: Some(CategoryFormatter { labels }),
                    rich: Some(rich),
                },
                axis_tick: AxisTick { show: false },
                animation_duration: 0.0,
                animation_duration_update: animated(AXIS_UPDATE_MS),
            },
            series: vec![BarSeries {
                realtime_sort: true,
                series_layout_by: "column",
                kind: "bar",
                data: frame.entries.iter().map(bar_data_point).collect(),
                encode: Encode { x: 1, y: 0 },
                label: SeriesLabel {
                    show: true,
                    precision: 1,
                    position: "right",
                    value_animation: true,
                    font_family: "monospace",
                    color: text_color.clone(),
                },
            }],
            animation_duration: 0.0,
            animation_duration_update: animated(update_frequency),
            animation_easing: "linear",
            animation_easing_update: "linear",
            graphic: Graphic {
                elements: vec![TextElement {
                    kind: "text",
                    right: 60,
                    bottom: 60,
                    style: TextStyle {
                        text: period_key.to_string(),
                        font: "bolder 60px monospace",
                        fill: text_color.unwrap_or_else(|| LIGHT_WATERMARK_COLOR.to_string()),
                    },
                    z: 100,
                }],
            },
        })
    }
}

fn bar_data_point(entry: &RankedEntry) -> BarDataPoint {
    let [primary, secondary] = &entry.colors;
    BarDataPoint {
        value: (entry.entity_id.clone(), entry.score),
        item_style: ItemStyle {
            color: LinearGradient {
                kind: "linear",
                x: 0.0,
                y: 0.0,
                x2: 1.0,
                y2: 0.0,
                color_stops: vec![
                    ColorStop {
                        offset: 0.0,
                        color: primary.clone(),
                    },
                    ColorStop {
                        offset: 0.5,
                        color: secondary.clone(),
                    },
                ],
                global: false,
            },
        },
    }
}

/// [`ChartComposer::compose`] with avatars served from GitHub.
pub fn compose(
    frame: &RankedFrame,
    period_key: &str,
    speed: f64,
    animation_enabled: bool,
    theme: ThemeMode,
) -> Result<ChartConfig, ConfigError> {
    ChartComposer::default().compose(frame, period_key, speed, animation_enabled, theme)
}
