//! Serializable ECharts option tree for the racing bar chart.
//!
//! Field names serialize in ECharts' camelCase. Maps are `BTreeMap` so the
//! same input always serializes to the same bytes.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub grid: Grid,
    pub x_axis: ValueAxis,
    pub y_axis: CategoryAxis,
    pub series: Vec<BarSeries>,
    pub animation_duration: f64,
    pub animation_duration_update: f64,
    pub animation_easing: &'static str,
    pub animation_easing_update: &'static str,
    pub graphic: Graphic,
}

impl ChartConfig {
    /// Bars across all series.
    pub fn data_points(&self) -> usize {
        self.series.iter().map(|s| s.data.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxis {
    /// `"dataMax"` scales the axis to the largest visible score.
    pub max: &'static str,
    pub axis_label: AxisLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub inverse: bool,
    pub max: usize,
    pub axis_label: AxisLabel,
    pub axis_tick: AxisTick,
    pub animation_duration: f64,
    pub animation_duration_update: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabel {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<CategoryFormatter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich: Option<BTreeMap<String, RichStyle>>,
}

/// Category label lookup: the renderer shows `labels[value]`, or `value`
/// itself when the category is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFormatter {
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichStyle {
    pub background_color: RichBackground,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichBackground {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub realtime_sort: bool,
    pub series_layout_by: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<BarDataPoint>,
    pub encode: Encode,
    pub label: SeriesLabel,
}

/// One bar: `value` is `[entity_id, score]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDataPoint {
    pub value: (String, f64),
    pub item_style: ItemStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStyle {
    pub color: LinearGradient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub y2: f64,
    pub color_stops: Vec<ColorStop>,
    pub global: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encode {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLabel {
    pub show: bool,
    pub precision: u32,
    pub position: &'static str,
    pub value_animation: bool,
    pub font_family: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graphic {
    pub elements: Vec<TextElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextElement {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub right: u32,
    pub bottom: u32,
    pub style: TextStyle,
    pub z: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub text: String,
    pub font: &'static str,
    pub fill: String,
}
