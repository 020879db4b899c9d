//! Declarative racing-bar chart configuration.

mod compose;
pub mod option;

pub use compose::{
    AXIS_UPDATE_MS, BASE_FREQUENCY_MS, ChartComposer, DARK_TEXT_COLOR, compose, format_label,
    frame_interval, rich_key,
};
pub use option::ChartConfig;
