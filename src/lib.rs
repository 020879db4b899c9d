pub mod aggregate;
pub mod chart;
pub mod colors;
pub mod config;
pub mod error;
pub mod fetch;
pub mod frame;
pub mod output;
pub mod parser;
pub mod race;
pub mod snapshot;
pub mod sweep;
