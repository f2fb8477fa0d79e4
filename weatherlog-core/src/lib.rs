//! Core library for the `weatherlog` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Fetching raw current weather and forecast bodies from OpenWeather
//! - Parsing those bodies and recording them in a local SQLite file
//! - Table and single-record views over the recorded snapshots
//!
//! It is used by `weatherlog-cli`, but can also be reused by other binaries.

pub mod action;
pub mod config;
pub mod cursor;
pub mod model;
pub mod parse;
pub mod provider;
pub mod store;
pub mod view;

pub use action::fetch_and_save;
pub use config::{CITY, Config};
pub use cursor::{Navigation, RecordCursor};
pub use model::{
    AlertRecord, ForecastRecord, PersistSummary, RawWeather, WeatherSnapshot, WeatherTable,
};
pub use parse::{CurrentConditions, ForecastBlob, ParseError};
pub use provider::{WeatherFetcher, openweather::OpenWeatherProvider};
pub use store::WeatherStore;
pub use view::{RecordView, ViewMode};
