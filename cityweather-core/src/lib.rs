//! Core library for the `cityweather` tool.
//!
//! This crate defines:
//! - Fetching current conditions for a city from OpenWeather
//! - Classifying a condition code and time of day into a display glyph
//! - The display panel state a front end renders
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod model;
pub mod panel;
pub mod provider;

pub use classify::{ClassifyError, classify, day_period};
pub use config::Config;
pub use model::{DayPeriod, WeatherRecord};
pub use panel::{Panel, Update};
pub use provider::{FetchError, WeatherFetcher, openweather::OpenWeatherClient};
