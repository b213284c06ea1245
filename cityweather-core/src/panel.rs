//! Display state for a single-city weather view.
//!
//! Front ends hold one [`Panel`] and feed every submission through
//! [`Panel::apply`]; the panel decides which fields change.

use tracing::error;

use crate::{FetchError, WeatherRecord, classify::classify};

pub const DEFAULT_GLYPH: &str = "⛅";
pub const NOT_FOUND_MESSAGE: &str = "No city found!";

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub city_input: String,
    pub glyph: String,
    pub description: String,
    pub temperature: String,
    pub coordinates: String,
}

/// What a submission did to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Rendered,
    /// Text fields were refreshed but the condition code had no glyph.
    RenderedWithoutGlyph,
    CityNotFound,
    Unchanged,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            city_input: String::new(),
            glyph: DEFAULT_GLYPH.to_string(),
            description: "Description".to_string(),
            temperature: "Temp: NAN".to_string(),
            coordinates: "Lon: NAN; Lat: NAN".to_string(),
        }
    }
}

impl Panel {
    pub fn apply(&mut self, city: &str, outcome: Result<WeatherRecord, FetchError>) -> Update {
        match outcome {
            Ok(record) => {
                self.city_input = city.to_string();
                self.description = record.description.clone();
                self.temperature = temperature_line(record.temperature);
                self.coordinates = coordinates_line(record.longitude, record.latitude);

                match classify(
                    &record.condition_code,
                    record.sunset_epoch,
                    record.sunrise_epoch,
                    record.observation_epoch,
                ) {
                    Ok(glyph) => {
                        self.glyph = glyph.to_string();
                        Update::Rendered
                    }
                    Err(err) => {
                        error!(code = %record.condition_code, "{err}");
                        Update::RenderedWithoutGlyph
                    }
                }
            }
            Err(FetchError::NotFound) => {
                self.city_input = NOT_FOUND_MESSAGE.to_string();
                Update::CityNotFound
            }
            // Already logged by the fetcher.
            Err(FetchError::Unavailable(_) | FetchError::EmptyInput) => Update::Unchanged,
        }
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.glyph)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "{}", self.temperature)?;
        write!(f, "{}", self.coordinates)
    }
}

pub fn temperature_line(celsius: f64) -> String {
    let rounded = (celsius * 100.0).round() / 100.0;
    format!("Temp: {}°C", format_decimal(rounded))
}

pub fn coordinates_line(longitude: f64, latitude: f64) -> String {
    format!(
        "Lon: {}; Lat: {}",
        format_decimal(longitude),
        format_decimal(latitude)
    )
}

/// Shortest representation, but whole numbers keep one decimal (`12.0`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
