use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::WeatherRecord;

pub mod openweather;

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Why a lookup produced no record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Blank city name; no request was made.
    #[error("No city name given")]
    EmptyInput,

    /// The provider does not recognize the city.
    #[error("City not found")]
    NotFound,

    /// Transport failure, unexpected status, or an unusable body.
    #[error("Weather data unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_conversion() {
        assert!((kelvin_to_celsius(285.15) - 12.0).abs() < 1e-9);
        assert!(kelvin_to_celsius(273.15).abs() < 1e-9);
        assert!((kelvin_to_celsius(0.0) + 273.15).abs() < 1e-9);
    }

    #[test]
    fn unavailable_message_carries_detail() {
        let err = FetchError::Unavailable("status 500".into());
        assert_eq!(err.to_string(), "Weather data unavailable: status 500");
    }
}
