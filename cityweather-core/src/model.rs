use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful observation for a city, already normalized to Celsius.
///
/// Only ever built from a complete provider reply, so every field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub temperature: f64,
    pub longitude: f64,
    pub latitude: f64,
    /// Two-character weather category, e.g. "01" for clear sky.
    pub condition_code: String,
    pub description: String,
    pub sunrise_epoch: i64,
    pub sunset_epoch: i64,
    pub observation_epoch: i64,
}

impl WeatherRecord {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.observation_epoch, 0)
    }

    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunrise_epoch, 0)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunset_epoch, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPeriod {
    Day,
    Night,
}

impl DayPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Day => "day",
            DayPeriod::Night => "night",
        }
    }
}

impl std::fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
