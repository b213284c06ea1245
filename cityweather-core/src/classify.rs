//! Day/night detection and the condition-code to glyph table.

use std::{collections::HashMap, sync::LazyLock};

use thiserror::Error;

use crate::model::DayPeriod;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Unknown weather condition code '{0}'")]
    UnknownConditionCode(String),
}

/// (code, day glyph, night glyph)
static GLYPH_ROWS: [(&str, &str, &str); 9] = [
    ("01", "☀️", "🌙"),
    ("02", "🌤️", "☁️🌙"),
    ("03", "⛅", "☁️🌙"),
    ("04", "🌥️", "☁️🌙"),
    ("09", "🌧️☀️", "🌧️🌙"),
    ("10", "🌦️", "🌧️🌙"),
    ("11", "🌩️☀️", "🌩️🌙"),
    ("13", "🌨️☀️", "🌨️🌙"),
    ("50", "🌫️☀️", "🌫️🌙"),
];

static GLYPHS: LazyLock<HashMap<DayPeriod, HashMap<&'static str, &'static str>>> =
    LazyLock::new(|| {
        let day = GLYPH_ROWS.iter().map(|(code, day, _)| (*code, *day)).collect();
        let night = GLYPH_ROWS.iter().map(|(code, _, night)| (*code, *night)).collect();

        HashMap::from([(DayPeriod::Day, day), (DayPeriod::Night, night)])
    });

/// Every condition code the table knows about.
pub fn known_codes() -> impl Iterator<Item = &'static str> {
    GLYPH_ROWS.iter().map(|(code, _, _)| *code)
}

/// Daytime is the closed interval `[sunrise, sunset]`.
pub fn day_period(sunset: i64, sunrise: i64, observation: i64) -> DayPeriod {
    if (sunrise..=sunset).contains(&observation) {
        DayPeriod::Day
    } else {
        DayPeriod::Night
    }
}

pub fn glyph(code: &str, period: DayPeriod) -> Result<&'static str, ClassifyError> {
    GLYPHS
        .get(&period)
        .and_then(|by_code| by_code.get(code))
        .copied()
        .ok_or_else(|| ClassifyError::UnknownConditionCode(code.to_string()))
}

/// Pick the display glyph for a condition code at the given moment.
///
/// Codes outside [`known_codes`] are rejected; there is no fallback glyph.
pub fn classify(
    code: &str,
    sunset: i64,
    sunrise: i64,
    observation: i64,
) -> Result<&'static str, ClassifyError> {
    glyph(code, day_period(sunset, sunrise, observation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_sky_day_and_night() {
        assert_eq!(classify("01", 100, 50, 75), Ok("☀️"));
        assert_eq!(classify("01", 100, 50, 10), Ok("🌙"));
    }

    #[test]
    fn boundaries_are_daytime() {
        assert_eq!(day_period(100, 50, 50), DayPeriod::Day);
        assert_eq!(day_period(100, 50, 100), DayPeriod::Day);
        assert_eq!(day_period(100, 50, 49), DayPeriod::Night);
        assert_eq!(day_period(100, 50, 101), DayPeriod::Night);
    }

    #[test]
    fn every_known_code_has_distinct_day_and_night_glyphs() {
        for code in known_codes() {
            let day = glyph(code, DayPeriod::Day).expect("day glyph");
            let night = glyph(code, DayPeriod::Night).expect("night glyph");
            assert_ne!(day, night, "code {code}");
        }
        assert_eq!(known_codes().count(), 9);
    }

    #[test]
    fn sunrise_after_sunset_is_always_night() {
        assert_eq!(day_period(50, 100, 75), DayPeriod::Night);
        assert_eq!(day_period(50, 100, 50), DayPeriod::Night);
        assert_eq!(day_period(50, 100, 100), DayPeriod::Night);
        assert_eq!(classify("13", 50, 100, 75), Ok("🌨️🌙"));
    }

    #[test]
    fn rain_observed_between_sunrise_and_sunset() {
        assert_eq!(classify("10", 2000, 1000, 1500), Ok("🌦️"));
    }

    #[test]
    fn unknown_code_fails_for_day_and_night() {
        for observation in [10, 75, 500] {
            let err = classify("99", 100, 50, observation).unwrap_err();
            assert_eq!(err, ClassifyError::UnknownConditionCode("99".into()));
        }
        assert!(classify("", 100, 50, 75).is_err());
        assert!(classify("10n", 100, 50, 75).is_err());
    }

    #[test]
    fn unknown_code_error_message_names_code() {
        let err = glyph("42", DayPeriod::Night).unwrap_err();
        assert!(err.to_string().contains("'42'"));
    }
}
