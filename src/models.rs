use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::round_to;

/// Value the satellite data source reports when a day has no observation.
pub const MISSING_VALUE_SENTINEL: f64 = -999.0;

/// One calendar day of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    /// Degrees Celsius at 2m.
    pub temperature: f64,
    /// Millimetres per day.
    pub precipitation: f64,
    /// Metres per second at 2m.
    pub wind_speed: f64,
}

impl WeatherObservation {
    /// True when none of the three measurements is the source's missing-value marker.
    pub fn is_complete(&self) -> bool {
        [self.temperature, self.precipitation, self.wind_speed]
            .iter()
            .all(|v| v.is_finite() && *v != MISSING_VALUE_SENTINEL)
    }
}

/// Daily observations in ascending date order with no duplicate dates.
///
/// Gaps are allowed: days dropped for missing data simply do not appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeatherSeries {
    observations: Vec<WeatherObservation>,
}

impl WeatherSeries {
    /// Build a series from raw observations.
    ///
    /// Incomplete days are dropped, the rest are sorted by date, and when a
    /// date appears more than once the first occurrence is kept.
    pub fn from_observations(observations: impl IntoIterator<Item = WeatherObservation>) -> Self {
        let mut observations: Vec<WeatherObservation> = observations
            .into_iter()
            .filter(WeatherObservation::is_complete)
            .collect();
        observations.sort_by_key(|o| o.date);
        observations.dedup_by_key(|o| o.date);
        Self { observations }
    }

    pub fn observations(&self) -> &[WeatherObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The most recent `n` days, oldest first.
    pub fn last_days(&self, n: usize) -> &[WeatherObservation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    pub fn into_vec(self) -> Vec<WeatherObservation> {
        self.observations
    }
}

/// Mean of each measurement over a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Averages {
    pub temperature: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
}

impl Averages {
    /// Temperature and wind are rounded to 1 decimal, precipitation to 2.
    /// An empty series averages to all zeros.
    pub fn from_series(series: &WeatherSeries) -> Self {
        let days = series.observations();
        if days.is_empty() {
            return Self::default();
        }

        let count = days.len() as f64;
        let temperature = mean(days.iter().map(|d| d.temperature), count);
        let precipitation = mean(days.iter().map(|d| d.precipitation), count);
        let wind_speed = mean(days.iter().map(|d| d.wind_speed), count);

        Self {
            temperature: round_to(temperature, 1),
            precipitation: round_to(precipitation, 2),
            wind_speed: round_to(wind_speed, 1),
        }
    }
}

// Summing in sorted order keeps the result independent of input order.
fn mean(values: impl Iterator<Item = f64>, count: f64) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / count
}
