use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::fetcher::WeatherDataSource;
use crate::geocoder::{GeocodedLocation, Geocoder};
use crate::models::{Averages, WeatherSeries};
use crate::query::DateRange;

/// User-facing failure kinds of a data fetch.
#[derive(Debug, thiserror::Error)]
pub enum WeatherServiceError {
    #[error("No data coverage for location: {0}")]
    LocationNotCovered(String),

    #[error("Weather data service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Weather data unavailable: {0}")]
    DataUnavailable(String),
}

impl From<FetchError> for WeatherServiceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotCovered => WeatherServiceError::LocationNotCovered(e.to_string()),
            FetchError::ServiceUnavailable(_) | FetchError::Request(_) => {
                WeatherServiceError::ServiceUnavailable(e.to_string())
            }
            FetchError::UnexpectedStatus(_)
            | FetchError::MissingParameter(_)
            | FetchError::ParseError(_)
            | FetchError::NoData => WeatherServiceError::DataUnavailable(e.to_string()),
        }
    }
}

/// Observations for one request, with the geocoded place they belong to.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location: GeocodedLocation,
    pub series: WeatherSeries,
    pub averages: Averages,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeatherReport {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Geocodes a location and fetches its daily series. One attempt per call.
#[derive(Clone)]
pub struct WeatherService {
    geocoder: Arc<dyn Geocoder>,
    data_source: Arc<dyn WeatherDataSource>,
}

impl WeatherService {
    pub fn new(geocoder: Arc<dyn Geocoder>, data_source: Arc<dyn WeatherDataSource>) -> Self {
        Self {
            geocoder,
            data_source,
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        location: &str,
        range: DateRange,
    ) -> Result<WeatherReport, WeatherServiceError> {
        debug!("Geocoding location");
        let coordinates = self
            .geocoder
            .geocode(location)
            .await
            .map_err(|e| {
                if e.is_unavailable() {
                    error!("Geocoder unavailable for '{}': {}", location, e);
                    WeatherServiceError::ServiceUnavailable(e.to_string())
                } else {
                    warn!("Geocoder could not resolve '{}': {}", location, e);
                    WeatherServiceError::LocationNotCovered(location.to_string())
                }
            })?
            .ok_or_else(|| {
                warn!("Geocoding found no match for '{}'", location);
                WeatherServiceError::LocationNotCovered(location.to_string())
            })?;

        info!(
            "Geocoded '{}' to {} ({}, {})",
            location, coordinates.display_name, coordinates.lat, coordinates.lon
        );

        let series = self
            .data_source
            .fetch_series(coordinates.lat, coordinates.lon, range.start, range.end)
            .await
            .map_err(|e| {
                error!("Failed to fetch weather data for {}: {}", coordinates.display_name, e);
                WeatherServiceError::from(e)
            })?;

        if series.is_empty() {
            warn!("No complete observations for {}", coordinates.display_name);
            return Err(WeatherServiceError::DataUnavailable(
                "no complete observations in range".to_string(),
            ));
        }

        let averages = Averages::from_series(&series);
        info!(
            "Fetched {} days for {}, avg {}°C / {}mm / {} m/s",
            series.len(),
            coordinates.display_name,
            averages.temperature,
            averages.precipitation,
            averages.wind_speed
        );

        Ok(WeatherReport {
            location: coordinates,
            series,
            averages,
            start_date: range.start,
            end_date: range.end,
        })
    }
}
