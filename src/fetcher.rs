use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::fetch_error::FetchError;
use crate::models::{WeatherObservation, WeatherSeries};

/// NASA POWER parameter codes: 2m temperature, corrected precipitation, 2m wind speed.
const TEMPERATURE: &str = "T2M";
const PRECIPITATION: &str = "PRECTOTCORR";
const WIND_SPEED: &str = "WS2M";

/// Daily satellite observations collaborator.
#[async_trait::async_trait]
pub trait WeatherDataSource: Send + Sync {
    /// Fetch daily observations for a point over an inclusive date range.
    ///
    /// # Errors
    ///
    /// [`FetchError::NotCovered`] on 404, [`FetchError::ServiceUnavailable`]
    /// on 5xx, other variants for anything else that went wrong.
    async fn fetch_series(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherSeries, FetchError>;
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: Option<PowerProperties>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Option<BTreeMap<String, BTreeMap<String, f64>>>,
}

/// Client for the NASA POWER daily point API.
#[derive(Clone)]
pub struct PowerFetcher {
    client: reqwest::Client,
    url: String,
}

impl PowerFetcher {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    #[instrument(skip(self, json), fields(json_size = json.len()))]
    fn parse_json(&self, json: &str) -> Result<WeatherSeries, FetchError> {
        let response: PowerResponse =
            serde_json::from_str(json).map_err(|e| FetchError::ParseError(e.to_string()))?;

        let mut parameters = response
            .properties
            .and_then(|p| p.parameter)
            .ok_or(FetchError::MissingParameter("properties.parameter"))?;

        let temperature = parameters
            .remove(TEMPERATURE)
            .ok_or(FetchError::MissingParameter(TEMPERATURE))?;
        let precipitation = parameters
            .remove(PRECIPITATION)
            .ok_or(FetchError::MissingParameter(PRECIPITATION))?;
        let wind_speed = parameters
            .remove(WIND_SPEED)
            .ok_or(FetchError::MissingParameter(WIND_SPEED))?;

        let mut observations = Vec::with_capacity(temperature.len());
        let mut skipped_days = 0;

        for (key, temp) in &temperature {
            let (Some(precip), Some(wind)) = (precipitation.get(key), wind_speed.get(key)) else {
                debug!("Day {} missing precipitation or wind, skipping", key);
                skipped_days += 1;
                continue;
            };

            match self.parse_date(key) {
                Ok(date) => observations.push(WeatherObservation {
                    date,
                    temperature: *temp,
                    precipitation: *precip,
                    wind_speed: *wind,
                }),
                Err(e) => {
                    warn!("Failed to parse date key '{}': {}", key, e);
                    skipped_days += 1;
                }
            }
        }

        let total = observations.len();
        let series = WeatherSeries::from_observations(observations);
        skipped_days += total - series.len();

        if skipped_days > 0 {
            warn!("Skipped {} incomplete days out of {}", skipped_days, temperature.len());
        }
        debug!("Parsed {} complete daily observations", series.len());

        Ok(series)
    }

    /// POWER keys days as `YYYYMMDD`.
    fn parse_date(&self, key: &str) -> Result<NaiveDate, FetchError> {
        NaiveDate::parse_from_str(key, "%Y%m%d").map_err(|e| FetchError::ParseError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl WeatherDataSource for PowerFetcher {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_series(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherSeries, FetchError> {
        let parameters = format!("{TEMPERATURE},{PRECIPITATION},{WIND_SPEED}");
        let start = start.format("%Y%m%d").to_string();
        let end = end.format("%Y%m%d").to_string();
        let latitude = lat.to_string();
        let longitude = lon.to_string();

        debug!("Sending HTTP request to POWER API");
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("parameters", parameters.as_str()),
                ("community", "AG"),
                ("longitude", longitude.as_str()),
                ("latitude", latitude.as_str()),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("format", "JSON"),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if status.as_u16() == 404 {
            return Err(FetchError::NotCovered);
        } else if status.is_server_error() {
            return Err(FetchError::ServiceUnavailable(status.as_u16()));
        } else if !status.is_success() {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let json = response.text().await?;
        debug!("Retrieved JSON content, size: {} bytes", json.len());

        let series = self.parse_json(&json)?;
        if series.is_empty() {
            return Err(FetchError::NoData);
        }
        Ok(series)
    }
}
