// Scripted in-memory collaborators shared by the chat pipeline and API tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use weather_companion::fetch_error::FetchError;
use weather_companion::fetcher::WeatherDataSource;
use weather_companion::geocoder::{GeocodeError, GeocodedLocation, Geocoder};
use weather_companion::models::{WeatherObservation, WeatherSeries};
use weather_companion::narration::{ModelError, NarrationModel};
use weather_companion::services::{ChatService, WeatherService};

pub const FALLBACK_LOCATION: &str = "New York, NY";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 4).unwrap()
}

/// Which call site a prompt came from, recognised by its opening text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Resolution,
    Clarification,
    NotCovered,
    Narrative,
}

fn classify_prompt(prompt: &str) -> PromptKind {
    if prompt.contains("location resolution assistant") {
        PromptKind::Resolution
    } else if prompt.contains("clarify their request") {
        PromptKind::Clarification
    } else if prompt.contains("doesn't have exact data") {
        PromptKind::NotCovered
    } else {
        PromptKind::Narrative
    }
}

/// Model that answers each call site with a fixed reply, or fails when no
/// reply is scripted for it.
#[derive(Default)]
pub struct ScriptedModel {
    resolution: Option<String>,
    clarification: Option<String>,
    not_covered: Option<String>,
    narrative: Option<String>,
    calls: Mutex<Vec<PromptKind>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Fails on every call.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, reply: &str) -> Self {
        self.resolution = Some(reply.to_string());
        self
    }

    pub fn with_clarification(mut self, reply: &str) -> Self {
        self.clarification = Some(reply.to_string());
        self
    }

    pub fn with_not_covered(mut self, reply: &str) -> Self {
        self.not_covered = Some(reply.to_string());
        self
    }

    pub fn with_narrative(mut self, reply: &str) -> Self {
        self.narrative = Some(reply.to_string());
        self
    }

    pub fn calls(&self) -> Vec<PromptKind> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NarrationModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let kind = classify_prompt(prompt);
        self.calls.lock().unwrap().push(kind);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = match kind {
            PromptKind::Resolution => &self.resolution,
            PromptKind::Clarification => &self.clarification,
            PromptKind::NotCovered => &self.not_covered,
            PromptKind::Narrative => &self.narrative,
        };
        reply.clone().ok_or(ModelError::Api {
            status: 429,
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum GeocoderBehavior {
    Found(GeocodedLocation),
    NotFound,
    Status(u16),
}

/// Geocoder with a fixed answer that records every lookup.
pub struct StaticGeocoder {
    behavior: GeocoderBehavior,
    queries: Mutex<Vec<String>>,
}

impl StaticGeocoder {
    pub fn new(behavior: GeocoderBehavior) -> Self {
        Self {
            behavior,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn found(display_name: &str) -> Self {
        Self::new(GeocoderBehavior::Found(GeocodedLocation {
            lat: 40.7128,
            lon: -74.006,
            display_name: display_name.to_string(),
        }))
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        self.queries.lock().unwrap().push(location.to_string());
        match &self.behavior {
            GeocoderBehavior::Found(found) => Ok(Some(found.clone())),
            GeocoderBehavior::NotFound => Ok(None),
            GeocoderBehavior::Status(status) => Err(GeocodeError::Status {
                status: *status,
                body: "upstream error".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DataBehavior {
    Series(WeatherSeries),
    NotCovered,
    Unavailable(u16),
    MissingParameter,
}

/// Data source with a fixed answer that counts calls and records ranges.
pub struct StaticDataSource {
    behavior: DataBehavior,
    calls: AtomicUsize,
    ranges: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl StaticDataSource {
    pub fn new(behavior: DataBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            ranges: Mutex::new(Vec::new()),
        }
    }

    pub fn with_series(series: WeatherSeries) -> Self {
        Self::new(DataBehavior::Series(series))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn ranges(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.ranges.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WeatherDataSource for StaticDataSource {
    async fn fetch_series(
        &self,
        _lat: f64,
        _lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherSeries, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ranges.lock().unwrap().push((start, end));
        match &self.behavior {
            DataBehavior::Series(series) => Ok(series.clone()),
            DataBehavior::NotCovered => Err(FetchError::NotCovered),
            DataBehavior::Unavailable(status) => Err(FetchError::ServiceUnavailable(*status)),
            DataBehavior::MissingParameter => Err(FetchError::MissingParameter("WS2M")),
        }
    }
}

/// A week of complete observations ending the day before `today()`.
pub fn sample_series(temperature: f64) -> WeatherSeries {
    WeatherSeries::from_observations((26..=30).map(|day| WeatherObservation {
        date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
        temperature,
        precipitation: 1.2,
        wind_speed: 3.4,
    }))
}

pub struct Harness {
    pub model: Arc<ScriptedModel>,
    pub geocoder: Arc<StaticGeocoder>,
    pub data_source: Arc<StaticDataSource>,
    pub weather_service: WeatherService,
    pub chat_service: ChatService,
}

pub fn harness(
    model: ScriptedModel,
    geocoder: StaticGeocoder,
    data_source: StaticDataSource,
) -> Harness {
    let model = Arc::new(model);
    let geocoder = Arc::new(geocoder);
    let data_source = Arc::new(data_source);

    let weather_service = WeatherService::new(geocoder.clone(), data_source.clone());
    let chat_service = ChatService::new(
        model.clone(),
        weather_service.clone(),
        FALLBACK_LOCATION.to_string(),
    );

    Harness {
        model,
        geocoder,
        data_source,
        weather_service,
        chat_service,
    }
}
