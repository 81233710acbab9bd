pub mod chat_service;
pub mod clarification;
pub mod location_resolution;
pub mod narrative;
pub mod weather_service;

pub use chat_service::{ChatOutcome, ChatService};
pub use narrative::{Narrative, NarrativeComposer};
pub use weather_service::{WeatherReport, WeatherService, WeatherServiceError};
