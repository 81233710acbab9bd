use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::models::{Averages, WeatherSeries};
use crate::narration::NarrationModel;
use crate::query::{interpret, StructuredRequest};
use crate::services::clarification::{
    clarification_message, not_covered_message, DATA_UNAVAILABLE_MESSAGE,
    SERVICE_UNAVAILABLE_MESSAGE,
};
use crate::services::location_resolution::{escalate, should_escalate};
use crate::services::narrative::NarrativeComposer;
use crate::services::weather_service::{WeatherService, WeatherServiceError};

/// Every chat turn ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatOutcome {
    ClarificationNeeded {
        message: String,
        suggested_questions: Vec<String>,
    },
    LocationNotCovered {
        message: String,
        location: String,
    },
    ServiceUnavailable {
        message: String,
    },
    WeatherAnswer {
        headline: String,
        explanation: String,
        source_note: String,
        series: WeatherSeries,
        averages: Averages,
        location: String,
        date_range_label: String,
    },
}

impl ChatOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            ChatOutcome::ClarificationNeeded { .. } => "clarification_needed",
            ChatOutcome::LocationNotCovered { .. } => "location_not_covered",
            ChatOutcome::ServiceUnavailable { .. } => "service_unavailable",
            ChatOutcome::WeatherAnswer { .. } => "weather_answer",
        }
    }
}

/// Runs one user question through interpret, escalate, clarify, fetch and
/// compose, in that order.
#[derive(Clone)]
pub struct ChatService {
    model: Arc<dyn NarrationModel>,
    weather_service: WeatherService,
    composer: NarrativeComposer,
    fallback_location: String,
}

impl ChatService {
    pub fn new(
        model: Arc<dyn NarrationModel>,
        weather_service: WeatherService,
        fallback_location: String,
    ) -> Self {
        Self {
            composer: NarrativeComposer::new(model.clone()),
            model,
            weather_service,
            fallback_location,
        }
    }

    #[instrument(skip(self))]
    pub async fn handle(&self, raw_query: &str, today: NaiveDate) -> ChatOutcome {
        let parsed = interpret(raw_query);
        debug!(
            "Interpreted query: location={:?} intent={:?} date_context={:?}",
            parsed.location, parsed.intent, parsed.date_context
        );

        let resolved = if should_escalate(&parsed) && !parsed.clarification_needed {
            escalate(self.model.as_ref(), &parsed, raw_query).await
        } else {
            parsed.location.clone()
        };

        let unresolved = resolved.as_deref().map_or(true, |l| l.trim().is_empty());
        if parsed.clarification_needed || unresolved {
            info!("Location unclear, asking for clarification");
            let message = clarification_message(self.model.as_ref(), raw_query).await;
            return ChatOutcome::ClarificationNeeded {
                message,
                suggested_questions: parsed.suggested_questions,
            };
        }

        let request = StructuredRequest::build(
            &parsed,
            raw_query,
            resolved.as_deref(),
            &self.fallback_location,
            today,
        );
        info!(
            "Fetching {} for {}",
            request.date_range().label(),
            request.location
        );

        let report = match self
            .weather_service
            .fetch(&request.location, request.date_range())
            .await
        {
            Ok(report) => report,
            Err(WeatherServiceError::LocationNotCovered(detail)) => {
                warn!("Location not covered: {} ({})", request.location, detail);
                let message = not_covered_message(self.model.as_ref(), &request.location).await;
                return ChatOutcome::LocationNotCovered {
                    message,
                    location: request.location,
                };
            }
            Err(WeatherServiceError::ServiceUnavailable(detail)) => {
                error!("Weather data service unavailable: {}", detail);
                return ChatOutcome::ServiceUnavailable {
                    message: SERVICE_UNAVAILABLE_MESSAGE.to_string(),
                };
            }
            Err(WeatherServiceError::DataUnavailable(detail)) => {
                error!("Weather data unavailable: {}", detail);
                return ChatOutcome::ServiceUnavailable {
                    message: DATA_UNAVAILABLE_MESSAGE.to_string(),
                };
            }
        };

        let narrative = self
            .composer
            .compose(raw_query, &request, &report, today)
            .await;

        ChatOutcome::WeatherAnswer {
            headline: narrative.headline,
            explanation: narrative.explanation,
            source_note: narrative.source_note,
            date_range_label: report.date_range().label(),
            location: report.location.display_name,
            series: report.series,
            averages: report.averages,
        }
    }
}
