use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::date_range::{resolve_date_range, DateRange};

/// Prompts offered to the user whenever the location could not be determined.
pub const SUGGESTED_QUESTIONS: [&str; 3] = [
    "Could you specify a city and country?",
    "Are you looking for weather or space weather data?",
    "What time period are you interested in?",
];

/// Minimum length for a resolved location to be usable without clarification.
pub const MIN_LOCATION_LEN: usize = 3;

/// Coarse classification of what the user is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Weather,
    Space,
    General,
}

/// Which calendar window a query implies.
///
/// `Custom` means a named future weekday or "next week" was mentioned; it is
/// not an arbitrary explicit date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateContext {
    Today,
    Tomorrow,
    Custom,
    Default,
}

impl DateContext {
    /// True when the user is asking about a day after today.
    pub fn is_future(self) -> bool {
        matches!(self, DateContext::Tomorrow | DateContext::Custom)
    }
}

/// Result of interpreting one user utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub location: Option<String>,
    pub intent: Intent,
    pub date_context: DateContext,
    pub clarification_needed: bool,
    pub suggested_questions: Vec<String>,
}

impl ParsedQuery {
    /// Assemble a parsed query; the clarification flag and suggestions are
    /// derived from `location` alone.
    pub fn new(location: Option<String>, intent: Intent, date_context: DateContext) -> Self {
        let location = location.filter(|l| !l.trim().is_empty());
        let clarification_needed = needs_clarification(location.as_deref());
        let suggested_questions = if clarification_needed {
            SUGGESTED_QUESTIONS.iter().map(|q| q.to_string()).collect()
        } else {
            Vec::new()
        };

        Self {
            location,
            intent,
            date_context,
            clarification_needed,
            suggested_questions,
        }
    }
}

/// A location is unusable when absent or shorter than three characters.
pub fn needs_clarification(location: Option<&str>) -> bool {
    location.map_or(true, |l| l.trim().chars().count() < MIN_LOCATION_LEN)
}

/// The concrete data request handed to the fetch orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredRequest {
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub original_query: String,
    pub intent: Intent,
    pub date_context: DateContext,
}

impl StructuredRequest {
    /// Build the request for `parsed`, preferring the model-resolved location,
    /// then the locally extracted one, then `fallback_location`.
    pub fn build(
        parsed: &ParsedQuery,
        original_query: &str,
        resolved_location: Option<&str>,
        fallback_location: &str,
        today: NaiveDate,
    ) -> Self {
        let location = [resolved_location, parsed.location.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or(fallback_location)
            .to_string();

        let DateRange { start, end } = resolve_date_range(parsed.date_context, today);

        Self {
            location,
            start_date: start,
            end_date: end,
            original_query: original_query.to_string(),
            intent: parsed.intent,
            date_context: parsed.date_context,
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}
