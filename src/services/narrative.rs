use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use crate::narration::{ModelError, NarrationModel};
use crate::prompts::narrative_prompt;
use crate::query::StructuredRequest;
use crate::services::weather_service::WeatherReport;
use crate::utils::attempt_or_fallback;

/// Average temperature above which a period is described as warm.
const WARM_ABOVE_C: f64 = 20.0;
/// Average temperature below which a period is described as cool.
const COOL_BELOW_C: f64 = 10.0;

/// The three-part answer shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub headline: String,
    pub explanation: String,
    pub source_note: String,
}

/// Split a model reply into headline / explanation / source note.
///
/// Markdown bold markers and list numbering are stripped. The first line is
/// the headline, the last the source note, and everything between is the
/// explanation. Fewer than three lines is malformed.
pub fn parse_narrative(text: &str) -> Result<Narrative, ModelError> {
    let lines: Vec<String> = text
        .lines()
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 3 {
        return Err(ModelError::Malformed(format!(
            "expected 3 narrative parts, got {}",
            lines.len()
        )));
    }

    let last = lines.len() - 1;
    Ok(Narrative {
        headline: lines[0].clone(),
        explanation: lines[1..last].join("\n\n"),
        source_note: lines[last].clone(),
    })
}

fn clean_line(line: &str) -> String {
    let line = line.replace("**", "");
    let line = line.trim().trim_start_matches('#').trim();

    // "1. Summary" / "2) ..." list markers
    let unnumbered = match line.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) if idx > 0 && line[idx..].starts_with(['.', ')']) => line[idx + 1..].trim(),
        _ => line,
    };
    unnumbered.trim_start_matches(['-', '*']).trim().to_string()
}

/// Deterministic narrative built only from the computed averages.
pub fn fallback_narrative(request: &StructuredRequest, report: &WeatherReport) -> Narrative {
    let averages = &report.averages;
    let condition = if averages.temperature > WARM_ABOVE_C {
        "🌡️ Warm conditions"
    } else if averages.temperature < COOL_BELOW_C {
        "❄️ Cool conditions"
    } else {
        "🌤️ Moderate conditions"
    };

    let range = report.date_range().label();
    let mut explanation = format!(
        "NASA satellite data shows average temperatures of {}°C with {}mm precipitation and {} m/s wind speeds for {}.",
        averages.temperature, averages.precipitation, averages.wind_speed, range
    );
    if request.date_context.is_future() {
        explanation.push_str(
            " These figures describe historical patterns for this location, not a live forecast; \
check a local weather service for the actual outlook.",
        );
    }

    Narrative {
        headline: format!("{} observed for {}", condition, report.location.display_name),
        explanation,
        source_note: format!(
            "Data sourced from NASA POWER meteorological database covering {}.",
            range
        ),
    }
}

/// Turns fetched data into a narrated answer.
#[derive(Clone)]
pub struct NarrativeComposer {
    model: Arc<dyn NarrationModel>,
}

impl NarrativeComposer {
    pub fn new(model: Arc<dyn NarrationModel>) -> Self {
        Self { model }
    }

    /// Ask the model for a narrative; any failure or malformed reply yields
    /// [`fallback_narrative`].
    #[instrument(skip(self, request, report), fields(location = %report.location.display_name))]
    pub async fn compose(
        &self,
        raw_query: &str,
        request: &StructuredRequest,
        report: &WeatherReport,
        today: NaiveDate,
    ) -> Narrative {
        let prompt = narrative_prompt(
            raw_query,
            request,
            &report.location.display_name,
            &report.series,
            &report.averages,
            today,
        );

        attempt_or_fallback(
            "narrative",
            async {
                let text = self.model.generate(&prompt).await?;
                parse_narrative(&text)
            },
            || fallback_narrative(request, report),
        )
        .await
    }
}
