use tracing::instrument;

use crate::narration::{ModelError, NarrationModel};
use crate::prompts::{clarification_prompt, location_not_covered_prompt};
use crate::utils::attempt_or_fallback;

pub const CANNED_CLARIFICATION: &str = "I'd be happy to help with weather information. \
Could you please specify a city and country? For example, 'weather in London, UK' or \
'Tokyo, Japan forecast'.";

pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Our weather data service is experiencing \
technical difficulties. Please check your internet connection and try again in a few moments. \
If the problem persists, the NASA POWER API might be temporarily down.";

pub const DATA_UNAVAILABLE_MESSAGE: &str = "I couldn't retrieve usable satellite weather data \
for that location and time period. Please try again with a different location or time frame.";

pub fn canned_not_covered(location: &str) -> String {
    format!(
        "I don't have exact NASA satellite data for \"{location}\". NASA POWER covers broader \
regions, so I'd recommend trying a larger nearby city or checking a local weather app for \
hyper-local accuracy."
    )
}

async fn generate_non_empty(model: &dyn NarrationModel, prompt: String) -> Result<String, ModelError> {
    let text = model.generate(&prompt).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Ask the user for a specific city and country.
#[instrument(skip(model))]
pub async fn clarification_message(model: &dyn NarrationModel, raw_query: &str) -> String {
    attempt_or_fallback(
        "clarification",
        generate_non_empty(model, clarification_prompt(raw_query)),
        || CANNED_CLARIFICATION.to_string(),
    )
    .await
}

/// Explain regional coverage and suggest a larger nearby city.
#[instrument(skip(model))]
pub async fn not_covered_message(model: &dyn NarrationModel, location: &str) -> String {
    attempt_or_fallback(
        "location not covered",
        generate_non_empty(model, location_not_covered_prompt(location)),
        || canned_not_covered(location),
    )
    .await
}
