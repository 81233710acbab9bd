use tracing::{info, instrument};

use crate::narration::{ModelError, NarrationModel};
use crate::prompts::{location_resolution_prompt, LOCATION_NOT_FOUND};
use crate::query::{Intent, ParsedQuery};
use crate::utils::attempt_or_fallback;

/// Longest reply accepted as a location name.
const MAX_RESOLVED_LEN: usize = 120;

/// Escalation only runs for weather questions that already have a candidate.
pub fn should_escalate(parsed: &ParsedQuery) -> bool {
    parsed.intent == Intent::Weather && parsed.location.is_some()
}

/// Outcome of asking the model to canonicalize a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    NotFound,
}

/// Interpret the model's reply: a single short line, optionally quoted.
pub fn parse_resolution(reply: &str) -> Result<Resolution, ModelError> {
    let line = reply
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim();

    if line.is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    if line.contains(LOCATION_NOT_FOUND) {
        return Ok(Resolution::NotFound);
    }
    if line.lines().count() > 1 || line.chars().count() > MAX_RESOLVED_LEN {
        return Err(ModelError::Malformed(format!(
            "expected a single location line, got {} chars",
            line.len()
        )));
    }
    Ok(Resolution::Resolved(line.to_string()))
}

/// Ask the model to canonicalize the location in `raw_query`.
///
/// Best-effort: on any failure or a not-found reply the locally extracted
/// location is kept unchanged.
#[instrument(skip(model, parsed))]
pub async fn escalate(
    model: &dyn NarrationModel,
    parsed: &ParsedQuery,
    raw_query: &str,
) -> Option<String> {
    let original = parsed.location.clone();

    let resolution = attempt_or_fallback(
        "location resolution",
        async {
            let reply = model.generate(&location_resolution_prompt(raw_query)).await?;
            parse_resolution(&reply)
        },
        || Resolution::NotFound,
    )
    .await;

    match resolution {
        Resolution::Resolved(resolved) => {
            info!("Location resolved: {:?} -> '{}'", original, resolved);
            Some(resolved)
        }
        Resolution::NotFound => {
            info!("Keeping locally extracted location {:?}", original);
            original
        }
    }
}
