use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use super::location_normalizer::{lookup_alias, normalize_location};
use super::models::{DateContext, Intent, ParsedQuery};

const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "rain",
    "wind",
    "climate",
    "forecast",
    "camping",
    "hiking",
    "outdoor",
    "conditions",
];

const SPACE_KEYWORDS: &[&str] = &[
    "solar",
    "space",
    "satellite",
    "aurora",
    "flare",
    "nasa",
    "earth",
    "atmosphere",
];

/// Captures that are never a location on their own.
const STOP_WORDS: &[&str] = &["the", "and", "or", "but", "with", "for", "weather", "climate"];

/// Words that may trail a capitalized place name without being part of it.
const TEMPORAL_WORDS: &[&str] = &[
    "today",
    "tonight",
    "tomorrow",
    "next",
    "this",
    "week",
    "weekend",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Question words, articles, auxiliaries and pronouns. A capture made only of
/// these (and temporal words) is the start of a question, not a place.
const FUNCTION_WORDS: &[&str] = &[
    "what", "whats", "how", "hows", "when", "where", "which", "who", "why", "the", "a", "an",
    "is", "are", "was", "were", "be", "will", "would", "can", "could", "should", "do", "does",
    "did", "it", "its", "s", "there", "like", "i", "me", "my", "you", "we", "us", "about",
    "please",
];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Capitalized words after a context word. Sentence punctuation ends the
/// capture and the pronoun "I" never continues it ("Istanbul" still does).
static CAPITALIZED_AFTER_PREPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:in|at|near|around|for)\s+((?:[A-HJ-Z][\w'-]*|I[\w'-]+)(?:,?\s+(?:[A-HJ-Z][\w'-]*|I[\w'-]+))*)",
    )
    .expect("valid capitalized-place regex")
});

static AFTER_PREPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:in|at|near|around|for)\s+([a-z\s,.-]+?)(?:\s|$|\.|\?|!|weather|temperature|climate|forecast)",
    )
    .expect("valid preposition regex")
});

static BEFORE_DOMAIN_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z\s,.-]+?)\s+(?:weather|temperature|climate|forecast|conditions)")
        .expect("valid domain-suffix regex")
});

static DOMAIN_WORD_THEN_PREPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:weather|temperature|climate|forecast|conditions)\s+(?:in|at|near|around|for)\s+([a-z\s,.-]+?)(?:\s|$|\.|\?|!)",
    )
    .expect("valid domain-preposition regex")
});

static LEADING_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z\s,.-]+?)\s*(?:weather|forecast|climate)")
        .expect("valid leading-phrase regex")
});

/// A single location pattern: returns its raw capture, if the pattern matched.
pub type LocationMatcher = fn(&str) -> Option<String>;

/// Location patterns in priority order.
pub const LOCATION_MATCHERS: [(&str, LocationMatcher); 5] = [
    ("capitalized_after_preposition", capitalized_after_preposition),
    ("after_preposition", after_preposition),
    ("before_domain_word", before_domain_word),
    ("domain_word_then_preposition", domain_word_then_preposition),
    ("leading_phrase", leading_phrase),
];

fn first_capture(re: &Regex, query: &str) -> Option<String> {
    re.captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// "weather in New York City tomorrow" -> "New York City"
///
/// Trailing temporal words are dropped; a match that is nothing but temporal
/// words ("for Tuesday") gives way to the next one in the query.
pub fn capitalized_after_preposition(query: &str) -> Option<String> {
    CAPITALIZED_AFTER_PREPOSITION
        .captures_iter(query)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_trailing_temporal(m.as_str()))
        .find(|place| !place.is_empty())
}

fn strip_trailing_temporal(capture: &str) -> String {
    let mut words: Vec<&str> = capture.split_whitespace().collect();
    while let Some(last) = words.last() {
        let bare = last.trim_end_matches(',').to_lowercase();
        if TEMPORAL_WORDS.contains(&bare.as_str()) {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ").trim_end_matches(',').to_string()
}

/// "is it raining in paris?" -> "paris"
pub fn after_preposition(query: &str) -> Option<String> {
    first_capture(&AFTER_PREPOSITION, query)
}

/// "grand canyon weather" -> "grand canyon"
pub fn before_domain_word(query: &str) -> Option<String> {
    first_capture(&BEFORE_DOMAIN_WORD, query)
}

/// "forecast for lagos" -> "lagos"
pub fn domain_word_then_preposition(query: &str) -> Option<String> {
    first_capture(&DOMAIN_WORD_THEN_PREPOSITION, query)
}

/// "Cairo forecast" -> "Cairo"
pub fn leading_phrase(query: &str) -> Option<String> {
    first_capture(&LEADING_PHRASE, query)
}

fn clean_candidate(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == ',' || c == '.' || c == '-' || c.is_whitespace())
        .to_string()
}

/// True when every word of `candidate` is a function or temporal word
/// ("What is the", "s the", "Tuesday").
fn is_function_phrase(candidate: &str) -> bool {
    candidate
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .all(|w| FUNCTION_WORDS.contains(&w.as_str()) || TEMPORAL_WORDS.contains(&w.as_str()))
}

/// A candidate is usable when longer than two characters, not a stop word and
/// not made only of function words.
///
/// Entries of the alias table are accepted before the length rule is applied,
/// so "LA" and "SF" reach the alias mapping; any other two-letter capture is
/// still rejected.
pub fn is_acceptable_candidate(candidate: &str) -> bool {
    if lookup_alias(candidate).is_some() {
        return true;
    }
    candidate.chars().count() > 2
        && !STOP_WORDS.contains(&candidate.to_lowercase().as_str())
        && !is_function_phrase(candidate)
}

/// Try each matcher in order; the first acceptable capture wins. A matcher
/// whose capture is rejected is skipped, not retried.
pub fn extract_location(query: &str) -> Option<String> {
    for (name, matcher) in LOCATION_MATCHERS {
        let Some(raw) = matcher(query) else {
            continue;
        };
        let candidate = clean_candidate(&raw);
        if is_acceptable_candidate(&candidate) {
            debug!("Matcher {} extracted location '{}'", name, candidate);
            return Some(candidate);
        }
        debug!("Matcher {} rejected candidate '{}'", name, candidate);
    }
    None
}

/// Weather keywords are checked before space keywords; first hit wins.
pub fn classify_intent(query: &str) -> Intent {
    let lower = query.to_lowercase();
    if WEATHER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Intent::Weather
    } else if SPACE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Intent::Space
    } else {
        Intent::General
    }
}

pub fn classify_date_context(query: &str) -> DateContext {
    let lower = query.to_lowercase();
    if lower.contains("today") || lower.contains("current") {
        DateContext::Today
    } else if lower.contains("tomorrow") || lower.contains("next day") {
        DateContext::Tomorrow
    } else if lower.contains("next week")
        || WEEKDAYS
            .iter()
            .any(|day| lower.contains(&format!("next {day}")))
    {
        DateContext::Custom
    } else {
        DateContext::Default
    }
}

/// Interpret a raw user utterance. Never fails: missing information shows up
/// as an empty location and `clarification_needed`.
#[instrument]
pub fn interpret(raw_query: &str) -> ParsedQuery {
    let location = extract_location(raw_query).map(|l| normalize_location(&l));
    let intent = classify_intent(raw_query);
    let date_context = classify_date_context(raw_query);

    let parsed = ParsedQuery::new(location, intent, date_context);
    debug!(
        "Interpreted query: location={:?}, intent={:?}, date_context={:?}, clarification_needed={}",
        parsed.location, parsed.intent, parsed.date_context, parsed.clarification_needed
    );
    parsed
}
