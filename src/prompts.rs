//! Prompt text sent to the narration model.

use chrono::NaiveDate;

use crate::models::{Averages, WeatherSeries};
use crate::query::StructuredRequest;

/// Reply the model gives when it cannot find a location in the query.
pub const LOCATION_NOT_FOUND: &str = "LOCATION_NOT_FOUND";

/// Number of most recent days quoted in the narrative prompt.
pub const RECENT_DAYS_IN_PROMPT: usize = 5;

pub fn location_resolution_prompt(user_query: &str) -> String {
    format!(
        r#"You are a location resolution assistant. Parse this user query and extract the intended location:

User Query: "{user_query}"

Your task:
1. Identify the location mentioned in the query
2. Resolve it to the format: "City, Region/State, Country"
3. If the location is ambiguous, suggest the most likely interpretation
4. If no clear location is found, respond with "{LOCATION_NOT_FOUND}"

Examples:
- "weather in Agbogba" → "Agbogba, Greater Accra, Ghana"
- "Tokyo forecast" → "Tokyo, Tokyo Prefecture, Japan"
- "NYC weather" → "New York City, New York, USA"
- "weather tomorrow" → "{LOCATION_NOT_FOUND}"

Respond with ONLY the resolved location in the specified format, or "{LOCATION_NOT_FOUND}"."#
    )
}

pub fn clarification_prompt(user_query: &str) -> String {
    format!(
        r#"The user asked: "{user_query}"

I need to help clarify their request for weather data. The location provided is unclear or missing.

Please respond in a helpful, professional tone asking for:
1. A specific location (city and country)
2. Confirmation of what type of weather information they need

Keep the response concise (1-2 sentences) and suggest they provide a clearer location.
Example: "I'd be happy to help with weather information. Could you please specify a city and country? For example, 'weather in London, UK' or 'Tokyo, Japan forecast'.""#
    )
}

pub fn location_not_covered_prompt(location: &str) -> String {
    format!(
        r#"The user asked about weather for "{location}" but NASA POWER doesn't have exact data for this location.

Please provide a professional response that:
1. Acknowledges the request
2. Explains that NASA data isn't available for this exact location
3. Suggests they try a larger nearby city
4. Mentions that NASA data covers broader regions

Keep it concise and helpful, around 2-3 sentences."#
    )
}

pub fn narrative_prompt(
    user_query: &str,
    request: &StructuredRequest,
    location: &str,
    series: &WeatherSeries,
    averages: &Averages,
    today: NaiveDate,
) -> String {
    let current_date = today.format("%Y-%m-%d");
    let recent_days = series
        .last_days(RECENT_DAYS_IN_PROMPT)
        .iter()
        .map(|day| {
            format!(
                "{}: {}°C, {}mm rain, {} m/s wind",
                day.date.format("%Y-%m-%d"),
                day.temperature,
                day.precipitation,
                day.wind_speed
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let future_note = if request.date_context.is_future() {
        format!(
            r#"
The user is asking about a future date. Today is {current_date}.
- Work out the concrete calendar date they mean (e.g. the next occurring weekday for "next Tuesday") and name it explicitly
- State clearly that this is historical NASA data describing typical patterns for that location and time of year, NOT a live forecast
- Recommend checking a live weather service for an actual forecast
"#
        )
    } else {
        String::new()
    };

    format!(
        r#"You are a professional weather analyst. Current date: {current_date}

A user asked: "{user_query}"

NASA POWER satellite data for {location}:
- Date Range: {start} to {end}
- Average Temperature: {temperature}°C
- Average Precipitation: {precipitation}mm
- Average Wind Speed: {wind} m/s

Recent daily data:
{recent_days}
{future_note}
State today's date ({current_date}) in your answer. Respond with exactly three parts, one per line:
1. Summary headline (1 line, like "☁️ Conditions look favorable" or "🌡️ Warm and dry period")
2. Detailed explanation (2-3 sentences about the weather patterns, being accurate about dates)
3. NASA dataset note (1 sentence mentioning the data source and time period)

Use minimal weather icons (☁️🌡️💨) only where relevant. Be professional and concise."#,
        start = request.start_date.format("%Y-%m-%d"),
        end = request.end_date.format("%Y-%m-%d"),
        temperature = averages.temperature,
        precipitation = averages.precipitation,
        wind = averages.wind_speed,
    )
}
