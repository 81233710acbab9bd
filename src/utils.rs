/// Shared utility functions for the weather companion service
use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

/// Round `value` to `places` decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use weather_companion::utils::round_to;
///
/// assert_eq!(round_to(12.345, 1), 12.3);
/// assert_eq!(round_to(0.126, 2), 0.13);
/// assert_eq!(round_to(-0.04, 1), 0.0);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // Normalize -0.0 to 0.0 for cleaner API responses
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Run `primary`; on failure log the error under `label` and return `fallback()`.
///
/// Every external narration call goes through here so a model failure never
/// escapes as a raw error.
pub async fn attempt_or_fallback<T, E, Fut, F>(label: &str, primary: Fut, fallback: F) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    F: FnOnce() -> T,
{
    match primary.await {
        Ok(value) => {
            debug!("{} succeeded", label);
            value
        }
        Err(e) => {
            warn!("{} failed, using fallback: {}", label, e);
            fallback()
        }
    }
}

/// Shorten an upstream response body for log and error messages.
pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
