use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::models::DateContext;

/// Inclusive calendar window for a data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Human-readable form, e.g. `2025-10-03 to 2025-10-04`.
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Compute the data window for a date context relative to `today`.
///
/// The satellite source lags several days behind real time, so every window
/// reaches back at least one day. Future-leaning contexts widen forward to
/// pick up historical analogs; they never describe a forecast.
///
/// | context  | start                | end          |
/// |----------|----------------------|--------------|
/// | today    | today - 1            | today        |
/// | tomorrow | today                | today + 1    |
/// | custom   | today - 1            | today + 14   |
/// | default  | today - 8            | today - 1    |
pub fn resolve_date_range(context: DateContext, today: NaiveDate) -> DateRange {
    let yesterday = today - Duration::days(1);

    let (start, end) = match context {
        DateContext::Today => (yesterday, today),
        DateContext::Tomorrow => (today, today + Duration::days(1)),
        DateContext::Custom => (yesterday, today + Duration::days(14)),
        DateContext::Default => (yesterday - Duration::days(7), yesterday),
    };

    DateRange { start, end }
}
