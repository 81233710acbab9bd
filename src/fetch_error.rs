#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("No data grid cell covers the requested location")]
    NotCovered,
    #[error("Weather data service unavailable (status {0})")]
    ServiceUnavailable(u16),
    #[error("Weather data service returned unexpected status {0}")]
    UnexpectedStatus(u16),
    #[error("Response is missing required parameter {0}")]
    MissingParameter(&'static str),
    #[error("Failed to parse weather data: {0}")]
    ParseError(String),
    #[error("No complete observations in the requested range")]
    NoData,
}
