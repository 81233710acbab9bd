use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub geocoder_url: String,
    pub power_api_url: String,
    pub http_timeout_seconds: u64,
    pub user_agent: String,
    pub fallback_location: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Every setting has a default; a missing `GEMINI_API_KEY` disables the
    /// narration model rather than failing.
    pub fn from_env() -> Result<Self, env::VarError> {
        let gemini_api_key = match env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(key),
            Ok(_) | Err(env::VarError::NotPresent) => None,
            Err(e) => return Err(e),
        };

        Ok(Config {
            server_host: var_or("SERVER_HOST", "0.0.0.0"),
            server_port: var_or("SERVER_PORT", "8080").parse().unwrap_or(8080),
            gemini_api_key,
            gemini_model: var_or("GEMINI_MODEL", "gemini-2.5-flash"),
            gemini_base_url: var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            geocoder_url: var_or("GEOCODER_URL", "https://nominatim.openstreetmap.org/search"),
            power_api_url: var_or(
                "POWER_API_URL",
                "https://power.larc.nasa.gov/api/temporal/daily/point",
            ),
            http_timeout_seconds: var_or("HTTP_TIMEOUT_SECONDS", "30").parse().unwrap_or(30),
            user_agent: var_or("USER_AGENT", "NASA Weather Companion/1.0"),
            fallback_location: var_or("FALLBACK_LOCATION", "New York, NY"),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn model_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}
