use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://192.168.1.100:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("ANALYZER_API_URL").ok().as_deref(),
            env::var("ANALYZER_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    pub fn from_values(api_url: Option<&str>, timeout_secs: Option<&str>) -> Self {
        let api_url = api_url
            .map(|val| val.trim().trim_end_matches('/'))
            .filter(|val| !val.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();
        let timeout = timeout_secs
            .and_then(|val| val.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self { api_url, timeout }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
