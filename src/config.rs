/// Build-time configuration for the extension and web UI
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Handoff records older than this are removed by the cleanup sweep
pub const HANDOFF_MAX_AGE_MS: f64 = 3_600_000.0;
pub const CLEANUP_ALARM: &str = "cleanup";
pub const CLEANUP_PERIOD_MINUTES: u32 = 60;

pub const BANNER_TIMEOUT_MS: i32 = 5000;
pub const BADGE_COLOR: &str = "#e60023";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
}

impl Config {
    /// Read the backend URL baked in at compile time via `PIN_SAVER_BACKEND_URL`
    pub fn from_env() -> Config {
        Config::with_backend_url(option_env!("PIN_SAVER_BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL))
    }

    /// Falls back to the default when `raw` is not an http(s) URL
    pub fn with_backend_url(raw: &str) -> Config {
        let trimmed = raw.trim().trim_end_matches('/');
        let valid = Url::parse(trimmed)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);

        if valid {
            Config { backend_url: trimmed.to_string() }
        } else {
            log::warn!("Ignoring invalid backend URL {:?}, using {}", raw, DEFAULT_BACKEND_URL);
            Config { backend_url: DEFAULT_BACKEND_URL.to_string() }
        }
    }

    /// Absolute URL for an API path such as `/api/boards`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_env()
    }
}
