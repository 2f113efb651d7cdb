use std::time::Duration;

use crate::services::prompts::Origin;
use crate::services::report::ReportSettings;
use crate::services::retry::RetryPolicy;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_SNOW_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TRAVEL_MODEL: &str = "gemini-2.5-flash";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    /// Model for the structured snow/forecast request.
    pub snow_model: String,
    /// Model for the maps-grounded travel request.
    pub travel_model: String,
    pub port: u16,
    pub retry_max_retries: u32,
    pub retry_initial_delay_ms: u64,
    pub origin_name: String,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set"),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            snow_model: std::env::var("SNOW_MODEL")
                .unwrap_or_else(|_| DEFAULT_SNOW_MODEL.to_string()),
            travel_model: std::env::var("TRAVEL_MODEL")
                .unwrap_or_else(|_| DEFAULT_TRAVEL_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            retry_max_retries: std::env::var("RETRY_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("RETRY_MAX_RETRIES must be a non-negative integer"),
            retry_initial_delay_ms: std::env::var("RETRY_INITIAL_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RETRY_INITIAL_DELAY_MS must be a non-negative integer"),
            origin_name: std::env::var("ORIGIN_NAME")
                .unwrap_or_else(|_| "Sapporo City Center".to_string()),
            origin_lat: std::env::var("ORIGIN_LAT")
                .unwrap_or_else(|_| "43.0621".to_string())
                .parse()
                .expect("ORIGIN_LAT must be a number"),
            origin_lon: std::env::var("ORIGIN_LON")
                .unwrap_or_else(|_| "141.3544".to_string())
                .parse()
                .expect("ORIGIN_LON must be a number"),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("HTTP_TIMEOUT_SECS must be a non-negative integer"),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry_max_retries,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
        }
    }

    /// Where travel distances and times are measured from.
    pub fn origin(&self) -> Origin {
        Origin {
            name: self.origin_name.clone(),
            latitude: self.origin_lat,
            longitude: self.origin_lon,
        }
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            snow_model: self.snow_model.clone(),
            travel_model: self.travel_model.clone(),
            origin: self.origin(),
            retry: self.retry_policy(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // NOTE: set_var/remove_var in tests is unsafe in multi-threaded contexts.
        // This is the only test in the crate that touches the environment.
        unsafe {
            std::env::set_var("GEMINI_API_KEY", "test-key");
            for var in [
                "GEMINI_BASE_URL",
                "SNOW_MODEL",
                "TRAVEL_MODEL",
                "PORT",
                "RETRY_MAX_RETRIES",
                "RETRY_INITIAL_DELAY_MS",
                "ORIGIN_NAME",
                "ORIGIN_LAT",
                "ORIGIN_LON",
                "HTTP_TIMEOUT_SECS",
            ] {
                std::env::remove_var(var);
            }
        }

        let config = AppConfig::from_env();

        assert_eq!(config.gemini_api_key, "test-key");
        assert_eq!(config.port, 8080);
        assert_eq!(config.snow_model, "gemini-3-flash-preview");
        assert_eq!(config.travel_model, "gemini-2.5-flash");
        assert!(config.gemini_base_url.contains("generativelanguage"));

        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));

        let origin = config.origin();
        assert_eq!(origin.name, "Sapporo City Center");
        assert!((origin.latitude - 43.0621).abs() < 1e-9);
        assert!((origin.longitude - 141.3544).abs() < 1e-9);

        let settings = config.report_settings();
        assert_eq!(settings.snow_model, config.snow_model);
        assert_eq!(settings.retry, policy);
        assert_eq!(config.http_timeout(), Duration::from_secs(60));
    }
}
