use config::{Config, File};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        SettingsError::Configuration(err.to_string())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Console behaviour that users may want to tune.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UiSettings {
    #[serde(default = "default_projects_page_size")]
    pub projects_page_size: usize,
    #[serde(default = "default_reports_page_size")]
    pub reports_page_size: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,
}

fn default_base_url() -> String {
    radiolab_api::DEFAULT_BASE_URL.to_string()
}

fn default_projects_page_size() -> usize {
    6
}

fn default_reports_page_size() -> usize {
    5
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_redirect_delay_ms() -> u64 {
    2000
}

fn default_notification_ttl_ms() -> u64 {
    4000
}

fn default_analysis_delay_ms() -> u64 {
    1500
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            projects_page_size: default_projects_page_size(),
            reports_page_size: default_reports_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            redirect_delay_ms: default_redirect_delay_ms(),
            notification_ttl_ms: default_notification_ttl_ms(),
            analysis_delay_ms: default_analysis_delay_ms(),
        }
    }
}

impl UiSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

impl Settings {
    /// Load from `RADIOLAB_CONFIG` (default `radiolab.toml`, optional) overlaid by
    /// `RADIOLAB__SECTION__KEY` environment variables.
    pub fn new() -> Result<Self, SettingsError> {
        let config_path =
            std::env::var("RADIOLAB_CONFIG").unwrap_or_else(|_| "radiolab.toml".to_string());
        Self::load(&config_path)
    }

    /// Load from the given file (optional) overlaid by `RADIOLAB__SECTION__KEY`
    /// environment variables.
    pub fn load(config_path: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("RADIOLAB").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.api.base_url.is_empty() {
            return Err(SettingsError::Invalid("api.base_url is required".to_string()));
        }
        if !self.api.base_url.starts_with("http") {
            return Err(SettingsError::Invalid(
                "api.base_url must be a valid HTTP(S) URL".to_string(),
            ));
        }
        if self.ui.projects_page_size == 0 || self.ui.reports_page_size == 0 {
            return Err(SettingsError::Invalid(
                "ui page sizes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_file_is_empty() {
        let settings = from_toml("");

        assert_eq!(settings.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(settings.ui, UiSettings::default());
        assert_eq!(settings.ui.projects_page_size, 6);
        assert_eq!(settings.ui.reports_page_size, 5);
        assert_eq!(settings.ui.redirect_delay(), Duration::from_secs(2));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = from_toml(
            r#"
            [api]
            base_url = "https://radiolab.example.org"

            [ui]
            reports_page_size = 10
            "#,
        );

        assert_eq!(settings.api.base_url, "https://radiolab.example.org");
        assert_eq!(settings.ui.reports_page_size, 10);
        assert_eq!(settings.ui.projects_page_size, 6);
        assert_eq!(settings.ui.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://files".to_string();
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut settings = Settings::default();
        settings.ui.projects_page_size = 0;
        assert!(settings.validate().is_err());
    }
}
