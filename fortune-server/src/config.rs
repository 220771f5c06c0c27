//! Host-supplied configuration.
//!
//! The browser has no process environment, so the JS shell reads its build-time
//! variables and hands them to [`crate::configure`] as one JSON document. Every
//! field is optional: missing Firebase settings select the local counter
//! store, a missing measurement id turns analytics into log lines.

use serde::Deserialize;

use crate::error::ConfigError;

/// Default time the loading animation plays before the fortune is drawn.
pub const DEFAULT_LOADING_DWELL_MS: u32 = 1800;

/// Upper bound for the configurable dwell; anything longer is a typo.
const MAX_LOADING_DWELL_MS: u32 = 10_000;

/// Firebase web-app settings, named the way the Firebase console prints them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    #[serde(rename = "databaseURL")]
    pub database_url: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl FirebaseConfig {
    /// The remote store is only usable with a key, a database URL and a project.
    pub fn is_enabled(&self) -> bool {
        is_set(&self.api_key) && is_set(&self.database_url) && is_set(&self.project_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
    pub ga4_measurement_id: Option<String>,
    pub loading_dwell_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            firebase: FirebaseConfig::default(),
            ga4_measurement_id: None,
            loading_dwell_ms: DEFAULT_LOADING_DWELL_MS,
        }
    }
}

impl AppConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        if config.loading_dwell_ms > MAX_LOADING_DWELL_MS {
            return Err(ConfigError::InvalidDwell(config.loading_dwell_ms));
        }
        Ok(config)
    }

    pub fn is_firebase_enabled(&self) -> bool {
        self.firebase.is_enabled()
    }

    /// Measurement id when GA4 is configured.
    pub fn ga4_id(&self) -> Option<&str> {
        self.ga4_measurement_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.is_firebase_enabled());
        assert_eq!(config.ga4_id(), None);
        assert_eq!(config.loading_dwell_ms, DEFAULT_LOADING_DWELL_MS);
    }

    #[test]
    fn firebase_needs_key_url_and_project() {
        let config = AppConfig::from_json(
            r#"{"firebase":{"apiKey":"k","databaseURL":"https://demo.firebaseio.com"}}"#,
        )
        .unwrap();
        assert!(!config.is_firebase_enabled());

        let config = AppConfig::from_json(
            r#"{"firebase":{"apiKey":"k","databaseURL":"https://demo.firebaseio.com","projectId":"demo"}}"#,
        )
        .unwrap();
        assert!(config.is_firebase_enabled());
        assert_eq!(
            config.firebase.database_url.as_deref(),
            Some("https://demo.firebaseio.com")
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_json(
            r#"{"firebase":{"apiKey":" ","databaseURL":"u","projectId":"p"},"ga4MeasurementId":""}"#,
        )
        .unwrap();
        assert!(!config.is_firebase_enabled());
        assert_eq!(config.ga4_id(), None);
    }

    #[test]
    fn ga4_id_is_trimmed() {
        let config = AppConfig::from_json(r#"{"ga4MeasurementId":" G-ABC123 "}"#).unwrap();
        assert_eq!(config.ga4_id(), Some("G-ABC123"));
    }

    #[test]
    fn rejects_absurd_dwell() {
        let result = AppConfig::from_json(r#"{"loadingDwellMs":60000}"#);
        assert!(matches!(result, Err(ConfigError::InvalidDwell(60000))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(AppConfig::from_json("not json {{").is_err());
    }
}
