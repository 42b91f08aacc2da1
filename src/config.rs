//! Configuration types for the advisory client.

use crate::error::{AdvisoryError, Result};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding a comma-separated endpoint override.
pub const ENV_API_URL: &str = "AGRISAKHA_API_URL";
/// Environment variable selecting the conversation language.
pub const ENV_LANGUAGE: &str = "AGRISAKHA_LANGUAGE";
/// Environment variable overriding the location sent with advisory queries.
pub const ENV_LOCATION: &str = "AGRISAKHA_LOCATION";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgriConfig {
    /// Initial conversation language.
    pub language: Language,
    /// Candidate backend endpoints.
    pub endpoints: EndpointConfig,
    /// Health monitor settings.
    pub monitor: MonitorConfig,
    /// Backend route paths.
    pub routes: RouteConfig,
    /// Accepted response field names.
    pub fields: ResponseFieldConfig,
    /// Dispatcher settings.
    pub dispatch: DispatchConfig,
    /// Voice I/O settings.
    pub voice: VoiceConfig,
}

/// Ordered list of backend base URLs. Earlier entries are preferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub urls: Vec<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            urls: vec![
                "https://agrisakha-backend.railway.app".to_owned(),
                "https://agrisakha-backend-production.up.railway.app".to_owned(),
                "http://localhost:8000".to_owned(),
            ],
        }
    }
}

/// Endpoint health monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Per-endpoint liveness timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Interval between probe sweeps in seconds.
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            interval_secs: 30,
        }
    }
}

impl MonitorConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Backend route paths. The backend contract has changed across releases,
/// so none of these are hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Liveness probe path.
    pub health: String,
    /// Text advisory path.
    pub advisory: String,
    /// Image analysis path.
    pub image: String,
    /// Multipart field carrying the image.
    pub image_field: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            health: "/health".to_owned(),
            advisory: "/advisory".to_owned(),
            image: "/upload-image".to_owned(),
            image_field: "file".to_owned(),
        }
    }
}

impl RouteConfig {
    /// Join a base endpoint URL and a route path.
    pub fn url(endpoint: &str, path: &str) -> String {
        format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// JSON field aliases accepted when normalizing backend responses.
///
/// Each list is searched in order; the first present, non-empty field wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseFieldConfig {
    /// Free-text advice fields.
    pub text: Vec<String>,
    /// Disease label fields.
    pub disease: Vec<String>,
    /// Confidence fields (0–1).
    pub confidence: Vec<String>,
    /// Analysis text fields.
    pub analysis: Vec<String>,
    /// Recommendation text fields.
    pub recommendations: Vec<String>,
    /// Filename fields.
    pub filename: Vec<String>,
    /// Disease label meaning "no disease found".
    pub healthy_label: String,
}

impl Default for ResponseFieldConfig {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| (*s).to_owned()).collect()
        }
        Self {
            text: names(&["advice", "response", "message"]),
            disease: names(&["detected_disease", "disease", "prediction"]),
            confidence: names(&["confidence"]),
            analysis: names(&["analysis"]),
            recommendations: names(&["recommendations"]),
            filename: names(&["filename"]),
            healthy_label: "healthy".to_owned(),
        }
    }
}

/// Advisory dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Timeout for text advisory requests in milliseconds.
    pub text_timeout_ms: u64,
    /// Timeout for image analysis requests in milliseconds.
    pub image_timeout_ms: u64,
    /// Location sent with advisory queries.
    pub location: String,
    /// Largest accepted image upload in bytes.
    pub max_image_bytes: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            text_timeout_ms: 15_000,
            image_timeout_ms: 30_000,
            location: "Delhi".to_owned(),
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

impl DispatchConfig {
    pub fn text_timeout(&self) -> Duration {
        Duration::from_millis(self.text_timeout_ms)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }
}

/// Voice I/O configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Replies longer than this many characters are never spoken automatically.
    pub auto_speak_max_chars: usize,
    /// Speech rate multiplier.
    pub rate: f32,
    /// Speech pitch multiplier.
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            auto_speak_max_chars: 200,
            rate: 0.8,
            pitch: 1.0,
        }
    }
}

impl AgriConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AdvisoryError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AdvisoryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    ///
    /// `$AGRISAKHA_CONFIG_DIR/config.toml` when set, otherwise
    /// `dirs::config_dir()/agrisakha/config.toml`.
    pub fn default_config_path() -> PathBuf {
        let dir = std::env::var_os("AGRISAKHA_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join("agrisakha")))
            .unwrap_or_else(|| PathBuf::from("/tmp/agrisakha-config"));
        dir.join("config.toml")
    }

    /// Load the config file at `path` if it exists (defaults otherwise), then
    /// apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed or the result is invalid.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    ///
    /// An endpoint override replaces the whole list rather than extending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the language override is not recognized.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(ENV_API_URL) {
            let urls: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
            if !urls.is_empty() {
                self.endpoints.urls = urls;
            }
        }
        if let Some(raw) = lookup(ENV_LANGUAGE) {
            self.language = raw.parse().map_err(AdvisoryError::Config)?;
        }
        if let Some(location) = lookup(ENV_LOCATION) {
            let location = location.trim();
            if !location.is_empty() {
                self.dispatch.location = location.to_owned();
            }
        }
        Ok(())
    }

    /// Check that the configuration can drive the client.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.urls.is_empty() {
            return Err(AdvisoryError::Config("endpoint list is empty".into()));
        }
        for raw in &self.endpoints.urls {
            let parsed = url::Url::parse(raw)
                .map_err(|e| AdvisoryError::Config(format!("invalid endpoint '{raw}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AdvisoryError::Config(format!(
                    "endpoint '{raw}' must use http or https"
                )));
            }
        }
        if self.monitor.probe_timeout_ms == 0 || self.monitor.interval_secs == 0 {
            return Err(AdvisoryError::Config(
                "monitor timeout and interval must be positive".into(),
            ));
        }
        if self.dispatch.text_timeout_ms == 0 || self.dispatch.image_timeout_ms == 0 {
            return Err(AdvisoryError::Config(
                "dispatch timeouts must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = AgriConfig::default_config_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn default_config_is_valid() {
        let config = AgriConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoints.urls.len(), 3);
        assert_eq!(config.monitor.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.monitor.interval(), Duration::from_secs(30));
        assert_eq!(config.dispatch.text_timeout(), Duration::from_secs(15));
        assert_eq!(config.dispatch.image_timeout(), Duration::from_secs(30));
        assert_eq!(config.voice.auto_speak_max_chars, 200);
    }

    #[test]
    fn env_endpoint_override_replaces_list() {
        let mut config = AgriConfig::default();
        config
            .apply_overrides(lookup(&[(ENV_API_URL, "http://a:1, http://b:2")]))
            .unwrap();
        assert_eq!(config.endpoints.urls, vec!["http://a:1", "http://b:2"]);
    }

    #[test]
    fn blank_endpoint_override_is_ignored() {
        let mut config = AgriConfig::default();
        config
            .apply_overrides(lookup(&[(ENV_API_URL, " , ")]))
            .unwrap();
        assert_eq!(config.endpoints.urls.len(), 3);
    }

    #[test]
    fn language_and_location_overrides() {
        let mut config = AgriConfig::default();
        config
            .apply_overrides(lookup(&[(ENV_LANGUAGE, "Hindi"), (ENV_LOCATION, "Pune")]))
            .unwrap();
        assert_eq!(config.language, Language::Hindi);
        assert_eq!(config.dispatch.location, "Pune");
    }

    #[test]
    fn unknown_language_override_is_config_error() {
        let mut config = AgriConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_LANGUAGE, "Klingon")]))
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn validate_rejects_bad_endpoints() {
        let mut config = AgriConfig::default();
        config.endpoints.urls.clear();
        assert!(config.validate().is_err());

        config.endpoints.urls = vec!["not a url".into()];
        assert!(config.validate().is_err());

        config.endpoints.urls = vec!["ftp://example.com".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn route_url_joins_without_double_slash() {
        assert_eq!(
            RouteConfig::url("http://host:8000/", "/health"),
            "http://host:8000/health"
        );
        assert_eq!(
            RouteConfig::url("http://host:8000", "advisory"),
            "http://host:8000/advisory"
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AgriConfig::default();
        config.language = Language::Hindi;
        config.routes.image = "/analyze-image".into();
        config.dispatch.location = "Nagpur".into();

        config.save_to_file(&path).unwrap();
        let loaded = AgriConfig::from_file(&path).unwrap();
        assert_eq!(loaded.language, Language::Hindi);
        assert_eq!(loaded.routes.image, "/analyze-image");
        assert_eq!(loaded.dispatch.location, "Nagpur");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AgriConfig = toml::from_str(
            r#"
            language = "Hindi"

            [routes]
            advisory = "/chat"
            "#,
        )
        .unwrap();
        assert_eq!(config.language, Language::Hindi);
        assert_eq!(config.routes.advisory, "/chat");
        assert_eq!(config.routes.health, "/health");
        assert_eq!(config.fields.healthy_label, "healthy");
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "language = [").unwrap();
        assert!(AgriConfig::from_file(&path).is_err());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgriConfig::load(&dir.path().join("absent.toml"));
        assert!(config.is_ok());
    }
}
