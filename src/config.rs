/// Application settings
///
/// Settings come from `settings.json` in the user's config directory:
/// - Linux: ~/.config/prompt-studio/settings.json
/// - macOS: ~/Library/Application Support/prompt-studio/settings.json
/// - Windows: %APPDATA%\prompt-studio\settings.json
///
/// Environment variables override the file. A missing API key is not an
/// error here; it surfaces when a generation is attempted.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the generation API
    pub endpoint: String,
    /// Model identifier used for every request
    pub model: String,
    /// Request timeout; `None` waits forever
    pub request_timeout_secs: Option<u64>,
    /// API credential, never written back to disk
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            api_key: None,
        }
    }
}

impl Settings {
    /// Load settings from disk and the process environment
    pub fn load() -> Self {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::from_file(&path),
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Path of the settings file, if a config directory exists
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("prompt-studio");
            path.push("settings.json");
            path
        })
    }

    fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    info!("📁 Settings loaded from {}", path.display());
                    settings
                }
                Err(err) => {
                    warn!("Ignoring malformed settings file {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(model) = non_empty("PROMPT_STUDIO_MODEL") {
            self.model = model;
        }
        if let Some(endpoint) = non_empty("PROMPT_STUDIO_ENDPOINT") {
            self.endpoint = endpoint;
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.request_timeout_secs, Some(120));
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "model": "custom-model" }"#).unwrap();
        assert_eq!(settings.model, "custom-model");
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let settings = Settings {
            api_key: Some("secret".into()),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("API_KEY", "fallback-key"),
            ("PROMPT_STUDIO_MODEL", "other-model"),
            ("PROMPT_STUDIO_ENDPOINT", "   "),
        ]);
        let mut settings = Settings::default();
        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(settings.model, "other-model");
        // Blank values are ignored
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_primary_key_wins() {
        let env: HashMap<&str, &str> =
            HashMap::from([("GEMINI_API_KEY", "primary"), ("API_KEY", "fallback")]);
        let mut settings = Settings::default();
        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.api_key.as_deref(), Some("primary"));
    }
}
