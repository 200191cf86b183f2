//! # Recolor Configuration
//!
//! Configuration for a recolor session. It is the common interface between the
//! CLI and the library: the CLI builds one from the environment plus flags, the
//! library turns it into [`ProviderSettings`] when the edit client is
//! constructed. The API key is injected here rather than read ambiently so the
//! controller and client can be tested without touching the process environment.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Environment | Default |
//! |-----------|------|-------------|---------|
//! | `api_key` | `Option<String>` | `GEMINI_API_KEY`, then `API_KEY` | none |
//! | `api_base` | `String` | `GEMINI_API_BASE` | `https://generativelanguage.googleapis.com/v1beta` |
//! | `model` | `String` | `GEMINI_MODEL` | `gemini-2.5-flash-image` |
//! | `output_dir` | `PathBuf` | none | `.` |
//!
//! A missing key is not a configuration error. It surfaces as
//! `MissingCredentials` when an edit is submitted, before any network call.
//!
//! ## Examples
//!
//! ```rust
//! use accessory_recolor::config::RecolorConfig;
//!
//! let config = RecolorConfig::default().with_api_key("test-key");
//! assert!(config.validate().is_ok());
//!
//! let settings = config.to_provider_settings();
//! assert_eq!(settings.model, "gemini-2.5-flash-image");
//! ```

use std::path::PathBuf;

use crate::provider::ProviderSettings;

/// Default endpoint root for the generative image provider.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image editing model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration structure for recolor sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecolorConfig {
    /// Provider API key. `None` or empty fails at submit time.
    pub api_key: Option<String>,

    /// Provider endpoint root without a trailing slash.
    pub api_base: String,

    /// Model used for the `generateContent` call.
    pub model: String,

    /// Directory where downloaded results are written.
    pub output_dir: PathBuf,
}

impl Default for RecolorConfig {
    /// Default values:
    /// - `api_key`: None
    /// - `api_base`: [`DEFAULT_API_BASE`]
    /// - `model`: [`DEFAULT_MODEL`]
    /// - `output_dir`: current directory
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl RecolorConfig {
    /// Creates a new configuration with the specified parameters.
    pub fn new(
        api_key: Option<String>,
        api_base: String,
        model: String,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            api_key,
            api_base,
            model,
            output_dir,
        }
    }

    /// Build a configuration from process environment variables.
    ///
    /// Blank values are treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            api_key: API_KEY_ENV_VARS.into_iter().find_map(|name| non_empty(name)),
            api_base: non_empty("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            output_dir: defaults.output_dir,
        }
    }

    /// Replace the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replace the endpoint root. A trailing slash is dropped.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base.trim().is_empty() {
            return Err("API base URL must not be empty".to_string());
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(format!(
                "API base URL must start with http:// or https:// (got {})",
                self.api_base
            ));
        }
        if self.model.trim().is_empty() {
            return Err("Model name must not be empty".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("Output directory must not be empty".to_string());
        }
        Ok(())
    }

    /// True when a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Convert to the settings consumed by the provider client.
    pub fn to_provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RecolorConfig::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RecolorConfig::default();

        // Valid config should pass, even without a key
        assert!(config.validate().is_ok());

        // Invalid base URL
        config.api_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.api_base = String::new();
        assert!(config.validate().is_err());
        config.api_base = DEFAULT_API_BASE.to_string(); // Reset

        // Invalid model
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
        config.model = DEFAULT_MODEL.to_string(); // Reset

        // Invalid output dir
        config.output_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_prefers_gemini_key() {
        let config = RecolorConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "fallback"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("primary"));

        let config = RecolorConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "   "),
            ("API_KEY", "fallback"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_lookup_overrides_endpoint_and_model() {
        let config = RecolorConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_BASE", "http://localhost:8080/v1/"),
            ("GEMINI_MODEL", "custom-model"),
        ]));
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_builders_and_provider_settings() {
        let config = RecolorConfig::default()
            .with_api_key("k")
            .with_api_base("http://127.0.0.1:9000/")
            .with_model("m")
            .with_output_dir("/tmp/out");
        assert!(config.has_api_key());

        let settings = config.to_provider_settings();
        assert_eq!(settings.api_key.as_deref(), Some("k"));
        assert_eq!(settings.api_base, "http://127.0.0.1:9000");
        assert_eq!(settings.model, "m");
    }
}
