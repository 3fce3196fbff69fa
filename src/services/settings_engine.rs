// ScrollWise Settings Engine
// Manages client settings: loading, saving, updating individual values, and resetting to defaults.
// Settings are stored as a JSON file at the platform-specific config path; a few
// environment variables override the file for one-off runs.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ClientSettings;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SCROLLWISE_CONFIG";
/// Overrides `api_base_url`.
pub const API_URL_ENV: &str = "SCROLLWISE_API_URL";
/// Overrides `request_timeout_secs`.
pub const TIMEOUT_ENV: &str = "SCROLLWISE_TIMEOUT_SECS";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ClientSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ClientSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ClientSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise uses `$SCROLLWISE_CONFIG`, falling back to `settings.json`
    /// in the platform-specific config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => match std::env::var(CONFIG_PATH_ENV) {
                Ok(p) if !p.is_empty() => p,
                _ => platform::get_config_dir()
                    .join("settings.json")
                    .to_string_lossy()
                    .to_string(),
            },
        };

        Self {
            config_path,
            settings: ClientSettings::default(),
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), SettingsError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup. Overrides are
    /// validated but never written back to disk.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.settings.clone();
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            next.api_base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            next.request_timeout_secs = raw.trim().parse().map_err(|_| {
                SettingsError::InvalidValue(format!("{} must be a number of seconds: {}", TIMEOUT_ENV, raw))
            })?;
        }
        validate(&next)?;
        if next != self.settings {
            debug!(api_base_url = %next.api_base_url, "settings overridden from environment");
        }
        self.settings = next;
        Ok(())
    }
}

/// Rejects settings the client cannot run with.
fn validate(settings: &ClientSettings) -> Result<(), SettingsError> {
    let url = settings.api_base_url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SettingsError::InvalidValue(format!(
            "api_base_url must start with http:// or https://: {}",
            url
        )));
    }
    if settings.request_timeout_secs == 0 {
        return Err(SettingsError::InvalidValue(
            "request_timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<ClientSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ClientSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: ClientSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        validate(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Updates a single top-level setting and saves to disk.
    ///
    /// The value goes through a JSON round trip so type mismatches are caught
    /// by deserialization, then the result is validated.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        match &mut json_value {
            serde_json::Value::Object(map) if map.contains_key(key) => {
                map.insert(key.to_string(), value);
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
        }

        let new_settings: ClientSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        validate(&new_settings)?;

        self.settings = new_settings;
        self.save()?;

        Ok(())
    }

    /// Resets all settings to factory defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ClientSettings::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
