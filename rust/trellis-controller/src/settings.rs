//! Controller configuration.
//!
//! Settings are JSON; every field has a default, so `{}` is a complete
//! configuration:
//!
//! ```json
//! {
//!   "backoff": { "baseSeconds": 5, "multiplier": 2, "ceilingSeconds": 21600 },
//!   "subjects": { "update": "claims.update", "delete": "claims.delete" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backoff: BackoffSettings,
    pub subjects: Subjects,
}

/// Retry timing after failed passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackoffSettings {
    /// Delay after the first failure.
    pub base_seconds: u64,
    /// Factor applied per further consecutive failure.
    pub multiplier: u32,
    /// Upper bound of the delay.
    pub ceiling_seconds: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            base_seconds: 5,
            multiplier: 2,
            ceiling_seconds: 6 * 60 * 60,
        }
    }
}

/// Control subjects account tokens are published on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subjects {
    pub update: String,
    pub delete: String,
}

impl Default for Subjects {
    fn default() -> Self {
        Self {
            update: "claims.update".to_string(),
            delete: "claims.delete".to_string(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let backoff = &self.backoff;
        if backoff.base_seconds == 0 {
            return Err(SettingsError::Invalid("backoff base must be positive"));
        }
        if backoff.multiplier == 0 {
            return Err(SettingsError::Invalid("backoff multiplier must be positive"));
        }
        if backoff.ceiling_seconds < backoff.base_seconds {
            return Err(SettingsError::Invalid(
                "backoff ceiling must not be below the base",
            ));
        }
        if self.subjects.update.is_empty() || self.subjects.delete.is_empty() {
            return Err(SettingsError::Invalid("subjects must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_every_field() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.backoff.ceiling_seconds, 21_600);
        assert_eq!(settings.subjects.update, "claims.update");
    }

    #[test]
    fn it_overrides_single_fields() {
        let settings =
            Settings::from_json(r#"{"backoff":{"baseSeconds":1},"subjects":{"delete":"x.del"}}"#)
                .unwrap();
        assert_eq!(settings.backoff.base_seconds, 1);
        assert_eq!(settings.backoff.multiplier, 2);
        assert_eq!(settings.subjects.update, "claims.update");
        assert_eq!(settings.subjects.delete, "x.del");
    }

    #[test]
    fn it_rejects_a_zero_base() {
        assert!(matches!(
            Settings::from_json(r#"{"backoff":{"baseSeconds":0}}"#),
            Err(SettingsError::Invalid(_))
        ));
    }
}
