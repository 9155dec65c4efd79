//! Export settings: document version and generator metadata.
//!
//! Defaults identify this crate as the generator. A TOML document may override
//! any subset of the keys:
//!
//! ```toml
//! uddf_version = "3.0.0"
//! generated_at = "2024-01-01T00:00:00Z"
//!
//! [generator]
//! name = "divelog"
//! version = "1.2.0"
//! kind = "converter"
//!
//! [manufacturer]
//! id = "example.org"
//! name = "Example"
//! contact = "support@example.org"
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub name: String,
    pub version: String,
    pub kind: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            kind: "converter".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ManufacturerConfig {
    pub id: String,
    pub name: String,
    pub contact: String,
}

impl Default for ManufacturerConfig {
    fn default() -> Self {
        Self {
            id: "divelog".to_string(),
            name: "Divelog".to_string(),
            contact: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub uddf_version: String,
    pub generator: GeneratorConfig,
    pub manufacturer: ManufacturerConfig,
    /// Fixed generator timestamp; the current time is used when unset.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            uddf_version: "3.0.0".to_string(),
            generator: GeneratorConfig::default(),
            manufacturer: ManufacturerConfig::default(),
            generated_at: None,
        }
    }
}

impl ExportConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: ExportConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_generated_at(mut self, datetime: DateTime<Utc>) -> Self {
        self.generated_at = Some(datetime);
        self
    }

    pub fn generation_time(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.uddf_version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "uddf_version",
                message: "must not be empty".to_string(),
            });
        }
        if self.generator.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "generator.name",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
