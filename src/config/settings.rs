//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Every field has a default, so an empty object (or no file at all)
//! reproduces the stock generator run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::capacitor::{CapacitorFilter, DEFAULT_FAMILY, DEFAULT_SUPPLIER};
use crate::error::ConfigError;
use crate::render::RESERVED_TEMPLATE;
use crate::series::{DEFAULT_DECADES, DEFAULT_PACKAGES};

/// Largest decade count accepted (values up to 9.76e8, well inside `T`).
pub const MAX_DECADES: u32 = 9;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Directory holding the `*.in` templates.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Directory the generated libraries are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Variables available to every template.
    #[serde(default = "default_globals")]
    pub globals: BTreeMap<String, String>,

    /// Resistor library settings.
    #[serde(default)]
    pub resistors: ResistorConfig,

    /// Capacitor library settings.
    #[serde(default)]
    pub capacitors: CapacitorConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            template_dir: default_template_dir(),
            output_dir: default_output_dir(),
            globals: default_globals(),
            resistors: ResistorConfig::default(),
            capacitors: CapacitorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let decades = self.resistors.decades;
        if decades == 0 || decades > MAX_DECADES {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid decade count {decades}. Must be 1 to {MAX_DECADES}"),
            });
        }

        if self.resistors.packages.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "At least one resistor package is required".to_string(),
            });
        }

        for (section, template) in [
            ("resistors", &self.resistors.template),
            ("capacitors", &self.capacitors.template),
        ] {
            if template.is_empty() || template == RESERVED_TEMPLATE {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Invalid {section} template '{template}'. Must be a renderable template name"
                    ),
                });
            }
        }

        Ok(())
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_globals() -> BTreeMap<String, String> {
    BTreeMap::from([("target".to_string(), "libc".to_string())])
}

/// Resistor library configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResistorConfig {
    /// Template (and output file) name.
    /// Default: "resistors.lia"
    #[serde(default = "default_resistor_template")]
    pub template: String,

    /// Number of decades of the E96 series, starting at 1 ohm.
    #[serde(default = "default_decades")]
    pub decades: u32,

    /// Package labels offered for every value.
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,
}

impl Default for ResistorConfig {
    fn default() -> Self {
        Self {
            template: default_resistor_template(),
            decades: default_decades(),
            packages: default_packages(),
        }
    }
}

fn default_resistor_template() -> String {
    "resistors.lia".to_string()
}

const fn default_decades() -> u32 {
    DEFAULT_DECADES
}

fn default_packages() -> Vec<String> {
    DEFAULT_PACKAGES.iter().map(ToString::to_string).collect()
}

/// Capacitor library configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapacitorConfig {
    /// Template (and output file) name.
    /// Default: "capacitors.lia"
    #[serde(default = "default_capacitor_template")]
    pub template: String,

    /// Supplier CSV export, sorted by MPN.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    /// Required `Family` column value.
    #[serde(default = "default_family")]
    pub family: String,

    /// Required `Supplier` column value.
    #[serde(default = "default_supplier")]
    pub supplier: String,
}

impl CapacitorConfig {
    /// Row filter built from this configuration.
    #[must_use]
    pub fn filter(&self) -> CapacitorFilter {
        CapacitorFilter {
            family: self.family.clone(),
            supplier: self.supplier.clone(),
        }
    }
}

impl Default for CapacitorConfig {
    fn default() -> Self {
        Self {
            template: default_capacitor_template(),
            csv_path: default_csv_path(),
            family: default_family(),
            supplier: default_supplier(),
        }
    }
}

fn default_capacitor_template() -> String {
    "capacitors.lia".to_string()
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("capa_list.csv")
}

fn default_family() -> String {
    DEFAULT_FAMILY.to_string()
}

fn default_supplier() -> String {
    DEFAULT_SUPPLIER.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.resistors.template, "resistors.lia");
        assert_eq!(config.capacitors.csv_path, PathBuf::from("capa_list.csv"));
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "template_dir": "/path/to/templates",
            "output_dir": "/path/to/out",
            "globals": { "target": "altium", "author": "lab" },
            "resistors": {
                "template": "r.lia",
                "decades": 7,
                "packages": ["0402", "1206"]
            },
            "capacitors": {
                "template": "c.lia",
                "csv_path": "catalog.csv",
                "family": "Caps",
                "supplier": "Acme"
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.template_dir, PathBuf::from("/path/to/templates"));
        assert_eq!(config.globals.get("target").map(String::as_str), Some("altium"));
        assert_eq!(config.globals.len(), 2);
        assert_eq!(config.resistors.decades, 7);
        assert_eq!(config.resistors.packages, vec!["0402", "1206"]);
        assert_eq!(config.capacitors.template, "c.lia");
        assert_eq!(config.capacitors.filter().supplier, "Acme");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn default_matches_empty_json() {
        let config = Config::default();
        assert_eq!(config.resistors.decades, 6);
        assert_eq!(
            config.resistors.packages,
            vec!["0201", "0402", "0603", "0805"]
        );
        assert_eq!(config.globals.get("target").map(String::as_str), Some("libc"));
        assert_eq!(config.capacitors.filter(), CapacitorFilter::default());
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_invalid_decades() {
        for decades in [0, 10] {
            let json = format!(r#"{{ "resistors": {{ "decades": {decades} }} }}"#);
            let config: Config = serde_json::from_str(&json).unwrap();
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn reject_empty_packages() {
        let json = r#"{ "resistors": { "packages": [] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_reserved_template() {
        let json = r#"{ "capacitors": { "template": "macros.c" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
