//! Error types for altium-libgen.
//!
//! Hard errors (bad CSV header, filesystem failures, template problems)
//! abort the run. Descriptor rows that fail to parse are not errors and
//! never show up here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenerateError>;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors that can occur while generating a library file.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The CSV header lacks a required column.
    #[error("Invalid CSV file, missing column '{column}': please check formats and columns")]
    InvalidCsvHeader {
        /// Name of the missing column.
        column: String,
    },

    /// A CSV record could not be decoded.
    #[error("Malformed CSV data")]
    Csv {
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to open or read a file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Template directory does not exist.
    #[error("Template directory not found: {path}")]
    TemplateDirNotFound {
        /// Configured template directory.
        path: PathBuf,
    },

    /// No renderable template with this name.
    #[error("Template not found: {name}")]
    TemplateNotFound {
        /// Requested template name.
        name: String,
    },

    /// Template failed to parse when it was discovered.
    #[error("Template '{name}' failed to parse: {message}")]
    TemplateParse {
        /// Template name.
        name: String,
        /// Parse error reported by the template engine.
        message: String,
    },

    /// Template engine failure (missing variable, bad filter, ...).
    #[error("Failed to render template '{name}'")]
    Render {
        /// Template name.
        name: String,
        /// Underlying Tera error.
        #[source]
        source: tera::Error,
    },

    /// Rendered text contains characters outside the output code page.
    #[error("Output for {path} contains characters not representable in Windows-1252")]
    Encoding {
        /// Output file path.
        path: PathBuf,
    },

    /// Magnitude too large for the engineering suffix table.
    #[error("Value {value} exceeds the largest engineering suffix")]
    ValueOutOfRange {
        /// Offending value.
        value: f64,
    },
}

impl GenerateError {
    /// Creates a missing CSV column error.
    pub fn invalid_csv_header(column: impl Into<String>) -> Self {
        Self::InvalidCsvHeader {
            column: column.into(),
        }
    }

    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a template not found error.
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// Creates a render error.
    pub fn render(name: impl Into<String>, source: tera::Error) -> Self {
        Self::Render {
            name: name.into(),
            source,
        }
    }
}

impl From<csv::Error> for GenerateError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn csv_header_error_display() {
        let err = GenerateError::invalid_csv_header("Designation");
        assert!(err.to_string().contains("'Designation'"));
    }

    #[test]
    fn template_not_found_display() {
        let err = GenerateError::template_not_found("resistors.lia");
        assert_eq!(err.to_string(), "Template not found: resistors.lia");
    }
}
