//! Run configuration loaded from TOML

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::ConfigError;
use crate::serialization::{JsonReportSerializer, ReportSerializer, TextReportSerializer};

/// Output format of the settlement report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Paths and formatting options for a settlement run
///
/// Keys missing from the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    pub match_data_path: PathBuf,
    pub operation_data_path: PathBuf,
    pub output_path: PathBuf,
    pub format: OutputFormat,
    /// Decimal separator used for win rates in the text format
    pub decimal_separator: char,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            match_data_path: PathBuf::from("resources/match_data.txt"),
            operation_data_path: PathBuf::from("resources/player_data.txt"),
            output_path: PathBuf::from("result.txt"),
            format: OutputFormat::Text,
            decimal_separator: ',',
        }
    }
}

impl SettlementConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sep = self.decimal_separator;
        if sep.is_ascii_digit() || sep.is_whitespace() {
            return Err(ConfigError::InvalidDecimalSeparator(sep));
        }
        Ok(())
    }

    /// The report serializer selected by this configuration
    pub fn serializer(&self) -> Box<dyn ReportSerializer> {
        match self.format {
            OutputFormat::Text => Box::new(TextReportSerializer::new(self.decimal_separator)),
            OutputFormat::Json => Box::new(JsonReportSerializer::new_pretty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert_eq!(config.match_data_path, PathBuf::from("resources/match_data.txt"));
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.decimal_separator, ',');
        assert_eq!(config.serializer().name(), "text");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SettlementConfig::from_toml_str(
            r#"
            output_path = "out/report.json"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/report.json"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.operation_data_path, PathBuf::from("resources/player_data.txt"));
        assert_eq!(config.serializer().name(), "json");
    }

    #[test]
    fn test_rejects_bad_separator() {
        let result = SettlementConfig::from_toml_str("decimal_separator = \"5\"");
        assert!(matches!(result, Err(ConfigError::InvalidDecimalSeparator('5'))));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = SettlementConfig::from_toml_str("format = \"xml\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
