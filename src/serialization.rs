//! Pluggable report serialization

use std::fs;
use std::path::Path;
use crate::error::SerializationError;
use crate::report::{PlayerSummary, SettlementReport};

/// Trait for rendering a settlement report
pub trait ReportSerializer: Send + Sync {
    /// Render the report as text
    fn render(&self, report: &SettlementReport) -> Result<String, SerializationError>;

    /// Get the name of this serialization method
    fn name(&self) -> &str;
}

/// Line oriented format: legitimate players, a blank line, frozen players'
/// operations, a blank line, then the house balance change.
#[derive(Debug, Clone)]
pub struct TextReportSerializer {
    decimal_separator: char,
}

impl TextReportSerializer {
    pub fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    fn player_line(&self, summary: &PlayerSummary) -> String {
        // A player without bets has a bare zero win rate
        let win_rate = if summary.total_bets == 0 {
            "0".to_string()
        } else {
            summary.win_rate.format_with_separator(self.decimal_separator)
        };
        format!("{} {} {}", summary.player_id, summary.balance, win_rate)
    }
}

impl Default for TextReportSerializer {
    fn default() -> Self {
        Self::new(',')
    }
}

impl ReportSerializer for TextReportSerializer {
    fn render(&self, report: &SettlementReport) -> Result<String, SerializationError> {
        let mut lines: Vec<String> = Vec::new();

        if report.legitimate.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(report.legitimate.iter().map(|s| self.player_line(s)));
        }
        lines.push(String::new());

        if report.illegitimate.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(report.illegitimate.iter().cloned());
        }
        lines.push(String::new());

        lines.push(report.house_balance_change.to_string());
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// JSON serialization backend
#[derive(Debug, Clone, Default)]
pub struct JsonReportSerializer {
    pretty: bool,
}

impl JsonReportSerializer {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a new JSON serializer with pretty printing
    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }
}

impl ReportSerializer for JsonReportSerializer {
    fn render(&self, report: &SettlementReport) -> Result<String, SerializationError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };

        result.map_err(|e| SerializationError::SerializationFailed {
            reason: format!("JSON serialization failed: {}", e),
        })
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Render the report and write it to `path`, replacing any existing file
pub fn write_report<S>(serializer: &S, report: &SettlementReport, path: &Path) -> Result<(), SerializationError>
where
    S: ReportSerializer + ?Sized,
{
    let rendered = serializer.render(report)?;
    fs::write(path, rendered).map_err(|source| SerializationError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WinRate;
    use uuid::Uuid;

    fn sample_report() -> SettlementReport {
        SettlementReport {
            legitimate: vec![
                PlayerSummary {
                    player_id: Uuid::from_u128(1),
                    balance: 7500,
                    total_bets: 2,
                    win_rate: WinRate::from_counts(1, 2),
                },
                PlayerSummary {
                    player_id: Uuid::from_u128(2),
                    balance: 300,
                    total_bets: 0,
                    win_rate: WinRate::ZERO,
                },
            ],
            illegitimate: vec![format!("{} WITHDRAW null 200 null", Uuid::from_u128(3))],
            house_balance_change: -150,
        }
    }

    #[test]
    fn test_text_format() {
        let rendered = TextReportSerializer::default().render(&sample_report()).unwrap();
        let expected = format!(
            "{} 7500 0,50\n{} 300 0\n\n{} WITHDRAW null 200 null\n\n-150",
            Uuid::from_u128(1),
            Uuid::from_u128(2),
            Uuid::from_u128(3)
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_text_format_empty_sections() {
        let rendered = TextReportSerializer::new('.').render(&SettlementReport::default()).unwrap();
        assert_eq!(rendered, "\n\n\n\n0");
    }

    #[test]
    fn test_text_format_dot_separator() {
        let rendered = TextReportSerializer::new('.').render(&sample_report()).unwrap();
        assert!(rendered.starts_with(&format!("{} 7500 0.50\n", Uuid::from_u128(1))));
    }

    #[test]
    fn test_json_format() {
        let report = sample_report();
        let rendered = JsonReportSerializer::new().render(&report).unwrap();
        assert!(rendered.contains("\"win_rate\":\"0.50\""));

        let parsed: SettlementReport = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, report);

        let pretty = JsonReportSerializer::new_pretty().render(&report).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_serializer_names() {
        assert_eq!(TextReportSerializer::default().name(), "text");
        assert_eq!(JsonReportSerializer::new().name(), "json");
    }
}
