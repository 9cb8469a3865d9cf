//! Deterministic audit logging for settlement runs
//!
//! Entries are keyed by operation index instead of wall-clock time, so two
//! runs over the same input collect identical logs. Every recorded entry is
//! also forwarded to the `tracing` subscriber, if one is installed.

use serde::{Serialize, Deserialize};
use crate::types::PlayerId;

/// Log level for deterministic logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level - detailed information
    Debug,
    /// Info level - general information
    Info,
    /// Warning level - potential issues
    Warn,
    /// Error level - errors that occurred
    Error,
}

/// A deterministic log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Position of the operation in the log, if applicable
    pub operation_index: Option<usize>,
    pub player_id: Option<PlayerId>,
    pub message: String,
    /// Additional structured data
    pub metadata: Vec<(String, String)>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            operation_index: None,
            player_id: None,
            message: message.into(),
            metadata: Vec::new(),
        }
    }

    /// Add operation context to the log entry
    pub fn with_operation(mut self, index: usize, player_id: PlayerId) -> Self {
        self.operation_index = Some(index);
        self.player_id = Some(player_id);
        self
    }

    /// Add metadata to the log entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.push((key.into(), value.to_string()));
        self
    }

    fn emit(&self) {
        let index = self.operation_index;
        let player = self.player_id.map(|id| id.to_string());
        let message = self.message.as_str();
        match self.level {
            LogLevel::Trace => tracing::trace!(operation = ?index, player = ?player, metadata = ?self.metadata, "{}", message),
            LogLevel::Debug => tracing::debug!(operation = ?index, player = ?player, metadata = ?self.metadata, "{}", message),
            LogLevel::Info => tracing::info!(operation = ?index, player = ?player, metadata = ?self.metadata, "{}", message),
            LogLevel::Warn => tracing::warn!(operation = ?index, player = ?player, metadata = ?self.metadata, "{}", message),
            LogLevel::Error => tracing::error!(operation = ?index, player = ?player, metadata = ?self.metadata, "{}", message),
        }
    }
}

/// Logger that collects entries for the audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterministicLogger {
    entries: Vec<LogEntry>,
    /// Minimum log level to record
    min_level: LogLevel,
}

impl DeterministicLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            entries: Vec::new(),
            min_level,
        }
    }

    /// Create a logger that captures all levels
    pub fn all() -> Self {
        Self::new(LogLevel::Trace)
    }

    /// Create a logger that captures info and above
    pub fn with_info_level() -> Self {
        Self::new(LogLevel::Info)
    }

    /// Record an entry if it meets the minimum level
    pub fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            entry.emit();
            self.entries.push(entry);
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Error, message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take all collected entries, leaving the logger empty
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Filter entries by log level
    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter()
            .filter(|e| e.level == level)
            .collect()
    }

    /// Filter entries by player
    pub fn filter_by_player(&self, player_id: &PlayerId) -> Vec<&LogEntry> {
        self.entries.iter()
            .filter(|e| e.player_id.as_ref() == Some(player_id))
            .collect()
    }
}

impl Default for DeterministicLogger {
    fn default() -> Self {
        Self::with_info_level()
    }
}
