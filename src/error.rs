//! Error types for bet settlement
//!
//! Every variant here aborts the run. Insufficient funds are not errors: they
//! freeze a single account and are reported through [`crate::types::Transition`].

use std::path::PathBuf;
use thiserror::Error;
use crate::types::{MatchId, PlayerId};

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Fatal conditions detected while replaying the operation log
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Match {match_id} not found (operation {operation_index})")]
    UnknownMatch { match_id: MatchId, operation_index: usize },

    #[error("Coin amount {amount} is negative for player {player_id} (operation {operation_index})")]
    NegativeCoinAmount { player_id: PlayerId, amount: i64, operation_index: usize },

    #[error("Player {player_id} tried to bet multiple times on match {match_id}")]
    DuplicateBet { player_id: PlayerId, match_id: MatchId },

    #[error("Malformed operation {operation_index}: {reason}")]
    MalformedOperation { operation_index: usize, reason: String },

    #[error("Balance of player {player_id} overflows applying {amount}")]
    BalanceOverflow { player_id: PlayerId, amount: i64 },

    #[error("House balance change overflows")]
    HouseBalanceOverflow,

    #[error("Account {player_id} reached an invalid state: {reason}")]
    InvalidState { player_id: PlayerId, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid match result: {0}")]
    InvalidMatchResult(String),

    #[error("Invalid operation type: {0}")]
    InvalidOperationKind(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },
}

/// Failures reading the match source or the operation log source
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    FieldCount { line: usize, expected: usize, found: usize },

    #[error("Line {line}: invalid {field} '{value}'")]
    InvalidField { line: usize, field: &'static str, value: String },

    #[error("Line {line}: {source}")]
    InvalidValue {
        line: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Line {line}: duplicate match {match_id}")]
    DuplicateMatch { line: usize, match_id: MatchId },
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid decimal separator '{0}'")]
    InvalidDecimalSeparator(char),

    #[error("{0} is required")]
    Missing(&'static str),
}
