//! Bet Settlement Replay Engine
//!
//! Replays a chronological log of player deposits, withdrawals and bets
//! against a fixed set of decided matches, freezes players whose operations
//! exceed their balance, and produces a deterministic settlement report.

pub mod account;
pub mod config;
pub mod error;
pub mod hasher;
pub mod input;
pub mod ledger_processor;
pub mod logging;
pub mod match_registry;
pub mod operation;
pub mod replay_engine;
pub mod report;
pub mod rule_set;
pub mod serialization;
pub mod traits;
pub mod types;

// Re-export core types and traits
pub use account::{AccountStatus, Player};
pub use config::{OutputFormat, SettlementConfig};
pub use error::{
    ConfigError, InputError, ProcessingError, SerializationError, SettlementError, ValidationError,
};
pub use hasher::StateHasher;
pub use ledger_processor::LedgerProcessor;
pub use logging::{DeterministicLogger, LogEntry, LogLevel};
pub use match_registry::{Match, MatchRegistry};
pub use operation::{format_illegal_operation, Operation};
pub use replay_engine::{SettlementEngine, SettlementEngineBuilder, SettlementOutcome};
pub use report::{PlayerSummary, SettlementReport};
pub use rule_set::SettlementRules;
pub use serialization::{write_report, JsonReportSerializer, ReportSerializer, TextReportSerializer};
pub use traits::{RuleSet, State, Transaction};
pub use types::{
    Disqualification, ExecutionTrace, MatchId, MatchResult, OperationKind, PerformanceMetrics,
    PlayerId, Side, StateHash, Transition, WinRate,
};
