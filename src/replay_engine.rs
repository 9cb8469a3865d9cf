//! Settlement engine with builder pattern: replay, report, fingerprint

use std::time::Instant;
use crate::account::Player;
use crate::error::{ConfigError, SettlementError};
use crate::hasher::StateHasher;
use crate::ledger_processor::LedgerProcessor;
use crate::logging::{DeterministicLogger, LogEntry, LogLevel};
use crate::match_registry::MatchRegistry;
use crate::operation::Operation;
use crate::report::SettlementReport;
use crate::rule_set::SettlementRules;
use crate::traits::RuleSet;
use crate::types::{ExecutionTrace, PerformanceMetrics, StateHash};

/// Everything produced by a completed settlement run
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub report: SettlementReport,
    /// Fingerprint of the report; equal inputs give equal fingerprints
    pub report_hash: StateHash,
    /// Hash chain over every account, ordered by player id
    pub accounts_hash: StateHash,
    pub execution_trace: ExecutionTrace,
    pub audit_log: Vec<LogEntry>,
    pub performance_metrics: PerformanceMetrics,
}

/// Runs a whole operation log against a fixed set of matches
#[derive(Debug, Clone)]
pub struct SettlementEngine<R = SettlementRules>
where
    R: RuleSet<Player, Operation> + Clone,
{
    matches: MatchRegistry,
    rules: R,
    log_level: LogLevel,
}

impl SettlementEngine<SettlementRules> {
    /// Create a builder for constructing a settlement engine
    pub fn builder() -> SettlementEngineBuilder<SettlementRules> {
        SettlementEngineBuilder::new()
    }
}

impl<R> SettlementEngine<R>
where
    R: RuleSet<Player, Operation> + Clone,
{
    pub fn new(matches: MatchRegistry, rules: R, log_level: LogLevel) -> Self {
        Self {
            matches,
            rules,
            log_level,
        }
    }

    /// Replay `operations` in order and build the report
    ///
    /// Any fatal error aborts the run; no partial report is produced.
    pub fn run(&self, operations: &[Operation]) -> Result<SettlementOutcome, SettlementError> {
        let start_time = Instant::now();

        let mut logger = DeterministicLogger::new(self.log_level);
        logger.log(
            LogEntry::new(LogLevel::Info, "settlement started")
                .with_metadata("rules", self.rules.name())
                .with_metadata("matches", self.matches.len())
                .with_metadata("operations", operations.len()),
        );

        let mut processor = LedgerProcessor::with_rules(self.matches.clone(), self.rules.clone())
            .with_logger(logger);
        if let Err(e) = processor.process_operations(operations) {
            processor.logger_mut().error(format!("settlement aborted: {}", e));
            return Err(e.into());
        }

        let (players, execution_trace, mut logger) = processor.into_result();
        let report = match SettlementReport::build(&players) {
            Ok(report) => report,
            Err(e) => {
                logger.error(format!("settlement aborted: {}", e));
                return Err(e.into());
            }
        };

        let hasher = StateHasher::new();
        let mut ordered: Vec<&Player> = players.values().collect();
        ordered.sort_by_key(|p| p.id().to_string());
        let account_hashes = ordered
            .into_iter()
            .map(|p| hasher.hash(p))
            .collect::<Result<Vec<_>, _>>()?;
        let accounts_hash = hasher.hash_chain(&account_hashes);
        let report_hash = hasher.hash(&report)?;

        logger.log(
            LogEntry::new(LogLevel::Info, "settlement completed")
                .with_metadata("legitimate", report.legitimate.len())
                .with_metadata("illegitimate", report.illegitimate.len())
                .with_metadata("house_balance_change", report.house_balance_change),
        );

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let operations_per_second = if duration_ms > 0 {
            operations.len() as f64 / (duration_ms as f64 / 1000.0)
        } else {
            0.0
        };

        Ok(SettlementOutcome {
            report,
            report_hash,
            accounts_hash,
            execution_trace,
            audit_log: logger.drain(),
            performance_metrics: PerformanceMetrics {
                total_duration_ms: duration_ms,
                operations_per_second,
            },
        })
    }

    pub fn matches(&self) -> &MatchRegistry {
        &self.matches
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }
}

/// Builder for constructing settlement engines with a fluent API
#[derive(Debug)]
pub struct SettlementEngineBuilder<R = SettlementRules>
where
    R: RuleSet<Player, Operation> + Clone,
{
    matches: Option<MatchRegistry>,
    rules: R,
    log_level: LogLevel,
}

impl SettlementEngineBuilder<SettlementRules> {
    pub fn new() -> Self {
        Self {
            matches: None,
            rules: SettlementRules::new(),
            log_level: LogLevel::Info,
        }
    }
}

impl<R> SettlementEngineBuilder<R>
where
    R: RuleSet<Player, Operation> + Clone,
{
    /// Set the match registry consulted for bets
    pub fn with_matches(mut self, matches: MatchRegistry) -> Self {
        self.matches = Some(matches);
        self
    }

    /// Replace the settlement rules
    pub fn with_rules<R2>(self, rules: R2) -> SettlementEngineBuilder<R2>
    where
        R2: RuleSet<Player, Operation> + Clone,
    {
        SettlementEngineBuilder {
            matches: self.matches,
            rules,
            log_level: self.log_level,
        }
    }

    /// Minimum level collected in the audit log
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn build(self) -> Result<SettlementEngine<R>, ConfigError> {
        let matches = self.matches.ok_or(ConfigError::Missing("Match registry"))?;
        Ok(SettlementEngine::new(matches, self.rules, self.log_level))
    }
}

impl Default for SettlementEngineBuilder<SettlementRules> {
    fn default() -> Self {
        Self::new()
    }
}
