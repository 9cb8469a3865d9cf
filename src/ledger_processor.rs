//! Ordered replay of the operation log against player accounts

use std::collections::HashMap;
use crate::account::Player;
use crate::error::ProcessingError;
use crate::logging::{DeterministicLogger, LogEntry, LogLevel};
use crate::match_registry::MatchRegistry;
use crate::operation::Operation;
use crate::rule_set::SettlementRules;
use crate::traits::{RuleSet, State, Transaction};
use crate::types::{Disqualification, ExecutionTrace, PlayerId, Transition};

/// Replays operations in input order, creating accounts on first reference
#[derive(Debug)]
pub struct LedgerProcessor<R: RuleSet<Player, Operation> = SettlementRules> {
    matches: MatchRegistry,
    players: HashMap<PlayerId, Player>,
    rules: R,
    execution_trace: ExecutionTrace,
    logger: DeterministicLogger,
}

impl LedgerProcessor<SettlementRules> {
    /// Create a processor using the standard settlement rules
    pub fn new(matches: MatchRegistry) -> Self {
        Self::with_rules(matches, SettlementRules::new())
    }
}

impl<R: RuleSet<Player, Operation>> LedgerProcessor<R> {
    pub fn with_rules(matches: MatchRegistry, rules: R) -> Self {
        Self {
            matches,
            players: HashMap::new(),
            rules,
            execution_trace: ExecutionTrace::default(),
            logger: DeterministicLogger::default(),
        }
    }

    /// Replace the audit logger
    pub fn with_logger(mut self, logger: DeterministicLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Process the operation at position `index` of the log
    ///
    /// Negative amounts and malformed records abort the run even when the
    /// player is already frozen.
    pub fn process_operation(&mut self, index: usize, operation: &Operation) -> Result<(), ProcessingError> {
        let player_id = operation.account_id();

        if operation.coin_amount < 0 {
            return Err(ProcessingError::NegativeCoinAmount {
                player_id,
                amount: operation.coin_amount,
                operation_index: index,
            });
        }
        operation.validate().map_err(|e| ProcessingError::MalformedOperation {
            operation_index: index,
            reason: e.to_string(),
        })?;

        let rules = &self.rules;
        let current = self
            .players
            .entry(player_id)
            .or_insert_with(|| rules.open_account(player_id));

        if !current.is_active() {
            self.execution_trace.operations_processed += 1;
            self.execution_trace.operations_skipped += 1;
            self.logger.log(
                LogEntry::new(LogLevel::Trace, format!("{} skipped for frozen account", operation.kind))
                    .with_operation(index, player_id),
            );
            return Ok(());
        }

        let transition = self.rules.apply(current, operation, &self.matches, index)?;

        let next = match transition {
            Transition::Applied(next) => {
                self.execution_trace.operations_applied += 1;
                self.logger.log(
                    LogEntry::new(LogLevel::Debug, format!("{} applied", operation.kind))
                        .with_operation(index, player_id)
                        .with_metadata("amount", operation.coin_amount)
                        .with_metadata("balance", next.balance()),
                );
                next
            }
            Transition::Ignored(next) => {
                self.execution_trace.operations_skipped += 1;
                next
            }
            Transition::Disqualified(next) => {
                self.execution_trace.disqualifications.push(Disqualification {
                    operation_index: index,
                    player_id,
                });
                self.logger.log(
                    LogEntry::new(LogLevel::Warn, format!("{} exceeds balance, account frozen", operation.kind))
                        .with_operation(index, player_id)
                        .with_metadata("amount", operation.coin_amount)
                        .with_metadata("balance", next.balance()),
                );
                next
            }
        };

        next.validate().map_err(|e| ProcessingError::InvalidState {
            player_id,
            reason: e.to_string(),
        })?;

        self.players.insert(player_id, next);
        self.execution_trace.operations_processed += 1;
        Ok(())
    }

    /// Process a whole log, stopping at the first fatal error
    pub fn process_operations(&mut self, operations: &[Operation]) -> Result<(), ProcessingError> {
        for (index, operation) in operations.iter().enumerate() {
            self.process_operation(index, operation)?;
        }
        Ok(())
    }

    pub fn players(&self) -> &HashMap<PlayerId, Player> {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn matches(&self) -> &MatchRegistry {
        &self.matches
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn execution_trace(&self) -> &ExecutionTrace {
        &self.execution_trace
    }

    pub fn logger(&self) -> &DeterministicLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut DeterministicLogger {
        &mut self.logger
    }

    /// Consume the processor and return the accounts, trace and audit log
    pub fn into_result(self) -> (HashMap<PlayerId, Player>, ExecutionTrace, DeterministicLogger) {
        (self.players, self.execution_trace, self.logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_registry::Match;
    use crate::types::{MatchResult, Side};
    use uuid::Uuid;

    fn registry() -> MatchRegistry {
        vec![
            Match::new(Uuid::from_u128(10), 1.5, 0.8, MatchResult::SideA),
            Match::new(Uuid::from_u128(11), 1.2, 1.9, MatchResult::Draw),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_processor_creation() {
        let processor = LedgerProcessor::new(registry());
        assert!(processor.players().is_empty());
        assert_eq!(processor.matches().len(), 2);
        assert_eq!(processor.execution_trace().operations_processed, 0);
    }

    #[test]
    fn test_player_created_lazily() {
        let mut processor = LedgerProcessor::new(registry());
        let id = Uuid::from_u128(1);
        processor.process_operation(0, &Operation::deposit(id, 100)).unwrap();

        assert_eq!(processor.players().len(), 1);
        assert_eq!(processor.player(&id).unwrap().balance(), 100);
    }

    #[test]
    fn test_frozen_player_operations_are_skipped() {
        let mut processor = LedgerProcessor::new(registry()).with_logger(DeterministicLogger::all());
        let id = Uuid::from_u128(1);
        let ops = vec![
            Operation::deposit(id, 10),
            Operation::withdraw(id, 20),
            Operation::deposit(id, 1000),
            Operation::bet(id, Uuid::from_u128(10), 5, Side::A),
        ];
        processor.process_operations(&ops).unwrap();

        let player = processor.player(&id).unwrap();
        assert!(!player.is_legitimate());
        assert_eq!(player.balance(), 10);
        assert_eq!(player.total_bets(), 0);

        let trace = processor.execution_trace();
        assert_eq!(trace.operations_processed, 4);
        assert_eq!(trace.operations_applied, 1);
        assert_eq!(trace.operations_skipped, 2);
        assert_eq!(trace.disqualifications, vec![Disqualification { operation_index: 1, player_id: id }]);
        assert_eq!(processor.logger().filter_by_level(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn test_negative_amount_aborts_even_when_frozen() {
        let mut processor = LedgerProcessor::new(registry());
        let id = Uuid::from_u128(1);
        processor.process_operation(0, &Operation::withdraw(id, 5)).unwrap();

        let result = processor.process_operation(1, &Operation::deposit(id, -1));
        assert!(matches!(
            result,
            Err(ProcessingError::NegativeCoinAmount { amount: -1, operation_index: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_bet_aborts() {
        let mut processor = LedgerProcessor::new(registry());
        let mut op = Operation::bet(Uuid::from_u128(1), Uuid::from_u128(10), 0, Side::A);
        op.side = None;

        let result = processor.process_operation(0, &op);
        assert!(matches!(result, Err(ProcessingError::MalformedOperation { operation_index: 0, .. })));
    }
}
