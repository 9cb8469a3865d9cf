//! Settlement rules dispatching an operation to the account state machine

use crate::account::Player;
use crate::error::ProcessingError;
use crate::match_registry::MatchRegistry;
use crate::operation::Operation;
use crate::traits::RuleSet;
use crate::types::{OperationKind, PlayerId, Transition};

/// The deposit / withdraw / bet rules applied to every player account
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementRules;

impl SettlementRules {
    pub fn new() -> Self {
        Self
    }
}

impl RuleSet<Player, Operation> for SettlementRules {
    fn name(&self) -> &str {
        "settlement"
    }

    fn open_account(&self, id: PlayerId) -> Player {
        Player::new(id)
    }

    fn apply(
        &self,
        state: &Player,
        operation: &Operation,
        matches: &MatchRegistry,
        operation_index: usize,
    ) -> Result<Transition<Player>, ProcessingError> {
        match operation.kind {
            OperationKind::Deposit => state.deposit(operation.coin_amount),
            OperationKind::Withdraw => state.withdraw(operation),
            OperationKind::Bet => {
                let (match_id, side) = match (operation.match_id, operation.side) {
                    (Some(match_id), Some(side)) => (match_id, side),
                    _ => {
                        return Err(ProcessingError::MalformedOperation {
                            operation_index,
                            reason: "bet without match id or side".to_string(),
                        })
                    }
                };
                let m = matches.get(&match_id).ok_or(ProcessingError::UnknownMatch {
                    match_id,
                    operation_index,
                })?;
                state.bet(m, side, operation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_registry::Match;
    use crate::types::{MatchResult, Side};
    use uuid::Uuid;

    fn registry() -> MatchRegistry {
        vec![Match::new(Uuid::from_u128(10), 2.0, 0.5, MatchResult::SideA)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_dispatch_deposit_and_withdraw() {
        let rules = SettlementRules::new();
        let player = rules.open_account(Uuid::from_u128(1));
        let matches = registry();

        let player = rules
            .apply(&player, &Operation::deposit(player.id(), 50), &matches, 0)
            .unwrap()
            .into_state();
        let player = rules
            .apply(&player, &Operation::withdraw(player.id(), 20), &matches, 1)
            .unwrap()
            .into_state();
        assert_eq!(player.balance(), 30);
    }

    #[test]
    fn test_bet_on_unknown_match_is_fatal() {
        let rules = SettlementRules::new();
        let player = Player::new(Uuid::from_u128(1)).deposit(100).unwrap().into_state();
        let op = Operation::bet(player.id(), Uuid::from_u128(99), 10, Side::A);

        let result = rules.apply(&player, &op, &registry(), 3);
        assert!(matches!(
            result,
            Err(ProcessingError::UnknownMatch { operation_index: 3, .. })
        ));
    }

    #[test]
    fn test_bet_settles_against_registry() {
        let rules = SettlementRules::new();
        let player = Player::new(Uuid::from_u128(1)).deposit(100).unwrap().into_state();
        let op = Operation::bet(player.id(), Uuid::from_u128(10), 10, Side::A);

        let player = rules.apply(&player, &op, &registry(), 0).unwrap().into_state();
        assert_eq!(player.balance(), 120);
        assert_eq!(player.win_rate().to_string(), "1.00");
    }
}
