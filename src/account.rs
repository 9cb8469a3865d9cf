//! Player accounts and their settlement state machine
//!
//! Every transition is a pure function from the current account to the next
//! one. An account starts `Active` and becomes `Frozen` on its first
//! withdrawal or bet exceeding the balance; a frozen account never changes
//! again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::error::{ProcessingError, ValidationError};
use crate::match_registry::Match;
use crate::operation::Operation;
use crate::traits::State;
use crate::types::{MatchId, PlayerId, Side, Transition, WinRate};

/// Account status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    /// Disqualified, holding the normalised record of the offending operation
    Frozen { first_illegal_operation: String },
}

/// A player's account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    balance: i64,
    total_bets: u32,
    bets_won: u32,
    status: AccountStatus,
    /// Net profit or loss over all settled bets
    total_bet_returns: i64,
    matches_bet: BTreeSet<MatchId>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            balance: 0,
            total_bets: 0,
            bets_won: 0,
            status: AccountStatus::Active,
            total_bet_returns: 0,
            matches_bet: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn total_bets(&self) -> u32 {
        self.total_bets
    }

    pub fn bets_won(&self) -> u32 {
        self.bets_won
    }

    pub fn total_bet_returns(&self) -> i64 {
        self.total_bet_returns
    }

    pub fn status(&self) -> &AccountStatus {
        &self.status
    }

    pub fn is_legitimate(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    pub fn first_illegal_operation(&self) -> Option<&str> {
        match &self.status {
            AccountStatus::Active => None,
            AccountStatus::Frozen { first_illegal_operation } => Some(first_illegal_operation.as_str()),
        }
    }

    pub fn has_bet_on(&self, match_id: &MatchId) -> bool {
        self.matches_bet.contains(match_id)
    }

    pub fn win_rate(&self) -> WinRate {
        WinRate::from_counts(self.bets_won, self.total_bets)
    }

    /// Freeze the account, keeping the first recorded offence
    pub fn mark_illegitimate(&self, operation: &Operation) -> Self {
        let mut next = self.clone();
        if next.is_legitimate() {
            next.status = AccountStatus::Frozen {
                first_illegal_operation: operation.illegal_operation_record(),
            };
        }
        next
    }

    fn overflow(&self, amount: i64) -> ProcessingError {
        ProcessingError::BalanceOverflow { player_id: self.id, amount }
    }

    pub fn deposit(&self, amount: i64) -> Result<Transition<Self>, ProcessingError> {
        if !self.is_legitimate() {
            return Ok(Transition::Ignored(self.clone()));
        }
        let mut next = self.clone();
        next.balance = self.balance.checked_add(amount).ok_or_else(|| self.overflow(amount))?;
        Ok(Transition::Applied(next))
    }

    pub fn withdraw(&self, operation: &Operation) -> Result<Transition<Self>, ProcessingError> {
        if !self.is_legitimate() {
            return Ok(Transition::Ignored(self.clone()));
        }
        let amount = operation.coin_amount;
        if self.balance < amount {
            return Ok(Transition::Disqualified(self.mark_illegitimate(operation)));
        }
        let mut next = self.clone();
        next.balance = self.balance.checked_sub(amount).ok_or_else(|| self.overflow(amount))?;
        Ok(Transition::Applied(next))
    }

    /// Place and immediately settle a bet on an already decided match.
    ///
    /// A second bet on the same match is a fatal error rather than a
    /// disqualification.
    pub fn bet(&self, m: &Match, side: Side, operation: &Operation) -> Result<Transition<Self>, ProcessingError> {
        if !self.is_legitimate() {
            return Ok(Transition::Ignored(self.clone()));
        }
        let amount = operation.coin_amount;
        if self.balance < amount {
            return Ok(Transition::Disqualified(self.mark_illegitimate(operation)));
        }
        if self.has_bet_on(&m.id()) {
            return Err(ProcessingError::DuplicateBet {
                player_id: self.id,
                match_id: m.id(),
            });
        }

        let mut next = self.clone();
        next.matches_bet.insert(m.id());
        next.total_bets += 1;

        match m.result().winning_side() {
            Some(winner) if winner == side => {
                next.bets_won += 1;
                let payout = (amount as f64 * m.payout_multiplier(side)).floor();
                // `as` saturates, so anything outside i64 is rejected first
                if !payout.is_finite() || payout >= i64::MAX as f64 || payout < i64::MIN as f64 {
                    return Err(self.overflow(amount));
                }
                let bet_return = payout as i64;
                next.balance = next.balance.checked_add(bet_return).ok_or_else(|| self.overflow(bet_return))?;
                next.total_bet_returns = next
                    .total_bet_returns
                    .checked_add(bet_return)
                    .ok_or_else(|| self.overflow(bet_return))?;
            }
            Some(_) => {
                next.balance = next.balance.checked_sub(amount).ok_or_else(|| self.overflow(amount))?;
                next.total_bet_returns = next
                    .total_bet_returns
                    .checked_sub(amount)
                    .ok_or_else(|| self.overflow(amount))?;
            }
            // Draw: the stake comes back untouched
            None => {}
        }
        Ok(Transition::Applied(next))
    }
}

impl State for Player {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.bets_won > self.total_bets {
            return Err(ValidationError::InvalidState {
                reason: format!("{} bets won out of {} placed", self.bets_won, self.total_bets),
            });
        }
        if self.matches_bet.len() != self.total_bets as usize {
            return Err(ValidationError::InvalidState {
                reason: format!(
                    "{} matches recorded for {} bets",
                    self.matches_bet.len(),
                    self.total_bets
                ),
            });
        }
        if let AccountStatus::Frozen { first_illegal_operation } = &self.status {
            if first_illegal_operation.is_empty() {
                return Err(ValidationError::InvalidState {
                    reason: "Frozen account without a recorded operation".to_string(),
                });
            }
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_legitimate()
    }
}
