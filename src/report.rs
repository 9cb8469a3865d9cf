//! Settlement report built from the final player accounts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::account::Player;
use crate::error::ProcessingError;
use crate::types::{PlayerId, WinRate};

/// Final standing of a legitimate player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub balance: i64,
    pub total_bets: u32,
    pub win_rate: WinRate,
}

/// The three sections of a settlement run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Legitimate players ordered by id string
    pub legitimate: Vec<PlayerSummary>,
    /// First illegal operation of each frozen player, ordered by player id string
    pub illegitimate: Vec<String>,
    /// Net change of the house balance
    pub house_balance_change: i64,
}

impl SettlementReport {
    /// Build the report from the final account map
    ///
    /// The house balance change is the negated sum of the bet returns of
    /// legitimate players only.
    pub fn build(players: &HashMap<PlayerId, Player>) -> Result<Self, ProcessingError> {
        let mut ordered: Vec<(String, &Player)> = players
            .values()
            .map(|player| (player.id().to_string(), player))
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = SettlementReport::default();
        let mut player_returns: i64 = 0;

        for (_, player) in ordered {
            match player.first_illegal_operation() {
                None => {
                    player_returns = player_returns
                        .checked_add(player.total_bet_returns())
                        .ok_or(ProcessingError::HouseBalanceOverflow)?;
                    report.legitimate.push(PlayerSummary {
                        player_id: player.id(),
                        balance: player.balance(),
                        total_bets: player.total_bets(),
                        win_rate: player.win_rate(),
                    });
                }
                Some(record) => report.illegitimate.push(record.to_string()),
            }
        }

        report.house_balance_change = player_returns
            .checked_neg()
            .ok_or(ProcessingError::HouseBalanceOverflow)?;
        Ok(report)
    }
}
