//! Player account operations as read from the operation log

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::traits::Transaction;
use crate::types::{MatchId, OperationKind, PlayerId, Side};

/// Token used in place of an absent match id or bet side
const NULL_TOKEN: &str = "null";

/// A single entry of the operation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub player_id: PlayerId,
    pub kind: OperationKind,
    pub match_id: Option<MatchId>,
    pub coin_amount: i64,
    pub side: Option<Side>,
}

impl Operation {
    pub fn deposit(player_id: PlayerId, coin_amount: i64) -> Self {
        Self {
            player_id,
            kind: OperationKind::Deposit,
            match_id: None,
            coin_amount,
            side: None,
        }
    }

    pub fn withdraw(player_id: PlayerId, coin_amount: i64) -> Self {
        Self {
            player_id,
            kind: OperationKind::Withdraw,
            match_id: None,
            coin_amount,
            side: None,
        }
    }

    pub fn bet(player_id: PlayerId, match_id: MatchId, coin_amount: i64, side: Side) -> Self {
        Self {
            player_id,
            kind: OperationKind::Bet,
            match_id: Some(match_id),
            coin_amount,
            side: Some(side),
        }
    }

    /// Normalised record reported for a player frozen by this operation
    pub fn illegal_operation_record(&self) -> String {
        format_illegal_operation(
            &self.player_id,
            self.kind,
            self.match_id.as_ref(),
            self.coin_amount,
            self.side,
        )
    }
}

/// Space-joined operation fields with `null` standing in for absent ones.
///
/// An operation without a match id reports both the match id and the side as
/// `null`.
pub fn format_illegal_operation(
    player_id: &PlayerId,
    kind: OperationKind,
    match_id: Option<&MatchId>,
    coin_amount: i64,
    side: Option<Side>,
) -> String {
    let (match_id, side) = match match_id {
        Some(id) => (
            id.to_string(),
            side.map_or(NULL_TOKEN, |s| s.as_str()).to_string(),
        ),
        None => (NULL_TOKEN.to_string(), NULL_TOKEN.to_string()),
    };
    format!("{} {} {} {} {}", player_id, kind, match_id, coin_amount, side)
}

impl Transaction for Operation {
    fn account_id(&self) -> PlayerId {
        self.player_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.kind == OperationKind::Bet {
            if self.match_id.is_none() {
                return Err(ValidationError::MissingField("match id"));
            }
            if self.side.is_none() {
                return Err(ValidationError::MissingField("bet side"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const PLAYER: &str = "163f23ed-e9a9-4e54-a5b1-4e1fc86f12f4";
    const MATCH: &str = "abae2255-4255-4304-8589-737cdff61640";

    #[test]
    fn test_record_without_match() {
        let op = Operation::withdraw(Uuid::parse_str(PLAYER).unwrap(), 200);
        assert_eq!(
            op.illegal_operation_record(),
            format!("{} WITHDRAW null 200 null", PLAYER)
        );
    }

    #[test]
    fn test_record_for_bet() {
        let op = Operation::bet(
            Uuid::parse_str(PLAYER).unwrap(),
            Uuid::parse_str(MATCH).unwrap(),
            5000,
            Side::A,
        );
        assert_eq!(
            op.illegal_operation_record(),
            format!("{} BET {} 5000 A", PLAYER, MATCH)
        );
    }

    #[test]
    fn test_record_with_match_but_no_side() {
        let player = Uuid::parse_str(PLAYER).unwrap();
        let matched = Uuid::parse_str(MATCH).unwrap();
        let record = format_illegal_operation(&player, OperationKind::Bet, Some(&matched), 10, None);
        assert_eq!(record, format!("{} BET {} 10 null", PLAYER, MATCH));
    }

    #[test]
    fn test_bet_requires_match_and_side() {
        let mut op = Operation::bet(Uuid::from_u128(1), Uuid::from_u128(2), 10, Side::B);
        assert!(op.validate().is_ok());

        op.side = None;
        assert_eq!(op.validate(), Err(ValidationError::MissingField("bet side")));

        op.match_id = None;
        assert_eq!(op.validate(), Err(ValidationError::MissingField("match id")));

        assert!(Operation::deposit(Uuid::from_u128(1), 10).validate().is_ok());
    }
}
