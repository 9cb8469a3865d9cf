//! Core data types for bet settlement

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use crate::error::ValidationError;

/// Unique player identifier
pub type PlayerId = uuid::Uuid;

/// Unique match identifier
pub type MatchId = uuid::Uuid;

/// Side of a match a bet is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Side::A),
            "B" => Ok(Side::B),
            other => Err(ValidationError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "A")]
    SideA,
    #[serde(rename = "B")]
    SideB,
    #[serde(rename = "DRAW")]
    Draw,
}

impl MatchResult {
    /// The winning side, or `None` for a draw
    pub fn winning_side(&self) -> Option<Side> {
        match self {
            MatchResult::SideA => Some(Side::A),
            MatchResult::SideB => Some(Side::B),
            MatchResult::Draw => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, MatchResult::Draw)
    }
}

impl FromStr for MatchResult {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(MatchResult::SideA),
            "B" => Ok(MatchResult::SideB),
            "DRAW" => Ok(MatchResult::Draw),
            other => Err(ValidationError::InvalidMatchResult(other.to_string())),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::SideA => f.write_str("A"),
            MatchResult::SideB => f.write_str("B"),
            MatchResult::Draw => f.write_str("DRAW"),
        }
    }
}

/// Type of a player account operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "DEPOSIT")]
    Deposit,
    #[serde(rename = "WITHDRAW")]
    Withdraw,
    #[serde(rename = "BET")]
    Bet,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
            OperationKind::Bet => "BET",
        }
    }
}

impl FromStr for OperationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(OperationKind::Deposit),
            "WITHDRAW" => Ok(OperationKind::Withdraw),
            "BET" => Ok(OperationKind::Bet),
            other => Err(ValidationError::InvalidOperationKind(other.to_string())),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of bets won, held as whole hundredths
///
/// Rounded half-up to two fractional digits, so the value is always in
/// `0.00..=1.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WinRate {
    hundredths: u32,
}

impl WinRate {
    pub const ZERO: WinRate = WinRate { hundredths: 0 };

    /// Compute `won / total` rounded half-up; zero when no bets were placed
    pub fn from_counts(won: u32, total: u32) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let won = u64::from(won);
        let total = u64::from(total);
        let hundredths = (won * 200 + total) / (2 * total);
        Self { hundredths: hundredths as u32 }
    }

    pub fn hundredths(&self) -> u32 {
        self.hundredths
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }

    /// Render with two fraction digits using the given decimal separator
    pub fn format_with_separator(&self, separator: char) -> String {
        format!("{}{}{:02}", self.hundredths / 100, separator, self.hundredths % 100)
    }
}

impl fmt::Display for WinRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_separator('.'))
    }
}

impl FromStr for WinRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidState {
            reason: format!("Invalid win rate: {}", s),
        };
        let (whole, fraction) = s.split_once(['.', ',']).ok_or_else(invalid)?;
        if fraction.len() != 2 {
            return Err(invalid());
        }
        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let fraction: u32 = fraction.parse().map_err(|_| invalid())?;
        let hundredths = whole * 100 + fraction;
        if hundredths > 100 {
            return Err(invalid());
        }
        Ok(Self { hundredths })
    }
}

impl Serialize for WinRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WinRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Cryptographic hash of accounts or a report
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHash(pub [u8; 32]);

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Outcome of applying one operation to an account
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<S> {
    /// The operation was accepted
    Applied(S),
    /// The account is frozen and the operation had no effect
    Ignored(S),
    /// The operation violated the balance rules; the account is now frozen
    Disqualified(S),
}

impl<S> Transition<S> {
    pub fn into_state(self) -> S {
        match self {
            Transition::Applied(state)
            | Transition::Ignored(state)
            | Transition::Disqualified(state) => state,
        }
    }

    pub fn is_disqualified(&self) -> bool {
        matches!(self, Transition::Disqualified(_))
    }
}

/// Trace of a replay for audit purposes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub operations_processed: usize,
    pub operations_applied: usize,
    pub operations_skipped: usize,
    pub disqualifications: Vec<Disqualification>,
}

/// A player frozen during replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disqualification {
    pub operation_index: usize,
    pub player_id: PlayerId,
}

/// Performance metrics for a settlement run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_duration_ms: u64,
    pub operations_per_second: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_zero_bets() {
        assert_eq!(WinRate::from_counts(0, 0), WinRate::ZERO);
        assert_eq!(WinRate::from_counts(0, 0).to_string(), "0.00");
    }

    #[test]
    fn test_win_rate_rounds_half_up() {
        // 1/8 = 0.125 -> 0.13
        assert_eq!(WinRate::from_counts(1, 8).hundredths(), 13);
        // 2/3 = 0.666.. -> 0.67
        assert_eq!(WinRate::from_counts(2, 3).hundredths(), 67);
        // 1/3 = 0.333.. -> 0.33
        assert_eq!(WinRate::from_counts(1, 3).hundredths(), 33);
        assert_eq!(WinRate::from_counts(5, 5).to_string(), "1.00");
    }

    #[test]
    fn test_win_rate_separator() {
        let rate = WinRate::from_counts(1, 2);
        assert_eq!(rate.format_with_separator(','), "0,50");
        assert_eq!("0,50".parse::<WinRate>().unwrap(), rate);
        assert!("1.01".parse::<WinRate>().is_err());
    }

    #[test]
    fn test_tokens() {
        assert_eq!("A".parse::<Side>().unwrap(), Side::A);
        assert_eq!("C".parse::<Side>(), Err(ValidationError::InvalidSide("C".to_string())));
        assert_eq!("DRAW".parse::<MatchResult>().unwrap(), MatchResult::Draw);
        assert_eq!(MatchResult::SideB.winning_side(), Some(Side::B));
        assert_eq!("WITHDRAW".parse::<OperationKind>().unwrap(), OperationKind::Withdraw);
        assert!("TRANSFER".parse::<OperationKind>().is_err());
    }
}
