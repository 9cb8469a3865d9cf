//! Match entities and the read-only registry consulted during settlement

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::ValidationError;
use crate::types::{MatchId, MatchResult, Side};

/// A settled match with a payout multiplier per side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    side_a_multiplier: f64,
    side_b_multiplier: f64,
    result: MatchResult,
}

impl Match {
    pub fn new(id: MatchId, side_a_multiplier: f64, side_b_multiplier: f64, result: MatchResult) -> Self {
        Self {
            id,
            side_a_multiplier,
            side_b_multiplier,
            result,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn result(&self) -> MatchResult {
        self.result
    }

    /// Return per unit staked on `side`
    ///
    /// A draw returns the stake at parity regardless of side.
    pub fn payout_multiplier(&self, side: Side) -> f64 {
        if self.result.is_draw() {
            return 1.0;
        }
        match side {
            Side::A => self.side_a_multiplier,
            Side::B => self.side_b_multiplier,
        }
    }

    /// Same as [`Match::payout_multiplier`] for a raw side token
    pub fn payout_multiplier_for(&self, side: &str) -> Result<f64, ValidationError> {
        if self.result.is_draw() {
            return Ok(1.0);
        }
        Ok(self.payout_multiplier(side.parse()?))
    }
}

/// Immutable mapping from match id to match, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    matches: HashMap<MatchId, Match>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match, returning the previous entry with the same id if any
    pub fn insert(&mut self, m: Match) -> Option<Match> {
        self.matches.insert(m.id(), m)
    }

    pub fn get(&self, id: &MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    pub fn contains(&self, id: &MatchId) -> bool {
        self.matches.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl FromIterator<Match> for MatchRegistry {
    fn from_iter<I: IntoIterator<Item = Match>>(iter: I) -> Self {
        let mut registry = Self::new();
        for m in iter {
            registry.insert(m);
        }
        registry
    }
}
