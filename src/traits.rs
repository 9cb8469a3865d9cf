//! Core traits for settlement replay

use serde::{Serialize, de::DeserializeOwned};
use std::hash::Hash;
use crate::error::{ProcessingError, ValidationError};
use crate::match_registry::MatchRegistry;
use crate::types::{PlayerId, Transition};

/// Trait for account states that can be replayed deterministically
pub trait State: Clone + Serialize + DeserializeOwned + Hash {
    /// Validate the state for consistency and correctness
    fn validate(&self) -> Result<(), ValidationError>;

    /// Whether the account still accepts operations
    fn is_active(&self) -> bool;
}

/// Trait for log entries that can be replayed against an account
pub trait Transaction: Clone + Serialize + DeserializeOwned {
    /// The account this transaction applies to
    fn account_id(&self) -> PlayerId;

    /// Validate the transaction for completeness and correctness
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Trait for rule sets that settle transactions against an account
pub trait RuleSet<S, T>
where
    S: State,
    T: Transaction,
{
    /// Human readable name of the rules, recorded in the audit log
    fn name(&self) -> &str;

    /// Create the state of an account seen for the first time
    fn open_account(&self, id: PlayerId) -> S;

    /// Apply a transaction to an account, producing its next state
    fn apply(
        &self,
        state: &S,
        transaction: &T,
        matches: &MatchRegistry,
        operation_index: usize,
    ) -> Result<Transition<S>, ProcessingError>;
}
