//! Cryptographic fingerprints using Blake3

use blake3::Hasher as Blake3Hasher;
use serde::Serialize;
use crate::error::SerializationError;
use crate::types::StateHash;

/// StateHasher provides cryptographic hashing for accounts and reports
///
/// Values are bincode encoded before hashing, so equal values produce equal
/// hashes across runs and platforms. Unordered collections must be sorted by
/// the caller.
#[derive(Debug, Clone, Default)]
pub struct StateHasher;

impl StateHasher {
    pub fn new() -> Self {
        Self
    }

    /// Compute the hash of any serializable value
    pub fn hash<T: Serialize + ?Sized>(&self, value: &T) -> Result<StateHash, SerializationError> {
        let serialized = bincode::serialize(value).map_err(|e| SerializationError::SerializationFailed {
            reason: format!("Bincode serialization failed: {}", e),
        })?;

        let mut hasher = Blake3Hasher::new();
        hasher.update(&serialized);
        Ok(StateHash(*hasher.finalize().as_bytes()))
    }

    /// Compute a single hash representing a sequence of hashes
    pub fn hash_chain(&self, hashes: &[StateHash]) -> StateHash {
        let mut hasher = Blake3Hasher::new();
        for hash in hashes {
            hasher.update(&hash.0);
        }
        StateHash(*hasher.finalize().as_bytes())
    }
}
