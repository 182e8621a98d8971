use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{error::ClaimError, u256::U256Wrapper};

/// A claim as submitted by a caller: who receives the token and the proof of personhood
/// backing the claim.
///
/// Field elements are serialized as padded hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ClaimRequest {
    /// Address the token is minted to. Must be the address the proof's signal commits to.
    pub receiver: Address,
    /// Membership tree root the proof was generated against.
    pub root: U256Wrapper,
    /// Nullifier hash for the configured app and action.
    pub nullifier_hash: U256Wrapper,
    /// Flattened Groth16 proof.
    pub proof: [U256Wrapper; 8],
}

impl ClaimRequest {
    /// Builds a request from raw field elements.
    #[must_use]
    pub fn new(receiver: Address, root: U256, nullifier_hash: U256, proof: [U256; 8]) -> Self {
        Self {
            receiver,
            root: root.into(),
            nullifier_hash: nullifier_hash.into(),
            proof: proof.map(U256Wrapper),
        }
    }

    /// Parses a request from its JSON form.
    ///
    /// # Errors
    /// Returns `ClaimError::Serialization` if the payload is malformed, has unknown fields or
    /// carries a value that is not a valid 256-bit hex number.
    pub fn from_json(json: &str) -> Result<Self, ClaimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The proof as raw field elements.
    #[must_use]
    pub fn flat_proof(&self) -> [U256; 8] {
        self.proof.map(|limb| limb.0)
    }
}
