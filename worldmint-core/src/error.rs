use thiserror::Error;

use crate::registry::{RegistryError, TokenId};

/// Result type for claim admission operations.
pub type ClaimResult<T, E = ClaimError> = std::result::Result<T, E>;

/// Error outputs from claim admission and its read surface.
///
/// Every variant is side-effect free: a failed call leaves the replay ledger, the
/// issuance counter and the token registry exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// The issuance counter has reached the configured maximum supply. Permanent.
    #[error("supply_exhausted")]
    SupplyExhausted,
    /// The presented nullifier hash was already consumed by a previous claim.
    #[error("nullifier_reused")]
    NullifierReused,
    /// The verifier rejected the proof, the root or the signal binding.
    #[error("invalid_proof")]
    InvalidProof,
    /// No token with this identifier is currently owned by anyone.
    #[error("token_not_minted: {0}")]
    TokenNotMinted(TokenId),
    /// The token registry refused to mint. Nothing was committed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The presented input is not valid for the requested operation
    #[error("invalid_input_{attribute}: {reason}")]
    InvalidInput {
        /// The attribute that is invalid
        attribute: String,
        /// The reason the input is invalid
        reason: String,
    },
    /// The presented data is not a valid U256 integer
    #[error("invalid_number")]
    InvalidNumber,
    /// Unexpected error serializing or deserializing information
    #[error("serialization_error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClaimError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
