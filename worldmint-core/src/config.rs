use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{error::ClaimError, field::external_nullifier};

/// Construction-time parameters of a claim ledger. Never mutated once the ledger exists.
///
/// ```json
/// {
///   "app_id": "app_staging_509648994ab005fe79c4ddd0449606ca",
///   "action": "claim-nft",
///   "max_supply": 10000,
///   "metadata_uri": "ipfs://bafy.../metadata.json"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ClaimConfig {
    /// Application identifier, as registered with the identity provider.
    pub app_id: String,
    /// Action identifier. Together with `app_id` it scopes the nullifiers.
    pub action: String,
    /// Maximum number of tokens that will ever be issued. Must be at least 1.
    pub max_supply: u64,
    /// Metadata pointer shared by every token of the collection.
    pub metadata_uri: String,
}

impl ClaimConfig {
    /// Builds a configuration. Validation happens in [`Self::validate`].
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        action: impl Into<String>,
        max_supply: u64,
        metadata_uri: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            action: action.into(),
            max_supply,
            metadata_uri: metadata_uri.into(),
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// - `ClaimError::Serialization` if the JSON is malformed or has unknown fields.
    /// - `ClaimError::InvalidInput` if the values fail [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, ClaimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants a ledger needs from its configuration.
    ///
    /// # Errors
    /// Returns `ClaimError::InvalidInput` if `max_supply` is zero.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.max_supply == 0 {
            return Err(ClaimError::InvalidInput {
                attribute: "max_supply".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The external nullifier derived from `app_id` and `action`.
    #[must_use]
    pub fn external_nullifier(&self) -> U256 {
        external_nullifier(&self.app_id, &self.action)
    }
}
