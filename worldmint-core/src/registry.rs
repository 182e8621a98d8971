//! Token ownership collaborator.
//!
//! The claim ledger never tracks who owns what. It allocates identifiers and asks a
//! [`TokenRegistry`] to mint them; ownership queries go back to the same registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of an issued token. Identifiers start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Errors raised by a token registry while minting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Tokens cannot be minted to the zero address.
    #[error("mint to the zero address")]
    ZeroAddressReceiver,
    /// The identifier is already owned.
    #[error("token {0} already minted")]
    AlreadyMinted(TokenId),
    /// Failure reported by the registry backend.
    #[error("registry backend error: {0}")]
    Backend(String),
}

/// Ownership ledger for issued tokens.
///
/// Implementations must make a failed `mint` side-effect free; the claim ledger relies on it to
/// keep a rejected mint from leaving a token behind.
pub trait TokenRegistry: Send + Sync {
    /// Records `owner` as the owner of the fresh token `token_id`.
    ///
    /// # Errors
    /// Returns a [`RegistryError`] if the token cannot be minted.
    fn mint(&self, owner: Address, token_id: TokenId) -> Result<(), RegistryError>;

    /// Returns the current owner of `token_id`, or `None` when it was never minted or was burned.
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;
}

#[derive(Debug, Default)]
struct Ownership {
    owners: HashMap<TokenId, Address>,
    balances: HashMap<Address, u64>,
    minted: u64,
}

/// A thread-safe, process-local [`TokenRegistry`].
///
/// Follows ERC-721 minting rules: no minting to the zero address and no minting of an
/// identifier that already has an owner.
#[derive(Debug, Default)]
pub struct InMemoryTokenRegistry {
    state: RwLock<Ownership>,
}

impl InMemoryTokenRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens currently owned by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: &Address) -> u64 {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.balances.get(owner).copied().unwrap_or_default()
    }

    /// Number of tokens ever minted, burned ones included.
    #[must_use]
    pub fn total_minted(&self) -> u64 {
        self.state.read().unwrap_or_else(PoisonError::into_inner).minted
    }

    /// Destroys `token_id`, returning its last owner. Returns `None` if nobody owns it.
    pub fn burn(&self, token_id: TokenId) -> Option<Address> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let owner = state.owners.remove(&token_id)?;
        if let Some(balance) = state.balances.get_mut(&owner) {
            *balance = balance.saturating_sub(1);
        }
        log::debug!("burned token {token_id} owned by {owner}");
        Some(owner)
    }
}

impl TokenRegistry for InMemoryTokenRegistry {
    fn mint(&self, owner: Address, token_id: TokenId) -> Result<(), RegistryError> {
        if owner == Address::ZERO {
            return Err(RegistryError::ZeroAddressReceiver);
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.owners.contains_key(&token_id) {
            return Err(RegistryError::AlreadyMinted(token_id));
        }
        state.owners.insert(token_id, owner);
        *state.balances.entry(owner).or_default() += 1;
        state.minted += 1;
        Ok(())
    }

    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .owners
            .get(&token_id)
            .copied()
    }
}
