//! Claim admission: one token per proven human, up to a fixed supply.
//!
//! A claim is admitted only if, in this order, the supply is not exhausted, the nullifier
//! hash has never been seen and the verifier accepts the proof. Admission then consumes the
//! nullifier, allocates the next token identifier and mints it, as a single unit.
//!
//! All of that runs under one lock, so concurrent claims are totally ordered: two callers can
//! never both pass the supply check for the last token, nor both consume the same nullifier.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, U256};

use crate::{
    config::ClaimConfig,
    error::{ClaimError, ClaimResult},
    field::signal_hash,
    registry::{TokenId, TokenRegistry},
    request::ClaimRequest,
    verifier::{ProofVerifier, VerificationInput, GROUP_ID},
};

#[derive(Debug)]
struct LedgerState {
    /// Nullifier hashes consumed by successful claims. Only ever grows.
    nullifiers: HashSet<U256>,
    next_token_id: u64,
}

impl LedgerState {
    const fn issued(&self) -> u64 {
        self.next_token_id - 1
    }
}

/// Issues tokens to claimants presenting a valid, never-used proof of personhood.
pub struct ClaimAdmissionLedger {
    verifier: Arc<dyn ProofVerifier>,
    registry: Arc<dyn TokenRegistry>,
    max_supply: u64,
    external_nullifier: U256,
    metadata_uri: String,
    state: Mutex<LedgerState>,
}

impl std::fmt::Debug for ClaimAdmissionLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimAdmissionLedger")
            .field("max_supply", &self.max_supply)
            .field("external_nullifier", &self.external_nullifier)
            .field("metadata_uri", &self.metadata_uri)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ClaimAdmissionLedger {
    /// Creates a ledger with no claims. The external nullifier is derived here, once.
    ///
    /// # Errors
    /// Returns `ClaimError::InvalidInput` if the configuration is invalid.
    pub fn new(
        config: ClaimConfig,
        verifier: Arc<dyn ProofVerifier>,
        registry: Arc<dyn TokenRegistry>,
    ) -> ClaimResult<Self> {
        config.validate()?;
        let external_nullifier = config.external_nullifier();
        log::info!(
            "claim ledger for app {} action {:?}: max supply {}, external nullifier {external_nullifier:#066x}",
            config.app_id,
            config.action,
            config.max_supply,
        );

        Ok(Self {
            verifier,
            registry,
            max_supply: config.max_supply,
            external_nullifier,
            metadata_uri: config.metadata_uri,
            state: Mutex::new(LedgerState {
                nullifiers: HashSet::new(),
                next_token_id: 1,
            }),
        })
    }

    /// Claims the next token for `receiver`.
    ///
    /// The proof must bind the signal derived from `receiver`, `nullifier_hash` and the ledger's
    /// external nullifier under `root`.
    ///
    /// # Errors
    /// Checked in this order, each leaving all state untouched:
    /// - `ClaimError::SupplyExhausted` if `max_supply` tokens were already issued.
    /// - `ClaimError::NullifierReused` if `nullifier_hash` was consumed by an earlier claim.
    /// - `ClaimError::InvalidProof` if the verifier rejects the proof or fails to reach a verdict.
    /// - `ClaimError::Registry` if the registry refuses to mint.
    pub fn claim(
        &self,
        receiver: Address,
        root: U256,
        nullifier_hash: U256,
        proof: [U256; 8],
    ) -> ClaimResult<TokenId> {
        let mut state = self.lock_state();

        if state.issued() >= self.max_supply {
            log::warn!("claim for {receiver} rejected: supply of {} exhausted", self.max_supply);
            return Err(ClaimError::SupplyExhausted);
        }

        if state.nullifiers.contains(&nullifier_hash) {
            log::warn!("claim for {receiver} rejected: nullifier {nullifier_hash:#x} reused");
            return Err(ClaimError::NullifierReused);
        }

        let input = VerificationInput {
            root,
            group_id: GROUP_ID,
            signal_hash: signal_hash(&receiver),
            nullifier_hash,
            external_nullifier: self.external_nullifier,
            proof,
        };
        match self.verifier.verify(&input) {
            Ok(true) => log::debug!("proof for {receiver} accepted under root {root:#x}"),
            Ok(false) => {
                log::warn!("claim for {receiver} rejected: invalid proof");
                return Err(ClaimError::InvalidProof);
            }
            Err(err) => {
                log::warn!("claim for {receiver} rejected: verifier error: {err}");
                return Err(ClaimError::InvalidProof);
            }
        }

        // Mint is the only fallible step left; ledger state is committed after it succeeds.
        let token_id = TokenId(state.next_token_id);
        self.registry.mint(receiver, token_id).map_err(|err| {
            log::warn!("claim for {receiver} rejected: mint of token {token_id} failed: {err}");
            ClaimError::from(err)
        })?;

        state.nullifiers.insert(nullifier_hash);
        state.next_token_id += 1;

        log::info!("issued token {token_id} to {receiver}");
        Ok(token_id)
    }

    /// Submits a claim received in its serialized form. See [`Self::claim`].
    ///
    /// # Errors
    /// Same as [`Self::claim`].
    pub fn submit(&self, request: &ClaimRequest) -> ClaimResult<TokenId> {
        self.claim(
            request.receiver,
            *request.root,
            *request.nullifier_hash,
            request.flat_proof(),
        )
    }

    /// Returns the collection metadata pointer for a token that currently has an owner.
    ///
    /// # Errors
    /// Returns `ClaimError::TokenNotMinted` if the token was never minted or has been burned.
    pub fn resolve_metadata(&self, token_id: TokenId) -> ClaimResult<&str> {
        if self.registry.owner_of(token_id).is_none() {
            return Err(ClaimError::TokenNotMinted(token_id));
        }
        Ok(&self.metadata_uri)
    }

    /// Whether `nullifier_hash` was consumed by a successful claim.
    ///
    /// Lets callers skip submitting a claim that is bound to fail with `NullifierReused`.
    #[must_use]
    pub fn is_nullifier_used(&self, nullifier_hash: &U256) -> bool {
        self.lock_state().nullifiers.contains(nullifier_hash)
    }

    /// Maximum number of tokens this ledger will ever issue.
    #[must_use]
    pub const fn max_supply(&self) -> u64 {
        self.max_supply
    }

    /// The external nullifier every claim proof must be bound to.
    #[must_use]
    pub const fn external_nullifier(&self) -> U256 {
        self.external_nullifier
    }

    /// The collection-wide metadata pointer.
    #[must_use]
    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    /// Number of tokens issued so far.
    #[must_use]
    pub fn total_issued(&self) -> u64 {
        self.lock_state().issued()
    }

    /// Identifier the next successful claim will receive.
    #[must_use]
    pub fn next_token_id(&self) -> TokenId {
        TokenId(self.lock_state().next_token_id)
    }

    /// Whether every claim from now on fails with `SupplyExhausted`.
    #[must_use]
    pub fn is_supply_exhausted(&self) -> bool {
        self.lock_state().issued() >= self.max_supply
    }

    fn lock_state(&self) -> MutexGuard<'_, LedgerState> {
        // State is only written after every fallible step, so a poisoned lock still guards
        // a consistent ledger.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
