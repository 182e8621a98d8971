//! Common test utilities shared across integration tests.
#![allow(dead_code, missing_docs)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, U256};
use worldmint_core::{
    field::signal_hash, ClaimAdmissionLedger, ClaimConfig, InMemoryTokenRegistry,
    ProofVerifier, RegistryError, TokenId, TokenRegistry, VerificationInput, VerifierError,
};

pub const APP_ID: &str = "app_staging_509648994ab005fe79c4ddd0449606ca";
pub const ACTION: &str = "claim-collection";
pub const METADATA_URI: &str = "ipfs://bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Proof blob the mock verifier treats as genuine for the given public inputs.
///
/// The limbs commit to the signal, nullifier and external nullifier, so a proof produced for
/// one receiver does not verify for another.
pub fn mock_proof(receiver: &Address, nullifier_hash: U256, external_nullifier: U256) -> [U256; 8] {
    let mut proof = [U256::ZERO; 8];
    proof[0] = signal_hash(receiver);
    proof[1] = nullifier_hash;
    proof[2] = external_nullifier;
    proof
}

/// Verifier accepting exactly the proofs built by [`mock_proof`] for an allowed root.
pub struct MockVerifier {
    roots: HashSet<U256>,
    calls: AtomicUsize,
    fail_backend: AtomicBool,
}

impl MockVerifier {
    pub fn new(roots: impl IntoIterator<Item = U256>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
            calls: AtomicUsize::new(0),
            fail_backend: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_backend_failure(&self, fail: bool) {
        self.fail_backend.store(fail, Ordering::SeqCst);
    }
}

impl ProofVerifier for MockVerifier {
    fn verify(&self, input: &VerificationInput) -> Result<bool, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_backend.load(Ordering::SeqCst) {
            return Err(VerifierError::Backend("prover unreachable".to_string()));
        }
        Ok(input.group_id == 1
            && self.roots.contains(&input.root)
            && input.proof[0] == input.signal_hash
            && input.proof[1] == input.nullifier_hash
            && input.proof[2] == input.external_nullifier
            && input.proof[3..].iter().all(|limb| *limb == U256::ZERO))
    }
}

/// Registry that can be told to refuse the next mints, recording every attempt.
#[derive(Default)]
pub struct FlakyRegistry {
    inner: InMemoryTokenRegistry,
    fail_mints: AtomicBool,
    attempts: Mutex<Vec<(Address, TokenId)>>,
}

impl FlakyRegistry {
    pub fn set_failing(&self, fail: bool) {
        self.fail_mints.store(fail, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> Vec<(Address, TokenId)> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn inner(&self) -> &InMemoryTokenRegistry {
        &self.inner
    }
}

impl TokenRegistry for FlakyRegistry {
    fn mint(&self, owner: Address, token_id: TokenId) -> Result<(), RegistryError> {
        self.attempts.lock().unwrap().push((owner, token_id));
        if self.fail_mints.load(Ordering::SeqCst) {
            return Err(RegistryError::Backend("registry offline".to_string()));
        }
        self.inner.mint(owner, token_id)
    }

    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.inner.owner_of(token_id)
    }
}

pub const ROOT: U256 = U256::from_limbs([0x5eed, 0, 0, 0]);

pub struct Harness {
    pub ledger: ClaimAdmissionLedger,
    pub verifier: Arc<MockVerifier>,
    pub registry: Arc<FlakyRegistry>,
}

impl Harness {
    pub fn new(max_supply: u64) -> Self {
        init_logging();
        let verifier = Arc::new(MockVerifier::new([ROOT]));
        let registry = Arc::new(FlakyRegistry::default());
        let ledger = ClaimAdmissionLedger::new(
            ClaimConfig::new(APP_ID, ACTION, max_supply, METADATA_URI),
            verifier.clone(),
            registry.clone(),
        )
        .unwrap();
        Self {
            ledger,
            verifier,
            registry,
        }
    }

    pub fn valid_proof(&self, receiver: &Address, nullifier_hash: U256) -> [U256; 8] {
        mock_proof(receiver, nullifier_hash, self.ledger.external_nullifier())
    }

    /// Claims with a proof the mock verifier accepts.
    pub fn claim_valid(
        &self,
        receiver: Address,
        nullifier_hash: U256,
    ) -> Result<TokenId, worldmint_core::ClaimError> {
        let proof = self.valid_proof(&receiver, nullifier_hash);
        self.ledger.claim(receiver, ROOT, nullifier_hash, proof)
    }

    /// Everything an observer can see of the ledger and the registry.
    pub fn snapshot(&self, watched_nullifiers: &[U256], watched_tokens: u64) -> Snapshot {
        Snapshot {
            next_token_id: self.ledger.next_token_id(),
            total_issued: self.ledger.total_issued(),
            used: watched_nullifiers
                .iter()
                .map(|h| self.ledger.is_nullifier_used(h))
                .collect(),
            owners: (1..=watched_tokens)
                .map(|id| self.registry.owner_of(TokenId(id)))
                .collect(),
            minted: self.registry.inner().total_minted(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub next_token_id: TokenId,
    pub total_issued: u64,
    pub used: Vec<bool>,
    pub owners: Vec<Option<Address>>,
    pub minted: u64,
}

pub fn address(n: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[12..].copy_from_slice(&n.to_be_bytes());
    Address::from(bytes)
}
