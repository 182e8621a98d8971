//! Capped, sybil-resistant token issuance.
//!
//! Every real-world identity may claim at most one token of the collection. Claimants prove
//! membership in a World ID group with a zero-knowledge proof; the proof's nullifier hash is
//! consumed on success so the same identity cannot claim again, and a global cap bounds the
//! number of tokens ever issued.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use alloy_primitives::{address, U256};
//! use worldmint_core::{
//!     ClaimAdmissionLedger, ClaimConfig, ClaimError, InMemoryTokenRegistry, ProofVerifier,
//!     TokenId, VerificationInput, VerifierError,
//! };
//!
//! struct AcceptAll;
//!
//! impl ProofVerifier for AcceptAll {
//!     fn verify(&self, _input: &VerificationInput) -> Result<bool, VerifierError> {
//!         Ok(true)
//!     }
//! }
//!
//! let ledger = ClaimAdmissionLedger::new(
//!     ClaimConfig::new("app_123", "claim", 1, "ipfs://collection"),
//!     Arc::new(AcceptAll),
//!     Arc::new(InMemoryTokenRegistry::new()),
//! )
//! .unwrap();
//!
//! let receiver = address!("0x00000000000000000000000000000000000a11ce");
//! let token = ledger.claim(receiver, U256::from(1), U256::from(2), [U256::ZERO; 8]).unwrap();
//! assert_eq!(token, TokenId(1));
//! assert_eq!(ledger.resolve_metadata(token).unwrap(), "ipfs://collection");
//! assert_eq!(
//!     ledger.claim(receiver, U256::from(1), U256::from(3), [U256::ZERO; 8]),
//!     Err(ClaimError::SupplyExhausted)
//! );
//! ```
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
pub use config::ClaimConfig;

mod error;
pub use error::*;

/// Field element derivation for proof binding (`hashToField`, signal, external nullifier).
pub mod field;

mod ledger;
pub use ledger::ClaimAdmissionLedger;

/// Bridge forwarding log records to a host-provided logger.
pub mod logger;

mod registry;
pub use registry::*;

mod request;
pub use request::ClaimRequest;

mod u256;
pub use u256::*;

mod verifier;
pub use verifier::*;
