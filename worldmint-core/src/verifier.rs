//! Proof verification collaborator.
//!
//! The ledger only relies on the accept/reject contract of [`ProofVerifier`]. The circuit,
//! curve and trusted setup behind it are the implementation's business.

use alloy_primitives::U256;
use thiserror::Error;

/// Verification group passed with every claim proof.
///
/// World ID routers use `1` for the Orb verification group. The value is opaque to this crate.
pub const GROUP_ID: u64 = 1;

/// Public inputs of a claim proof, as handed to a [`ProofVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationInput {
    /// Root of the membership tree the proof claims inclusion in.
    pub root: U256,
    /// Verification group the root belongs to.
    pub group_id: u64,
    /// Field element derived from the claim receiver.
    pub signal_hash: U256,
    /// One-time value derived from the claimant's credential.
    pub nullifier_hash: U256,
    /// Value binding the application and action.
    pub external_nullifier: U256,
    /// Flattened Groth16 proof.
    pub proof: [U256; 8],
}

/// Errors a verifier backend can raise instead of a plain reject.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// The proof points are not well formed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The verification group is not served by this verifier.
    #[error("unsupported group id {0}")]
    UnsupportedGroup(u64),
    /// No circuit is available for this membership tree depth.
    #[error("unsupported tree depth {0}")]
    UnsupportedDepth(usize),
    /// Failure inside the verification backend.
    #[error("verifier backend error: {0}")]
    Backend(String),
}

/// Accept/reject oracle for claim proofs.
///
/// Calls must not have side effects observable by the caller, whatever the outcome.
pub trait ProofVerifier: Send + Sync {
    /// Returns `Ok(true)` when the proof is valid for `input`, `Ok(false)` when it is rejected.
    ///
    /// # Errors
    /// Returns a [`VerifierError`] when the backend cannot reach a verdict. Callers treat this
    /// as a reject.
    fn verify(&self, input: &VerificationInput) -> Result<bool, VerifierError>;
}

#[cfg(feature = "semaphore")]
pub use semaphore::SemaphoreVerifier;

#[cfg(feature = "semaphore")]
mod semaphore {
    use semaphore_rs::protocol::{verify_proof, Proof};
    use semaphore_rs_depth_config::get_supported_depths;

    use super::{ProofVerifier, VerificationInput, VerifierError, GROUP_ID};

    /// Depth of the World ID membership trees.
    const DEFAULT_TREE_DEPTH: usize = 30;

    /// [`ProofVerifier`] backed by `semaphore-rs` Groth16 verification.
    ///
    /// The tree depth is checked once at construction: `semaphore-rs` panics when asked to
    /// verify against a depth it was not built with.
    #[derive(Debug, Clone, Copy)]
    pub struct SemaphoreVerifier {
        tree_depth: usize,
    }

    impl Default for SemaphoreVerifier {
        /// A verifier for World ID's depth-30 trees, always enabled by the `semaphore` feature.
        fn default() -> Self {
            Self {
                tree_depth: DEFAULT_TREE_DEPTH,
            }
        }
    }

    impl SemaphoreVerifier {
        /// Creates a verifier for membership trees of `tree_depth`.
        ///
        /// # Errors
        /// Returns `VerifierError::UnsupportedDepth` if `semaphore-rs` was built without a
        /// circuit for `tree_depth`.
        pub fn new(tree_depth: usize) -> Result<Self, VerifierError> {
            if !get_supported_depths().contains(&tree_depth) {
                return Err(VerifierError::UnsupportedDepth(tree_depth));
            }
            Ok(Self { tree_depth })
        }

        /// Depth of the membership trees this verifier checks proofs against.
        #[must_use]
        pub const fn tree_depth(&self) -> usize {
            self.tree_depth
        }
    }

    impl ProofVerifier for SemaphoreVerifier {
        fn verify(&self, input: &VerificationInput) -> Result<bool, VerifierError> {
            if input.group_id != GROUP_ID {
                return Err(VerifierError::UnsupportedGroup(input.group_id));
            }
            let proof = Proof::from_flat(input.proof);
            verify_proof(
                input.root,
                input.nullifier_hash,
                input.signal_hash,
                input.external_nullifier,
                &proof,
                self.tree_depth,
            )
            .map_err(|err| VerifierError::MalformedProof(err.to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use alloy_primitives::U256;

        use super::*;

        #[test]
        fn test_rejects_foreign_group() {
            let input = VerificationInput {
                root: U256::from(1),
                group_id: 2,
                signal_hash: U256::from(2),
                nullifier_hash: U256::from(3),
                external_nullifier: U256::from(4),
                proof: [U256::ZERO; 8],
            };
            assert_eq!(
                SemaphoreVerifier::default().verify(&input),
                Err(VerifierError::UnsupportedGroup(2))
            );
        }

        #[test]
        fn test_rejects_depth_without_circuit() {
            assert_eq!(
                SemaphoreVerifier::new(20).map(|v| v.tree_depth()),
                Err(VerifierError::UnsupportedDepth(20))
            );
            assert_eq!(
                SemaphoreVerifier::new(0).map(|v| v.tree_depth()),
                Err(VerifierError::UnsupportedDepth(0))
            );
            assert_eq!(
                SemaphoreVerifier::new(DEFAULT_TREE_DEPTH).map(|v| v.tree_depth()),
                Ok(DEFAULT_TREE_DEPTH)
            );
            assert_eq!(SemaphoreVerifier::default().tree_depth(), DEFAULT_TREE_DEPTH);
        }
    }
}
