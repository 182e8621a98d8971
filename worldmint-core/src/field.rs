//! Derivation of the field elements a claim proof is bound to.
//!
//! Values are reduced with the World ID `hashToField` convention: the Keccak-256 digest of the
//! packed input, shifted right by 8 bits so the result always sits below the BN254 scalar field
//! modulus expected by the Semaphore circuit.
use alloy_core::sol_types::SolValue;
use alloy_primitives::{keccak256, Address, U256};

/// Hashes arbitrary bytes into a field element.
///
/// Pure and total: the same input always yields the same output.
#[must_use]
pub fn hash_to_field(bytes: &[u8]) -> U256 {
    U256::from_be_bytes(keccak256(bytes).0) >> 8
}

/// Computes the signal a claim proof must commit to for `receiver`.
///
/// Binding the receiver into the proof prevents a proof observed in transit from being
/// redirected to another address.
#[must_use]
pub fn signal_hash(receiver: &Address) -> U256 {
    hash_to_field(&receiver.abi_encode_packed())
}

/// Derives the external nullifier binding an application and an action.
///
/// Equivalent to `hashToField(abi.encodePacked(hashToField(abi.encodePacked(app_id)), action))`.
#[must_use]
pub fn external_nullifier(app_id: &str, action: &str) -> U256 {
    let app_id_hash = hash_to_field(&app_id.abi_encode_packed());
    hash_to_field(&[app_id_hash.abi_encode_packed(), action.abi_encode_packed()].concat())
}
