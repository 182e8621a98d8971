use std::ops::Deref;

use crate::error::ClaimError;
use ruint::aliases::U256;
use serde::{Deserialize, Serialize};

/// A wrapper around `U256` to represent a field element (root, nullifier hash, proof limb) in a claim.
///
/// Inside the crate field elements are plain `U256` values. The wrapper gives them a stable
/// external representation: when claims travel as JSON the values are padded hex strings from
/// Big Endian bytes, the same encoding World ID proofs are handed out in.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct U256Wrapper(pub U256);

impl U256Wrapper {
    /// Outputs a hex string representation of the `U256` value padded to 32 bytes (plus two bytes for the `0x` prefix).
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        format!("{:#066x}", self.0)
    }

    /// Attempts to parse a hex string as a `U256` value (wrapped).
    ///
    /// At most one `0x` prefix is accepted and at least one hex digit must follow it.
    ///
    /// # Errors
    /// Will return an `Error::InvalidNumber` if the input is not a valid hex-string-presented number up to 256 bits.
    pub fn try_from_hex_string(hex_string: &str) -> Result<Self, ClaimError> {
        let hex_string = hex_string.trim();
        let digits = hex_string.strip_prefix("0x").unwrap_or(hex_string);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ClaimError::InvalidNumber);
        }

        let number =
            U256::from_str_radix(digits, 16).map_err(|_| ClaimError::InvalidNumber)?;

        Ok(Self(number))
    }
}

impl From<U256Wrapper> for U256 {
    fn from(val: U256Wrapper) -> Self {
        val.0
    }
}

impl From<U256> for U256Wrapper {
    fn from(val: U256) -> Self {
        Self(val)
    }
}

impl From<u64> for U256Wrapper {
    fn from(val: u64) -> Self {
        Self(U256::from(val))
    }
}

impl std::fmt::Display for U256Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl Deref for U256Wrapper {
    type Target = U256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for U256Wrapper {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for U256Wrapper {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_from_hex_string(&s).map_err(serde::de::Error::custom)
    }
}
