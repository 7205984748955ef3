//! Caller-owned seed bytes

use std::fmt;

use zeroize::Zeroizing;

use super::derivation::{MAX_SEED_LEN, MIN_SEED_LEN};
use super::mnemonic;
use crate::error::{Error, Result};

/// Master seed, wiped on drop and never printed
pub struct Seed {
    bytes: Zeroizing<Vec<u8>>,
}

impl Seed {
    /// Wrap raw seed bytes (16 to 64 bytes)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&bytes.len()) {
            return Err(Error::InvalidSeed {
                reason: format!(
                    "expected {} to {} bytes, got {}",
                    MIN_SEED_LEN,
                    MAX_SEED_LEN,
                    bytes.len()
                ),
            });
        }
        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
        })
    }

    /// BIP-39 seed of a mnemonic phrase
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let bytes = mnemonic::mnemonic_to_seed(phrase, passphrase)?;
        Self::from_bytes(&bytes)
    }

    /// Substrate seed of a mnemonic phrase, as subkey and Polkadot-JS compute it
    pub fn substrate_from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let bytes = mnemonic::mnemonic_to_substrate_seed(phrase, passphrase)?;
        Self::from_bytes(&bytes[..])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed(<{} bytes redacted>)", self.bytes.len())
    }
}
