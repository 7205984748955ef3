//! Hierarchical key derivation for every supported curve
//!
//! secp256k1 follows BIP-32, ed25519 follows SLIP-0010 (hardened only) and
//! sr25519 follows Substrate hard/soft junctions. All three start from the same
//! seed bytes and walk the same `DerivationPath` type.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use super::keys::{ed25519, secp256k1, sr25519, CurveId, KeyPair};
use super::path::DerivationPath;
use crate::error::{Error, Result};

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Default bound on path depth
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// BIP-32 seed length bounds, in bytes
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

type HmacSha512 = Hmac<Sha512>;

/// A secret scalar with its chain code, wiped on drop
pub(crate) struct ExtendedKey {
    secret: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtendedKey(<redacted>)")
    }
}

impl ExtendedKey {
    pub(crate) fn new(secret: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            chain_code: Zeroizing::new(chain_code),
        }
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.as_slice()
    }

    pub(crate) fn chain_code(&self) -> &[u8] {
        self.chain_code.as_slice()
    }

    pub(crate) fn chain_code_bytes(&self) -> [u8; 32] {
        *self.chain_code
    }
}

/// HMAC-SHA512 over the concatenated parts, split into IL (secret) and IR (chain code)
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<ExtendedKey> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|e| Error::InvalidSeed {
        reason: format!("HMAC error: {}", e),
    })?;
    for part in parts {
        mac.update(part);
    }
    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());

    let mut key = ExtendedKey::new([0u8; 32], [0u8; 32]);
    key.secret.copy_from_slice(&output[..32]);
    key.chain_code.copy_from_slice(&output[32..]);
    Ok(key)
}

fn check_seed(seed: &[u8]) -> Result<()> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(Error::InvalidSeed {
            reason: format!(
                "expected {} to {} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                seed.len()
            ),
        });
    }
    Ok(())
}

/// Derive the key pair at `path` with the default depth limit
pub fn derive(seed: &[u8], path: &DerivationPath, curve: CurveId) -> Result<KeyPair> {
    derive_with_limit(seed, path, curve, DEFAULT_MAX_DEPTH)
}

/// Derive the key pair at `path`, rejecting paths deeper than `max_depth`
///
/// An empty path yields the master key pair. The whole path is validated
/// before any key material is computed.
pub fn derive_with_limit(
    seed: &[u8],
    path: &DerivationPath,
    curve: CurveId,
    max_depth: usize,
) -> Result<KeyPair> {
    check_seed(seed)?;

    if path.depth() > max_depth {
        return Err(Error::PathTooDeep {
            depth: path.depth(),
            max: max_depth,
        });
    }

    if curve == CurveId::Ed25519 {
        if let Some(segment) = path.first_normal() {
            return Err(Error::NonHardenedUnsupported {
                curve,
                index: segment.index,
            });
        }
    }

    debug!(%curve, %path, "deriving key pair");

    match curve {
        CurveId::Secp256k1 => {
            let mut key = secp256k1::master_key(seed)?;
            for segment in path.segments() {
                key = secp256k1::derive_child(&key, segment.raw())?;
            }
            secp256k1::key_pair_from_secret(key.secret())
        }
        CurveId::Ed25519 => {
            let mut key = ed25519::master_key(seed)?;
            for segment in path.segments() {
                key = ed25519::derive_child(&key, segment.raw())?;
            }
            ed25519::key_pair_from_seed(key.secret())
        }
        CurveId::Sr25519 => {
            let mut secret = sr25519::master_key(seed)?;
            for segment in path.segments() {
                secret = sr25519::derive_child(&secret, segment.raw())?;
            }
            sr25519::finish(secret)
        }
    }
}
