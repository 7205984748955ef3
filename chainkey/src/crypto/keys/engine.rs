//! Curve dispatch: key generation, signing and verification keyed by `CurveId`

use super::types::{check_len, CurveId, KeyPair, PrivateKey, PublicKey, Signature};
use super::{ed25519, secp256k1, sr25519};
use crate::error::{Error, Result};

/// Generate a key pair from 32 secret bytes on the given curve
///
/// The secret is a secp256k1 scalar, an RFC 8032 seed, or an sr25519
/// mini-secret. The same bytes on different curves give unrelated keys.
pub fn generate_key_pair(secret: &[u8], curve: CurveId) -> Result<KeyPair> {
    match curve {
        CurveId::Secp256k1 => secp256k1::key_pair_from_secret(secret),
        CurveId::Ed25519 => ed25519::key_pair_from_seed(secret),
        CurveId::Sr25519 => sr25519::key_pair_from_mini_secret(secret),
    }
}

/// Generate a key pair from a curve name, for callers holding untyped input
pub fn generate_key_pair_named(secret: &[u8], curve: &str) -> Result<KeyPair> {
    generate_key_pair(secret, curve.parse()?)
}

/// Sign `message` with `private_key` on `curve`
///
/// The key's own curve tag must match `curve`: a secp256k1 key is never
/// accepted for ed25519 signing, even though both are 32 bytes.
pub fn sign(private_key: &PrivateKey, curve: CurveId, message: &[u8]) -> Result<Signature> {
    if private_key.curve() != curve {
        return Err(Error::CurveMismatch {
            expected: curve,
            found: private_key.curve(),
        });
    }
    check_len(curve, curve.private_key_len(), private_key.as_bytes().len())?;

    let secret = private_key.as_bytes();
    match curve {
        CurveId::Secp256k1 => secp256k1::sign(secret, message),
        CurveId::Ed25519 => ed25519::sign(secret, message),
        CurveId::Sr25519 => sr25519::sign(secret, message),
    }
}

/// Verify `signature` over `message`; any malformed or mismatched input is `false`
pub fn verify(public_key: &PublicKey, curve: CurveId, message: &[u8], signature: &Signature) -> bool {
    if public_key.curve() != curve || signature.curve() != curve {
        return false;
    }

    let public = public_key.as_bytes();
    let signature = signature.as_bytes();
    match curve {
        CurveId::Secp256k1 => secp256k1::verify(public, message, signature),
        CurveId::Ed25519 => ed25519::verify(public, message, signature),
        CurveId::Sr25519 => sr25519::verify(public, message, signature),
    }
}
