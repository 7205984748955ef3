//! secp256k1 keys, ECDSA signing and BIP-32 child derivation

use once_cell::sync::Lazy;
use secp256k1::{ecdsa, All, Message, PublicKey as Secp256k1PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::types::{check_len, CurveId, KeyPair, PrivateKey, PublicKey, Signature};
use crate::crypto::derivation::{hmac_sha512, ExtendedKey, HARDENED_OFFSET};
use crate::error::{Error, Result};

const CURVE: CurveId = CurveId::Secp256k1;

/// BIP-32 master key HMAC key
const MASTER_SECRET: &[u8] = b"Bitcoin seed";

static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

pub(crate) fn context() -> &'static Secp256k1<All> {
    &SECP
}

fn secret_key(secret: &[u8]) -> Result<SecretKey> {
    check_len(CURVE, CURVE.private_key_len(), secret.len())?;
    SecretKey::from_slice(secret).map_err(|e| Error::InvalidKey {
        curve: CURVE,
        reason: e.to_string(),
    })
}

fn public_key(public: &[u8]) -> Result<Secp256k1PublicKey> {
    Secp256k1PublicKey::from_slice(public).map_err(|e| Error::InvalidKey {
        curve: CURVE,
        reason: e.to_string(),
    })
}

/// Build a key pair from a 32-byte secret scalar
pub fn key_pair_from_secret(secret: &[u8]) -> Result<KeyPair> {
    let mut secret_key = secret_key(secret)?;
    let public_key = Secp256k1PublicKey::from_secret_key(context(), &secret_key);
    let secret_bytes = Zeroizing::new(secret_key.secret_bytes());
    secret_key.non_secure_erase();

    KeyPair::new(
        PrivateKey::new(secret_bytes.to_vec(), CURVE),
        PublicKey::new(public_key.serialize().to_vec(), CURVE),
    )
}

fn message_digest(message: &[u8]) -> Result<Message> {
    let digest = Sha256::digest(message);
    Message::from_digest_slice(&digest).map_err(|e| Error::InvalidKey {
        curve: CURVE,
        reason: e.to_string(),
    })
}

/// Deterministic (RFC 6979) ECDSA over SHA-256 of the message, compact encoding
pub fn sign(secret: &[u8], message: &[u8]) -> Result<Signature> {
    let mut secret_key = secret_key(secret)?;
    let digest = message_digest(message)?;
    let signature = context().sign_ecdsa(&digest, &secret_key);
    secret_key.non_secure_erase();

    Ok(Signature::new(signature.serialize_compact().to_vec(), CURVE))
}

pub fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public_key) = public_key(public) else {
        return false;
    };
    let Ok(signature) = ecdsa::Signature::from_compact(signature) else {
        return false;
    };
    let Ok(digest) = message_digest(message) else {
        return false;
    };

    context().verify_ecdsa(&digest, &signature, &public_key).is_ok()
}

/// Uncompressed SEC1 form (65 bytes) of a compressed or uncompressed key
pub fn uncompressed(public: &[u8]) -> Result<[u8; 65]> {
    Ok(public_key(public)?.serialize_uncompressed())
}

/// Compressed SEC1 form (33 bytes) of a compressed or uncompressed key
pub fn compressed(public: &[u8]) -> Result<[u8; 33]> {
    Ok(public_key(public)?.serialize())
}

/// BIP-340 x-only form (32 bytes)
pub fn x_only(public: &[u8]) -> Result<[u8; 32]> {
    let (x_only, _parity) = public_key(public)?.x_only_public_key();
    Ok(x_only.serialize())
}

/// Derive the BIP-32 master key from a seed
pub(crate) fn master_key(seed: &[u8]) -> Result<ExtendedKey> {
    let master = hmac_sha512(MASTER_SECRET, &[seed])?;
    // IL must be a valid scalar
    secret_key(master.secret())?.non_secure_erase();
    Ok(master)
}

/// Derive a BIP-32 child from its parent, hardened or not
///
/// Every intermediate `SecretKey` is erased before returning, errors included.
pub(crate) fn derive_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    let child = if index >= HARDENED_OFFSET {
        hmac_sha512(
            parent.chain_code(),
            &[&[0u8], parent.secret(), &index.to_be_bytes()],
        )?
    } else {
        let mut parent_secret = secret_key(parent.secret())?;
        let parent_public = Secp256k1PublicKey::from_secret_key(context(), &parent_secret);
        parent_secret.non_secure_erase();
        hmac_sha512(
            parent.chain_code(),
            &[&parent_public.serialize(), &index.to_be_bytes()],
        )?
    };

    // k_child = parse256(IL) + k_par (mod n)
    let mut tweak = secret_key(child.secret())?;
    let mut parent_secret = match secret_key(parent.secret()) {
        Ok(secret) => secret,
        Err(e) => {
            tweak.non_secure_erase();
            return Err(e);
        }
    };
    let sum = tweak.add_tweak(&Scalar::from(parent_secret));
    tweak.non_secure_erase();
    parent_secret.non_secure_erase();

    let mut child_secret = sum.map_err(|e| Error::InvalidKey {
        curve: CURVE,
        reason: format!("child key out of range at index {}: {}", index, e),
    })?;
    let child_bytes = Zeroizing::new(child_secret.secret_bytes());
    child_secret.non_secure_erase();

    Ok(ExtendedKey::new(*child_bytes, child.chain_code_bytes()))
}
