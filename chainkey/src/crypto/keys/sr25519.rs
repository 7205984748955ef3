//! sr25519 (schnorrkel) keys, signing and Substrate junction derivation
//!
//! Keys are expanded from mini-secrets in Ed25519 mode and signatures use the
//! `substrate` signing context, matching Substrate and Polkadot-JS.

use rand::rngs::StdRng;
use rand::SeedableRng;
use schnorrkel::derive::{ChainCode, Derivation};
use schnorrkel::{ExpansionMode, MiniSecretKey, SecretKey};
use zeroize::Zeroizing;

use super::types::{check_len, CurveId, KeyPair, PrivateKey, PublicKey, Signature};
use crate::crypto::derivation::{hmac_sha512, HARDENED_OFFSET};
use crate::error::{Error, Result};

const CURVE: CurveId = CurveId::Sr25519;

const SIGNING_CTX: &[u8] = b"substrate";

fn invalid_key(e: impl std::fmt::Display) -> Error {
    Error::InvalidKey {
        curve: CURVE,
        reason: e.to_string(),
    }
}

fn into_key_pair(secret: SecretKey) -> Result<KeyPair> {
    let public = secret.to_public();
    KeyPair::new(
        PrivateKey::new(secret.to_bytes().to_vec(), CURVE),
        PublicKey::new(public.to_bytes().to_vec(), CURVE),
    )
}

fn expand_mini_secret(mini_secret: &[u8]) -> Result<SecretKey> {
    check_len(CURVE, CurveId::SECRET_LEN, mini_secret.len())?;
    let mini = MiniSecretKey::from_bytes(mini_secret).map_err(invalid_key)?;
    Ok(mini.expand(ExpansionMode::Ed25519))
}

/// Build a key pair from a 32-byte mini-secret
pub fn key_pair_from_mini_secret(mini_secret: &[u8]) -> Result<KeyPair> {
    into_key_pair(expand_mini_secret(mini_secret)?)
}

/// Build a key pair from a 64-byte `key || nonce` secret
pub fn key_pair_from_secret(secret: &[u8]) -> Result<KeyPair> {
    check_len(CURVE, CURVE.private_key_len(), secret.len())?;
    into_key_pair(SecretKey::from_bytes(secret).map_err(invalid_key)?)
}

/// Build a key pair from the ed25519-expanded secret layout that Polkadot-JS
/// stores in its PKCS8 envelope
pub fn key_pair_from_ed25519_bytes(secret: &[u8]) -> Result<KeyPair> {
    check_len(CURVE, CURVE.private_key_len(), secret.len())?;
    into_key_pair(SecretKey::from_ed25519_bytes(secret).map_err(invalid_key)?)
}

pub fn sign(secret: &[u8], message: &[u8]) -> Result<Signature> {
    check_len(CURVE, CURVE.private_key_len(), secret.len())?;
    let secret = SecretKey::from_bytes(secret).map_err(invalid_key)?;
    let public = secret.to_public();
    let signature = secret.sign_simple(SIGNING_CTX, message, &public);
    Ok(Signature::new(signature.to_bytes().to_vec(), CURVE))
}

pub fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public) = schnorrkel::PublicKey::from_bytes(public) else {
        return false;
    };
    // Rejects anything without the schnorrkel marker bit, ed25519 signatures included
    let Ok(signature) = schnorrkel::Signature::from_bytes(signature) else {
        return false;
    };
    public.verify_simple(SIGNING_CTX, message, &signature).is_ok()
}

/// Substrate junction chain code for a numeric index: SCALE `u64`, zero padded
fn junction_chain_code(index: u32) -> ChainCode {
    let mut cc = [0u8; 32];
    cc[..8].copy_from_slice(&u64::from(index).to_le_bytes());
    ChainCode(cc)
}

/// Master secret: the first 32 seed bytes taken as a mini-secret
pub(crate) fn master_key(seed: &[u8]) -> Result<SecretKey> {
    let mini_secret = seed.get(..CurveId::SECRET_LEN).ok_or_else(|| Error::InvalidSeed {
        reason: format!("sr25519 needs at least 32 seed bytes, got {}", seed.len()),
    })?;
    expand_mini_secret(mini_secret)
}

/// Nonce source for a soft junction, keyed by the parent secret and chain code
///
/// Soft derivation randomises the child nonce; seeding it from the inputs keeps
/// the whole child secret a function of (parent, index).
fn soft_junction_rng(parent: &SecretKey, cc: &ChainCode) -> Result<StdRng> {
    let parent_bytes = Zeroizing::new(parent.to_bytes());
    let keyed = hmac_sha512(parent_bytes.as_slice(), &[b"sr25519 soft junction", &cc.0])?;
    let mut rng_seed = Zeroizing::new([0u8; 32]);
    rng_seed.copy_from_slice(keyed.secret());
    Ok(StdRng::from_seed(*rng_seed))
}

/// Apply one junction: hardened indices are hard junctions (`//n`), the rest
/// soft junctions (`/n`)
pub(crate) fn derive_child(parent: &SecretKey, index: u32) -> Result<SecretKey> {
    if index >= HARDENED_OFFSET {
        let cc = junction_chain_code(index - HARDENED_OFFSET);
        let (mini, _) = parent.hard_derive_mini_secret_key(Some(cc), b"");
        Ok(mini.expand(ExpansionMode::Ed25519))
    } else {
        let cc = junction_chain_code(index);
        let rng = soft_junction_rng(parent, &cc)?;
        let (child, _) = parent.derived_key_simple_rng(cc, [], rng);
        Ok(child)
    }
}

pub(crate) fn finish(secret: SecretKey) -> Result<KeyPair> {
    into_key_pair(secret)
}
