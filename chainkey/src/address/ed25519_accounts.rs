//! Account formats that carry or hash a raw ed25519 key: Solana, NEAR, Aptos, Sui

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sha3::Sha3_256;

use super::AddressKind;
use crate::error::{Error, Result};

const KEY_LEN: usize = 32;

/// Single-signature ed25519 scheme flag used by Aptos and Sui
const ED25519_SCHEME: u8 = 0x00;

type Blake2b256 = Blake2b<U32>;

fn check_key(public_key: &[u8], kind: AddressKind) -> Result<()> {
    if public_key.len() != KEY_LEN {
        return Err(Error::invalid_format(
            kind,
            format!("expected a {}-byte key, got {}", KEY_LEN, public_key.len()),
        ));
    }
    Ok(())
}

fn decode_hex32(body: &str, kind: AddressKind) -> Result<Vec<u8>> {
    if body.len() != KEY_LEN * 2 {
        return Err(Error::invalid_format(
            kind,
            format!("expected {} hex digits, got {}", KEY_LEN * 2, body.len()),
        ));
    }
    hex::decode(body).map_err(|e| Error::invalid_format(kind, e.to_string()))
}

fn strip_0x(address: &str, kind: AddressKind) -> Result<&str> {
    address
        .strip_prefix("0x")
        .ok_or_else(|| Error::invalid_format(kind, "missing 0x prefix"))
}

pub fn solana_encode(public_key: &[u8]) -> Result<String> {
    check_key(public_key, AddressKind::Base58)?;
    Ok(bs58::encode(public_key).into_string())
}

pub fn solana_decode(address: &str) -> Result<Vec<u8>> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| Error::invalid_format(AddressKind::Base58, e.to_string()))?;
    check_key(&bytes, AddressKind::Base58)?;
    Ok(bytes)
}

/// NEAR implicit account id: the lowercase hex of the key
pub fn near_encode(public_key: &[u8]) -> Result<String> {
    check_key(public_key, AddressKind::Near)?;
    Ok(hex::encode(public_key))
}

pub fn near_decode(address: &str) -> Result<Vec<u8>> {
    if address.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::invalid_format(
            AddressKind::Near,
            "implicit account ids are lowercase",
        ));
    }
    decode_hex32(address, AddressKind::Near)
}

pub fn aptos_payload(public_key: &[u8]) -> Result<[u8; 32]> {
    check_key(public_key, AddressKind::Aptos)?;
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    Ok(hasher.finalize().into())
}

pub fn aptos_encode(public_key: &[u8]) -> Result<String> {
    Ok(format!("0x{}", hex::encode(aptos_payload(public_key)?)))
}

pub fn aptos_decode(address: &str) -> Result<Vec<u8>> {
    decode_hex32(strip_0x(address, AddressKind::Aptos)?, AddressKind::Aptos)
}

pub fn sui_payload(public_key: &[u8]) -> Result<[u8; 32]> {
    check_key(public_key, AddressKind::Sui)?;
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_SCHEME]);
    hasher.update(public_key);
    Ok(hasher.finalize().into())
}

pub fn sui_encode(public_key: &[u8]) -> Result<String> {
    Ok(format!("0x{}", hex::encode(sui_payload(public_key)?)))
}

pub fn sui_decode(address: &str) -> Result<Vec<u8>> {
    decode_hex32(strip_0x(address, AddressKind::Sui)?, AddressKind::Sui)
}
