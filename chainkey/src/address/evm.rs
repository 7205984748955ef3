//! Keccak-derived accounts: EVM (EIP-55 hex) and Tron (0x41 Base58Check)

use sha3::{Digest, Keccak256};

use super::checksum::{base58check_decode, base58check_encode, split_version};
use super::AddressKind;
use crate::crypto::keys::secp256k1;
use crate::error::{Error, Result};

const ACCOUNT_LEN: usize = 20;
const TRON_VERSION: u8 = 0x41;

fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Last 20 bytes of Keccak-256 over the uncompressed key without its 0x04 tag
pub fn payload(public_key: &[u8]) -> Result<[u8; 20]> {
    let uncompressed = secp256k1::uncompressed(public_key)?;
    let hash = keccak256(&uncompressed[1..]);

    let mut account = [0u8; ACCOUNT_LEN];
    account.copy_from_slice(&hash[12..]);
    Ok(account)
}

/// EIP-55 mixed-case rendering of a 20-byte account
pub fn to_checksum_address(account: &[u8]) -> String {
    let lower = hex::encode(account);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn encode(public_key: &[u8]) -> Result<String> {
    Ok(to_checksum_address(&payload(public_key)?))
}

/// Decode an EVM address; all-lowercase and all-uppercase forms carry no
/// checksum, mixed case must match EIP-55 exactly
pub fn decode(address: &str) -> Result<Vec<u8>> {
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| Error::invalid_format(AddressKind::Evm, "missing 0x prefix"))?;

    if body.len() != ACCOUNT_LEN * 2 {
        return Err(Error::invalid_format(
            AddressKind::Evm,
            format!("expected {} hex digits, got {}", ACCOUNT_LEN * 2, body.len()),
        ));
    }

    let account =
        hex::decode(body).map_err(|e| Error::invalid_format(AddressKind::Evm, e.to_string()))?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum_address(&account)[2..] != *body {
        return Err(Error::ChecksumMismatch {
            format: AddressKind::Evm,
        });
    }

    Ok(account)
}

pub fn tron_encode(public_key: &[u8]) -> Result<String> {
    let account = payload(public_key)?;
    let mut data = Vec::with_capacity(ACCOUNT_LEN + 1);
    data.push(TRON_VERSION);
    data.extend_from_slice(&account);
    Ok(base58check_encode(&data))
}

pub fn tron_decode(address: &str) -> Result<Vec<u8>> {
    let data = base58check_decode(address, AddressKind::Tron)?;
    Ok(split_version(&data, &[TRON_VERSION], ACCOUNT_LEN, AddressKind::Tron)?.to_vec())
}
