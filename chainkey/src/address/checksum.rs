//! Shared hashing and Base58Check helpers

use bitcoin::hashes::{hash160, Hash};
use sha2::{Digest, Sha256};

use super::AddressKind;
use crate::error::{Error, Result};

const CHECKSUM_LEN: usize = 4;

/// RIPEMD160(SHA256(data))
pub(crate) fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Base58Check: `data || SHA256d(data)[..4]`
pub(crate) fn base58check_encode(data: &[u8]) -> String {
    let mut buf = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&double_sha256(data)[..CHECKSUM_LEN]);
    bs58::encode(buf).into_string()
}

/// Decode Base58Check, returning the data without its checksum
pub(crate) fn base58check_decode(address: &str, kind: AddressKind) -> Result<Vec<u8>> {
    let mut raw = bs58::decode(address)
        .into_vec()
        .map_err(|e| Error::invalid_format(kind, e.to_string()))?;

    if raw.len() <= CHECKSUM_LEN {
        return Err(Error::invalid_format(kind, "too short"));
    }

    let checksum = raw.split_off(raw.len() - CHECKSUM_LEN);
    if double_sha256(&raw)[..CHECKSUM_LEN] != checksum[..] {
        return Err(Error::ChecksumMismatch { format: kind });
    }

    Ok(raw)
}

/// Split versioned Base58Check data into its version prefix and body
pub(crate) fn split_version<'a>(
    data: &'a [u8],
    version: &[u8],
    body_len: usize,
    kind: AddressKind,
) -> Result<&'a [u8]> {
    if data.len() != version.len() + body_len {
        return Err(Error::invalid_format(
            kind,
            format!("expected {} bytes, got {}", version.len() + body_len, data.len()),
        ));
    }

    let (found, body) = data.split_at(version.len());
    if found != version {
        return Err(Error::NetworkMismatch {
            expected: format!("version 0x{}", hex::encode(version)),
            found: format!("version 0x{}", hex::encode(found)),
        });
    }

    Ok(body)
}
