//! Cosmos SDK account addresses: Bech32 of HASH160(compressed key)

use bech32::{FromBase32, ToBase32, Variant};

use super::bitcoin::map_bech32_error;
use super::checksum::hash160;
use super::AddressKind;
use crate::crypto::keys::secp256k1;
use crate::error::{Error, Result};

pub fn payload(public_key: &[u8]) -> Result<[u8; 20]> {
    Ok(hash160(&secp256k1::compressed(public_key)?))
}

pub fn encode(public_key: &[u8], hrp: &str) -> Result<String> {
    let hash = payload(public_key)?;
    bech32::encode(hrp, hash.to_base32(), Variant::Bech32)
        .map_err(|e| Error::invalid_format(AddressKind::Cosmos, e.to_string()))
}

pub fn decode(address: &str, hrp: &str) -> Result<Vec<u8>> {
    let (found_hrp, data, variant) =
        bech32::decode(address).map_err(|e| map_bech32_error(e, AddressKind::Cosmos))?;

    if found_hrp != hrp {
        return Err(Error::NetworkMismatch {
            expected: hrp.to_string(),
            found: found_hrp,
        });
    }
    if variant != Variant::Bech32 {
        return Err(Error::ChecksumMismatch {
            format: AddressKind::Cosmos,
        });
    }

    let hash = Vec::<u8>::from_base32(&data)
        .map_err(|e| Error::invalid_format(AddressKind::Cosmos, e.to_string()))?;
    if hash.len() != 20 {
        return Err(Error::invalid_format(
            AddressKind::Cosmos,
            format!("expected 20 bytes, got {}", hash.len()),
        ));
    }
    Ok(hash)
}
