//! Tezos `tz1` implicit accounts: Base58Check of Blake2b-160 over an ed25519 key

use blake2::digest::consts::U20;
use blake2::{Blake2b, Digest};

use super::checksum::{base58check_decode, base58check_encode};
use super::AddressKind;
use crate::error::{Error, Result};

const TZ1_PREFIX: [u8; 3] = [6, 161, 159];
const HASH_LEN: usize = 20;

type Blake2b160 = Blake2b<U20>;

pub fn payload(public_key: &[u8]) -> Result<[u8; 20]> {
    if public_key.len() != 32 {
        return Err(Error::invalid_format(
            AddressKind::Tezos,
            format!("expected a 32-byte ed25519 key, got {}", public_key.len()),
        ));
    }
    Ok(Blake2b160::digest(public_key).into())
}

pub fn encode(public_key: &[u8]) -> Result<String> {
    let hash = payload(public_key)?;
    let mut data = Vec::with_capacity(TZ1_PREFIX.len() + HASH_LEN);
    data.extend_from_slice(&TZ1_PREFIX);
    data.extend_from_slice(&hash);
    Ok(base58check_encode(&data))
}

pub fn decode(address: &str) -> Result<Vec<u8>> {
    let data = base58check_decode(address, AddressKind::Tezos)?;
    if data.len() != TZ1_PREFIX.len() + HASH_LEN {
        return Err(Error::invalid_format(
            AddressKind::Tezos,
            format!("unexpected length {}", data.len()),
        ));
    }
    // tz2/tz3/KT1 share the layout but not the prefix
    if data[..TZ1_PREFIX.len()] != TZ1_PREFIX {
        return Err(Error::invalid_format(AddressKind::Tezos, "not a tz1 address"));
    }
    Ok(data[TZ1_PREFIX.len()..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tz1_shape_and_round_trip() {
        let public = [0x17u8; 32];
        let address = encode(&public).unwrap();
        assert!(address.starts_with("tz1"));
        assert_eq!(address.len(), 36);
        assert_eq!(decode(&address).unwrap(), payload(&public).unwrap().to_vec());
    }

    #[test]
    fn test_other_tezos_prefixes_are_rejected() {
        // tz2 prefix with a valid checksum
        let mut data = vec![6, 161, 161];
        data.extend_from_slice(&[0u8; 20]);
        let tz2 = base58check_encode(&data);
        assert!(tz2.starts_with("tz2"));
        assert!(matches!(decode(&tz2), Err(Error::InvalidFormat { .. })));
    }
}
