//! SS58 addresses for Substrate chains
//!
//! `base58(prefix || account_id || blake2b_512("SS58PRE" || prefix || account_id)[..2])`
//! where the prefix is one byte for identifiers below 64 and two bytes up to 16383.

use blake2::{Blake2b512, Digest};

use super::AddressKind;
use crate::error::{Error, Result};

const KIND: AddressKind = AddressKind::Ss58;
const ACCOUNT_LEN: usize = 32;
const CHECKSUM_LEN: usize = 2;
const SS58_PRE: &[u8] = b"SS58PRE";

/// Largest network identifier SS58 can express
pub const MAX_PREFIX: u16 = 16383;

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_PRE);
    hasher.update(data);
    let hash = hasher.finalize();
    [hash[0], hash[1]]
}

fn encode_prefix(prefix: u16) -> Result<Vec<u8>> {
    match prefix {
        0..=63 => Ok(vec![prefix as u8]),
        64..=MAX_PREFIX => {
            let first = (((prefix & 0b0000_0000_1111_1100) as u8) >> 2) | 0b0100_0000;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first, second])
        }
        _ => Err(Error::invalid_format(KIND, format!("prefix {} out of range", prefix))),
    }
}

/// Parse the prefix bytes, returning the identifier and how many bytes it used
fn decode_prefix(data: &[u8]) -> Result<(u16, usize)> {
    match data {
        [first @ 0..=63, ..] => Ok((u16::from(*first), 1)),
        [first @ 64..=127, second, ..] => {
            let lower = (first << 2) | (second >> 6);
            let upper = second & 0b0011_1111;
            Ok((u16::from(lower) | (u16::from(upper) << 8), 2))
        }
        [first, ..] => Err(Error::invalid_format(
            KIND,
            format!("reserved prefix byte {}", first),
        )),
        [] => Err(Error::invalid_format(KIND, "empty")),
    }
}

pub fn encode(public_key: &[u8], prefix: u16) -> Result<String> {
    if public_key.len() != ACCOUNT_LEN {
        return Err(Error::invalid_format(
            KIND,
            format!("expected a {}-byte public key, got {}", ACCOUNT_LEN, public_key.len()),
        ));
    }

    let mut data = encode_prefix(prefix)?;
    data.extend_from_slice(public_key);
    let checksum = checksum(&data);
    data.extend_from_slice(&checksum);

    Ok(bs58::encode(data).into_string())
}

/// Decode an address, returning its prefix and account id without checking the network
pub fn decode_any(address: &str) -> Result<(u16, Vec<u8>)> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| Error::invalid_format(KIND, e.to_string()))?;

    let (prefix, prefix_len) = decode_prefix(&data)?;
    if data.len() != prefix_len + ACCOUNT_LEN + CHECKSUM_LEN {
        return Err(Error::invalid_format(
            KIND,
            format!("unexpected length {}", data.len()),
        ));
    }

    let (body, found) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(body) != found {
        return Err(Error::ChecksumMismatch { format: KIND });
    }

    Ok((prefix, body[prefix_len..].to_vec()))
}

/// Decode an address, requiring it to belong to the `prefix` network
pub fn decode(address: &str, prefix: u16) -> Result<Vec<u8>> {
    let (found, account) = decode_any(address)?;
    if found != prefix {
        return Err(Error::NetworkMismatch {
            expected: format!("ss58 prefix {}", prefix),
            found: format!("ss58 prefix {}", found),
        });
    }
    Ok(account)
}
