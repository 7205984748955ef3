//! Unstructured key exports: WIF, raw hex and ed25519/sr25519 key pair bytes

use zeroize::Zeroizing;

use crate::address::{checksum, AddressKind};
use crate::crypto::keys::{ed25519, secp256k1, sr25519, CurveId, KeyPair};
use crate::error::{Error, Result};

const WIF_MAINNET: u8 = 0x80;
const WIF_TESTNET: u8 = 0xef;
const WIF_COMPRESSED: u8 = 0x01;

const ED25519_KEYPAIR_LEN: usize = 64;
const SR25519_KEYPAIR_LEN: usize = 96;

/// Decode hex with an optional `0x` prefix
pub fn decode_hex(s: &str) -> Option<Zeroizing<Vec<u8>>> {
    let body = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(body).ok().map(Zeroizing::new)
}

/// Decode a WIF private key into its 32-byte secret
///
/// Checksum failures are reported; other malformations return `None` so the
/// caller can try other shapes.
pub fn decode_wif(s: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
    if !s.starts_with(&['5', 'K', 'L', '9', 'c'][..]) {
        return Ok(None);
    }

    let data = match checksum::base58check_decode(s, AddressKind::P2pkh) {
        Ok(data) => Zeroizing::new(data),
        Err(Error::ChecksumMismatch { .. }) => {
            return Err(Error::ChecksumMismatch {
                format: AddressKind::P2pkh,
            })
        }
        Err(_) => return Ok(None),
    };

    let secret = match data.as_slice() {
        [WIF_MAINNET | WIF_TESTNET, secret @ ..] if secret.len() == 32 => secret,
        [WIF_MAINNET | WIF_TESTNET, secret @ .., WIF_COMPRESSED] if secret.len() == 32 => secret,
        _ => return Ok(None),
    };

    Ok(Some(Zeroizing::new(secret.to_vec())))
}

/// Parse 64 ed25519 key pair bytes from hex, Base58 or a JSON array of bytes
pub fn decode_ed25519_keypair(s: &str) -> Option<Zeroizing<Vec<u8>>> {
    let bytes = (if s.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(s).ok().map(Zeroizing::new)
    } else if let Some(bytes) = decode_hex(s) {
        Some(bytes)
    } else {
        bs58::decode(s).into_vec().ok().map(Zeroizing::new)
    })?;

    (bytes.len() == ED25519_KEYPAIR_LEN).then_some(bytes)
}

/// Parse 96 sr25519 key pair bytes from hex
pub fn decode_sr25519_keypair(s: &str) -> Option<Zeroizing<Vec<u8>>> {
    decode_hex(s).filter(|bytes| bytes.len() == SR25519_KEYPAIR_LEN)
}

pub fn wif_key_pair(secret: &[u8]) -> Result<KeyPair> {
    secp256k1::key_pair_from_secret(secret)
}

pub fn ed25519_key_pair(bytes: &[u8]) -> Result<KeyPair> {
    ed25519::key_pair_from_keypair_bytes(bytes)
}

/// Build an sr25519 key pair from `secret(64) || public(32)`, checking the halves agree
pub fn sr25519_key_pair(bytes: &[u8]) -> Result<KeyPair> {
    if bytes.len() != SR25519_KEYPAIR_LEN {
        return Err(Error::InvalidKeyLength {
            curve: CurveId::Sr25519,
            expected: SR25519_KEYPAIR_LEN,
            actual: bytes.len(),
        });
    }

    let (secret, public) = bytes.split_at(64);
    let key_pair = sr25519::key_pair_from_secret(secret)?;
    if key_pair.public_key().as_bytes() != public {
        return Err(Error::InvalidKey {
            curve: CurveId::Sr25519,
            reason: "public half does not match the secret half".to_string(),
        });
    }
    Ok(key_pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Private key 1, compressed, mainnet
    const WIF_ONE: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";

    #[test]
    fn test_decode_wif() {
        let secret = decode_wif(WIF_ONE).unwrap().unwrap();
        let mut expected = vec![0u8; 32];
        expected[31] = 1;
        assert_eq!(secret.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_wif_checksum_error_is_reported() {
        let mut corrupted = WIF_ONE.to_string();
        corrupted.pop();
        corrupted.push('o');
        assert!(matches!(
            decode_wif(&corrupted),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_non_wif_strings_are_skipped() {
        assert!(decode_wif("abandon").unwrap().is_none());
        assert!(decode_wif("5").unwrap().is_none());
    }

    #[test]
    fn test_ed25519_keypair_forms() {
        let key_pair = ed25519::key_pair_from_seed(&[4u8; 32]).unwrap();
        let mut bytes = vec![4u8; 32];
        bytes.extend_from_slice(key_pair.public_key().as_bytes());

        let as_hex = hex::encode(&bytes);
        let as_base58 = bs58::encode(&bytes).into_string();
        let as_json = serde_json::to_string(&bytes).unwrap();

        for form in [as_hex, as_base58, as_json] {
            let decoded = decode_ed25519_keypair(&form).unwrap();
            assert_eq!(decoded.as_slice(), bytes.as_slice());
            assert_eq!(ed25519_key_pair(&decoded).unwrap().public_key(), key_pair.public_key());
        }
    }

    #[test]
    fn test_sr25519_keypair_consistency() {
        let key_pair = sr25519::key_pair_from_mini_secret(&[6u8; 32]).unwrap();
        let mut bytes = key_pair.private_key().as_bytes().to_vec();
        bytes.extend_from_slice(key_pair.public_key().as_bytes());

        let decoded = decode_sr25519_keypair(&hex::encode(&bytes)).unwrap();
        assert_eq!(sr25519_key_pair(&decoded).unwrap().public_key(), key_pair.public_key());

        bytes[95] ^= 1;
        assert!(matches!(
            sr25519_key_pair(&bytes),
            Err(Error::InvalidKey { .. })
        ));
    }
}
