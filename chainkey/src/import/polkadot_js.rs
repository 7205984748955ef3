//! Polkadot-JS keystore JSON (`encoding.version` 2 and 3)
//!
//! `encoded` is base64 of `salt(32) || N || p || r || nonce(24) || box` for
//! scrypt-protected v3 files (parameters as little-endian u32), or
//! `nonce(24) || box` for v2 files whose key is the zero-padded password.
//! The decrypted box is a PKCS8 envelope around the secret and public key.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use xsalsa20poly1305::aead::generic_array::GenericArray;
use xsalsa20poly1305::aead::{Aead, KeyInit};
use xsalsa20poly1305::XSalsa20Poly1305;
use zeroize::Zeroizing;

use crate::address::AddressKind;
use crate::crypto::keys::{ed25519, secp256k1, sr25519, CurveId, KeyPair};
use crate::error::{Error, Result};

pub(crate) const PKCS8_HEADER: [u8; 16] = [48, 83, 2, 1, 1, 48, 5, 6, 3, 43, 101, 112, 4, 34, 4, 32];
pub(crate) const PKCS8_DIVIDER: [u8; 5] = [161, 35, 3, 33, 0];

/// The only scrypt parameters Polkadot-JS writes; keystores with others are refused
pub(crate) const SCRYPT_N: u32 = 1 << 15;
pub(crate) const SCRYPT_P: u32 = 1;
pub(crate) const SCRYPT_R: u32 = 8;

const SALT_LEN: usize = 32;
const SCRYPT_HEADER_LEN: usize = SALT_LEN + 12;
const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;
const PUBLIC_LEN: usize = 32;
const SECRET_LEN: usize = 64;
const SEED_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub(crate) struct Keystore {
    encoded: String,
    encoding: Encoding,
}

#[derive(Debug, Deserialize)]
struct Encoding {
    content: Vec<String>,
    #[serde(rename = "type")]
    kinds: Vec<String>,
}

fn keystore_error(reason: impl Into<String>) -> Error {
    Error::Keystore(reason.into())
}

/// Curve named in `encoding.content[1]`
fn content_curve(name: &str) -> Option<CurveId> {
    match name {
        "ethereum" => Some(CurveId::Secp256k1),
        other => other.parse().ok(),
    }
}

impl Keystore {
    /// Parse the JSON shape, returning `None` when it is not a Polkadot-JS export
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let keystore: Self = serde_json::from_str(s).ok()?;
        keystore.curve()?;
        Some(keystore)
    }

    pub(crate) fn curve(&self) -> Option<CurveId> {
        self.encoding.content.get(1).and_then(|name| content_curve(name))
    }

    pub(crate) fn address_kind(&self) -> AddressKind {
        match self.encoding.content.get(1).map(String::as_str) {
            Some("ethereum") => AddressKind::Evm,
            _ => AddressKind::Ss58,
        }
    }

    fn is_encrypted(&self) -> bool {
        !self.encoding.kinds.iter().any(|kind| kind == "none")
    }

    fn uses_scrypt(&self) -> bool {
        self.encoding.kinds.iter().any(|kind| kind == "scrypt")
    }

    /// Decrypt (if needed) and unwrap the key pair
    pub(crate) fn key_pair(&self, passphrase: Option<&str>) -> Result<KeyPair> {
        let curve = self
            .curve()
            .ok_or_else(|| keystore_error("unknown key type in encoding.content"))?;

        let encoded = Zeroizing::new(
            STANDARD
                .decode(self.encoded.trim())
                .map_err(|e| keystore_error(format!("encoded is not base64: {}", e)))?,
        );

        let plaintext = if self.is_encrypted() {
            let passphrase =
                passphrase.ok_or_else(|| keystore_error("password required for encrypted keystore"))?;
            self.decrypt(&encoded, passphrase)?
        } else {
            encoded
        };

        decode_pkcs8(&plaintext, curve)
    }

    fn decrypt(&self, encoded: &[u8], passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);

        let sealed = if self.uses_scrypt() {
            if encoded.len() < SCRYPT_HEADER_LEN {
                return Err(keystore_error("encoded data too short"));
            }
            let (salt, rest) = encoded.split_at(SALT_LEN);
            let n = read_u32(&rest[0..4]);
            let p = read_u32(&rest[4..8]);
            let r = read_u32(&rest[8..12]);

            if (n, p, r) != (SCRYPT_N, SCRYPT_P, SCRYPT_R) {
                return Err(keystore_error(format!(
                    "unsupported scrypt parameters N={} p={} r={}",
                    n, p, r
                )));
            }
            let log_n = n.trailing_zeros() as u8;
            let params = scrypt::Params::new(log_n, r, p, KEY_LEN)
                .map_err(|e| keystore_error(format!("invalid scrypt params: {}", e)))?;
            scrypt::scrypt(passphrase.as_bytes(), salt, &params, key.as_mut_slice())
                .map_err(|e| keystore_error(e.to_string()))?;

            &rest[12..]
        } else {
            // v2: the password itself, zero padded
            let password = passphrase.as_bytes();
            let len = password.len().min(KEY_LEN);
            key[..len].copy_from_slice(&password[..len]);
            encoded
        };

        if sealed.len() < NONCE_LEN {
            return Err(keystore_error("encoded data too short"));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key.as_slice()));
        cipher
            .decrypt(GenericArray::from_slice(nonce), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| keystore_error("unable to decrypt: wrong password or corrupted data"))
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// Split the PKCS8 envelope: the secret is 64 bytes, or 32 for seed-only exports
fn split_pkcs8(plaintext: &[u8]) -> Result<(&[u8], &[u8])> {
    let body = plaintext
        .strip_prefix(&PKCS8_HEADER[..])
        .ok_or_else(|| keystore_error("invalid PKCS8 header"))?;

    for secret_len in [SECRET_LEN, SEED_LEN] {
        if body.len() < secret_len + PKCS8_DIVIDER.len() + PUBLIC_LEN {
            continue;
        }
        let (secret, rest) = body.split_at(secret_len);
        if let Some(public) = rest.strip_prefix(&PKCS8_DIVIDER[..]) {
            return Ok((secret, &public[..PUBLIC_LEN]));
        }
    }

    Err(keystore_error("PKCS8 divider not found"))
}

fn decode_pkcs8(plaintext: &[u8], curve: CurveId) -> Result<KeyPair> {
    let (secret, public) = split_pkcs8(plaintext)?;

    let key_pair = match (curve, secret.len()) {
        (CurveId::Sr25519, SECRET_LEN) => sr25519::key_pair_from_ed25519_bytes(secret)?,
        (CurveId::Sr25519, _) => sr25519::key_pair_from_mini_secret(secret)?,
        // tweetnacl layout: seed || public
        (CurveId::Ed25519, _) => ed25519::key_pair_from_seed(&secret[..SEED_LEN])?,
        (CurveId::Secp256k1, _) => {
            // The envelope only has room for 32 public bytes, so there is nothing to compare
            return secp256k1::key_pair_from_secret(&secret[..SEED_LEN]);
        }
    };

    if key_pair.public_key().as_bytes() != public {
        return Err(keystore_error("public key does not match the decrypted secret"));
    }
    Ok(key_pair)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use schnorrkel::{ExpansionMode, MiniSecretKey};

    const NONCE: [u8; 24] = [7u8; 24];
    const SALT: [u8; 32] = [9u8; 32];

    /// PKCS8 plaintext for an sr25519 mini-secret, as Polkadot-JS writes it
    pub(crate) fn sr25519_pkcs8(mini_secret: &[u8; 32]) -> (Vec<u8>, Vec<u8>) {
        let secret = MiniSecretKey::from_bytes(mini_secret)
            .unwrap()
            .expand(ExpansionMode::Ed25519);
        let public = secret.to_public().to_bytes().to_vec();

        let mut plaintext = PKCS8_HEADER.to_vec();
        plaintext.extend_from_slice(&secret.to_ed25519_bytes());
        plaintext.extend_from_slice(&PKCS8_DIVIDER);
        plaintext.extend_from_slice(&public);
        (plaintext, public)
    }

    /// Seal a plaintext the way a v3 keystore does
    pub(crate) fn seal_v3(plaintext: &[u8], password: &str) -> String {
        seal_v3_with(plaintext, password, SCRYPT_N, SCRYPT_P, SCRYPT_R)
    }

    /// Build the v3 `encoded` field; the key is only stretched for the real parameters
    pub(crate) fn seal_v3_with(plaintext: &[u8], password: &str, n: u32, p: u32, r: u32) -> String {
        let mut key = [0u8; KEY_LEN];
        if (n, p, r) == (SCRYPT_N, SCRYPT_P, SCRYPT_R) {
            let params = scrypt::Params::new(n.trailing_zeros() as u8, r, p, KEY_LEN).unwrap();
            scrypt::scrypt(password.as_bytes(), &SALT, &params, &mut key).unwrap();
        }

        let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(&key));
        let sealed = cipher
            .encrypt(GenericArray::from_slice(&NONCE), plaintext)
            .unwrap();

        let mut encoded = SALT.to_vec();
        encoded.extend_from_slice(&n.to_le_bytes());
        encoded.extend_from_slice(&p.to_le_bytes());
        encoded.extend_from_slice(&r.to_le_bytes());
        encoded.extend_from_slice(&NONCE);
        encoded.extend_from_slice(&sealed);
        STANDARD.encode(encoded)
    }

    pub(crate) fn keystore_json(encoded: &str, kinds: &[&str], curve: &str) -> String {
        serde_json::json!({
            "address": "",
            "encoded": encoded,
            "encoding": {
                "content": ["pkcs8", curve],
                "type": kinds,
                "version": "3"
            },
            "meta": { "name": "test" }
        })
        .to_string()
    }

    #[test]
    fn test_decrypt_v3_sr25519() {
        let (plaintext, public) = sr25519_pkcs8(&[1u8; 32]);
        let json = keystore_json(&seal_v3(&plaintext, "correct horse"), &["scrypt", "xsalsa20-poly1305"], "sr25519");

        let keystore = Keystore::parse(&json).unwrap();
        assert_eq!(keystore.curve(), Some(CurveId::Sr25519));

        let key_pair = keystore.key_pair(Some("correct horse")).unwrap();
        assert_eq!(key_pair.public_key().as_bytes(), public.as_slice());

        // Same key as deriving from the mini-secret directly
        let direct = sr25519::key_pair_from_mini_secret(&[1u8; 32]).unwrap();
        assert_eq!(direct.public_key(), key_pair.public_key());
    }

    #[test]
    fn test_wrong_password() {
        let (plaintext, _) = sr25519_pkcs8(&[2u8; 32]);
        let json = keystore_json(&seal_v3(&plaintext, "right"), &["scrypt", "xsalsa20-poly1305"], "sr25519");
        let keystore = Keystore::parse(&json).unwrap();

        assert!(matches!(keystore.key_pair(Some("wrong")), Err(Error::Keystore(_))));
        assert!(matches!(keystore.key_pair(None), Err(Error::Keystore(_))));
    }

    #[test]
    fn test_foreign_scrypt_parameters_are_refused() {
        let (plaintext, _) = sr25519_pkcs8(&[6u8; 32]);
        for (n, p, r) in [(1u32 << 31, 1u32, 1u32 << 20), (1 << 10, 1, 8), (SCRYPT_N, 4, 8), (3, 1, 8)] {
            let encoded = seal_v3_with(&plaintext, "pw", n, p, r);
            let json = keystore_json(&encoded, &["scrypt", "xsalsa20-poly1305"], "sr25519");
            match Keystore::parse(&json).unwrap().key_pair(Some("pw")) {
                Err(Error::Keystore(reason)) => assert!(reason.contains("scrypt"), "{}", reason),
                other => panic!("N={} p={} r={}: {:?}", n, p, r, other),
            }
        }
    }

    #[test]
    fn test_unencrypted_ed25519() {
        let key_pair = ed25519::key_pair_from_seed(&[3u8; 32]).unwrap();
        let mut plaintext = PKCS8_HEADER.to_vec();
        plaintext.extend_from_slice(&[3u8; 32]);
        plaintext.extend_from_slice(key_pair.public_key().as_bytes());
        plaintext.extend_from_slice(&PKCS8_DIVIDER);
        plaintext.extend_from_slice(key_pair.public_key().as_bytes());

        let json = keystore_json(&STANDARD.encode(&plaintext), &["none"], "ed25519");
        let imported = Keystore::parse(&json).unwrap().key_pair(None).unwrap();
        assert_eq!(imported.public_key(), key_pair.public_key());
    }

    #[test]
    fn test_tampered_public_key_is_rejected() {
        let (mut plaintext, _) = sr25519_pkcs8(&[4u8; 32]);
        let last = plaintext.len() - 1;
        plaintext[last] ^= 0xff;

        let json = keystore_json(&STANDARD.encode(&plaintext), &["none"], "sr25519");
        assert!(matches!(
            Keystore::parse(&json).unwrap().key_pair(None),
            Err(Error::Keystore(_))
        ));
    }

    #[test]
    fn test_non_keystore_json() {
        assert!(Keystore::parse(r#"{"privateKey":"00","asset":"bitcoin"}"#).is_none());
        assert!(Keystore::parse(&keystore_json("AA==", &["none"], "bls")).is_none());
    }
}
