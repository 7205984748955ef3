//! ed25519 keys, RFC 8032 signing and SLIP-0010 derivation

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use super::types::{check_len, CurveId, KeyPair, PrivateKey, PublicKey, Signature};
use crate::crypto::derivation::{hmac_sha512, ExtendedKey, HARDENED_OFFSET};
use crate::error::{Error, Result};

const CURVE: CurveId = CurveId::Ed25519;

/// SLIP-0010 master key HMAC key
const MASTER_SECRET: &[u8] = b"ed25519 seed";

fn signing_key(secret: &[u8]) -> Result<SigningKey> {
    check_len(CURVE, CURVE.private_key_len(), secret.len())?;
    let mut bytes = Zeroizing::new([0u8; 32]);
    bytes.copy_from_slice(secret);
    Ok(SigningKey::from_bytes(&bytes))
}

/// Build a key pair from a 32-byte RFC 8032 seed
pub fn key_pair_from_seed(secret: &[u8]) -> Result<KeyPair> {
    let signing_key = signing_key(secret)?;
    let verifying_key = signing_key.verifying_key();

    KeyPair::new(
        PrivateKey::new(signing_key.to_bytes().to_vec(), CURVE),
        PublicKey::new(verifying_key.to_bytes().to_vec(), CURVE),
    )
}

/// Build a key pair from the 64-byte `seed || public` layout used by Solana
/// and tweetnacl exports, rejecting it unless the halves belong together
pub fn key_pair_from_keypair_bytes(bytes: &[u8]) -> Result<KeyPair> {
    check_len(CURVE, 64, bytes.len())?;
    let key_pair = key_pair_from_seed(&bytes[..32])?;

    if key_pair.public_key().as_bytes() != &bytes[32..] {
        return Err(Error::InvalidKey {
            curve: CURVE,
            reason: "public half does not match the secret half".to_string(),
        });
    }

    Ok(key_pair)
}

pub fn sign(secret: &[u8], message: &[u8]) -> Result<Signature> {
    let signing_key = signing_key(secret)?;
    let signature = signing_key.sign(message);
    Ok(Signature::new(signature.to_bytes().to_vec(), CURVE))
}

pub fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public) = <[u8; 32]>::try_from(public) else {
        return false;
    };
    let Ok(signature) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public) else {
        return false;
    };

    let signature = ed25519_dalek::Signature::from_bytes(&signature);
    verifying_key.verify(message, &signature).is_ok()
}

/// Derive the SLIP-0010 master key from a seed
pub(crate) fn master_key(seed: &[u8]) -> Result<ExtendedKey> {
    hmac_sha512(MASTER_SECRET, &[seed])
}

/// Derive a hardened SLIP-0010 child; ed25519 has no public derivation
pub(crate) fn derive_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    if index < HARDENED_OFFSET {
        return Err(Error::NonHardenedUnsupported { curve: CURVE, index });
    }

    hmac_sha512(
        parent.chain_code(),
        &[&[0u8], parent.secret(), &index.to_be_bytes()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032, section 7.1, TEST 1
    const RFC_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC_SIGNATURE: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    #[test]
    fn test_rfc8032_vector() {
        let secret = hex::decode(RFC_SECRET).unwrap();
        let key_pair = key_pair_from_seed(&secret).unwrap();
        assert_eq!(key_pair.public_key().to_hex(), RFC_PUBLIC);

        let signature = sign(&secret, b"").unwrap();
        assert_eq!(hex::encode(signature.as_bytes()), RFC_SIGNATURE);
        assert!(verify(&hex::decode(RFC_PUBLIC).unwrap(), b"", signature.as_bytes()));
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        assert!(!verify(&[0u8; 31], b"", &[0u8; 64]));
        assert!(!verify(&hex::decode(RFC_PUBLIC).unwrap(), b"", &[0u8; 10]));
    }

    #[test]
    fn test_keypair_bytes_must_be_consistent() {
        let mut bytes = hex::decode(RFC_SECRET).unwrap();
        bytes.extend(hex::decode(RFC_PUBLIC).unwrap());
        assert!(key_pair_from_keypair_bytes(&bytes).is_ok());

        bytes[40] ^= 0xff;
        assert!(matches!(
            key_pair_from_keypair_bytes(&bytes),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_slip10_vector_1() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();

        let master = master_key(&seed).unwrap();
        assert_eq!(
            hex::encode(master.secret()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );

        let child = derive_child(&master, HARDENED_OFFSET).unwrap();
        assert_eq!(
            hex::encode(child.secret()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_non_hardened_child_is_refused() {
        let master = master_key(&[1u8; 32]).unwrap();
        assert_eq!(
            derive_child(&master, 5).unwrap_err(),
            Error::NonHardenedUnsupported {
                curve: CurveId::Ed25519,
                index: 5
            }
        );
    }
}
