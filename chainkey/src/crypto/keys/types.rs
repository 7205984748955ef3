//! Curve-tagged key material shared by every curve implementation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported elliptic curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveId {
    /// Bitcoin, EVM chains, Tron, Cosmos
    Secp256k1,
    /// Solana, Tezos, NEAR, Aptos, Sui
    Ed25519,
    /// Polkadot, Kusama
    Sr25519,
}

impl CurveId {
    /// All curves, in a stable order
    pub const ALL: [CurveId; 3] = [CurveId::Secp256k1, CurveId::Ed25519, CurveId::Sr25519];

    /// Length of the secret accepted by `generate_key_pair`
    pub const SECRET_LEN: usize = 32;

    /// Length of a private key held in a `KeyPair` of this curve
    pub fn private_key_len(self) -> usize {
        match self {
            Self::Secp256k1 => 32,
            Self::Ed25519 => 32,
            // schnorrkel key scalar followed by the signing nonce
            Self::Sr25519 => 64,
        }
    }

    /// Length of a public key of this curve
    pub fn public_key_len(self) -> usize {
        match self {
            // SEC1 compressed
            Self::Secp256k1 => 33,
            Self::Ed25519 | Self::Sr25519 => 32,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
            Self::Sr25519 => "sr25519",
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" | "ecdsa" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            "sr25519" => Ok(Self::Sr25519),
            other => Err(Error::UnsupportedCurve(other.to_string())),
        }
    }
}

/// A private key bound to the curve it was produced for
///
/// The bytes are wiped when the value is dropped. The type is deliberately not
/// `Clone`: key material has exactly one owner.
pub struct PrivateKey {
    bytes: Zeroizing<Vec<u8>>,
    curve: CurveId,
}

impl PrivateKey {
    /// Create a new private key from bytes
    pub fn new(bytes: Vec<u8>, curve: CurveId) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            curve,
        }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the curve
    pub fn curve(&self) -> CurveId {
        self.curve
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// A public key bound to its curve
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
    curve: CurveId,
}

impl PublicKey {
    /// Create a new public key from bytes
    pub fn new(bytes: Vec<u8>, curve: CurveId) -> Self {
        Self { bytes, curve }
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the curve
    pub fn curve(&self) -> CurveId {
        self.curve
    }

    /// Lowercase hex of the key bytes
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

/// A signature together with the curve that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
    curve: CurveId,
}

impl Signature {
    pub fn new(bytes: Vec<u8>, curve: CurveId) -> Self {
        Self { bytes, curve }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn curve(&self) -> CurveId {
        self.curve
    }
}

/// A key pair for a single curve
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a new key pair, checking both halves belong to the same curve
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Result<Self> {
        if private_key.curve() != public_key.curve() {
            return Err(Error::CurveMismatch {
                expected: private_key.curve(),
                found: public_key.curve(),
            });
        }

        let curve = private_key.curve();
        check_len(curve, curve.private_key_len(), private_key.as_bytes().len())?;
        check_len(curve, curve.public_key_len(), public_key.as_bytes().len())?;

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the curve
    pub fn curve(&self) -> CurveId {
        self.private_key.curve()
    }

    /// Sign a message with the private half of this pair
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        super::engine::sign(&self.private_key, self.curve(), message)
    }

    /// Verify a signature against the public half of this pair
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        super::engine::verify(&self.public_key, self.curve(), message, signature)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("curve", &self.curve())
            .field("public_key", &self.public_key.to_hex())
            .finish_non_exhaustive()
    }
}

pub(crate) fn check_len(curve: CurveId, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::InvalidKeyLength {
            curve,
            expected,
            actual,
        });
    }
    Ok(())
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}
