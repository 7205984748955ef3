//! Address codec registry
//!
//! Every supported address format is a variant of [`AddressFormat`], carrying
//! its network parameters (version byte, HRP, SS58 prefix). Encoding and
//! decoding dispatch on that closed set; nothing here touches the network.
//!
//! `decode` returns the format's *payload*: the public key itself for formats
//! that carry it (SS58, Solana, NEAR), otherwise the hash or tweaked key the
//! address commits to. For every valid key `P` and format `F`,
//! `decode(&encode(P, F)?, F)? == payload(P, F)?`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::{secp256k1, CurveId, PublicKey};
use crate::error::{Error, Result};

pub mod bitcoin;
pub(crate) mod checksum;
pub mod cosmos;
pub mod ed25519_accounts;
pub mod evm;
pub mod substrate;
pub mod tezos;

/// Address format tag, without network parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Bitcoin legacy pay-to-pubkey-hash
    P2pkh,
    /// Bitcoin pay-to-script-hash wrapping P2WPKH
    P2sh,
    /// Bitcoin native segwit v0
    P2wpkh,
    /// Bitcoin taproot, segwit v1
    P2tr,
    /// Substrate SS58
    Ss58,
    /// Ethereum and EVM chains
    Evm,
    Tron,
    Cosmos,
    /// Plain Base58 public key (Solana)
    Base58,
    /// Tezos tz1
    Tezos,
    Near,
    Aptos,
    Sui,
}

impl AddressKind {
    pub const ALL: [AddressKind; 13] = [
        AddressKind::P2pkh,
        AddressKind::P2sh,
        AddressKind::P2wpkh,
        AddressKind::P2tr,
        AddressKind::Ss58,
        AddressKind::Evm,
        AddressKind::Tron,
        AddressKind::Cosmos,
        AddressKind::Base58,
        AddressKind::Tezos,
        AddressKind::Near,
        AddressKind::Aptos,
        AddressKind::Sui,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P2pkh => "p2pkh",
            Self::P2sh => "p2sh",
            Self::P2wpkh => "p2wpkh",
            Self::P2tr => "p2tr",
            Self::Ss58 => "ss58",
            Self::Evm => "evm",
            Self::Tron => "tron",
            Self::Cosmos => "cosmos",
            Self::Base58 => "base58",
            Self::Tezos => "tezos",
            Self::Near => "near",
            Self::Aptos => "aptos",
            Self::Sui => "sui",
        }
    }

    /// The curve whose keys this format is normally rendered from
    pub fn curve(self) -> CurveId {
        match self {
            Self::P2pkh
            | Self::P2sh
            | Self::P2wpkh
            | Self::P2tr
            | Self::Evm
            | Self::Tron
            | Self::Cosmos => CurveId::Secp256k1,
            Self::Base58 | Self::Tezos | Self::Near | Self::Aptos | Self::Sui => CurveId::Ed25519,
            Self::Ss58 => CurveId::Sr25519,
        }
    }

    /// Whether keys of `curve` may be rendered in this format
    ///
    /// SS58 carries any 32-byte Substrate account key, ed25519 included.
    pub fn accepts(self, curve: CurveId) -> bool {
        match self {
            Self::Ss58 => matches!(curve, CurveId::Sr25519 | CurveId::Ed25519),
            other => other.curve() == curve,
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        let alias = match lower.as_str() {
            "legacy" => "p2pkh",
            "segwit" | "bech32" => "p2wpkh",
            "taproot" | "bech32m" => "p2tr",
            "p2sh-p2wpkh" | "nested-segwit" => "p2sh",
            "ethereum" | "eip55" => "evm",
            "solana" => "base58",
            "tz1" => "tezos",
            other => other,
        };

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == alias)
            .ok_or_else(|| Error::UnknownAddressFormat(s.to_string()))
    }
}

/// An address format together with its network parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AddressFormat {
    P2pkh { version: u8 },
    P2sh { version: u8 },
    P2wpkh { hrp: String },
    P2tr { hrp: String },
    Ss58 { prefix: u16 },
    Evm,
    Tron,
    Cosmos { hrp: String },
    Base58,
    Tezos,
    Near,
    Aptos,
    Sui,
}

impl AddressFormat {
    pub fn kind(&self) -> AddressKind {
        match self {
            Self::P2pkh { .. } => AddressKind::P2pkh,
            Self::P2sh { .. } => AddressKind::P2sh,
            Self::P2wpkh { .. } => AddressKind::P2wpkh,
            Self::P2tr { .. } => AddressKind::P2tr,
            Self::Ss58 { .. } => AddressKind::Ss58,
            Self::Evm => AddressKind::Evm,
            Self::Tron => AddressKind::Tron,
            Self::Cosmos { .. } => AddressKind::Cosmos,
            Self::Base58 => AddressKind::Base58,
            Self::Tezos => AddressKind::Tezos,
            Self::Near => AddressKind::Near,
            Self::Aptos => AddressKind::Aptos,
            Self::Sui => AddressKind::Sui,
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P2pkh { version } | Self::P2sh { version } => {
                write!(f, "{} (version 0x{:02x})", self.kind(), version)
            }
            Self::P2wpkh { hrp } | Self::P2tr { hrp } | Self::Cosmos { hrp } => {
                write!(f, "{} ({})", self.kind(), hrp)
            }
            Self::Ss58 { prefix } => write!(f, "ss58 (prefix {})", prefix),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Render a public key as an address
///
/// secp256k1 formats take a compressed or uncompressed SEC1 key, except P2TR
/// which takes the 32-byte x-only internal key. The remaining formats take a
/// 32-byte key.
pub fn encode(public_key: &[u8], format: &AddressFormat) -> Result<String> {
    match format {
        AddressFormat::P2pkh { version } => bitcoin::p2pkh_encode(public_key, *version),
        AddressFormat::P2sh { version } => bitcoin::p2sh_encode(public_key, *version),
        AddressFormat::P2wpkh { hrp } => bitcoin::p2wpkh_encode(public_key, hrp),
        AddressFormat::P2tr { hrp } => bitcoin::p2tr_encode(public_key, hrp),
        AddressFormat::Ss58 { prefix } => substrate::encode(public_key, *prefix),
        AddressFormat::Evm => evm::encode(public_key),
        AddressFormat::Tron => evm::tron_encode(public_key),
        AddressFormat::Cosmos { hrp } => cosmos::encode(public_key, hrp),
        AddressFormat::Base58 => ed25519_accounts::solana_encode(public_key),
        AddressFormat::Tezos => tezos::encode(public_key),
        AddressFormat::Near => ed25519_accounts::near_encode(public_key),
        AddressFormat::Aptos => ed25519_accounts::aptos_encode(public_key),
        AddressFormat::Sui => ed25519_accounts::sui_encode(public_key),
    }
}

/// Parse an address, verifying its checksum and network parameters
pub fn decode(address: &str, format: &AddressFormat) -> Result<Vec<u8>> {
    let address = address.trim();
    match format {
        AddressFormat::P2pkh { version } => bitcoin::p2pkh_decode(address, *version),
        AddressFormat::P2sh { version } => bitcoin::p2sh_decode(address, *version),
        AddressFormat::P2wpkh { hrp } => bitcoin::p2wpkh_decode(address, hrp),
        AddressFormat::P2tr { hrp } => bitcoin::p2tr_decode(address, hrp),
        AddressFormat::Ss58 { prefix } => substrate::decode(address, *prefix),
        AddressFormat::Evm => evm::decode(address),
        AddressFormat::Tron => evm::tron_decode(address),
        AddressFormat::Cosmos { hrp } => cosmos::decode(address, hrp),
        AddressFormat::Base58 => ed25519_accounts::solana_decode(address),
        AddressFormat::Tezos => tezos::decode(address),
        AddressFormat::Near => ed25519_accounts::near_decode(address),
        AddressFormat::Aptos => ed25519_accounts::aptos_decode(address),
        AddressFormat::Sui => ed25519_accounts::sui_decode(address),
    }
}

/// The bytes `decode` yields for the address of `public_key`
pub fn payload(public_key: &[u8], format: &AddressFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        AddressFormat::P2pkh { .. } => bitcoin::p2pkh_payload(public_key)?.to_vec(),
        AddressFormat::P2sh { .. } => bitcoin::p2sh_payload(public_key)?.to_vec(),
        AddressFormat::P2wpkh { .. } => bitcoin::p2wpkh_payload(public_key)?.to_vec(),
        AddressFormat::P2tr { .. } => bitcoin::p2tr_payload(public_key)?.to_vec(),
        AddressFormat::Evm | AddressFormat::Tron => evm::payload(public_key)?.to_vec(),
        AddressFormat::Cosmos { .. } => cosmos::payload(public_key)?.to_vec(),
        AddressFormat::Tezos => tezos::payload(public_key)?.to_vec(),
        AddressFormat::Aptos => ed25519_accounts::aptos_payload(public_key)?.to_vec(),
        AddressFormat::Sui => ed25519_accounts::sui_payload(public_key)?.to_vec(),
        // Key-carrying formats: validate through the encoder, return the key
        AddressFormat::Ss58 { .. } | AddressFormat::Base58 | AddressFormat::Near => {
            encode(public_key, format)?;
            public_key.to_vec()
        }
    };
    Ok(bytes)
}

/// The key bytes `encode` expects for a curve-tagged key in this format
fn key_bytes(public_key: &PublicKey, format: &AddressFormat) -> Result<Vec<u8>> {
    let kind = format.kind();
    if !kind.accepts(public_key.curve()) {
        return Err(Error::CurveMismatch {
            expected: kind.curve(),
            found: public_key.curve(),
        });
    }

    match format {
        AddressFormat::P2tr { .. } => Ok(secp256k1::x_only(public_key.as_bytes())?.to_vec()),
        _ => Ok(public_key.as_bytes().to_vec()),
    }
}

/// Render a curve-tagged key, refusing keys from a curve the format does not use
pub fn encode_key(public_key: &PublicKey, format: &AddressFormat) -> Result<String> {
    encode(&key_bytes(public_key, format)?, format)
}

/// Payload of a curve-tagged key, as `decode` of its address would return it
pub fn payload_key(public_key: &PublicKey, format: &AddressFormat) -> Result<Vec<u8>> {
    payload(&key_bytes(public_key, format)?, format)
}

/// Whether `address` is a well-formed address of `format`
pub fn validate(address: &str, format: &AddressFormat) -> bool {
    decode(address, format).is_ok()
}
