//! Exodus-style single-asset exports: `{ "privateKey": ..., "asset": ... }`

use serde::Deserialize;
use zeroize::Zeroize;

use super::raw;
use crate::address::AddressKind;
use crate::crypto::keys::{generate_key_pair, CurveId, KeyPair};
use crate::error::{Error, Result};

/// Asset names as Exodus writes them, with the curve and address format each uses
const ASSETS: &[(&str, CurveId, AddressKind)] = &[
    ("bitcoin", CurveId::Secp256k1, AddressKind::P2wpkh),
    ("litecoin", CurveId::Secp256k1, AddressKind::P2wpkh),
    ("dogecoin", CurveId::Secp256k1, AddressKind::P2pkh),
    ("ethereum", CurveId::Secp256k1, AddressKind::Evm),
    ("ethereumclassic", CurveId::Secp256k1, AddressKind::Evm),
    ("bsc", CurveId::Secp256k1, AddressKind::Evm),
    ("matic", CurveId::Secp256k1, AddressKind::Evm),
    ("avalanchec", CurveId::Secp256k1, AddressKind::Evm),
    ("fantom", CurveId::Secp256k1, AddressKind::Evm),
    ("tronmainnet", CurveId::Secp256k1, AddressKind::Tron),
    ("cosmos", CurveId::Secp256k1, AddressKind::Cosmos),
    ("solana", CurveId::Ed25519, AddressKind::Base58),
    ("tezos", CurveId::Ed25519, AddressKind::Tezos),
    ("near", CurveId::Ed25519, AddressKind::Near),
    ("aptos", CurveId::Ed25519, AddressKind::Aptos),
    ("sui", CurveId::Ed25519, AddressKind::Sui),
    ("polkadot", CurveId::Sr25519, AddressKind::Ss58),
    ("kusama", CurveId::Sr25519, AddressKind::Ss58),
];

#[derive(Deserialize)]
pub(crate) struct ExodusExport {
    #[serde(rename = "privateKey")]
    private_key: String,
    #[serde(alias = "assetName", alias = "coin")]
    asset: String,
}

impl Drop for ExodusExport {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

fn lookup(asset: &str) -> Option<(CurveId, AddressKind)> {
    let asset = asset.to_ascii_lowercase().replace(&[' ', '_', '-'][..], "");
    ASSETS
        .iter()
        .find(|(name, _, _)| *name == asset)
        .map(|(_, curve, kind)| (*curve, *kind))
}

impl ExodusExport {
    /// Parse the JSON shape, returning `None` unless the asset is known
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let export: Self = serde_json::from_str(s).ok()?;
        lookup(&export.asset)?;
        Some(export)
    }

    pub(crate) fn curve(&self) -> Option<CurveId> {
        lookup(&self.asset).map(|(curve, _)| curve)
    }

    pub(crate) fn address_kind(&self) -> Option<AddressKind> {
        lookup(&self.asset).map(|(_, kind)| kind)
    }

    /// The key pair in `privateKey`: hex, WIF for secp256k1 assets, or a
    /// 64-byte key pair for ed25519 assets
    pub(crate) fn key_pair(&self) -> Result<KeyPair> {
        let curve = self
            .curve()
            .ok_or_else(|| Error::Keystore(format!("unknown asset {}", self.asset)))?;
        let private_key = self.private_key.trim();

        if curve == CurveId::Secp256k1 {
            if let Some(secret) = raw::decode_wif(private_key)? {
                return raw::wif_key_pair(&secret);
            }
        }

        let bytes = raw::decode_hex(private_key)
            .or_else(|| raw::decode_ed25519_keypair(private_key))
            .ok_or_else(|| Error::Keystore("privateKey is neither hex nor base58".to_string()))?;

        match (curve, bytes.len()) {
            (CurveId::Ed25519, 64) => raw::ed25519_key_pair(&bytes),
            _ => generate_key_pair(&bytes, curve),
        }
    }
}
