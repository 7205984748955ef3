//! Accounts produced by the chain router
//!
//! A [`DerivedAccount`] binds an address to the key pair it was derived from,
//! so the signer handed to RPC collaborators is always the one behind the
//! address they were given.

use serde::Serialize;

use crate::address::AddressFormat;
use crate::crypto::keys::{CurveId, KeyPair, PublicKey, Signature};
use crate::crypto::DerivationPath;
use crate::error::Result;

/// An address together with the key pair that controls it
#[derive(Debug)]
pub struct DerivedAccount {
    pub ticker: String,
    pub network: String,
    pub address: String,
    pub format: AddressFormat,
    /// `None` when the key was imported directly rather than derived
    pub path: Option<DerivationPath>,
    key_pair: KeyPair,
}

impl DerivedAccount {
    pub(crate) fn new(
        ticker: impl Into<String>,
        network: impl Into<String>,
        address: String,
        format: AddressFormat,
        path: Option<DerivationPath>,
        key_pair: KeyPair,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            network: network.into(),
            address,
            format,
            path,
            key_pair,
        }
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub fn curve(&self) -> CurveId {
        self.key_pair.curve()
    }

    /// Sign a message with the account's key
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        self.key_pair.sign(message)
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.key_pair.verify(message, signature)
    }

    /// Public view of the account, safe to print or serialize
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            ticker: self.ticker.clone(),
            network: self.network.clone(),
            address: self.address.clone(),
            format: self.format.clone(),
            path: self.path.clone(),
            curve: self.curve(),
            public_key: self.public_key().clone(),
        }
    }

    /// Give up the address and keep only the key pair
    pub fn into_key_pair(self) -> KeyPair {
        self.key_pair
    }
}

/// Serializable account description without private key material
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub ticker: String,
    pub network: String,
    pub address: String,
    pub format: AddressFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<DerivationPath>,
    pub curve: CurveId,
    pub public_key: PublicKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::encode_key;
    use crate::crypto::keys::generate_key_pair;

    fn account() -> DerivedAccount {
        let key_pair = generate_key_pair(&[5u8; 32], CurveId::Ed25519).unwrap();
        let format = AddressFormat::Base58;
        let address = encode_key(key_pair.public_key(), &format).unwrap();
        DerivedAccount::new("SOL", "mainnet", address, format, None, key_pair)
    }

    #[test]
    fn test_account_signs_with_bound_key() {
        let account = account();
        let signature = account.sign(b"transfer").unwrap();
        assert!(account.verify(b"transfer", &signature));
        assert!(!account.verify(b"transfeR", &signature));
    }

    #[test]
    fn test_summary_has_no_private_key() {
        let account = account();
        let json = serde_json::to_value(account.summary()).unwrap();
        assert_eq!(json["address"], account.address.as_str());
        assert_eq!(json["curve"], "ed25519");
        assert!(json.get("path").is_none());

        let secret = hex::encode([5u8; 32]);
        assert!(!json.to_string().contains(&secret));
        assert!(!format!("{:?}", account).contains(&secret));
    }
}
