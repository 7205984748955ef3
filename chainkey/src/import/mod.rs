//! Wallet import: blob types and the format detector
//!
//! Every known export shape is a matcher; all matchers run against a blob and
//! the detector only answers when exactly one shape matched. A caller-supplied
//! [`FormatHint`] skips the vote and is checked against the blob instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::address::AddressKind;
use crate::crypto::keys::{CurveId, KeyPair};
use crate::error::{Error, Result};

mod detector;
pub mod exodus;
pub mod polkadot_js;
pub mod raw;

pub use detector::{detect, detect_with_hint, extract};

/// External key material submitted for import, consumed once
pub struct ImportBlob {
    content: Zeroizing<String>,
    passphrase: Option<Zeroizing<String>>,
}

impl ImportBlob {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Zeroizing::new(content.into()),
            passphrase: None,
        }
    }

    /// Attach the password of an encrypted export, or a BIP-39 passphrase
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    pub fn content(&self) -> &str {
        self.content.trim()
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref().map(String::as_str)
    }
}

impl fmt::Debug for ImportBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportBlob")
            .field("content", &format_args!("<{} bytes redacted>", self.content.len()))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Known import shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// BIP-39 phrase
    Mnemonic,
    /// Bitcoin wallet import format
    Wif,
    /// 32 bytes of hex
    RawHex,
    /// 64-byte `seed || public` ed25519 key pair
    Ed25519Keypair,
    /// 96-byte `secret || nonce || public` sr25519 key pair
    Sr25519Keypair,
    /// Polkadot-JS keystore JSON
    PolkadotJs,
    /// Exodus-style `{ privateKey, asset }` JSON
    Exodus,
}

impl ImportKind {
    pub const ALL: [ImportKind; 7] = [
        ImportKind::Mnemonic,
        ImportKind::Wif,
        ImportKind::RawHex,
        ImportKind::Ed25519Keypair,
        ImportKind::Sr25519Keypair,
        ImportKind::PolkadotJs,
        ImportKind::Exodus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mnemonic => "mnemonic",
            Self::Wif => "wif",
            Self::RawHex => "raw-hex",
            Self::Ed25519Keypair => "ed25519-keypair",
            Self::Sr25519Keypair => "sr25519-keypair",
            Self::PolkadotJs => "polkadot-js",
            Self::Exodus => "exodus",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or(Error::UnrecognizedFormat)
    }
}

/// How much of the blob the matcher checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Internal consistency was proven (checksum, key halves agree)
    Verified,
    /// Only the outer shape matched; contents are checked on extraction
    ShapeOnly,
}

/// An explicit statement of what a blob is, overriding detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatHint {
    pub kind: ImportKind,
    pub curve: Option<CurveId>,
}

impl FormatHint {
    pub fn new(kind: ImportKind) -> Self {
        Self { kind, curve: None }
    }

    pub fn with_curve(mut self, curve: CurveId) -> Self {
        self.curve = Some(curve);
        self
    }
}

/// Result of classifying a blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub kind: ImportKind,
    /// `None` for mnemonics, whose curve is chosen by the target chain
    pub curve: Option<CurveId>,
    /// Address format the exporting wallet used, when the shape tells
    pub format: Option<AddressKind>,
    pub confidence: Confidence,
}

impl Detection {
    pub(crate) fn new(
        kind: ImportKind,
        curve: Option<CurveId>,
        format: Option<AddressKind>,
        confidence: Confidence,
    ) -> Self {
        Self {
            kind,
            curve,
            format,
            confidence,
        }
    }

    /// `kind/curve` label used when listing ambiguous candidates
    pub fn label(&self) -> String {
        match self.curve {
            Some(curve) => format!("{}/{}", self.kind, curve),
            None => self.kind.to_string(),
        }
    }
}

/// Key material recovered from a blob
pub enum ImportedKey {
    /// A phrase to be derived along the target chain's path
    Mnemonic(Zeroizing<String>),
    /// A ready key pair
    KeyPair(KeyPair),
}

impl ImportedKey {
    pub fn curve(&self) -> Option<CurveId> {
        match self {
            Self::Mnemonic(_) => None,
            Self::KeyPair(key_pair) => Some(key_pair.curve()),
        }
    }
}

impl fmt::Debug for ImportedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mnemonic(_) => f.write_str("Mnemonic(<redacted>)"),
            Self::KeyPair(key_pair) => f.debug_tuple("KeyPair").field(key_pair).finish(),
        }
    }
}
