//! Error types for the chainkey library

use thiserror::Error;

use crate::address::AddressKind;
use crate::crypto::keys::CurveId;

/// Error type for chainkey operations
///
/// Every variant is a deterministic validation failure: retrying the same call
/// with the same input yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),

    #[error("Invalid {curve} key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        curve: CurveId,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid {curve} key: {reason}")]
    InvalidKey { curve: CurveId, reason: String },

    #[error("Non-hardened segment {index} is not supported on {curve}")]
    NonHardenedUnsupported { curve: CurveId, index: u32 },

    #[error("Derivation path depth {depth} exceeds the maximum of {max}")]
    PathTooDeep { depth: usize, max: usize },

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid seed: {reason}")]
    InvalidSeed { reason: String },

    #[error("Invalid {format} address: {reason}")]
    InvalidFormat { format: AddressKind, reason: String },

    #[error("Checksum mismatch in {format} address")]
    ChecksumMismatch { format: AddressKind },

    #[error("Invalid witness program: {reason}")]
    InvalidWitnessProgram { reason: String },

    #[error("Network mismatch: expected {expected}, found {found}")]
    NetworkMismatch { expected: String, found: String },

    #[error("Ambiguous import format, candidates: {}", .candidates.join(", "))]
    AmbiguousFormat { candidates: Vec<String> },

    #[error("Unrecognized import format")]
    UnrecognizedFormat,

    #[error("Curve mismatch: expected {expected}, found {found}")]
    CurveMismatch { expected: CurveId, found: CurveId },

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Unknown network {network} for {ticker}")]
    UnknownNetwork { ticker: String, network: String },

    #[error("Unknown address format: {0}")]
    UnknownAddressFormat(String),

    #[error("{ticker} does not support the {format} address format")]
    UnsupportedAddressFormat { ticker: String, format: AddressKind },

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Stable tag for each error variant, for frontends that map errors to messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedCurve,
    InvalidKeyLength,
    InvalidKey,
    NonHardenedUnsupported,
    PathTooDeep,
    InvalidPath,
    InvalidSeed,
    InvalidFormat,
    ChecksumMismatch,
    InvalidWitnessProgram,
    NetworkMismatch,
    AmbiguousFormat,
    UnrecognizedFormat,
    CurveMismatch,
    UnknownTicker,
    UnknownNetwork,
    UnknownAddressFormat,
    UnsupportedAddressFormat,
    Mnemonic,
    Keystore,
    InvalidConfig,
}

impl Error {
    /// Get the stable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedCurve(_) => ErrorKind::UnsupportedCurve,
            Self::InvalidKeyLength { .. } => ErrorKind::InvalidKeyLength,
            Self::InvalidKey { .. } => ErrorKind::InvalidKey,
            Self::NonHardenedUnsupported { .. } => ErrorKind::NonHardenedUnsupported,
            Self::PathTooDeep { .. } => ErrorKind::PathTooDeep,
            Self::InvalidPath(_) => ErrorKind::InvalidPath,
            Self::InvalidSeed { .. } => ErrorKind::InvalidSeed,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::InvalidWitnessProgram { .. } => ErrorKind::InvalidWitnessProgram,
            Self::NetworkMismatch { .. } => ErrorKind::NetworkMismatch,
            Self::AmbiguousFormat { .. } => ErrorKind::AmbiguousFormat,
            Self::UnrecognizedFormat => ErrorKind::UnrecognizedFormat,
            Self::CurveMismatch { .. } => ErrorKind::CurveMismatch,
            Self::UnknownTicker(_) => ErrorKind::UnknownTicker,
            Self::UnknownNetwork { .. } => ErrorKind::UnknownNetwork,
            Self::UnknownAddressFormat(_) => ErrorKind::UnknownAddressFormat,
            Self::UnsupportedAddressFormat { .. } => ErrorKind::UnsupportedAddressFormat,
            Self::Mnemonic(_) => ErrorKind::Mnemonic,
            Self::Keystore(_) => ErrorKind::Keystore,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    pub(crate) fn invalid_format(format: AddressKind, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format,
            reason: reason.into(),
        }
    }
}

/// Result type for chainkey operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_is_stable() {
        let err = Error::CurveMismatch {
            expected: CurveId::Secp256k1,
            found: CurveId::Ed25519,
        };
        assert_eq!(err.kind(), ErrorKind::CurveMismatch);
        assert_eq!(
            err.to_string(),
            "Curve mismatch: expected secp256k1, found ed25519"
        );
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let err = Error::AmbiguousFormat {
            candidates: vec!["raw-hex/secp256k1".into(), "raw-hex/ed25519".into()],
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous import format, candidates: raw-hex/secp256k1, raw-hex/ed25519"
        );
    }
}
