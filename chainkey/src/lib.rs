//! Chainkey - multi-chain key derivation and address core
//!
//! This library derives keys on secp256k1, ed25519 and sr25519, renders them
//! as chain addresses, classifies wallet exports for import and routes all of
//! it by ticker. It performs no network or disk I/O.

pub mod account;
pub mod address;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod import;

// Re-export commonly used types for convenience
pub use account::{AccountSummary, DerivedAccount};
pub use address::{AddressFormat, AddressKind};
pub use chain::{ChainProfile, ChainRegistry, ChainRouter, DeriveOptions, ImportOptions, NetworkParams};
pub use config::RouterConfig;
pub use crypto::{CurveId, DerivationPath, KeyPair, PrivateKey, PublicKey, Seed, Signature};
pub use error::{Error, ErrorKind, Result};
pub use import::{Detection, FormatHint, ImportBlob, ImportKind, ImportedKey};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
