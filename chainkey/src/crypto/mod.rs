//! Cryptographic primitives: mnemonics, seeds, curves and hierarchical derivation

pub mod derivation;
pub mod keys;
pub mod mnemonic;
pub mod path;
pub mod seed;

pub use derivation::{derive, derive_with_limit, DEFAULT_MAX_DEPTH, HARDENED_OFFSET};
pub use keys::{generate_key_pair, sign, verify, CurveId, KeyPair, PrivateKey, PublicKey, Signature};
pub use mnemonic::*;
pub use path::{ChildIndex, DerivationPath};
pub use seed::Seed;
