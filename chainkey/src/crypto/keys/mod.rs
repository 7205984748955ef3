//! Curve engine
//!
//! Key pair generation, signing and verification for secp256k1, ed25519 and
//! sr25519, with every key tagged by the curve that produced it.

mod engine;
mod types;

pub mod ed25519;
pub mod secp256k1;
pub mod sr25519;

pub use engine::*;
pub use types::{CurveId, KeyPair, PrivateKey, PublicKey, Signature};
