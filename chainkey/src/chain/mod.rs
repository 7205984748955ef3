//! Chain registry and router
//!
//! Per-chain behaviour is data: an immutable [`ChainProfile`] per ticker,
//! dispatched through the closed [`crate::crypto::CurveId`] and
//! [`crate::address::AddressFormat`] sets.

mod profile;
mod registry;
mod router;

pub use profile::{ChainProfile, NetworkParams};
pub use registry::ChainRegistry;
pub use router::{ChainRouter, DeriveOptions, ImportOptions};
