//! Immutable per-chain records: curve, paths and network parameters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::{AddressFormat, AddressKind};
use crate::crypto::keys::CurveId;
use crate::crypto::DerivationPath;

/// Parameters of one network of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub name: String,
    /// Opaque endpoint names for RPC collaborators; never contacted here
    pub endpoints: Vec<String>,
    /// Address formats valid on this network, with their parameters
    pub formats: Vec<AddressFormat>,
}

impl NetworkParams {
    pub fn new(name: impl Into<String>, endpoints: &[&str], formats: Vec<AddressFormat>) -> Self {
        Self {
            name: name.into(),
            endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
            formats,
        }
    }

    /// The parameterised format of the given kind, if this network has one
    pub fn format(&self, kind: AddressKind) -> Option<&AddressFormat> {
        self.formats.iter().find(|format| format.kind() == kind)
    }
}

/// Everything the router needs to know about a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// Upper-case ticker, e.g. `BTC`
    pub ticker: String,
    pub name: String,
    pub curve: CurveId,
    /// SLIP-44 coin type
    pub coin_type: u32,
    pub default_format: AddressKind,
    /// Default derivation path per address format
    pub paths: BTreeMap<AddressKind, DerivationPath>,
    pub networks: Vec<NetworkParams>,
}

impl ChainProfile {
    /// Look up a network by name, ignoring case
    pub fn network(&self, name: &str) -> Option<&NetworkParams> {
        self.networks
            .iter()
            .find(|network| network.name.eq_ignore_ascii_case(name))
    }

    pub fn network_names(&self) -> Vec<&str> {
        self.networks.iter().map(|network| network.name.as_str()).collect()
    }

    /// Default path for an address format, falling back to the default format's path
    pub fn path_for(&self, kind: AddressKind) -> DerivationPath {
        self.paths
            .get(&kind)
            .or_else(|| self.paths.get(&self.default_format))
            .cloned()
            .unwrap_or_default()
    }

    pub fn default_path(&self) -> DerivationPath {
        self.path_for(self.default_format)
    }

    /// Problems that make this profile unusable, empty when it is consistent
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.ticker.is_empty() || self.ticker != self.ticker.to_ascii_uppercase() {
            problems.push(format!("ticker {:?} must be non-empty upper case", self.ticker));
        }
        if !self.default_format.accepts(self.curve) {
            problems.push(format!(
                "{}: default format {} cannot carry {} keys",
                self.ticker, self.default_format, self.curve
            ));
        }
        if self.networks.is_empty() {
            problems.push(format!("{}: no networks", self.ticker));
        }

        for network in &self.networks {
            if network.format(self.default_format).is_none() {
                problems.push(format!(
                    "{}/{}: default format {} missing",
                    self.ticker, network.name, self.default_format
                ));
            }
            for format in &network.formats {
                if !format.kind().accepts(self.curve) {
                    problems.push(format!(
                        "{}/{}: format {} cannot carry {} keys",
                        self.ticker, network.name, format, self.curve
                    ));
                }
            }
        }

        if self.curve == CurveId::Ed25519 {
            for (kind, path) in &self.paths {
                if !path.is_fully_hardened() {
                    problems.push(format!(
                        "{}: {} path {} must be fully hardened on ed25519",
                        self.ticker, kind, path
                    ));
                }
            }
        }

        problems
    }
}
