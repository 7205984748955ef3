//! Chain router: ticker → profile → derivation → address

use std::sync::Arc;

use tracing::{debug, warn};

use super::profile::{ChainProfile, NetworkParams};
use super::registry::ChainRegistry;
use crate::account::DerivedAccount;
use crate::address::{self, AddressFormat, AddressKind};
use crate::config::RouterConfig;
use crate::crypto::keys::{CurveId, KeyPair};
use crate::crypto::{derive_with_limit, DerivationPath, Seed};
use crate::error::{Error, Result};
use crate::import::{self, FormatHint, ImportBlob, ImportedKey};

/// Per-call overrides for [`ChainRouter::derive_address`]
#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    /// Path to derive instead of the profile's default
    pub path: Option<DerivationPath>,
    /// Address format instead of the profile's default
    pub format: Option<AddressKind>,
}

impl DeriveOptions {
    pub fn with_path(mut self, path: DerivationPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_format(mut self, format: AddressKind) -> Self {
        self.format = Some(format);
        self
    }
}

/// Per-call overrides for [`ChainRouter::import_and_derive_with`]
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub hint: Option<FormatHint>,
    /// Network instead of the configured default
    pub network: Option<String>,
    /// Path for mnemonic imports; key imports reject it
    pub path: Option<DerivationPath>,
    pub format: Option<AddressKind>,
}

impl ImportOptions {
    pub fn with_hint(mut self, hint: FormatHint) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn with_path(mut self, path: DerivationPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_format(mut self, format: AddressKind) -> Self {
        self.format = Some(format);
        self
    }
}

/// Composes the curve engine, derivation engine and address codecs per chain
///
/// Holds only the shared read-only registry and its configuration, so one
/// router can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ChainRouter {
    registry: Arc<ChainRegistry>,
    config: RouterConfig,
}

impl Default for ChainRouter {
    fn default() -> Self {
        Self::new(ChainRegistry::global(), RouterConfig::default())
    }
}

impl ChainRouter {
    pub fn new(registry: Arc<ChainRegistry>, config: RouterConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Find the profile for a ticker, checking it has the named network
    pub fn resolve(&self, ticker: &str, network: &str) -> Result<&ChainProfile> {
        let profile = self
            .registry
            .get(ticker)
            .ok_or_else(|| Error::UnknownTicker(ticker.to_string()))?;
        network_of(profile, network)?;
        Ok(profile)
    }

    /// Derive the account for `ticker` on `network` from a seed
    pub fn derive_address(
        &self,
        seed: &Seed,
        ticker: &str,
        network: &str,
        options: &DeriveOptions,
    ) -> Result<DerivedAccount> {
        let profile = self.resolve(ticker, network)?;
        let network = network_of(profile, network)?;
        let format = format_of(profile, network, options.format)?;
        let path = options
            .path
            .clone()
            .unwrap_or_else(|| profile.path_for(format.kind()));

        self.derive_along(seed, profile, network, format, path)
    }

    /// Detect an import blob and derive its account on the default network
    pub fn import_and_derive(
        &self,
        blob: ImportBlob,
        ticker: &str,
        hint: Option<&FormatHint>,
    ) -> Result<DerivedAccount> {
        let options = ImportOptions {
            hint: hint.copied(),
            ..ImportOptions::default()
        };
        self.import_and_derive_with(blob, ticker, &options)
    }

    /// Detect an import blob and derive its account, with overrides
    ///
    /// A blob whose detected or hinted curve differs from the ticker's curve is
    /// rejected with `CurveMismatch` before any key is derived.
    pub fn import_and_derive_with(
        &self,
        blob: ImportBlob,
        ticker: &str,
        options: &ImportOptions,
    ) -> Result<DerivedAccount> {
        let network = options
            .network
            .as_deref()
            .unwrap_or(&self.config.default_network);
        let profile = self.resolve(ticker, network)?;
        let network = network_of(profile, network)?;
        let format = format_of(profile, network, options.format)?;

        let detection = import::detect_with_hint(&blob, options.hint.as_ref())?;
        if let Some(found) = detection.curve {
            check_curve(profile, found)?;
        }
        debug!(
            ticker = %profile.ticker,
            kind = %detection.kind,
            confidence = ?detection.confidence,
            "import detected"
        );

        match import::extract(&blob, &detection)? {
            ImportedKey::Mnemonic(phrase) => {
                let seed = match profile.curve {
                    CurveId::Sr25519 => Seed::substrate_from_mnemonic(&phrase, blob.passphrase())?,
                    _ => Seed::from_mnemonic(&phrase, blob.passphrase())?,
                };
                let path = options
                    .path
                    .clone()
                    .unwrap_or_else(|| profile.path_for(format.kind()));
                self.derive_along(&seed, profile, network, format, path)
            }
            ImportedKey::KeyPair(key_pair) => {
                if let Some(path) = &options.path {
                    return Err(Error::InvalidPath(format!(
                        "{} is an imported key and cannot be derived along {}",
                        detection.kind, path
                    )));
                }
                check_curve(profile, key_pair.curve())?;
                account(profile, network, format, None, key_pair)
            }
        }
    }

    fn derive_along(
        &self,
        seed: &Seed,
        profile: &ChainProfile,
        network: &NetworkParams,
        format: &AddressFormat,
        path: DerivationPath,
    ) -> Result<DerivedAccount> {
        let key_pair = derive_with_limit(
            seed.as_bytes(),
            &path,
            profile.curve,
            self.config.max_path_depth,
        )?;
        account(profile, network, format, Some(path), key_pair)
    }
}

fn network_of<'a>(profile: &'a ChainProfile, network: &str) -> Result<&'a NetworkParams> {
    profile.network(network).ok_or_else(|| Error::UnknownNetwork {
        ticker: profile.ticker.clone(),
        network: network.to_string(),
    })
}

fn format_of<'a>(
    profile: &ChainProfile,
    network: &'a NetworkParams,
    kind: Option<AddressKind>,
) -> Result<&'a AddressFormat> {
    let kind = kind.unwrap_or(profile.default_format);
    network
        .format(kind)
        .ok_or_else(|| Error::UnsupportedAddressFormat {
            ticker: profile.ticker.clone(),
            format: kind,
        })
}

fn check_curve(profile: &ChainProfile, found: CurveId) -> Result<()> {
    if found == profile.curve {
        return Ok(());
    }
    warn!(ticker = %profile.ticker, expected = %profile.curve, found = %found, "rejected key from another curve");
    Err(Error::CurveMismatch {
        expected: profile.curve,
        found,
    })
}

fn account(
    profile: &ChainProfile,
    network: &NetworkParams,
    format: &AddressFormat,
    path: Option<DerivationPath>,
    key_pair: KeyPair,
) -> Result<DerivedAccount> {
    let address = address::encode_key(key_pair.public_key(), format)?;
    match &path {
        Some(path) => debug!(ticker = %profile.ticker, network = %network.name, %format, %path, "address derived"),
        None => debug!(ticker = %profile.ticker, network = %network.name, %format, "address imported"),
    }
    Ok(DerivedAccount::new(
        profile.ticker.clone(),
        network.name.clone(),
        address,
        format.clone(),
        path,
        key_pair,
    ))
}
