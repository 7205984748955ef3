//! The chain table, built once and read-only afterwards

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use super::profile::{ChainProfile, NetworkParams};
use crate::address::{AddressFormat, AddressKind};
use crate::crypto::keys::CurveId;
use crate::crypto::{ChildIndex, DerivationPath};
use crate::error::{Error, Result};

static BUILTIN: Lazy<Arc<ChainRegistry>> = Lazy::new(|| Arc::new(ChainRegistry::builtin()));

/// Immutable ticker → profile table
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    profiles: BTreeMap<String, ChainProfile>,
}

impl ChainRegistry {
    /// Build a registry from profiles, rejecting duplicates and inconsistent entries
    pub fn from_profiles(profiles: impl IntoIterator<Item = ChainProfile>) -> Result<Self> {
        let mut table = BTreeMap::new();
        let mut problems = Vec::new();

        for profile in profiles {
            problems.extend(profile.problems());
            let ticker = profile.ticker.to_ascii_uppercase();
            if table.insert(ticker.clone(), profile).is_some() {
                problems.push(format!("duplicate ticker {}", ticker));
            }
        }

        if !problems.is_empty() {
            return Err(Error::InvalidConfig(problems.join("; ")));
        }
        Ok(Self { profiles: table })
    }

    /// The built-in chain table
    pub fn builtin() -> Self {
        let profiles = builtin_profiles()
            .into_iter()
            .map(|profile| (profile.ticker.clone(), profile))
            .collect();
        Self { profiles }
    }

    /// Process-wide shared copy of [`ChainRegistry::builtin`]
    pub fn global() -> Arc<ChainRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Look up a profile by ticker, ignoring case
    pub fn get(&self, ticker: &str) -> Option<&ChainProfile> {
        self.profiles.get(&ticker.trim().to_ascii_uppercase())
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ChainProfile> {
        self.profiles.values()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// A copy of this registry with endpoint names replaced from a JSON overlay
    ///
    /// The overlay maps ticker → network → endpoint list:
    /// `{"ETH": {"mainnet": ["https://..."]}}`. Networks not named keep their
    /// endpoints. Unknown tickers and networks are errors.
    pub fn with_endpoints_json(&self, json: &str) -> Result<Self> {
        let overlay: HashMap<String, HashMap<String, Vec<String>>> = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("endpoint overlay: {}", e)))?;

        let mut profiles = self.profiles.clone();
        for (ticker, networks) in overlay {
            let profile = profiles
                .get_mut(&ticker.to_ascii_uppercase())
                .ok_or_else(|| Error::UnknownTicker(ticker.clone()))?;

            for (network, endpoints) in networks {
                let params = profile
                    .networks
                    .iter_mut()
                    .find(|params| params.name.eq_ignore_ascii_case(&network))
                    .ok_or_else(|| Error::UnknownNetwork {
                        ticker: profile.ticker.clone(),
                        network: network.clone(),
                    })?;
                debug!(ticker = %profile.ticker, network = %params.name, count = endpoints.len(), "endpoints replaced");
                params.endpoints = endpoints;
            }
        }

        Ok(Self { profiles })
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn path(purpose: u32, coin_type: u32) -> DerivationPath {
    DerivationPath::bip44(purpose, coin_type, 0, 0, 0)
}

fn hardened(segments: &[u32]) -> DerivationPath {
    DerivationPath::new(
        segments
            .iter()
            .map(|index| ChildIndex::hardened(*index))
            .collect(),
    )
}

fn bitcoin_formats(p2pkh: u8, p2sh: u8, hrp: Option<&str>, taproot: bool) -> Vec<AddressFormat> {
    let mut formats = vec![
        AddressFormat::P2pkh { version: p2pkh },
        AddressFormat::P2sh { version: p2sh },
    ];
    if let Some(hrp) = hrp {
        formats.push(AddressFormat::P2wpkh { hrp: hrp.to_string() });
        if taproot {
            formats.push(AddressFormat::P2tr { hrp: hrp.to_string() });
        }
    }
    formats
}

struct Entry {
    ticker: &'static str,
    name: &'static str,
    curve: CurveId,
    coin_type: u32,
    default_format: AddressKind,
    paths: Vec<(AddressKind, DerivationPath)>,
    networks: Vec<NetworkParams>,
}

impl From<Entry> for ChainProfile {
    fn from(entry: Entry) -> Self {
        ChainProfile {
            ticker: entry.ticker.to_string(),
            name: entry.name.to_string(),
            curve: entry.curve,
            coin_type: entry.coin_type,
            default_format: entry.default_format,
            paths: entry.paths.into_iter().collect(),
            networks: entry.networks,
        }
    }
}

fn evm(ticker: &'static str, name: &'static str, coin_type: u32, testnet: &str, endpoints: [&[&str]; 2]) -> Entry {
    Entry {
        ticker,
        name,
        curve: CurveId::Secp256k1,
        coin_type,
        default_format: AddressKind::Evm,
        paths: vec![(AddressKind::Evm, path(44, coin_type))],
        networks: vec![
            NetworkParams::new("mainnet", endpoints[0], vec![AddressFormat::Evm]),
            NetworkParams::new(testnet, endpoints[1], vec![AddressFormat::Evm]),
        ],
    }
}

fn ed25519_chain(
    ticker: &'static str,
    name: &'static str,
    coin_type: u32,
    format: AddressFormat,
    path: DerivationPath,
    networks: [(&str, &[&str]); 2],
) -> Entry {
    let kind = format.kind();
    Entry {
        ticker,
        name,
        curve: CurveId::Ed25519,
        coin_type,
        default_format: kind,
        paths: vec![(kind, path)],
        networks: networks
            .iter()
            .map(|(network, endpoints)| NetworkParams::new(*network, endpoints, vec![format.clone()]))
            .collect(),
    }
}

fn builtin_profiles() -> Vec<ChainProfile> {
    let entries = vec![
        Entry {
            ticker: "BTC",
            name: "Bitcoin",
            curve: CurveId::Secp256k1,
            coin_type: 0,
            default_format: AddressKind::P2wpkh,
            paths: vec![
                (AddressKind::P2pkh, path(44, 0)),
                (AddressKind::P2sh, path(49, 0)),
                (AddressKind::P2wpkh, path(84, 0)),
                (AddressKind::P2tr, path(86, 0)),
            ],
            networks: vec![
                NetworkParams::new("mainnet", &[], bitcoin_formats(0x00, 0x05, Some("bc"), true)),
                NetworkParams::new("testnet", &[], bitcoin_formats(0x6f, 0xc4, Some("tb"), true)),
            ],
        },
        Entry {
            ticker: "LTC",
            name: "Litecoin",
            curve: CurveId::Secp256k1,
            coin_type: 2,
            default_format: AddressKind::P2wpkh,
            paths: vec![
                (AddressKind::P2pkh, path(44, 2)),
                (AddressKind::P2sh, path(49, 2)),
                (AddressKind::P2wpkh, path(84, 2)),
            ],
            networks: vec![
                NetworkParams::new("mainnet", &[], bitcoin_formats(0x30, 0x32, Some("ltc"), false)),
                NetworkParams::new("testnet", &[], bitcoin_formats(0x6f, 0x3a, Some("tltc"), false)),
            ],
        },
        Entry {
            ticker: "DOGE",
            name: "Dogecoin",
            curve: CurveId::Secp256k1,
            coin_type: 3,
            default_format: AddressKind::P2pkh,
            paths: vec![
                (AddressKind::P2pkh, path(44, 3)),
                (AddressKind::P2sh, path(44, 3)),
            ],
            networks: vec![
                NetworkParams::new("mainnet", &[], bitcoin_formats(0x1e, 0x16, None, false)),
                NetworkParams::new("testnet", &[], bitcoin_formats(0x71, 0xc4, None, false)),
            ],
        },
        evm("ETH", "Ethereum", 60, "sepolia", [&["https://cloudflare-eth.com"], &["https://rpc.sepolia.org"]]),
        evm("ETC", "Ethereum Classic", 61, "testnet", [&[], &[]]),
        evm("BNB", "BNB Smart Chain", 60, "testnet", [&["https://bsc-dataseed.binance.org"], &[]]),
        evm("MATIC", "Polygon", 60, "testnet", [&["https://polygon-rpc.com"], &[]]),
        evm("AVAX", "Avalanche C-Chain", 60, "testnet", [&["https://api.avax.network/ext/bc/C/rpc"], &[]]),
        evm("FTM", "Fantom", 60, "testnet", [&[], &[]]),
        Entry {
            ticker: "TRX",
            name: "Tron",
            curve: CurveId::Secp256k1,
            coin_type: 195,
            default_format: AddressKind::Tron,
            paths: vec![(AddressKind::Tron, path(44, 195))],
            networks: vec![
                NetworkParams::new("mainnet", &["https://api.trongrid.io"], vec![AddressFormat::Tron]),
                NetworkParams::new("testnet", &["https://api.shasta.trongrid.io"], vec![AddressFormat::Tron]),
            ],
        },
        Entry {
            ticker: "ATOM",
            name: "Cosmos Hub",
            curve: CurveId::Secp256k1,
            coin_type: 118,
            default_format: AddressKind::Cosmos,
            paths: vec![(AddressKind::Cosmos, path(44, 118))],
            networks: ["mainnet", "testnet"]
                .iter()
                .map(|network| {
                    NetworkParams::new(*network, &[], vec![AddressFormat::Cosmos { hrp: "cosmos".into() }])
                })
                .collect(),
        },
        ed25519_chain(
            "SOL",
            "Solana",
            501,
            AddressFormat::Base58,
            hardened(&[44, 501, 0, 0]),
            [
                ("mainnet", &["https://api.mainnet-beta.solana.com"]),
                ("devnet", &["https://api.devnet.solana.com"]),
            ],
        ),
        ed25519_chain(
            "XTZ",
            "Tezos",
            1729,
            AddressFormat::Tezos,
            hardened(&[44, 1729, 0, 0]),
            [("mainnet", &[]), ("ghostnet", &[])],
        ),
        ed25519_chain(
            "NEAR",
            "NEAR Protocol",
            397,
            AddressFormat::Near,
            hardened(&[44, 397, 0]),
            [
                ("mainnet", &["https://rpc.mainnet.near.org"]),
                ("testnet", &["https://rpc.testnet.near.org"]),
            ],
        ),
        ed25519_chain(
            "APT",
            "Aptos",
            637,
            AddressFormat::Aptos,
            hardened(&[44, 637, 0, 0, 0]),
            [
                ("mainnet", &["https://fullnode.mainnet.aptoslabs.com/v1"]),
                ("testnet", &["https://fullnode.testnet.aptoslabs.com/v1"]),
            ],
        ),
        ed25519_chain(
            "SUI",
            "Sui",
            784,
            AddressFormat::Sui,
            hardened(&[44, 784, 0, 0, 0]),
            [
                ("mainnet", &["https://fullnode.mainnet.sui.io:443"]),
                ("testnet", &["https://fullnode.testnet.sui.io:443"]),
            ],
        ),
        Entry {
            ticker: "DOT",
            name: "Polkadot",
            curve: CurveId::Sr25519,
            coin_type: 354,
            default_format: AddressKind::Ss58,
            paths: vec![(AddressKind::Ss58, DerivationPath::master())],
            networks: vec![
                NetworkParams::new("mainnet", &["wss://rpc.polkadot.io"], vec![AddressFormat::Ss58 { prefix: 0 }]),
                NetworkParams::new(
                    "westend",
                    &["wss://westend-rpc.polkadot.io"],
                    vec![AddressFormat::Ss58 { prefix: 42 }],
                ),
            ],
        },
        Entry {
            ticker: "KSM",
            name: "Kusama",
            curve: CurveId::Sr25519,
            coin_type: 434,
            default_format: AddressKind::Ss58,
            paths: vec![(AddressKind::Ss58, DerivationPath::master())],
            networks: vec![NetworkParams::new(
                "mainnet",
                &["wss://kusama-rpc.polkadot.io"],
                vec![AddressFormat::Ss58 { prefix: 2 }],
            )],
        },
    ];

    entries.into_iter().map(ChainProfile::from).collect()
}
