//! Chainkey command-line interface
//!
//! Derives addresses from a mnemonic, classifies and imports wallet exports,
//! and decodes addresses. Secrets are read from an environment variable or a
//! file, never from the command line. Output is JSON and never includes
//! private key bytes.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use chainkey::{
    AddressKind, ChainRegistry, ChainRouter, CurveId, DerivationPath, DeriveOptions,
    FormatHint, ImportBlob, ImportKind, ImportOptions, RouterConfig, Seed,
};

#[derive(Parser)]
#[command(name = "chainkey")]
#[command(about = "Multi-chain key derivation, wallet import and address decoding")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file replacing endpoint names per ticker and network
    #[arg(long, global = true)]
    endpoints: Option<PathBuf>,

    /// Network to use instead of the configured default
    #[arg(short, long, global = true)]
    network: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported chains and their networks
    Chains,
    /// Derive an address from a mnemonic
    Derive {
        /// Chain ticker, e.g. BTC
        ticker: String,
        #[command(flatten)]
        secret: SecretArgs,
        /// Derivation path instead of the chain default
        #[arg(long)]
        path: Option<DerivationPath>,
        /// Address format instead of the chain default
        #[arg(long)]
        format: Option<AddressKind>,
    },
    /// Classify a wallet export without importing it
    Detect {
        #[command(flatten)]
        secret: SecretArgs,
        #[command(flatten)]
        hint: HintArgs,
    },
    /// Import a wallet export and print its address
    Import {
        /// Chain ticker, e.g. DOT
        ticker: String,
        #[command(flatten)]
        secret: SecretArgs,
        #[command(flatten)]
        hint: HintArgs,
        /// Derivation path, for mnemonic imports
        #[arg(long)]
        path: Option<DerivationPath>,
        /// Address format instead of the chain default
        #[arg(long)]
        format: Option<AddressKind>,
    },
    /// Decode an address into the payload it commits to
    Decode {
        /// Chain ticker, e.g. ETH
        ticker: String,
        address: String,
        /// Address format instead of the chain default
        #[arg(long)]
        format: Option<AddressKind>,
    },
}

#[derive(Args)]
struct SecretArgs {
    /// Read the mnemonic or export from this file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Environment variable holding the mnemonic or export
    #[arg(long = "mnemonic-env", visible_alias = "secret-env", default_value = "CHAINKEY_MNEMONIC")]
    secret_env: String,

    /// Environment variable holding the passphrase or keystore password
    #[arg(long)]
    passphrase_env: Option<String>,
}

impl SecretArgs {
    fn read(&self) -> Result<Zeroizing<String>> {
        let secret = match &self.file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("reading secret from {}", path.display()))?,
            None => std::env::var(&self.secret_env)
                .with_context(|| format!("environment variable {} is not set", self.secret_env))?,
        };
        Ok(Zeroizing::new(secret))
    }

    fn passphrase(&self) -> Result<Option<Zeroizing<String>>> {
        self.passphrase_env
            .as_ref()
            .map(|var| {
                std::env::var(var)
                    .map(Zeroizing::new)
                    .with_context(|| format!("environment variable {} is not set", var))
            })
            .transpose()
    }

    fn blob(&self) -> Result<ImportBlob> {
        let content = self.read()?;
        let blob = ImportBlob::new(content.as_str());
        Ok(match self.passphrase()? {
            Some(passphrase) => blob.with_passphrase(passphrase.as_str()),
            None => blob,
        })
    }
}

#[derive(Args)]
struct HintArgs {
    /// Skip detection: the export is of this kind
    #[arg(long)]
    hint: Option<ImportKind>,

    /// Curve of the key in the export, with --hint
    #[arg(long, requires = "hint")]
    curve: Option<CurveId>,
}

impl HintArgs {
    fn hint(&self) -> Option<FormatHint> {
        self.hint.map(|kind| {
            let hint = FormatHint::new(kind);
            match self.curve {
                Some(curve) => hint.with_curve(curve),
                None => hint,
            }
        })
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "chainkey=debug,info" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_router(cli: &Cli) -> Result<ChainRouter> {
    let mut registry = ChainRegistry::global();
    if let Some(path) = &cli.endpoints {
        let overlay = fs::read_to_string(path)
            .with_context(|| format!("reading endpoints from {}", path.display()))?;
        registry = Arc::new(registry.with_endpoints_json(&overlay)?);
        info!("Loaded endpoint overlay from {}", path.display());
    }
    Ok(ChainRouter::new(registry, RouterConfig::from_env()))
}

fn print(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let router = build_router(cli)?;
    let network = cli
        .network
        .clone()
        .unwrap_or_else(|| router.config().default_network.clone());
    debug!(network = %network, "router ready");

    match &cli.command {
        Commands::Chains => {
            let profiles: Vec<_> = router.registry().profiles().collect();
            print(&profiles)
        }
        Commands::Derive {
            ticker,
            secret,
            path,
            format,
        } => {
            let curve = router.resolve(ticker, &network)?.curve;
            let mnemonic = secret.read()?;
            let passphrase = secret.passphrase()?;
            let passphrase = passphrase.as_deref().map(String::as_str);
            let seed = match curve {
                CurveId::Sr25519 => Seed::substrate_from_mnemonic(&mnemonic, passphrase)?,
                _ => Seed::from_mnemonic(&mnemonic, passphrase)?,
            };

            let options = DeriveOptions {
                path: path.clone(),
                format: *format,
            };
            let account = router.derive_address(&seed, ticker, &network, &options)?;
            print(&account.summary())
        }
        Commands::Detect { secret, hint } => {
            let blob = secret.blob()?;
            let detection = chainkey::import::detect_with_hint(&blob, hint.hint().as_ref())?;
            print(&detection)
        }
        Commands::Import {
            ticker,
            secret,
            hint,
            path,
            format,
        } => {
            let options = ImportOptions {
                hint: hint.hint(),
                network: Some(network.clone()),
                path: path.clone(),
                format: *format,
            };
            let account = router.import_and_derive_with(secret.blob()?, ticker, &options)?;
            print(&account.summary())
        }
        Commands::Decode {
            ticker,
            address,
            format,
        } => {
            let profile = router.resolve(ticker, &network)?;
            let kind = format.unwrap_or(profile.default_format);
            let params = profile
                .network(&network)
                .and_then(|params| params.format(kind))
                .ok_or_else(|| chainkey::Error::UnsupportedAddressFormat {
                    ticker: profile.ticker.clone(),
                    format: kind,
                })?;
            let payload = chainkey::address::decode(address, params)?;
            print(&json!({
                "ticker": profile.ticker,
                "network": network,
                "format": params,
                "payload": hex::encode(payload),
            }))
        }
    }
}

fn report(err: &anyhow::Error) {
    let body = match err.downcast_ref::<chainkey::Error>() {
        Some(error) => json!({ "error": error.kind(), "message": error.to_string() }),
        None => json!({ "error": "cli", "message": format!("{:#}", err) }),
    };
    eprintln!("{}", body);
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
