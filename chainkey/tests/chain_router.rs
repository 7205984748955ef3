//! End-to-end tests: mnemonic or wallet export in, chain address out

use chainkey::address::{self, AddressFormat};
use chainkey::crypto::{generate_key_pair, CurveId};
use chainkey::{
    AddressKind, ChainRegistry, ChainRouter, DeriveOptions, Error, FormatHint, ImportBlob,
    ImportKind, ImportOptions, RouterConfig, Seed,
};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn router() -> ChainRouter {
    ChainRouter::default()
}

fn bip39_seed() -> Seed {
    Seed::from_mnemonic(ABANDON, None).unwrap()
}

fn btc_address(format: AddressKind) -> String {
    let options = DeriveOptions::default().with_format(format);
    router()
        .derive_address(&bip39_seed(), "BTC", "mainnet", &options)
        .unwrap()
        .address
}

#[test]
fn test_bitcoin_reference_accounts() {
    assert_eq!(btc_address(AddressKind::P2pkh), "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    assert_eq!(btc_address(AddressKind::P2sh), "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf");
    assert_eq!(
        btc_address(AddressKind::P2wpkh),
        "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu"
    );
    assert_eq!(
        btc_address(AddressKind::P2tr),
        "bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr"
    );
}

#[test]
fn test_bitcoin_default_is_native_segwit() {
    let account = router()
        .derive_address(&bip39_seed(), "btc", "mainnet", &DeriveOptions::default())
        .unwrap();
    assert_eq!(account.address, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");
    assert_eq!(account.path.unwrap().to_string(), "m/84'/0'/0'/0/0");

    // Same seed, same chain, different format: a different address
    assert_ne!(account.address, btc_address(AddressKind::P2tr));
}

#[test]
fn test_bitcoin_testnet_uses_testnet_parameters() {
    let account = router()
        .derive_address(&bip39_seed(), "BTC", "testnet", &DeriveOptions::default())
        .unwrap();
    assert!(account.address.starts_with("tb1q"), "{}", account.address);
    assert_eq!(account.network, "testnet");
}

#[test]
fn test_ethereum_reference_account() {
    let account = router()
        .derive_address(&bip39_seed(), "ETH", "mainnet", &DeriveOptions::default())
        .unwrap();
    assert_eq!(account.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert_eq!(account.curve(), CurveId::Secp256k1);

    // EVM chains share the key and therefore the address
    for ticker in ["BNB", "MATIC", "AVAX", "FTM"] {
        let other = router()
            .derive_address(&bip39_seed(), ticker, "mainnet", &DeriveOptions::default())
            .unwrap();
        assert_eq!(other.address, account.address, "{}", ticker);
    }
}

#[test]
fn test_custom_path() {
    let options = DeriveOptions::default().with_path("m/44'/60'/0'/0/1".parse().unwrap());
    let account = router()
        .derive_address(&bip39_seed(), "ETH", "mainnet", &options)
        .unwrap();
    assert_ne!(account.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert_eq!(account.path.unwrap().to_string(), "m/44'/60'/0'/0/1");
}

#[test]
fn test_polkadot_address_decodes_to_the_public_key() {
    let seed = Seed::substrate_from_mnemonic(ABANDON, None).unwrap();
    let account = router()
        .derive_address(&seed, "DOT", "mainnet", &DeriveOptions::default())
        .unwrap();
    assert_eq!(account.curve(), CurveId::Sr25519);
    assert!(account.address.starts_with('1'), "{}", account.address);
    assert_eq!(
        address::decode(&account.address, &AddressFormat::Ss58 { prefix: 0 }).unwrap(),
        account.public_key().as_bytes()
    );

    let westend = router()
        .derive_address(&seed, "DOT", "westend", &DeriveOptions::default())
        .unwrap();
    assert!(westend.address.starts_with('5'), "{}", westend.address);
    assert_eq!(westend.format, AddressFormat::Ss58 { prefix: 42 });
    assert_eq!(westend.public_key(), account.public_key());
}

#[test]
fn test_mnemonic_import_for_substrate_uses_substrate_seed() {
    let imported = router()
        .import_and_derive(ImportBlob::new(ABANDON), "DOT", None)
        .unwrap();

    let seed = Seed::substrate_from_mnemonic(ABANDON, None).unwrap();
    let derived = router()
        .derive_address(&seed, "DOT", "mainnet", &DeriveOptions::default())
        .unwrap();
    assert_eq!(imported.address, derived.address);
}

#[test]
fn test_mnemonic_import_matches_derivation() {
    let imported = router()
        .import_and_derive(ImportBlob::new(ABANDON), "ETH", None)
        .unwrap();
    assert_eq!(imported.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");

    let options = ImportOptions::default()
        .with_network("testnet")
        .with_format(AddressKind::P2pkh);
    let imported = router()
        .import_and_derive_with(ImportBlob::new(ABANDON), "BTC", &options)
        .unwrap();
    assert!(imported.address.starts_with('m') || imported.address.starts_with('n'));
}

#[test]
fn test_wrong_curve_import_is_refused() {
    let seed = [5u8; 32];
    let key_pair = generate_key_pair(&seed, CurveId::Ed25519).unwrap();
    let mut bytes = seed.to_vec();
    bytes.extend_from_slice(key_pair.public_key().as_bytes());
    let exported = hex::encode(&bytes);

    assert_eq!(
        router()
            .import_and_derive(ImportBlob::new(exported.as_str()), "BTC", None)
            .unwrap_err(),
        Error::CurveMismatch {
            expected: CurveId::Secp256k1,
            found: CurveId::Ed25519
        }
    );

    // An explicit hint naming the key's own curve does not make it a bitcoin key
    let hint = FormatHint::new(ImportKind::Ed25519Keypair).with_curve(CurveId::Ed25519);
    assert_eq!(
        router()
            .import_and_derive(ImportBlob::new(exported), "BTC", Some(&hint))
            .unwrap_err(),
        Error::CurveMismatch {
            expected: CurveId::Secp256k1,
            found: CurveId::Ed25519
        }
    );

    let blob = ImportBlob::new("ab".repeat(32));
    let hint = FormatHint::new(ImportKind::RawHex).with_curve(CurveId::Ed25519);
    assert_eq!(
        router().import_and_derive(blob, "ETH", Some(&hint)).unwrap_err(),
        Error::CurveMismatch {
            expected: CurveId::Secp256k1,
            found: CurveId::Ed25519
        }
    );
}

#[test]
fn test_raw_key_import_with_hint() {
    let blob = ImportBlob::new("ab".repeat(32));
    let hint = FormatHint::new(ImportKind::RawHex).with_curve(CurveId::Ed25519);
    let account = router().import_and_derive(blob, "SOL", Some(&hint)).unwrap();

    let expected = generate_key_pair(&[0xab; 32], CurveId::Ed25519).unwrap();
    assert_eq!(account.address, bs58::encode(expected.public_key().as_bytes()).into_string());
    assert!(account.path.is_none());

    let blob = ImportBlob::new("ab".repeat(32));
    assert!(matches!(
        router().import_and_derive(blob, "SOL", None),
        Err(Error::AmbiguousFormat { .. })
    ));
}

#[test]
fn test_unknown_ticker_and_network() {
    let seed = bip39_seed();
    assert_eq!(
        router()
            .derive_address(&seed, "XRP", "mainnet", &DeriveOptions::default())
            .unwrap_err(),
        Error::UnknownTicker("XRP".to_string())
    );
    assert!(matches!(
        router().derive_address(&seed, "SOL", "westend", &DeriveOptions::default()),
        Err(Error::UnknownNetwork { .. })
    ));
    assert!(matches!(
        router().import_and_derive(ImportBlob::new(ABANDON), "XRP", None),
        Err(Error::UnknownTicker(_))
    ));
}

#[test]
fn test_configured_default_network() {
    let router = ChainRouter::new(
        ChainRegistry::global(),
        RouterConfig::default().with_default_network("testnet"),
    );
    let account = router
        .import_and_derive(ImportBlob::new(ABANDON), "BTC", None)
        .unwrap();
    assert!(account.address.starts_with("tb1"), "{}", account.address);
}

#[test]
fn test_every_chain_derives_on_every_network() {
    let router = router();
    let bip39 = bip39_seed();
    let substrate = Seed::substrate_from_mnemonic(ABANDON, None).unwrap();

    for profile in router.registry().profiles() {
        let seed = match profile.curve {
            CurveId::Sr25519 => &substrate,
            _ => &bip39,
        };
        for network in profile.network_names() {
            let account = router
                .derive_address(seed, &profile.ticker, network, &DeriveOptions::default())
                .unwrap();
            assert!(
                address::validate(&account.address, &account.format),
                "{} on {}: {}",
                profile.ticker,
                network,
                account.address
            );
            assert!(!account.summary().address.is_empty());
        }
    }
}
