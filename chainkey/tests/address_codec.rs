//! Tests for address encoding and decoding

use chainkey::address::{self, AddressFormat, AddressKind};
use chainkey::crypto::{generate_key_pair, CurveId, PublicKey};
use chainkey::Error;

const GENERATOR: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const ALICE_PUBLIC: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

fn generator() -> Vec<u8> {
    hex::decode(GENERATOR).unwrap()
}

fn alice() -> Vec<u8> {
    hex::decode(ALICE_PUBLIC).unwrap()
}

fn every_format() -> Vec<AddressFormat> {
    vec![
        AddressFormat::P2pkh { version: 0x00 },
        AddressFormat::P2sh { version: 0x05 },
        AddressFormat::P2wpkh { hrp: "bc".into() },
        AddressFormat::P2tr { hrp: "tb".into() },
        AddressFormat::Ss58 { prefix: 0 },
        AddressFormat::Ss58 { prefix: 2 },
        AddressFormat::Ss58 { prefix: 1284 },
        AddressFormat::Evm,
        AddressFormat::Tron,
        AddressFormat::Cosmos { hrp: "cosmos".into() },
        AddressFormat::Base58,
        AddressFormat::Tezos,
        AddressFormat::Near,
        AddressFormat::Aptos,
        AddressFormat::Sui,
    ]
}

#[test]
fn test_bitcoin_reference_addresses() {
    let key = generator();
    assert_eq!(
        address::encode(&key, &AddressFormat::P2pkh { version: 0x00 }).unwrap(),
        "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
    );
    assert_eq!(
        address::encode(&key, &AddressFormat::P2wpkh { hrp: "bc".into() }).unwrap(),
        "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
    );
}

#[test]
fn test_evm_reference_address() {
    let address = address::encode(&generator(), &AddressFormat::Evm).unwrap();
    assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    assert!(address::validate(&address.to_lowercase(), &AddressFormat::Evm));
    assert!(address::validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", &AddressFormat::Evm));
    assert_eq!(
        address::decode("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD", &AddressFormat::Evm).unwrap_err(),
        Error::ChecksumMismatch {
            format: AddressKind::Evm
        }
    );
}

#[test]
fn test_ss58_alice() {
    let generic = address::encode(&alice(), &AddressFormat::Ss58 { prefix: 42 }).unwrap();
    assert_eq!(generic, "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");

    let polkadot = address::encode(&alice(), &AddressFormat::Ss58 { prefix: 0 }).unwrap();
    assert!(polkadot.starts_with('1'));
    assert_eq!(
        address::decode(&polkadot, &AddressFormat::Ss58 { prefix: 0 }).unwrap(),
        alice()
    );
}

#[test]
fn test_ss58_prefix_must_match_network() {
    let generic = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    let err = address::decode(generic, &AddressFormat::Ss58 { prefix: 0 }).unwrap_err();
    assert!(matches!(err, Error::NetworkMismatch { .. }), "{:?}", err);

    let mut corrupted = generic.to_string();
    corrupted.replace_range(10..11, "6");
    let err = address::decode(&corrupted, &AddressFormat::Ss58 { prefix: 42 }).unwrap_err();
    assert!(
        matches!(err, Error::ChecksumMismatch { .. } | Error::InvalidFormat { .. }),
        "{:?}",
        err
    );
}

#[test]
fn test_round_trip_for_every_format() {
    for format in every_format() {
        for curve in CurveId::ALL {
            if !format.kind().accepts(curve) {
                continue;
            }
            let key_pair = generate_key_pair(&[0x2a; 32], curve).unwrap();
            let public = key_pair.public_key();

            let address = address::encode_key(public, &format).unwrap();
            assert_eq!(
                address::decode(&address, &format).unwrap(),
                address::payload_key(public, &format).unwrap(),
                "{} with a {} key",
                format,
                curve
            );
        }
    }
}

#[test]
fn test_key_carrying_formats_return_the_key() {
    let key_pair = generate_key_pair(&[7u8; 32], CurveId::Ed25519).unwrap();
    let public = key_pair.public_key();

    for format in [
        AddressFormat::Base58,
        AddressFormat::Near,
        AddressFormat::Ss58 { prefix: 0 },
    ] {
        let address = address::encode_key(public, &format).unwrap();
        assert_eq!(address::decode(&address, &format).unwrap(), public.as_bytes());
    }
}

#[test]
fn test_taproot_requires_x_only_key() {
    let err = address::encode(&generator(), &AddressFormat::P2tr { hrp: "bc".into() }).unwrap_err();
    assert!(matches!(err, Error::InvalidWitnessProgram { .. }), "{:?}", err);

    let key = generator();
    let address = address::encode(&key[1..], &AddressFormat::P2tr { hrp: "bc".into() }).unwrap();
    assert!(address.starts_with("bc1p"));
}

#[test]
fn test_witness_version_is_checked() {
    let key_pair = generate_key_pair(&[3u8; 32], CurveId::Secp256k1).unwrap();
    let taproot = address::encode_key(key_pair.public_key(), &AddressFormat::P2tr { hrp: "bc".into() }).unwrap();
    let segwit = address::encode_key(key_pair.public_key(), &AddressFormat::P2wpkh { hrp: "bc".into() }).unwrap();

    assert!(matches!(
        address::decode(&taproot, &AddressFormat::P2wpkh { hrp: "bc".into() }),
        Err(Error::InvalidWitnessProgram { .. })
    ));
    assert!(matches!(
        address::decode(&segwit, &AddressFormat::P2tr { hrp: "bc".into() }),
        Err(Error::InvalidWitnessProgram { .. })
    ));
    assert!(matches!(
        address::decode(&segwit, &AddressFormat::P2wpkh { hrp: "tb".into() }),
        Err(Error::NetworkMismatch { .. })
    ));
}

#[test]
fn test_keys_from_the_wrong_curve_are_refused() {
    let ed = generate_key_pair(&[1u8; 32], CurveId::Ed25519).unwrap();
    assert_eq!(
        address::encode_key(ed.public_key(), &AddressFormat::P2wpkh { hrp: "bc".into() }).unwrap_err(),
        Error::CurveMismatch {
            expected: CurveId::Secp256k1,
            found: CurveId::Ed25519
        }
    );

    let secp = generate_key_pair(&[1u8; 32], CurveId::Secp256k1).unwrap();
    assert!(matches!(
        address::encode_key(secp.public_key(), &AddressFormat::Ss58 { prefix: 0 }),
        Err(Error::CurveMismatch { .. })
    ));

    let sr = PublicKey::new(alice(), CurveId::Sr25519);
    assert!(matches!(
        address::encode_key(&sr, &AddressFormat::Base58),
        Err(Error::CurveMismatch { .. })
    ));
}

#[test]
fn test_format_names() {
    assert_eq!("ss58".parse::<AddressKind>().unwrap(), AddressKind::Ss58);
    assert_eq!(
        "ripple".parse::<AddressKind>().unwrap_err(),
        Error::UnknownAddressFormat("ripple".to_string())
    );

    let json = serde_json::to_string(&AddressFormat::Ss58 { prefix: 2 }).unwrap();
    assert_eq!(json, r#"{"kind":"ss58","prefix":2}"#);
}
