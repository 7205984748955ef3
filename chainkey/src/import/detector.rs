//! Declarative classifier over the known import shapes

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::exodus::ExodusExport;
use super::polkadot_js::Keystore;
use super::{raw, Confidence, Detection, FormatHint, ImportBlob, ImportKind, ImportedKey};
use crate::address::AddressKind;
use crate::crypto::keys::{ed25519, generate_key_pair, secp256k1, CurveId};
use crate::crypto::mnemonic;
use crate::error::{Error, Result};

const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];
/// Uncompressed and compressed WIF lengths
const WIF_LENGTHS: [usize; 2] = [51, 52];

type Matcher = fn(&str) -> Result<Vec<Detection>>;

/// Every shape, in the order candidates are listed
const MATCHERS: [(ImportKind, Matcher); 7] = [
    (ImportKind::Mnemonic, match_mnemonic),
    (ImportKind::Wif, match_wif),
    (ImportKind::RawHex, match_raw_hex),
    (ImportKind::Ed25519Keypair, match_ed25519_keypair),
    (ImportKind::Sr25519Keypair, match_sr25519_keypair),
    (ImportKind::PolkadotJs, match_polkadot_js),
    (ImportKind::Exodus, match_exodus),
];

fn one(detection: Detection) -> Result<Vec<Detection>> {
    Ok(vec![detection])
}

fn match_mnemonic(s: &str) -> Result<Vec<Detection>> {
    let words = s.split_whitespace().count();
    if !MNEMONIC_WORD_COUNTS.contains(&words) || !mnemonic::is_valid_mnemonic(s) {
        return Ok(Vec::new());
    }
    one(Detection::new(
        ImportKind::Mnemonic,
        None,
        None,
        Confidence::Verified,
    ))
}

fn match_wif(s: &str) -> Result<Vec<Detection>> {
    // Other base58 shapes share the leading characters
    if !WIF_LENGTHS.contains(&s.len()) {
        return Ok(Vec::new());
    }
    let Some(secret) = raw::decode_wif(s)? else {
        return Ok(Vec::new());
    };
    if secp256k1::key_pair_from_secret(&secret).is_err() {
        return Ok(Vec::new());
    }
    one(Detection::new(
        ImportKind::Wif,
        Some(CurveId::Secp256k1),
        Some(AddressKind::P2pkh),
        Confidence::Verified,
    ))
}

fn match_raw_hex(s: &str) -> Result<Vec<Detection>> {
    let Some(bytes) = raw::decode_hex(s) else {
        return Ok(Vec::new());
    };
    if bytes.len() != CurveId::SECRET_LEN {
        return Ok(Vec::new());
    }

    // The same 32 bytes are a valid secret on every curve: one candidate each
    Ok(CurveId::ALL
        .into_iter()
        .filter(|curve| generate_key_pair(&bytes, *curve).is_ok())
        .map(|curve| Detection::new(ImportKind::RawHex, Some(curve), None, Confidence::ShapeOnly))
        .collect())
}

fn match_ed25519_keypair(s: &str) -> Result<Vec<Detection>> {
    let consistent = raw::decode_ed25519_keypair(s)
        .map(|bytes| ed25519::key_pair_from_keypair_bytes(&bytes).is_ok())
        .unwrap_or(false);
    if !consistent {
        return Ok(Vec::new());
    }
    one(Detection::new(
        ImportKind::Ed25519Keypair,
        Some(CurveId::Ed25519),
        Some(AddressKind::Base58),
        Confidence::Verified,
    ))
}

fn match_sr25519_keypair(s: &str) -> Result<Vec<Detection>> {
    let consistent = raw::decode_sr25519_keypair(s)
        .map(|bytes| raw::sr25519_key_pair(&bytes).is_ok())
        .unwrap_or(false);
    if !consistent {
        return Ok(Vec::new());
    }
    one(Detection::new(
        ImportKind::Sr25519Keypair,
        Some(CurveId::Sr25519),
        Some(AddressKind::Ss58),
        Confidence::Verified,
    ))
}

fn match_polkadot_js(s: &str) -> Result<Vec<Detection>> {
    let Some(keystore) = Keystore::parse(s) else {
        return Ok(Vec::new());
    };
    one(Detection::new(
        ImportKind::PolkadotJs,
        keystore.curve(),
        Some(keystore.address_kind()),
        Confidence::ShapeOnly,
    ))
}

fn match_exodus(s: &str) -> Result<Vec<Detection>> {
    let Some(export) = ExodusExport::parse(s) else {
        return Ok(Vec::new());
    };
    one(Detection::new(
        ImportKind::Exodus,
        export.curve(),
        export.address_kind(),
        Confidence::ShapeOnly,
    ))
}

fn matcher_for(kind: ImportKind) -> Matcher {
    MATCHERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, matcher)| *matcher)
        .unwrap_or(match_nothing)
}

fn match_nothing(_: &str) -> Result<Vec<Detection>> {
    Ok(Vec::new())
}

fn single(candidates: Vec<Detection>) -> Result<Detection> {
    let mut candidates = candidates;
    match candidates.len() {
        0 => Err(Error::UnrecognizedFormat),
        1 => Ok(candidates.remove(0)),
        _ => {
            let labels: Vec<String> = candidates.iter().map(Detection::label).collect();
            warn!(candidates = ?labels, "ambiguous import blob");
            Err(Error::AmbiguousFormat { candidates: labels })
        }
    }
}

/// Classify a blob by running every matcher
///
/// Exactly one candidate must match: zero is `UnrecognizedFormat`, more is
/// `AmbiguousFormat` listing them all.
pub fn detect(blob: &ImportBlob) -> Result<Detection> {
    let content = blob.content();
    let mut candidates = Vec::new();
    for (_, matcher) in MATCHERS.iter() {
        candidates.extend(matcher(content)?);
    }

    let detection = single(candidates)?;
    debug!(kind = %detection.kind, curve = ?detection.curve, "detected import format");
    Ok(detection)
}

/// Classify a blob, letting an explicit hint override detection
///
/// With a hint only the hinted shape is tried. A hinted curve that contradicts
/// the curve the shape itself carries is a `CurveMismatch`.
pub fn detect_with_hint(blob: &ImportBlob, hint: Option<&FormatHint>) -> Result<Detection> {
    let Some(hint) = hint else {
        return detect(blob);
    };

    let candidates = matcher_for(hint.kind)(blob.content())?;
    let Some(curve) = hint.curve else {
        return single(candidates);
    };

    if candidates.is_empty() {
        return Err(Error::UnrecognizedFormat);
    }

    if let Some(detection) = candidates
        .iter()
        .find(|candidate| candidate.curve.map_or(true, |found| found == curve))
    {
        let mut detection = detection.clone();
        detection.curve = Some(curve);
        return Ok(detection);
    }

    let found = candidates
        .iter()
        .find_map(|candidate| candidate.curve)
        .unwrap_or(curve);
    warn!(kind = %hint.kind, expected = %curve, found = %found, "format hint contradicts blob curve");
    Err(Error::CurveMismatch {
        expected: curve,
        found,
    })
}

/// Turn a classified blob into key material
pub fn extract(blob: &ImportBlob, detection: &Detection) -> Result<ImportedKey> {
    let content = blob.content();
    let unrecognized = || Error::UnrecognizedFormat;

    let key_pair = match detection.kind {
        ImportKind::Mnemonic => {
            mnemonic::validate_mnemonic(content)?;
            return Ok(ImportedKey::Mnemonic(Zeroizing::new(content.to_string())));
        }
        ImportKind::Wif => {
            let secret = raw::decode_wif(content)?.ok_or_else(unrecognized)?;
            raw::wif_key_pair(&secret)?
        }
        ImportKind::RawHex => {
            let curve = detection.curve.ok_or_else(|| Error::AmbiguousFormat {
                candidates: CurveId::ALL
                    .iter()
                    .map(|curve| format!("{}/{}", ImportKind::RawHex, curve))
                    .collect(),
            })?;
            let bytes = raw::decode_hex(content).ok_or_else(unrecognized)?;
            generate_key_pair(&bytes, curve)?
        }
        ImportKind::Ed25519Keypair => {
            let bytes = raw::decode_ed25519_keypair(content).ok_or_else(unrecognized)?;
            raw::ed25519_key_pair(&bytes)?
        }
        ImportKind::Sr25519Keypair => {
            let bytes = raw::decode_sr25519_keypair(content).ok_or_else(unrecognized)?;
            raw::sr25519_key_pair(&bytes)?
        }
        ImportKind::PolkadotJs => Keystore::parse(content)
            .ok_or_else(unrecognized)?
            .key_pair(blob.passphrase())?,
        ImportKind::Exodus => ExodusExport::parse(content)
            .ok_or_else(unrecognized)?
            .key_pair()?,
    };

    if let Some(expected) = detection.curve {
        if key_pair.curve() != expected {
            return Err(Error::CurveMismatch {
                expected,
                found: key_pair.curve(),
            });
        }
    }

    Ok(ImportedKey::KeyPair(key_pair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::sr25519;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_mnemonic_is_detected_without_curve() {
        let detection = detect(&ImportBlob::new(ABANDON)).unwrap();
        assert_eq!(detection.kind, ImportKind::Mnemonic);
        assert_eq!(detection.curve, None);
        assert_eq!(detection.confidence, Confidence::Verified);
    }

    #[test]
    fn test_raw_hex_is_ambiguous_without_hint() {
        let blob = ImportBlob::new(format!("0x{}", "42".repeat(32)));
        assert_eq!(
            detect(&blob).unwrap_err(),
            Error::AmbiguousFormat {
                candidates: vec![
                    "raw-hex/secp256k1".to_string(),
                    "raw-hex/ed25519".to_string(),
                    "raw-hex/sr25519".to_string(),
                ]
            }
        );

        let hint = FormatHint::new(ImportKind::RawHex).with_curve(CurveId::Ed25519);
        let detection = detect_with_hint(&blob, Some(&hint)).unwrap();
        assert_eq!(detection.curve, Some(CurveId::Ed25519));
    }

    #[test]
    fn test_garbage_is_unrecognized() {
        for junk in ["", "hello world", "{\"foo\": 1}", "0x1234"] {
            assert_eq!(detect(&ImportBlob::new(junk)).unwrap_err(), Error::UnrecognizedFormat);
        }
    }

    #[test]
    fn test_hint_curve_must_agree_with_shape() {
        let key_pair = ed25519::key_pair_from_seed(&[8u8; 32]).unwrap();
        let mut bytes = vec![8u8; 32];
        bytes.extend_from_slice(key_pair.public_key().as_bytes());
        let blob = ImportBlob::new(hex::encode(&bytes));

        let hint = FormatHint::new(ImportKind::Ed25519Keypair).with_curve(CurveId::Secp256k1);
        assert_eq!(
            detect_with_hint(&blob, Some(&hint)).unwrap_err(),
            Error::CurveMismatch {
                expected: CurveId::Secp256k1,
                found: CurveId::Ed25519
            }
        );
    }

    #[test]
    fn test_hint_for_wrong_shape_is_unrecognized() {
        let hint = FormatHint::new(ImportKind::Wif);
        assert_eq!(
            detect_with_hint(&ImportBlob::new(ABANDON), Some(&hint)).unwrap_err(),
            Error::UnrecognizedFormat
        );
    }

    #[test]
    fn test_json_matching_two_shapes_is_ambiguous() {
        let (plaintext, _) = crate::import::polkadot_js::tests::sr25519_pkcs8(&[1u8; 32]);
        let json = serde_json::json!({
            "encoded": base64::Engine::encode(&base64::engine::general_purpose::STANDARD, plaintext),
            "encoding": { "content": ["pkcs8", "sr25519"], "type": ["none"], "version": "3" },
            "privateKey": "11".repeat(32),
            "asset": "polkadot"
        })
        .to_string();

        assert!(matches!(
            detect(&ImportBlob::new(json)),
            Err(Error::AmbiguousFormat { candidates }) if candidates.len() == 2
        ));
    }

    #[test]
    fn test_extract_sr25519_keypair() {
        let key_pair = sr25519::key_pair_from_mini_secret(&[2u8; 32]).unwrap();
        let mut bytes = key_pair.private_key().as_bytes().to_vec();
        bytes.extend_from_slice(key_pair.public_key().as_bytes());
        let blob = ImportBlob::new(hex::encode(&bytes));

        let detection = detect(&blob).unwrap();
        assert_eq!(detection.kind, ImportKind::Sr25519Keypair);
        match extract(&blob, &detection).unwrap() {
            ImportedKey::KeyPair(imported) => assert_eq!(imported.public_key(), key_pair.public_key()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
