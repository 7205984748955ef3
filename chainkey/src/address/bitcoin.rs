//! Bitcoin-family addresses: P2PKH, P2SH-P2WPKH, P2WPKH and P2TR

use bech32::{FromBase32, ToBase32, Variant};
use bitcoin::key::{TapTweak, UntweakedPublicKey};

use super::checksum::{base58check_decode, base58check_encode, hash160, split_version};
use super::AddressKind;
use crate::crypto::keys::secp256k1;
use crate::error::{Error, Result};

/// Witness programs this module emits and accepts
const P2WPKH_PROGRAM_LEN: usize = 20;
const P2TR_PROGRAM_LEN: usize = 32;

fn compressed_key(public_key: &[u8]) -> Result<[u8; 33]> {
    secp256k1::compressed(public_key)
}

/// HASH160 of the key as given (compressed or uncompressed)
pub fn p2pkh_payload(public_key: &[u8]) -> Result<[u8; 20]> {
    secp256k1::compressed(public_key)?;
    Ok(hash160(public_key))
}

pub fn p2pkh_encode(public_key: &[u8], version: u8) -> Result<String> {
    let hash = p2pkh_payload(public_key)?;
    Ok(versioned(version, &hash))
}

pub fn p2pkh_decode(address: &str, version: u8) -> Result<Vec<u8>> {
    let data = base58check_decode(address, AddressKind::P2pkh)?;
    Ok(split_version(&data, &[version], 20, AddressKind::P2pkh)?.to_vec())
}

/// HASH160 of the P2WPKH redeem script `OP_0 <20-byte key hash>`
pub fn p2sh_payload(public_key: &[u8]) -> Result<[u8; 20]> {
    let key_hash = hash160(&compressed_key(public_key)?);
    let mut redeem_script = Vec::with_capacity(22);
    redeem_script.extend_from_slice(&[0x00, 0x14]);
    redeem_script.extend_from_slice(&key_hash);
    Ok(hash160(&redeem_script))
}

pub fn p2sh_encode(public_key: &[u8], version: u8) -> Result<String> {
    let hash = p2sh_payload(public_key)?;
    Ok(versioned(version, &hash))
}

pub fn p2sh_decode(address: &str, version: u8) -> Result<Vec<u8>> {
    let data = base58check_decode(address, AddressKind::P2sh)?;
    Ok(split_version(&data, &[version], 20, AddressKind::P2sh)?.to_vec())
}

fn versioned(version: u8, hash: &[u8; 20]) -> String {
    let mut data = Vec::with_capacity(21);
    data.push(version);
    data.extend_from_slice(hash);
    base58check_encode(&data)
}

pub fn p2wpkh_payload(public_key: &[u8]) -> Result<[u8; 20]> {
    Ok(hash160(&compressed_key(public_key)?))
}

pub fn p2wpkh_encode(public_key: &[u8], hrp: &str) -> Result<String> {
    let program = p2wpkh_payload(public_key)?;
    encode_segwit(hrp, 0, &program, AddressKind::P2wpkh)
}

pub fn p2wpkh_decode(address: &str, hrp: &str) -> Result<Vec<u8>> {
    decode_segwit(address, hrp, 0, AddressKind::P2wpkh)
}

/// BIP-86 output key: the x-only internal key tweaked with an empty script tree
pub fn p2tr_payload(x_only_key: &[u8]) -> Result<[u8; 32]> {
    if x_only_key.len() != P2TR_PROGRAM_LEN {
        return Err(Error::InvalidWitnessProgram {
            reason: format!(
                "taproot needs a {}-byte x-only key, got {} bytes",
                P2TR_PROGRAM_LEN,
                x_only_key.len()
            ),
        });
    }

    let internal = UntweakedPublicKey::from_slice(x_only_key).map_err(|e| Error::InvalidKey {
        curve: crate::crypto::keys::CurveId::Secp256k1,
        reason: e.to_string(),
    })?;
    let (output_key, _parity) = internal.tap_tweak(secp256k1::context(), None);
    Ok(output_key.to_inner().serialize())
}

pub fn p2tr_encode(x_only_key: &[u8], hrp: &str) -> Result<String> {
    let program = p2tr_payload(x_only_key)?;
    encode_segwit(hrp, 1, &program, AddressKind::P2tr)
}

pub fn p2tr_decode(address: &str, hrp: &str) -> Result<Vec<u8>> {
    decode_segwit(address, hrp, 1, AddressKind::P2tr)
}

fn variant_for(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

fn encode_segwit(hrp: &str, version: u8, program: &[u8], kind: AddressKind) -> Result<String> {
    let version = bech32::u5::try_from_u8(version)
        .map_err(|e| Error::InvalidWitnessProgram { reason: e.to_string() })?;

    let mut data = vec![version];
    data.extend(program.to_base32());
    bech32::encode(hrp, data, variant_for(version.to_u8()))
        .map_err(|e| Error::invalid_format(kind, e.to_string()))
}

pub(crate) fn map_bech32_error(e: bech32::Error, kind: AddressKind) -> Error {
    match e {
        bech32::Error::InvalidChecksum => Error::ChecksumMismatch { format: kind },
        other => Error::invalid_format(kind, other.to_string()),
    }
}

fn decode_segwit(address: &str, hrp: &str, version: u8, kind: AddressKind) -> Result<Vec<u8>> {
    let (found_hrp, data, variant) =
        bech32::decode(address).map_err(|e| map_bech32_error(e, kind))?;

    if found_hrp != hrp {
        return Err(Error::NetworkMismatch {
            expected: hrp.to_string(),
            found: found_hrp,
        });
    }

    let (found_version, program) = data.split_first().ok_or_else(|| Error::InvalidWitnessProgram {
        reason: "missing witness version".to_string(),
    })?;

    if found_version.to_u8() != version {
        return Err(Error::InvalidWitnessProgram {
            reason: format!(
                "expected witness version {}, got {}",
                version,
                found_version.to_u8()
            ),
        });
    }

    // BIP-350: v0 uses Bech32, v1+ uses Bech32m
    if variant != variant_for(version) {
        return Err(Error::ChecksumMismatch { format: kind });
    }

    let program = Vec::<u8>::from_base32(program)
        .map_err(|e| Error::InvalidWitnessProgram { reason: e.to_string() })?;

    let expected_len = if version == 0 {
        P2WPKH_PROGRAM_LEN
    } else {
        P2TR_PROGRAM_LEN
    };
    if program.len() != expected_len {
        return Err(Error::InvalidWitnessProgram {
            reason: format!(
                "expected a {}-byte program, got {} bytes",
                expected_len,
                program.len()
            ),
        });
    }

    Ok(program)
}
