//! BIP-39 mnemonic phrases and the seeds derived from them

use bip39::Mnemonic;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// PBKDF2 rounds shared by BIP-39 and Substrate seeds
const PBKDF2_ROUNDS: u32 = 2048;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }
}

fn parse(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_normalized(phrase.trim()).map_err(|e| Error::Mnemonic(e.to_string()))
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    let mut entropy = Zeroizing::new(vec![0u8; strength.entropy_bytes()]);
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy(&entropy).map_err(|e| Error::Mnemonic(e.to_string()))?;

    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase: known words, valid length and checksum
pub fn validate_mnemonic(phrase: &str) -> Result<bool> {
    parse(phrase).map(|_| true)
}

/// Whether a phrase is a valid mnemonic, without the error detail
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    parse(phrase).is_ok()
}

/// BIP-39 seed (64 bytes) from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Zeroizing<Vec<u8>>> {
    let mnemonic = parse(phrase)?;

    let seed = Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or("")));
    Ok(Zeroizing::new(seed.to_vec()))
}

/// Substrate seed (64 bytes) from a mnemonic phrase and optional passphrase
///
/// Unlike BIP-39 this stretches the mnemonic's entropy rather than its text.
/// The first 32 bytes are the sr25519 mini-secret.
pub fn mnemonic_to_substrate_seed(
    phrase: &str,
    passphrase: Option<&str>,
) -> Result<Zeroizing<[u8; 64]>> {
    let mnemonic = parse(phrase)?;
    let entropy = Zeroizing::new(mnemonic.to_entropy());
    let salt = Zeroizing::new(format!("mnemonic{}", passphrase.unwrap_or("")));

    let mut seed = Zeroizing::new([0u8; 64]);
    pbkdf2_hmac::<Sha512>(&entropy, salt.as_bytes(), PBKDF2_ROUNDS, seed.as_mut_slice());
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        for (strength, words) in [(MnemonicStrength::Words12, 12), (MnemonicStrength::Words24, 24)] {
            let mnemonic = generate_mnemonic(strength).unwrap();
            assert!(validate_mnemonic(&mnemonic).unwrap());
            assert_eq!(mnemonic.split_whitespace().count(), words);
        }
    }

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";
        let bad_checksum = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";

        assert!(validate_mnemonic(ABANDON).unwrap());
        assert!(validate_mnemonic(invalid).is_err());
        assert!(!is_valid_mnemonic(bad_checksum));
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let seed = mnemonic_to_seed(ABANDON, None).unwrap();
        // BIP-39 reference vector, empty passphrase
        assert_eq!(
            hex::encode(&seed[..]),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_substrate_seed_differs_from_bip39() {
        let bip39 = mnemonic_to_seed(ABANDON, None).unwrap();
        let substrate = mnemonic_to_substrate_seed(ABANDON, None).unwrap();
        assert_ne!(&bip39[..], &substrate[..]);

        let with_password = mnemonic_to_substrate_seed(ABANDON, Some("secret")).unwrap();
        assert_ne!(&substrate[..], &with_password[..]);
    }
}
