//! BIP-39 recovery phrases and BIP-32 master key derivation

use bip39::{Language, Mnemonic};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;
use zeroize::Zeroize;

use super::keys::{KeyError, KeyPair};

/// Generate a new random 24-word BIP-39 mnemonic
///
/// Entropy is zeroized once the phrase has been built.
pub fn generate_mnemonic() -> Result<Mnemonic, KeyError> {
    let mut entropy = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut entropy);
    let result = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()));
    entropy.zeroize();
    result
}

/// Parse mnemonic from space-separated words (checksum and wordlist)
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic, KeyError> {
    Mnemonic::parse_in(Language::English, words)
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))
}

/// Derive the master secret from a BIP-39 seed
///
/// Follows BIP-32: HMAC-SHA512("Bitcoin seed", seed), left half.
pub fn seed_to_master_secret(seed: &[u8; 64]) -> Result<[u8; 32], KeyError> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|e| KeyError::DerivationFailed(e.to_string()))?;
    hmac.update(seed);
    let result = hmac.finalize().into_bytes();

    let mut master = [0u8; 32];
    master.copy_from_slice(&result[..32]);
    Ok(master)
}

/// Master key pair for a mnemonic with an empty passphrase
pub fn master_key_pair(mnemonic: &Mnemonic) -> Result<KeyPair, KeyError> {
    let mut seed = mnemonic.to_seed("");
    let master = seed_to_master_secret(&seed);
    seed.zeroize();
    let mut master = master?;
    let key_pair = KeyPair::from_secret_bytes(&master);
    master.zeroize();
    key_pair
}
