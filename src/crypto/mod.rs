//! Cryptographic utilities for signer keys
//!
//! This module provides:
//! - SHA-256 and hash160 hashing
//! - secp256k1 key pairs and BIP-32 fingerprints
//! - BIP-39 mnemonic generation and master key derivation

pub mod hash;
pub mod keys;
pub mod mnemonic;

pub use hash::{hash160, sha256};
pub use keys::{key_fingerprint, public_key_from_hex, KeyError, KeyPair};
pub use mnemonic::{generate_mnemonic, master_key_pair, parse_mnemonic, seed_to_master_secret};
