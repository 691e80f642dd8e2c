//! NthKey: multi-signature wallet setup in Rust
//!
//! This crate provides the coordination core behind setting up an M-of-N
//! Bitcoin wallet:
//! - BIP-39 local signer key with a BIP-32 fingerprint identity
//! - Cosigner registry with fingerprint uniqueness and insertion order
//! - Threshold validation (`2 <= M <= cosigners + 1`)
//! - Wallet lifecycle (Empty <-> Active) with a frozen signer set
//! - Public key export / cosigner import in a JSON exchange format
//! - Guarded recovery phrase disclosure
//! - JSON persistence, a CLI and a REST API
//!
//! # Example
//!
//! ```rust
//! use nthkey::multisig::WalletService;
//!
//! let mut alice = WalletService::new("Alice").unwrap();
//! let bob = WalletService::new("Bob").unwrap();
//!
//! // Alice imports Bob's announced key
//! let announcement = bob.export_public_key().unwrap();
//! alice.import_cosigner(&announcement).unwrap();
//!
//! let wallet = alice.create_wallet(2).unwrap();
//! assert_eq!(wallet.description(), "2-of-2");
//! assert!(!alice.reveal_mnemonic().unwrap().is_empty());
//! ```

pub mod api;
pub mod cli;
pub mod cosigner;
pub mod crypto;
pub mod export;
pub mod multisig;
pub mod storage;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use cosigner::{CosignerRegistry, Fingerprint, LocalKey, Signer};
pub use export::KeyExport;
pub use multisig::{validate_threshold, Wallet, WalletError, WalletService};
pub use storage::{Storage, StorageConfig};
