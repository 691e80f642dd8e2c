//! Threshold wallet lifecycle
//!
//! Composes the cosigner registry and threshold validation into a wallet
//! that moves between Empty and Active.
//!
//! # Example
//!
//! ```ignore
//! use nthkey::multisig::WalletService;
//!
//! let mut service = WalletService::new("laptop")?;
//! service.import_cosigner(&std::fs::read("alice.json")?)?;
//! service.import_cosigner(&std::fs::read("bob.json")?)?;
//!
//! // 2-of-3 with the local signer counted in N
//! let wallet = service.create_wallet(2)?;
//! assert_eq!(wallet.description(), "2-of-3");
//! ```

pub mod service;
pub mod threshold;
pub mod wallet;

pub use service::WalletService;
pub use threshold::{proposed_signer_count, validate_threshold, MIN_THRESHOLD};
pub use wallet::{Wallet, WalletError};
