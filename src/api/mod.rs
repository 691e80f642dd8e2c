//! REST API module
//!
//! Exposes the wallet service over HTTP behind a single-writer lock.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/status` - Local signer, cosigners and wallet
//!
//! ## Cosigners
//! - `GET /api/cosigners` - List cosigners
//! - `POST /api/cosigners` - Import a cosigner (exchange document as body)
//! - `DELETE /api/cosigners` - Wipe cosigners
//!
//! ## Wallet
//! - `GET /api/wallet` - Active wallet
//! - `POST /api/wallet` - Create wallet (`{"threshold": 2}`)
//! - `DELETE /api/wallet` - Wipe wallet
//! - `GET /api/wallet/preview?threshold=N` - Caption and whether creation is allowed
//!
//! ## Keys
//! - `GET /api/export` - Our public key exchange document
//! - `POST /api/mnemonic/reveal` - Disclose the recovery phrase

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::create_router;
