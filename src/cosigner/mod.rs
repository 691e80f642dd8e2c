//! Signer identities and the cosigner registry

pub mod fingerprint;
pub mod registry;
pub mod signer;

pub use fingerprint::{Fingerprint, ParseFingerprintError, FINGERPRINT_LEN};
pub use registry::CosignerRegistry;
pub use signer::{LocalKey, Signer};
