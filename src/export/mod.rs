//! Key exchange format shared between cosigners

pub mod key_export;

pub use key_export::KeyExport;
