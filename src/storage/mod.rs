//! Storage module for wallet state persistence

pub mod persistence;

pub use persistence::{Storage, StorageConfig, StorageError};
