//! Wallet state persistence
//!
//! Saves the local key, cosigners and wallet between sessions.

use crate::cosigner::{LocalKey, Signer};
use crate::multisig::{WalletError, WalletService};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Wallet error: {0}")]
    WalletError(#[from] WalletError),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub state_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".nthkey_data"),
            state_file: "state.json".to_string(),
            backup_enabled: true,
            max_backups: 3,
        }
    }
}

/// Serializable snapshot of a [`WalletService`]
#[derive(Debug, Serialize, Deserialize)]
struct ServiceState {
    mnemonic: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    cosigners: Vec<Signer>,
    #[serde(default)]
    wallet: Option<WalletRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WalletRecord {
    threshold: usize,
    created_at: DateTime<Utc>,
}

impl ServiceState {
    fn capture(service: &WalletService) -> Self {
        let local = service.local_key();
        Self {
            mnemonic: local.phrase(),
            name: local.name().to_string(),
            cosigners: service.cosigners().to_vec(),
            wallet: service.wallet().map(|w| WalletRecord {
                threshold: w.threshold(),
                created_at: w.created_at(),
            }),
        }
    }

    fn into_service(self) -> Result<WalletService, StorageError> {
        let local = LocalKey::from_phrase(&self.mnemonic, &self.name)
            .map_err(|e| StorageError::InvalidData(format!("local key: {}", e)))?;
        let wallet = self.wallet.map(|w| (w.threshold, w.created_at));
        WalletService::restore(local, self.cosigners, wallet)
            .map_err(|e| StorageError::InvalidData(e.to_string()))
    }
}

/// Wallet state storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    fn state_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    fn temp_path(&self) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.tmp", self.config.state_file))
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.state_file, index))
    }

    /// Save the service state to disk
    pub fn save(&self, service: &WalletService) -> Result<(), StorageError> {
        let path = self.state_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.temp_path();
        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &ServiceState::capture(service))?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;
        log::debug!("Saved wallet state to {:?}", path);

        Ok(())
    }

    /// Load the service state from disk
    pub fn load(&self) -> Result<WalletService, StorageError> {
        let path = self.state_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "State file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);
        let state: ServiceState = serde_json::from_reader(reader)?;

        state.into_service()
    }

    /// Load saved state, or create and save a new service
    pub fn load_or_create(&self, name: &str) -> Result<WalletService, StorageError> {
        if self.exists() {
            log::info!("Loading wallet state from {:?}", self.state_path());
            return self.load();
        }

        log::info!("Creating new local signer in {:?}", self.config.data_dir);
        let service = WalletService::new(name)?;
        self.save(&service)?;
        Ok(service)
    }

    /// Check if a saved state exists
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }
}
