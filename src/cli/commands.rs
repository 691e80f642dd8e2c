//! CLI commands for the wallet
//!
//! Implements all command handlers for the CLI interface.

use crate::multisig::WalletService;
use crate::storage::{Storage, StorageConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub service: WalletService,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load existing state from the data directory
    pub fn load(data_dir: PathBuf) -> CliResult<Self> {
        let storage = open_storage(&data_dir)?;
        if !storage.exists() {
            return Err(format!(
                "no wallet state in {:?}; run `nthkey init` first",
                data_dir
            )
            .into());
        }
        let service = storage.load()?;

        Ok(Self {
            service,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.service)?;
        Ok(())
    }
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(config)?)
}

/// Create the local signer
pub fn cmd_init(data_dir: &Path, name: Option<&str>) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() {
        println!("⚠️  Wallet state already exists at {:?}", data_dir);
        return Ok(());
    }

    let service = storage.load_or_create(name.unwrap_or(""))?;

    println!("✅ Local signer created!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🔑 Fingerprint: {}", service.local_fingerprint_hex());

    Ok(())
}

/// Show signers and wallet status
pub fn cmd_status(state: &AppState) -> CliResult<()> {
    let service = &state.service;

    println!("👥 Cosigners");
    if !service.has_wallet() {
        println!("   Add cosigners by importing their public key.");
    }
    println!("   * {} (us)", service.us().display_label());
    for cosigner in service.cosigners() {
        println!("   * {}", cosigner.display_label());
    }

    match service.wallet() {
        Some(wallet) => {
            println!("\n🔐 Wallet {}", wallet.id());
            println!("   ├─ Threshold: {}", wallet.description());
            println!(
                "   └─ Created: {}",
                wallet.created_at().format("%Y-%m-%d %H:%M:%S")
            );
        }
        None => {
            println!("\n📭 No wallet yet.");
        }
    }

    Ok(())
}

/// Import a cosigner from an exchange file
pub fn cmd_cosigner_add(state: &mut AppState, file: &Path) -> CliResult<()> {
    let bytes = fs::read(file)?;
    let signer = state.service.import_cosigner(&bytes)?;
    state.save()?;

    println!("➕ Added cosigner {}", signer.display_label());
    Ok(())
}

/// Remove every cosigner
pub fn cmd_cosigner_wipe(state: &mut AppState) -> CliResult<()> {
    state.service.remove_all_cosigners()?;
    state.save()?;

    println!("🧹 Cosigners wiped");
    Ok(())
}

/// Create an M-of-N wallet
pub fn cmd_wallet_create(state: &mut AppState, threshold: usize) -> CliResult<()> {
    println!("🛠️  {}", state.service.create_caption(threshold));

    let wallet = state.service.create_wallet(threshold)?;
    state.save()?;

    println!("✅ Wallet {} created ({})", wallet.id(), wallet.description());
    Ok(())
}

/// Destroy the wallet
pub fn cmd_wallet_wipe(state: &mut AppState) -> CliResult<()> {
    state.service.wipe_wallet()?;
    state.save()?;

    println!("🗑️  Wallet wiped");
    Ok(())
}

/// Export our public key, to a file or stdout
pub fn cmd_export(state: &AppState, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, state.service.export_public_key()?)?;
            println!("📦 Public key exported to {:?}", path);
        }
        None => {
            println!("{}", state.service.export_public_key_text()?);
        }
    }
    Ok(())
}

/// Show the recovery phrase
pub fn cmd_mnemonic(state: &AppState) -> CliResult<()> {
    let phrase = state.service.reveal_mnemonic()?;

    println!("📝 BIP 39 mnemonic");
    for (i, word) in phrase.split_whitespace().enumerate() {
        println!("   {:>2}. {}", i + 1, word);
    }
    println!("\n   ⚠️  Anyone with these words controls your key.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::KeyExport;

    #[test]
    fn test_init_then_flow() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        assert!(AppState::load(data_dir.clone()).is_err());
        cmd_init(&data_dir, Some("laptop")).unwrap();

        let mut state = AppState::load(data_dir.clone()).unwrap();
        let other = WalletService::new("Alice").unwrap();
        let file = temp_dir.path().join("alice.json");
        fs::write(&file, other.export_public_key().unwrap()).unwrap();

        cmd_cosigner_add(&mut state, &file).unwrap();
        assert!(cmd_cosigner_add(&mut state, &file).is_err());
        assert!(cmd_wallet_create(&mut state, 3).is_err());
        cmd_wallet_create(&mut state, 2).unwrap();
        cmd_mnemonic(&state).unwrap();

        let reloaded = AppState::load(data_dir).unwrap();
        assert_eq!(reloaded.service.threshold(), Some(2));
        assert_eq!(reloaded.service.us().name, "laptop");
    }

    #[test]
    fn test_export_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().to_path_buf();
        cmd_init(&data_dir, None).unwrap();
        let state = AppState::load(data_dir).unwrap();

        let out = temp_dir.path().join("us.json");
        cmd_export(&state, Some(out.as_path())).unwrap();

        let doc = KeyExport::parse(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc.xfp, state.service.us().fingerprint);
    }
}
