//! Wallet lifecycle
//!
//! `WalletService` owns the local key, the cosigner registry and the
//! optional wallet. It moves between two states:
//!
//! - **Empty**: no wallet; cosigners may be added or wiped.
//! - **Active**: a wallet exists; the registry is frozen.
//!
//! Every failed operation leaves the service exactly as it was.

use chrono::{DateTime, Utc};

use crate::cosigner::{CosignerRegistry, LocalKey, Signer};
use crate::export::KeyExport;
use crate::multisig::threshold::{proposed_signer_count, validate_threshold};
use crate::multisig::wallet::{Wallet, WalletError};

#[derive(Clone, Debug)]
pub struct WalletService {
    local: LocalKey,
    registry: CosignerRegistry,
    wallet: Option<Wallet>,
}

impl WalletService {
    /// Create a service with a freshly generated local key
    pub fn new(name: &str) -> Result<Self, WalletError> {
        Ok(Self::from_local_key(LocalKey::generate(name)?))
    }

    /// Create an empty service around an existing local key
    pub fn from_local_key(local: LocalKey) -> Self {
        let registry = CosignerRegistry::new(local.signer());
        log::info!("Local signer {}", local.fingerprint());
        Self {
            local,
            registry,
            wallet: None,
        }
    }

    /// Rebuild a service from saved parts
    ///
    /// Cosigners go through the same checks as [`add_cosigner`](Self::add_cosigner)
    /// and a saved wallet must still satisfy the threshold rule.
    pub fn restore(
        local: LocalKey,
        cosigners: Vec<Signer>,
        wallet: Option<(usize, DateTime<Utc>)>,
    ) -> Result<Self, WalletError> {
        let mut service = Self::from_local_key(local);
        for cosigner in cosigners {
            service.registry.add_cosigner(cosigner)?;
        }
        if let Some((threshold, created_at)) = wallet {
            service.activate(threshold, created_at)?;
        }
        Ok(service)
    }

    pub fn local_key(&self) -> &LocalKey {
        &self.local
    }

    /// The local signer ("us")
    pub fn us(&self) -> &Signer {
        self.registry.us()
    }

    pub fn local_fingerprint_hex(&self) -> String {
        self.us().fingerprint_hex()
    }

    // ------------------------------------------------------------------
    // Cosigners
    // ------------------------------------------------------------------

    pub fn add_cosigner(&mut self, signer: Signer) -> Result<(), WalletError> {
        let label = signer.display_label();
        self.registry.add_cosigner(signer)?;
        log::info!("Added cosigner {}", label);
        Ok(())
    }

    /// Parse an exchange document and add the signer it describes
    pub fn import_cosigner(&mut self, bytes: &[u8]) -> Result<Signer, WalletError> {
        let signer = KeyExport::parse(bytes)?.into_signer();
        self.add_cosigner(signer.clone())?;
        Ok(signer)
    }

    pub fn remove_all_cosigners(&mut self) -> Result<(), WalletError> {
        let count = self.registry.cosigner_count();
        self.registry.remove_all_cosigners()?;
        log::info!("Removed {} cosigner(s)", count);
        Ok(())
    }

    pub fn cosigners(&self) -> &[Signer] {
        self.registry.cosigners()
    }

    pub fn has_cosigners(&self) -> bool {
        self.registry.has_cosigners()
    }

    /// (fingerprint hex, name) pairs in insertion order
    pub fn cosigner_display(&self) -> Vec<(String, String)> {
        self.cosigners()
            .iter()
            .map(|c| (c.fingerprint_hex(), c.name.clone()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Wallet
    // ------------------------------------------------------------------

    /// Whether `create_wallet(threshold)` would succeed
    pub fn can_create_wallet(&self, threshold: usize) -> bool {
        self.wallet.is_none() && validate_threshold(threshold, self.registry.cosigner_count())
    }

    /// Caption for the create action, e.g. "Create 2 of 3 wallet"
    pub fn create_caption(&self, threshold: usize) -> String {
        format!(
            "Create {} of {} wallet",
            threshold,
            proposed_signer_count(self.registry.cosigner_count())
        )
    }

    /// Freeze the current signers into an M-of-N wallet
    pub fn create_wallet(&mut self, threshold: usize) -> Result<Wallet, WalletError> {
        self.activate(threshold, Utc::now())?;
        let wallet = self.wallet.as_ref().ok_or(WalletError::NoActiveWallet)?;
        log::info!("Created {} wallet {}", wallet.description(), wallet.id());
        Ok(wallet.clone())
    }

    fn activate(&mut self, threshold: usize, created_at: DateTime<Utc>) -> Result<(), WalletError> {
        if self.wallet.is_some() {
            return Err(WalletError::WalletAlreadyActive);
        }
        let cosigners = self.registry.cosigner_count();
        if !validate_threshold(threshold, cosigners) {
            return Err(WalletError::InvalidThreshold {
                threshold,
                cosigners,
            });
        }

        self.wallet = Some(Wallet::new(
            threshold,
            self.registry.all_signers(),
            self.local.phrase(),
            created_at,
        ));
        self.registry.freeze();
        Ok(())
    }

    /// Destroy the wallet and return to Empty
    ///
    /// Cosigners are cleared, not restored. The local key is kept.
    pub fn wipe_wallet(&mut self) -> Result<(), WalletError> {
        let wallet = self.wallet.take().ok_or(WalletError::NoActiveWallet)?;
        self.registry.reset();
        log::info!("Wiped {} wallet {}", wallet.description(), wallet.id());
        Ok(())
    }

    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    /// Threshold of the active wallet
    pub fn threshold(&self) -> Option<usize> {
        self.wallet.as_ref().map(Wallet::threshold)
    }

    // ------------------------------------------------------------------
    // Export and disclosure
    // ------------------------------------------------------------------

    /// Exchange document for the local signer
    pub fn export_public_key(&self) -> Result<Vec<u8>, WalletError> {
        KeyExport::from_local_key(&self.local).encode()
    }

    /// Exchange document as text, for QR rendering
    pub fn export_public_key_text(&self) -> Result<String, WalletError> {
        KeyExport::from_local_key(&self.local).to_text()
    }

    /// Recovery phrase of the active wallet
    pub fn reveal_mnemonic(&self) -> Result<String, WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::NoActiveWallet)?;
        log::warn!("Recovery phrase disclosed for wallet {}", wallet.id());
        Ok(wallet.mnemonic().to_string())
    }
}
