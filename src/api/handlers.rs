//! REST API handlers for wallet setup
//!
//! All mutations take the write lock on the service, so at most one is in
//! flight. A mutation is applied to a copy of the service and only replaces
//! the shared one after the copy has been saved.

use crate::cosigner::Signer;
use crate::multisig::{Wallet, WalletError, WalletService};
use crate::storage::Storage;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<RwLock<WalletService>>,
    pub storage: Arc<Storage>,
}

impl ApiState {
    pub fn new(service: WalletService, storage: Storage) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            storage: Arc::new(storage),
        }
    }
}

type ApiFailure = (StatusCode, Json<ApiError>);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SignerInfo {
    pub fingerprint: String,
    pub name: String,
    pub public_key: Option<String>,
}

impl From<&Signer> for SignerInfo {
    fn from(signer: &Signer) -> Self {
        Self {
            fingerprint: signer.fingerprint_hex(),
            name: signer.name.clone(),
            public_key: signer.public_key.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WalletInfo {
    pub id: String,
    pub threshold: usize,
    pub signer_count: usize,
    pub description: String,
    pub signers: Vec<SignerInfo>,
    pub created_at: String,
}

impl From<&Wallet> for WalletInfo {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: wallet.id(),
            threshold: wallet.threshold(),
            signer_count: wallet.signer_count(),
            description: wallet.description(),
            signers: wallet.signers().iter().map(SignerInfo::from).collect(),
            created_at: wallet.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub us: SignerInfo,
    pub cosigners: Vec<SignerInfo>,
    pub has_cosigners: bool,
    pub has_wallet: bool,
    pub threshold: Option<usize>,
    pub wallet: Option<WalletInfo>,
}

impl From<&WalletService> for StatusResponse {
    fn from(service: &WalletService) -> Self {
        Self {
            us: SignerInfo::from(service.us()),
            cosigners: service.cosigners().iter().map(SignerInfo::from).collect(),
            has_cosigners: service.has_cosigners(),
            has_wallet: service.has_wallet(),
            threshold: service.threshold(),
            wallet: service.wallet().map(WalletInfo::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub threshold: usize,
    pub caption: String,
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct MnemonicResponse {
    pub mnemonic: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    pub threshold: usize,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub threshold: usize,
}

// ============================================================================
// Error mapping
// ============================================================================

fn wallet_failure(e: WalletError) -> ApiFailure {
    let status = match e {
        WalletError::DuplicateFingerprint(_) | WalletError::WalletAlreadyActive => {
            StatusCode::CONFLICT
        }
        WalletError::InvalidThreshold { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WalletError::NoActiveWallet => StatusCode::NOT_FOUND,
        WalletError::ImportParseError(_) => StatusCode::BAD_REQUEST,
        WalletError::CryptoError(_) | WalletError::SerializationError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiError { error: e.to_string() }))
}

fn persist(state: &ApiState, service: &WalletService) -> Result<(), ApiFailure> {
    state.storage.save(service).map_err(|e| {
        log::warn!("Failed to save wallet state: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("Failed to save wallet state: {}", e),
            }),
        )
    })
}

/// Run `op` on a copy of the service and commit it once it is on disk
fn apply<T>(
    state: &ApiState,
    service: &mut WalletService,
    op: impl FnOnce(&mut WalletService) -> Result<T, WalletError>,
) -> Result<T, ApiFailure> {
    let mut next = service.clone();
    let out = op(&mut next).map_err(wallet_failure)?;
    persist(state, &next)?;
    *service = next;
    Ok(out)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/status - Signers and wallet state
pub async fn get_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let service = state.service.read().await;
    Json(StatusResponse::from(&*service))
}

/// GET /api/cosigners - Cosigners in insertion order
pub async fn list_cosigners(State(state): State<ApiState>) -> Json<Vec<SignerInfo>> {
    let service = state.service.read().await;
    Json(service.cosigners().iter().map(SignerInfo::from).collect())
}

/// POST /api/cosigners - Import a cosigner from an exchange document
pub async fn add_cosigner(
    State(state): State<ApiState>,
    body: String,
) -> Result<Json<SignerInfo>, ApiFailure> {
    let mut service = state.service.write().await;
    let signer = apply(&state, &mut service, |s| s.import_cosigner(body.as_bytes()))?;

    Ok(Json(SignerInfo::from(&signer)))
}

/// DELETE /api/cosigners - Wipe cosigners
pub async fn wipe_cosigners(
    State(state): State<ApiState>,
) -> Result<Json<StatusResponse>, ApiFailure> {
    let mut service = state.service.write().await;
    apply(&state, &mut service, WalletService::remove_all_cosigners)?;

    Ok(Json(StatusResponse::from(&*service)))
}

/// GET /api/wallet/preview?threshold=N - Whether a wallet can be created
pub async fn preview_wallet(
    State(state): State<ApiState>,
    Query(query): Query<PreviewQuery>,
) -> Json<PreviewResponse> {
    let service = state.service.read().await;
    Json(PreviewResponse {
        threshold: query.threshold,
        caption: service.create_caption(query.threshold),
        allowed: service.can_create_wallet(query.threshold),
    })
}

/// GET /api/wallet - Active wallet
pub async fn get_wallet(State(state): State<ApiState>) -> Result<Json<WalletInfo>, ApiFailure> {
    let service = state.service.read().await;
    service
        .wallet()
        .map(|w| Json(WalletInfo::from(w)))
        .ok_or_else(|| wallet_failure(WalletError::NoActiveWallet))
}

/// POST /api/wallet - Create the wallet
pub async fn create_wallet(
    State(state): State<ApiState>,
    Json(req): Json<CreateWalletRequest>,
) -> Result<Json<WalletInfo>, ApiFailure> {
    let mut service = state.service.write().await;
    let wallet = apply(&state, &mut service, |s| s.create_wallet(req.threshold))?;

    Ok(Json(WalletInfo::from(&wallet)))
}

/// DELETE /api/wallet - Wipe the wallet
pub async fn wipe_wallet(
    State(state): State<ApiState>,
) -> Result<Json<StatusResponse>, ApiFailure> {
    let mut service = state.service.write().await;
    apply(&state, &mut service, WalletService::wipe_wallet)?;

    Ok(Json(StatusResponse::from(&*service)))
}

/// GET /api/export - Our public key exchange document
pub async fn export_key(
    State(state): State<ApiState>,
) -> Result<([(header::HeaderName, &'static str); 1], String), ApiFailure> {
    let service = state.service.read().await;
    let text = service.export_public_key_text().map_err(wallet_failure)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], text))
}

/// POST /api/mnemonic/reveal - Disclose the recovery phrase
pub async fn reveal_mnemonic(
    State(state): State<ApiState>,
) -> Result<Json<MnemonicResponse>, ApiFailure> {
    let service = state.service.read().await;
    let mnemonic = service.reveal_mnemonic().map_err(wallet_failure)?;
    Ok(Json(MnemonicResponse { mnemonic }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageConfig;

    fn test_state(dir: &tempfile::TempDir) -> ApiState {
        let storage = Storage::new(StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap();
        ApiState::new(WalletService::new("server").unwrap(), storage)
    }

    fn cosigner_doc(name: &str) -> String {
        WalletService::new(name)
            .unwrap()
            .export_public_key_text()
            .unwrap()
    }

    #[tokio::test]
    async fn test_cosigner_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let doc = cosigner_doc("Alice");

        let Json(info) = add_cosigner(State(state.clone()), doc.clone())
            .await
            .unwrap();
        assert_eq!(info.name, "Alice");

        let (status, _) = add_cosigner(State(state.clone()), doc).await.unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = add_cosigner(State(state.clone()), "nope".into())
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let Json(list) = list_cosigners(State(state.clone())).await;
        assert_eq!(list.len(), 1);

        let Json(status) = wipe_cosigners(State(state.clone())).await.unwrap();
        assert!(!status.has_cosigners);
        assert!(state.storage.exists());
    }

    #[tokio::test]
    async fn test_wallet_lifecycle_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        add_cosigner(State(state.clone()), cosigner_doc("A"))
            .await
            .unwrap();
        add_cosigner(State(state.clone()), cosigner_doc("B"))
            .await
            .unwrap();

        let Json(preview) =
            preview_wallet(State(state.clone()), Query(PreviewQuery { threshold: 4 })).await;
        assert!(!preview.allowed);
        assert_eq!(preview.caption, "Create 4 of 3 wallet");

        let (status, _) = reveal_mnemonic(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = create_wallet(
            State(state.clone()),
            Json(CreateWalletRequest { threshold: 4 }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let Json(wallet) = create_wallet(
            State(state.clone()),
            Json(CreateWalletRequest { threshold: 2 }),
        )
        .await
        .unwrap();
        assert_eq!(wallet.description, "2-of-3");

        let (status, _) = wipe_cosigners(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);

        let Json(phrase) = reveal_mnemonic(State(state.clone())).await.unwrap();
        assert_eq!(phrase.mnemonic.split_whitespace().count(), 24);

        let Json(status) = wipe_wallet(State(state.clone())).await.unwrap();
        assert!(!status.has_wallet);
        assert!(status.cosigners.is_empty());
        assert!(get_wallet(State(state)).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let doc = cosigner_doc("Alice");

        std::fs::remove_dir_all(dir.path()).unwrap();
        let (status, _) = add_cosigner(State(state.clone()), doc.clone())
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!state.service.read().await.has_cosigners());

        std::fs::create_dir_all(dir.path()).unwrap();
        add_cosigner(State(state.clone()), doc).await.unwrap();
        add_cosigner(State(state.clone()), cosigner_doc("Bob"))
            .await
            .unwrap();

        std::fs::remove_dir_all(dir.path()).unwrap();
        let (status, _) = create_wallet(
            State(state.clone()),
            Json(CreateWalletRequest { threshold: 2 }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!state.service.read().await.has_wallet());

        std::fs::create_dir_all(dir.path()).unwrap();
        create_wallet(
            State(state.clone()),
            Json(CreateWalletRequest { threshold: 2 }),
        )
        .await
        .unwrap();

        std::fs::remove_dir_all(dir.path()).unwrap();
        let (status, _) = wipe_wallet(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let service = state.service.read().await;
        assert!(service.has_wallet());
        assert_eq!(service.cosigners().len(), 2);
    }

    #[tokio::test]
    async fn test_export_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (_, text) = export_key(State(state.clone())).await.unwrap();
        let doc = crate::export::KeyExport::parse(text.as_bytes()).unwrap();
        assert_eq!(doc.xfp, state.service.read().await.us().fingerprint);
    }
}
