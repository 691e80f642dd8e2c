//! Threshold validation for M-of-N wallets

/// Smallest threshold a multisig wallet may use
pub const MIN_THRESHOLD: usize = 2;

/// Check whether `threshold` is legal with `cosigner_count` remote cosigners
///
/// The local signer always counts towards N, so the upper bound is
/// `cosigner_count + 1`.
pub fn validate_threshold(threshold: usize, cosigner_count: usize) -> bool {
    threshold >= MIN_THRESHOLD && threshold <= cosigner_count.saturating_add(1)
}

/// N shown for a proposed wallet, never below [`MIN_THRESHOLD`]
pub fn proposed_signer_count(cosigner_count: usize) -> usize {
    MIN_THRESHOLD.max(cosigner_count.saturating_add(1))
}
