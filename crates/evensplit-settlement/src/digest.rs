//! Result digests for reproducibility checks.
//!
//! Running the pipeline twice on the same input must give the same result.
//! The digest is a SHA-256 over the canonical JSON form of a
//! [`CalculationResults`]; every map in it is ordered, so two runs over the
//! same input serialize byte for byte the same.
//!
//! Amounts are hashed as written, scale included. `1.0` and `1` compare
//! equal as [`Decimal`](rust_decimal::Decimal) but give different digests,
//! so the digest tracks the serialized form rather than `==`.

use evensplit_types::{CalculationResults, Result, constants};
use sha2::{Digest, Sha256};

/// SHA-256 digest of a result set.
pub fn compute_results_digest(results: &CalculationResults) -> Result<[u8; 32]> {
    let encoded = serde_json::to_vec(results)?;
    let mut hasher = Sha256::new();
    hasher.update(constants::RESULT_DIGEST_DOMAIN);
    hasher.update((encoded.len() as u64).to_le_bytes());
    hasher.update(&encoded);
    Ok(hasher.finalize().into())
}

/// Hex-encoded [`compute_results_digest`].
pub fn results_digest_hex(results: &CalculationResults) -> Result<String> {
    compute_results_digest(results).map(hex::encode)
}

/// Recompute the digest and compare it with `expected`.
pub fn verify_results_digest(results: &CalculationResults, expected: &[u8; 32]) -> Result<bool> {
    Ok(compute_results_digest(results)? == *expected)
}
