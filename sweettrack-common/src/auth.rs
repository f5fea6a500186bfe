//! Shared-passphrase admin authentication
//!
//! There are no user accounts. The administrator proves knowledge of one
//! shared passphrase and receives an opaque session token. This module holds
//! only pure functions; HTTP wiring lives in the shop crate.

use sha2::{Digest, Sha256};

/// Passphrase used when none is configured
pub const DEFAULT_ADMIN_PASSPHRASE: &str = "cake";

/// SHA-256 digest of a passphrase
pub fn passphrase_digest(passphrase: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hasher.finalize().into()
}

/// Compare a candidate passphrase against the configured digest
///
/// Digests are compared in full without early exit.
pub fn verify_passphrase(candidate: &str, expected_digest: &[u8; 32]) -> bool {
    let candidate_digest = passphrase_digest(candidate);
    candidate_digest
        .iter()
        .zip(expected_digest.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
