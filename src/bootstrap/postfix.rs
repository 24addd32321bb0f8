//! Deterministic resource postfix

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest
pub const POSTFIX_LEN: usize = 16;

/// Seed identifying one deployment of one repository
pub fn deployment_seed(repo: &str, branch: &str) -> String {
    format!("{repo}/{branch}")
}

/// First 16 hex characters of SHA-256(`seed`)
pub fn derive_postfix(seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    let mut postfix = hex::encode(hasher.finalize());
    postfix.truncate(POSTFIX_LEN);
    postfix
}
