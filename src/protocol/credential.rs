//! One-way credential transform for the remote setting command
//!
//! The bridge expects `base64(sha256(utf8(password)))`.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Hash a password the way the bridge expects it
pub fn hash_password(password: &str) -> String {
    BASE64_STANDARD.encode(Sha256::digest(password.as_bytes()))
}

/// Hash a password off the actor thread
///
/// Resolves to `None` only if the hashing task itself died; callers then
/// simply never send. There is no timeout.
pub async fn hash_password_async(password: String) -> Option<String> {
    match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(hash) => Some(hash),
        Err(e) => {
            debug!(error = %e, "Credential hashing task did not complete");
            None
        },
    }
}
