//! Secret to credential derivation with a single-slot cache.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::sync::{
    RwLock,
    atomic::{AtomicU64, Ordering},
};
use tracing::debug;

use super::compare::constant_time_eq;

/// Lowercase hex SHA-256 of the secret.
#[must_use]
pub fn compute_digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

struct CachedDigest {
    secret: SecretString,
    digest: String,
}

/// Memoizes the digest of the most recently seen secret.
///
/// Lookups compare the requested secret by value against the cached one and
/// recompute on any difference. Concurrent misses may both compute; the last
/// write wins.
#[derive(Default)]
pub struct DigestCache {
    slot: RwLock<Option<CachedDigest>>,
    computations: AtomicU64,
}

impl DigestCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the digest for `secret`, computing it only when the cached slot
    /// holds a different value.
    pub fn digest_of(&self, secret: &SecretString) -> String {
        if let Some(digest) = self.lookup(secret) {
            return digest;
        }

        let digest = compute_digest(secret.expose_secret());
        self.computations.fetch_add(1, Ordering::Relaxed);

        // A poisoned slot only costs a recompute on the next request.
        if let Ok(mut slot) = self.slot.write() {
            debug!("admin secret digest cache refreshed");
            *slot = Some(CachedDigest {
                secret: SecretString::from(secret.expose_secret().to_owned()),
                digest: digest.clone(),
            });
        }

        digest
    }

    /// Number of times the digest has been derived since construction.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    fn lookup(&self, secret: &SecretString) -> Option<String> {
        let slot = self.slot.read().ok()?;
        let cached = slot.as_ref()?;
        constant_time_eq(
            cached.secret.expose_secret().as_bytes(),
            secret.expose_secret().as_bytes(),
        )
        .then(|| cached.digest.clone())
    }
}

impl std::fmt::Debug for DigestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestCache")
            .field("slot", &"***")
            .field("computations", &self.computations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn compute_digest_matches_known_vector() {
        assert_eq!(
            compute_digest("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn digest_is_lowercase_hex_of_fixed_length() {
        let digest = compute_digest("Correct Horse Battery Staple");
        assert_eq!(digest.len(), 64);
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn digest_of_is_deterministic_and_cached() {
        let cache = DigestCache::new();
        let first = cache.digest_of(&secret("s3cret"));
        let second = cache.digest_of(&secret("s3cret"));
        assert_eq!(first, second);
        assert_eq!(first, compute_digest("s3cret"));
        assert_eq!(cache.computations(), 1);
    }

    #[test]
    fn digest_of_recomputes_after_secret_change() {
        let cache = DigestCache::new();
        let old = cache.digest_of(&secret("first-secret"));
        let new = cache.digest_of(&secret("second-secret"));
        assert_ne!(old, new);
        assert_eq!(new, compute_digest("second-secret"));
        assert_eq!(cache.computations(), 2);

        // Rotating back is another change, never a stale hit.
        let back = cache.digest_of(&secret("first-secret"));
        assert_eq!(back, old);
        assert_eq!(cache.computations(), 3);
    }

    #[test]
    fn digest_of_compares_secrets_by_value() {
        let cache = DigestCache::new();
        let owned = String::from("by-value");
        let a = cache.digest_of(&secret(&owned));
        let b = cache.digest_of(&SecretString::from(owned.clone()));
        assert_eq!(a, b);
        assert_eq!(cache.computations(), 1);
    }

    #[test]
    fn concurrent_lookups_agree() {
        let cache = Arc::new(DigestCache::new());
        let expected = compute_digest("shared");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.digest_of(&SecretString::from(String::from("shared")))
                })
            })
            .collect();
        for handle in handles {
            let digest = handle.join().map_err(|_| "thread panicked");
            assert_eq!(digest, Ok(expected.clone()));
        }
        assert!(cache.computations() >= 1);
    }

    #[test]
    fn debug_output_hides_secret() {
        let cache = DigestCache::new();
        cache.digest_of(&secret("do-not-print"));
        let rendered = format!("{cache:?}");
        assert!(!rendered.contains("do-not-print"));
    }
}
