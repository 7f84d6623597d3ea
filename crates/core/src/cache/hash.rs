//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const KEY_LEN: usize = 64;

/// Compute the cache key for a canonical request string.
pub fn compute_cache_key(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `key` has the shape produced by [`compute_cache_key`].
///
/// Keys become file names, so anything else is rejected before it reaches
/// the filesystem.
pub fn is_valid_key(key: &str) -> bool {
    key.len() == KEY_LEN && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("https://example.com/api/models?plan=Pro%2B");
        let hash2 = compute_cache_key("https://example.com/api/models?plan=Pro%2B");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_query() {
        let hash1 = compute_cache_key("https://example.com/api/models?plan=Free");
        let hash2 = compute_cache_key("https://example.com/api/models?plan=Pro%2B");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("https://example.com/api/models");
        assert_eq!(hash.len(), KEY_LEN);
        assert!(is_valid_key(&hash));
    }

    #[test]
    fn test_is_valid_key_rejects_paths() {
        assert!(!is_valid_key("../../etc/passwd"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(&"A".repeat(KEY_LEN)));
        assert!(!is_valid_key(&"a".repeat(KEY_LEN + 1)));
    }
}
