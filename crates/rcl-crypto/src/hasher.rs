use sha2::{Digest, Sha256};

use rcl_types::ChainHash;

/// Domain-separated SHA-256 hasher.
///
/// Each hasher carries a domain tag that is prepended to every computation,
/// so an authoritative block and an offline block with identical payload
/// bytes can never collide.
pub struct BlockHasher {
    domain: &'static str,
}

impl BlockHasher {
    /// Hasher for authoritative resource-chain blocks.
    pub const BLOCK: Self = Self {
        domain: "rcl-block-v1",
    };
    /// Hasher for session-scoped offline blocks.
    pub const OFFLINE: Self = Self {
        domain: "rcl-offline-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash_bytes(&self, data: &[u8]) -> ChainHash {
        let mut hasher = Sha256::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ChainHash::from_digest(hasher.finalize().into())
    }

    /// Hash a serializable value through its canonical JSON bytes.
    pub fn hash_value<T: serde::Serialize>(&self, value: &T) -> Result<ChainHash, CryptoError> {
        let data =
            serde_json::to_vec(value).map_err(|e| CryptoError::Serialization(e.to_string()))?;
        Ok(self.hash_bytes(&data))
    }

    /// Verify that a value reproduces the expected digest.
    pub fn verify<T: serde::Serialize>(
        &self,
        value: &T,
        expected: &ChainHash,
    ) -> Result<bool, CryptoError> {
        Ok(self.hash_value(value)? == *expected)
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"120kg rice, warehouse A";
        assert_eq!(
            BlockHasher::BLOCK.hash_bytes(data),
            BlockHasher::BLOCK.hash_bytes(data)
        );
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        assert_ne!(
            BlockHasher::BLOCK.hash_bytes(data),
            BlockHasher::OFFLINE.hash_bytes(data)
        );
    }

    #[test]
    fn digest_is_sha256_of_tagged_bytes() {
        let mut reference = Sha256::new();
        reference.update(b"rcl-block-v1:payload");
        let expected: [u8; 32] = reference.finalize().into();
        assert_eq!(
            BlockHasher::BLOCK.hash_bytes(b"payload"),
            ChainHash::from_digest(expected)
        );
    }

    #[test]
    fn hex_digest_is_64_chars() {
        let hash = BlockHasher::BLOCK.hash_bytes(b"anything");
        assert_eq!(hash.to_hex().len(), 64);
    }

    #[test]
    fn verify_detects_changed_value() {
        let value = serde_json::json!({"quantity": 10});
        let hash = BlockHasher::BLOCK.hash_value(&value).unwrap();
        assert!(BlockHasher::BLOCK.verify(&value, &hash).unwrap());
        let tampered = serde_json::json!({"quantity": 11});
        assert!(!BlockHasher::BLOCK.verify(&tampered, &hash).unwrap());
    }

    #[test]
    fn custom_domain() {
        let hasher = BlockHasher::new("rcl-experimental-v1");
        assert_ne!(
            hasher.hash_bytes(b"data"),
            BlockHasher::BLOCK.hash_bytes(b"data")
        );
    }
}
