//! Pure synchronous hashing for content addressing
//!
//! Hashing is deterministic and side-effect free, so it is a plain function
//! rather than an effect. Address derivation, chain address prediction and
//! permit digests all go through this module.
//!
//! Current algorithm: **SHA-256** (32-byte output)
//!
//! ```rust
//! use quest_core::crypto::hash::{hash, hasher};
//!
//! let mut h = hasher();
//! h.update(b"hello");
//! h.update(b" world");
//! assert_eq!(h.finalize(), hash(b"hello world"));
//! ```

use sha2::{Digest, Sha256};

/// 32-byte digest
pub type Hash32 = [u8; 32];

/// Hash arbitrary bytes to a 32-byte digest
pub fn hash(data: &[u8]) -> Hash32 {
    let mut h = hasher();
    h.update(data);
    h.finalize()
}

/// Create an incremental hasher
pub fn hasher() -> Hasher {
    Hasher(Sha256::new())
}

/// Incremental hasher for multi-part input
#[derive(Debug, Clone, Default)]
pub struct Hasher(Sha256);

impl Hasher {
    /// Feed more data
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Feed a length-prefixed field so adjacent fields cannot run together
    pub fn update_field(&mut self, data: &[u8]) {
        self.0.update((data.len() as u64).to_be_bytes());
        self.0.update(data);
    }

    /// Consume the hasher and return the digest
    pub fn finalize(self) -> Hash32 {
        let result = self.0.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        output
    }
}
