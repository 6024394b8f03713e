//! Deterministic test identities

use ed25519_dalek::SigningKey;
use quest_core::{hash, Address, CallContext, Permit, PermitDomain, Timestamp};

/// Signing key plus the address it controls
#[derive(Debug, Clone)]
pub struct TestIdentity {
    key: SigningKey,
    address: Address,
}

impl TestIdentity {
    /// Identity whose key is derived from `seed`
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&seed);
        let address = Address::from_verifying_key(&key.verifying_key());
        Self { key, address }
    }

    /// Identity whose key is derived from a label
    pub fn named(label: &str) -> Self {
        Self::from_seed(hash(label.as_bytes()))
    }

    /// Controlled address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Call context for this identity at `now`
    pub fn at(&self, now: Timestamp) -> CallContext {
        CallContext::new(self.address, now)
    }

    /// Encoded permit signature
    pub fn sign_permit(&self, domain: &PermitDomain, permit: &Permit) -> Vec<u8> {
        permit.sign(domain, &self.key).to_vec()
    }
}
