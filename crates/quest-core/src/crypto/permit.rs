//! Delegated-signature payment authorisation (permits)
//!
//! A permit lets a token owner authorise a spender off-line: the owner signs
//! `(owner, spender, value, nonce, deadline)` under the token's domain, and
//! anyone may submit the signature in place of a prior allowance.
//!
//! # Digest layout
//!
//! ```text
//! domain  = H("QuestPermitDomain" ‖ name ‖ version ‖ token)
//! message = H("Permit" ‖ owner ‖ spender ‖ value ‖ nonce ‖ deadline)
//! digest  = H(0x19 0x01 ‖ domain ‖ message)
//! ```
//!
//! Every field is length-prefixed. Owners are ed25519 keys; the owner
//! address must equal `Address::from_verifying_key` of the signing key.

use crate::crypto::hash::{hasher, Hash32};
use crate::effects::token::TokenError;
use crate::identifiers::Address;
use crate::time::Timestamp;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Version string carried in every permit domain
pub const PERMIT_VERSION: &str = "1";

/// Signing domain of one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitDomain {
    /// Token name
    pub name: String,
    /// Domain version
    pub version: String,
    /// Token address (the verifying contract)
    pub token: Address,
}

impl PermitDomain {
    /// Domain for a token using the current version
    pub fn new(name: impl Into<String>, token: Address) -> Self {
        Self {
            name: name.into(),
            version: PERMIT_VERSION.to_string(),
            token,
        }
    }

    /// Domain separator digest
    pub fn separator(&self) -> Hash32 {
        let mut h = hasher();
        h.update_field(b"QuestPermitDomain");
        h.update_field(self.name.as_bytes());
        h.update_field(self.version.as_bytes());
        h.update_field(self.token.as_bytes());
        h.finalize()
    }
}

/// Signed spending authorisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    /// Token holder granting the allowance
    pub owner: Address,
    /// Party allowed to pull
    pub spender: Address,
    /// Allowance granted
    pub value: u128,
    /// Owner's current permit nonce
    pub nonce: u64,
    /// Last valid execution time
    pub deadline: Timestamp,
}

impl Permit {
    /// Digest the owner signs
    pub fn digest(&self, domain: &PermitDomain) -> Hash32 {
        let mut message = hasher();
        message.update_field(b"Permit");
        message.update_field(self.owner.as_bytes());
        message.update_field(self.spender.as_bytes());
        message.update_field(&self.value.to_be_bytes());
        message.update_field(&self.nonce.to_be_bytes());
        message.update_field(&self.deadline.as_secs().to_be_bytes());
        let message = message.finalize();

        let mut h = hasher();
        h.update(&[0x19, 0x01]);
        h.update(&domain.separator());
        h.update(&message);
        h.finalize()
    }

    /// Whether the deadline has passed at `now`
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.deadline
    }

    /// Sign this permit with the owner's key
    pub fn sign(&self, domain: &PermitDomain, key: &SigningKey) -> PermitSignature {
        let signature = key.sign(&self.digest(domain));
        PermitSignature {
            public_key: key.verifying_key().to_bytes(),
            signature: signature.to_bytes(),
        }
    }
}

/// Owner public key plus ed25519 signature over a permit digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitSignature {
    /// Owner verifying key
    pub public_key: [u8; 32],
    /// Signature bytes
    pub signature: [u8; 64],
}

impl PermitSignature {
    /// Encoded length: key followed by signature
    pub const LEN: usize = 96;

    /// Parse `key ‖ signature`; any other length is a bad signature
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.len() != Self::LEN {
            return Err(TokenError::BadSignature);
        }
        let mut public_key = [0u8; 32];
        let mut signature = [0u8; 64];
        public_key.copy_from_slice(&bytes[..32]);
        signature.copy_from_slice(&bytes[32..]);
        Ok(Self {
            public_key,
            signature,
        })
    }

    /// Encode as `key ‖ signature`
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&self.public_key);
        out.extend_from_slice(&self.signature);
        out
    }

    /// Check that this signature authorises `permit` under `domain`
    ///
    /// The key must belong to `permit.owner` and the signature must verify
    /// over the permit digest. Deadline and nonce are the token's concern.
    pub fn verify(&self, domain: &PermitDomain, permit: &Permit) -> Result<(), TokenError> {
        let key =
            VerifyingKey::from_bytes(&self.public_key).map_err(|_| TokenError::BadSignature)?;
        if Address::from_verifying_key(&key) != permit.owner {
            return Err(TokenError::BadSignature);
        }
        let signature = Signature::from_bytes(&self.signature);
        key.verify(&permit.digest(domain), &signature)
            .map_err(|_| TokenError::BadSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn permit_for(key: &SigningKey) -> Permit {
        Permit {
            owner: Address::from_verifying_key(&key.verifying_key()),
            spender: Address::derive(b"factory"),
            value: 10,
            nonce: 0,
            deadline: Timestamp::MAX,
        }
    }

    #[test]
    fn test_signed_permit_verifies() {
        let key = key(1);
        let domain = PermitDomain::new("Mock", Address::derive(b"token"));
        let permit = permit_for(&key);
        let sig = permit.sign(&domain, &key);
        assert_eq!(sig.verify(&domain, &permit), Ok(()));
    }

    #[test]
    fn test_tampered_value_fails() {
        let key = key(2);
        let domain = PermitDomain::new("Mock", Address::derive(b"token"));
        let permit = permit_for(&key);
        let sig = permit.sign(&domain, &key);
        let tampered = Permit {
            value: 11,
            ..permit
        };
        assert_eq!(sig.verify(&domain, &tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_domain_fails() {
        let key = key(3);
        let permit = permit_for(&key);
        let sig = permit.sign(&PermitDomain::new("Mock", Address::derive(b"a")), &key);
        let other = PermitDomain::new("Mock", Address::derive(b"b"));
        assert_eq!(sig.verify(&other, &permit), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_key_must_match_owner() {
        let owner = key(4);
        let intruder = key(5);
        let domain = PermitDomain::new("Mock", Address::derive(b"token"));
        let permit = permit_for(&owner);
        let sig = permit.sign(&domain, &intruder);
        assert_eq!(sig.verify(&domain, &permit), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_from_slice_rejects_empty() {
        assert_eq!(PermitSignature::from_slice(&[]), Err(TokenError::BadSignature));
        let key = key(6);
        let domain = PermitDomain::new("Mock", Address::derive(b"token"));
        let sig = permit_for(&key).sign(&domain, &key);
        assert_eq!(PermitSignature::from_slice(&sig.to_vec()), Ok(sig));
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let permit = Permit {
            deadline: Timestamp::from_secs(100),
            ..permit_for(&key(7))
        };
        assert!(!permit.is_expired(Timestamp::from_secs(100)));
        assert!(permit.is_expired(Timestamp::from_secs(101)));
    }
}
