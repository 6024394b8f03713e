//! Soulbound completion credential
//!
//! One credential id per chain; each holder owns either zero or one unit.
//! Units never move between holders: transfer and approval always fail, and
//! only the holder can burn its own unit.

use quest_core::{Address, ConflictReason, CredentialId, Result};
use std::collections::BTreeSet;

/// Credential ledger for one chain
#[derive(Debug, Clone)]
pub struct SoulboundCredential {
    id: CredentialId,
    uri: String,
    holders: BTreeSet<Address>,
}

impl SoulboundCredential {
    /// Empty ledger for `id`
    pub fn new(id: CredentialId) -> Self {
        Self {
            id,
            uri: String::new(),
            holders: BTreeSet::new(),
        }
    }

    /// Credential id
    pub fn id(&self) -> CredentialId {
        self.id
    }

    /// Metadata URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub(crate) fn set_uri(&mut self, uri: String) {
        self.uri = uri;
    }

    /// Whether `holder` currently owns a unit
    pub fn is_held_by(&self, holder: Address) -> bool {
        self.holders.contains(&holder)
    }

    /// Units in circulation
    pub fn supply(&self) -> u64 {
        self.holders.len() as u64
    }

    /// Issue one unit to `holder`
    pub fn mint(&mut self, holder: Address) -> Result<()> {
        if !self.holders.insert(holder) {
            return Err(ConflictReason::AlreadyMinted.into());
        }
        Ok(())
    }

    /// Destroy `holder`'s unit
    pub fn burn(&mut self, holder: Address) -> Result<()> {
        if !self.holders.remove(&holder) {
            return Err(ConflictReason::NoCredential.into());
        }
        Ok(())
    }

    /// Transfers are not supported
    pub fn transfer(&mut self, _from: Address, _to: Address) -> Result<()> {
        Err(ConflictReason::Soulbound.into())
    }

    /// Approvals are not supported
    pub fn approve(&mut self, _owner: Address, _operator: Address) -> Result<()> {
        Err(ConflictReason::Soulbound.into())
    }
}
