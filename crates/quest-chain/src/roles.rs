//! Role hierarchy engine
//!
//! Each chain keeps one holder set per role tier, stored in rank order. The
//! implication "higher role ⇒ every lower role" is kept true in the sets
//! themselves:
//!
//! - granting a role inserts the holder into that tier and every tier below
//! - revoking a role removes the holder from that tier and every tier above
//!
//! Only tiers that actually change emit an event, so repeated grants and
//! revokes are idempotent. Grants emit lowest tier first; revokes emit from
//! the target tier upward.

use quest_core::{Address, QuestError, QuestEvent, Result, Role};
use std::collections::BTreeSet;

/// Holder sets for every role tier of one chain
#[derive(Debug, Clone, Default)]
pub struct RoleHierarchy {
    tiers: [BTreeSet<Address>; 4],
}

impl RoleHierarchy {
    /// Empty hierarchy
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `account` holds `role`
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.tiers[role.rank()].contains(&account)
    }

    /// Fail with `MissingRole` unless `account` holds `role`
    pub fn check_role(&self, role: Role, account: Address) -> Result<()> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(QuestError::missing_role(account, role))
        }
    }

    /// Holders of `role`, in address order
    pub fn holders(&self, role: Role) -> impl Iterator<Item = &Address> {
        self.tiers[role.rank()].iter()
    }

    /// Number of holders of `role`
    pub fn holder_count(&self, role: Role) -> usize {
        self.tiers[role.rank()].len()
    }

    /// Grant `role` (and every role below it) to `account`
    ///
    /// `sender` must hold the role that administers `role`.
    pub fn grant_role(
        &mut self,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Result<Vec<QuestEvent>> {
        self.check_role(role.admin_role(), sender)?;
        Ok(self.grant_unchecked(sender, role, account))
    }

    /// Revoke `role` (and every role above it) from `account`
    ///
    /// `sender` must hold the role that administers `role`.
    pub fn revoke_role(
        &mut self,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Result<Vec<QuestEvent>> {
        self.check_role(role.admin_role(), sender)?;
        Ok(self.revoke_unchecked(sender, role, account))
    }

    /// Drop `role` (and every role above it) from the caller itself
    pub fn renounce_role(&mut self, sender: Address, role: Role) -> Vec<QuestEvent> {
        self.revoke_unchecked(sender, role, sender)
    }

    /// Cascading grant without the administering-role check
    pub(crate) fn grant_unchecked(
        &mut self,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Vec<QuestEvent> {
        role.at_or_below()
            .iter()
            .filter(|tier| self.tiers[tier.rank()].insert(account))
            .map(|&tier| QuestEvent::RoleGranted {
                role: tier,
                account,
                sender,
            })
            .collect()
    }

    fn revoke_unchecked(&mut self, sender: Address, role: Role, account: Address) -> Vec<QuestEvent> {
        role.at_or_above()
            .iter()
            .filter(|tier| self.tiers[tier.rank()].remove(&account))
            .map(|&tier| QuestEvent::RoleRevoked {
                role: tier,
                account,
                sender,
            })
            .collect()
    }
}
