//! Quest chain instance
//!
//! A `QuestChain` is one governed workflow: its role hierarchy, quest book,
//! soulbound credential and optional limiter. Every mutator takes the
//! caller's [`CallContext`] and returns a [`Receipt`] carrying the events it
//! emitted; a failed call leaves the chain untouched and emits nothing.
//!
//! # Lifecycle
//!
//! ```text
//! new / clone_template ──init──▶ live ──upgrade (factory only)──▶ premium
//! template            (locked, init always fails)
//! ```
//!
//! Premium unlocks `set_token_uri` and `set_limiter`.

use crate::credential::SoulboundCredential;
use crate::limiter::Limiter;
use crate::quests::{Quest, QuestBook};
use crate::roles::RoleHierarchy;
use quest_core::{
    Address, CallContext, ConflictReason, CredentialId, InvalidReason, QuestEvent, QuestFlags,
    QuestId, QuestStatus, Receipt, Result, Role, TokenEffects,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Initial configuration of a chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestChainInfo {
    /// Chain details reference
    pub details: String,
    /// Credential metadata URI
    pub token_uri: String,
    /// Initial OWNER holders; must not be empty
    pub owners: Vec<Address>,
    /// Initial ADMIN holders
    pub admins: Vec<Address>,
    /// Initial EDITOR holders
    pub editors: Vec<Address>,
    /// Initial REVIEWER holders
    pub reviewers: Vec<Address>,
    /// Details of pre-seeded quests
    pub quests: Vec<String>,
    /// Start paused
    pub paused: bool,
}

/// One quest chain
#[derive(Debug)]
pub struct QuestChain {
    address: Address,
    factory: Address,
    initialized: bool,
    details: String,
    paused: bool,
    premium: bool,
    roles: RoleHierarchy,
    quests: QuestBook,
    credential: SoulboundCredential,
    limiter: Option<Arc<dyn Limiter>>,
}

impl QuestChain {
    /// Uninitialised chain at `address`, owned by `factory`
    pub fn new(address: Address, factory: Address, credential_id: CredentialId) -> Self {
        Self {
            address,
            factory,
            initialized: false,
            details: String::new(),
            paused: false,
            premium: false,
            roles: RoleHierarchy::new(),
            quests: QuestBook::new(),
            credential: SoulboundCredential::new(credential_id),
            limiter: None,
        }
    }

    /// Locked template instance; it can never be initialised
    pub fn template(address: Address, factory: Address) -> Self {
        let mut chain = Self::new(address, factory, 0);
        chain.initialized = true;
        chain
    }

    /// Fresh uninitialised instance sharing this template's factory
    pub fn clone_template(&self, address: Address, credential_id: CredentialId) -> Self {
        Self::new(address, self.factory, credential_id)
    }

    /// One-time initialisation from `info`
    ///
    /// Grants owners, admins, editors and reviewers their roles (cascading),
    /// seeds quests with ids `0..n` and optionally starts paused.
    pub fn init(&mut self, ctx: &CallContext, info: QuestChainInfo) -> Result<Receipt> {
        if self.initialized {
            return Err(ConflictReason::AlreadyInitialized.into());
        }
        if info.owners.is_empty() {
            return Err(InvalidReason::NoOwners.into());
        }

        let grants = [
            (Role::Owner, &info.owners),
            (Role::Admin, &info.admins),
            (Role::Editor, &info.editors),
            (Role::Reviewer, &info.reviewers),
        ];
        let mut events = Vec::new();
        for (role, accounts) in grants {
            for &account in accounts {
                events.extend(self.roles.grant_unchecked(ctx.caller, role, account));
            }
        }

        self.quests.create(info.quests.clone());
        self.details = info.details.clone();
        self.credential.set_uri(info.token_uri);
        self.initialized = true;
        if info.paused {
            self.paused = true;
            events.push(QuestEvent::Paused {
                account: ctx.caller,
            });
        }

        debug!(
            chain = %self.address,
            owners = info.owners.len(),
            quests = info.quests.len(),
            paused = info.paused,
            "Quest chain initialised"
        );
        events.push(QuestEvent::QuestChainInit {
            details: info.details,
            quests: info.quests,
            paused: info.paused,
        });
        Ok(Receipt::from_events(events))
    }

    // Reads

    /// Chain address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Factory allowed to upgrade this chain
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Whether `init` has run (always true for a template)
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Chain details reference
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Credential metadata URI
    pub fn token_uri(&self) -> &str {
        self.credential.uri()
    }

    /// Credential id unique to this chain
    pub fn credential_id(&self) -> CredentialId {
        self.credential.id()
    }

    /// Whether submissions are blocked chain-wide
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Whether the chain has been upgraded
    pub fn premium(&self) -> bool {
        self.premium
    }

    /// Attached limiter
    pub fn limiter(&self) -> Option<&Arc<dyn Limiter>> {
        self.limiter.as_ref()
    }

    /// Role holder sets
    pub fn roles(&self) -> &RoleHierarchy {
        &self.roles
    }

    /// Whether `account` holds `role`
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.roles.has_role(role, account)
    }

    /// Number of quests
    pub fn quest_count(&self) -> u64 {
        self.quests.count()
    }

    /// Quest definition by id
    pub fn quest_details(&self, quest_id: QuestId) -> Result<&Quest> {
        self.quests.quest(quest_id)
    }

    /// Submission status of `quester` on `quest_id`
    pub fn quest_status(&self, quester: Address, quest_id: QuestId) -> Result<QuestStatus> {
        self.quests.status(quester, quest_id)
    }

    /// Whether `holder` owns this chain's credential
    pub fn has_credential(&self, holder: Address) -> bool {
        self.credential.is_held_by(holder)
    }

    /// Credentials in circulation
    pub fn credential_supply(&self) -> u64 {
        self.credential.supply()
    }

    // Roles

    /// Grant `role` and every role below it to `account`
    pub fn grant_role(&mut self, ctx: &CallContext, role: Role, account: Address) -> Result<Receipt> {
        let events = self.roles.grant_role(ctx.caller, role, account)?;
        debug!(chain = %self.address, %role, account = %account, granted = events.len(), "Role granted");
        Ok(Receipt::from_events(events))
    }

    /// Revoke `role` and every role above it from `account`
    pub fn revoke_role(&mut self, ctx: &CallContext, role: Role, account: Address) -> Result<Receipt> {
        let events = self.roles.revoke_role(ctx.caller, role, account)?;
        debug!(chain = %self.address, %role, account = %account, revoked = events.len(), "Role revoked");
        Ok(Receipt::from_events(events))
    }

    /// Drop `role` and every role above it from the caller
    pub fn renounce_role(&mut self, ctx: &CallContext, role: Role) -> Result<Receipt> {
        let events = self.roles.renounce_role(ctx.caller, role);
        debug!(chain = %self.address, %role, account = %ctx.caller, "Role renounced");
        Ok(Receipt::from_events(events))
    }

    // Administration

    /// Replace the chain details (ADMIN)
    pub fn edit(&mut self, ctx: &CallContext, details: String) -> Result<Receipt> {
        self.roles.check_role(Role::Admin, ctx.caller)?;
        self.details = details.clone();
        debug!(chain = %self.address, editor = %ctx.caller, "Chain details edited");
        Ok(Receipt::from_events(vec![QuestEvent::QuestChainEdited {
            editor: ctx.caller,
            details,
        }]))
    }

    /// Block submissions chain-wide (ADMIN)
    pub fn pause(&mut self, ctx: &CallContext) -> Result<Receipt> {
        self.roles.check_role(Role::Admin, ctx.caller)?;
        if self.paused {
            return Err(ConflictReason::ChainPaused.into());
        }
        self.paused = true;
        debug!(chain = %self.address, account = %ctx.caller, "Chain paused");
        Ok(Receipt::from_events(vec![QuestEvent::Paused {
            account: ctx.caller,
        }]))
    }

    /// Allow submissions again (ADMIN)
    pub fn unpause(&mut self, ctx: &CallContext) -> Result<Receipt> {
        self.roles.check_role(Role::Admin, ctx.caller)?;
        if !self.paused {
            return Err(ConflictReason::ChainNotPaused.into());
        }
        self.paused = false;
        debug!(chain = %self.address, account = %ctx.caller, "Chain unpaused");
        Ok(Receipt::from_events(vec![QuestEvent::Unpaused {
            account: ctx.caller,
        }]))
    }

    /// Replace the credential metadata URI (ADMIN, premium)
    pub fn set_token_uri(&mut self, ctx: &CallContext, uri: String) -> Result<Receipt> {
        self.roles.check_role(Role::Admin, ctx.caller)?;
        self.require_premium()?;
        self.credential.set_uri(uri.clone());
        debug!(chain = %self.address, uri = %uri, "Token URI set");
        Ok(Receipt::from_events(vec![QuestEvent::TokenUriSet {
            uri,
            credential_id: self.credential.id(),
        }]))
    }

    /// Attach or detach the submission limiter (ADMIN, premium)
    pub fn set_limiter(
        &mut self,
        ctx: &CallContext,
        limiter: Option<Arc<dyn Limiter>>,
    ) -> Result<Receipt> {
        self.roles.check_role(Role::Admin, ctx.caller)?;
        self.require_premium()?;
        let address = limiter.as_ref().map(|l| l.address());
        self.limiter = limiter;
        debug!(chain = %self.address, limiter = ?address, "Limiter set");
        Ok(Receipt::from_events(vec![QuestEvent::SetLimiter {
            limiter: address,
        }]))
    }

    /// Mark the chain premium; only the owning factory may call this
    pub fn upgrade(&mut self, ctx: &CallContext) -> Result<()> {
        if ctx.caller != self.factory {
            return Err(ConflictReason::NotFactory.into());
        }
        if self.premium {
            return Err(ConflictReason::AlreadyUpgraded.into());
        }
        self.premium = true;
        debug!(chain = %self.address, "Chain marked premium");
        Ok(())
    }

    fn require_premium(&self) -> Result<()> {
        if self.premium {
            Ok(())
        } else {
            Err(ConflictReason::NotPremium.into())
        }
    }

    // Quests

    /// Append quests (EDITOR); output is the first assigned id
    pub fn create_quests(&mut self, ctx: &CallContext, details: Vec<String>) -> Result<Receipt<QuestId>> {
        self.roles.check_role(Role::Editor, ctx.caller)?;
        let first_id = self.quests.create(details.clone());
        debug!(chain = %self.address, first_id, count = details.len(), "Quests created");
        Ok(Receipt::new(
            first_id,
            vec![QuestEvent::QuestsCreated {
                creator: ctx.caller,
                first_id,
                details,
            }],
        ))
    }

    /// Replace quest details (EDITOR)
    pub fn edit_quests(
        &mut self,
        ctx: &CallContext,
        quest_ids: Vec<QuestId>,
        details: Vec<String>,
    ) -> Result<Receipt> {
        self.roles.check_role(Role::Editor, ctx.caller)?;
        self.quests.edit(&quest_ids, &details)?;
        debug!(chain = %self.address, count = quest_ids.len(), "Quests edited");
        Ok(Receipt::from_events(vec![QuestEvent::QuestsEdited {
            editor: ctx.caller,
            quest_ids,
            details,
        }]))
    }

    /// Replace quest flags (EDITOR)
    pub fn configure_quests(
        &mut self,
        ctx: &CallContext,
        quest_ids: Vec<QuestId>,
        flags: Vec<QuestFlags>,
    ) -> Result<Receipt> {
        self.roles.check_role(Role::Editor, ctx.caller)?;
        self.quests.configure(&quest_ids, &flags)?;
        debug!(chain = %self.address, count = quest_ids.len(), "Quests configured");
        Ok(Receipt::from_events(vec![QuestEvent::ConfiguredQuests {
            editor: ctx.caller,
            quest_ids,
            flags,
        }]))
    }

    /// Submit proofs for the caller
    ///
    /// The batch is validated in full, then the attached limiter (if any)
    /// is consulted, then statuses are recorded.
    pub fn submit_proofs(
        &mut self,
        ctx: &CallContext,
        quest_ids: Vec<QuestId>,
        proofs: Vec<String>,
        tokens: &mut dyn TokenEffects,
    ) -> Result<Receipt> {
        if self.paused {
            return Err(ConflictReason::ChainPaused.into());
        }
        self.quests.check_submission(ctx.caller, &quest_ids, &proofs)?;
        if let Some(limiter) = &self.limiter {
            limiter.check(self.address, ctx.caller, tokens)?;
        }
        self.quests.apply_submission(ctx.caller, &quest_ids);
        debug!(chain = %self.address, quester = %ctx.caller, count = quest_ids.len(), "Proofs submitted");
        Ok(Receipt::from_events(vec![QuestEvent::QuestProofsSubmitted {
            quester: ctx.caller,
            quest_ids,
            proofs,
        }]))
    }

    /// Settle submissions (REVIEWER)
    pub fn review_proofs(
        &mut self,
        ctx: &CallContext,
        questers: Vec<Address>,
        quest_ids: Vec<QuestId>,
        success: Vec<bool>,
        details: Vec<String>,
    ) -> Result<Receipt> {
        self.roles.check_role(Role::Reviewer, ctx.caller)?;
        self.quests.review(&questers, &quest_ids, &success, &details)?;
        debug!(chain = %self.address, reviewer = %ctx.caller, count = quest_ids.len(), "Proofs reviewed");
        Ok(Receipt::from_events(vec![QuestEvent::QuestProofsReviewed {
            reviewer: ctx.caller,
            questers,
            quest_ids,
            success,
            details,
        }]))
    }

    // Credential

    /// Mint the caller's credential once every quest is passed, optional or paused
    pub fn mint_credential(&mut self, ctx: &CallContext) -> Result<Receipt> {
        self.quests.check_complete(ctx.caller)?;
        self.credential.mint(ctx.caller)?;
        debug!(chain = %self.address, holder = %ctx.caller, "Credential minted");
        Ok(Receipt::from_events(vec![QuestEvent::CredentialMinted {
            chain: self.address,
            holder: ctx.caller,
            credential_id: self.credential.id(),
        }]))
    }

    /// Burn the caller's credential
    pub fn burn_credential(&mut self, ctx: &CallContext) -> Result<Receipt> {
        self.credential.burn(ctx.caller)?;
        debug!(chain = %self.address, holder = %ctx.caller, "Credential burned");
        Ok(Receipt::from_events(vec![QuestEvent::CredentialBurned {
            chain: self.address,
            holder: ctx.caller,
            credential_id: self.credential.id(),
        }]))
    }

    /// Always fails: credentials are soulbound
    pub fn transfer_credential(&mut self, ctx: &CallContext, to: Address) -> Result<Receipt> {
        self.credential.transfer(ctx.caller, to)?;
        Ok(Receipt::from_events(Vec::new()))
    }

    /// Always fails: credentials are soulbound
    pub fn approve_credential(&mut self, ctx: &CallContext, operator: Address) -> Result<Receipt> {
        self.credential.approve(ctx.caller, operator)?;
        Ok(Receipt::from_events(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quest_core::{QuestError, Timestamp};

    fn factory() -> Address {
        Address::derive(b"factory")
    }

    fn owner() -> Address {
        Address::derive(b"owner")
    }

    fn ctx(caller: Address) -> CallContext {
        CallContext::new(caller, Timestamp::from_secs(1_000))
    }

    fn info() -> QuestChainInfo {
        QuestChainInfo {
            details: "ipfs://chain".into(),
            token_uri: "ipfs://token".into(),
            owners: vec![owner()],
            quests: vec!["q0".into(), "q1".into()],
            ..Default::default()
        }
    }

    fn live_chain() -> QuestChain {
        let mut chain = QuestChain::new(Address::derive(b"chain"), factory(), 1);
        chain.init(&ctx(factory()), info()).unwrap();
        chain
    }

    #[test]
    fn test_init_grants_cascade_and_seeds_quests() {
        let mut chain = QuestChain::new(Address::derive(b"chain"), factory(), 1);
        let editor = Address::derive(b"editor");
        let receipt = chain
            .init(
                &ctx(factory()),
                QuestChainInfo {
                    editors: vec![editor],
                    ..info()
                },
            )
            .unwrap();

        for role in Role::ALL {
            assert!(chain.has_role(role, owner()));
        }
        assert!(chain.has_role(Role::Reviewer, editor));
        assert!(!chain.has_role(Role::Admin, editor));
        assert_eq!(chain.quest_count(), 2);
        assert_eq!(chain.token_uri(), "ipfs://token");
        assert_eq!(receipt.event_names().last(), Some(&"QuestChainInit"));
        assert_eq!(
            receipt.event_names().iter().filter(|n| **n == "RoleGranted").count(),
            6
        );
    }

    #[test]
    fn test_init_twice_fails() {
        let mut chain = live_chain();
        assert_matches!(
            chain.init(&ctx(factory()), info()),
            Err(QuestError::Conflict(ConflictReason::AlreadyInitialized))
        );
    }

    #[test]
    fn test_template_is_locked() {
        let mut template = QuestChain::template(Address::derive(b"template"), factory());
        assert_matches!(
            template.init(&ctx(factory()), info()),
            Err(QuestError::Conflict(ConflictReason::AlreadyInitialized))
        );
        let clone = template.clone_template(Address::derive(b"clone"), 3);
        assert!(!clone.is_initialized());
        assert_eq!(clone.factory(), factory());
        assert_eq!(clone.credential_id(), 3);
    }

    #[test]
    fn test_init_requires_owner() {
        let mut chain = QuestChain::new(Address::derive(b"chain"), factory(), 1);
        let empty = QuestChainInfo {
            owners: vec![],
            ..info()
        };
        assert_matches!(
            chain.init(&ctx(factory()), empty),
            Err(QuestError::Invalid(InvalidReason::NoOwners))
        );
        assert!(!chain.is_initialized());
    }

    #[test]
    fn test_init_paused_emits_paused() {
        let mut chain = QuestChain::new(Address::derive(b"chain"), factory(), 1);
        let receipt = chain
            .init(
                &ctx(factory()),
                QuestChainInfo {
                    paused: true,
                    ..info()
                },
            )
            .unwrap();
        assert!(chain.paused());
        assert!(receipt.event_names().contains(&"Paused"));
    }

    #[test]
    fn test_pause_follows_pausable_semantics() {
        let mut chain = live_chain();
        chain.pause(&ctx(owner())).unwrap();
        assert_matches!(
            chain.pause(&ctx(owner())),
            Err(QuestError::Conflict(ConflictReason::ChainPaused))
        );
        chain.unpause(&ctx(owner())).unwrap();
        assert_matches!(
            chain.unpause(&ctx(owner())),
            Err(QuestError::Conflict(ConflictReason::ChainNotPaused))
        );
    }

    #[test]
    fn test_pause_requires_admin() {
        let mut chain = live_chain();
        let stranger = Address::derive(b"stranger");
        assert_matches!(
            chain.pause(&ctx(stranger)),
            Err(QuestError::MissingRole { role: Role::Admin, .. })
        );
        assert!(!chain.paused());
    }

    #[test]
    fn test_premium_gates_token_uri() {
        let mut chain = live_chain();
        assert_matches!(
            chain.set_token_uri(&ctx(owner()), "ipfs://new".into()),
            Err(QuestError::Conflict(ConflictReason::NotPremium))
        );
        chain.upgrade(&ctx(factory())).unwrap();
        let receipt = chain.set_token_uri(&ctx(owner()), "ipfs://new".into()).unwrap();
        assert_eq!(chain.token_uri(), "ipfs://new");
        assert_matches!(
            receipt.events.as_slice(),
            [QuestEvent::TokenUriSet { credential_id: 1, .. }]
        );
    }

    #[test]
    fn test_token_uri_checks_role_before_premium() {
        let mut chain = live_chain();
        let stranger = Address::derive(b"stranger");
        assert_matches!(
            chain.set_token_uri(&ctx(stranger), "x".into()),
            Err(QuestError::MissingRole { role: Role::Admin, .. })
        );
    }

    #[test]
    fn test_only_factory_upgrades_once() {
        let mut chain = live_chain();
        assert_matches!(
            chain.upgrade(&ctx(owner())),
            Err(QuestError::Conflict(ConflictReason::NotFactory))
        );
        chain.upgrade(&ctx(factory())).unwrap();
        assert!(chain.premium());
        assert_matches!(
            chain.upgrade(&ctx(factory())),
            Err(QuestError::Conflict(ConflictReason::AlreadyUpgraded))
        );
    }

    #[test]
    fn test_edit_requires_admin() {
        let mut chain = live_chain();
        let editor = Address::derive(b"editor");
        chain.grant_role(&ctx(owner()), Role::Editor, editor).unwrap();
        assert_matches!(
            chain.edit(&ctx(editor), "nope".into()),
            Err(QuestError::MissingRole { role: Role::Admin, .. })
        );
        chain.edit(&ctx(owner()), "ipfs://v2".into()).unwrap();
        assert_eq!(chain.details(), "ipfs://v2");
    }

    #[test]
    fn test_create_quests_returns_first_id() {
        let mut chain = live_chain();
        let receipt = chain
            .create_quests(&ctx(owner()), vec!["q2".into(), "q3".into()])
            .unwrap();
        assert_eq!(receipt.output, 2);
        assert_eq!(chain.quest_count(), 4);
        assert_eq!(chain.quest_details(3).unwrap().details, "q3");
    }

    #[test]
    fn test_reviewer_cannot_create_quests() {
        let mut chain = live_chain();
        let reviewer = Address::derive(b"reviewer");
        chain.grant_role(&ctx(owner()), Role::Reviewer, reviewer).unwrap();
        assert_matches!(
            chain.create_quests(&ctx(reviewer), vec!["x".into()]),
            Err(QuestError::MissingRole { role: Role::Editor, .. })
        );
        assert_eq!(chain.quest_count(), 2);
    }

    #[test]
    fn test_renounce_acts_on_caller() {
        let mut chain = live_chain();
        let receipt = chain.renounce_role(&ctx(owner()), Role::Owner).unwrap();
        assert_eq!(receipt.event_names(), vec!["RoleRevoked"]);
        assert!(!chain.has_role(Role::Owner, owner()));
        assert!(chain.has_role(Role::Admin, owner()));
    }

    #[test]
    fn test_credential_is_soulbound() {
        let mut chain = live_chain();
        let other = Address::derive(b"other");
        assert_matches!(
            chain.transfer_credential(&ctx(owner()), other),
            Err(QuestError::Conflict(ConflictReason::Soulbound))
        );
        assert_matches!(
            chain.approve_credential(&ctx(owner()), other),
            Err(QuestError::Conflict(ConflictReason::Soulbound))
        );
    }
}
