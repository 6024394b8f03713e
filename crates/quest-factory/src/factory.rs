//! Quest chain factory
//!
//! The factory provisions chains from a locked template at addresses derived
//! from a salt, sells the one-time premium upgrade, and governs its own
//! parameters through timelocked proposals.
//!
//! # Address derivation
//!
//! ```text
//! chain = last20(SHA-256("quest-chain/v1" ‖ factory ‖ template ‖ salt))
//! ```
//!
//! `predict_address` and `create` share this derivation. A salt that was
//! already used fails with `SaltReused`; nothing is overwritten.
//!
//! # Atomicity
//!
//! Every operation validates first, performs at most one fallible token
//! effect, and only then mutates the registry. `create_and_upgrade*` stage
//! the new chain off-registry, pull the fee, then register the chain as
//! premium, so either both halves apply or neither does.
//!
//! # Governance
//!
//! | parameter | propose | execute |
//! |---|---|---|
//! | admin | current admin | proposed admin |
//! | upgrade fee | current admin | current admin |
//! | payment token | current admin | current admin |

use crate::config::{ConfigError, FactoryConfig};
use crate::governance::Timelock;
use indexmap::IndexMap;
use quest_chain::{QuestChain, QuestChainInfo};
use quest_core::crypto::hash::hasher;
use quest_core::{
    Address, CallContext, ConflictReason, GovernanceReason, InvalidReason, Permit,
    PermitSignature, QuestError, QuestEvent, Receipt, Result, Salt, Timestamp, TokenEffects,
    TokenError,
};
use tracing::{debug, info, warn};

/// Domain tag for chain address derivation
pub const CHAIN_ADDRESS_DOMAIN: &[u8] = b"quest-chain/v1";

/// Registry of quest chains plus global upgrade parameters
#[derive(Debug)]
pub struct QuestChainFactory {
    address: Address,
    template: QuestChain,
    chains: IndexMap<Address, QuestChain>,
    admin: Address,
    payment_token: Address,
    upgrade_fee: u128,
    admin_change: Timelock<Address>,
    fee_change: Timelock<u128>,
    payment_token_change: Timelock<Address>,
}

impl QuestChainFactory {
    /// Deploy a factory at `address` with a locked template
    ///
    /// The receipt carries the factory and a `FactorySetup` event.
    pub fn deploy(address: Address, config: FactoryConfig) -> Result<Receipt<Self>> {
        if address.is_zero() {
            return Err(InvalidReason::ZeroAddress.into());
        }
        if let Err(ConfigError::Invalid { source, .. }) = config.validate() {
            return Err(source);
        }

        let delay = config.governance_delay_secs;
        let factory = Self {
            address,
            template: QuestChain::template(config.template, address),
            chains: IndexMap::new(),
            admin: config.admin,
            payment_token: config.payment_token,
            upgrade_fee: u128::from(config.upgrade_fee),
            admin_change: Timelock::new(delay),
            fee_change: Timelock::new(delay),
            payment_token_change: Timelock::new(delay),
        };
        info!(
            factory = %address,
            template = %config.template,
            admin = %config.admin,
            upgrade_fee = config.upgrade_fee,
            "Quest chain factory deployed"
        );
        let event = QuestEvent::FactorySetup {
            factory: address,
            template: config.template,
            admin: config.admin,
        };
        Ok(Receipt::new(factory, vec![event]))
    }

    // Reads

    /// Factory address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current admin
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Current payment token
    pub fn payment_token(&self) -> Address {
        self.payment_token
    }

    /// Current upgrade fee
    pub fn upgrade_fee(&self) -> u128 {
        self.upgrade_fee
    }

    /// Locked template chain
    pub fn template(&self) -> &QuestChain {
        &self.template
    }

    /// Number of chains created
    pub fn quest_chain_count(&self) -> u64 {
        self.chains.len() as u64
    }

    /// Address of the chain created `index`-th
    pub fn get_quest_chain_address(&self, index: u64) -> Result<Address> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.chains.get_index(i))
            .map(|(address, _)| *address)
            .ok_or_else(|| InvalidReason::IndexOutOfRange(index).into())
    }

    /// Chain at `address`
    pub fn chain(&self, address: Address) -> Option<&QuestChain> {
        self.chains.get(&address)
    }

    /// Mutable chain at `address`, for calls made directly on the chain
    pub fn chain_mut(&mut self, address: Address) -> Option<&mut QuestChain> {
        self.chains.get_mut(&address)
    }

    /// Chains in creation order
    pub fn chains(&self) -> impl Iterator<Item = &QuestChain> {
        self.chains.values()
    }

    /// Address `create` would assign for `salt`
    pub fn predict_address(&self, salt: Salt) -> Address {
        let mut h = hasher();
        h.update(CHAIN_ADDRESS_DOMAIN);
        h.update(self.address.as_bytes());
        h.update(self.template.address().as_bytes());
        h.update(salt.as_bytes());
        Address::from_digest(&h.finalize())
    }

    /// Nominated admin
    pub fn proposed_admin(&self) -> Option<Address> {
        self.admin_change.proposed_value().copied()
    }

    /// When the admin nomination was made
    pub fn admin_proposal_timestamp(&self) -> Option<Timestamp> {
        self.admin_change.proposed_at()
    }

    /// Proposed upgrade fee
    pub fn proposed_upgrade_fee(&self) -> Option<u128> {
        self.fee_change.proposed_value().copied()
    }

    /// When the fee proposal was made
    pub fn upgrade_fee_proposal_timestamp(&self) -> Option<Timestamp> {
        self.fee_change.proposed_at()
    }

    /// Proposed payment token
    pub fn proposed_payment_token(&self) -> Option<Address> {
        self.payment_token_change.proposed_value().copied()
    }

    /// When the payment token proposal was made
    pub fn payment_token_proposal_timestamp(&self) -> Option<Timestamp> {
        self.payment_token_change.proposed_at()
    }

    /// Governance delay in seconds
    pub fn governance_delay_secs(&self) -> u64 {
        self.admin_change.delay_secs()
    }

    // Provisioning

    /// Create and initialise a chain at the address derived from `salt`
    pub fn create(
        &mut self,
        ctx: &CallContext,
        info: QuestChainInfo,
        salt: Salt,
    ) -> Result<Receipt<Address>> {
        let (chain, events) = self.stage(ctx, info, salt)?;
        Ok(self.register(chain, events))
    }

    /// Create a chain and upgrade it, paying from an existing allowance
    pub fn create_and_upgrade(
        &mut self,
        ctx: &CallContext,
        info: QuestChainInfo,
        salt: Salt,
        tokens: &mut dyn TokenEffects,
    ) -> Result<Receipt<Address>> {
        let (chain, events) = self.stage(ctx, info, salt)?;
        self.pull_fee(ctx, tokens)?;
        self.register_premium(ctx, chain, events)
    }

    /// Create a chain and upgrade it, paying through a signed permit
    pub fn create_and_upgrade_with_permit(
        &mut self,
        ctx: &CallContext,
        info: QuestChainInfo,
        salt: Salt,
        deadline: Timestamp,
        signature: &[u8],
        tokens: &mut dyn TokenEffects,
    ) -> Result<Receipt<Address>> {
        let (chain, events) = self.stage(ctx, info, salt)?;
        self.pull_fee_with_permit(ctx, deadline, signature, tokens)?;
        self.register_premium(ctx, chain, events)
    }

    fn stage(
        &self,
        ctx: &CallContext,
        info: QuestChainInfo,
        salt: Salt,
    ) -> Result<(QuestChain, Vec<QuestEvent>)> {
        let address = self.predict_address(salt);
        if self.chains.contains_key(&address) {
            return Err(ConflictReason::SaltReused.into());
        }
        let credential_id = self.quest_chain_count();
        let mut chain = self.template.clone_template(address, credential_id);
        let receipt = chain.init(&ctx.as_caller(self.address), info)?;
        Ok((chain, receipt.events))
    }

    fn register(&mut self, chain: QuestChain, mut events: Vec<QuestEvent>) -> Receipt<Address> {
        let index = self.quest_chain_count();
        let address = chain.address();
        self.chains.insert(address, chain);
        info!(factory = %self.address, chain = %address, index, "Quest chain created");
        events.push(QuestEvent::QuestChainCreated {
            index,
            chain: address,
        });
        Receipt::new(address, events)
    }

    fn register_premium(
        &mut self,
        ctx: &CallContext,
        mut chain: QuestChain,
        events: Vec<QuestEvent>,
    ) -> Result<Receipt<Address>> {
        chain.upgrade(&ctx.as_caller(self.address))?;
        let mut receipt = self.register(chain, events);
        info!(chain = %receipt.output, sender = %ctx.caller, "Quest chain upgraded");
        receipt.events.push(QuestEvent::QuestChainUpgraded {
            sender: ctx.caller,
            chain: receipt.output,
        });
        Ok(receipt)
    }

    // Premium upgrades

    /// Upgrade `chain` to premium, pulling the fee from the caller's allowance
    pub fn upgrade_quest_chain(
        &mut self,
        ctx: &CallContext,
        chain: Address,
        tokens: &mut dyn TokenEffects,
    ) -> Result<Receipt> {
        self.check_upgradable(chain)?;
        self.pull_fee(ctx, tokens)?;
        self.apply_upgrade(ctx, chain)
    }

    /// Upgrade `chain` to premium, authorising the fee pull with a permit
    ///
    /// `signature` is the caller's encoded [`PermitSignature`] over
    /// `(caller, factory, upgrade_fee, nonce, deadline)` under the payment
    /// token's domain.
    pub fn upgrade_quest_chain_with_permit(
        &mut self,
        ctx: &CallContext,
        chain: Address,
        deadline: Timestamp,
        signature: &[u8],
        tokens: &mut dyn TokenEffects,
    ) -> Result<Receipt> {
        self.check_upgradable(chain)?;
        self.pull_fee_with_permit(ctx, deadline, signature, tokens)?;
        self.apply_upgrade(ctx, chain)
    }

    fn check_upgradable(&self, chain: Address) -> Result<()> {
        let chain = self
            .chains
            .get(&chain)
            .ok_or(InvalidReason::UnknownChain(chain))?;
        if chain.premium() {
            return Err(ConflictReason::AlreadyUpgraded.into());
        }
        Ok(())
    }

    fn apply_upgrade(&mut self, ctx: &CallContext, address: Address) -> Result<Receipt> {
        let factory_ctx = ctx.as_caller(self.address);
        let chain = self
            .chains
            .get_mut(&address)
            .ok_or(InvalidReason::UnknownChain(address))?;
        chain.upgrade(&factory_ctx)?;
        info!(chain = %address, sender = %ctx.caller, "Quest chain upgraded");
        Ok(Receipt::from_events(vec![QuestEvent::QuestChainUpgraded {
            sender: ctx.caller,
            chain: address,
        }]))
    }

    fn pull_fee(&self, ctx: &CallContext, tokens: &mut dyn TokenEffects) -> Result<()> {
        tokens
            .transfer_from(
                self.payment_token,
                self.address,
                ctx.caller,
                self.admin,
                self.upgrade_fee,
            )
            .map_err(|err| {
                warn!(
                    payer = %ctx.caller,
                    token = %self.payment_token,
                    fee = self.upgrade_fee,
                    error = %err,
                    "Upgrade fee pull failed"
                );
                QuestError::from(err)
            })
    }

    /// Verify a permit, then consume it and pull the fee in one token effect
    ///
    /// The token either applies both or neither, so a rejected pull leaves
    /// the caller's nonce and allowance untouched.
    fn pull_fee_with_permit(
        &self,
        ctx: &CallContext,
        deadline: Timestamp,
        signature: &[u8],
        tokens: &mut dyn TokenEffects,
    ) -> Result<()> {
        let token = self.payment_token;
        let signature = PermitSignature::from_slice(signature)?;
        let permit = Permit {
            owner: ctx.caller,
            spender: self.address,
            value: self.upgrade_fee,
            nonce: tokens.nonces(token, ctx.caller)?,
            deadline,
        };
        if permit.is_expired(ctx.now) {
            return Err(TokenError::PermitExpired { deadline }.into());
        }
        let domain = tokens.permit_domain(token)?;
        signature.verify(&domain, &permit)?;

        let available = tokens.balance_of(token, ctx.caller)?;
        if available < self.upgrade_fee {
            warn!(payer = %ctx.caller, available, fee = self.upgrade_fee, "Upgrade fee unaffordable");
            return Err(TokenError::InsufficientBalance {
                needed: self.upgrade_fee,
                available,
            }
            .into());
        }
        tokens
            .transfer_from_with_permit(token, &permit, &signature, self.admin, ctx.now)
            .map_err(|err| {
                warn!(
                    payer = %ctx.caller,
                    token = %token,
                    fee = self.upgrade_fee,
                    error = %err,
                    "Upgrade fee pull failed"
                );
                QuestError::from(err)
            })?;
        debug!(owner = %ctx.caller, nonce = permit.nonce, "Permit consumed");
        Ok(())
    }

    // Governance

    fn require_admin(&self, ctx: &CallContext) -> Result<()> {
        if ctx.caller == self.admin {
            Ok(())
        } else {
            Err(GovernanceReason::NotAdmin.into())
        }
    }

    /// Nominate a new admin (admin only)
    pub fn propose_admin_replace(&mut self, ctx: &CallContext, proposed: Address) -> Result<Receipt> {
        self.require_admin(ctx)?;
        if proposed.is_zero() {
            return Err(InvalidReason::ZeroAddress.into());
        }
        self.admin_change.propose(proposed, ctx.now)?;
        debug!(proposed = %proposed, at = %ctx.now, "Admin replacement proposed");
        Ok(Receipt::from_events(vec![QuestEvent::AdminReplaceProposed {
            proposed,
        }]))
    }

    /// Accept the admin nomination (nominee only, after the delay)
    pub fn execute_admin_replace(&mut self, ctx: &CallContext) -> Result<Receipt> {
        let nominee = self
            .admin_change
            .proposed_value()
            .copied()
            .ok_or(GovernanceReason::NoPendingProposal)?;
        if ctx.caller != nominee {
            return Err(GovernanceReason::NotProposedAdmin.into());
        }
        self.admin = self.admin_change.execute(ctx.now)?;
        info!(admin = %self.admin, "Factory admin replaced");
        Ok(Receipt::from_events(vec![QuestEvent::AdminReplaced {
            admin: self.admin,
        }]))
    }

    /// Propose a new upgrade fee (admin only)
    pub fn propose_upgrade_fee_replace(&mut self, ctx: &CallContext, proposed: u128) -> Result<Receipt> {
        self.require_admin(ctx)?;
        self.fee_change.propose(proposed, ctx.now)?;
        debug!(proposed, at = %ctx.now, "Upgrade fee replacement proposed");
        Ok(Receipt::from_events(vec![QuestEvent::UpgradeFeeReplaceProposed {
            proposed,
        }]))
    }

    /// Apply the proposed upgrade fee (admin only, after the delay)
    pub fn execute_upgrade_fee_replace(&mut self, ctx: &CallContext) -> Result<Receipt> {
        self.require_admin(ctx)?;
        self.upgrade_fee = self.fee_change.execute(ctx.now)?;
        info!(upgrade_fee = self.upgrade_fee, "Upgrade fee replaced");
        Ok(Receipt::from_events(vec![QuestEvent::UpgradeFeeReplaced {
            upgrade_fee: self.upgrade_fee,
        }]))
    }

    /// Propose a new payment token (admin only)
    pub fn propose_payment_token_replace(
        &mut self,
        ctx: &CallContext,
        proposed: Address,
    ) -> Result<Receipt> {
        self.require_admin(ctx)?;
        if proposed.is_zero() {
            return Err(InvalidReason::ZeroAddress.into());
        }
        self.payment_token_change.propose(proposed, ctx.now)?;
        debug!(proposed = %proposed, at = %ctx.now, "Payment token replacement proposed");
        Ok(Receipt::from_events(vec![QuestEvent::PaymentTokenReplaceProposed {
            proposed,
        }]))
    }

    /// Apply the proposed payment token (admin only, after the delay)
    pub fn execute_payment_token_replace(&mut self, ctx: &CallContext) -> Result<Receipt> {
        self.require_admin(ctx)?;
        self.payment_token = self.payment_token_change.execute(ctx.now)?;
        info!(payment_token = %self.payment_token, "Payment token replaced");
        Ok(Receipt::from_events(vec![QuestEvent::PaymentTokenReplaced {
            payment_token: self.payment_token,
        }]))
    }
}
