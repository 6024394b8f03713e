use super::Limiter;
use crate::chain::QuestChain;
use parking_lot::RwLock;
use quest_core::{
    Address, CallContext, ExternalReason, QuestError, QuestEvent, Receipt, Result, Role,
    TokenEffects,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Balance threshold configured for one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDetails {
    /// Token whose balance is consulted
    pub token: Address,
    /// Minimum balance required to submit
    pub min_balance: u128,
}

/// Denies submitters holding less than a per-chain minimum balance
#[derive(Debug)]
pub struct TokenGatedLimiter {
    address: Address,
    details: RwLock<HashMap<Address, GateDetails>>,
}

impl TokenGatedLimiter {
    /// Limiter deployed at `address`
    pub fn new(address: Address) -> Self {
        Self {
            address,
            details: RwLock::new(HashMap::new()),
        }
    }

    /// Record the gate for `chain`; caller must be an ADMIN of the chain
    pub fn add_quest_chain_details(
        &self,
        ctx: &CallContext,
        chain: &QuestChain,
        token: Address,
        min_balance: u128,
    ) -> Result<Receipt> {
        chain.roles().check_role(Role::Admin, ctx.caller)?;
        let details = GateDetails { token, min_balance };
        self.details.write().insert(chain.address(), details);
        debug!(
            limiter = %self.address,
            chain = %chain.address(),
            token = %token,
            min_balance,
            "Token gate configured"
        );
        Ok(Receipt::from_events(vec![QuestEvent::LimiterDetailsAdded {
            limiter: self.address,
            chain: chain.address(),
            token,
            treasury: None,
            amount: min_balance,
            sender: ctx.caller,
        }]))
    }

    /// Gate recorded for `chain`
    pub fn quest_chain_details(&self, chain: Address) -> Option<GateDetails> {
        self.details.read().get(&chain).copied()
    }

    fn limited(&self) -> QuestError {
        ExternalReason::Limited {
            limiter: self.address,
        }
        .into()
    }
}

impl Limiter for TokenGatedLimiter {
    fn address(&self) -> Address {
        self.address
    }

    fn check(
        &self,
        chain: Address,
        submitter: Address,
        tokens: &mut dyn TokenEffects,
    ) -> Result<()> {
        let Some(details) = self.quest_chain_details(chain) else {
            warn!(limiter = %self.address, chain = %chain, "No token gate for chain");
            return Err(self.limited());
        };
        let balance = tokens.balance_of(details.token, submitter)?;
        if balance < details.min_balance {
            warn!(
                limiter = %self.address,
                chain = %chain,
                submitter = %submitter,
                balance,
                min_balance = details.min_balance,
                "Submission below token gate"
            );
            return Err(self.limited());
        }
        Ok(())
    }
}
