use super::Limiter;
use crate::chain::QuestChain;
use parking_lot::RwLock;
use quest_core::{
    Address, CallContext, ExternalReason, QuestError, QuestEvent, Receipt, Result, Role,
    TokenEffects,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Fee schedule configured for one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeDetails {
    /// Token the fee is paid in
    pub token: Address,
    /// Fee recipient
    pub treasury: Address,
    /// Flat fee per submission batch
    pub fee: u128,
}

/// Charges a flat per-submission fee, paid from submitter to treasury
///
/// The submitter must have approved this limiter's address as spender.
#[derive(Debug)]
pub struct TokenFeeLimiter {
    address: Address,
    details: RwLock<HashMap<Address, FeeDetails>>,
}

impl TokenFeeLimiter {
    /// Limiter deployed at `address`
    pub fn new(address: Address) -> Self {
        Self {
            address,
            details: RwLock::new(HashMap::new()),
        }
    }

    /// Record the fee for `chain`; caller must be an ADMIN of the chain
    pub fn add_quest_chain_details(
        &self,
        ctx: &CallContext,
        chain: &QuestChain,
        token: Address,
        treasury: Address,
        fee: u128,
    ) -> Result<Receipt> {
        chain.roles().check_role(Role::Admin, ctx.caller)?;
        let details = FeeDetails {
            token,
            treasury,
            fee,
        };
        self.details.write().insert(chain.address(), details);
        debug!(
            limiter = %self.address,
            chain = %chain.address(),
            token = %token,
            treasury = %treasury,
            fee,
            "Submission fee configured"
        );
        Ok(Receipt::from_events(vec![QuestEvent::LimiterDetailsAdded {
            limiter: self.address,
            chain: chain.address(),
            token,
            treasury: Some(treasury),
            amount: fee,
            sender: ctx.caller,
        }]))
    }

    /// Fee recorded for `chain`
    pub fn quest_chain_details(&self, chain: Address) -> Option<FeeDetails> {
        self.details.read().get(&chain).copied()
    }
}

impl Limiter for TokenFeeLimiter {
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
            warn!(limiter = %self.address, chain = %chain, "No submission fee for chain");
            return Err(ExternalReason::Limited {
                limiter: self.address,
            }
            .into());
        };
        tokens
            .transfer_from(
                details.token,
                self.address,
                submitter,
                details.treasury,
                details.fee,
            )
            .map_err(|err| {
                warn!(
                    limiter = %self.address,
                    chain = %chain,
                    submitter = %submitter,
                    fee = details.fee,
                    error = %err,
                    "Submission fee pull failed"
                );
                QuestError::from(err)
            })
    }
}
