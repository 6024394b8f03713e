//! Fungible payment token interface
//!
//! # Effect Classification
//!
//! - **Category**: External collaborator
//! - **Implementation**: `quest-testkit::MemoryTokenLedger` for tests; any
//!   ledger binding in deployments
//! - **Usage**: premium upgrade fee pulls, limiter balance gates and fees
//!
//! Each mutating method must be atomic: on `Err` nothing has changed.

use crate::crypto::permit::{Permit, PermitDomain, PermitSignature};
use crate::errors::{ExternalReason, QuestError};
use crate::identifiers::Address;
use crate::time::Timestamp;

/// Errors raised by the token layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Payer balance below amount
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        /// Amount requested
        needed: u128,
        /// Amount held
        available: u128,
    },
    /// Spender allowance below amount
    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance {
        /// Amount requested
        needed: u128,
        /// Allowance held
        available: u128,
    },
    /// Token not known to this ledger
    #[error("unknown token {0}")]
    UnknownToken(Address),
    /// Token refused the operation
    #[error("transfer rejected")]
    TransferRejected,
    /// Permit signature malformed, wrong signer or wrong nonce
    #[error("bad signature")]
    BadSignature,
    /// Permit deadline passed
    #[error("permit expired at {deadline}")]
    PermitExpired {
        /// Deadline carried by the permit
        deadline: Timestamp,
    },
}

impl From<TokenError> for QuestError {
    fn from(err: TokenError) -> Self {
        let reason = match err {
            TokenError::InsufficientBalance { .. } => ExternalReason::InsufficientBalance,
            TokenError::InsufficientAllowance { .. } => ExternalReason::InsufficientAllowance,
            TokenError::UnknownToken(token) => ExternalReason::UnknownToken(token),
            TokenError::TransferRejected => ExternalReason::TransferRejected,
            TokenError::BadSignature => ExternalReason::BadSignature,
            TokenError::PermitExpired { .. } => ExternalReason::PermitExpired,
        };
        QuestError::External(reason)
    }
}

/// Fungible token operations used by the core
pub trait TokenEffects {
    /// Balance of `owner`
    fn balance_of(&self, token: Address, owner: Address) -> Result<u128, TokenError>;

    /// Remaining amount `spender` may pull from `owner`
    fn allowance(&self, token: Address, owner: Address, spender: Address)
        -> Result<u128, TokenError>;

    /// Next permit nonce for `owner`
    fn nonces(&self, token: Address, owner: Address) -> Result<u64, TokenError>;

    /// Signing domain of the token
    fn permit_domain(&self, token: Address) -> Result<PermitDomain, TokenError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Consume a signed permit and move `permit.value` from its owner to `to`
    ///
    /// Atomic: on any error the nonce, allowance and balances are unchanged.
    fn transfer_from_with_permit(
        &mut self,
        token: Address,
        permit: &Permit,
        signature: &PermitSignature,
        to: Address,
        now: Timestamp,
    ) -> Result<(), TokenError>;
}
