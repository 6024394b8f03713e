//! Unified error system for quest chains
//!
//! A single error type covers every crate. Each variant is one failure
//! category and carries a typed reason whose display text is stable, so
//! callers can match on the reason and clients can show it verbatim.

use crate::identifiers::Address;
use crate::role::Role;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Failure category of a `QuestError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller lacks a required role
    Authorization,
    /// Malformed input
    Validation,
    /// Operation invalid for the current state
    StateConflict,
    /// Governance executed too early or by the wrong party
    Governance,
    /// A collaborator (token, signature, limiter) refused
    ExternalDependency,
}

/// Malformed input reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum InvalidReason {
    /// Parallel lists have different lengths
    #[error("invalid params")]
    InvalidParams,
    /// Quest id at or beyond the quest count
    #[error("quest not found")]
    QuestNotFound,
    /// Chain initialisation without an owner
    #[error("no owners")]
    NoOwners,
    /// Completion requested on a chain with no quests
    #[error("no quests found")]
    NoQuests,
    /// The empty address where an identity is required
    #[error("0 address")]
    ZeroAddress,
    /// Address not present in the factory registry
    #[error("unknown chain {0}")]
    UnknownChain(Address),
    /// Registry index past the end
    #[error("index {0} out of range")]
    IndexOutOfRange(u64),
}

/// State conflict reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ConflictReason {
    /// Resubmission against a passed quest
    #[error("already passed")]
    AlreadyPassed,
    /// Review of a submission that is not awaiting review
    #[error("quest not in review")]
    NotInReview,
    /// Submission against a paused quest
    #[error("quest paused")]
    QuestPaused,
    /// Operation blocked while the chain is paused
    #[error("paused")]
    ChainPaused,
    /// Unpause of a chain that is not paused
    #[error("not paused")]
    ChainNotPaused,
    /// Second initialisation, or initialisation of the template
    #[error("already initialized")]
    AlreadyInitialized,
    /// Premium upgrade of a chain that is already premium
    #[error("already upgraded")]
    AlreadyUpgraded,
    /// Premium-only operation on a standard chain
    #[error("not premium")]
    NotPremium,
    /// Not every quest is passed, optional or paused
    #[error("chain incomplete")]
    ChainIncomplete,
    /// Holder already owns this chain's credential
    #[error("already minted")]
    AlreadyMinted,
    /// Holder owns no credential to burn
    #[error("no token")]
    NoCredential,
    /// Credentials cannot be transferred or approved
    #[error("soulbound")]
    Soulbound,
    /// A chain already exists for this salt
    #[error("salt reused")]
    SaltReused,
    /// Upgrade entry point called by someone other than the creating factory
    #[error("not factory")]
    NotFactory,
}

/// Governance reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GovernanceReason {
    /// Caller is not the current factory admin
    ///
    /// Raised by every admin-gated factory call, proposals included, and
    /// kept under governance rather than `MissingRole` because the factory
    /// admin is a single address, not a chain role.
    #[error("not admin")]
    NotAdmin,
    /// Caller is not the nominated admin
    #[error("!proposedAdmin")]
    NotProposedAdmin,
    /// Delay has not elapsed
    #[error("too soon (executable at {ready_at})")]
    TooSoon {
        /// Earliest execution time
        ready_at: Timestamp,
    },
    /// Proposed value equals the pending proposal
    #[error("no change")]
    NoChange,
    /// Nothing pending in this slot
    #[error("no pending proposal")]
    NoPendingProposal,
}

/// External collaborator reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ExternalReason {
    /// Payer balance below the amount pulled
    #[error("insufficient balance")]
    InsufficientBalance,
    /// Spender allowance below the amount pulled
    #[error("insufficient allowance")]
    InsufficientAllowance,
    /// Token address unknown to the token layer
    #[error("unknown token {0}")]
    UnknownToken(Address),
    /// Token refused the transfer
    #[error("transfer rejected")]
    TransferRejected,
    /// Permit signature malformed or not by the owner
    #[error("bad signature")]
    BadSignature,
    /// Permit deadline passed
    #[error("permit expired")]
    PermitExpired,
    /// Limiter denied the submission
    #[error("limited by {limiter}")]
    Limited {
        /// Limiter that denied
        limiter: Address,
    },
}

/// Unified error type for all quest chain operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum QuestError {
    /// Caller lacks a role
    #[error("account {account} is missing role {role}")]
    MissingRole {
        /// Caller that was refused
        account: Address,
        /// Role the caller would need
        role: Role,
    },

    /// Malformed input
    #[error("Invalid: {0}")]
    Invalid(InvalidReason),

    /// Operation invalid for current state
    #[error("Conflict: {0}")]
    Conflict(ConflictReason),

    /// Governance timing or party check failed
    #[error("Governance: {0}")]
    Governance(GovernanceReason),

    /// A collaborator refused
    #[error("External: {0}")]
    External(ExternalReason),
}

impl QuestError {
    /// Create a missing role error
    pub fn missing_role(account: Address, role: Role) -> Self {
        Self::MissingRole { account, role }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuestError::MissingRole { .. } => ErrorKind::Authorization,
            QuestError::Invalid(_) => ErrorKind::Validation,
            QuestError::Conflict(_) => ErrorKind::StateConflict,
            QuestError::Governance(_) => ErrorKind::Governance,
            QuestError::External(_) => ErrorKind::ExternalDependency,
        }
    }
}

impl From<InvalidReason> for QuestError {
    fn from(reason: InvalidReason) -> Self {
        Self::Invalid(reason)
    }
}

impl From<ConflictReason> for QuestError {
    fn from(reason: ConflictReason) -> Self {
        Self::Conflict(reason)
    }
}

impl From<GovernanceReason> for QuestError {
    fn from(reason: GovernanceReason) -> Self {
        Self::Governance(reason)
    }
}

impl From<ExternalReason> for QuestError {
    fn from(reason: ExternalReason) -> Self {
        Self::External(reason)
    }
}

/// Standard Result type for quest chain operations
pub type Result<T> = std::result::Result<T, QuestError>;
