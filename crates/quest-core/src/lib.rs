//! Quest Core - shared foundation for quest chains
//!
//! This crate holds the value types and interfaces every other quest crate
//! agrees on. It contains no chain or factory logic.
//!
//! # Contents
//!
//! - Identifiers: `Address`, `Salt`, `QuestId`, `CredentialId`
//! - Roles: the ranked `Role` tiers and their administering role
//! - Quest value types: `QuestFlags`, `QuestStatus`
//! - Errors: the unified `QuestError` with one variant per failure category
//! - Events: `QuestEvent` facts and the `Receipt` returned by mutations
//! - Time: `Timestamp` and the per-call `CallContext`
//! - Crypto: SHA-256 hashing and delegated-signature (permit) digests
//! - Effects: the `TokenEffects` interface to fungible payment tokens
//!
//! # Example
//!
//! ```rust
//! use quest_core::{Address, CallContext, Role, Timestamp};
//!
//! let owner = Address::derive(b"owner");
//! let ctx = CallContext::new(owner, Timestamp::from_secs(1_000));
//! assert_eq!(ctx.caller, owner);
//! assert!(Role::Owner > Role::Reviewer);
//! ```

#![forbid(unsafe_code)]

pub mod crypto;
pub mod effects;
pub mod errors;
pub mod events;
pub mod identifiers;
pub mod quest;
pub mod role;
pub mod time;

pub use crypto::hash::{hash, Hash32};
pub use crypto::permit::{Permit, PermitDomain, PermitSignature};
pub use effects::token::{TokenEffects, TokenError};
pub use errors::{
    ConflictReason, ErrorKind, ExternalReason, GovernanceReason, InvalidReason, QuestError,
    Result,
};
pub use events::{QuestEvent, Receipt};
pub use identifiers::{Address, CredentialId, QuestId, Salt};
pub use quest::{QuestFlags, QuestStatus};
pub use role::Role;
pub use time::{CallContext, Timestamp};
