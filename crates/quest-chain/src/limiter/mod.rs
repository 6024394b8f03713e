//! Submission limiters
//!
//! A limiter is an optional admission check a premium chain runs before
//! recording a proof submission. The chain calls [`Limiter::check`] once per
//! batch; `Err` aborts the whole batch and nothing is recorded.
//!
//! # Strategies
//!
//! - [`TokenGatedLimiter`]: submitter must hold at least a minimum balance
//! - [`TokenFeeLimiter`]: submitter pays a flat fee to a treasury
//!
//! Both keep per-chain configuration that only the chain's ADMIN may set.
//! A chain with no recorded configuration is denied.

use quest_core::{Address, Result, TokenEffects};
use std::fmt;

mod token_fee;
mod token_gated;

pub use token_fee::{FeeDetails, TokenFeeLimiter};
pub use token_gated::{GateDetails, TokenGatedLimiter};

/// Admission check run before a proof batch is recorded
pub trait Limiter: Send + Sync + fmt::Debug {
    /// Identity of this limiter, used as the token spender for fees
    fn address(&self) -> Address;

    /// Allow or deny `submitter` on `chain`
    ///
    /// Implementations may move tokens through `tokens`; any movement must
    /// be the last fallible step so a denial leaves no trace.
    fn check(&self, chain: Address, submitter: Address, tokens: &mut dyn TokenEffects)
        -> Result<()>;
}
