//! Execution time and call context
//!
//! Operations never read a clock. The caller supplies the execution
//! timestamp in a `CallContext`, so governance delays and permit deadlines
//! are evaluated against the transaction's own time.

use crate::identifiers::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Latest representable time; used as a "never expires" deadline
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Create from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the epoch
    pub fn as_secs(self) -> u64 {
        self.0
    }

    /// This time shifted forward, saturating at `MAX`
    pub fn plus_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is calling, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Identity performing the call
    pub caller: Address,
    /// Execution timestamp of the call
    pub now: Timestamp,
}

impl CallContext {
    /// Create a call context
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self { caller, now }
    }

    /// Same time, different caller
    pub fn as_caller(&self, caller: Address) -> Self {
        Self { caller, now: self.now }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_secs_saturates() {
        assert_eq!(Timestamp::from_secs(10).plus_secs(5), Timestamp::from_secs(15));
        assert_eq!(Timestamp::MAX.plus_secs(1), Timestamp::MAX);
    }

    #[test]
    fn test_as_caller_keeps_time() {
        let ctx = CallContext::new(Address::derive(b"a"), Timestamp::from_secs(7));
        let other = ctx.as_caller(Address::derive(b"b"));
        assert_eq!(other.now, ctx.now);
        assert_eq!(other.caller, Address::derive(b"b"));
    }
}
