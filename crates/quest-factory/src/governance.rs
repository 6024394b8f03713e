//! Two-phase timelocked parameter changes
//!
//! Each governed factory parameter (admin, upgrade fee, payment token) has
//! one pending slot:
//!
//! ```text
//! empty ──propose(v)──▶ pending(v, t) ──execute at now >= t + delay──▶ empty
//!                         │    ▲
//!                         └────┘ propose(w), w != v (overwrites, restarts clock)
//! ```
//!
//! Who may propose or execute is the factory's concern; this module only
//! tracks values and timing.

use quest_core::{GovernanceReason, Result, Timestamp};
use serde::{Deserialize, Serialize};

/// A proposed value and when it was proposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange<T> {
    /// Proposed value
    pub value: T,
    /// Proposal time
    pub proposed_at: Timestamp,
}

/// One pending-change slot with a fixed delay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timelock<T> {
    delay_secs: u64,
    pending: Option<PendingChange<T>>,
}

impl<T: Clone + PartialEq> Timelock<T> {
    /// Empty slot with the given delay
    pub fn new(delay_secs: u64) -> Self {
        Self {
            delay_secs,
            pending: None,
        }
    }

    /// Configured delay in seconds
    pub fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    /// Pending proposal, if any
    pub fn pending(&self) -> Option<&PendingChange<T>> {
        self.pending.as_ref()
    }

    /// Pending value, if any
    pub fn proposed_value(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Time the pending value was proposed
    pub fn proposed_at(&self) -> Option<Timestamp> {
        self.pending.as_ref().map(|p| p.proposed_at)
    }

    /// Earliest execution time of the pending value
    pub fn ready_at(&self) -> Option<Timestamp> {
        self.proposed_at().map(|t| t.plus_secs(self.delay_secs))
    }

    /// Record `value` as pending from `now`
    ///
    /// Re-proposing the value already pending fails with `NoChange`.
    pub fn propose(&mut self, value: T, now: Timestamp) -> Result<()> {
        if self.proposed_value() == Some(&value) {
            return Err(GovernanceReason::NoChange.into());
        }
        self.pending = Some(PendingChange {
            value,
            proposed_at: now,
        });
        Ok(())
    }

    /// Pending value once the delay has elapsed at `now`
    pub fn check_ready(&self, now: Timestamp) -> Result<&T> {
        let pending = self
            .pending
            .as_ref()
            .ok_or(GovernanceReason::NoPendingProposal)?;
        let ready_at = pending.proposed_at.plus_secs(self.delay_secs);
        if now < ready_at {
            return Err(GovernanceReason::TooSoon { ready_at }.into());
        }
        Ok(&pending.value)
    }

    /// Take the pending value once ready, clearing the slot
    pub fn execute(&mut self, now: Timestamp) -> Result<T> {
        let value = self.check_ready(now)?.clone();
        self.pending = None;
        Ok(value)
    }
}
