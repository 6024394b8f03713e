//! Property test strategies for quest types
//!
//! Strategies generate deterministic, shrinkable values from small seeds so
//! failures reproduce.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use quest_core::{Address, QuestFlags, Role, Salt};

/// Strategy for addresses derived from seeds in `0..10000`
pub fn arb_address() -> impl Strategy<Value = Address> {
    (0u64..10000).prop_map(|seed| Address::derive(format!("account-{seed}").as_bytes()))
}

/// Strategy for roles
pub fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

/// Strategy for quest flag combinations
pub fn arb_quest_flags() -> impl Strategy<Value = QuestFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(paused, optional, skip_review)| {
        QuestFlags {
            paused,
            optional,
            skip_review,
        }
    })
}

/// Strategy for salts
pub fn arb_salt() -> impl Strategy<Value = Salt> {
    any::<[u8; 32]>().prop_map(Salt::from_bytes)
}

/// What a quester did on one quest before trying to mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestOutcome {
    /// Never submitted
    Untouched,
    /// Submitted, not reviewed
    Pending,
    /// Submitted and accepted
    Passed,
    /// Submitted and rejected
    Failed,
}

/// Strategy for quest outcomes
pub fn arb_quest_outcome() -> impl Strategy<Value = QuestOutcome> {
    prop_oneof![
        Just(QuestOutcome::Untouched),
        Just(QuestOutcome::Pending),
        Just(QuestOutcome::Passed),
        Just(QuestOutcome::Failed),
    ]
}

/// Strategy for a chain's quests: flags (without skip-review) and outcome
pub fn arb_quest_plan(max_quests: usize) -> impl Strategy<Value = Vec<(QuestFlags, QuestOutcome)>> {
    prop::collection::vec(
        (arb_quest_flags(), arb_quest_outcome()).prop_map(|(flags, outcome)| {
            (
                QuestFlags {
                    skip_review: false,
                    ..flags
                },
                outcome,
            )
        }),
        0..=max_quests,
    )
}
