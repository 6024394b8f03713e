//! Quest value types shared by chains, events and indexers

use serde::{Deserialize, Serialize};

/// Per-quest configuration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QuestFlags {
    /// Submissions are rejected while set; counts as satisfied for completion
    pub paused: bool,
    /// Counts as satisfied for completion without a passing submission
    pub optional: bool,
    /// Submissions pass immediately without review
    pub skip_review: bool,
}

impl QuestFlags {
    /// Flags with only `paused` set
    pub fn paused() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    /// Flags with only `optional` set
    pub fn optional() -> Self {
        Self {
            optional: true,
            ..Self::default()
        }
    }

    /// Flags with only `skip_review` set
    pub fn skip_review() -> Self {
        Self {
            skip_review: true,
            ..Self::default()
        }
    }
}

/// Submission state of one (quester, quest) pair
///
/// ```text
/// Init → Review → Pass
///          ↑   ↘
///          └──── Fail
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestStatus {
    /// Never submitted
    #[default]
    Init,
    /// Awaiting review
    Review,
    /// Accepted; terminal
    Pass,
    /// Rejected; may be resubmitted
    Fail,
}

impl QuestStatus {
    /// Whether the pair has reached the terminal state
    pub fn is_passed(self) -> bool {
        matches!(self, QuestStatus::Pass)
    }
}
