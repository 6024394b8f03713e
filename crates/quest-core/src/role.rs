//! Ranked role tiers
//!
//! Roles form a total order by privilege:
//!
//! ```text
//! REVIEWER < EDITOR < ADMIN < OWNER
//! ```
//!
//! Holding a role implies holding every role ranked below it. The
//! implication is materialised in each chain's holder sets by the role
//! hierarchy engine, not computed here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One tier of the chain role hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// May review proof submissions
    Reviewer,
    /// May create, edit and configure quests
    Editor,
    /// May manage roles below owner, pause the chain and attach limiters
    Admin,
    /// Top tier; administers itself
    Owner,
}

impl Role {
    /// All tiers in ascending rank
    pub const ALL: [Role; 4] = [Role::Reviewer, Role::Editor, Role::Admin, Role::Owner];

    /// Zero-based rank, lowest privilege first
    pub fn rank(self) -> usize {
        match self {
            Role::Reviewer => 0,
            Role::Editor => 1,
            Role::Admin => 2,
            Role::Owner => 3,
        }
    }

    /// The role a caller must hold to grant or revoke this role
    pub fn admin_role(self) -> Role {
        match self {
            Role::Reviewer | Role::Editor | Role::Admin => Role::Admin,
            Role::Owner => Role::Owner,
        }
    }

    /// This role and every role below it, lowest first
    pub fn at_or_below(self) -> &'static [Role] {
        &Self::ALL[..=self.rank()]
    }

    /// This role and every role above it, this role first
    pub fn at_or_above(self) -> &'static [Role] {
        &Self::ALL[self.rank()..]
    }

    /// Stable role name used in errors and events
    pub fn name(self) -> &'static str {
        match self {
            Role::Reviewer => "REVIEWER_ROLE",
            Role::Editor => "EDITOR_ROLE",
            Role::Admin => "ADMIN_ROLE",
            Role::Owner => "OWNER_ROLE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order_matches_ord() {
        for pair in Role::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].rank() + 1, pair[1].rank());
        }
    }

    #[test]
    fn test_admin_roles() {
        assert_eq!(Role::Owner.admin_role(), Role::Owner);
        assert_eq!(Role::Admin.admin_role(), Role::Admin);
        assert_eq!(Role::Editor.admin_role(), Role::Admin);
        assert_eq!(Role::Reviewer.admin_role(), Role::Admin);
    }

    #[test]
    fn test_cascade_slices() {
        assert_eq!(Role::Editor.at_or_below(), &[Role::Reviewer, Role::Editor]);
        assert_eq!(Role::Editor.at_or_above(), &[Role::Editor, Role::Admin, Role::Owner]);
        assert_eq!(Role::Owner.at_or_above(), &[Role::Owner]);
        assert_eq!(Role::Reviewer.at_or_below(), &[Role::Reviewer]);
    }
}
