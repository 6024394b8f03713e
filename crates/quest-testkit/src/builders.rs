//! Builders for chain initialisation data

use quest_chain::QuestChainInfo;
use quest_core::Address;

/// Fluent builder for [`QuestChainInfo`]
#[derive(Debug, Clone)]
pub struct ChainInfoBuilder {
    info: QuestChainInfo,
}

impl ChainInfoBuilder {
    /// Start with a single owner
    pub fn new(owner: Address) -> Self {
        Self {
            info: QuestChainInfo {
                details: "ipfs://chain-details".into(),
                token_uri: "ipfs://chain-token".into(),
                owners: vec![owner],
                ..Default::default()
            },
        }
    }

    /// Start without owners
    pub fn ownerless() -> Self {
        Self {
            info: QuestChainInfo::default(),
        }
    }

    /// Set the chain details
    pub fn details(mut self, details: &str) -> Self {
        self.info.details = details.into();
        self
    }

    /// Set the credential URI
    pub fn token_uri(mut self, uri: &str) -> Self {
        self.info.token_uri = uri.into();
        self
    }

    /// Add an owner
    pub fn owner(mut self, account: Address) -> Self {
        self.info.owners.push(account);
        self
    }

    /// Add an admin
    pub fn admin(mut self, account: Address) -> Self {
        self.info.admins.push(account);
        self
    }

    /// Add an editor
    pub fn editor(mut self, account: Address) -> Self {
        self.info.editors.push(account);
        self
    }

    /// Add a reviewer
    pub fn reviewer(mut self, account: Address) -> Self {
        self.info.reviewers.push(account);
        self
    }

    /// Add a pre-seeded quest
    pub fn quest(mut self, details: &str) -> Self {
        self.info.quests.push(details.into());
        self
    }

    /// Add `n` pre-seeded quests
    pub fn quests(mut self, n: usize) -> Self {
        let start = self.info.quests.len();
        self.info
            .quests
            .extend((start..start + n).map(|i| format!("ipfs://quest-{i}")));
        self
    }

    /// Start paused
    pub fn paused(mut self) -> Self {
        self.info.paused = true;
        self
    }

    /// Finish
    pub fn build(self) -> QuestChainInfo {
        self.info
    }
}
