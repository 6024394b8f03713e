//! Event facts emitted by chains, limiters and the factory
//!
//! Every successful mutation returns the ordered list of facts it emitted in
//! a `Receipt`. A failed mutation emits nothing. Facts are serializable so an
//! indexer can mirror them into a queryable store.

use crate::identifiers::{Address, CredentialId, QuestId};
use crate::quest::QuestFlags;
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Structured event emitted on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestEvent {
    /// Factory deployed
    FactorySetup {
        /// Factory address
        factory: Address,
        /// Template chain address
        template: Address,
        /// Initial admin
        admin: Address,
    },
    /// Chain registered by the factory
    QuestChainCreated {
        /// Registry index
        index: u64,
        /// Chain address
        chain: Address,
    },
    /// Chain upgraded to premium
    QuestChainUpgraded {
        /// Party that paid
        sender: Address,
        /// Upgraded chain
        chain: Address,
    },
    /// Admin replacement proposed
    AdminReplaceProposed {
        /// Nominee
        proposed: Address,
    },
    /// Admin replaced
    AdminReplaced {
        /// New admin
        admin: Address,
    },
    /// Upgrade fee replacement proposed
    UpgradeFeeReplaceProposed {
        /// Proposed fee
        proposed: u128,
    },
    /// Upgrade fee replaced
    UpgradeFeeReplaced {
        /// New fee
        upgrade_fee: u128,
    },
    /// Payment token replacement proposed
    PaymentTokenReplaceProposed {
        /// Proposed token
        proposed: Address,
    },
    /// Payment token replaced
    PaymentTokenReplaced {
        /// New token
        payment_token: Address,
    },

    /// Chain initialised
    QuestChainInit {
        /// Chain details reference
        details: String,
        /// Pre-seeded quest details
        quests: Vec<String>,
        /// Whether the chain starts paused
        paused: bool,
    },
    /// Chain details replaced
    QuestChainEdited {
        /// Admin that edited
        editor: Address,
        /// New details
        details: String,
    },
    /// Role acquired
    RoleGranted {
        /// Role granted
        role: Role,
        /// Holder
        account: Address,
        /// Caller
        sender: Address,
    },
    /// Role removed
    RoleRevoked {
        /// Role revoked
        role: Role,
        /// Former holder
        account: Address,
        /// Caller
        sender: Address,
    },
    /// Quests appended
    QuestsCreated {
        /// Editor that created
        creator: Address,
        /// Id assigned to the first quest; the rest follow densely
        first_id: QuestId,
        /// Details of each new quest
        details: Vec<String>,
    },
    /// Quest details replaced
    QuestsEdited {
        /// Editor
        editor: Address,
        /// Quests edited
        quest_ids: Vec<QuestId>,
        /// New details
        details: Vec<String>,
    },
    /// Quest flags replaced
    ConfiguredQuests {
        /// Editor
        editor: Address,
        /// Quests configured
        quest_ids: Vec<QuestId>,
        /// New flags
        flags: Vec<QuestFlags>,
    },
    /// Proofs submitted
    QuestProofsSubmitted {
        /// Quester
        quester: Address,
        /// Quests submitted against
        quest_ids: Vec<QuestId>,
        /// Proof references
        proofs: Vec<String>,
    },
    /// Proofs reviewed
    QuestProofsReviewed {
        /// Reviewer
        reviewer: Address,
        /// Questers reviewed
        questers: Vec<Address>,
        /// Quests reviewed
        quest_ids: Vec<QuestId>,
        /// Verdicts
        success: Vec<bool>,
        /// Review notes
        details: Vec<String>,
    },
    /// Chain paused
    Paused {
        /// Admin that paused
        account: Address,
    },
    /// Chain unpaused
    Unpaused {
        /// Admin that unpaused
        account: Address,
    },
    /// Limiter attached or detached
    SetLimiter {
        /// Limiter address, `None` when detached
        limiter: Option<Address>,
    },
    /// Credential metadata URI changed
    TokenUriSet {
        /// New URI
        uri: String,
        /// Credential the URI describes
        credential_id: CredentialId,
    },
    /// Credential issued
    CredentialMinted {
        /// Issuing chain
        chain: Address,
        /// Holder
        holder: Address,
        /// Credential id
        credential_id: CredentialId,
    },
    /// Credential burned by its holder
    CredentialBurned {
        /// Issuing chain
        chain: Address,
        /// Former holder
        holder: Address,
        /// Credential id
        credential_id: CredentialId,
    },
    /// Limiter configuration recorded for a chain
    LimiterDetailsAdded {
        /// Limiter
        limiter: Address,
        /// Chain configured
        chain: Address,
        /// Token consulted or charged
        token: Address,
        /// Fee recipient, for fee-charging limiters
        treasury: Option<Address>,
        /// Minimum balance or flat fee
        amount: u128,
        /// Chain admin that configured
        sender: Address,
    },
}

impl QuestEvent {
    /// Stable event name for indexers
    pub fn name(&self) -> &'static str {
        match self {
            QuestEvent::FactorySetup { .. } => "FactorySetup",
            QuestEvent::QuestChainCreated { .. } => "QuestChainCreated",
            QuestEvent::QuestChainUpgraded { .. } => "QuestChainUpgraded",
            QuestEvent::AdminReplaceProposed { .. } => "AdminReplaceProposed",
            QuestEvent::AdminReplaced { .. } => "AdminReplaced",
            QuestEvent::UpgradeFeeReplaceProposed { .. } => "UpgradeFeeReplaceProposed",
            QuestEvent::UpgradeFeeReplaced { .. } => "UpgradeFeeReplaced",
            QuestEvent::PaymentTokenReplaceProposed { .. } => "PaymentTokenReplaceProposed",
            QuestEvent::PaymentTokenReplaced { .. } => "PaymentTokenReplaced",
            QuestEvent::QuestChainInit { .. } => "QuestChainInit",
            QuestEvent::QuestChainEdited { .. } => "QuestChainEdited",
            QuestEvent::RoleGranted { .. } => "RoleGranted",
            QuestEvent::RoleRevoked { .. } => "RoleRevoked",
            QuestEvent::QuestsCreated { .. } => "QuestsCreated",
            QuestEvent::QuestsEdited { .. } => "QuestsEdited",
            QuestEvent::ConfiguredQuests { .. } => "ConfiguredQuests",
            QuestEvent::QuestProofsSubmitted { .. } => "QuestProofsSubmitted",
            QuestEvent::QuestProofsReviewed { .. } => "QuestProofsReviewed",
            QuestEvent::Paused { .. } => "Paused",
            QuestEvent::Unpaused { .. } => "Unpaused",
            QuestEvent::SetLimiter { .. } => "SetLimiter",
            QuestEvent::TokenUriSet { .. } => "TokenUriSet",
            QuestEvent::CredentialMinted { .. } => "CredentialMinted",
            QuestEvent::CredentialBurned { .. } => "CredentialBurned",
            QuestEvent::LimiterDetailsAdded { .. } => "LimiterDetailsAdded",
        }
    }
}

/// Output of a successful mutation plus the events it emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<T = ()> {
    /// Operation result
    pub output: T,
    /// Emitted events, in emission order
    pub events: Vec<QuestEvent>,
}

impl<T> Receipt<T> {
    /// Create a receipt
    pub fn new(output: T, events: Vec<QuestEvent>) -> Self {
        Self { output, events }
    }

    /// Map the output, keeping the events
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Receipt<U> {
        Receipt {
            output: f(self.output),
            events: self.events,
        }
    }

    /// Names of the emitted events, in order
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(QuestEvent::name).collect()
    }
}

impl Receipt<()> {
    /// Receipt with no output
    pub fn from_events(events: Vec<QuestEvent>) -> Self {
        Self::new((), events)
    }
}
