//! Quest Chain - governed quest workflows
//!
//! A quest chain owns a cascading role hierarchy, an append-only quest book
//! with per-quester submission status, a soulbound completion credential and
//! an optional submission limiter.
//!
//! # Architecture
//!
//! ```text
//! QuestChain
//!   ├── RoleHierarchy        REVIEWER < EDITOR < ADMIN < OWNER, cascading
//!   ├── QuestBook            quests + (quester, quest) -> status
//!   ├── SoulboundCredential  one unit per holder, never transferable
//!   └── Option<Arc<dyn Limiter>>
//!         ├── TokenGatedLimiter
//!         └── TokenFeeLimiter
//! ```
//!
//! # Example
//!
//! ```rust
//! use quest_chain::{QuestChain, QuestChainInfo};
//! use quest_core::{Address, CallContext, QuestStatus, Role, Timestamp};
//!
//! let factory = Address::derive(b"factory");
//! let owner = Address::derive(b"owner");
//! let mut chain = QuestChain::new(Address::derive(b"chain"), factory, 0);
//! let info = QuestChainInfo {
//!     owners: vec![owner],
//!     quests: vec!["ipfs://quest-0".into()],
//!     ..Default::default()
//! };
//! chain.init(&CallContext::new(factory, Timestamp::from_secs(0)), info).unwrap();
//!
//! assert!(chain.has_role(Role::Reviewer, owner));
//! assert_eq!(chain.quest_status(owner, 0).unwrap(), QuestStatus::Init);
//! ```

#![forbid(unsafe_code)]

pub mod chain;
pub mod credential;
pub mod limiter;
pub mod quests;
pub mod roles;

pub use chain::{QuestChain, QuestChainInfo};
pub use credential::SoulboundCredential;
pub use limiter::{FeeDetails, GateDetails, Limiter, TokenFeeLimiter, TokenGatedLimiter};
pub use quests::{Quest, QuestBook};
pub use roles::RoleHierarchy;
