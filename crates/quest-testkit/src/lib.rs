//! Quest Testing Infrastructure
//!
//! Shared test setup for the quest crates: an in-memory token ledger with
//! permit support, deterministic identities, chain and factory fixtures, and
//! proptest strategies.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! quest-testkit = { path = "../quest-testkit" }
//! ```
//!
//! ```rust
//! use quest_testkit::*;
//!
//! let mut fx = FactoryFixture::new();
//! let owner = TestIdentity::named("owner");
//! let chain = fx.create_chain(ChainInfoBuilder::new(owner.address()).quest("q0").build());
//! assert_eq!(fx.chain(chain).quest_count(), 1);
//! ```

pub mod builders;
pub mod fixtures;
pub mod identity;
pub mod ledger;
pub mod logging;
pub mod strategies;

pub use builders::ChainInfoBuilder;
pub use fixtures::FactoryFixture;
pub use identity::TestIdentity;
pub use ledger::MemoryTokenLedger;
pub use logging::init_test_tracing;

pub use quest_core::{Address, CallContext, Role, Salt, Timestamp};
