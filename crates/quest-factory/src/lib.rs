//! Quest Factory - provisioning and governance for quest chains
//!
//! The factory creates chains from a locked template at predictable
//! addresses, sells the one-time premium upgrade (paid from an allowance or
//! through a signed permit) and changes its own admin, fee and payment token
//! only through 10-day timelocked proposals.
//!
//! # Example
//!
//! ```rust
//! use quest_chain::QuestChainInfo;
//! use quest_core::{Address, CallContext, Salt, Timestamp};
//! use quest_factory::{FactoryConfig, QuestChainFactory};
//!
//! let admin = Address::derive(b"admin");
//! let config = FactoryConfig::new(admin, Address::derive(b"token"), 10, Address::derive(b"template"));
//! let mut factory = QuestChainFactory::deploy(Address::derive(b"factory"), config)?.output;
//!
//! let salt = Salt::from_index(0);
//! let predicted = factory.predict_address(salt);
//! let info = QuestChainInfo { owners: vec![admin], ..Default::default() };
//! let created = factory.create(&CallContext::new(admin, Timestamp::from_secs(0)), info, salt)?;
//! assert_eq!(created.output, predicted);
//! # Ok::<(), quest_core::QuestError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod factory;
pub mod governance;

pub use config::{ConfigError, FactoryConfig, GOVERNANCE_DELAY_SECS};
pub use factory::{QuestChainFactory, CHAIN_ADDRESS_DOMAIN};
pub use governance::{PendingChange, Timelock};
