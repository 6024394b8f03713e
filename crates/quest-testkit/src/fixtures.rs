//! Deployed-factory fixture
//!
//! A factory over a ledger with one permit-capable payment token, a named
//! admin identity, and a clock the test advances explicitly.

use crate::identity::TestIdentity;
use crate::ledger::MemoryTokenLedger;
use quest_chain::{QuestChain, QuestChainInfo};
use quest_core::{Address, CallContext, Permit, Salt, Timestamp, TokenEffects};
use quest_factory::{FactoryConfig, QuestChainFactory};

/// Factory plus the collaborators tests need around it
#[derive(Debug)]
pub struct FactoryFixture {
    /// Factory under test
    pub factory: QuestChainFactory,
    /// Token ledger
    pub ledger: MemoryTokenLedger,
    /// Factory admin; receives upgrade fees
    pub admin: TestIdentity,
    /// Payment token
    pub token: Address,
    /// Current time
    pub now: Timestamp,
}

impl Default for FactoryFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryFixture {
    /// Upgrade fee used by [`new`](Self::new)
    pub const UPGRADE_FEE: u128 = 10;

    /// Factory with the default fee
    pub fn new() -> Self {
        Self::with_fee(Self::UPGRADE_FEE as u64)
    }

    /// Factory charging `fee` per upgrade
    pub fn with_fee(fee: u64) -> Self {
        let mut ledger = MemoryTokenLedger::new();
        let token = ledger.deploy_token("PaymentToken");
        let admin = TestIdentity::named("factory-admin");
        let config = FactoryConfig::new(
            admin.address(),
            token,
            fee,
            Address::derive(b"quest-chain-template"),
        );
        let factory = QuestChainFactory::deploy(Address::derive(b"quest-chain-factory"), config)
            .expect("fixture config is valid")
            .output;
        Self {
            factory,
            ledger,
            admin,
            token,
            now: Timestamp::from_secs(1_700_000_000),
        }
    }

    /// Call context for `who` at the current time
    pub fn ctx(&self, who: &TestIdentity) -> CallContext {
        who.at(self.now)
    }

    /// Move the clock forward
    pub fn advance(&mut self, secs: u64) {
        self.now = self.now.plus_secs(secs);
    }

    /// Create a chain as the factory admin, salted by the current count
    pub fn create_chain(&mut self, info: QuestChainInfo) -> Address {
        let ctx = self.admin.at(self.now);
        let salt = Salt::from_index(self.factory.quest_chain_count());
        self.factory
            .create(&ctx, info, salt)
            .expect("chain creation")
            .output
    }

    /// Chain at `address`
    pub fn chain(&self, address: Address) -> &QuestChain {
        self.factory.chain(address).expect("chain registered")
    }

    /// Mutable chain at `address`
    pub fn chain_mut(&mut self, address: Address) -> &mut QuestChain {
        self.factory.chain_mut(address).expect("chain registered")
    }

    /// Mint payment tokens to `who`
    pub fn fund(&mut self, who: Address, amount: u128) {
        self.ledger.mint(self.token, who, amount);
    }

    /// Let the factory pull `amount` from `who`
    pub fn approve_factory(&mut self, who: Address, amount: u128) {
        let factory = self.factory.address();
        self.ledger.approve(self.token, who, factory, amount);
    }

    /// Encoded permit letting the factory pull `value` from `who`
    pub fn permit_signature(&self, who: &TestIdentity, value: u128, deadline: Timestamp) -> Vec<u8> {
        let permit = Permit {
            owner: who.address(),
            spender: self.factory.address(),
            value,
            nonce: self.ledger.nonce(self.token, who.address()),
            deadline,
        };
        let domain = self
            .ledger
            .permit_domain(self.token)
            .expect("payment token deployed");
        who.sign_permit(&domain, &permit)
    }
}
