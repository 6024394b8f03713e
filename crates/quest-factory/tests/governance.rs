//! Timelocked replacement of factory parameters

use assert_matches::assert_matches;
use proptest::prelude::*;
use quest_core::{Address, ExternalReason, GovernanceReason, QuestError, Salt};
use quest_factory::GOVERNANCE_DELAY_SECS;
use quest_testkit::strategies::arb_salt;
use quest_testkit::{init_test_tracing, ChainInfoBuilder, FactoryFixture, TestIdentity};

#[test]
fn test_fee_change_waits_full_delay() {
    init_test_tracing();
    let mut fx = FactoryFixture::new();
    let admin = fx.ctx(&fx.admin);
    let receipt = fx.factory.propose_upgrade_fee_replace(&admin, 25).unwrap();
    assert_eq!(receipt.event_names(), vec!["UpgradeFeeReplaceProposed"]);
    assert_eq!(fx.factory.proposed_upgrade_fee(), Some(25));
    assert_eq!(fx.factory.upgrade_fee_proposal_timestamp(), Some(fx.now));

    fx.advance(GOVERNANCE_DELAY_SECS - 1);
    let early = fx.ctx(&fx.admin);
    assert_matches!(
        fx.factory.execute_upgrade_fee_replace(&early),
        Err(QuestError::Governance(GovernanceReason::TooSoon { ready_at }))
            if ready_at == admin.now.plus_secs(GOVERNANCE_DELAY_SECS)
    );
    assert_eq!(fx.factory.upgrade_fee(), FactoryFixture::UPGRADE_FEE);

    fx.advance(1);
    let on_time = fx.ctx(&fx.admin);
    fx.factory.execute_upgrade_fee_replace(&on_time).unwrap();
    assert_eq!(fx.factory.upgrade_fee(), 25);
    assert_eq!(fx.factory.upgrade_fee_proposal_timestamp(), None);

    assert_matches!(
        fx.factory.execute_upgrade_fee_replace(&on_time),
        Err(QuestError::Governance(GovernanceReason::NoPendingProposal))
    );
}

#[test]
fn test_reproposing_restarts_the_clock() {
    init_test_tracing();
    let mut fx = FactoryFixture::new();
    let first = fx.ctx(&fx.admin);
    fx.factory.propose_upgrade_fee_replace(&first, 25).unwrap();
    assert_matches!(
        fx.factory.propose_upgrade_fee_replace(&first, 25),
        Err(QuestError::Governance(GovernanceReason::NoChange))
    );

    fx.advance(GOVERNANCE_DELAY_SECS - 10);
    let second = fx.ctx(&fx.admin);
    fx.factory.propose_upgrade_fee_replace(&second, 30).unwrap();
    assert_eq!(fx.factory.upgrade_fee_proposal_timestamp(), Some(second.now));

    fx.advance(10);
    let ctx = fx.ctx(&fx.admin);
    assert_matches!(
        fx.factory.execute_upgrade_fee_replace(&ctx),
        Err(QuestError::Governance(GovernanceReason::TooSoon { .. }))
    );
}

#[test]
fn test_new_payment_token_applies_to_later_upgrades() {
    init_test_tracing();
    let mut fx = FactoryFixture::new();
    let new_token = fx.ledger.deploy_token("NewToken");
    let owner = TestIdentity::named("owner");
    let chain = fx.create_chain(ChainInfoBuilder::new(owner.address()).build());

    let admin = fx.ctx(&fx.admin);
    fx.factory
        .propose_payment_token_replace(&admin, new_token)
        .unwrap();
    assert_eq!(fx.factory.proposed_payment_token(), Some(new_token));
    fx.advance(GOVERNANCE_DELAY_SECS);
    let admin = fx.ctx(&fx.admin);
    let receipt = fx.factory.execute_payment_token_replace(&admin).unwrap();
    assert_eq!(receipt.event_names(), vec!["PaymentTokenReplaced"]);
    assert_eq!(fx.factory.payment_token(), new_token);

    // funds in the old token no longer count
    fx.fund(owner.address(), FactoryFixture::UPGRADE_FEE);
    fx.approve_factory(owner.address(), FactoryFixture::UPGRADE_FEE);
    let ctx = fx.ctx(&owner);
    assert_matches!(
        fx.factory.upgrade_quest_chain(&ctx, chain, &mut fx.ledger),
        Err(QuestError::External(ExternalReason::InsufficientAllowance))
    );

    let factory = fx.factory.address();
    fx.ledger
        .mint(new_token, owner.address(), FactoryFixture::UPGRADE_FEE);
    fx.ledger
        .approve(new_token, owner.address(), factory, FactoryFixture::UPGRADE_FEE);
    fx.factory
        .upgrade_quest_chain(&ctx, chain, &mut fx.ledger)
        .unwrap();
    assert_eq!(
        fx.ledger.balance(new_token, fx.admin.address()),
        FactoryFixture::UPGRADE_FEE
    );
}

#[test]
fn test_admin_handover_moves_every_privilege() {
    init_test_tracing();
    let mut fx = FactoryFixture::new();
    let successor = TestIdentity::named("successor");
    let old = fx.ctx(&fx.admin);
    fx.factory
        .propose_admin_replace(&old, successor.address())
        .unwrap();
    assert_eq!(fx.factory.proposed_admin(), Some(successor.address()));
    assert_eq!(fx.factory.admin_proposal_timestamp(), Some(old.now));

    fx.advance(GOVERNANCE_DELAY_SECS);
    let new = fx.ctx(&successor);
    fx.factory.execute_admin_replace(&new).unwrap();
    assert_eq!(fx.factory.admin(), successor.address());
    assert_eq!(fx.factory.proposed_admin(), None);

    let old = fx.ctx(&fx.admin);
    assert_matches!(
        fx.factory.propose_upgrade_fee_replace(&old, 1),
        Err(QuestError::Governance(GovernanceReason::NotAdmin))
    );
    fx.factory.propose_upgrade_fee_replace(&new, 1).unwrap();
}

#[test]
fn test_zero_payment_token_rejected() {
    init_test_tracing();
    let mut fx = FactoryFixture::new();
    let admin = fx.ctx(&fx.admin);
    assert_matches!(
        fx.factory.propose_payment_token_replace(&admin, Address::ZERO),
        Err(QuestError::Invalid(_))
    );
    assert_eq!(fx.factory.proposed_payment_token(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_created_address_matches_prediction(salt in arb_salt()) {
        let mut fx = FactoryFixture::new();
        let owner = TestIdentity::named("owner");
        let predicted = fx.factory.predict_address(salt);
        let ctx = fx.ctx(&owner);
        let receipt = fx
            .factory
            .create(&ctx, ChainInfoBuilder::new(owner.address()).build(), salt)
            .unwrap();
        prop_assert_eq!(receipt.output, predicted);
        prop_assert_eq!(fx.factory.get_quest_chain_address(0).unwrap(), predicted);
    }

    #[test]
    fn prop_distinct_salts_give_distinct_addresses(a in 0u64..1_000, b in 0u64..1_000) {
        prop_assume!(a != b);
        let fx = FactoryFixture::new();
        prop_assert_ne!(
            fx.factory.predict_address(Salt::from_index(a)),
            fx.factory.predict_address(Salt::from_index(b))
        );
    }
}

#[test]
fn test_proposal_timestamps_start_empty() {
    let fx = FactoryFixture::new();
    assert_eq!(fx.factory.admin_proposal_timestamp(), None);
    assert_eq!(fx.factory.payment_token_proposal_timestamp(), None);
    assert_eq!(fx.factory.governance_delay_secs(), GOVERNANCE_DELAY_SECS);
}
