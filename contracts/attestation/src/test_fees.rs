//! Registration fee collection and owner withdrawal.

use crate::test_helpers::{self, commitment, funded_user, COST};
use crate::Error;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env};

#[test]
fn test_fee_must_be_exact() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let user = funded_user(&e, &s);
    let h = commitment(&e, 1);

    for wrong in [0, COST - 1, COST + 1, -COST] {
        assert_eq!(
            s.client.try_register_data(&user, &h, &wrong),
            Err(Ok(Error::WrongFee))
        );
    }
    assert_eq!(s.client.try_get_user_data(&h), Err(Ok(Error::NoUserUnderKey)));
    assert_eq!(s.token.balance(&s.client.address), 0);
}

#[test]
fn test_fee_transferred_to_contract() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let user = funded_user(&e, &s);
    let before = s.token.balance(&user);

    s.client.register_data(&user, &commitment(&e, 1), &COST);

    assert_eq!(s.token.balance(&user), before - COST);
    assert_eq!(s.token.balance(&s.client.address), COST);
}

#[test]
fn test_set_register_cost_applies_to_next_call() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let user = funded_user(&e, &s);

    s.client.set_register_cost(&s.owner, &250);
    assert_eq!(s.client.get_registration_cost(), 250);
    assert_eq!(
        s.client.try_register_data(&user, &commitment(&e, 1), &COST),
        Err(Ok(Error::WrongFee))
    );
    s.client.register_data(&user, &commitment(&e, 1), &250);

    s.client.set_register_cost(&s.owner, &0);
    s.client.register_data(&user, &commitment(&e, 2), &0);
    assert_eq!(s.token.balance(&s.client.address), 250);
}

#[test]
fn test_set_register_cost_guards() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let stranger = Address::generate(&e);

    assert_eq!(
        s.client.try_set_register_cost(&stranger, &1),
        Err(Ok(Error::Forbidden))
    );
    assert_eq!(
        s.client.try_set_register_cost(&s.owner, &-1),
        Err(Ok(Error::NegativeAmount))
    );
    assert_eq!(s.client.get_registration_cost(), COST);
}

#[test]
fn test_claim_transfers_balance_to_owner() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    for tag in 1..=3u8 {
        let user = funded_user(&e, &s);
        s.client.register_data(&user, &commitment(&e, tag), &COST);
    }

    assert_eq!(s.client.claim(&s.owner), COST * 3);
    assert_eq!(s.token.balance(&s.owner), COST * 3);
    assert_eq!(s.token.balance(&s.client.address), 0);

    // nothing left: a zero transfer, not an error
    assert_eq!(s.client.claim(&s.owner), 0);
    assert_eq!(s.token.balance(&s.owner), COST * 3);
}

#[test]
fn test_claim_owner_only() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let user = funded_user(&e, &s);
    s.client.register_data(&user, &commitment(&e, 1), &COST);

    assert_eq!(s.client.try_claim(&user), Err(Ok(Error::Forbidden)));
    assert_eq!(s.client.try_claim(&s.attestor), Err(Ok(Error::Forbidden)));
    assert_eq!(s.token.balance(&s.client.address), COST);
}
