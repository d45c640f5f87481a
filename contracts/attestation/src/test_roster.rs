//! Attestor roster: contiguity, swap-removal, and the owner-only admin endpoints.

use crate::roster;
use crate::test_helpers::{self, account, commitment, funded_user, in_contract, COST};
use crate::{Error, MemoryStore, ValueState};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env};

#[test]
fn test_append_and_at() {
    let e = Env::default();
    in_contract(&e, || {
        let mut store = MemoryStore::new(&e);
        assert_eq!(roster::len(&e, &store), 0);
        assert_eq!(roster::at(&e, &store, 0), Err(Error::IndexOutOfBounds));

        for tag in 1..=3u8 {
            roster::append(&e, &mut store, &account(&e, tag));
        }
        assert_eq!(roster::len(&e, &store), 3);
        assert_eq!(roster::at(&e, &store, 0), Ok(account(&e, 1)));
        assert_eq!(roster::at(&e, &store, 2), Ok(account(&e, 3)));
        assert_eq!(roster::at(&e, &store, 3), Err(Error::IndexOutOfBounds));
    });
}

#[test]
fn test_remove_by_swap_middle() {
    let e = Env::default();
    in_contract(&e, || {
        let mut store = MemoryStore::new(&e);
        for tag in 1..=4u8 {
            roster::append(&e, &mut store, &account(&e, tag));
        }

        roster::remove_by_swap(&e, &mut store, 1).unwrap();

        assert_eq!(roster::len(&e, &store), 3);
        assert_eq!(roster::at(&e, &store, 0), Ok(account(&e, 1)));
        assert_eq!(roster::at(&e, &store, 1), Ok(account(&e, 4)));
        assert_eq!(roster::at(&e, &store, 2), Ok(account(&e, 3)));
    });
}

#[test]
fn test_remove_by_swap_last_is_decrement() {
    let e = Env::default();
    in_contract(&e, || {
        let mut store = MemoryStore::new(&e);
        roster::append(&e, &mut store, &account(&e, 1));
        roster::append(&e, &mut store, &account(&e, 2));

        roster::remove_by_swap(&e, &mut store, 1).unwrap();
        assert_eq!(roster::len(&e, &store), 1);
        assert_eq!(roster::at(&e, &store, 0), Ok(account(&e, 1)));
        assert_eq!(roster::remove_by_swap(&e, &mut store, 1), Err(Error::IndexOutOfBounds));
    });
}

#[test]
fn test_position_and_status() {
    let e = Env::default();
    in_contract(&e, || {
        let mut store = MemoryStore::new(&e);
        roster::append(&e, &mut store, &account(&e, 1));
        roster::append(&e, &mut store, &account(&e, 2));
        roster::set_status(&e, &mut store, &account(&e, 2), ValueState::Approved);

        assert_eq!(roster::position(&e, &store, &account(&e, 2)), Ok(Some(1)));
        assert_eq!(roster::position(&e, &store, &account(&e, 9)), Ok(None));
        assert!(roster::is_attestator(&e, &store, &account(&e, 2)));
        assert!(!roster::is_attestator(&e, &store, &account(&e, 1)));
        assert_eq!(roster::status(&e, &store, &account(&e, 9)), ValueState::None);
    });
}

#[test]
fn test_roster_stays_contiguous() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let extra: [Address; 4] = core::array::from_fn(|_| Address::generate(&e));
    for a in extra.iter() {
        s.client.add_attestator(&s.owner, a);
    }

    s.client.remove_attestator(&s.owner, &extra[1]);
    s.client.remove_attestator(&s.owner, &s.attestor);
    s.client.remove_attestator(&s.owner, &extra[3]);

    let live = [&extra[0], &extra[2]];
    assert_eq!(s.client.get_attestator_count(), live.len() as u64);
    for index in 0..s.client.get_attestator_count() {
        let id = s.client.get_attestator(&index);
        assert!(live.iter().any(|a| s.client.account_id(a) == id));
    }
    assert!(!s.client.is_attestator(&extra[1]));
    assert!(!s.client.is_attestator(&s.attestor));
    assert_eq!(
        s.client.try_get_attestator(&2),
        Err(Ok(Error::IndexOutOfBounds))
    );
}

#[test]
fn test_add_attestator_errors() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let candidate = Address::generate(&e);

    assert_eq!(
        s.client.try_add_attestator(&candidate, &candidate),
        Err(Ok(Error::Forbidden))
    );
    assert_eq!(
        s.client.try_add_attestator(&s.owner, &s.attestor),
        Err(Ok(Error::KeyAlreadyExists))
    );
}

#[test]
fn test_add_attestator_colliding_with_record() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let user = funded_user(&e, &s);
    let candidate = Address::generate(&e);

    // a user registers under exactly the candidate's account id
    s.client.register_data(&user, &s.client.account_id(&candidate), &COST);

    assert_eq!(
        s.client.try_add_attestator(&s.owner, &candidate),
        Err(Ok(Error::AlreadyRegistered))
    );
    assert!(!s.client.is_attestator(&candidate));
}

#[test]
fn test_remove_attestator_errors() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let stranger = Address::generate(&e);

    assert_eq!(
        s.client.try_remove_attestator(&stranger, &s.attestor),
        Err(Ok(Error::Forbidden))
    );
    assert_eq!(
        s.client.try_remove_attestator(&s.owner, &stranger),
        Err(Ok(Error::DoesNotExist))
    );
    assert_eq!(
        s.client.try_remove_attestator(&s.owner, &s.attestor),
        Err(Ok(Error::CannotDeleteLast))
    );
    assert_eq!(s.client.get_attestator_count(), 1);
    assert!(s.client.is_attestator(&s.attestor));
}

#[test]
fn test_new_registration_selects_last_attestor() {
    let e = Env::default();
    let s = test_helpers::setup(&e);
    let user = funded_user(&e, &s);
    let newest = Address::generate(&e);
    s.client.add_attestator(&s.owner, &newest);

    let h = commitment(&e, 3);
    s.client.register_data(&user, &h, &COST);
    assert_eq!(
        s.client.get_user_record(&h).attester,
        Some(s.client.account_id(&newest))
    );
}
