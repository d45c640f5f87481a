//! Attestor roster: a contiguous `index -> account` list with a separate length
//! counter, plus a per-account status flag for O(1) membership.
//!
//! Slots `[0, len)` always hold live attestors. Removal copies the last slot into
//! the hole and shrinks the length, so order carries no meaning.

use soroban_sdk::{log, Bytes, BytesN, Env};

use crate::config::fixed;
use crate::keys;
use crate::store::KeyValueStore;
use crate::types::{AccountId, ValueState};
use crate::Error;

#[must_use]
pub fn len<S: KeyValueStore>(e: &Env, store: &S) -> u64 {
    store
        .load(&keys::roster_len(e))
        .and_then(|raw| fixed::<8>(&raw).ok())
        .map(u64::from_be_bytes)
        .unwrap_or(0)
}

fn set_len<S: KeyValueStore>(e: &Env, store: &mut S, len: u64) {
    store.store(&keys::roster_len(e), &Bytes::from_array(e, &len.to_be_bytes()));
}

/// Account in slot `index`.
///
/// # Errors
/// `IndexOutOfBounds` unless `index < len`; `CorruptRecord` if the slot is malformed.
pub fn at<S: KeyValueStore>(e: &Env, store: &S, index: u64) -> Result<AccountId, Error> {
    if index >= len(e, store) {
        return Err(Error::IndexOutOfBounds);
    }
    let raw = store
        .load(&keys::roster_entry(e, index))
        .ok_or(Error::CorruptRecord)?;
    Ok(BytesN::from_array(e, &fixed::<32>(&raw)?))
}

pub fn append<S: KeyValueStore>(e: &Env, store: &mut S, account: &AccountId) {
    let index = len(e, store);
    let raw = Bytes::from_array(e, &account.to_array());
    store.store(&keys::roster_entry(e, index), &raw);
    set_len(e, store, index + 1);
}

/// Overwrites slot `index` with the last slot and shrinks the roster by one.
/// For the last slot this is a plain decrement.
///
/// # Errors
/// `IndexOutOfBounds` unless `index < len`.
pub fn remove_by_swap<S: KeyValueStore>(e: &Env, store: &mut S, index: u64) -> Result<(), Error> {
    let length = len(e, store);
    if index >= length {
        return Err(Error::IndexOutOfBounds);
    }
    let last = length - 1;
    if index != last {
        let moved = at(e, store, last)?;
        log!(e, "roster swap", last, index);
        let raw = Bytes::from_array(e, &moved.to_array());
        store.store(&keys::roster_entry(e, index), &raw);
    }
    set_len(e, store, last);
    Ok(())
}

/// Linear scan for the slot holding `account`.
pub fn position<S: KeyValueStore>(
    e: &Env,
    store: &S,
    account: &AccountId,
) -> Result<Option<u64>, Error> {
    for index in 0..len(e, store) {
        if at(e, store, index)? == *account {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

#[must_use]
pub fn status<S: KeyValueStore>(e: &Env, store: &S, account: &AccountId) -> ValueState {
    store
        .load(&keys::attestator(e, account))
        .and_then(|raw| raw.get(0))
        .and_then(ValueState::from_u8)
        .unwrap_or(ValueState::None)
}

pub fn set_status<S: KeyValueStore>(
    e: &Env,
    store: &mut S,
    account: &AccountId,
    state: ValueState,
) {
    let raw = Bytes::from_array(e, &[state.to_u8()]);
    store.store(&keys::attestator(e, account), &raw);
}

#[must_use]
pub fn is_attestator<S: KeyValueStore>(e: &Env, store: &S, account: &AccountId) -> bool {
    status(e, store, account).exists()
}
