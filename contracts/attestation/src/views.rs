//! Read-only lookups over stored records.

use soroban_sdk::{Bytes, Env};

use crate::keys;
use crate::machine::load_record;
use crate::store::KeyValueStore;
use crate::types::{AccountId, AttestationRecord, Commitment};
use crate::Error;

/// Raw stored bytes of a record.
pub fn user_data<S: KeyValueStore>(
    e: &Env,
    store: &S,
    commitment: &Commitment,
) -> Result<Bytes, Error> {
    match store.load(&keys::user(e, commitment)) {
        Some(raw) if !raw.is_empty() => Ok(raw),
        _ => Err(Error::NoUserUnderKey),
    }
}

pub fn user_record<S: KeyValueStore>(
    e: &Env,
    store: &S,
    commitment: &Commitment,
) -> Result<AttestationRecord, Error> {
    load_record(e, store, commitment)?.ok_or(Error::NoUserUnderKey)
}

/// Account bound to an in-flight record. Approved records are rejected.
pub fn public_key<S: KeyValueStore>(
    e: &Env,
    store: &S,
    commitment: &Commitment,
) -> Result<AccountId, Error> {
    let record = user_record(e, store, commitment)?;
    if record.is_approved() {
        return Err(Error::UserDataNotYetAttested);
    }
    record.owner.ok_or(Error::NoUserUnderKey)
}
