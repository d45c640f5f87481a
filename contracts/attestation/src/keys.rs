//! Storage key construction: full keys for singletons, `prefix || discriminator`
//! for keyed entries. Also derives the fixed-width protocol account id.

use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{Address, Bytes, BytesN, Env};

use crate::types::AccountId;

const REGISTRATION_COST: &[u8] = b"registration_cost";
const MAX_NONCE_DIFF: &[u8] = b"max_nonce_diff";
const TOTAL_ATTESTATORS: &[u8] = b"total_attestators";

const ATTESTATOR: &[u8] = b"attestator";
const USER: &[u8] = b"user";
const LIST_ATTESTATOR: &[u8] = b"list_attestator";

fn construct(e: &Env, prefix: &[u8], discriminator: &[u8]) -> Bytes {
    let mut key = Bytes::from_slice(e, prefix);
    key.extend_from_slice(discriminator);
    key
}

pub fn registration_cost(e: &Env) -> Bytes {
    Bytes::from_slice(e, REGISTRATION_COST)
}

pub fn max_nonce_diff(e: &Env) -> Bytes {
    Bytes::from_slice(e, MAX_NONCE_DIFF)
}

pub fn roster_len(e: &Env) -> Bytes {
    Bytes::from_slice(e, TOTAL_ATTESTATORS)
}

/// Attestor status slot. Both arguments share one 32-byte space, which is what
/// lets the state machine reject a commitment that collides with an attestor.
pub fn attestator(e: &Env, account: &BytesN<32>) -> Bytes {
    construct(e, ATTESTATOR, &account.to_array())
}

/// User record slot, keyed by commitment (or an account id presented as one).
pub fn user(e: &Env, commitment: &BytesN<32>) -> Bytes {
    construct(e, USER, &commitment.to_array())
}

pub fn roster_entry(e: &Env, index: u64) -> Bytes {
    construct(e, LIST_ATTESTATOR, &index.to_be_bytes())
}

/// Protocol account id for an address.
#[must_use]
pub fn account_id(e: &Env, address: &Address) -> AccountId {
    let xdr = address.clone().to_xdr(e);
    e.crypto().sha256(&xdr).to_bytes()
}

