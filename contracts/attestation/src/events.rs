//! Protocol events, published after a transition commits.

use soroban_sdk::{Address, BytesN, Env, Symbol};

use crate::types::{AccountId, Commitment};

pub fn emit_initialized(
    e: &Env,
    owner: &Address,
    attestator: &AccountId,
    cost: i128,
    max_nonce_diff: u64,
) {
    e.events().publish(
        (Symbol::new(e, "initialized"),),
        (owner.clone(), attestator.clone(), cost, max_nonce_diff),
    );
}

pub fn emit_registered(e: &Env, commitment: &Commitment, owner: &AccountId, attester: &AccountId) {
    e.events().publish(
        (Symbol::new(e, "registered"), commitment.clone()),
        (owner.clone(), attester.clone()),
    );
}

pub fn emit_public_info_saved(
    e: &Env,
    commitment: &Commitment,
    owner: &AccountId,
    public_info: &BytesN<32>,
) {
    e.events().publish(
        (Symbol::new(e, "public_info_saved"), commitment.clone()),
        (owner.clone(), public_info.clone()),
    );
}

pub fn emit_attested(e: &Env, commitment: &Commitment, owner: &AccountId) {
    e.events()
        .publish((Symbol::new(e, "attested"), commitment.clone()), owner.clone());
}

pub fn emit_attestator_added(e: &Env, account: &AccountId) {
    e.events()
        .publish((Symbol::new(e, "attestator_added"),), account.clone());
}

pub fn emit_attestator_removed(e: &Env, account: &AccountId) {
    e.events()
        .publish((Symbol::new(e, "attestator_removed"),), account.clone());
}

pub fn emit_registration_cost_set(e: &Env, amount: i128) {
    e.events()
        .publish((Symbol::new(e, "registration_cost_set"),), amount);
}

pub fn emit_claimed(e: &Env, owner: &Address, amount: i128) {
    e.events()
        .publish((Symbol::new(e, "claimed"),), (owner.clone(), amount));
}
