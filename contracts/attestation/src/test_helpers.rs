//! Shared fixtures for contract-level and store-level tests.

use crate::{
    AccountId, AttestationContract, AttestationContractClient, GlobalConfig, Machine, MemoryStore,
};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, Address, Bytes, BytesN, Env};

pub const COST: i128 = 100;
pub const GRACE: u64 = 10;
pub const START: u32 = 100;

pub struct Setup<'a> {
    pub client: AttestationContractClient<'a>,
    pub owner: Address,
    pub attestor: Address,
    pub token: token::Client<'a>,
    pub token_admin: token::StellarAssetClient<'a>,
}

/// Contract initialized with cost 100, one attestor and a grace width of 10,
/// at ledger sequence `START`.
pub fn setup(e: &Env) -> Setup<'_> {
    e.mock_all_auths();
    e.ledger().set_sequence_number(START);

    let contract_id = e.register(AttestationContract, ());
    let client = AttestationContractClient::new(e, &contract_id);

    let issuer = Address::generate(e);
    let token_id = e.register_stellar_asset_contract_v2(issuer).address();
    let token = token::Client::new(e, &token_id);
    let token_admin = token::StellarAssetClient::new(e, &token_id);

    let owner = Address::generate(e);
    let attestor = Address::generate(e);
    client.initialize(&owner, &token_id, &COST, &attestor, &GRACE);

    Setup {
        client,
        owner,
        attestor,
        token,
        token_admin,
    }
}

/// A fresh account holding enough fee token for a few registrations.
pub fn funded_user(e: &Env, s: &Setup) -> Address {
    let user = Address::generate(e);
    s.token_admin.mint(&user, &(COST * 10));
    user
}

pub fn commitment(e: &Env, tag: u8) -> BytesN<32> {
    BytesN::from_array(e, &[tag; 32])
}

pub fn keccak(e: &Env, data: &Bytes) -> BytesN<32> {
    e.crypto().keccak256(data).to_bytes()
}

pub fn advance(e: &Env, ledgers: u32) {
    let next = e.ledger().sequence() + ledgers;
    e.ledger().set_sequence_number(next);
}

/// Fixed account id for store-level tests. `tag` must be non-zero.
pub fn account(e: &Env, tag: u8) -> AccountId {
    BytesN::from_array(e, &[tag; 32])
}

/// Runs `f` inside a contract frame so events and logs have a contract context.
pub fn in_contract<T>(e: &Env, f: impl FnOnce() -> T) -> T {
    let contract_id = e.register(AttestationContract, ());
    e.as_contract(&contract_id, f)
}

/// In-memory store seeded with a configuration and a single attestor.
pub fn seeded_store(e: &Env, attestor: &AccountId) -> MemoryStore {
    let mut store = MemoryStore::new(e);
    let config = GlobalConfig {
        registration_cost: COST,
        max_nonce_diff: GRACE,
    };
    Machine::new(e, &mut store).initialize(&config, attestor).unwrap();
    store
}
