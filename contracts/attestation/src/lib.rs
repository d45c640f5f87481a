#![no_std]

//! Commit-reveal identity attestation.
//!
//! A user registers a commitment hash and pays the registration fee, the
//! attestor bound to it publishes a public-info hash, and the user reveals the
//! private payload whose keccak-256 must match before the record is approved.
//! Every two-party step is bounded by a ledger-sequence grace period.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, token, Address, Bytes, BytesN, Env,
    String,
};

pub mod codec;
pub mod config;
pub mod events;
pub mod keys;
pub mod machine;
pub mod roster;
pub mod selection;
pub mod store;
pub mod types;
pub mod views;

pub use config::GlobalConfig;
pub use machine::{Call, Machine};
pub use store::{KeyValueStore, MemoryStore, PersistentStore, Staged};
pub use types::{AccountId, AttestationRecord, Commitment, ValueState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    WrongFee = 1,
    KeyAlreadyExists = 2,
    AlreadyRegistered = 3,
    AlreadyProcessing = 4,
    NotAnAttestator = 5,
    NotTheSelectedAttester = 6,
    OutsideGracePeriod = 7,
    NoUserUnderKey = 8,
    OnlyUserCanAttest = 9,
    InfoMismatch = 10,
    Forbidden = 11,
    DoesNotExist = 12,
    CannotDeleteLast = 13,
    UserDataNotYetAttested = 14,
    NotInitialized = 15,
    AlreadyInitialized = 16,
    NegativeAmount = 17,
    PrivateInfoTooLarge = 18,
    CorruptRecord = 19,
    NoAttestatorAvailable = 20,
    IndexOutOfBounds = 21,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Contract owner; the only caller allowed to manage the roster, fee and balance.
    Owner,
    /// Token registration fees are paid in.
    FeeToken,
    /// Address that last registered a commitment.
    OwnerAddress(BytesN<32>),
}

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn owner(e: &Env) -> Result<Address, Error> {
    let owner = e
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)?;
    extend_instance(e);
    Ok(owner)
}

fn fee_token(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::FeeToken)
        .ok_or(Error::NotInitialized)
}

/// Ledger sequence, the protocol's logical clock.
fn now(e: &Env) -> u64 {
    u64::from(e.ledger().sequence())
}

/// Authenticates `caller` and captures who is acting and when.
fn current_call(e: &Env, caller: &Address) -> Result<Call, Error> {
    caller.require_auth();
    Ok(Call {
        caller: keys::account_id(e, caller),
        owner: keys::account_id(e, &owner(e)?),
        now: now(e),
    })
}

#[contract]
pub struct AttestationContract;

#[contractimpl]
impl AttestationContract {
    /// Initialize the contract.
    /// @param owner Account allowed to manage attestors, the fee, and claim the balance
    /// @param fee_token Token the registration fee is paid in
    /// @param registration_cost Exact fee `register_data` requires
    /// @param attestator First roster member
    /// @param max_nonce_diff Grace-period width in ledgers
    pub fn initialize(
        e: Env,
        owner: Address,
        fee_token: Address,
        registration_cost: i128,
        attestator: Address,
        max_nonce_diff: u64,
    ) -> Result<(), Error> {
        owner.require_auth();
        if e.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }

        let attestator_id = keys::account_id(&e, &attestator);
        let config = GlobalConfig {
            registration_cost,
            max_nonce_diff,
        };
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).initialize(&config, &attestator_id)?;

        e.storage().instance().set(&DataKey::Owner, &owner);
        e.storage().instance().set(&DataKey::FeeToken, &fee_token);
        extend_instance(&e);
        events::emit_initialized(&e, &owner, &attestator_id, registration_cost, max_nonce_diff);
        Ok(())
    }

    pub fn version(e: Env) -> String {
        String::from_str(&e, env!("CARGO_PKG_VERSION"))
    }

    /// Claim (or re-claim) a commitment. `payment` must equal the registration cost
    /// and is transferred from `caller` in the fee token.
    pub fn register_data(
        e: Env,
        caller: Address,
        commitment: BytesN<32>,
        payment: i128,
    ) -> Result<(), Error> {
        let call = current_call(&e, &caller)?;
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).register_data(&call, &commitment, payment)?;

        let key = DataKey::OwnerAddress(commitment);
        e.storage().persistent().set(&key, &caller);
        e.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );

        if payment > 0 {
            token::Client::new(&e, &fee_token(&e)?).transfer(
                &caller,
                &e.current_contract_address(),
                &payment,
            );
        }
        Ok(())
    }

    /// Publish the public-info hash for a commitment. Attestors only.
    pub fn save_public_info(
        e: Env,
        caller: Address,
        commitment: BytesN<32>,
        public_info: BytesN<32>,
    ) -> Result<(), Error> {
        let call = current_call(&e, &caller)?;
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).save_public_info(&call, &commitment, &public_info)?;
        Ok(())
    }

    /// Reveal the private payload for a pending commitment. Owner of the record only.
    pub fn attest(
        e: Env,
        caller: Address,
        commitment: BytesN<32>,
        private_info: Bytes,
    ) -> Result<(), Error> {
        let call = current_call(&e, &caller)?;
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).attest(&call, &commitment, &private_info)?;
        Ok(())
    }

    pub fn add_attestator(e: Env, caller: Address, account: Address) -> Result<(), Error> {
        let call = current_call(&e, &caller)?;
        let account = keys::account_id(&e, &account);
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).add_attestator(&call, &account)
    }

    pub fn remove_attestator(e: Env, caller: Address, account: Address) -> Result<(), Error> {
        let call = current_call(&e, &caller)?;
        let account = keys::account_id(&e, &account);
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).remove_attestator(&call, &account)
    }

    pub fn set_register_cost(e: Env, caller: Address, amount: i128) -> Result<(), Error> {
        let call = current_call(&e, &caller)?;
        let mut store = PersistentStore::new(&e);
        Machine::new(&e, &mut store).set_register_cost(&call, amount)
    }

    /// Transfer the contract's whole fee-token balance to the owner.
    /// @return The amount transferred (zero is not an error)
    pub fn claim(e: Env, caller: Address) -> Result<i128, Error> {
        let call = current_call(&e, &caller)?;
        call.require_owner()?;

        let owner = owner(&e)?;
        let token = token::Client::new(&e, &fee_token(&e)?);
        let contract = e.current_contract_address();
        let balance = token.balance(&contract);
        token.transfer(&contract, &owner, &balance);

        events::emit_claimed(&e, &owner, balance);
        Ok(balance)
    }

    /// Raw encoded record stored under a commitment.
    pub fn get_user_data(e: Env, commitment: BytesN<32>) -> Result<Bytes, Error> {
        extend_instance(&e);
        views::user_data(&e, &PersistentStore::new(&e), &commitment)
    }

    pub fn get_user_record(e: Env, commitment: BytesN<32>) -> Result<AttestationRecord, Error> {
        extend_instance(&e);
        views::user_record(&e, &PersistentStore::new(&e), &commitment)
    }

    /// Account id bound to an in-flight commitment. This is the protocol id
    /// (see `account_id`), not the address; `get_owner_address` returns that.
    pub fn get_public_key(e: Env, commitment: BytesN<32>) -> Result<BytesN<32>, Error> {
        extend_instance(&e);
        views::public_key(&e, &PersistentStore::new(&e), &commitment)
    }

    /// Address bound to an in-flight commitment. Same rules as `get_public_key`.
    pub fn get_owner_address(e: Env, commitment: BytesN<32>) -> Result<Address, Error> {
        extend_instance(&e);
        views::public_key(&e, &PersistentStore::new(&e), &commitment)?;
        let key = DataKey::OwnerAddress(commitment);
        let address: Address = e
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::NoUserUnderKey)?;
        e.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
        Ok(address)
    }

    pub fn get_registration_cost(e: Env) -> Result<i128, Error> {
        extend_instance(&e);
        config::load_registration_cost(&e, &PersistentStore::new(&e))
    }

    pub fn get_max_nonce_diff(e: Env) -> Result<u64, Error> {
        extend_instance(&e);
        config::load_max_nonce_diff(&e, &PersistentStore::new(&e))
    }

    pub fn is_attestator(e: Env, account: Address) -> bool {
        extend_instance(&e);
        let account = keys::account_id(&e, &account);
        roster::is_attestator(&e, &PersistentStore::new(&e), &account)
    }

    pub fn get_attestator_count(e: Env) -> u64 {
        extend_instance(&e);
        roster::len(&e, &PersistentStore::new(&e))
    }

    pub fn get_attestator(e: Env, index: u64) -> Result<BytesN<32>, Error> {
        extend_instance(&e);
        roster::at(&e, &PersistentStore::new(&e), index)
    }

    pub fn get_owner(e: Env) -> Result<Address, Error> {
        owner(&e)
    }

    /// Protocol account id the contract uses for `address`.
    pub fn account_id(e: Env, address: Address) -> BytesN<32> {
        keys::account_id(&e, &address)
    }
}

#[cfg(test)]
mod test_helpers;



#[cfg(test)]
mod test_roster;



#[cfg(test)]
mod test_fees;
