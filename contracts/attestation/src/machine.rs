//! Attestation state machine.
//!
//! ```text
//! None ----register_data----> Requested
//! Requested/Pending ----register_data (re-entry)----> Requested (Pending is kept)
//! Requested ----save_public_info----> Pending
//! Pending ----save_public_info (same attester)----> Pending
//! Pending ----attest----> Approved
//! ```
//!
//! Every operation reloads what it needs, stages its writes, and commits only
//! once all checks have passed.

use soroban_sdk::{log, Bytes, BytesN, Env};

use crate::codec;
use crate::config::{self, GlobalConfig};
use crate::events;
use crate::keys;
use crate::roster;
use crate::selection::{AttesterSelector, LastEntry};
use crate::store::{KeyValueStore, Staged};
use crate::types::{AccountId, AttestationRecord, Commitment, ValueState, MAX_PRIVATE_INFO_LEN};
use crate::Error;

/// Identity and clock of the call being processed.
#[derive(Clone, Debug)]
pub struct Call {
    pub caller: AccountId,
    pub owner: AccountId,
    pub now: u64,
}

impl Call {
    pub fn require_owner(&self) -> Result<(), Error> {
        if self.caller != self.owner {
            return Err(Error::Forbidden);
        }
        Ok(())
    }
}

/// Loads and decodes the record under `commitment`. A zero-length slot counts as absent.
pub fn load_record<S: KeyValueStore>(
    e: &Env,
    store: &S,
    commitment: &Commitment,
) -> Result<Option<AttestationRecord>, Error> {
    match store.load(&keys::user(e, commitment)) {
        Some(raw) if !raw.is_empty() => codec::decode(e, &raw).map(Some),
        _ => Ok(None),
    }
}

#[must_use]
pub fn record_exists<S: KeyValueStore>(e: &Env, store: &S, commitment: &Commitment) -> bool {
    store.length_of(&keys::user(e, commitment)) > 0
}

fn store_record<S: KeyValueStore>(
    e: &Env,
    store: &mut S,
    commitment: &Commitment,
    record: &AttestationRecord,
) -> Result<(), Error> {
    let raw = codec::encode(e, record)?;
    store.store(&keys::user(e, commitment), &raw);
    Ok(())
}

pub struct Machine<'a, S: KeyValueStore, P: AttesterSelector = LastEntry> {
    env: &'a Env,
    store: &'a mut S,
    selector: P,
}

impl<'a, S: KeyValueStore> Machine<'a, S, LastEntry> {
    pub fn new(env: &'a Env, store: &'a mut S) -> Self {
        Machine {
            env,
            store,
            selector: LastEntry,
        }
    }
}

impl<'a, S: KeyValueStore, P: AttesterSelector> Machine<'a, S, P> {
    pub fn with_selector(env: &'a Env, store: &'a mut S, selector: P) -> Self {
        Machine { env, store, selector }
    }

    /// Writes the configuration and seeds the roster with its first attestor.
    ///
    /// # Errors
    /// `AlreadyInitialized` if a configuration is already stored, `NegativeAmount`
    /// for a negative registration cost.
    pub fn initialize(
        &mut self,
        config: &GlobalConfig,
        attestator: &AccountId,
    ) -> Result<(), Error> {
        let e = self.env;
        let mut tx = Staged::new(e, &mut *self.store);
        if tx.length_of(&keys::registration_cost(e)) > 0 {
            return Err(Error::AlreadyInitialized);
        }
        config.store(e, &mut tx)?;
        roster::set_status(e, &mut tx, attestator, ValueState::Approved);
        roster::append(e, &mut tx, attestator);
        tx.commit();
        Ok(())
    }

    /// Claims `commitment` for the caller, or refreshes the caller's claim.
    ///
    /// A different owner may only be displaced once at least `max_nonce_diff`
    /// ledgers have passed since the last action on the record.
    pub fn register_data(
        &mut self,
        call: &Call,
        commitment: &Commitment,
        payment: i128,
    ) -> Result<AttestationRecord, Error> {
        let e = self.env;
        let mut tx = Staged::new(e, &mut *self.store);
        let config = GlobalConfig::load(e, &tx)?;

        if payment != config.registration_cost {
            return Err(Error::WrongFee);
        }
        if roster::is_attestator(e, &tx, commitment) {
            return Err(Error::KeyAlreadyExists);
        }

        let mut record = load_record(e, &tx, commitment)?
            .unwrap_or_else(|| AttestationRecord::empty(e, call.now));
        if record.is_approved() {
            return Err(Error::AlreadyRegistered);
        }

        match &record.owner {
            None => record.owner = Some(call.caller.clone()),
            Some(owner) if *owner == call.caller => {}
            Some(_) => {
                if record.elapsed(call.now) < config.max_nonce_diff {
                    return Err(Error::AlreadyProcessing);
                }
                log!(e, "ownership reclaimed", commitment.clone(), record.last_action);
                record.owner = Some(call.caller.clone());
            }
        }

        if record.attester.is_none() {
            let attester = self.selector.select(e, &tx)?;
            log!(e, "attester selected", commitment.clone(), attester.clone());
            record.attester = Some(attester);
        }

        record.last_action = call.now;
        if record.state != ValueState::Pending {
            record.state = ValueState::Requested;
        }

        store_record(e, &mut tx, commitment, &record)?;
        tx.commit();

        if let (Some(owner), Some(attester)) = (&record.owner, &record.attester) {
            events::emit_registered(e, commitment, owner, attester);
        }
        Ok(record)
    }

    /// Publishes the attester's public-info hash and moves the record to `Pending`.
    pub fn save_public_info(
        &mut self,
        call: &Call,
        commitment: &Commitment,
        public_info: &BytesN<32>,
    ) -> Result<AttestationRecord, Error> {
        let e = self.env;
        let mut tx = Staged::new(e, &mut *self.store);
        let max_nonce_diff = config::load_max_nonce_diff(e, &tx)?;

        if !roster::is_attestator(e, &tx, &call.caller) {
            return Err(Error::NotAnAttestator);
        }

        let mut record = load_record(e, &tx, commitment)?.ok_or(Error::NoUserUnderKey)?;
        if record.is_approved() {
            return Err(Error::AlreadyRegistered);
        }

        match &record.attester {
            None => record.attester = Some(call.caller.clone()),
            Some(attester) if *attester == call.caller => {}
            Some(_) => return Err(Error::NotTheSelectedAttester),
        }

        if record.elapsed(call.now) > max_nonce_diff {
            return Err(Error::OutsideGracePeriod);
        }

        record.public_info = public_info.clone();
        record.last_action = call.now;
        record.state = ValueState::Pending;

        store_record(e, &mut tx, commitment, &record)?;
        tx.commit();

        if let Some(owner) = &record.owner {
            events::emit_public_info_saved(e, commitment, owner, public_info);
        }
        Ok(record)
    }

    /// Reveals the private payload. Its keccak-256 must equal the published hash.
    pub fn attest(
        &mut self,
        call: &Call,
        commitment: &Commitment,
        private_info: &Bytes,
    ) -> Result<AttestationRecord, Error> {
        let e = self.env;
        let mut tx = Staged::new(e, &mut *self.store);
        let max_nonce_diff = config::load_max_nonce_diff(e, &tx)?;

        let mut record = load_record(e, &tx, commitment)?.ok_or(Error::NoUserUnderKey)?;
        if record.state != ValueState::Pending {
            return Err(Error::AlreadyRegistered);
        }
        if record.owner.as_ref() != Some(&call.caller) {
            return Err(Error::OnlyUserCanAttest);
        }
        if private_info.len() > MAX_PRIVATE_INFO_LEN {
            return Err(Error::PrivateInfoTooLarge);
        }

        let hashed: BytesN<32> = e.crypto().keccak256(private_info).to_bytes();
        if hashed != record.public_info {
            return Err(Error::InfoMismatch);
        }
        if record.elapsed(call.now) > max_nonce_diff {
            return Err(Error::OutsideGracePeriod);
        }

        record.private_info = private_info.clone();
        record.state = ValueState::Approved;
        record.last_action = call.now;

        store_record(e, &mut tx, commitment, &record)?;
        tx.commit();

        events::emit_attested(e, commitment, &call.caller);
        Ok(record)
    }

    pub fn add_attestator(&mut self, call: &Call, account: &AccountId) -> Result<(), Error> {
        let e = self.env;
        call.require_owner()?;
        let mut tx = Staged::new(e, &mut *self.store);

        if roster::is_attestator(e, &tx, account) {
            return Err(Error::KeyAlreadyExists);
        }
        // account ids and commitments share the 32-byte key space
        if record_exists(e, &tx, account) {
            return Err(Error::AlreadyRegistered);
        }

        roster::set_status(e, &mut tx, account, ValueState::Approved);
        roster::append(e, &mut tx, account);
        tx.commit();

        events::emit_attestator_added(e, account);
        Ok(())
    }

    /// Drops an attestor from the roster. The last remaining attestor cannot be removed.
    pub fn remove_attestator(&mut self, call: &Call, account: &AccountId) -> Result<(), Error> {
        let e = self.env;
        call.require_owner()?;
        let mut tx = Staged::new(e, &mut *self.store);

        if !roster::is_attestator(e, &tx, account) {
            return Err(Error::DoesNotExist);
        }
        if roster::len(e, &tx) <= 1 {
            return Err(Error::CannotDeleteLast);
        }

        let index = roster::position(e, &tx, account)?.ok_or(Error::DoesNotExist)?;
        roster::set_status(e, &mut tx, account, ValueState::None);
        roster::remove_by_swap(e, &mut tx, index)?;
        tx.commit();

        events::emit_attestator_removed(e, account);
        Ok(())
    }

    /// Replaces the fee required by the next `register_data` call.
    pub fn set_register_cost(&mut self, call: &Call, amount: i128) -> Result<(), Error> {
        let e = self.env;
        call.require_owner()?;
        let mut tx = Staged::new(e, &mut *self.store);
        config::store_registration_cost(e, &mut tx, amount)?;
        tx.commit();

        events::emit_registration_cost_set(e, amount);
        Ok(())
    }
}
