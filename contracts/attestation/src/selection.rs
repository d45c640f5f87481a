//! Attester selection for newly registered commitments.

use soroban_sdk::Env;

use crate::roster;
use crate::store::KeyValueStore;
use crate::types::AccountId;
use crate::Error;

/// Picks the attestor a fresh registration is bound to.
pub trait AttesterSelector {
    /// # Errors
    /// `NoAttestatorAvailable` if the roster is empty.
    fn select<S: KeyValueStore>(&self, e: &Env, store: &S) -> Result<AccountId, Error>;
}

/// Deterministically picks the last roster slot.
// TODO: replace with a randomized pick seeded from `env.prng()` once a selection policy is agreed.
#[derive(Clone, Copy, Debug, Default)]
pub struct LastEntry;

impl AttesterSelector for LastEntry {
    fn select<S: KeyValueStore>(&self, e: &Env, store: &S) -> Result<AccountId, Error> {
        let length = roster::len(e, store);
        if length == 0 {
            return Err(Error::NoAttestatorAvailable);
        }
        roster::at(e, store, length - 1)
    }
}
