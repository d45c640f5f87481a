//! Global configuration: registration fee and grace-period width.
//!
//! Both values live in the keyed store under full keys. The fee may be replaced
//! by the owner at any time; the grace width is fixed at initialization.

use soroban_sdk::{Bytes, Env};

use crate::keys;
use crate::store::KeyValueStore;
use crate::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GlobalConfig {
    /// Exact payment `register_data` requires.
    pub registration_cost: i128,
    /// Grace-period width in ledger sequence units.
    pub max_nonce_diff: u64,
}

impl GlobalConfig {
    /// Loads both values.
    ///
    /// # Errors
    /// `NotInitialized` if either key is missing, `CorruptRecord` if a value has
    /// the wrong width.
    pub fn load<S: KeyValueStore>(e: &Env, store: &S) -> Result<Self, Error> {
        Ok(GlobalConfig {
            registration_cost: load_registration_cost(e, store)?,
            max_nonce_diff: load_max_nonce_diff(e, store)?,
        })
    }

    pub fn store<S: KeyValueStore>(&self, e: &Env, store: &mut S) -> Result<(), Error> {
        store_registration_cost(e, store, self.registration_cost)?;
        let width = Bytes::from_array(e, &self.max_nonce_diff.to_be_bytes());
        store.store(&keys::max_nonce_diff(e), &width);
        Ok(())
    }
}

pub fn load_registration_cost<S: KeyValueStore>(e: &Env, store: &S) -> Result<i128, Error> {
    let raw = store
        .load(&keys::registration_cost(e))
        .ok_or(Error::NotInitialized)?;
    Ok(i128::from_be_bytes(fixed::<16>(&raw)?))
}

/// Replaces the registration cost.
///
/// # Errors
/// `NegativeAmount` for a cost below zero.
pub fn store_registration_cost<S: KeyValueStore>(
    e: &Env,
    store: &mut S,
    cost: i128,
) -> Result<(), Error> {
    if cost < 0 {
        return Err(Error::NegativeAmount);
    }
    let raw = Bytes::from_array(e, &cost.to_be_bytes());
    store.store(&keys::registration_cost(e), &raw);
    Ok(())
}

pub fn load_max_nonce_diff<S: KeyValueStore>(e: &Env, store: &S) -> Result<u64, Error> {
    let raw = store
        .load(&keys::max_nonce_diff(e))
        .ok_or(Error::NotInitialized)?;
    Ok(u64::from_be_bytes(fixed::<8>(&raw)?))
}

pub(crate) fn fixed<const N: usize>(raw: &Bytes) -> Result<[u8; N], Error> {
    if raw.len() as usize != N {
        return Err(Error::CorruptRecord);
    }
    let mut buf = [0u8; N];
    raw.copy_into_slice(&mut buf);
    Ok(buf)
}
