//! Storage abstraction over opaque byte keys.
//!
//! The state machine only ever sees a `KeyValueStore`. On-chain it runs over
//! `PersistentStore`; tests can swap in `MemoryStore`. Every operation writes
//! through a `Staged` overlay and commits once at the end, so a failed call never
//! leaves partial writes behind.

use soroban_sdk::{Bytes, Env, Map};

use crate::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};

/// Byte-keyed store. `length_of` is 0 for an absent key.
pub trait KeyValueStore {
    fn load(&self, key: &Bytes) -> Option<Bytes>;

    fn store(&mut self, key: &Bytes, value: &Bytes);

    fn length_of(&self, key: &Bytes) -> u32 {
        self.load(key).map(|v| v.len()).unwrap_or(0)
    }
}

/// Contract persistent storage. Every hit on a key, read or write, bumps its TTL.
pub struct PersistentStore<'a> {
    env: &'a Env,
}

impl<'a> PersistentStore<'a> {
    pub fn new(env: &'a Env) -> Self {
        PersistentStore { env }
    }
}

impl KeyValueStore for PersistentStore<'_> {
    fn load(&self, key: &Bytes) -> Option<Bytes> {
        let storage = self.env.storage().persistent();
        let value = storage.get::<Bytes, Bytes>(key)?;
        storage.extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
        Some(value)
    }

    fn store(&mut self, key: &Bytes, value: &Bytes) {
        let storage = self.env.storage().persistent();
        storage.set(key, value);
        storage.extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }
}

/// In-memory store, for exercising the protocol without contract storage.
pub struct MemoryStore {
    entries: Map<Bytes, Bytes>,
}

impl MemoryStore {
    pub fn new(env: &Env) -> Self {
        MemoryStore { entries: Map::new(env) }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> u32 {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &Bytes) -> Option<Bytes> {
        self.entries.get(key.clone())
    }

    fn store(&mut self, key: &Bytes, value: &Bytes) {
        self.entries.set(key.clone(), value.clone());
    }
}

/// Write overlay on top of another store. Reads see pending writes first;
/// nothing reaches the inner store until `commit`.
pub struct Staged<'s, S: KeyValueStore> {
    inner: &'s mut S,
    pending: Map<Bytes, Bytes>,
}

impl<'s, S: KeyValueStore> Staged<'s, S> {
    pub fn new(env: &Env, inner: &'s mut S) -> Self {
        Staged {
            inner,
            pending: Map::new(env),
        }
    }

    /// Number of staged writes.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> u32 {
        self.pending.len()
    }

    pub fn commit(self) {
        for (key, value) in self.pending.iter() {
            self.inner.store(&key, &value);
        }
    }
}

impl<S: KeyValueStore> KeyValueStore for Staged<'_, S> {
    fn load(&self, key: &Bytes) -> Option<Bytes> {
        match self.pending.get(key.clone()) {
            Some(value) => Some(value),
            None => self.inner.load(key),
        }
    }

    fn store(&mut self, key: &Bytes, value: &Bytes) {
        self.pending.set(key.clone(), value.clone());
    }
}
