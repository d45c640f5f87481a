//! Attestation record and lifecycle state.
//!
//! A record is keyed by a user-chosen commitment hash and walks
//! `None -> Requested -> Pending -> Approved`. The same `ValueState` doubles as
//! the attestor status flag, where only `None` and `Approved` are used.

use soroban_sdk::{contracttype, Bytes, BytesN, Env};

/// Maximum length of the revealed private payload.
pub const MAX_PRIVATE_INFO_LEN: u32 = 1024;

/// Fixed-width protocol account identifier (SHA-256 of the address XDR).
pub type AccountId = BytesN<32>;

/// Content hash a user registers under.
pub type Commitment = BytesN<32>;

/// Lifecycle state of a record, or the status of an attestor entry.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueState {
    None = 0,
    Requested = 1,
    Pending = 2,
    Approved = 3,
}

impl ValueState {
    /// True for every state except `None`.
    #[must_use]
    #[inline]
    pub fn exists(&self) -> bool {
        !matches!(self, ValueState::None)
    }

    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ValueState::None),
            1 => Some(ValueState::Requested),
            2 => Some(ValueState::Pending),
            3 => Some(ValueState::Approved),
            _ => None,
        }
    }
}

/// Per-commitment attestation record.
///
/// # Fields
/// * `state` - Lifecycle state.
/// * `public_info` - Hash published by the attester; zero until `Pending`.
/// * `owner` - Account that claimed the commitment; `None` only for a fresh default.
/// * `attester` - Attestor bound to the commitment.
/// * `last_action` - Ledger sequence of the latest transition, used for grace checks.
/// * `private_info` - Revealed payload; empty unless `Approved`. Its length is the
///   authoritative `private_info_len` of the stored layout.
///
/// An account field of `Some(id)` must hold a non-zero id; the codec writes an
/// unbound account as 32 zero bytes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttestationRecord {
    pub state: ValueState,
    pub public_info: BytesN<32>,
    pub owner: Option<AccountId>,
    pub attester: Option<AccountId>,
    pub last_action: u64,
    pub private_info: Bytes,
}

impl AttestationRecord {
    /// Zero-valued record used when a commitment has never been registered.
    #[must_use]
    pub fn empty(e: &Env, now: u64) -> Self {
        AttestationRecord {
            state: ValueState::None,
            public_info: BytesN::from_array(e, &[0u8; 32]),
            owner: None,
            attester: None,
            last_action: now,
            private_info: Bytes::new(e),
        }
    }

    /// Ledger units elapsed since the last transition. Saturates on a clock that
    /// appears to run backwards.
    #[must_use]
    #[inline]
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_action)
    }

    #[must_use]
    #[inline]
    pub fn is_approved(&self) -> bool {
        self.state == ValueState::Approved
    }
}
