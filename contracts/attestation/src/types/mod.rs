//! Protocol data types for attestation records and the attestor roster.
//!
//! Includes the lifecycle state, the per-commitment record, and the fixed-width
//! identifiers both are keyed by.

pub mod record;

pub use record::{AccountId, AttestationRecord, Commitment, ValueState, MAX_PRIVATE_INFO_LEN};
