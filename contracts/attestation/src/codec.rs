//! Fixed-layout record codec.
//!
//! The stored layout is declared once as an ordered field schema. `Writer` and
//! `Reader` walk that schema in order and check every field width, so encode and
//! decode cannot drift apart through offset arithmetic.
//!
//! ```text
//! state | public_info | owner | attester | last_action | private_info_len | private_info
//!   1   |     32      |  32   |    32    |   8 (BE)    |      4 (BE)      |  len bytes
//! ```

use soroban_sdk::{log, Bytes, BytesN, Env, Symbol};

use crate::types::{AccountId, AttestationRecord, ValueState, MAX_PRIVATE_INFO_LEN};
use crate::Error;

/// One fixed-width header field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub width: u32,
}

pub const STATE: Field = Field { name: "state", width: 1 };
pub const PUBLIC_INFO: Field = Field { name: "public_info", width: 32 };
pub const OWNER: Field = Field { name: "owner", width: 32 };
pub const ATTESTER: Field = Field { name: "attester", width: 32 };
pub const LAST_ACTION: Field = Field { name: "last_action", width: 8 };
pub const PRIVATE_INFO_LEN: Field = Field { name: "private_info_len", width: 4 };

/// Header fields in storage order. The variable `private_info` tail follows.
pub const HEADER: [Field; 6] = [STATE, PUBLIC_INFO, OWNER, ATTESTER, LAST_ACTION, PRIVATE_INFO_LEN];

pub const HEADER_LEN: u32 = header_len();

const fn header_len() -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < HEADER.len() {
        total += HEADER[i].width;
        i += 1;
    }
    total
}

/// Byte offset of a header field, or `None` if it is not part of the schema.
#[cfg(test)]
pub(crate) fn offset_of(field: &Field) -> Option<u32> {
    let mut offset = 0;
    for f in HEADER.iter() {
        if f == field {
            return Some(offset);
        }
        offset += f.width;
    }
    None
}

fn schema_mismatch(e: &Env, field: &Field) -> Error {
    log!(e, "record schema mismatch", Symbol::new(e, field.name), field.width);
    Error::CorruptRecord
}

struct Writer {
    out: Bytes,
    next: usize,
}

impl Writer {
    fn new(e: &Env) -> Self {
        Writer { out: Bytes::new(e), next: 0 }
    }

    fn put(&mut self, field: &Field, value: &[u8]) -> Result<(), Error> {
        if HEADER.get(self.next) != Some(field) || value.len() as u32 != field.width {
            return Err(schema_mismatch(self.out.env(), field));
        }
        self.out.extend_from_slice(value);
        self.next += 1;
        Ok(())
    }

    fn finish(mut self, tail: &Bytes) -> Result<Bytes, Error> {
        if self.next != HEADER.len() {
            return Err(Error::CorruptRecord);
        }
        self.out.append(tail);
        Ok(self.out)
    }
}

struct Reader<'a> {
    data: &'a Bytes,
    offset: u32,
    next: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a Bytes) -> Self {
        Reader { data, offset: 0, next: 0 }
    }

    fn take(&mut self, field: &Field) -> Result<Bytes, Error> {
        if HEADER.get(self.next) != Some(field) {
            return Err(schema_mismatch(self.data.env(), field));
        }
        let slice = self.slice(field.width)?;
        self.next += 1;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, field: &Field) -> Result<[u8; N], Error> {
        if field.width as usize != N {
            return Err(schema_mismatch(self.data.env(), field));
        }
        let slice = self.take(field)?;
        let mut buf = [0u8; N];
        slice.copy_into_slice(&mut buf);
        Ok(buf)
    }

    /// Reads exactly `len` tail bytes; anything physically stored past them is ignored.
    fn tail(&mut self, len: u32) -> Result<Bytes, Error> {
        if self.next != HEADER.len() {
            return Err(Error::CorruptRecord);
        }
        self.slice(len)
    }

    fn slice(&mut self, len: u32) -> Result<Bytes, Error> {
        let end = self.offset.checked_add(len).ok_or(Error::CorruptRecord)?;
        if end > self.data.len() {
            return Err(Error::CorruptRecord);
        }
        let slice = self.data.slice(self.offset..end);
        self.offset = end;
        Ok(slice)
    }
}

fn account_bytes(account: &Option<AccountId>) -> [u8; 32] {
    match account {
        Some(id) => id.to_array(),
        None => [0u8; 32],
    }
}

fn account_from(e: &Env, raw: [u8; 32]) -> Option<AccountId> {
    if raw == [0u8; 32] {
        None
    } else {
        Some(BytesN::from_array(e, &raw))
    }
}

/// Encodes a record into its stored layout.
///
/// # Errors
/// `PrivateInfoTooLarge` if the payload exceeds `MAX_PRIVATE_INFO_LEN`.
pub fn encode(e: &Env, record: &AttestationRecord) -> Result<Bytes, Error> {
    let private_len = record.private_info.len();
    if private_len > MAX_PRIVATE_INFO_LEN {
        return Err(Error::PrivateInfoTooLarge);
    }

    let mut w = Writer::new(e);
    w.put(&STATE, &[record.state.to_u8()])?;
    w.put(&PUBLIC_INFO, &record.public_info.to_array())?;
    w.put(&OWNER, &account_bytes(&record.owner))?;
    w.put(&ATTESTER, &account_bytes(&record.attester))?;
    w.put(&LAST_ACTION, &record.last_action.to_be_bytes())?;
    w.put(&PRIVATE_INFO_LEN, &private_len.to_be_bytes())?;
    w.finish(&record.private_info)
}

/// Decodes a stored record.
///
/// # Errors
/// `CorruptRecord` on an unknown state tag, a declared payload length above the
/// bound, or data shorter than the header plus the declared payload.
pub fn decode(e: &Env, data: &Bytes) -> Result<AttestationRecord, Error> {
    let mut r = Reader::new(data);

    let [tag] = r.take_array::<1>(&STATE)?;
    let state = ValueState::from_u8(tag).ok_or(Error::CorruptRecord)?;
    let public_info = BytesN::from_array(e, &r.take_array::<32>(&PUBLIC_INFO)?);
    let owner = account_from(e, r.take_array::<32>(&OWNER)?);
    let attester = account_from(e, r.take_array::<32>(&ATTESTER)?);
    let last_action = u64::from_be_bytes(r.take_array::<8>(&LAST_ACTION)?);
    let private_len = u32::from_be_bytes(r.take_array::<4>(&PRIVATE_INFO_LEN)?);
    if private_len > MAX_PRIVATE_INFO_LEN {
        return Err(Error::CorruptRecord);
    }
    let private_info = r.tail(private_len)?;

    Ok(AttestationRecord {
        state,
        public_info,
        owner,
        attester,
        last_action,
        private_info,
    })
}
