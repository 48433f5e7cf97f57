//! Persisted record kinds and their binary codec.
//!
//! Three record kinds are stored: [`LotteryMetadata`] (rarely changing,
//! rewritten at execution), [`PoolStats`] (rewritten on every join), and
//! [`ParticipantEntry`] (one per slot). The wire format is compact
//! little-endian binary: u64/i64 fields as 8 LE bytes, strings length-prefixed
//! UTF-8, vectors length-prefixed, the lifecycle state a single byte.
//! Round-trip is lossless; any decode failure is treated as fatal state
//! corruption because it means a storage invariant was already broken.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::amount::Amount;
use crate::error::LotteryError;
use crate::host::Address;

/// Lifecycle state of a lottery. Transitions `Active -> Executed` exactly
/// once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotteryState {
    Active,
    Executed,
}

impl LotteryState {
    pub fn as_byte(self) -> u8 {
        match self {
            LotteryState::Active => 0,
            LotteryState::Executed => 1,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self, CodecError> {
        match b {
            0 => Ok(LotteryState::Active),
            1 => Ok(LotteryState::Executed),
            other => Err(CodecError::BadState(other)),
        }
    }

    /// Lower-case text for events and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            LotteryState::Active => "active",
            LotteryState::Executed => "executed",
        }
    }
}

/// A winner produced at execution: address, paid amount, configured share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub address: Address,
    pub amount: Amount,
    pub share: u8,
}

/// Static and terminal lottery data. Mutated only by create, execute, and
/// the annotation update; immutable once `Executed` apart from nothing —
/// execution itself writes the terminal fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryMetadata {
    pub id: u64,
    pub creator: Address,
    pub name: String,
    pub created_at: i64,
    pub deadline_hours: u64,
    pub deadline_unix: i64,
    /// Maximum tickets sellable across all participants; 0 means uncapped.
    pub max_tickets: u64,
    pub burn_percent: u8,
    pub ticket_price: Amount,
    pub asset: String,
    /// Ordered integer percentages, sum exactly 100. Position = rank.
    pub winner_shares: Vec<u8>,
    pub state: LotteryState,
    pub winners: Vec<Winner>,
    pub executed_at: i64,
    pub random_seed: u64,
    pub burned_amount: Amount,
    /// Donation recipient; empty string means no donation configured.
    pub donation_account: Address,
    pub donation_percent: u8,
    pub donated_amount: Amount,
    /// Opaque creator-supplied annotation; never interpreted by the core.
    pub annotation: String,
}

impl LotteryMetadata {
    /// Donation configuration, if any.
    pub fn donation(&self) -> Option<(&str, u8)> {
        if self.donation_percent > 0 && !self.donation_account.is_empty() {
            Some((self.donation_account.as_str(), self.donation_percent))
        } else {
            None
        }
    }
}

/// Mutable aggregate updated on every join and read at execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolStats {
    pub pool: Amount,
    pub total_tickets: u64,
    /// Number of distinct participants; also the highest assigned slot.
    pub participant_count: u64,
}

/// One participant record, stored at its stable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub address: Address,
    pub tickets: u64,
}

/// Errors produced while decoding persisted records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated record: missing {0}")]
    Truncated(&'static str),

    #[error("invalid lottery state byte: {0}")]
    BadState(u8),

    #[error("invalid UTF-8 in stored string")]
    Utf8,
}

impl From<CodecError> for LotteryError {
    fn from(e: CodecError) -> Self {
        LotteryError::Corrupt(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire primitives
// ---------------------------------------------------------------------------

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_u64_le(s.len() as u64);
    buf.put_slice(s.as_bytes());
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
        if self.buf.len() < n {
            return Err(CodecError::Truncated(what));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u64(&mut self, what: &'static str) -> Result<u64, CodecError> {
        let bytes = self.take(8, what)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    fn i64(&mut self, what: &'static str) -> Result<i64, CodecError> {
        Ok(self.u64(what)? as i64)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, CodecError> {
        Ok(self.take(1, what)?[0])
    }

    fn amount(&mut self, what: &'static str) -> Result<Amount, CodecError> {
        Ok(Amount::from_raw(self.i64(what)?))
    }

    fn string(&mut self, what: &'static str) -> Result<String, CodecError> {
        let len = self.u64(what)? as usize;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::Utf8)
    }
}

// ---------------------------------------------------------------------------
// Record codecs
// ---------------------------------------------------------------------------

pub fn encode_metadata(m: &LotteryMetadata) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(256);

    buf.put_u64_le(m.id);
    put_str(&mut buf, &m.creator);
    put_str(&mut buf, &m.name);
    buf.put_i64_le(m.created_at);
    buf.put_u64_le(m.deadline_hours);
    buf.put_i64_le(m.deadline_unix);
    buf.put_u64_le(m.max_tickets);
    buf.put_u8(m.burn_percent);
    buf.put_i64_le(m.ticket_price.raw());
    put_str(&mut buf, &m.asset);

    buf.put_u64_le(m.winner_shares.len() as u64);
    for share in &m.winner_shares {
        buf.put_u8(*share);
    }

    buf.put_u8(m.state.as_byte());

    buf.put_u64_le(m.winners.len() as u64);
    for w in &m.winners {
        put_str(&mut buf, &w.address);
        buf.put_i64_le(w.amount.raw());
        buf.put_u8(w.share);
    }

    buf.put_i64_le(m.executed_at);
    buf.put_u64_le(m.random_seed);
    buf.put_i64_le(m.burned_amount.raw());

    put_str(&mut buf, &m.donation_account);
    buf.put_u8(m.donation_percent);
    buf.put_i64_le(m.donated_amount.raw());

    put_str(&mut buf, &m.annotation);

    buf.to_vec()
}

pub fn decode_metadata(data: &[u8]) -> Result<LotteryMetadata, CodecError> {
    let mut r = Reader::new(data);

    let id = r.u64("id")?;
    let creator = r.string("creator")?;
    let name = r.string("name")?;
    let created_at = r.i64("created_at")?;
    let deadline_hours = r.u64("deadline_hours")?;
    let deadline_unix = r.i64("deadline_unix")?;
    let max_tickets = r.u64("max_tickets")?;
    let burn_percent = r.u8("burn_percent")?;
    let ticket_price = r.amount("ticket_price")?;
    let asset = r.string("asset")?;

    let share_count = r.u64("share count")? as usize;
    let mut winner_shares = Vec::with_capacity(share_count);
    for _ in 0..share_count {
        winner_shares.push(r.u8("winner share")?);
    }

    let state = LotteryState::from_byte(r.u8("state")?)?;

    let winner_count = r.u64("winner count")? as usize;
    let mut winners = Vec::with_capacity(winner_count);
    for _ in 0..winner_count {
        winners.push(Winner {
            address: r.string("winner address")?,
            amount: r.amount("winner amount")?,
            share: r.u8("winner share pct")?,
        });
    }

    Ok(LotteryMetadata {
        id,
        creator,
        name,
        created_at,
        deadline_hours,
        deadline_unix,
        max_tickets,
        burn_percent,
        ticket_price,
        asset,
        winner_shares,
        state,
        winners,
        executed_at: r.i64("executed_at")?,
        random_seed: r.u64("random_seed")?,
        burned_amount: r.amount("burned_amount")?,
        donation_account: r.string("donation_account")?,
        donation_percent: r.u8("donation_percent")?,
        donated_amount: r.amount("donated_amount")?,
        annotation: r.string("annotation")?,
    })
}

pub fn encode_stats(s: &PoolStats) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(24);
    buf.put_i64_le(s.pool.raw());
    buf.put_u64_le(s.total_tickets);
    buf.put_u64_le(s.participant_count);
    buf.to_vec()
}

pub fn decode_stats(data: &[u8]) -> Result<PoolStats, CodecError> {
    let mut r = Reader::new(data);
    Ok(PoolStats {
        pool: r.amount("pool")?,
        total_tickets: r.u64("total_tickets")?,
        participant_count: r.u64("participant_count")?,
    })
}

pub fn encode_participant(p: &ParticipantEntry) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(32);
    put_str(&mut buf, &p.address);
    buf.put_u64_le(p.tickets);
    buf.to_vec()
}

pub fn decode_participant(data: &[u8]) -> Result<ParticipantEntry, CodecError> {
    let mut r = Reader::new(data);
    Ok(ParticipantEntry {
        address: r.string("participant address")?,
        tickets: r.u64("participant tickets")?,
    })
}

/// Encodes a bare u64 (id counter, slot lookup values).
pub fn encode_u64(v: u64) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

pub fn decode_u64(data: &[u8]) -> Result<u64, CodecError> {
    Reader::new(data).u64("u64 record")
}
