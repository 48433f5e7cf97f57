//! Persisted-state access: key layout, record load/save, the participant
//! index store, and the lottery id counter.
//!
//! The participant index keeps per-join cost independent of participant
//! count: an `address -> slot` lookup plus one record per slot. Slots are
//! assigned densely from 1 on first join and never reused, which also gives
//! selection its stable enumeration order (ascending slot).

use crate::core::codec::{
    decode_metadata, decode_participant, decode_stats, decode_u64, encode_metadata,
    encode_participant, encode_stats, encode_u64, LotteryMetadata, ParticipantEntry, PoolStats,
};
use crate::error::{LotteryError, Result};
use crate::host::Host;

/// Key of the monotonically increasing lottery id counter.
pub const COUNTER_KEY: &str = "counter";

pub fn metadata_key(id: u64) -> String {
    format!("lottery-meta:{}", id)
}

pub fn stats_key(id: u64) -> String {
    format!("lottery-stats:{}", id)
}

pub fn slot_key(id: u64, slot: u64) -> String {
    format!("participant-slot:{}:{}", id, slot)
}

pub fn lookup_key(id: u64, address: &str) -> String {
    format!("participant-lookup:{}:{}", id, address)
}

/// Loads lottery metadata; `None` when the lottery does not exist.
pub fn load_metadata<H: Host>(host: &H, id: u64) -> Result<Option<LotteryMetadata>> {
    match host.state_get(&metadata_key(id)) {
        Some(bytes) => Ok(Some(decode_metadata(&bytes)?)),
        None => Ok(None),
    }
}

/// Loads lottery metadata or fails with `NotFound`.
pub fn require_metadata<H: Host>(host: &H, id: u64) -> Result<LotteryMetadata> {
    load_metadata(host, id)?.ok_or(LotteryError::NotFound(id))
}

pub fn save_metadata<H: Host>(host: &mut H, meta: &LotteryMetadata) {
    host.state_set(&metadata_key(meta.id), encode_metadata(meta));
}

/// Loads pool stats, defaulting to zeroes when absent (a freshly created
/// lottery before its first join).
pub fn load_stats<H: Host>(host: &H, id: u64) -> Result<PoolStats> {
    match host.state_get(&stats_key(id)) {
        Some(bytes) => Ok(decode_stats(&bytes)?),
        None => Ok(PoolStats::default()),
    }
}

pub fn save_stats<H: Host>(host: &mut H, id: u64, stats: &PoolStats) {
    host.state_set(&stats_key(id), encode_stats(stats));
}

/// Looks up a participant's slot; `None` on first join.
pub fn lookup_slot<H: Host>(host: &H, id: u64, address: &str) -> Result<Option<u64>> {
    match host.state_get(&lookup_key(id, address)) {
        Some(bytes) => Ok(Some(decode_u64(&bytes)?)),
        None => Ok(None),
    }
}

pub fn load_participant<H: Host>(host: &H, id: u64, slot: u64) -> Result<Option<ParticipantEntry>> {
    match host.state_get(&slot_key(id, slot)) {
        Some(bytes) => Ok(Some(decode_participant(&bytes)?)),
        None => Ok(None),
    }
}

pub fn save_participant<H: Host>(host: &mut H, id: u64, slot: u64, entry: &ParticipantEntry) {
    host.state_set(&slot_key(id, slot), encode_participant(entry));
}

/// Credits `tickets` to `address`, assigning a new slot on first join or
/// updating the existing slot record in place. Updates
/// `stats.participant_count` for a new participant; the caller persists the
/// stats record afterwards.
pub fn record_join<H: Host>(
    host: &mut H,
    id: u64,
    stats: &mut PoolStats,
    address: &str,
    tickets: u64,
) -> Result<()> {
    match lookup_slot(host, id, address)? {
        Some(slot) => {
            let mut entry = load_participant(host, id, slot)?.ok_or_else(|| {
                LotteryError::Corrupt(format!(
                    "participant lookup for {} points at empty slot {}",
                    address, slot
                ))
            })?;
            entry.tickets += tickets;
            save_participant(host, id, slot, &entry);
        }
        None => {
            stats.participant_count += 1;
            let slot = stats.participant_count;
            let entry = ParticipantEntry {
                address: address.to_string(),
                tickets,
            };
            save_participant(host, id, slot, &entry);
            host.state_set(&lookup_key(id, address), encode_u64(slot));
        }
    }
    Ok(())
}

/// Enumerates all participants in ascending slot order (the stable total
/// order the winner selector depends on).
pub fn load_participants<H: Host>(host: &H, id: u64, count: u64) -> Result<Vec<ParticipantEntry>> {
    let mut participants = Vec::with_capacity(count as usize);
    for slot in 1..=count {
        let entry = load_participant(host, id, slot)?.ok_or_else(|| {
            LotteryError::Corrupt(format!("missing participant record at slot {}", slot))
        })?;
        participants.push(entry);
    }
    Ok(participants)
}

/// Reserves and returns the next lottery id (read-modify-write of the
/// counter record under the call's transaction boundary).
pub fn next_lottery_id<H: Host>(host: &mut H) -> Result<u64> {
    let counter = match host.state_get(COUNTER_KEY) {
        Some(bytes) => decode_u64(&bytes)?,
        None => 0,
    };
    let next = counter + 1;
    host.state_set(COUNTER_KEY, encode_u64(next));
    Ok(next)
}
