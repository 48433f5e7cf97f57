//! Weighted, deterministic winner selection.
//!
//! Participants are expanded into a ticket pool (one entry per ticket) in
//! ascending slot order, the pool is Fisher–Yates shuffled with draws from
//! [`HashRng`], and the first `k` distinct addresses win, in rank order.
//! Expansion order is the stable slot order, never a hash-map iteration
//! order: the shuffle is order-sensitive, and replay verification depends on
//! the expansion being reproducible.

use std::collections::HashSet;

use crate::core::codec::ParticipantEntry;
use crate::core::random::{HashRng, UniformRng};
use crate::host::Address;

/// Selects up to `winner_count` distinct winners from the weighted pool.
///
/// `participants` must be in ascending slot order (as returned by the
/// participant store). A participant holding many tickets cannot occupy more
/// than one winner slot, but is proportionally more likely to occupy the one
/// it does. When fewer distinct participants exist than `winner_count`, the
/// result legitimately shrinks. First position = top share.
pub fn select_winners(
    participants: &[ParticipantEntry],
    total_tickets: u64,
    winner_count: usize,
    seed: u64,
) -> Vec<Address> {
    if winner_count == 0 || total_tickets == 0 {
        return Vec::new();
    }

    // One pool entry per ticket, expanded in slot order.
    let mut pool: Vec<&str> = Vec::with_capacity(total_tickets as usize);
    for entry in participants {
        for _ in 0..entry.tickets {
            pool.push(entry.address.as_str());
        }
    }

    // Fisher–Yates with unbiased index draws.
    let mut rng = HashRng::new(seed);
    for i in (1..pool.len()).rev() {
        let j = rng.index(i as u64 + 1) as usize;
        pool.swap(i, j);
    }

    // First `winner_count` distinct addresses, in shuffled order.
    let mut winners: Vec<Address> = Vec::with_capacity(winner_count);
    let mut seen: HashSet<&str> = HashSet::with_capacity(winner_count);
    for addr in pool {
        if seen.insert(addr) {
            winners.push(addr.to_string());
            if winners.len() == winner_count {
                break;
            }
        }
    }

    winners
}
