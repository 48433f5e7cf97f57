//! Structured audit event strings.
//!
//! One event per created / joined / executed / paid / donated /
//! undistributed / annotated occurrence, each a compact `prefix|key:value|…`
//! line. The values carry exactly the core's computed results (ids, scaled
//! amounts rendered with three decimals, addresses, shares, seed), so the
//! event stream alone is enough to audit an execution.

use crate::core::amount::Amount;
use crate::core::codec::LotteryMetadata;
use crate::host::Address;

/// `lc|` — lottery created.
pub fn lottery_created(meta: &LotteryMetadata) -> String {
    let shares: Vec<String> = meta.winner_shares.iter().map(|s| s.to_string()).collect();
    let mut event = format!(
        "lc|id:{}|creator:{}|name:{}|created_at:{}|deadline:{}|burn:{}|ticket:{}|asset:{}|winners:{}|shares:{}",
        meta.id,
        meta.creator,
        meta.name,
        meta.created_at,
        meta.deadline_unix,
        meta.burn_percent,
        meta.ticket_price,
        meta.asset,
        meta.winner_shares.len(),
        shares.join(","),
    );
    if let Some((account, percent)) = meta.donation() {
        event.push_str(&format!(
            "|donation_account:{}|donation_percent:{}",
            account, percent
        ));
    }
    if meta.max_tickets > 0 {
        event.push_str(&format!("|max_tickets:{}", meta.max_tickets));
    }
    event
}

/// `lj|` — participant joined, with the ticket range covered by the buy.
pub fn lottery_joined(
    id: u64,
    participant: &Address,
    tickets: u64,
    paid: Amount,
    asset: &str,
    ticket_start: u64,
    ticket_end: u64,
) -> String {
    format!(
        "lj|id:{}|participant:{}|tickets:{}|paid:{}|asset:{}|ticket_start:{}|ticket_end:{}",
        id, participant, tickets, paid, asset, ticket_start, ticket_end
    )
}

/// `le|` — lottery executed.
pub fn lottery_executed(
    meta: &LotteryMetadata,
    pool: Amount,
    total_tickets: u64,
    participant_count: u64,
) -> String {
    format!(
        "le|id:{}|pool:{}|burned:{}|donated:{}|asset:{}|winners:{}|seed:{}|tickets:{}|participants:{}|executed_at:{}",
        meta.id,
        pool,
        meta.burned_amount,
        meta.donated_amount,
        meta.asset,
        meta.winners.len(),
        meta.random_seed,
        total_tickets,
        participant_count,
        meta.executed_at,
    )
}

/// `lp|` — one winner payout. `position` is 1-based rank.
pub fn lottery_payout(
    id: u64,
    winner: &Address,
    amount: Amount,
    share: u8,
    asset: &str,
    position: usize,
) -> String {
    format!(
        "lp|id:{}|winner:{}|amount:{}|share:{}|asset:{}|position:{}",
        id, winner, amount, share, asset, position
    )
}

/// `ld|` — donation paid out.
pub fn lottery_donation(
    id: u64,
    recipient: &Address,
    amount: Amount,
    percent: u8,
    asset: &str,
) -> String {
    format!(
        "ld|id:{}|recipient:{}|amount:{}|percent:{}|asset:{}",
        id, recipient, amount, percent, asset
    )
}

/// `lu|` — undistributed value swept to the burn sink.
pub fn lottery_undistributed(id: u64, amount: Amount, asset: &str) -> String {
    format!("lu|id:{}|amount:{}|asset:{}", id, amount, asset)
}

/// `lm|` — annotation attached or replaced.
pub fn lottery_annotated(id: u64, annotation: &str) -> String {
    format!("lm|id:{}|metadata:{}", id, annotation)
}
