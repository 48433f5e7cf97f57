//! Lottery state machine: create -> join* -> execute, plus read-only replay
//! verification and the creator-only annotation update.
//!
//! Every operation validates its guards before performing any state write or
//! funds movement, returns a typed result, and emits the audit events whose
//! values match the computed results exactly. The host's transaction boundary
//! provides all-or-nothing semantics; the engine only has to fail fast with a
//! specific reason.

use crate::core::amount::Amount;
use crate::core::codec::{LotteryMetadata, LotteryState, ParticipantEntry, PoolStats, Winner};
use crate::core::events;
use crate::core::payout::PayoutPlan;
use crate::core::random::derive_seed;
use crate::core::selection::select_winners;
use crate::core::store;
use crate::error::{LotteryError, Result};
use crate::host::{Address, Host};

/// Burn sink: funds sent here are irrecoverable by convention.
pub const BURN_ADDRESS: &str = "null";

/// Deadline policy bounds, hour-based (90 days max).
pub const MIN_DEADLINE_HOURS: u64 = 1;
pub const MAX_DEADLINE_HOURS: u64 = 2160;

/// Burn percentage policy bounds.
pub const MIN_BURN_PERCENT: u8 = 5;
pub const MAX_BURN_PERCENT: u8 = 75;

/// Maximum donation percentage when a donation is configured.
pub const MAX_DONATION_PERCENT: u8 = 25;

/// Parameters for creating a lottery.
#[derive(Debug, Clone)]
pub struct CreateParams {
    pub name: String,
    pub deadline_hours: u64,
    pub burn_percent: u8,
    pub ticket_price: Amount,
    pub asset: String,
    /// Ordered integer percentages; must sum to exactly 100.
    pub winner_shares: Vec<u8>,
    /// Cap on total tickets sellable; 0 means uncapped.
    pub max_tickets: u64,
    /// Donation recipient; empty means no donation.
    pub donation_account: Address,
    pub donation_percent: u8,
    /// Optional opaque annotation attached at creation.
    pub annotation: String,
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReceipt {
    pub lottery_id: u64,
    pub tickets: u64,
    /// Amount actually drawn (whole tickets only; excess never moves).
    pub cost: Amount,
    /// Zero-based range of ticket indices covered by this purchase.
    pub ticket_start: u64,
    pub ticket_end: u64,
}

/// Result of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub lottery_id: u64,
    pub seed: u64,
    pub pool: Amount,
    pub winners: Vec<Winner>,
    /// Final burn including swept undistributed value.
    pub burned: Amount,
    pub donated: Amount,
}

/// Outcome of replaying winner selection against a claimed seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Replay reproduced the stored winners, in order.
    Confirmed(Vec<Address>),
    /// Replay produced a different number of winners.
    CountMismatch { recorded: usize, replayed: usize },
    /// Replay diverged at this zero-based rank position.
    AddressMismatch { position: usize },
}

impl Verification {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Verification::Confirmed(_))
    }
}

/// The lottery engine: all operations run against a [`Host`].
#[derive(Debug)]
pub struct LotteryEngine<H: Host> {
    host: H,
}

impl<H: Host> LotteryEngine<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    // -- queries ------------------------------------------------------------

    pub fn metadata(&self, lottery_id: u64) -> Result<LotteryMetadata> {
        store::require_metadata(&self.host, lottery_id)
    }

    pub fn stats(&self, lottery_id: u64) -> Result<PoolStats> {
        store::require_metadata(&self.host, lottery_id)?;
        store::load_stats(&self.host, lottery_id)
    }

    /// All participants in ascending slot order.
    pub fn participants(&self, lottery_id: u64) -> Result<Vec<ParticipantEntry>> {
        store::require_metadata(&self.host, lottery_id)?;
        let stats = store::load_stats(&self.host, lottery_id)?;
        store::load_participants(&self.host, lottery_id, stats.participant_count)
    }

    // -- create -------------------------------------------------------------

    /// Creates a lottery in `Active` state and returns its id.
    pub fn create(&mut self, params: CreateParams) -> Result<u64> {
        Self::validate_create(&params)?;

        let env = self.host.env().clone();
        let id = store::next_lottery_id(&mut self.host)?;

        let meta = LotteryMetadata {
            id,
            creator: env.caller,
            name: params.name,
            created_at: env.timestamp,
            deadline_hours: params.deadline_hours,
            deadline_unix: env.timestamp + (params.deadline_hours * 3600) as i64,
            max_tickets: params.max_tickets,
            burn_percent: params.burn_percent,
            ticket_price: params.ticket_price,
            asset: params.asset,
            winner_shares: params.winner_shares,
            state: LotteryState::Active,
            winners: Vec::new(),
            executed_at: 0,
            random_seed: 0,
            burned_amount: Amount::ZERO,
            donation_account: params.donation_account,
            donation_percent: params.donation_percent,
            donated_amount: Amount::ZERO,
            annotation: params.annotation,
        };

        store::save_metadata(&mut self.host, &meta);
        store::save_stats(&mut self.host, id, &PoolStats::default());

        self.host.emit_event(events::lottery_created(&meta));
        if !meta.annotation.is_empty() {
            self.host
                .emit_event(events::lottery_annotated(id, &meta.annotation));
        }

        Ok(id)
    }

    fn validate_create(params: &CreateParams) -> Result<()> {
        if params.name.trim().is_empty() {
            return Err(LotteryError::Validation("lottery name is required".into()));
        }
        if params.deadline_hours < MIN_DEADLINE_HOURS || params.deadline_hours > MAX_DEADLINE_HOURS
        {
            return Err(LotteryError::Validation(format!(
                "deadline must be between {} and {} hours",
                MIN_DEADLINE_HOURS, MAX_DEADLINE_HOURS
            )));
        }
        if params.burn_percent < MIN_BURN_PERCENT || params.burn_percent > MAX_BURN_PERCENT {
            return Err(LotteryError::Validation(format!(
                "burn percent must be between {} and {}",
                MIN_BURN_PERCENT, MAX_BURN_PERCENT
            )));
        }
        if params.winner_shares.is_empty() {
            return Err(LotteryError::Validation(
                "at least one winner share is required".into(),
            ));
        }
        if params.winner_shares.iter().any(|&s| s == 0) {
            return Err(LotteryError::Validation(
                "winner shares must all be positive".into(),
            ));
        }
        let share_sum: u32 = params.winner_shares.iter().map(|&s| s as u32).sum();
        if share_sum != 100 {
            return Err(LotteryError::Validation(
                "winner shares must sum to 100".into(),
            ));
        }
        if params.ticket_price.raw() < 1 {
            return Err(LotteryError::Validation(
                "ticket price must be at least 0.001".into(),
            ));
        }
        if params.asset.trim().is_empty() {
            return Err(LotteryError::Validation("asset is required".into()));
        }
        match (
            params.donation_account.is_empty(),
            params.donation_percent,
        ) {
            (true, 0) => {}
            (true, _) => {
                return Err(LotteryError::Validation(
                    "donation percent requires a donation account".into(),
                ))
            }
            (false, 0) => {
                return Err(LotteryError::Validation(
                    "donation account requires a positive donation percent".into(),
                ))
            }
            (false, pct) if pct > MAX_DONATION_PERCENT => {
                return Err(LotteryError::Validation(format!(
                    "donation percent must be at most {}",
                    MAX_DONATION_PERCENT
                )))
            }
            (false, _) => {}
        }
        Ok(())
    }

    // -- join ---------------------------------------------------------------

    /// Buys tickets with `offer` of `offer_asset`. Whole tickets only: the
    /// ticket count is `offer / price` floored, and only `count * price` is
    /// drawn from the caller.
    pub fn join(&mut self, lottery_id: u64, offer: Amount, offer_asset: &str) -> Result<JoinReceipt> {
        let env = self.host.env().clone();
        let meta = store::require_metadata(&self.host, lottery_id)?;

        if meta.state != LotteryState::Active {
            return Err(LotteryError::Rule("lottery is not active".into()));
        }
        if env.timestamp >= meta.deadline_unix {
            return Err(LotteryError::Rule("lottery deadline has passed".into()));
        }
        if offer_asset != meta.asset {
            return Err(LotteryError::Validation(format!(
                "asset mismatch: lottery uses {}, offered {}",
                meta.asset, offer_asset
            )));
        }

        let tickets = offer.tickets_at(meta.ticket_price);
        if tickets == 0 {
            return Err(LotteryError::Rule(
                "insufficient funds for at least one ticket".into(),
            ));
        }
        let cost = meta.ticket_price.times(tickets);

        let mut stats = store::load_stats(&self.host, lottery_id)?;
        if meta.max_tickets > 0 {
            if stats.total_tickets >= meta.max_tickets {
                return Err(LotteryError::Rule("lottery max tickets reached".into()));
            }
            if stats.total_tickets + tickets > meta.max_tickets {
                return Err(LotteryError::Rule("lottery max tickets exceeded".into()));
            }
        }

        // All guards passed; move funds, then update the index and stats.
        self.host.draw_funds(cost, &meta.asset)?;

        let ticket_start = stats.total_tickets;
        let ticket_end = stats.total_tickets + tickets - 1;

        store::record_join(&mut self.host, lottery_id, &mut stats, &env.caller, tickets)?;
        stats.pool += cost;
        stats.total_tickets += tickets;
        store::save_stats(&mut self.host, lottery_id, &stats);

        self.host.emit_event(events::lottery_joined(
            lottery_id,
            &env.caller,
            tickets,
            cost,
            &meta.asset,
            ticket_start,
            ticket_end,
        ));

        Ok(JoinReceipt {
            lottery_id,
            tickets,
            cost,
            ticket_start,
            ticket_end,
        })
    }

    // -- execute ------------------------------------------------------------

    /// Settles the lottery: derives the seed, selects winners, splits the
    /// pool, moves all funds, and transitions to `Executed`.
    pub fn execute(&mut self, lottery_id: u64) -> Result<ExecutionSummary> {
        let env = self.host.env().clone();
        let mut meta = store::require_metadata(&self.host, lottery_id)?;

        if meta.state != LotteryState::Active {
            return Err(LotteryError::Rule("lottery already executed".into()));
        }
        if env.timestamp < meta.deadline_unix {
            return Err(LotteryError::Rule(
                "lottery deadline has not passed yet".into(),
            ));
        }

        let stats = store::load_stats(&self.host, lottery_id)?;
        if stats.total_tickets == 0 {
            return Err(LotteryError::Rule("no participants in lottery".into()));
        }

        let seed = derive_seed(&env);
        let participants =
            store::load_participants(&self.host, lottery_id, stats.participant_count)?;
        let winner_addresses = select_winners(
            &participants,
            stats.total_tickets,
            meta.winner_shares.len(),
            seed,
        );

        let donation_percent = meta.donation().map(|(_, pct)| pct).unwrap_or(0);
        let plan = PayoutPlan::compute(
            stats.pool,
            meta.burn_percent,
            donation_percent,
            &meta.winner_shares,
            winner_addresses.len(),
        );

        if !plan.burn.is_zero() {
            self.host
                .send_funds(&BURN_ADDRESS.to_string(), plan.burn, &meta.asset)?;
        }

        if let Some((account, percent)) = meta.donation() {
            let account = account.to_string();
            if !plan.donation.is_zero() {
                self.host.send_funds(&account, plan.donation, &meta.asset)?;
                self.host.emit_event(events::lottery_donation(
                    lottery_id,
                    &account,
                    plan.donation,
                    percent,
                    &meta.asset,
                ));
            }
        }

        let mut winners = Vec::with_capacity(winner_addresses.len());
        for (i, address) in winner_addresses.into_iter().enumerate() {
            let amount = plan.winner_amounts[i];
            let share = meta.winner_shares[i];
            if !amount.is_zero() {
                self.host.send_funds(&address, amount, &meta.asset)?;
            }
            self.host.emit_event(events::lottery_payout(
                lottery_id, &address, amount, share, &meta.asset, i + 1,
            ));
            winners.push(Winner {
                address,
                amount,
                share,
            });
        }

        if !plan.undistributed.is_zero() {
            self.host
                .send_funds(&BURN_ADDRESS.to_string(), plan.undistributed, &meta.asset)?;
            self.host.emit_event(events::lottery_undistributed(
                lottery_id,
                plan.undistributed,
                &meta.asset,
            ));
        }

        meta.state = LotteryState::Executed;
        meta.executed_at = env.timestamp;
        meta.random_seed = seed;
        meta.burned_amount = plan.burn_final();
        meta.donated_amount = plan.donation;
        meta.winners = winners.clone();
        store::save_metadata(&mut self.host, &meta);

        self.host.emit_event(events::lottery_executed(
            &meta,
            stats.pool,
            stats.total_tickets,
            stats.participant_count,
        ));

        Ok(ExecutionSummary {
            lottery_id,
            seed,
            pool: stats.pool,
            winners,
            burned: plan.burn_final(),
            donated: plan.donation,
        })
    }

    // -- verify -------------------------------------------------------------

    /// Replays winner selection with a caller-supplied seed against the
    /// stored participant data and compares positionally against the stored
    /// winners. Read-only.
    pub fn verify(&self, lottery_id: u64, seed: u64) -> Result<Verification> {
        let meta = store::require_metadata(&self.host, lottery_id)?;
        if meta.state != LotteryState::Executed {
            return Err(LotteryError::Rule(
                "lottery not executed yet - nothing to verify".into(),
            ));
        }

        let stats = store::load_stats(&self.host, lottery_id)?;
        let participants =
            store::load_participants(&self.host, lottery_id, stats.participant_count)?;
        let replayed = select_winners(
            &participants,
            stats.total_tickets,
            meta.winner_shares.len(),
            seed,
        );

        if replayed.len() != meta.winners.len() {
            return Ok(Verification::CountMismatch {
                recorded: meta.winners.len(),
                replayed: replayed.len(),
            });
        }
        for (i, address) in replayed.iter().enumerate() {
            if *address != meta.winners[i].address {
                return Ok(Verification::AddressMismatch { position: i });
            }
        }
        Ok(Verification::Confirmed(replayed))
    }

    // -- annotation ---------------------------------------------------------

    /// Attaches or replaces the opaque annotation. Creator only; allowed in
    /// any lifecycle state.
    pub fn set_annotation(&mut self, lottery_id: u64, annotation: String) -> Result<()> {
        let caller = self.host.env().caller.clone();
        let mut meta = store::require_metadata(&self.host, lottery_id)?;
        if meta.creator != caller {
            return Err(LotteryError::Rule(
                "only lottery creator can change metadata".into(),
            ));
        }
        meta.annotation = annotation;
        store::save_metadata(&mut self.host, &meta);
        self.host
            .emit_event(events::lottery_annotated(lottery_id, &meta.annotation));
        Ok(())
    }
}
