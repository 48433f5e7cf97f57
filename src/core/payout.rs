//! Three-way payout split: burn / optional donation / ranked winner payouts.
//!
//! All percentages are integers and all arithmetic happens on scaled
//! [`Amount`] values with round-half-up, so the conservation invariant
//! `burn_final + donation + Σ winner_amounts == pool` holds exactly: the
//! rounding shortfall and any shares left unassigned (fewer distinct winners
//! than configured slots) are swept into the final burn figure.

use crate::core::amount::Amount;

/// The computed split of one lottery pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutPlan {
    pub pool: Amount,
    /// Burn from the configured percentage, before the sweep.
    pub burn: Amount,
    pub donation: Amount,
    /// Per-winner amounts in rank order; length = actual winner count.
    pub winner_amounts: Vec<Amount>,
    /// Rounding shortfall plus unassigned shares; disposed of like the burn.
    pub undistributed: Amount,
}

impl PayoutPlan {
    /// Splits `pool` given the configured percentages, the ordered share
    /// list, and the number of winners actually selected (`<= shares.len()`).
    pub fn compute(
        pool: Amount,
        burn_percent: u8,
        donation_percent: u8,
        shares: &[u8],
        winner_count: usize,
    ) -> Self {
        let burn = pool.percent(burn_percent);
        let donation = pool.percent(donation_percent);
        let remaining = pool - burn - donation;

        let winner_amounts: Vec<Amount> = shares
            .iter()
            .take(winner_count)
            .map(|&share| remaining.percent(share))
            .collect();

        let distributed: Amount = winner_amounts.iter().copied().sum();
        let undistributed = remaining - distributed;

        Self {
            pool,
            burn,
            donation,
            winner_amounts,
            undistributed,
        }
    }

    /// Pool left for winners after burn and donation.
    pub fn remaining(&self) -> Amount {
        self.pool - self.burn - self.donation
    }

    /// Total paid to winners.
    pub fn distributed(&self) -> Amount {
        self.winner_amounts.iter().copied().sum()
    }

    /// Burn figure after sweeping in undistributed value. Together with
    /// donation and winner payouts this reconstitutes the pool exactly.
    pub fn burn_final(&self) -> Amount {
        self.burn + self.undistributed
    }
}
