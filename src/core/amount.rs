//! Fixed-point currency representation.
//!
//! All monetary values are integers scaled by [`AMOUNT_SCALE`] (×1000), so
//! accounting sums and percentage splits never accumulate floating-point
//! drift. Floats exist only at the boundary: human input is rounded to the
//! nearest scaled unit on the way in, and converted back for display on the
//! way out. Persisted amounts are always the scaled integer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale factor: 1 unit of display currency = 1000 scaled units.
pub const AMOUNT_SCALE: i64 = 1000;

/// Scaled-integer amount (newtype over i64).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Wraps an already-scaled raw value.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Converts a display-unit float to a scaled amount, round-to-nearest.
    pub fn from_value(value: f64) -> Self {
        Self((value * AMOUNT_SCALE as f64).round() as i64)
    }

    /// Converts back to a display-unit float for events and reporting.
    pub fn to_value(self) -> f64 {
        self.0 as f64 / AMOUNT_SCALE as f64
    }

    /// Raw scaled integer for external payment calls.
    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Applies an integer percentage with round-half-up semantics.
    ///
    /// Computed in i128 so arbitrarily large pools cannot overflow the
    /// intermediate product.
    pub fn percent(self, pct: u8) -> Amount {
        let v = self.0 as i128 * pct as i128;
        Amount(((v + 50) / 100) as i64)
    }

    /// Whole tickets purchasable at the given price (floor division).
    /// Returns 0 when the price is non-positive.
    pub fn tickets_at(self, price: Amount) -> u64 {
        if price.0 <= 0 {
            return 0;
        }
        (self.0 / price.0).max(0) as u64
    }

    /// Total cost of `count` tickets at this amount per ticket.
    pub fn times(self, count: u64) -> Amount {
        Amount(self.0 * count as i64)
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount(self.0 - other.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    /// Renders with three decimals, matching the scale (e.g. `5.000`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.to_value())
    }
}
