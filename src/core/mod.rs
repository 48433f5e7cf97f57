// Core lottery settlement modules.
//
// DETERMINISM GUARANTEES:
// =======================
// Execution and verification are deterministic:
// 1. The seed is a pure function of the transaction context.
// 2. The PRNG is a pure function of (seed, counter); no system entropy.
// 3. Participant expansion follows ascending slot order, never an
//    unordered map iteration, so the shuffle is reproducible.
// 4. All accounting is scaled-integer arithmetic; rounding is fixed
//    (round half up) and the conservation invariant holds exactly.
//
// INVARIANTS:
// - Winner shares sum to exactly 100.
// - burn_final + donation + sum(winner payouts) == pool.
// - Slots are dense from 1, assigned once, never reused.
// - Lifecycle is Active -> Executed, one way, exactly once.

pub mod amount;
pub mod codec;
pub mod events;
pub mod lottery;
pub mod payout;
pub mod random;
pub mod selection;
pub mod store;
