pub mod core;
pub mod error;
pub mod host;

pub use error::{LotteryError, Result};
pub use host::{Address, FundsMove, Host, MemoryHost, TxEnv};

// Core API exports
pub use core::amount::{Amount, AMOUNT_SCALE};
pub use core::codec::{
    decode_metadata, decode_participant, decode_stats, encode_metadata, encode_participant,
    encode_stats, CodecError, LotteryMetadata, LotteryState, ParticipantEntry, PoolStats, Winner,
};
pub use core::lottery::{
    CreateParams, ExecutionSummary, JoinReceipt, LotteryEngine, Verification, BURN_ADDRESS,
    MAX_BURN_PERCENT, MAX_DEADLINE_HOURS, MAX_DONATION_PERCENT, MIN_BURN_PERCENT,
    MIN_DEADLINE_HOURS,
};
pub use core::payout::PayoutPlan;
pub use core::random::{derive_seed, HashRng, Lcg, UniformRng};
pub use core::selection::select_winners;
pub use core::store::{
    load_metadata, load_participants, load_stats, lookup_key, lookup_slot, metadata_key,
    next_lottery_id, require_metadata, slot_key, stats_key, COUNTER_KEY,
};
