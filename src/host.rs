//! Host abstraction: the transaction environment the lottery core runs in.
//!
//! The core never touches storage, funds, or logs directly. Everything goes
//! through [`Host`], implemented by the surrounding infrastructure. One host
//! call sequence equals one atomic transaction: the host discards every
//! `state_set` performed during a call that ends in an error.

use std::collections::HashMap;

use crate::core::amount::Amount;
use crate::error::Result;

/// Address type (alias for String).
pub type Address = String;

/// Transaction context exposed by the host.
///
/// These four fields are the only entropy the seed generator consumes, so a
/// replayed call with the same `TxEnv` derives the same seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEnv {
    /// Unique transaction identifier. May be empty in non-transactional
    /// contexts; an empty id is skipped during seed derivation.
    pub tx_id: String,
    /// Monotonically increasing block or sequence height. Zero is skipped
    /// during seed derivation.
    pub block_height: u64,
    /// Unix timestamp of the call.
    pub timestamp: i64,
    /// Address of the account making the call.
    pub caller: Address,
}

/// External collaborator operations consumed by the core.
pub trait Host {
    /// Current transaction context.
    fn env(&self) -> &TxEnv;

    /// Reads a persisted record; `None` when the key is absent.
    fn state_get(&self, key: &str) -> Option<Vec<u8>>;

    /// Writes a persisted record.
    fn state_set(&mut self, key: &str, value: Vec<u8>);

    /// Pulls funds from the caller into the lottery's custody.
    fn draw_funds(&mut self, amount: Amount, asset: &str) -> Result<()>;

    /// Pushes funds out of custody to a recipient.
    fn send_funds(&mut self, to: &Address, amount: Amount, asset: &str) -> Result<()>;

    /// Appends a structured audit event.
    fn emit_event(&mut self, event: String);
}

/// A single funds movement recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundsMove {
    /// Funds drawn from the caller into custody.
    Draw { amount: Amount, asset: String },
    /// Funds sent from custody to a recipient.
    Send {
        to: Address,
        amount: Amount,
        asset: String,
    },
}

/// In-memory host for tests and local experimentation.
///
/// Applies state writes eagerly (no rollback), records every funds movement
/// and event in order. Engine code therefore validates before mutating, which
/// keeps the recorded history meaningful even in failure tests.
#[derive(Debug, Default)]
pub struct MemoryHost {
    env: TxEnv,
    state: HashMap<String, Vec<u8>>,
    pub transfers: Vec<FundsMove>,
    pub events: Vec<String>,
}

impl Default for TxEnv {
    fn default() -> Self {
        Self {
            tx_id: String::new(),
            block_height: 0,
            timestamp: 0,
            caller: String::new(),
        }
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the transaction context for the next call.
    pub fn set_env(&mut self, env: TxEnv) {
        self.env = env;
    }

    /// Convenience: update only caller and timestamp, the two fields that
    /// change on every simulated call.
    pub fn set_caller(&mut self, caller: &str, timestamp: i64) {
        self.env.caller = caller.to_string();
        self.env.timestamp = timestamp;
    }

    /// Raw access to the backing store (inspection in tests).
    pub fn raw_state(&self) -> &HashMap<String, Vec<u8>> {
        &self.state
    }

    /// Sum of all funds sent to the given address.
    pub fn total_sent_to(&self, address: &str) -> Amount {
        self.transfers
            .iter()
            .filter_map(|t| match t {
                FundsMove::Send { to, amount, .. } if to == address => Some(*amount),
                _ => None,
            })
            .fold(Amount::ZERO, |acc, a| acc + a)
    }

    /// Sum of all funds drawn into custody.
    pub fn total_drawn(&self) -> Amount {
        self.transfers
            .iter()
            .filter_map(|t| match t {
                FundsMove::Draw { amount, .. } => Some(*amount),
                _ => None,
            })
            .fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl Host for MemoryHost {
    fn env(&self) -> &TxEnv {
        &self.env
    }

    fn state_get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.get(key).cloned()
    }

    fn state_set(&mut self, key: &str, value: Vec<u8>) {
        self.state.insert(key.to_string(), value);
    }

    fn draw_funds(&mut self, amount: Amount, asset: &str) -> Result<()> {
        self.transfers.push(FundsMove::Draw {
            amount,
            asset: asset.to_string(),
        });
        Ok(())
    }

    fn send_funds(&mut self, to: &Address, amount: Amount, asset: &str) -> Result<()> {
        self.transfers.push(FundsMove::Send {
            to: to.clone(),
            amount,
            asset: asset.to_string(),
        });
        Ok(())
    }

    fn emit_event(&mut self, event: String) {
        self.events.push(event);
    }
}
