use thiserror::Error;

/// Top-level error type for all lottery operations.
///
/// Every failure carries a specific reason naming the violated rule; the
/// first error aborts the whole call, and the enclosing transaction is
/// responsible for discarding any state writes made before the abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotteryError {
    /// Malformed or out-of-range creation/join parameters, caught before
    /// any state mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation addressed a lottery id that does not exist.
    #[error("Lottery {0} not found")]
    NotFound(u64),

    /// A lifecycle or business rule was violated (deadline, state,
    /// ticket cap, insufficient funds, authorization).
    #[error("Rule violation: {0}")]
    Rule(String),

    /// A persisted record failed to decode. Fatal: a storage-layer
    /// invariant was already broken before this call.
    #[error("State corruption: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, LotteryError>;
