use thiserror::Error;

/// Which input constraint a hash sequence violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("expected {expected} block hashes, got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("malformed hash at position {index}: {reason}")]
    MalformedHash { index: usize, reason: String },

    #[error("block heights not ascending at position {index}")]
    UnorderedHeights { index: usize },

    #[error("timestamp entropy enabled but the closing block has no timestamp")]
    MissingTimestamp,
}

/// Errors raised by the draw generation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotteryError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("cannot draw {count} unique numbers from a pool of {max}")]
    InsufficientPool { count: usize, max: u32 },

    #[error("draw validation failed: {reason}")]
    Validation { reason: String },
}

/// Errors raised while reading or ingesting block hashes.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("block at height {height} is not available")]
    Missing { height: u64 },

    #[error("heights are not contiguous: expected {expected}, got {got}")]
    NotContiguous { expected: u64, got: u64 },

    #[error("no height follows {height}")]
    HeightOverflow { height: u64 },

    #[error("invalid block hash at height {height}: {reason}")]
    InvalidHash { height: u64, reason: String },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while producing and persisting the next draw.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    Lottery(#[from] LotteryError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
