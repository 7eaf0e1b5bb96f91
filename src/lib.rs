//! Reproducible lottery draws derived from public block hashes.
//!
//! A window of block hashes is reduced to a SHA-256 seed, which keys an
//! HMAC-SHA256 counter generator. Front numbers are drawn without
//! replacement from a shrinking pool; the back number comes from the next
//! generator output. Anyone holding the same hashes recomputes the same
//! draw.

pub mod api;
pub mod chain;
pub mod error;
pub mod lottery;
pub mod stats;
pub mod store;
pub mod updater;
