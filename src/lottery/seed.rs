use sha2::{Digest, Sha256};

use super::LotteryConfig;
use crate::error::{InvalidInput, LotteryError};

/// 32-byte root of all randomness for one draw.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Seed([u8; 32]);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Seed {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}

/// Check a single hash string: non-empty, `expected_len` hex characters.
pub fn check_hash(hash: &str, expected_len: usize) -> Result<(), String> {
    if hash.is_empty() {
        return Err("empty hash".to_string());
    }
    if hash.len() != expected_len {
        return Err(format!(
            "expected {expected_len} hex characters, got {}",
            hash.len()
        ));
    }
    if let Some(c) = hash.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(format!("non-hex character {c:?}"));
    }
    Ok(())
}

/// Validate count and shape of the hash sequence.
pub fn validate_hashes<S: AsRef<str>>(
    hashes: &[S],
    config: &LotteryConfig,
) -> Result<(), LotteryError> {
    if hashes.len() != config.num_blockchain {
        return Err(InvalidInput::CountMismatch {
            expected: config.num_blockchain,
            got: hashes.len(),
        }
        .into());
    }
    for (index, hash) in hashes.iter().enumerate() {
        check_hash(hash.as_ref(), config.hash_hex_len)
            .map_err(|reason| InvalidInput::MalformedHash { index, reason })?;
    }
    Ok(())
}

/// Derive the seed: SHA-256 over the in-order concatenation of the
/// lowercased hashes, followed by `extra` when given. No separators.
pub fn derive_seed<S: AsRef<str>>(
    hashes: &[S],
    extra: Option<&str>,
    config: &LotteryConfig,
) -> Result<Seed, LotteryError> {
    validate_hashes(hashes, config)?;

    let mut hasher = Sha256::new();
    for hash in hashes {
        hasher.update(hash.as_ref().to_ascii_lowercase().as_bytes());
    }
    if let Some(extra) = extra {
        hasher.update(extra.as_bytes());
    }
    let digest = hasher.finalize();

    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    Ok(Seed(out))
}
