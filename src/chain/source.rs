use log::{info, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Mutex;

use super::BlockHash;
use crate::error::SourceError;
use crate::lottery::seed::check_hash;

/// Anything that can hand the pipeline an ordered run of block hashes.
pub trait HashSource {
    /// Lowest height available, or `None` when empty.
    fn first_height(&self) -> Option<u64>;

    /// Highest height available, or `None` when empty.
    fn tip_height(&self) -> Option<u64>;

    /// Blocks `start..=end`, ascending by height. Fails with
    /// [`SourceError::Missing`] on the first absent height.
    fn fetch_hashes(&self, start: u64, end: u64) -> Result<Vec<BlockHash>, SourceError>;
}

/// In-memory block ledger that only grows by contiguous batches.
#[derive(Debug)]
pub struct BlockLedger {
    blocks: BTreeMap<u64, BlockHash>,
    hash_hex_len: usize,
}

impl BlockLedger {
    pub fn new(hash_hex_len: usize) -> Self {
        Self {
            blocks: BTreeMap::new(),
            hash_hex_len,
        }
    }

    /// Append a batch of blocks. The batch must continue directly from the
    /// current tip (any start is accepted while empty), be contiguous and
    /// carry well-formed hashes; otherwise nothing is inserted.
    pub fn append(&mut self, mut batch: Vec<BlockHash>) -> Result<usize, SourceError> {
        batch.sort_by_key(|b| b.height);
        let Some(first) = batch.first() else {
            return Ok(0);
        };

        let mut expected = match self.tip_height() {
            Some(tip) => tip
                .checked_add(1)
                .ok_or(SourceError::HeightOverflow { height: tip })?,
            None => first.height,
        };
        for (i, block) in batch.iter().enumerate() {
            if i > 0 {
                expected = expected
                    .checked_add(1)
                    .ok_or(SourceError::HeightOverflow { height: expected })?;
            }
            if block.height != expected {
                warn!(
                    "LEDGER - heights are not contiguous, skipping batch (expected {}, got {})",
                    expected, block.height
                );
                return Err(SourceError::NotContiguous {
                    expected,
                    got: block.height,
                });
            }
            check_hash(&block.hash, self.hash_hex_len).map_err(|reason| {
                SourceError::InvalidHash {
                    height: block.height,
                    reason,
                }
            })?;
        }

        let added = batch.len();
        for mut block in batch {
            block.hash.make_ascii_lowercase();
            self.blocks.insert(block.height, block);
        }
        info!(
            "LEDGER - appended {} blocks, tip={:?}",
            added,
            self.tip_height()
        );
        Ok(added)
    }

    pub fn get(&self, height: u64) -> Option<&BlockHash> {
        self.blocks.get(&height)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl HashSource for BlockLedger {
    fn first_height(&self) -> Option<u64> {
        self.blocks.keys().next().copied()
    }

    fn tip_height(&self) -> Option<u64> {
        self.blocks.keys().next_back().copied()
    }

    fn fetch_hashes(&self, start: u64, end: u64) -> Result<Vec<BlockHash>, SourceError> {
        (start..=end)
            .map(|height| {
                self.blocks
                    .get(&height)
                    .cloned()
                    .ok_or(SourceError::Missing { height })
            })
            .collect()
    }
}

/// A ledger shared behind a mutex. Each call takes the lock only for the
/// lookup, so callers never hold it while generating draws.
impl<T: HashSource> HashSource for Mutex<T> {
    fn first_height(&self) -> Option<u64> {
        self.lock().expect("mutex poisoned").first_height()
    }

    fn tip_height(&self) -> Option<u64> {
        self.lock().expect("mutex poisoned").tip_height()
    }

    fn fetch_hashes(&self, start: u64, end: u64) -> Result<Vec<BlockHash>, SourceError> {
        self.lock().expect("mutex poisoned").fetch_hashes(start, end)
    }
}

/// Parse `height,hash,timestamp` rows. A leading header row and blank
/// lines are skipped; the timestamp column is optional.
pub fn load_csv<R: BufRead>(reader: R) -> Result<Vec<BlockHash>, SourceError> {
    let mut blocks = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let row = line.trim();
        if row.is_empty() || (line_no == 1 && row.starts_with("height")) {
            continue;
        }

        let mut cols = row.splitn(3, ',').map(str::trim);
        let height = cols
            .next()
            .and_then(|h| h.parse::<u64>().ok())
            .ok_or_else(|| SourceError::Parse {
                line: line_no,
                reason: "invalid height".to_string(),
            })?;
        let hash = cols
            .next()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| SourceError::Parse {
                line: line_no,
                reason: "missing hash".to_string(),
            })?;
        let timestamp = cols.next().filter(|t| !t.is_empty()).map(str::to_string);

        blocks.push(BlockHash::new(height, hash, timestamp));
    }
    Ok(blocks)
}

pub fn load_csv_file(path: impl AsRef<Path>) -> Result<Vec<BlockHash>, SourceError> {
    let file = File::open(path)?;
    load_csv(BufReader::new(file))
}
