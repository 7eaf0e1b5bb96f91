use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::chain::{BlockHash, BlockLedger};
use crate::lottery::{Draw, LotteryConfig};
use crate::store::DrawStore;
use crate::updater::DrawUpdater;

/// How many draws the index page lists.
pub const INDEX_LIMIT: usize = 20;

/// Shared application state: the block ledger feeding draws, the draw
/// history and the updater that links them.
pub struct AppState {
    pub ledger: Mutex<BlockLedger>,
    pub draws: Mutex<DrawStore>,
    pub updater: DrawUpdater,
}

impl AppState {
    pub fn new(config: LotteryConfig) -> Self {
        Self {
            ledger: Mutex::new(BlockLedger::new(config.hash_hex_len)),
            draws: Mutex::new(DrawStore::new()),
            updater: DrawUpdater::new(config),
        }
    }

    pub fn config(&self) -> &LotteryConfig {
        self.updater.config()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LotteryConfig::default())
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/* ---------- Draw API Models ---------- */

#[derive(Serialize)]
pub struct IndexResponse {
    pub draws: Vec<Draw>,
    pub num_draws: usize,
    pub last_draw_height: u64,
    pub current_height: Option<u64>,
}

#[derive(Serialize)]
pub struct DrawsResponse {
    pub draws: Vec<Draw>,
}

#[derive(Serialize)]
pub struct DrawDetailResponse {
    pub draw: Draw,
    pub blocks: Vec<BlockHash>,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub hashes: Vec<String>,
    pub front: Vec<u32>,
    pub back: u32,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/* ---------- Job API Models ---------- */

#[derive(Serialize)]
pub struct TriggerResponse {
    pub created: usize,
    pub num_draws: usize,
}

/* ---------- Block API Models ---------- */

#[derive(Deserialize)]
pub struct BlocksRequest {
    pub blocks: Vec<BlockHash>,
}

#[derive(Serialize)]
pub struct BlocksResponse {
    pub added: usize,
    pub tip_height: Option<u64>,
}
