use serde::Serialize;

use super::LotteryConfig;
use crate::error::LotteryError;

/// Identifier, source window and completion time of a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawMeta {
    pub id: u64,
    pub start_height: u64,
    pub end_height: u64,
    pub timestamp: String,
}

/// A completed draw. Built once by [`assemble`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    id: u64,
    front_list: Vec<u32>,
    back_int: u32,
    start_height: u64,
    end_height: u64,
    timestamp: String,
}

impl Draw {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn front_list(&self) -> &[u32] {
        &self.front_list
    }

    pub fn back_int(&self) -> u32 {
        self.back_int
    }

    pub fn start_height(&self) -> u64 {
        self.start_height
    }

    pub fn end_height(&self) -> u64 {
        self.end_height
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Package sampled numbers and metadata into a [`Draw`], checking
/// cardinality, ordering and bounds against `config`.
pub fn assemble(
    front: Vec<u32>,
    back: u32,
    meta: DrawMeta,
    config: &LotteryConfig,
) -> Result<Draw, LotteryError> {
    if front.len() != config.front_count {
        return Err(validation(format!(
            "expected {} front numbers, got {}",
            config.front_count,
            front.len()
        )));
    }
    if let Some(n) = front.iter().find(|n| **n < 1 || **n > config.front_max) {
        return Err(validation(format!(
            "front number {n} outside 1..={}",
            config.front_max
        )));
    }
    if !front.windows(2).all(|w| w[0] < w[1]) {
        return Err(validation(
            "front numbers must be unique and ascending".to_string(),
        ));
    }
    if back < 1 || back > config.back_max {
        return Err(validation(format!(
            "back number {back} outside 1..={}",
            config.back_max
        )));
    }
    if meta.start_height > meta.end_height {
        return Err(validation(format!(
            "start height {} after end height {}",
            meta.start_height, meta.end_height
        )));
    }

    Ok(Draw {
        id: meta.id,
        front_list: front,
        back_int: back,
        start_height: meta.start_height,
        end_height: meta.end_height,
        timestamp: meta.timestamp,
    })
}

fn validation(reason: String) -> LotteryError {
    LotteryError::Validation { reason }
}
