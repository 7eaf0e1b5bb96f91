use std::collections::{BTreeMap, HashMap};

use crate::lottery::Draw;
use crate::stats::Statistics;

/// In-memory draw history keyed by id, with a `start_height` index so a
/// window is never persisted twice.
#[derive(Debug, Default)]
pub struct DrawStore {
    draws: BTreeMap<u64, Draw>,
    by_start_height: HashMap<u64, u64>,
    statistics: Option<Statistics>,
}

impl DrawStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `draw` unless its id or window is already stored. Returns the
    /// stored draw and whether it was newly created.
    pub fn insert(&mut self, draw: Draw) -> (&Draw, bool) {
        let existing = self
            .by_start_height
            .get(&draw.start_height())
            .copied()
            .or_else(|| self.draws.contains_key(&draw.id()).then_some(draw.id()));
        if let Some(id) = existing {
            return (&self.draws[&id], false);
        }

        let id = draw.id();
        self.by_start_height.insert(draw.start_height(), id);
        self.draws.insert(id, draw);
        (&self.draws[&id], true)
    }

    pub fn get(&self, id: u64) -> Option<&Draw> {
        self.draws.get(&id)
    }

    pub fn by_start_height(&self, start_height: u64) -> Option<&Draw> {
        self.by_start_height
            .get(&start_height)
            .and_then(|id| self.draws.get(id))
    }

    /// Most recent `limit` draws, newest first.
    pub fn latest(&self, limit: usize) -> Vec<&Draw> {
        self.draws.values().rev().take(limit).collect()
    }

    /// Every draw in ascending id order.
    pub fn all(&self) -> Vec<&Draw> {
        self.draws.values().collect()
    }

    pub fn max_id(&self) -> Option<u64> {
        self.draws.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn set_statistics(&mut self, statistics: Statistics) {
        self.statistics = Some(statistics);
    }
}
