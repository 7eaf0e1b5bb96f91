use log::{debug, info, warn};
use std::sync::Mutex;

use crate::chain::HashSource;
use crate::error::UpdateError;
use crate::lottery::{
    Draw, LotteryConfig, draw_from_blocks, first_draw_id, heights_for_draw,
};
use crate::stats::Statistics;
use crate::store::DrawStore;

/// Produces the next draws once their block windows are available.
///
/// Generation is serialised through `in_flight`, and the store refuses a
/// second draw for the same window, so overlapping triggers for one
/// window persist a single draw.
#[derive(Debug)]
pub struct DrawUpdater {
    config: LotteryConfig,
    in_flight: Mutex<()>,
}

impl DrawUpdater {
    pub fn new(config: LotteryConfig) -> Self {
        Self {
            config,
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    /// Id of the next draw to produce: one past the newest stored draw, or
    /// the first window fully covered by the source when nothing is stored.
    pub fn next_draw_id<S: HashSource + ?Sized>(
        &self,
        source: &S,
        store: &Mutex<DrawStore>,
    ) -> Option<u64> {
        let max_id = store.lock().expect("mutex poisoned").max_id();
        match max_id {
            Some(id) => id.checked_add(1),
            None => source
                .first_height()
                .map(|first| first_draw_id(first, self.config.num_blockchain)),
        }
    }

    /// Generate and persist the next draw. `Ok(None)` when the source does
    /// not yet reach the end of the next window.
    ///
    /// The source is only consulted for the lookups; hashing runs after
    /// `fetch_hashes` returns, so a shared ledger stays available to writers.
    pub fn update_one_draw<S: HashSource + ?Sized>(
        &self,
        source: &S,
        store: &Mutex<DrawStore>,
    ) -> Result<Option<Draw>, UpdateError> {
        let _guard = self.in_flight.lock().expect("mutex poisoned");

        let Some(id) = self.next_draw_id(source, store) else {
            return Ok(None);
        };
        let Some((start, end)) = heights_for_draw(id, self.config.num_blockchain) else {
            debug!("UPDATER - draw {id} has no representable window");
            return Ok(None);
        };
        match source.tip_height() {
            Some(tip) if tip >= end => {}
            tip => {
                debug!("UPDATER - draw {id} waits for height {end} (tip={tip:?})");
                return Ok(None);
            }
        }

        let blocks = source.fetch_hashes(start, end)?;
        let draw = draw_from_blocks(id, &blocks, &self.config).inspect_err(|e| {
            warn!("UPDATER - draw {id} over {start}..={end} failed: {e}");
        })?;

        let mut store = store.lock().expect("mutex poisoned");
        let (stored, created) = store.insert(draw);
        if !created {
            debug!("UPDATER - window {start} already has draw {}", stored.id());
            return Ok(None);
        }
        info!(
            "UPDATER - draw #{} front={:?} back={} heights={}..={}",
            stored.id(),
            stored.front_list(),
            stored.back_int(),
            stored.start_height(),
            stored.end_height()
        );
        Ok(Some(stored.clone()))
    }

    /// Produce draws until the source runs out of complete windows.
    pub fn update_draws<S: HashSource + ?Sized>(
        &self,
        source: &S,
        store: &Mutex<DrawStore>,
    ) -> Result<usize, UpdateError> {
        let mut created = 0;
        while self.update_one_draw(source, store)?.is_some() {
            created += 1;
        }
        if created > 0 {
            info!("UPDATER - {created} new draws");
        }
        Ok(created)
    }

    /// Recompute and store frequency statistics. `None` with no draws.
    pub fn refresh_statistics(&self, store: &Mutex<DrawStore>) -> Option<Statistics> {
        let mut store = store.lock().expect("mutex poisoned");
        let draws: Vec<Draw> = store.all().into_iter().cloned().collect();
        let stats = Statistics::compute(&draws, &self.config)?;
        debug!(
            "STATS - draws={} front_p={} back_p={}",
            stats.draws, stats.front.p_value, stats.back.p_value
        );
        store.set_statistics(stats.clone());
        Some(stats)
    }
}
