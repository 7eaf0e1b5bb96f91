use log::debug;

use super::CounterRng;
use crate::error::LotteryError;

/// Draw `count` unique numbers from `1..=max` without replacement and
/// return them ascending.
///
/// Each step reduces one generator output modulo the *current* pool size
/// and removes the element at that index, so a duplicate can never be
/// produced and every step is (near-)uniform over what is left.
pub fn sample_pool(count: usize, max: u32, rng: &mut CounterRng) -> Result<Vec<u32>, LotteryError> {
    if count == 0 {
        return Err(LotteryError::Validation {
            reason: "front count must be at least 1".to_string(),
        });
    }
    if count > max as usize {
        return Err(LotteryError::InsufficientPool { count, max });
    }

    let mut pool: Vec<u32> = (1..=max).collect();
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let index = rng.next_value().reduce(pool.len() as u32) as usize;
        let number = pool.remove(index);
        debug!(
            "POOL - counter={} index={} number={} remaining={}",
            rng.counter() - 1,
            index,
            number,
            pool.len()
        );
        picked.push(number);
    }

    picked.sort_unstable();
    Ok(picked)
}

/// Draw a single number in `1..=max` from the next generator output.
pub fn draw_back(max: u32, rng: &mut CounterRng) -> Result<u32, LotteryError> {
    if max == 0 {
        return Err(LotteryError::Validation {
            reason: "back range must be at least 1".to_string(),
        });
    }
    Ok(rng.next_value().reduce(max) + 1)
}
