pub mod config;
pub mod draw;
pub mod rng;
pub mod sampler;
pub mod seed;

pub use config::{CounterEncoding, LotteryConfig};
pub use draw::{Draw, DrawMeta, assemble};
pub use rng::{CounterRng, RandomValue};
pub use sampler::{draw_back, sample_pool};
pub use seed::{Seed, derive_seed};

use chrono::Utc;
use log::debug;
use serde::Serialize;

use crate::chain::BlockHash;
use crate::error::{InvalidInput, LotteryError};

/// Block hashes per draw window.
pub const NUM_BLOCKCHAIN: usize = 144;

/// Front pool upper bound (white balls).
pub const BLUE_BALL_MAX: u32 = 69;

/// Back range upper bound (powerball).
pub const RED_BALL_MAX: u32 = 26;

pub const FRONT_COUNT: usize = 5;
pub const BACK_COUNT: usize = 1;

/// Hex length of a SHA-256 block hash.
pub const HASH_HEX_LEN: usize = 64;

/// Timestamp format used for draw records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Compute `(front_list, back_int)` from an ordered hash sequence.
///
/// Consumes `front_count` generator outputs for the front pool and the
/// next one for the back number.
pub fn generate<S: AsRef<str>>(
    hashes: &[S],
    extra: Option<&str>,
    config: &LotteryConfig,
) -> Result<(Vec<u32>, u32), LotteryError> {
    config.validate()?;
    let seed = derive_seed(hashes, extra, config)?;
    debug!("SEED - {} (extra={})", seed.to_hex(), extra.is_some());

    let mut rng = CounterRng::new(seed, config.counter_encoding);
    let front = sample_pool(config.front_count, config.front_max, &mut rng)?;
    let back = draw_back(config.back_max, &mut rng)?;
    Ok((front, back))
}

/// Outcome of checking published numbers against their hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub valid: bool,
    pub expected_front: Vec<u32>,
    pub expected_back: u32,
}

/// Recompute a draw from its hashes and compare with the published numbers.
pub fn verify<S: AsRef<str>>(
    hashes: &[S],
    extra: Option<&str>,
    front: &[u32],
    back: u32,
    config: &LotteryConfig,
) -> Result<Verification, LotteryError> {
    let (expected_front, expected_back) = generate(hashes, extra, config)?;
    Ok(Verification {
        valid: expected_front == front && expected_back == back,
        expected_front,
        expected_back,
    })
}

/// Run the whole pipeline over a block window and assemble the draw
/// record. Blocks must be ascending by height. The draw timestamp is the
/// closing block's timestamp, or the current UTC time when it has none.
pub fn draw_from_blocks(
    id: u64,
    blocks: &[BlockHash],
    config: &LotteryConfig,
) -> Result<Draw, LotteryError> {
    if let Some(index) = blocks
        .windows(2)
        .position(|w| w[0].height >= w[1].height)
    {
        return Err(InvalidInput::UnorderedHeights { index: index + 1 }.into());
    }
    let (first, last) = match (blocks.first(), blocks.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(InvalidInput::CountMismatch {
                expected: config.num_blockchain,
                got: 0,
            }
            .into());
        }
    };

    let extra = if config.include_timestamp {
        Some(
            last.timestamp
                .as_deref()
                .ok_or(InvalidInput::MissingTimestamp)?,
        )
    } else {
        None
    };

    let hashes: Vec<&str> = blocks.iter().map(|b| b.hash.as_str()).collect();
    let (front, back) = generate(&hashes, extra, config)?;

    let timestamp = last
        .timestamp
        .clone()
        .unwrap_or_else(|| Utc::now().format(TIMESTAMP_FORMAT).to_string());
    assemble(
        front,
        back,
        DrawMeta {
            id,
            start_height: first.height,
            end_height: last.height,
            timestamp,
        },
        config,
    )
}

/// Inclusive block height range feeding draw `id`, or `None` when the
/// window lies beyond `u64` heights.
pub fn heights_for_draw(id: u64, num_blockchain: usize) -> Option<(u64, u64)> {
    let n = num_blockchain as u64;
    let start = id.checked_mul(n)?;
    let end = start.checked_add(n.checked_sub(1)?)?;
    Some((start, end))
}

/// Draw whose window contains `height`.
pub fn draw_id_for_height(height: u64, num_blockchain: usize) -> u64 {
    height / num_blockchain as u64
}

/// First draw whose whole window lies at or above `first_height`.
pub fn first_draw_id(first_height: u64, num_blockchain: usize) -> u64 {
    first_height.div_ceil(num_blockchain as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn zero_hashes() -> Vec<String> {
        vec!["00".repeat(32); NUM_BLOCKCHAIN]
    }

    fn indexed_hashes() -> Vec<String> {
        (0..NUM_BLOCKCHAIN)
            .map(|i| hex::encode(Sha256::digest(i.to_string().as_bytes())))
            .collect()
    }

    fn blocks(hashes: &[String], ts: Option<&str>) -> Vec<BlockHash> {
        hashes
            .iter()
            .enumerate()
            .map(|(i, h)| BlockHash {
                height: 288 + i as u64,
                hash: h.clone(),
                timestamp: ts.map(str::to_string),
            })
            .collect()
    }

    #[test]
    fn zero_hashes_golden_output() {
        let cfg = LotteryConfig::default();
        let (front, back) = generate(&zero_hashes(), None, &cfg).unwrap();
        assert_eq!(front, vec![9, 11, 23, 57, 58]);
        assert_eq!(back, 10);
    }

    #[test]
    fn zero_hashes_golden_output_decimal_counter() {
        let cfg = LotteryConfig {
            counter_encoding: CounterEncoding::DecimalAscii,
            ..LotteryConfig::default()
        };
        let (front, back) = generate(&zero_hashes(), None, &cfg).unwrap();
        assert_eq!(front, vec![31, 43, 53, 56, 59]);
        assert_eq!(back, 7);
    }

    #[test]
    fn zero_hashes_golden_output_with_timestamp() {
        let cfg = LotteryConfig::default();
        let (front, back) =
            generate(&zero_hashes(), Some("2025-01-01 00:00:00 UTC"), &cfg).unwrap();
        assert_eq!(front, vec![3, 39, 45, 60, 64]);
        assert_eq!(back, 15);
    }

    #[test]
    fn generation_is_deterministic() {
        let cfg = LotteryConfig::default();
        let hashes = indexed_hashes();
        let a = generate(&hashes, None, &cfg).unwrap();
        let b = generate(&hashes, None, &cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, (vec![4, 18, 27, 31, 38], 23));
    }

    #[test]
    fn reversing_the_order_changes_the_draw() {
        let cfg = LotteryConfig::default();
        let mut hashes = indexed_hashes();
        hashes.reverse();
        let (front, back) = generate(&hashes, None, &cfg).unwrap();
        assert_eq!(front, vec![6, 24, 49, 63, 67]);
        assert_eq!(back, 9);
    }

    #[test]
    fn flipping_one_hex_character_changes_the_draw() {
        let cfg = LotteryConfig::default();
        let original = generate(&indexed_hashes(), None, &cfg).unwrap();
        let mut hashes = indexed_hashes();
        let mut first = hashes[0].clone();
        let last = first.pop().unwrap();
        first.push(if last == '1' { '2' } else { '1' });
        hashes[0] = first;
        let flipped = generate(&hashes, None, &cfg).unwrap();
        assert_ne!(original, flipped);
        assert_eq!(flipped, (vec![3, 24, 45, 46, 62], 9));
    }

    #[test]
    fn custom_format_golden_output() {
        let cfg = LotteryConfig {
            num_blockchain: 3,
            front_max: 3,
            front_count: 2,
            back_max: 2,
            ..LotteryConfig::default()
        };
        let hashes = vec!["00".repeat(32); 3];
        assert_eq!(generate(&hashes, None, &cfg).unwrap(), (vec![1, 2], 2));
    }

    #[test]
    fn many_windows_stay_in_range() {
        let cfg = LotteryConfig::default();
        for round in 0..50u32 {
            let hashes: Vec<String> = (0..NUM_BLOCKCHAIN)
                .map(|i| hex::encode(Sha256::digest(format!("{round}:{i}").as_bytes())))
                .collect();
            let (front, back) = generate(&hashes, None, &cfg).unwrap();
            assert_eq!(front.len(), FRONT_COUNT);
            assert!(front.windows(2).all(|w| w[0] < w[1]));
            assert!(front.iter().all(|n| (1..=BLUE_BALL_MAX).contains(n)));
            assert!((1..=RED_BALL_MAX).contains(&back));
        }
    }

    #[test]
    fn wrong_count_and_bad_hex_fail() {
        let cfg = LotteryConfig::default();
        let short = vec!["00".repeat(32); 143];
        assert!(matches!(
            generate(&short, None, &cfg),
            Err(LotteryError::InvalidInput(InvalidInput::CountMismatch { .. }))
        ));
        let mut bad = zero_hashes();
        bad[143] = "not a hash".into();
        assert!(matches!(
            generate(&bad, None, &cfg),
            Err(LotteryError::InvalidInput(InvalidInput::MalformedHash { index: 143, .. }))
        ));
    }

    #[test]
    fn verify_accepts_only_matching_numbers() {
        let cfg = LotteryConfig::default();
        let hashes = zero_hashes();
        assert!(verify(&hashes, None, &[9, 11, 23, 57, 58], 10, &cfg).unwrap().valid);
        assert!(!verify(&hashes, None, &[9, 11, 23, 57, 58], 11, &cfg).unwrap().valid);

        let mismatch = verify(&hashes, None, &[9, 11, 23, 57, 59], 10, &cfg).unwrap();
        assert!(!mismatch.valid);
        assert_eq!(mismatch.expected_front, vec![9, 11, 23, 57, 58]);
        assert_eq!(mismatch.expected_back, 10);
    }

    #[test]
    fn draw_from_blocks_without_timestamp_entropy() {
        let cfg = LotteryConfig::default();
        let ts = "2025-01-01 00:00:00 UTC";
        let draw = draw_from_blocks(2, &blocks(&zero_hashes(), Some(ts)), &cfg).unwrap();
        assert_eq!(draw.id(), 2);
        assert_eq!(draw.front_list(), &[9, 11, 23, 57, 58]);
        assert_eq!(draw.back_int(), 10);
        assert_eq!(draw.start_height(), 288);
        assert_eq!(draw.end_height(), 431);
        assert_eq!(draw.timestamp(), ts);
    }

    #[test]
    fn draw_from_blocks_with_timestamp_entropy() {
        let cfg = LotteryConfig {
            include_timestamp: true,
            ..LotteryConfig::default()
        };
        let ts = "2025-01-01 00:00:00 UTC";
        let draw = draw_from_blocks(2, &blocks(&zero_hashes(), Some(ts)), &cfg).unwrap();
        assert_eq!(draw.front_list(), &[3, 39, 45, 60, 64]);
        assert_eq!(draw.back_int(), 15);

        let err = draw_from_blocks(2, &blocks(&zero_hashes(), None), &cfg).unwrap_err();
        assert_eq!(
            err,
            LotteryError::InvalidInput(InvalidInput::MissingTimestamp)
        );
    }

    #[test]
    fn draw_from_blocks_rejects_unordered_heights() {
        let cfg = LotteryConfig::default();
        let mut window = blocks(&zero_hashes(), None);
        window.swap(10, 11);
        assert_eq!(
            draw_from_blocks(0, &window, &cfg).unwrap_err(),
            LotteryError::InvalidInput(InvalidInput::UnorderedHeights { index: 11 })
        );
    }

    #[test]
    fn window_helpers() {
        assert_eq!(heights_for_draw(0, 144), Some((0, 143)));
        assert_eq!(heights_for_draw(3, 144), Some((432, 575)));
        assert_eq!(heights_for_draw(u64::MAX / 4 + 1, 4), None);
        assert_eq!(draw_id_for_height(575, 144), 3);
        assert_eq!(draw_id_for_height(576, 144), 4);
        assert_eq!(first_draw_id(0, 144), 0);
        assert_eq!(first_draw_id(144, 144), 1);
        assert_eq!(first_draw_id(145, 144), 2);
    }
}
