use serde::{Deserialize, Serialize};
use std::env;

use super::{
    BACK_COUNT, BLUE_BALL_MAX, FRONT_COUNT, HASH_HEX_LEN, NUM_BLOCKCHAIN, RED_BALL_MAX,
};
use crate::error::LotteryError;

/// How the generator counter is encoded as the HMAC message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterEncoding {
    /// 8-byte big-endian integer.
    #[default]
    BigEndianU64,
    /// Base-10 ASCII digits. Draws published by the earlier deployment
    /// were generated this way and only reproduce when
    /// `LOTTO_COUNTER_ENCODING=decimal` is set; the default produces
    /// different numbers for the same hashes.
    DecimalAscii,
}

impl CounterEncoding {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "be64" | "big_endian_u64" => Some(Self::BigEndianU64),
            "decimal" | "decimal_ascii" => Some(Self::DecimalAscii),
            _ => None,
        }
    }
}

/// Lottery format and generation parameters. Built once at startup and
/// passed to every generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// Block hashes required per draw.
    pub num_blockchain: usize,
    /// Upper bound of the front pool (white balls).
    pub front_max: u32,
    /// Upper bound of the back range (powerball).
    pub back_max: u32,
    pub front_count: usize,
    pub back_count: usize,
    /// Expected hex length of every block hash.
    pub hash_hex_len: usize,
    /// Append the window's closing timestamp to the seed preimage.
    pub include_timestamp: bool,
    /// Reported by `/config/` so verifiers know which encoding produced
    /// the stored draws. See [`CounterEncoding::DecimalAscii`].
    pub counter_encoding: CounterEncoding,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            num_blockchain: NUM_BLOCKCHAIN,
            front_max: BLUE_BALL_MAX,
            back_max: RED_BALL_MAX,
            front_count: FRONT_COUNT,
            back_count: BACK_COUNT,
            hash_hex_len: HASH_HEX_LEN,
            include_timestamp: false,
            counter_encoding: CounterEncoding::BigEndianU64,
        }
    }
}

impl LotteryConfig {
    /// Read overrides from `LOTTO_*` environment variables. Absent or
    /// unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            num_blockchain: env_parse("LOTTO_NUM_BLOCKCHAIN").unwrap_or(d.num_blockchain),
            front_max: env_parse("LOTTO_FRONT_MAX").unwrap_or(d.front_max),
            back_max: env_parse("LOTTO_BACK_MAX").unwrap_or(d.back_max),
            front_count: env_parse("LOTTO_FRONT_COUNT").unwrap_or(d.front_count),
            back_count: d.back_count,
            hash_hex_len: d.hash_hex_len,
            include_timestamp: env_parse("LOTTO_INCLUDE_TIMESTAMP")
                .unwrap_or(d.include_timestamp),
            counter_encoding: env::var("LOTTO_COUNTER_ENCODING")
                .ok()
                .and_then(|v| CounterEncoding::parse(&v))
                .unwrap_or(d.counter_encoding),
        }
    }

    /// Reject formats the generator cannot honour.
    pub fn validate(&self) -> Result<(), LotteryError> {
        if self.num_blockchain == 0 {
            return Err(invalid("num_blockchain must be at least 1"));
        }
        if self.hash_hex_len == 0 || self.hash_hex_len % 2 != 0 {
            return Err(invalid("hash_hex_len must be a positive even number"));
        }
        if self.front_count == 0 || self.front_max == 0 || self.back_max == 0 {
            return Err(invalid("pool bounds and front_count must be at least 1"));
        }
        if self.front_count > self.front_max as usize {
            return Err(LotteryError::InsufficientPool {
                count: self.front_count,
                max: self.front_max,
            });
        }
        if self.back_count != 1 {
            return Err(invalid("exactly one back number is supported"));
        }
        Ok(())
    }

    /// Total generator outputs consumed by one draw.
    pub fn outputs_per_draw(&self) -> usize {
        self.front_count + self.back_count
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn invalid(reason: &str) -> LotteryError {
    LotteryError::Validation {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_powerball_format() {
        let cfg = LotteryConfig::default();
        assert_eq!(cfg.num_blockchain, 144);
        assert_eq!(cfg.front_max, 69);
        assert_eq!(cfg.back_max, 26);
        assert_eq!(cfg.front_count, 5);
        assert_eq!(cfg.outputs_per_draw(), 6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_front_count_above_pool() {
        let cfg = LotteryConfig {
            front_count: 10,
            front_max: 9,
            ..LotteryConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(LotteryError::InsufficientPool { count: 10, max: 9 })
        );
    }

    #[test]
    fn rejects_multiple_back_numbers() {
        let cfg = LotteryConfig {
            back_count: 2,
            ..LotteryConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LotteryError::Validation { .. })
        ));
    }

    #[test]
    fn parses_counter_encoding_names() {
        assert_eq!(
            CounterEncoding::parse("decimal"),
            Some(CounterEncoding::DecimalAscii)
        );
        assert_eq!(
            CounterEncoding::parse(" BE64 "),
            Some(CounterEncoding::BigEndianU64)
        );
        assert_eq!(CounterEncoding::parse("base64"), None);
    }

    #[test]
    fn decimal_encoding_reproduces_published_draws() {
        let hashes = vec!["0".repeat(64); 144];
        let legacy = LotteryConfig {
            counter_encoding: CounterEncoding::parse("decimal").unwrap(),
            ..LotteryConfig::default()
        };
        let (front, back) = crate::lottery::generate(&hashes, None, &legacy).unwrap();
        assert_eq!(front, vec![31, 43, 53, 56, 59]);
        assert_eq!(back, 7);

        let (front, _) = crate::lottery::generate(&hashes, None, &LotteryConfig::default()).unwrap();
        assert_ne!(front, vec![31, 43, 53, 56, 59]);
    }
}
