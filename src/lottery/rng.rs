use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{CounterEncoding, Seed};

type HmacSha256 = Hmac<Sha256>;

/// One generator output: a 256-bit unsigned big-endian integer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RandomValue([u8; 32]);

impl RandomValue {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Exact `self mod modulus`, computed limb by limb over the big-endian
    /// bytes so the full 256-bit value takes part in the reduction.
    pub fn reduce(&self, modulus: u32) -> u32 {
        assert!(modulus > 0, "modulus must be non-zero");
        let m = u64::from(modulus);
        let rem = self
            .0
            .iter()
            .fold(0u64, |acc, &b| ((acc << 8) | u64::from(b)) % m);
        rem as u32
    }
}

impl std::fmt::Debug for RandomValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RandomValue(0x{})", self.to_hex())
    }
}

/// HMAC-SHA256(seed, encode(counter)).
pub fn value_at(seed: &Seed, counter: u64, encoding: CounterEncoding) -> RandomValue {
    let mut mac = HmacSha256::new_from_slice(seed.as_bytes())
        .expect("HMAC accepts keys of any length");
    match encoding {
        CounterEncoding::BigEndianU64 => mac.update(&counter.to_be_bytes()),
        CounterEncoding::DecimalAscii => mac.update(counter.to_string().as_bytes()),
    }
    let digest = mac.finalize().into_bytes();

    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    RandomValue(out)
}

/// Counter-keyed deterministic generator. The counter starts at 0 and
/// advances by exactly one per output; it is never rewound.
#[derive(Debug, Clone)]
pub struct CounterRng {
    seed: Seed,
    counter: u64,
    encoding: CounterEncoding,
}

impl CounterRng {
    pub fn new(seed: Seed, encoding: CounterEncoding) -> Self {
        Self {
            seed,
            counter: 0,
            encoding,
        }
    }

    /// Counter value the next output will be keyed with.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn next_value(&mut self) -> RandomValue {
        let value = value_at(&self.seed, self.counter, self.encoding);
        self.counter += 1;
        value
    }
}

impl Iterator for CounterRng {
    type Item = RandomValue;

    fn next(&mut self) -> Option<RandomValue> {
        Some(self.next_value())
    }
}

/// First `n` outputs for `seed`.
pub fn take(seed: Seed, n: usize, encoding: CounterEncoding) -> Vec<RandomValue> {
    CounterRng::new(seed, encoding).take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_seed() -> Seed {
        let bytes: [u8; 32] =
            hex::decode("34a82d28cb1e0ba92cadc4be8497dc9eea9ac4f63b9c445a9e52d298990ac491")
                .unwrap()
                .try_into()
                .unwrap();
        Seed::from(bytes)
    }

    #[test]
    fn big_endian_outputs_are_golden() {
        let values = take(zero_seed(), 2, CounterEncoding::BigEndianU64);
        assert_eq!(
            values[0].to_hex(),
            "9bc0294ae0c0d589c4ea277a2d18f5037e82dd3defaa6def13818352dc1b8944"
        );
        assert_eq!(
            values[1].to_hex(),
            "47485937e6008d6cb71cbe09554e2e78b68bed84bb97944ccaa40782e99198f4"
        );
    }

    #[test]
    fn decimal_outputs_are_golden() {
        let values = take(zero_seed(), 2, CounterEncoding::DecimalAscii);
        assert_eq!(
            values[0].to_hex(),
            "3246ab91974e2369fc9c741e02bcec436184d512e822fe5e44c8b4553179af61"
        );
        assert_eq!(
            values[1].to_hex(),
            "125611f4a9d00220eea4ff3a8a0ac0be63975e24d7bac064c48b5c42ab6770b5"
        );
    }

    #[test]
    fn counter_advances_once_per_output() {
        let mut rng = CounterRng::new(zero_seed(), CounterEncoding::BigEndianU64);
        assert_eq!(rng.counter(), 0);
        let a = rng.next_value();
        let b = rng.next_value();
        assert_eq!(rng.counter(), 2);
        assert_ne!(a, b);
        assert_eq!(a, value_at(&zero_seed(), 0, CounterEncoding::BigEndianU64));
    }

    #[test]
    fn fresh_generator_restarts_at_zero() {
        let a = take(zero_seed(), 6, CounterEncoding::BigEndianU64);
        let b = take(zero_seed(), 6, CounterEncoding::BigEndianU64);
        assert_eq!(a, b);
    }

    #[test]
    fn reduce_matches_small_integers() {
        let mut bytes = [0u8; 32];
        bytes[31] = 200;
        bytes[30] = 1; // 456
        let v = RandomValue(bytes);
        assert_eq!(v.reduce(69), 456 % 69);
        assert_eq!(v.reduce(1), 0);
    }

    #[test]
    fn reduce_uses_all_bytes() {
        // 2^248 mod 7: 2^3 = 1 (mod 7), 248 = 3 * 82 + 2, so 4.
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        assert_eq!(RandomValue(bytes).reduce(7), 4);
        // 2^32 = 1 (mod 2^32 - 1), so 2^256 - 1 reduces to 0.
        assert_eq!(RandomValue([0xff; 32]).reduce(u32::MAX), 0);
    }
}
