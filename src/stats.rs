use chrono::Utc;
use serde::Serialize;

use crate::lottery::{Draw, LotteryConfig, TIMESTAMP_FORMAT};

/// Significance level under which a distribution is reported as biased.
pub const SIGNIFICANCE: f64 = 0.05;

/// Chi-square goodness-of-fit of observed frequencies against uniform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquare {
    pub chi2: f64,
    pub p_value: f64,
    pub dof: u32,
    pub uniform: bool,
    pub conclusion: String,
}

/// Snapshot of number frequencies over every stored draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub draws: usize,
    pub front: ChiSquare,
    pub back: ChiSquare,
    /// `front_frequencies[n - 1]` is how often `n` was drawn.
    pub front_frequencies: Vec<u64>,
    pub front_expected: f64,
    pub back_frequencies: Vec<u64>,
    pub back_expected: f64,
    pub computed_at: String,
}

impl Statistics {
    /// `None` when there are no draws to summarise.
    pub fn compute(draws: &[Draw], config: &LotteryConfig) -> Option<Self> {
        if draws.is_empty() {
            return None;
        }

        let mut front_frequencies = vec![0u64; config.front_max as usize];
        let mut back_frequencies = vec![0u64; config.back_max as usize];
        for draw in draws {
            for &n in draw.front_list() {
                if let Some(slot) = front_frequencies.get_mut(n as usize - 1) {
                    *slot += 1;
                }
            }
            if let Some(slot) = back_frequencies.get_mut(draw.back_int() as usize - 1) {
                *slot += 1;
            }
        }

        let total = draws.len() as f64;
        let front_expected = total * config.front_count as f64 / config.front_max as f64;
        let back_expected = total / config.back_max as f64;

        Some(Self {
            draws: draws.len(),
            front: chi_square(&front_frequencies, front_expected),
            back: chi_square(&back_frequencies, back_expected),
            front_frequencies,
            front_expected,
            back_frequencies,
            back_expected,
            computed_at: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}

/// Goodness-of-fit test with `observed.len() - 1` degrees of freedom.
pub fn chi_square(observed: &[u64], expected: f64) -> ChiSquare {
    let dof = observed.len().saturating_sub(1) as u32;
    let chi2: f64 = if expected > 0.0 {
        observed
            .iter()
            .map(|&o| {
                let d = o as f64 - expected;
                d * d / expected
            })
            .sum()
    } else {
        0.0
    };
    let p_value = if dof == 0 {
        1.0
    } else {
        upper_regularized_gamma(dof as f64 / 2.0, chi2 / 2.0)
    };
    let uniform = p_value > SIGNIFICANCE;

    ChiSquare {
        chi2: round_to(chi2, 2),
        p_value: round_to(p_value, 4),
        dof,
        uniform,
        conclusion: if uniform {
            "Uniform distribution (good randomness)".to_string()
        } else {
            "Non-uniform distribution (possible bias)".to_string()
        },
    }
}

fn round_to(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

const GAMMA_EPS: f64 = 1e-14;
const GAMMA_MAX_ITER: usize = 500;

/// Q(a, x) = Γ(a, x) / Γ(a): series below `a + 1`, Lentz continued
/// fraction above.
fn upper_regularized_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        1.0 - lower_series(a, x)
    } else {
        upper_continued_fraction(a, x)
    }
}

fn lower_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..GAMMA_MAX_ITER {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * GAMMA_EPS {
            break;
        }
    }
    (sum.ln() - x + a * x.ln() - ln_gamma(a)).exp()
}

fn upper_continued_fraction(a: f64, x: f64) -> f64 {
    let tiny = f64::MIN_POSITIVE / GAMMA_EPS;
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=GAMMA_MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < GAMMA_EPS {
            break;
        }
    }
    (a * x.ln() - x - ln_gamma(a)).exp() * h
}

/// Lanczos approximation (g = 7, n = 9).
fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut acc = COEF[0];
    for (i, c) in COEF.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}
