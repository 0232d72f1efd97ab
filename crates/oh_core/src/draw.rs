//! Weighted giveaway draw over an expansion pool.
//!
//! Entry `i` appears `weight(i)` times in the pool; the pool is shuffled with a
//! seeded generator and `pool[0]` wins. The caller's slice is never touched: the
//! pool holds indices, and the outcome reports the winner's index.
//!
//! Same entries (same order) + same seed + same scheme ⇒ same winner. That is the
//! whole point; the draw exists so an auditor can rerun it.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;
use crate::rng::{AuditLcg, LcgArithmetic, TieRng};

/// Upper bound on the expansion pool (sum of weights).
pub const MAX_POOL_SIZE: u64 = 10_000_000;

/// Operator seeds are 32-bit values typed as decimal text, signed or unsigned.
pub const SEED_MIN: i64 = i32::MIN as i64;
pub const SEED_MAX: i64 = u32::MAX as i64;

/// Anything carrying a raffle-ticket count.
pub trait Weighted {
    fn weight(&self) -> u64;
}

impl Weighted for u64 {
    #[inline]
    fn weight(&self) -> u64 {
        *self
    }
}

impl Weighted for u32 {
    #[inline]
    fn weight(&self) -> u64 {
        u64::from(*self)
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    #[inline]
    fn weight(&self) -> u64 {
        (**self).weight()
    }
}

/// Generator used to shuffle the pool.
///
/// `Lcg` keeps the historical recurrence so recorded draws replay exactly; it is
/// reproducible but not proportional (its low bits cycle). `ChaCha20` is the
/// unbiased choice for new draws where ticket weights must be honored exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawScheme {
    Lcg(LcgArithmetic),
    ChaCha20,
}

impl Default for DrawScheme {
    fn default() -> Self {
        DrawScheme::Lcg(LcgArithmetic::Exact)
    }
}

impl DrawScheme {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DrawScheme::Lcg(LcgArithmetic::Exact) => "lcg",
            DrawScheme::Lcg(LcgArithmetic::Browser) => "lcg-browser",
            DrawScheme::ChaCha20 => "chacha20",
        }
    }
}

impl fmt::Display for DrawScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawScheme {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "lcg" => Ok(DrawScheme::Lcg(LcgArithmetic::Exact)),
            "lcg-browser" => Ok(DrawScheme::Lcg(LcgArithmetic::Browser)),
            "chacha20" => Ok(DrawScheme::ChaCha20),
            _ => Err(CoreError::UnknownScheme),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawError {
    /// Empty input, or every weight is zero.
    NoEligibleEntrants,
    /// Sum of weights exceeds [`MAX_POOL_SIZE`].
    PoolTooLarge { total: u64, limit: u64 },
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::NoEligibleEntrants => write!(f, "no eligible entrants (empty pool)"),
            DrawError::PoolTooLarge { total, limit } => {
                write!(f, "pool of {total} tickets exceeds limit {limit}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DrawError {}

/// What a draw decided, plus the numbers an audit record needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Index into the caller's entry slice.
    pub winner_index: usize,
    /// Sum of weights (pool length).
    pub pool_size: u64,
    /// Entries with weight > 0.
    pub eligible_entrants: usize,
    /// LCG steps or ChaCha words consumed by the shuffle.
    pub rng_steps: u64,
}

/// Parse an operator-typed seed: optional sign, decimal digits, 32-bit range.
pub fn parse_seed(text: &str) -> Result<i64, CoreError> {
    let t = text.trim();
    let digits = t.strip_prefix(['-', '+']).unwrap_or(t);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::SeedSyntax);
    }
    let seed: i64 = t.parse().map_err(|_| CoreError::SeedOutOfRange)?;
    if (SEED_MIN..=SEED_MAX).contains(&seed) {
        Ok(seed)
    } else {
        Err(CoreError::SeedOutOfRange)
    }
}

/// Expansion pool: index `i` repeated `weight(i)` times, in input order.
pub fn build_pool<T: Weighted>(entries: &[T]) -> Result<Vec<usize>, DrawError> {
    let total = entries
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.weight()));
    if total > MAX_POOL_SIZE {
        return Err(DrawError::PoolTooLarge { total, limit: MAX_POOL_SIZE });
    }
    let mut pool = Vec::with_capacity(total as usize);
    for (i, e) in entries.iter().enumerate() {
        pool.extend(core::iter::repeat(i).take(e.weight() as usize));
    }
    Ok(pool)
}

/// Draw one winner. Refuses to run on an empty pool.
pub fn select_winner<T: Weighted>(
    entries: &[T],
    seed: i64,
    scheme: DrawScheme,
) -> Result<DrawOutcome, DrawError> {
    let mut pool = build_pool(entries)?;
    if pool.is_empty() {
        return Err(DrawError::NoEligibleEntrants);
    }

    let rng_steps = match scheme {
        DrawScheme::Lcg(arithmetic) => {
            let mut rng = AuditLcg::new(seed, arithmetic);
            rng.shuffle_in_place(&mut pool);
            rng.steps()
        }
        DrawScheme::ChaCha20 => {
            let mut rng = TieRng::from_seed_i64(seed);
            rng.shuffle_in_place(&mut pool);
            rng.words_consumed()
        }
    };

    Ok(DrawOutcome {
        winner_index: pool[0],
        pool_size: pool.len() as u64,
        eligible_entrants: entries.iter().filter(|e| e.weight() > 0).count(),
        rng_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EXACT: DrawScheme = DrawScheme::Lcg(LcgArithmetic::Exact);
    const BROWSER: DrawScheme = DrawScheme::Lcg(LcgArithmetic::Browser);

    fn winner(weights: &[u32], seed: i64, scheme: DrawScheme) -> usize {
        select_winner(weights, seed, scheme).unwrap().winner_index
    }

    #[test]
    fn empty_and_all_zero_refuse_to_draw() {
        let none: [u32; 0] = [];
        assert_eq!(select_winner(&none, 1, EXACT), Err(DrawError::NoEligibleEntrants));
        assert_eq!(select_winner(&[0u32, 0, 0], 1, EXACT), Err(DrawError::NoEligibleEntrants));
    }

    #[test]
    fn oversized_pool_is_rejected_before_allocating() {
        let big = [MAX_POOL_SIZE, 1];
        assert_eq!(
            select_winner(&big, 0, EXACT),
            Err(DrawError::PoolTooLarge { total: MAX_POOL_SIZE + 1, limit: MAX_POOL_SIZE })
        );
    }

    #[test]
    fn recorded_winners_replay() {
        let seeds: Vec<usize> = (0..6).map(|s| winner(&[1, 2, 7], s, EXACT)).collect();
        assert_eq!(seeds, vec![0, 1, 0, 1, 2, 1]);
        assert_eq!(winner(&[3, 0, 1, 5], 12345, EXACT), 0);
        assert_eq!(winner(&[3, 0, 1, 5], -1, EXACT), 3);
        assert_eq!(winner(&[3, 0, 1, 5], 12345, BROWSER), 3);
        assert_eq!(winner(&[3, 0, 1, 5], -1, BROWSER), 0);
    }

    #[test]
    fn outcome_counts() {
        let out = select_winner(&[3u32, 0, 1, 5], 12345, EXACT).unwrap();
        assert_eq!(out.pool_size, 9);
        assert_eq!(out.eligible_entrants, 3);
        assert_eq!(out.rng_steps, 8);
    }

    #[test]
    fn input_is_not_reordered() {
        let entries = vec![5u32, 1, 9];
        let before = entries.clone();
        let _ = select_winner(&entries, 77, DrawScheme::ChaCha20).unwrap();
        assert_eq!(entries, before);
    }

    #[test]
    fn chacha_is_weight_proportional() {
        let weights = [1u32, 2, 7];
        let n = 20_000i64;
        let mut wins = [0u32; 3];
        for seed in 0..n {
            wins[winner(&weights, seed, DrawScheme::ChaCha20)] += 1;
        }
        for (i, w) in weights.iter().enumerate() {
            let expected = f64::from(*w) / 10.0;
            let observed = f64::from(wins[i]) / n as f64;
            assert!((observed - expected).abs() < 0.02, "entry {i}: {observed} vs {expected}");
        }
    }

    #[test]
    fn seed_parsing() {
        assert_eq!(parse_seed(" 42 "), Ok(42));
        assert_eq!(parse_seed("-2147483648"), Ok(SEED_MIN));
        assert_eq!(parse_seed("4294967295"), Ok(SEED_MAX));
        assert_eq!(parse_seed("+7"), Ok(7));
        assert_eq!(parse_seed("4294967296"), Err(CoreError::SeedOutOfRange));
        assert_eq!(parse_seed("99999999999999999999999"), Err(CoreError::SeedOutOfRange));
        assert_eq!(parse_seed("12abc"), Err(CoreError::SeedSyntax));
        assert_eq!(parse_seed("-"), Err(CoreError::SeedSyntax));
        assert_eq!(parse_seed("0x10"), Err(CoreError::SeedSyntax));
    }

    #[test]
    fn scheme_names_round_trip() {
        for s in [EXACT, BROWSER, DrawScheme::ChaCha20] {
            assert_eq!(s.as_str().parse::<DrawScheme>(), Ok(s));
        }
        assert_eq!("mt19937".parse::<DrawScheme>(), Err(CoreError::UnknownScheme));
    }

    fn any_scheme() -> impl Strategy<Value = DrawScheme> {
        prop_oneof![Just(EXACT), Just(BROWSER), Just(DrawScheme::ChaCha20)]
    }

    proptest! {
        #[test]
        fn same_inputs_same_winner(
            weights in proptest::collection::vec(0u32..6, 1..12),
            seed in SEED_MIN..=SEED_MAX,
            scheme in any_scheme(),
        ) {
            prop_assume!(weights.iter().any(|w| *w > 0));
            let a = select_winner(&weights, seed, scheme).unwrap();
            let b = select_winner(&weights, seed, scheme).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn zero_weight_never_wins(
            weights in proptest::collection::vec(0u32..4, 1..10),
            seed in SEED_MIN..=SEED_MAX,
            scheme in any_scheme(),
        ) {
            prop_assume!(weights.iter().any(|w| *w > 0));
            let out = select_winner(&weights, seed, scheme).unwrap();
            prop_assert!(weights[out.winner_index] > 0);
        }

        #[test]
        fn lone_weighted_entry_always_wins(
            len in 1usize..8,
            pick in 0usize..8,
            weight in 1u32..5,
            seed in SEED_MIN..=SEED_MAX,
            scheme in any_scheme(),
        ) {
            let pick = pick % len;
            let mut weights = vec![0u32; len];
            weights[pick] = weight;
            prop_assert_eq!(select_winner(&weights, seed, scheme).unwrap().winner_index, pick);
        }
    }
}
