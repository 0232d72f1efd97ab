// crates/oh_core/src/rng.rs
//
// Deterministic, integer-first RNGs for giveaway draws.
//
// Two generators live here:
// • `AuditLcg`: the recurrence `state = (state * 1103515245 + 12345) & 0x7fffffff`.
//   It is NOT a secure or even a good generator. Its only job is reproducibility:
//   anyone holding the entry list and the seed can rerun a draw and get the same
//   winner, including draws recorded by the older browser tool.
// • `TieRng`: ChaCha20 seeded from a 64-bit value, with unbiased range sampling.
//
// Both count the words they hand out so a draw record can state how much of the
// stream was consumed.

use rand_chacha::ChaCha20Rng;
use rand_core::{impls, Error as RandError, RngCore, SeedableRng};

pub const LCG_MULTIPLIER: i64 = 1_103_515_245;
pub const LCG_INCREMENT: i64 = 12_345;
pub const LCG_MASK: u32 = 0x7fff_ffff;

const TWO_POW_32: i128 = 1 << 32;

/// How the LCG product is evaluated.
///
/// `Exact` is the recurrence as written, in exact integer arithmetic.
/// `Browser` evaluates `state * 1103515245 + 12345` in IEEE-754 doubles and
/// applies ECMAScript `ToInt32` before masking. Once the product passes 2^53 the
/// two modes diverge; `Browser` is the one that replays draws made in a web page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LcgArithmetic {
    #[default]
    Exact,
    Browser,
}

/// Replayable linear congruential generator used for audited draws.
#[derive(Clone, Debug)]
pub struct AuditLcg {
    state: i64,
    arithmetic: LcgArithmetic,
    steps: u64,
}

impl AuditLcg {
    /// Start from the operator's seed. The seed itself is never emitted; the
    /// first output is the first recurrence step.
    #[inline]
    pub fn new(seed: i64, arithmetic: LcgArithmetic) -> Self {
        Self { state: seed, arithmetic, steps: 0 }
    }

    #[inline]
    pub fn arithmetic(&self) -> LcgArithmetic {
        self.arithmetic
    }

    /// Number of recurrence steps taken so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance once and return the new 31-bit state.
    #[inline]
    pub fn step(&mut self) -> u32 {
        let next = match self.arithmetic {
            LcgArithmetic::Exact => {
                let wide = i128::from(self.state) * i128::from(LCG_MULTIPLIER)
                    + i128::from(LCG_INCREMENT);
                // Two's-complement masking keeps the low 31 bits, i.e. mod 2^31.
                (wide & i128::from(LCG_MASK)) as u32
            }
            LcgArithmetic::Browser => {
                let product = (self.state as f64) * (LCG_MULTIPLIER as f64) + (LCG_INCREMENT as f64);
                to_uint32(product) & LCG_MASK
            }
        };
        self.state = i64::from(next);
        self.steps = self.steps.saturating_add(1);
        next
    }

    /// Fisher–Yates from the last index down to 1: `j = state % (i + 1)`.
    ///
    /// The walk direction and the modulo reduction are part of the replay
    /// contract; changing either changes every historical winner.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = (self.next_u32() as usize) % (i + 1);
            slice.swap(i, j);
        }
    }
}

/// ECMAScript `ToUint32` for a finite double (NaN/inf map to 0).
///
/// The cast truncates toward zero and every product reachable here is far
/// below 2^127, so the integer reduction is exact.
#[inline]
fn to_uint32(x: f64) -> u32 {
    if !x.is_finite() {
        return 0;
    }
    (x as i128).rem_euclid(TWO_POW_32) as u32
}

impl RngCore for AuditLcg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Deterministic ChaCha20 stream for draws that must be weight-proportional.
///
/// The 64-bit seed goes little-endian into the first 8 bytes of the 32-byte
/// ChaCha seed; the remaining 24 bytes are zero.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
    words_consumed: u64,
}

impl TieRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self { rng: ChaCha20Rng::from_seed(seed32), words_consumed: 0 }
    }

    /// Signed seeds map through their two's-complement bit pattern.
    #[inline]
    pub fn from_seed_i64(seed: i64) -> Self {
        Self::from_seed_u64(seed as u64)
    }

    /// Total 64-bit words drawn, rejected draws included.
    #[inline]
    pub fn words_consumed(&self) -> u64 {
        self.words_consumed
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)` via threshold rejection; `None` if `n == 0`.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n; // == 2^64 mod n
        loop {
            let x = self.next_word();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Unbiased Fisher–Yates, same walk direction as the LCG variant.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            // i + 1 >= 2, so a value is always produced.
            if let Some(j) = self.gen_range(i as u64 + 1) {
                slice.swap(i, j as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(rng: &mut AuditLcg, n: usize) -> Vec<u32> {
        (0..n).map(|_| rng.step()).collect()
    }

    #[test]
    fn exact_sequence_from_one() {
        let mut rng = AuditLcg::new(1, LcgArithmetic::Exact);
        assert_eq!(take(&mut rng, 4), vec![1_103_527_590, 377_401_575, 662_824_084, 1_147_902_781]);
        assert_eq!(rng.steps(), 4);
    }

    #[test]
    fn browser_sequence_loses_precision_after_first_step() {
        let mut rng = AuditLcg::new(1, LcgArithmetic::Browser);
        assert_eq!(take(&mut rng, 4), vec![1_103_527_590, 377_401_600, 333_417_792, 314_102_912]);
    }

    #[test]
    fn negative_seed_is_reduced_not_rejected() {
        let mut exact = AuditLcg::new(-7, LcgArithmetic::Exact);
        assert_eq!(take(&mut exact, 3), vec![865_340_222, 23_715_231, 596_901_612]);
        let mut browser = AuditLcg::new(-7, LcgArithmetic::Browser);
        assert_eq!(take(&mut browser, 3), vec![865_340_222, 23_715_200, 747_667_384]);
    }

    #[test]
    fn lcg_shuffle_matches_recorded_permutations() {
        let mut xs: Vec<u32> = (0..10).collect();
        AuditLcg::new(42, LcgArithmetic::Exact).shuffle_in_place(&mut xs);
        assert_eq!(xs, vec![4, 3, 0, 5, 2, 6, 9, 1, 8, 7]);

        let mut ys: Vec<u32> = (0..10).collect();
        AuditLcg::new(42, LcgArithmetic::Browser).shuffle_in_place(&mut ys);
        assert_eq!(ys, vec![1, 8, 3, 9, 5, 6, 2, 0, 4, 7]);
    }

    #[test]
    fn lcg_shuffle_of_short_slices_consumes_nothing() {
        let mut rng = AuditLcg::new(9, LcgArithmetic::Exact);
        let mut one = [7u8];
        rng.shuffle_in_place(&mut one);
        rng.shuffle_in_place::<u8>(&mut []);
        assert_eq!(rng.steps(), 0);
    }

    #[test]
    fn lcg_outputs_stay_within_31_bits() {
        let mut rng = AuditLcg::new(i64::from(u32::MAX), LcgArithmetic::Browser);
        for _ in 0..1000 {
            assert!(rng.next_u32() <= LCG_MASK);
        }
    }

    #[test]
    fn chacha_gen_range_zero_none() {
        let mut rng = TieRng::from_seed_u64(0xDEAD_BEEF_CAFE_BABE);
        assert_eq!(rng.gen_range(0), None);
        assert_eq!(rng.words_consumed(), 0);
    }

    #[test]
    fn chacha_shuffle_is_deterministic() {
        let mut xs = (0..16).collect::<Vec<_>>();
        let mut ys = (0..16).collect::<Vec<_>>();
        TieRng::from_seed_i64(-42).shuffle_in_place(&mut xs);
        TieRng::from_seed_i64(-42).shuffle_in_place(&mut ys);
        assert_eq!(xs, ys);
        let mut sorted = xs.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }
}
