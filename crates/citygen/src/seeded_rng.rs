//! String-seeded deterministic generator.
//!
//! Every random choice in a city (footprints, lit windows, lamp offsets) is
//! drawn from a `SeededRng` keyed by the repository name, so the same
//! repository always produces the same building no matter where it lands in
//! the list or which platform runs the generator. The stream depends only on
//! the seed string: no clock, no OS entropy.

use rand::RngCore;

/// 2^32 as `f64`, used to normalise a `u32` draw into `[0, 1)`.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Deterministic pseudo-random stream keyed by a string.
///
/// The seed's UTF-16 code units are folded into a 32-bit accumulator with
/// `h = 31 * h + unit`; each draw remixes the accumulator with two
/// xor-shift/multiply rounds and a final xor-shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        let state = seed
            .encode_utf16()
            .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)));
        Self { state }
    }

    fn mix(&mut self) -> u32 {
        let mut h = self.state;
        h = (h ^ (h >> 16)).wrapping_mul(0x85EB_CA6B);
        h = (h ^ (h >> 13)).wrapping_mul(0xC2B2_AE35);
        h ^= h >> 16;
        self.state = h;
        h
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.mix()) / U32_RANGE
    }

    /// Next value in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f64() as f32 * (hi - lo)
    }

    /// Next index in `0..len`. Returns 0 for an empty range (still consumes a draw).
    pub fn index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Consume one draw without using it.
    pub fn skip(&mut self) {
        self.mix();
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.mix()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.mix());
        let lo = u64::from(self.mix());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.mix().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_known_sequence_for_seed_a() {
        let mut rng = SeededRng::new("a");
        assert_eq!(rng.next_f64(), 0.8758410869631916);
        assert_eq!(rng.next_f64(), 0.5983069695066661);
        assert_eq!(rng.next_f64(), 0.9667832236737013);
    }

    #[test]
    fn test_known_sequence_for_multichar_seed() {
        let mut rng = SeededRng::new("react");
        assert_eq!(rng.next_f64(), 0.8024041308090091);
        assert_eq!(rng.next_f64(), 0.8663867278955877);
        assert_eq!(rng.next_f64(), 0.1295070699416101);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new("facebook/react");
        let mut b = SeededRng::new("facebook/react");
        let vals_a: Vec<f64> = (0..50).map(|_| a.next_f64()).collect();
        let vals_b: Vec<f64> = (0..50).map(|_| b.next_f64()).collect();
        assert_eq!(vals_a, vals_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = SeededRng::new("a");
        let mut b = SeededRng::new("b");
        let vals_a: Vec<f64> = (0..10).map(|_| a.next_f64()).collect();
        let vals_b: Vec<f64> = (0..10).map(|_| b.next_f64()).collect();
        assert_ne!(vals_a, vals_b);
    }

    #[test]
    fn test_empty_seed_is_valid_and_constant() {
        let mut rng = SeededRng::new("");
        for _ in 0..10 {
            assert_eq!(rng.next_f64(), 0.0);
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = SeededRng::new("range-check");
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn test_non_ascii_seed_uses_utf16_units() {
        // U+1F600 is a surrogate pair in UTF-16: two units, not one scalar.
        let emoji = SeededRng::new("\u{1F600}");
        let folded = 0xD83Du32.wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(emoji.state, folded);
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let mut rng = SeededRng::new("idx");
        for _ in 0..1000 {
            assert!(rng.index(7) < 7);
        }
        assert_eq!(rng.index(0), 0);
    }

    #[test]
    fn test_skip_consumes_exactly_one_draw() {
        // One branch uses both draws, the other discards the second; the
        // streams must line up again on the third draw.
        let mut lit = SeededRng::new("alignment");
        let mut unlit = SeededRng::new("alignment");

        let _ = lit.next_f64();
        let _ = lit.index(5);

        let _ = unlit.next_f64();
        unlit.skip();

        assert_eq!(lit.next_f64(), unlit.next_f64());
        assert_eq!(lit, unlit);
    }

    #[test]
    fn test_rng_core_matches_native_draws() {
        let mut native = SeededRng::new("core");
        let mut core = SeededRng::new("core");
        let expected = (native.next_f64() * U32_RANGE) as u32;
        assert_eq!(core.gen::<u32>(), expected);
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut rng = SeededRng::new("bytes");
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        let mut check = SeededRng::new("bytes");
        let first = check.next_u32().to_le_bytes();
        let second = check.next_u32().to_le_bytes();
        assert_eq!(&buf[..4], &first);
        assert_eq!(&buf[4..], &second[..3]);
    }
}
