//! Fixed-width arithmetic helpers
//!
//! Every slot in the machine has a bit width (16 for values, 5 for RAM
//! addresses, 3 for input addresses, 2 for ALU selectors).  Values written to
//! a narrower slot keep their low-order bits; nothing is ever rejected.
use crate::Word;
use rand::Rng;

/// Returns a mask with the lowest `width` bits set
#[inline]
pub const fn mask(width: u32) -> Word {
    if width >= Word::BITS {
        Word::MAX
    } else {
        (1 << width) - 1
    }
}

/// Returns `value mod 2^width`
///
/// The result is always non-negative, so `truncate(-1, 16)` is `0xFFFF`.
#[inline]
pub const fn truncate(value: i64, width: u32) -> Word {
    debug_assert!(width <= Word::BITS);
    (value.rem_euclid(1 << width)) as Word
}

/// Bitwise AND over the lowest `width` bits
#[inline]
pub const fn and(a: Word, b: Word, width: u32) -> Word {
    (a & b) & mask(width)
}

/// Bitwise OR over the lowest `width` bits
#[inline]
pub const fn or(a: Word, b: Word, width: u32) -> Word {
    (a | b) & mask(width)
}

/// Bitwise XOR over the lowest `width` bits
#[inline]
pub const fn xor(a: Word, b: Word, width: u32) -> Word {
    (a ^ b) & mask(width)
}

/// Builds a random word, drawing each of the `width` bits independently
pub fn random_word<R: Rng + ?Sized>(rng: &mut R, width: u32) -> Word {
    (0..width.min(Word::BITS))
        .fold(0, |acc, _| (acc << 1) | Word::from(rng.r#gen::<bool>()))
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    /// Reference implementation, walking bits from the MSB
    fn bitwise(a: Word, b: Word, width: u32, f: fn(bool, bool) -> bool) -> Word {
        let mut out = 0;
        for i in (0..width).rev() {
            let bit = f((a >> i) & 1 == 1, (b >> i) & 1 == 1);
            out = (out << 1) | Word::from(bit);
        }
        out
    }

    #[test]
    fn truncate_boundaries() {
        assert_eq!(truncate(0, 16), 0);
        assert_eq!(truncate(65535, 16), 65535);
        assert_eq!(truncate(65536, 16), 0);
        assert_eq!(truncate(-1, 16), 0xFFFF);
        assert_eq!(truncate(-1, 5), 31);
        assert_eq!(truncate(32, 5), 0);
        assert_eq!(truncate(33, 5), 1);
        assert_eq!(truncate(7, 2), 3);
        assert_eq!(truncate(99, 3), 3);
    }

    #[test]
    fn mask_widths() {
        assert_eq!(mask(2), 0b11);
        assert_eq!(mask(3), 0b111);
        assert_eq!(mask(5), 0b11111);
        assert_eq!(mask(16), 0xFFFF);
    }

    #[test]
    fn bitwise_patterns() {
        for (a, b) in [
            (0x0000, 0x0000),
            (0xFFFF, 0x0000),
            (0xFFFF, 0xFFFF),
            (0xAAAA, 0x5555),
            (0xAAAA, 0xAAAA),
            (0x00FF, 0x0F0F),
        ] {
            assert_eq!(and(a, b, 16), bitwise(a, b, 16, |x, y| x & y));
            assert_eq!(or(a, b, 16), bitwise(a, b, 16, |x, y| x | y));
            assert_eq!(xor(a, b, 16), bitwise(a, b, 16, |x, y| x ^ y));
        }
        assert_eq!(xor(0xAAAA, 0x5555, 16), 0xFFFF);
        assert_eq!(and(0xAAAA, 0x5555, 16), 0);
    }

    #[test]
    fn random_width() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..256 {
            assert!(random_word(&mut rng, 5) < 32);
            assert!(random_word(&mut rng, 2) < 4);
        }
        // All-ones draws from a constant source
        let mut ones = rand::rngs::mock::StepRng::new(u64::MAX, 0);
        assert_eq!(random_word(&mut ones, 16), 0xFFFF);
        let mut zeros = rand::rngs::mock::StepRng::new(0, 0);
        assert_eq!(random_word(&mut zeros, 16), 0);
    }

    proptest! {
        #[test]
        fn add_wraps(a in any::<u16>(), b in any::<u16>()) {
            let sum = i64::from(a) + i64::from(b);
            prop_assert_eq!(truncate(sum, 16), (sum % 65536) as u16);
            prop_assert_eq!(truncate(sum, 16), a.wrapping_add(b));
        }

        #[test]
        fn sub_wraps(a in any::<u16>(), b in any::<u16>()) {
            let diff = i64::from(a) - i64::from(b);
            prop_assert_eq!(truncate(diff, 16), a.wrapping_sub(b));
        }

        #[test]
        fn retruncate(v in any::<i64>(), w in 0u32..=16) {
            prop_assert_eq!(truncate(v, w), truncate(i64::from(truncate(v, 16)), w));
        }

        #[test]
        fn bitwise_reference(a in any::<u16>(), b in any::<u16>(), w in 1u32..=16) {
            let (ma, mb) = (a & mask(w), b & mask(w));
            prop_assert_eq!(and(a, b, w), bitwise(ma, mb, w, |x, y| x & y));
            prop_assert_eq!(or(a, b, w), bitwise(ma, mb, w, |x, y| x | y));
            prop_assert_eq!(xor(a, b, w), bitwise(ma, mb, w, |x, y| x ^ y));
        }
    }
}
