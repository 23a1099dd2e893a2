use crate::{WORD_BITS, Word, bits};

/// Number of independent ALUs in the bank
pub const ALU_COUNT: usize = 4;

/// Width of the ALU selector field
pub const ALU_SELECT_BITS: u32 = 2;

/// Index of one of the four ALUs
///
/// This is guaranteed to be in the range `0..ALU_COUNT`, so indexing into the
/// bank never fails.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AluSel(u8);

impl AluSel {
    /// Builds a selector, returning `None` if `i` is out of range
    pub const fn new(i: u8) -> Option<Self> {
        if (i as usize) < ALU_COUNT {
            Some(Self(i))
        } else {
            None
        }
    }

    /// Builds a selector from the low bits of `v`
    pub const fn from_bits(v: Word) -> Self {
        Self(bits::truncate(v as i64, ALU_SELECT_BITS) as u8)
    }

    /// Returns the selector as an integer in `0..4`
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// A single arithmetic / logic unit
///
/// Each unit has two input registers and an accumulator, all 16 bits wide.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Alu {
    a: Word,
    b: Word,
    acc: Word,
}

impl Alu {
    /// Builds a zeroed ALU
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets register A
    #[inline]
    pub fn set_a(&mut self, v: Word) {
        self.a = v;
    }

    /// Sets register B
    #[inline]
    pub fn set_b(&mut self, v: Word) {
        self.b = v;
    }

    /// Reads register A
    #[inline]
    pub fn a(&self) -> Word {
        self.a
    }

    /// Reads register B
    #[inline]
    pub fn b(&self) -> Word {
        self.b
    }

    /// Reads the accumulator
    #[inline]
    pub fn acc(&self) -> Word {
        self.acc
    }

    /// `acc = A + B`, wrapping at 16 bits
    pub fn add(&mut self) {
        self.acc = bits::truncate(i64::from(self.a) + i64::from(self.b), WORD_BITS);
    }

    /// `acc = A - B`, wrapping at 16 bits
    ///
    /// There is no sign tracking; `3 - 5` leaves `0xFFFE` in the accumulator.
    pub fn sub(&mut self) {
        self.acc = bits::truncate(i64::from(self.a) - i64::from(self.b), WORD_BITS);
    }

    /// `acc = A & B`
    pub fn and(&mut self) {
        self.acc = bits::and(self.a, self.b, WORD_BITS);
    }

    /// `acc = A | B`
    pub fn or(&mut self) {
        self.acc = bits::or(self.a, self.b, WORD_BITS);
    }

    /// `acc = A ^ B`
    pub fn xor(&mut self) {
        self.acc = bits::xor(self.a, self.b, WORD_BITS);
    }

    /// Checks `A == B`
    pub fn is_equal(&self) -> bool {
        self.a == self.b
    }

    /// Checks `A > B` (unsigned)
    pub fn is_more(&self) -> bool {
        self.a > self.b
    }

    /// Checks `A < B` (unsigned)
    pub fn is_less(&self) -> bool {
        self.a < self.b
    }
}
