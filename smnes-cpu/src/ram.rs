use crate::{Word, bits};

/// Number of words in data memory
pub const RAM_SIZE: usize = 32;

/// Width of a data memory address
pub const RAM_ADDR_BITS: u32 = 5;

/// Number of words at the start of RAM which double as the screen bitmap
pub const SCREEN_CELLS: usize = 16;

/// Conventional output cell, printed next to the screen
pub const OUTPUT_CELL: usize = 16;

/// Data memory
///
/// Reads and writes go through an address register (the cursor), which is set
/// separately; this models a single address bus + data bus interface.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ram {
    cells: [Word; RAM_SIZE],
    addr: u8,
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    /// Builds a zeroed RAM with the cursor at address 0
    pub fn new() -> Self {
        Self {
            cells: [0; RAM_SIZE],
            addr: 0,
        }
    }

    /// Moves the cursor, keeping the low 5 bits of `addr`
    #[inline]
    pub fn set_addr(&mut self, addr: Word) {
        self.addr = bits::truncate(i64::from(addr), RAM_ADDR_BITS) as u8;
    }

    /// Returns the current cursor position
    #[inline]
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Writes to the cell under the cursor
    #[inline]
    pub fn write(&mut self, v: Word) {
        self.cells[usize::from(self.addr)] = v;
    }

    /// Reads from the cell under the cursor
    #[inline]
    pub fn read(&self) -> Word {
        self.cells[usize::from(self.addr)]
    }

    /// Zeroes the screen region (cells `0..16`), leaving everything else
    pub fn clear_screen(&mut self) {
        self.cells[..SCREEN_CELLS].fill(0);
    }

    /// Reads an arbitrary cell, for display
    ///
    /// # Panics
    /// If `i >= RAM_SIZE`
    #[inline]
    pub fn cell(&self, i: usize) -> Word {
        self.cells[i]
    }

    /// Borrows the entire memory array
    #[inline]
    pub fn cells(&self) -> &[Word; RAM_SIZE] {
        &self.cells
    }

    /// Borrows the screen bitmap
    #[inline]
    pub fn screen(&self) -> &[Word] {
        &self.cells[..SCREEN_CELLS]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cursor() {
        let mut ram = Ram::new();
        assert_eq!(ram.addr(), 0);
        ram.write(12);
        assert_eq!(ram.cell(0), 12);

        ram.set_addr(20);
        ram.write(34);
        assert_eq!(ram.read(), 34);
        assert_eq!(ram.cell(20), 34);

        // Address wraps at 5 bits
        ram.set_addr(33);
        assert_eq!(ram.addr(), 1);
        ram.set_addr(31);
        ram.write(0xFFFF);
        assert_eq!(ram.cells()[31], 0xFFFF);
    }

    #[test]
    fn clear_screen() {
        let mut ram = Ram::new();
        for i in 0..RAM_SIZE {
            ram.set_addr(i as Word);
            ram.write(i as Word + 1);
        }
        ram.clear_screen();
        assert!(ram.screen().iter().all(|&c| c == 0));
        for i in SCREEN_CELLS..RAM_SIZE {
            assert_eq!(ram.cell(i), i as Word + 1);
        }
    }
}
