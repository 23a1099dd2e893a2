use crate::{Word, bits};

/// Number of input slots
pub const INPUT_SLOTS: usize = 8;

/// Width of an input slot address
pub const INPUT_ADDR_BITS: u32 = 3;

/// Slot contents at reset
pub const INPUT_PRESETS: [Word; INPUT_SLOTS] = [65532, 4, 65535, 1, 2, 3, 4, 5];

/// Key input to the input mapper
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Select,
    Start,
    A,
    B,
}

impl Key {
    /// Every key, in slot order
    pub const ALL: [Key; INPUT_SLOTS] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Select,
        Key::Start,
        Key::A,
        Key::B,
    ];

    /// Keyboard symbols, in slot order
    pub const SYMBOLS: [char; INPUT_SLOTS] =
        ['w', 's', 'a', 'd', '1', '2', '3', '4'];

    /// Looks up the key bound to a keyboard symbol
    pub fn from_char(c: char) -> Option<Self> {
        Self::SYMBOLS
            .iter()
            .position(|&s| s == c)
            .map(|i| Self::ALL[i])
    }

    /// Returns the keyboard symbol for this key
    pub fn symbol(self) -> char {
        Self::SYMBOLS[self.slot()]
    }

    /// Returns the input slot bound to this key
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Input mapper
///
/// Eight preset slots, plus a one-shot pointer set by a key press.  This is
/// the only channel through which the outside world reaches a running program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Input {
    slots: [Word; INPUT_SLOTS],
    addr: u8,

    /// Slot index for the queued key press, cleared on read
    pending: Option<u8>,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// Builds an input mapper with the default slot presets
    pub fn new() -> Self {
        Self {
            slots: INPUT_PRESETS,
            addr: 0,
            pending: None,
        }
    }

    /// Moves the configuration cursor, keeping the low 3 bits of `addr`
    #[inline]
    pub fn set_addr(&mut self, addr: Word) {
        self.addr = bits::truncate(i64::from(addr), INPUT_ADDR_BITS) as u8;
    }

    /// Returns the configuration cursor
    #[inline]
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Overwrites the slot under the cursor
    #[inline]
    pub fn write(&mut self, v: Word) {
        self.slots[usize::from(self.addr)] = v;
    }

    /// Returns the contents of every slot
    #[inline]
    pub fn slots(&self) -> &[Word; INPUT_SLOTS] {
        &self.slots
    }

    /// Queues a key press
    ///
    /// Only one key may be queued at a time; returns `false` (and does
    /// nothing) if a key is already pending.
    pub fn press(&mut self, k: Key) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(k.slot() as u8);
        true
    }

    /// Checks whether a key press is queued, without consuming it
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the queued key, if any
    #[inline]
    pub fn pending(&self) -> Option<Key> {
        self.pending.map(|i| Key::ALL[usize::from(i)])
    }

    /// Reads the slot for the queued key press and clears it
    ///
    /// Returns 0 if no key is queued.
    pub fn consume(&mut self) -> Word {
        match self.pending.take() {
            Some(i) => self.slots[usize::from(i)],
            None => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_table() {
        for (i, k) in Key::ALL.into_iter().enumerate() {
            assert_eq!(k.slot(), i);
            assert_eq!(Key::from_char(k.symbol()), Some(k));
        }
        assert_eq!(Key::from_char('w'), Some(Key::Up));
        assert_eq!(Key::from_char('4'), Some(Key::B));
        assert_eq!(Key::from_char('q'), None);
        assert_eq!(Key::from_char('W'), None);
    }

    #[test]
    fn one_shot() {
        let mut input = Input::new();
        assert_eq!(input.consume(), 0);

        assert!(input.press(Key::Up));
        assert!(input.has_pending());
        assert_eq!(input.consume(), 65532);
        assert!(!input.has_pending());
        assert_eq!(input.consume(), 0);
    }

    #[test]
    fn first_key_wins() {
        let mut input = Input::new();
        assert!(input.press(Key::Left));
        assert!(!input.press(Key::B));
        assert_eq!(input.pending(), Some(Key::Left));
        assert_eq!(input.consume(), 65535);
    }

    #[test]
    fn configure_slot() {
        let mut input = Input::new();
        input.set_addr(15);
        assert_eq!(input.addr(), 7);
        input.write(99);
        assert_eq!(input.slots()[7], 99);
        input.press(Key::B);
        assert_eq!(input.consume(), 99);
    }
}
