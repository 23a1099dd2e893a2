use crate::Word;

/// Number of instruction slots on a cartridge
pub const ROM_SIZE: usize = 64;

/// Program counter with a pending-jump latch
///
/// Branch instructions stage their target with [`ProgramCounter::jump`]; it
/// only takes effect on the following [`ProgramCounter::advance`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgramCounter {
    addr: Word,
    pending: Option<Word>,
}

impl ProgramCounter {
    /// Builds a program counter at address 0 with no pending jump
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current fetch address
    #[inline]
    pub fn addr(&self) -> Word {
        self.addr
    }

    /// Returns the staged jump target, if any
    #[inline]
    pub fn pending(&self) -> Option<Word> {
        self.pending
    }

    /// Stages a jump to `target`
    ///
    /// The target is not wrapped; a target past the end of the program stops
    /// the machine at the next fetch.
    #[inline]
    pub fn jump(&mut self, target: Word) {
        self.pending = Some(target);
    }

    /// Moves to the staged target, or to the next slot (wrapping at 64)
    #[inline]
    pub fn advance(&mut self) {
        self.addr = match self.pending.take() {
            Some(t) => t,
            None => self.addr.wrapping_add(1) % ROM_SIZE as Word,
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn advance() {
        let mut pc = ProgramCounter::new();
        pc.advance();
        assert_eq!(pc.addr(), 1);

        pc.jump(40);
        assert_eq!(pc.addr(), 1);
        assert_eq!(pc.pending(), Some(40));
        pc.advance();
        assert_eq!(pc.addr(), 40);
        assert_eq!(pc.pending(), None);
        pc.advance();
        assert_eq!(pc.addr(), 41);
    }

    #[test]
    fn wrap() {
        let mut pc = ProgramCounter::new();
        pc.jump(63);
        pc.advance();
        pc.advance();
        assert_eq!(pc.addr(), 0);
    }

    #[test]
    fn last_jump_wins() {
        let mut pc = ProgramCounter::new();
        pc.jump(3);
        pc.jump(7);
        pc.advance();
        assert_eq!(pc.addr(), 7);
    }
}
