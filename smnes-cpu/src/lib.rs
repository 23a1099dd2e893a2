//! Virtual CPU for 16-bit cartridge programs
//!
//! The machine has 32 words of RAM (the first 16 of which are also the
//! screen), a program store of up to 64 instructions, four ALUs and an
//! eight-slot input mapper.  It executes one instruction per [`Machine::step`].
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod bits;

mod alu;
mod input;
mod pc;
mod ram;
mod rom;

pub use alu::{ALU_COUNT, ALU_SELECT_BITS, Alu, AluSel};
pub use input::{INPUT_ADDR_BITS, INPUT_PRESETS, INPUT_SLOTS, Input, Key};
pub use pc::{ProgramCounter, ROM_SIZE};
pub use ram::{OUTPUT_CELL, RAM_ADDR_BITS, RAM_SIZE, Ram, SCREEN_CELLS};
pub use rom::{
    DecodeError, Instruction, NAMES, OPCODE_BITS, Op, Opcode, Operand, Program,
};

use rand::Rng;
use static_assertions::{const_assert, const_assert_eq};

/// Machine word
///
/// Values live in 16 bits; narrower slots are filled by [`bits::truncate`].
pub type Word = u16;

/// Width of a general-purpose value
pub const WORD_BITS: u32 = 16;

const_assert_eq!(WORD_BITS, Word::BITS);
const_assert_eq!(RAM_SIZE, 1 << RAM_ADDR_BITS);
const_assert_eq!(ALU_COUNT, 1 << ALU_SELECT_BITS);
const_assert_eq!(INPUT_SLOTS, 1 << INPUT_ADDR_BITS);
const_assert_eq!(NAMES.len(), 1 << OPCODE_BITS);
const_assert!(SCREEN_CELLS * WORD_BITS as usize == 16 * 16);
const_assert!(OUTPUT_CELL < RAM_SIZE);
const_assert!(ROM_SIZE <= Word::MAX as usize);

/// Reason for the machine to stop
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Halt {
    /// A `HLT` instruction was executed
    Finished,
    /// The program counter reached the end of the program
    OutOfRange,
}

/// The virtual machine itself
///
/// The machine owns every piece of state for one program run; nothing is
/// shared between runs.
#[derive(Clone, Debug)]
pub struct Machine {
    program: Program,
    pc: ProgramCounter,
    ram: Ram,
    alus: [Alu; ALU_COUNT],
    input: Input,
}

impl Machine {
    /// Builds a new machine, ready to execute `program` from address 0
    pub fn new(program: Program) -> Self {
        Self {
            program,
            pc: ProgramCounter::new(),
            ram: Ram::new(),
            alus: [Alu::new(); ALU_COUNT],
            input: Input::new(),
        }
    }

    /// Resets all state, keeping the loaded program
    pub fn reset(&mut self) {
        self.pc = ProgramCounter::new();
        self.ram = Ram::new();
        self.alus = [Alu::new(); ALU_COUNT];
        self.input = Input::new();
    }

    /// Shared borrow of the program store
    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the current program counter address
    #[inline]
    pub fn pc(&self) -> Word {
        self.pc.addr()
    }

    /// Shared borrow of the program counter
    #[inline]
    pub fn program_counter(&self) -> &ProgramCounter {
        &self.pc
    }

    /// Shared borrow of data memory
    #[inline]
    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    /// Returns the output cell (RAM address 16)
    #[inline]
    pub fn output(&self) -> Word {
        self.ram.cell(OUTPUT_CELL)
    }

    /// Shared borrow of the given ALU
    #[inline]
    pub fn alu(&self, i: AluSel) -> &Alu {
        &self.alus[usize::from(i.index())]
    }

    /// Shared borrow of the input mapper
    #[inline]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Returns the instruction which will execute on the next step
    #[inline]
    pub fn current(&self) -> Option<&Instruction> {
        self.program.get(self.pc.addr())
    }

    /// Sends a key press to the input mapper
    ///
    /// Returns `false` if a key was already pending, in which case the new
    /// press is dropped.
    #[inline]
    pub fn press(&mut self, k: Key) -> bool {
        self.input.press(k)
    }

    #[inline]
    fn alu_mut(&mut self, i: AluSel) -> &mut Alu {
        &mut self.alus[usize::from(i.index())]
    }

    /// Executes a single fetch / dispatch / advance cycle
    ///
    /// Returns `Some(..)` if the machine stopped, either before fetching (the
    /// program counter is past the end of the program) or after a `HLT`.  The
    /// program counter is not advanced past a `HLT`, so it keeps pointing at
    /// the halting instruction.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Halt> {
        let Some(op) = self.program.fetch(self.pc.addr()) else {
            return Some(Halt::OutOfRange);
        };
        if let Some(h) = self.op(op, rng) {
            return Some(h);
        }
        self.pc.advance();
        None
    }

    /// Runs until the machine halts
    ///
    /// Programs with an infinite loop will never return; use
    /// [`Machine::run_until`] to bound them.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Halt {
        loop {
            if let Some(h) = self.step(rng) {
                break h;
            }
        }
    }

    /// Runs until the machine halts or `f` returns `true`
    ///
    /// `f` is called before each step with the machine and the number of
    /// steps completed so far.  Returns `None` if `f` stopped the run.
    pub fn run_until<R, F>(&mut self, rng: &mut R, mut f: F) -> Option<Halt>
    where
        R: Rng + ?Sized,
        F: FnMut(&Machine, usize) -> bool,
    {
        for i in 0.. {
            if f(self, i) {
                return None;
            }
            if let Some(h) = self.step(rng) {
                return Some(h);
            }
        }
        unreachable!()
    }

    /// Executes a single operation
    ///
    /// Each operation touches exactly one of the program counter, a RAM cell
    /// (or its cursor), an ALU, or the input mapper.
    fn op<R: Rng + ?Sized>(&mut self, op: Op, rng: &mut R) -> Option<Halt> {
        match op {
            Op::Nop => (),

            Op::Bra(t) => self.pc.jump(t),
            Op::Brm(a, t) => {
                if self.alu(a).is_more() {
                    self.pc.jump(t)
                }
            }
            Op::Bre(a, t) => {
                if self.alu(a).is_equal() {
                    self.pc.jump(t)
                }
            }
            Op::Brl(a, t) => {
                if self.alu(a).is_less() {
                    self.pc.jump(t)
                }
            }
            Op::Bri(t) => {
                if self.input.has_pending() {
                    self.pc.jump(t)
                }
            }

            Op::Rav(v) => self.ram.set_addr(v),
            Op::Raa(a) => {
                let v = self.alu(a).acc();
                self.ram.set_addr(v);
            }

            Op::Stv(v) => self.ram.write(v),
            Op::Sta(a) => {
                let v = bits::truncate(i64::from(self.alu(a).acc()), WORD_BITS);
                self.ram.write(v);
            }

            Op::Lva(a, v) => self.alu_mut(a).set_a(v),
            Op::Lvb(a, v) => self.alu_mut(a).set_b(v),
            Op::Lra(a) => {
                let v = self.ram.read();
                self.alu_mut(a).set_a(v);
            }
            Op::Lrb(a) => {
                let v = self.ram.read();
                self.alu_mut(a).set_b(v);
            }
            Op::Laa(a) => {
                let u = self.alu_mut(a);
                u.set_a(u.acc());
            }
            Op::Lab(a) => {
                let u = self.alu_mut(a);
                u.set_b(u.acc());
            }

            Op::Add(a) => self.alu_mut(a).add(),
            Op::Sub(a) => self.alu_mut(a).sub(),
            Op::And(a) => self.alu_mut(a).and(),
            Op::Or(a) => self.alu_mut(a).or(),
            Op::Xor(a) => self.alu_mut(a).xor(),

            Op::Rnr(mask) => {
                let r = bits::random_word(rng, WORD_BITS);
                self.ram.write(bits::and(r, mask, WORD_BITS));
            }

            Op::Ria(v) => self.input.set_addr(v),
            Op::Riv(v) => self.input.write(v),
            Op::Sia(a) => {
                let v = self.input.consume();
                self.alu_mut(a).set_a(v);
            }
            Op::Sib(a) => {
                let v = self.input.consume();
                self.alu_mut(a).set_b(v);
            }
            Op::Sir => {
                let v = self.input.consume();
                self.ram.write(v);
            }

            Op::Csm => self.ram.clear_screen(),
            Op::Hlt => return Some(Halt::Finished),
        }
        None
    }
}
