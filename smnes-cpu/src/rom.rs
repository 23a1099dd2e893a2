//! Program store
//!
//! Instructions arrive as loose `(opcode, operand, ALU)` records; they are
//! checked and resolved into [`Op`] once, when the [`Program`] is built, so
//! that dispatch never has to deal with a missing ALU selector.
use crate::{ROM_SIZE, Word, alu::AluSel};
use alloc::vec::Vec;

/// Width of the opcode field
pub const OPCODE_BITS: u32 = 5;

/// Opcode mnemonics, indexed by opcode ID
///
/// Unused IDs are spelled `.`, and execute as no-ops.
pub const NAMES: [&str; 32] = [
    ".", "BRA", "BRM", "BRE", "BRL", "RAV", "RAA", "STV", //
    "STA", "LVA", "LVB", "LRA", "LRB", "LAA", "LAB", ".", //
    "ADD", "SUB", "AND", "OR.", "XOR", "RNR", ".", ".", //
    "RIA", "RIV", "SIA", "SIB", "SIR", "BRI", "CSM", "HLT", //
];

/// Opcode, with its discriminant equal to the cartridge opcode ID
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0,
    Bra = 1,
    Brm = 2,
    Bre = 3,
    Brl = 4,
    Rav = 5,
    Raa = 6,
    Stv = 7,
    Sta = 8,
    Lva = 9,
    Lvb = 10,
    Lra = 11,
    Lrb = 12,
    Laa = 13,
    Lab = 14,
    Add = 16,
    Sub = 17,
    And = 18,
    Or = 19,
    Xor = 20,
    Rnr = 21,
    Ria = 24,
    Riv = 25,
    Sia = 26,
    Sib = 27,
    Sir = 28,
    Bri = 29,
    Csm = 30,
    Hlt = 31,
}

impl Opcode {
    /// Decodes a 5-bit opcode ID
    ///
    /// Higher bits are ignored; reserved IDs decode as [`Opcode::Nop`].
    pub fn from_id(id: u8) -> Self {
        match id & 0x1F {
            1 => Opcode::Bra,
            2 => Opcode::Brm,
            3 => Opcode::Bre,
            4 => Opcode::Brl,
            5 => Opcode::Rav,
            6 => Opcode::Raa,
            7 => Opcode::Stv,
            8 => Opcode::Sta,
            9 => Opcode::Lva,
            10 => Opcode::Lvb,
            11 => Opcode::Lra,
            12 => Opcode::Lrb,
            13 => Opcode::Laa,
            14 => Opcode::Lab,
            16 => Opcode::Add,
            17 => Opcode::Sub,
            18 => Opcode::And,
            19 => Opcode::Or,
            20 => Opcode::Xor,
            21 => Opcode::Rnr,
            24 => Opcode::Ria,
            25 => Opcode::Riv,
            26 => Opcode::Sia,
            27 => Opcode::Sib,
            28 => Opcode::Sir,
            29 => Opcode::Bri,
            30 => Opcode::Csm,
            31 => Opcode::Hlt,
            _ => Opcode::Nop,
        }
    }

    /// Looks up an opcode by its exact (case-sensitive) mnemonic
    pub fn from_name(s: &str) -> Option<Self> {
        NAMES
            .iter()
            .position(|&n| n == s)
            .map(|i| Self::from_id(i as u8))
    }

    /// Returns the cartridge opcode ID
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns the canonical mnemonic
    #[inline]
    pub fn name(self) -> &'static str {
        NAMES[usize::from(self.id())]
    }

    /// Checks whether this opcode reads its ALU selector
    pub fn uses_alu(self) -> bool {
        matches!(
            self,
            Opcode::Brm
                | Opcode::Bre
                | Opcode::Brl
                | Opcode::Raa
                | Opcode::Sta
                | Opcode::Lva
                | Opcode::Lvb
                | Opcode::Lra
                | Opcode::Lrb
                | Opcode::Laa
                | Opcode::Lab
                | Opcode::Add
                | Opcode::Sub
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Sia
                | Opcode::Sib
        )
    }
}

impl core::fmt::Display for Opcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Operand field of an instruction
///
/// The text form of a program may give an operand as a number or as an
/// already-encoded glyph pattern; both are resolved to a 16-bit value when
/// the program is loaded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    /// No operand (`.`), which reads as 0
    Blank,
    /// Numeric literal, already truncated to 16 bits
    Literal(Word),
    /// Glyph pattern (`#` / `.`), already converted to its value
    Pattern(Word),
}

impl Operand {
    /// Returns the numeric value of the operand
    #[inline]
    pub fn value(self) -> Word {
        match self {
            Operand::Blank => 0,
            Operand::Literal(v) | Operand::Pattern(v) => v,
        }
    }
}

/// A single instruction record, as stored on a cartridge
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// Operation to perform
    pub opcode: Opcode,
    /// Operand field
    pub operand: Operand,
    /// ALU selector field, or `None` for `.`
    pub alu: Option<AluSel>,
}

impl Instruction {
    /// Builds a new instruction record
    pub fn new(opcode: Opcode, operand: Operand, alu: Option<AluSel>) -> Self {
        Self {
            opcode,
            operand,
            alu,
        }
    }

    /// Resolves this record into an executable operation
    ///
    /// Returns the opcode if it needs an ALU selector and none is present.
    pub fn decode(&self) -> Result<Op, Opcode> {
        let v = self.operand.value();
        let alu = || self.alu.ok_or(self.opcode);
        let op = match self.opcode {
            Opcode::Nop => Op::Nop,
            Opcode::Bra => Op::Bra(v),
            Opcode::Brm => Op::Brm(alu()?, v),
            Opcode::Bre => Op::Bre(alu()?, v),
            Opcode::Brl => Op::Brl(alu()?, v),
            Opcode::Rav => Op::Rav(v),
            Opcode::Raa => Op::Raa(alu()?),
            Opcode::Stv => Op::Stv(v),
            Opcode::Sta => Op::Sta(alu()?),
            Opcode::Lva => Op::Lva(alu()?, v),
            Opcode::Lvb => Op::Lvb(alu()?, v),
            Opcode::Lra => Op::Lra(alu()?),
            Opcode::Lrb => Op::Lrb(alu()?),
            Opcode::Laa => Op::Laa(alu()?),
            Opcode::Lab => Op::Lab(alu()?),
            Opcode::Add => Op::Add(alu()?),
            Opcode::Sub => Op::Sub(alu()?),
            Opcode::And => Op::And(alu()?),
            Opcode::Or => Op::Or(alu()?),
            Opcode::Xor => Op::Xor(alu()?),
            Opcode::Rnr => Op::Rnr(v),
            Opcode::Ria => Op::Ria(v),
            Opcode::Riv => Op::Riv(v),
            Opcode::Sia => Op::Sia(alu()?),
            Opcode::Sib => Op::Sib(alu()?),
            Opcode::Sir => Op::Sir,
            Opcode::Bri => Op::Bri(v),
            Opcode::Csm => Op::Csm,
            Opcode::Hlt => Op::Hlt,
        };
        Ok(op)
    }
}

impl core::fmt::Display for Instruction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ", self.opcode)?;
        match self.operand {
            Operand::Blank => f.write_str(".")?,
            o => write!(f, "{}", o.value())?,
        }
        match self.alu {
            Some(a) => write!(f, " {}", a.index()),
            None => f.write_str(" ."),
        }
    }
}

/// Executable operation, with its operand and ALU already resolved
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op {
    /// No operation
    Nop,

    /// Branch (unconditional) to an absolute address
    Bra(Word),
    /// Branch if the selected ALU has `A > B`
    Brm(AluSel, Word),
    /// Branch if the selected ALU has `A == B`
    Bre(AluSel, Word),
    /// Branch if the selected ALU has `A < B`
    Brl(AluSel, Word),
    /// Branch if a key press is queued
    Bri(Word),

    /// Set the RAM cursor to a value (5-bit)
    Rav(Word),
    /// Set the RAM cursor to an ALU accumulator (5-bit)
    Raa(AluSel),

    /// Store a value at the RAM cursor
    Stv(Word),
    /// Store an ALU accumulator at the RAM cursor
    Sta(AluSel),

    /// Load a value into register A
    Lva(AluSel, Word),
    /// Load a value into register B
    Lvb(AluSel, Word),
    /// Load the RAM cell at the cursor into register A
    Lra(AluSel),
    /// Load the RAM cell at the cursor into register B
    Lrb(AluSel),
    /// Load the ALU's own accumulator into register A
    Laa(AluSel),
    /// Load the ALU's own accumulator into register B
    Lab(AluSel),

    /// `acc = A + B`
    Add(AluSel),
    /// `acc = A - B`
    Sub(AluSel),
    /// `acc = A & B`
    And(AluSel),
    /// `acc = A | B`
    Or(AluSel),
    /// `acc = A ^ B`
    Xor(AluSel),

    /// Store a random word, masked by the operand, at the RAM cursor
    Rnr(Word),

    /// Set the input cursor (3-bit)
    Ria(Word),
    /// Write a value to the input slot under the cursor
    Riv(Word),
    /// Read the queued key's slot into register A
    Sia(AluSel),
    /// Read the queued key's slot into register B
    Sib(AluSel),
    /// Read the queued key's slot into the RAM cell at the cursor
    Sir,

    /// Clear the screen region of RAM
    Csm,
    /// Halt
    Hlt,
}

/// Error returned when building a [`Program`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// The program has more than [`ROM_SIZE`] instructions
    TooLong(usize),
    /// The instruction at `addr` needs an ALU selector but has none
    MissingAlu {
        /// Address of the offending instruction
        addr: usize,
        /// Its opcode
        opcode: Opcode,
    },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::TooLong(n) => write!(
                f,
                "program must be at most {ROM_SIZE} lines (got {n})"
            ),
            DecodeError::MissingAlu { addr, opcode } => write!(
                f,
                "instruction {addr} ({opcode}) needs an ALU selection"
            ),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Program store: an immutable list of up to 64 instructions
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    lines: Vec<Instruction>,
    ops: Vec<Op>,
}

impl Program {
    /// Checks and decodes a list of instructions
    pub fn new(lines: Vec<Instruction>) -> Result<Self, DecodeError> {
        if lines.len() > ROM_SIZE {
            return Err(DecodeError::TooLong(lines.len()));
        }
        let ops = lines
            .iter()
            .enumerate()
            .map(|(addr, i)| {
                i.decode()
                    .map_err(|opcode| DecodeError::MissingAlu { addr, opcode })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines, ops })
    }

    /// Returns the number of instructions
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks whether the program is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fetches the decoded operation at `addr`
    #[inline]
    pub fn fetch(&self, addr: Word) -> Option<Op> {
        self.ops.get(usize::from(addr)).copied()
    }

    /// Returns the instruction record at `addr`
    #[inline]
    pub fn get(&self, addr: Word) -> Option<&Instruction> {
        self.lines.get(usize::from(addr))
    }

    /// Returns every instruction record, in address order
    #[inline]
    pub fn lines(&self) -> &[Instruction] {
        &self.lines
    }
}
