//! Cartridge encoding
//!
//! Each instruction becomes a 5-bit opcode, a 16-bit operand and a 2-bit ALU
//! selector.  A cartridge has two sides of 32 lines each.
use crate::glyph;
use cpu::{
    ALU_SELECT_BITS, AluSel, DecodeError, Instruction, OPCODE_BITS, Opcode,
    Operand, Program, WORD_BITS,
};
use log::warn;
use zerocopy::{BigEndian, FromBytes, Immutable, IntoBytes, KnownLayout, U16, U32};

/// Number of lines on each side of a cartridge
pub const SIDE_LINES: usize = 32;

/// Magic bytes at the start of a binary cartridge image
pub const MAGIC: [u8; 4] = *b"SMNC";

/// Renders a single listing line
///
/// A blank ALU selector is painted as `..`, which is indistinguishable from
/// ALU 0 on the physical cartridge.
pub fn line(addr: usize, i: &Instruction) -> String {
    let alu = match i.alu {
        Some(a) => glyph::encode(u16::from(a.index()), ALU_SELECT_BITS),
        None => glyph::encode(0, ALU_SELECT_BITS),
    };
    format!(
        "{addr}: {}\t {}\t {alu}",
        glyph::encode(u16::from(i.opcode.id()), OPCODE_BITS),
        glyph::encode(i.operand.value(), WORD_BITS),
    )
}

/// Renders the program as a painting guide, split into its two sides
pub fn listing(program: &Program) -> String {
    let mut out = String::from("Top Side:\n");
    for (addr, i) in program.lines().iter().enumerate() {
        if addr == SIDE_LINES {
            out += "Bottom Side:\n";
        }
        out += &line(addr, i);
        out.push('\n');
    }
    out
}

mod word {
    pub const ALU_PRESENT: u32 = 1 << 23;
    pub const OPCODE_SHIFT: u32 = 18;
    pub const OPERAND_SHIFT: u32 = 2;
}

/// Packs an instruction into a cartridge word
pub fn pack(i: &Instruction) -> u32 {
    let alu = match i.alu {
        Some(a) => word::ALU_PRESENT | u32::from(a.index()),
        None => 0,
    };
    (u32::from(i.opcode.id()) << word::OPCODE_SHIFT)
        | (u32::from(i.operand.value()) << word::OPERAND_SHIFT)
        | alu
}

/// Unpacks a cartridge word
///
/// Operands always come back as [`Operand::Literal`]; unused high bits are
/// ignored.
pub fn unpack(w: u32) -> Instruction {
    let opcode = Opcode::from_id((w >> word::OPCODE_SHIFT) as u8);
    let operand = Operand::Literal((w >> word::OPERAND_SHIFT) as u16);
    let alu = ((w & word::ALU_PRESENT) != 0).then(|| AluSel::from_bits(w as u16));
    Instruction::new(opcode, operand, alu)
}

#[derive(IntoBytes, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
struct Header {
    magic: [u8; 4],
    len: U16<BigEndian>,
}

/// Error returned when reading a binary cartridge image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageError {
    /// The image does not start with [`MAGIC`]
    BadMagic,
    /// The image is shorter than its header says
    Truncated {
        /// Number of instruction words in the header
        expected: usize,
    },
    /// The instructions could not be built into a program
    Decode(DecodeError),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::BadMagic => write!(f, "not a cartridge image"),
            ImageError::Truncated { expected } => {
                write!(f, "cartridge image truncated (expected {expected} lines)")
            }
            ImageError::Decode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ImageError {}

/// Checks whether `data` starts with the cartridge image magic
pub fn is_image(data: &[u8]) -> bool {
    data.starts_with(&MAGIC)
}

/// Serializes a program into a binary cartridge image
pub fn to_bytes(program: &Program) -> Vec<u8> {
    let header = Header {
        magic: MAGIC,
        len: U16::new(program.len() as u16),
    };
    let words: Vec<U32<BigEndian>> =
        program.lines().iter().map(|i| U32::new(pack(i))).collect();
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(words.as_bytes());
    out
}

/// Reads a program back from a binary cartridge image
pub fn from_bytes(data: &[u8]) -> Result<Program, ImageError> {
    let Ok((header, rest)) = Header::read_from_prefix(data) else {
        return Err(if is_image(data) {
            ImageError::Truncated { expected: 0 }
        } else {
            ImageError::BadMagic
        });
    };
    if header.magic != MAGIC {
        return Err(ImageError::BadMagic);
    }
    let n = usize::from(header.len.get());
    let Ok((words, rest)) =
        <[U32<BigEndian>]>::ref_from_prefix_with_elems(rest, n)
    else {
        return Err(ImageError::Truncated { expected: n });
    };
    if !rest.is_empty() {
        warn!("ignoring {} trailing bytes in cartridge image", rest.len());
    }
    let lines = words.iter().map(|w| unpack(w.get())).collect();
    Program::new(lines).map_err(ImageError::Decode)
}
