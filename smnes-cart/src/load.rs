//! Program text loader
//!
//! Each line holds three whitespace-separated tokens, `opcode operand alu`:
//!
//! ```text
//! LVA 5 0
//! LVB #.# 0
//! ADD . 0
//! ```
use crate::glyph;
use cpu::{AluSel, DecodeError, Instruction, Opcode, Operand, Program, ROM_SIZE, Word};
use log::debug;

/// Problem with a single program line
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SyntaxError {
    /// The line does not have exactly three tokens
    WrongTokenCount(usize),
    /// The ALU token is not one of `. 0 1 2 3`
    InvalidAlu,
    /// The opcode is not a known mnemonic
    UnknownOpcode,
    /// The operand is neither a number, `.`, nor a glyph pattern
    InvalidOperand,
    /// The opcode needs an ALU, but the ALU token is `.`
    MissingAlu(Opcode),
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::WrongTokenCount(n) => write!(
                f,
                "each line must contain an opcode, operand and ALU selection \
                 (found {n} tokens); if a line doesn't need a value, use . or 0"
            ),
            SyntaxError::InvalidAlu => write!(f, "invalid ALU selection"),
            SyntaxError::UnknownOpcode => write!(f, "invalid instruction"),
            SyntaxError::InvalidOperand => write!(f, "invalid operand"),
            SyntaxError::MissingAlu(op) => {
                write!(f, "{op} needs an ALU selection (0-3)")
            }
        }
    }
}

/// Error returned by [`parse`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadError {
    /// The program has more lines than fit on a cartridge
    TooLong(usize),
    /// A line could not be parsed
    Syntax {
        /// Line number, starting at 1
        line: usize,
        /// Text of the offending line
        text: String,
        /// What went wrong
        err: SyntaxError,
    },
    /// The instructions could not be built into a program
    Decode(DecodeError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::TooLong(n) => write!(
                f,
                "program must be at most {ROM_SIZE} lines (got {n})"
            ),
            LoadError::Syntax { line, text, err } => {
                write!(f, "line {line}: {err}\n>> {text}")
            }
            LoadError::Decode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<DecodeError> for LoadError {
    fn from(e: DecodeError) -> Self {
        LoadError::Decode(e)
    }
}

/// Parses the ALU token
fn alu(s: &str) -> Result<Option<AluSel>, SyntaxError> {
    match s {
        "." => Ok(None),
        "0" | "1" | "2" | "3" => Ok(AluSel::new(s.as_bytes()[0] - b'0')),
        _ => Err(SyntaxError::InvalidAlu),
    }
}

/// Parses the operand token
///
/// `.` is a blank operand; other strings made of `#` and `.` are glyph
/// patterns; anything else must be a decimal integer.  Values are truncated
/// to 16 bits, however many digits they have.
pub fn operand(s: &str) -> Result<Operand, SyntaxError> {
    if s == "." {
        Ok(Operand::Blank)
    } else if let Some(v) = glyph::decode(s) {
        Ok(Operand::Pattern(v))
    } else {
        literal(s).map(Operand::Literal).ok_or(SyntaxError::InvalidOperand)
    }
}

/// Parses a signed decimal integer modulo 2^16
fn literal(s: &str) -> Option<Word> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() {
        return None;
    }
    let v = digits.chars().try_fold(0u32, |acc, c| {
        Some((acc * 10 + c.to_digit(10)?) % (1 << cpu::WORD_BITS))
    })?;
    let v = v as Word;
    Some(if neg { v.wrapping_neg() } else { v })
}

/// Parses a single program line
pub fn instruction(line: &str) -> Result<Instruction, SyntaxError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let &[op, v, a] = tokens.as_slice() else {
        return Err(SyntaxError::WrongTokenCount(tokens.len()));
    };
    let alu = alu(a)?;
    let opcode = Opcode::from_name(op).ok_or(SyntaxError::UnknownOpcode)?;
    let operand = operand(v)?;
    let i = Instruction::new(opcode, operand, alu);
    i.decode().map_err(SyntaxError::MissingAlu)?;
    Ok(i)
}

/// Parses a complete program
///
/// The line count is checked before any line is parsed; parsing stops at the
/// first bad line.
pub fn parse(text: &str) -> Result<Program, LoadError> {
    let n = text.lines().count();
    if n > ROM_SIZE {
        return Err(LoadError::TooLong(n));
    }
    let lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            instruction(line).map_err(|err| LoadError::Syntax {
                line: i + 1,
                text: line.to_owned(),
                err,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let program = Program::new(lines)?;
    debug!("loaded {} line program", program.len());
    Ok(program)
}
