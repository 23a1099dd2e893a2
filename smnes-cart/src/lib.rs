//! Cartridge tooling and screen for the smnes CPU
//!
//! This crate sits around [`cpu`]: it turns program text into a
//! [`cpu::Program`], paints programs onto cartridges (as a glyph listing or
//! a binary image) and draws the machine's screen.
#![warn(missing_docs)]

pub mod cartridge;
pub mod glyph;
pub mod load;

mod screen;

pub use cartridge::{ImageError, listing, to_bytes};
pub use load::{LoadError, SyntaxError, parse};
pub use screen::{SIZE as SCREEN_SIZE, Screen, frame};

/// Error returned by [`load`]
#[derive(Debug)]
pub enum Error {
    /// The data is a binary image, but could not be read
    Image(ImageError),
    /// The data is program text, but could not be parsed
    Text(LoadError),
    /// The data is neither an image nor valid UTF-8
    Encoding(std::str::Utf8Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Image(e) => write!(f, "{e}"),
            Error::Text(e) => write!(f, "{e}"),
            Error::Encoding(e) => write!(f, "program is not valid text: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Image(e) => Some(e),
            Error::Text(e) => Some(e),
            Error::Encoding(e) => Some(e),
        }
    }
}

/// Loads a program from a file's contents
///
/// Binary cartridge images are recognized by their magic bytes; anything
/// else is parsed as program text.
pub fn load(data: &[u8]) -> Result<cpu::Program, Error> {
    if cartridge::is_image(data) {
        log::debug!("loading binary cartridge image");
        cartridge::from_bytes(data).map_err(Error::Image)
    } else {
        let text = std::str::from_utf8(data).map_err(Error::Encoding)?;
        parse(text).map_err(Error::Text)
    }
}
