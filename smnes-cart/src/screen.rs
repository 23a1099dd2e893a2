use crate::glyph;
use cpu::{Machine, Ram, SCREEN_CELLS, Word};

/// Screen width and height, in pixels
pub const SIZE: usize = 16;

/// Width and height of the tile stored in each screen cell
const TILE: usize = 4;

/// Monochrome 16×16 screen, decoded from the first 16 RAM cells
///
/// Each cell holds a 4×4 tile (row-major, MSB first); tiles are arranged in a
/// 4×4 grid, also row-major.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Screen {
    cells: [Word; SCREEN_CELLS],
}

impl Screen {
    /// Takes a snapshot of the screen region of RAM
    pub fn new(ram: &Ram) -> Self {
        let mut cells = [0; SCREEN_CELLS];
        cells.copy_from_slice(ram.screen());
        Self { cells }
    }

    /// Checks whether the pixel at `(x, y)` is lit
    ///
    /// # Panics
    /// If either coordinate is `>= 16`
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(x < SIZE && y < SIZE);
        let cell = self.cells[(y / TILE) * TILE + x / TILE];
        let bit = (y % TILE) * TILE + x % TILE;
        (cell >> (15 - bit)) & 1 == 1
    }

    /// Iterates over the rows of the screen, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = [bool; SIZE]> + '_ {
        (0..SIZE).map(move |y| std::array::from_fn(|x| self.pixel(x, y)))
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for p in row {
                let c = if p { glyph::ONE } else { glyph::ZERO };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders the output cell, screen, and program counter
pub fn frame(vm: &Machine) -> String {
    format!(
        "[ OUTPUT: {} ]\n{}[ PC: {} ]\n",
        vm.output(),
        Screen::new(vm.ram()),
        vm.pc()
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use cpu::Program;

    fn screen(cells: &[(usize, Word)]) -> Screen {
        let mut s = Screen {
            cells: [0; SCREEN_CELLS],
        };
        for &(i, v) in cells {
            s.cells[i] = v;
        }
        s
    }

    #[test]
    fn tile_layout() {
        // Top-left pixel of the top-left tile
        let s = screen(&[(0, 0x8000)]);
        assert!(s.pixel(0, 0));
        assert_eq!(s.rows().flatten().filter(|&p| p).count(), 1);

        // Bottom-right pixel of the top-left tile
        let s = screen(&[(0, 0x0001)]);
        assert!(s.pixel(3, 3));

        // Second row of a tile
        let s = screen(&[(0, 0x0800)]);
        assert!(s.pixel(0, 1));

        // Cell 1 is the tile to the right, cell 4 the tile below
        let s = screen(&[(1, 0x8000), (4, 0x8000)]);
        assert!(s.pixel(4, 0));
        assert!(s.pixel(0, 4));

        // Bottom-right corner of the screen
        let s = screen(&[(15, 0x0001)]);
        assert!(s.pixel(15, 15));
    }

    #[test]
    fn render() {
        let s = screen(&[(0, 0xF000)]);
        let text = s.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), SIZE);
        assert_eq!(rows[0], format!(" # # # #{}", " .".repeat(12)));
        assert_eq!(rows[1], " .".repeat(16));
    }

    #[test]
    fn frame_text() {
        let vm = Machine::new(Program::default());
        let text = frame(&vm);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), SIZE + 2);
        assert_eq!(lines[0], "[ OUTPUT: 0 ]");
        assert_eq!(lines[SIZE + 1], "[ PC: 0 ]");
    }
}
