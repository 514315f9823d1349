//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes as fixed 4x4 bitmaps. Row 0 is the top row of the
//! bitmap; a cell holds the piece's color code or 0 when empty.

/// Bitmap of a piece: `[row][col]` color codes, 0 = empty
pub type Cells = [[u8; 4]; 4];

/// Color codes stored in the field and in piece bitmaps
pub const RED: u8 = 1;
pub const GREEN: u8 = 2;
pub const BLUE: u8 = 4;
pub const CYAN: u8 = 6;
pub const ORANGE: u8 = 8;
pub const YELLOW: u8 = 9;
pub const VIOLET: u8 = 10;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Red - long bar
    O, // Yellow - square
    L, // Blue
    J, // Green
    S, // Cyan
    T, // Orange
    Z, // Violet
}

impl TetrominoType {
    /// Get the color code for this tetromino
    pub fn color_code(&self) -> u8 {
        match self {
            TetrominoType::I => RED,
            TetrominoType::O => YELLOW,
            TetrominoType::L => BLUE,
            TetrominoType::J => GREEN,
            TetrominoType::S => CYAN,
            TetrominoType::T => ORANGE,
            TetrominoType::Z => VIOLET,
        }
    }

    /// Get all tetromino types, in generator index order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::L,
            TetrominoType::J,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Bounding box (rows, cols) used when rotating the bitmap.
    /// O is reported as 2x2 but sits in columns 1-2; it never rotates.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            TetrominoType::I => (2, 4),
            TetrominoType::O => (2, 2),
            _ => (3, 3),
        }
    }

    /// Canonical spawn bitmap
    //   I: ....   O: .##.   L: ..#   J: #..   S: .##   T: .#.   Z: ##.
    //      ####      .##.      ###      ###      ##.      ###      .##
    pub fn cells(&self) -> Cells {
        let c = self.color_code();
        let mut cells = [[0; 4]; 4];
        let filled: &[(usize, usize)] = match self {
            TetrominoType::I => &[(1, 0), (1, 1), (1, 2), (1, 3)],
            TetrominoType::O => &[(0, 1), (0, 2), (1, 1), (1, 2)],
            TetrominoType::L => &[(0, 2), (1, 0), (1, 1), (1, 2)],
            TetrominoType::J => &[(0, 0), (1, 0), (1, 1), (1, 2)],
            TetrominoType::S => &[(0, 1), (0, 2), (1, 0), (1, 1)],
            TetrominoType::T => &[(0, 1), (1, 0), (1, 1), (1, 2)],
            TetrominoType::Z => &[(0, 0), (0, 1), (1, 1), (1, 2)],
        };
        for &(row, col) in filled {
            cells[row][col] = c;
        }
        cells
    }

    /// Row the anchor takes at spawn; the I bar starts one row above the field
    /// so that its filled row lands on row 0
    pub fn spawn_row(&self) -> i32 {
        match self {
            TetrominoType::I => -1,
            _ => 0,
        }
    }
}
