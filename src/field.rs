//! Playing field: collision probes, attaching pieces and clearing rows

use crate::piece::Piece;

/// Field dimensions
pub const FIELD_WIDTH: usize = 10;
pub const FIELD_HEIGHT: usize = 20;

/// Sides on which a piece touches occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collision {
    /// Resting on the stack or on the last row
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Which edge of the field a piece crosses, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Leaving {
    #[default]
    None,
    Left,
    Right,
    Bottom,
}

/// The playing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Grid stored as [row][col], row 0 is the top, 0 = empty
    cells: [[u8; FIELD_WIDTH]; FIELD_HEIGHT],
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    /// Create a new empty field
    pub fn new() -> Self {
        Self {
            cells: [[0; FIELD_WIDTH]; FIELD_HEIGHT],
        }
    }

    /// Get the color code at (row, col), None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<u8> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Set a cell, returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, value: u8) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Whether a cell inside the field holds a block; outside is never occupied
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.get(row, col).is_some_and(|c| c != 0)
    }

    /// Rows top to bottom, for rendering
    pub fn rows(&self) -> &[[u8; FIELD_WIDTH]; FIELD_HEIGHT] {
        &self.cells
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c == 0)
    }

    /// Probe the cells below and beside every block of the piece
    pub fn collision(&self, piece: &Piece) -> Collision {
        let mut collision = Collision::default();
        for (row, col, _) in piece.blocks() {
            if self.is_occupied(row + 1, col) || row == FIELD_HEIGHT as i32 - 1 {
                collision.bottom = true;
            }
            if self.is_occupied(row, col - 1) {
                collision.left = true;
            }
            if self.is_occupied(row, col + 1) {
                collision.right = true;
            }
        }
        collision
    }

    /// Report a block outside the side or bottom edges. Only one edge is
    /// reported; the last offending block in row-major order decides.
    /// Blocks above the top edge are allowed.
    pub fn leaving_field(&self, piece: &Piece) -> Leaving {
        let mut leaving = Leaving::None;
        for (row, col, _) in piece.blocks() {
            if col < 0 {
                leaving = Leaving::Left;
            } else if col >= FIELD_WIDTH as i32 {
                leaving = Leaving::Right;
            } else if row >= FIELD_HEIGHT as i32 {
                leaving = Leaving::Bottom;
            }
        }
        leaving
    }

    /// Whether any block of the piece sits on an occupied cell
    pub fn overlaps(&self, piece: &Piece) -> bool {
        piece.blocks().any(|(row, col, _)| self.is_occupied(row, col))
    }

    /// Write the piece's blocks into the field
    pub fn attach(&mut self, piece: &Piece) {
        for (row, col, color) in piece.blocks() {
            self.set(row, col, color);
        }
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|&c| c != 0)
    }

    /// Drop every row above `row` by one and empty the top row
    fn remove_row(&mut self, row: usize) {
        for r in (1..=row).rev() {
            self.cells[r] = self.cells[r - 1];
        }
        self.cells[0] = [0; FIELD_WIDTH];
    }

    /// One bottom-to-top sweep removing full rows; returns rows removed.
    /// A row shifted into a just-cleared index is not rechecked in this sweep.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        for row in (0..FIELD_HEIGHT).rev() {
            if self.is_row_full(row) {
                self.remove_row(row);
                cleared += 1;
            }
        }
        cleared
    }

    /// Sweep until a pass removes nothing; returns total rows removed
    pub fn clear_all_full_rows(&mut self) -> u32 {
        let mut total = 0;
        loop {
            let cleared = self.clear_full_rows();
            if cleared == 0 {
                return total;
            }
            total += cleared;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    const BOTTOM: i32 = FIELD_HEIGHT as i32 - 1;

    fn fill_row(field: &mut Field, row: i32) {
        for col in 0..FIELD_WIDTH {
            field.set(row, col as i32, 5);
        }
    }

    fn occupied(field: &Field) -> usize {
        field.rows().iter().flatten().filter(|&&c| c != 0).count()
    }

    fn placed(kind: TetrominoType, x: i32, y: i32) -> Piece {
        let mut piece = Piece::new(kind);
        piece.x = x;
        piece.y = y;
        piece
    }

    #[test]
    fn test_new_field_is_empty() {
        assert!(Field::new().is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut field = Field::new();
        assert_eq!(field.get(-1, 0), None);
        assert_eq!(field.get(0, -1), None);
        assert_eq!(field.get(FIELD_HEIGHT as i32, 0), None);
        assert_eq!(field.get(0, FIELD_WIDTH as i32), None);
        assert!(!field.set(0, FIELD_WIDTH as i32, 1));
        assert!(!field.is_occupied(-1, 3));
    }

    #[test]
    fn test_leaving_field_inside() {
        let field = Field::new();
        for kind in TetrominoType::all() {
            assert_eq!(field.leaving_field(&placed(kind, 3, 5)), Leaving::None);
        }
    }

    #[test]
    fn test_leaving_field_edges() {
        let field = Field::new();
        // T spans bitmap columns 0-2 and rows 0-1
        assert_eq!(field.leaving_field(&placed(TetrominoType::T, -1, 0)), Leaving::Left);
        assert_eq!(field.leaving_field(&placed(TetrominoType::T, 8, 0)), Leaving::Right);
        assert_eq!(field.leaving_field(&placed(TetrominoType::T, 3, 19)), Leaving::Bottom);
        // Above the top edge is not leaving
        assert_eq!(field.leaving_field(&placed(TetrominoType::T, 3, -1)), Leaving::None);
    }

    #[test]
    fn test_leaving_field_last_block_wins() {
        let field = Field::new();
        // Off the left edge and off the bottom: the bottom row is visited last
        let piece = placed(TetrominoType::J, -1, 19);
        assert_eq!(field.leaving_field(&piece), Leaving::Bottom);
    }

    #[test]
    fn test_collision_on_last_row() {
        let field = Field::new();
        let piece = placed(TetrominoType::I, 3, BOTTOM - 1);
        let collision = field.collision(&piece);
        assert!(collision.bottom);
        assert!(!collision.left && !collision.right);
    }

    #[test]
    fn test_collision_sides() {
        let mut field = Field::new();
        // O occupies columns 4-5 of rows 10-11
        let piece = placed(TetrominoType::O, 3, 10);
        field.set(10, 3, 1);
        field.set(11, 6, 1);
        let collision = field.collision(&piece);
        assert!(collision.left);
        assert!(collision.right);
        assert!(!collision.bottom);

        field.set(12, 5, 1);
        assert!(field.collision(&piece).bottom);
    }

    #[test]
    fn test_overlay() {
        let mut field = Field::new();
        let piece = placed(TetrominoType::T, 3, 0);
        assert!(!field.overlaps(&piece));
        // Below the piece is not an overlap
        field.set(2, 4, 1);
        assert!(!field.overlaps(&piece));
        fill_row(&mut field, 1);
        assert!(field.overlaps(&piece));
    }

    #[test]
    fn test_attach_writes_colors() {
        let mut field = Field::new();
        let piece = placed(TetrominoType::S, 0, BOTTOM - 1);
        field.attach(&piece);
        assert_eq!(occupied(&field), 4);
        let cyan = TetrominoType::S.color_code();
        assert_eq!(field.get(BOTTOM - 1, 1), Some(cyan));
        assert_eq!(field.get(BOTTOM - 1, 2), Some(cyan));
        assert_eq!(field.get(BOTTOM, 0), Some(cyan));
        assert_eq!(field.get(BOTTOM, 1), Some(cyan));
    }

    #[test]
    fn test_clear_single_row() {
        let mut field = Field::new();
        fill_row(&mut field, BOTTOM);
        field.set(BOTTOM - 1, 0, 7);
        field.set(BOTTOM - 2, 3, 7);
        field.set(5, 9, 7);
        let above = occupied(&field) - FIELD_WIDTH;

        assert_eq!(field.clear_full_rows(), 1);
        assert_eq!(occupied(&field), above);
        assert_eq!(field.get(BOTTOM, 0), Some(7));
        assert_eq!(field.get(BOTTOM - 1, 3), Some(7));
        assert_eq!(field.get(6, 9), Some(7));
        assert_eq!(field.get(BOTTOM - 1, 0), Some(0));
        assert_eq!(field.get(5, 9), Some(0));
    }

    #[test]
    fn test_clear_stacked_rows_needs_repeat() {
        let mut field = Field::new();
        fill_row(&mut field, BOTTOM);
        fill_row(&mut field, BOTTOM - 1);
        field.set(BOTTOM - 2, 4, 3);

        // The second full row drops into the cleared index during the sweep
        assert_eq!(field.clear_full_rows(), 1);
        assert_eq!(field.clear_full_rows(), 1);
        assert_eq!(field.clear_full_rows(), 0);
        assert_eq!(field.get(BOTTOM, 4), Some(3));
        assert_eq!(occupied(&field), 1);
    }

    #[test]
    fn test_clear_all_full_rows() {
        let mut field = Field::new();
        for row in BOTTOM - 3..=BOTTOM {
            fill_row(&mut field, row);
        }
        field.set(BOTTOM - 4, 0, 2);
        assert_eq!(field.clear_all_full_rows(), 4);
        assert_eq!(field.get(BOTTOM, 0), Some(2));
        assert_eq!(occupied(&field), 1);
    }

    #[test]
    fn test_clear_top_row() {
        let mut field = Field::new();
        fill_row(&mut field, 0);
        assert_eq!(field.clear_all_full_rows(), 1);
        assert!(field.is_empty());
    }
}
