//! Active falling piece logic

use crate::field::{Field, Leaving};
use crate::tetromino::{Cells, TetrominoType};
use rand::Rng;

/// A tetromino placed on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// 4x4 bitmap of color codes
    pub cells: Cells,
    /// Field column of bitmap column 0
    pub x: i32,
    /// Field row of bitmap row 0 (row 0 is the top of the field)
    pub y: i32,
    /// Bounding box used for rotation
    pub rows: usize,
    pub cols: usize,
}

impl Piece {
    /// Create a piece in its canonical orientation, anchored at (0, 0)
    pub fn new(kind: TetrominoType) -> Self {
        let (rows, cols) = kind.dimensions();
        Self {
            kind,
            cells: kind.cells(),
            x: 0,
            y: 0,
            rows,
            cols,
        }
    }

    /// Pick one of the 7 shapes uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let all = TetrominoType::all();
        Self::new(all[rng.gen_range(0..all.len())])
    }

    /// Absolute (row, col, color) of every filled cell, top row first
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell != 0)
                .map(move |(j, &cell)| (self.y + i as i32, self.x + j as i32, cell))
        })
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, field: &Field) -> bool {
        if field.collision(self).left {
            return false;
        }
        self.x -= 1;
        if field.leaving_field(self) != Leaving::None {
            self.x += 1;
            return false;
        }
        true
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, field: &Field) -> bool {
        if field.collision(self).right {
            return false;
        }
        self.x += 1;
        if field.leaving_field(self) != Leaving::None {
            self.x -= 1;
            return false;
        }
        true
    }

    /// Try to move down one row, returns true if successful
    pub fn move_down(&mut self, field: &Field) -> bool {
        if field.leaving_field(self) != Leaving::None || field.collision(self).bottom {
            return false;
        }
        self.y += 1;
        true
    }

    /// Hard drop - move down until resting and return distance dropped
    pub fn hard_drop(&mut self, field: &Field) -> i32 {
        let mut distance = 0;
        while !field.collision(self).bottom {
            if !self.move_down(field) {
                break;
            }
            distance += 1;
        }
        distance
    }

    /// The piece turned 90 degrees clockwise in place, without any field checks
    pub fn turned(&self) -> Piece {
        let mut turned = *self;
        match self.kind {
            TetrominoType::O => {}
            TetrominoType::I => {
                // The bar lives in row 1 or column 1; swapping them toggles it.
                // While still above the field it keeps its orientation.
                if self.y >= 0 {
                    for i in 0..4 {
                        turned.cells[1][i] = self.cells[i][1];
                        turned.cells[i][1] = self.cells[1][i];
                    }
                    turned.rows = self.cols;
                    turned.cols = self.rows;
                }
            }
            _ => {
                let n = self.cols;
                for i in 0..self.rows {
                    for j in 0..self.cols {
                        turned.cells[i][j] = self.cells[n - 1 - j][i];
                    }
                }
            }
        }
        turned
    }

    /// Try to rotate, nudging away from the walls. The rotation is
    /// computed on a copy and only committed when the result is legal.
    pub fn rotate(&mut self, field: &Field) -> bool {
        let mut candidate = self.turned();
        let nudges = match self.kind {
            TetrominoType::I => 2,
            _ => 1,
        };

        for _ in 0..nudges {
            if field.leaving_field(&candidate) != Leaving::Left || field.collision(&candidate).right {
                break;
            }
            candidate.x += 1;
        }
        for _ in 0..nudges {
            if field.leaving_field(&candidate) != Leaving::Right || field.collision(&candidate).left {
                break;
            }
            candidate.x -= 1;
        }

        if field.overlaps(&candidate) || field.leaving_field(&candidate) != Leaving::None {
            return false;
        }
        *self = candidate;
        true
    }
}
