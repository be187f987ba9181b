//! Active falling piece

use crate::tetromino::{Grid, Palette, TetrominoType, kind_of};

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn inverse(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// An active falling piece
///
/// Owns its grid: rotating one piece never touches the catalog or any other
/// piece of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoType,
    pub grid: Grid,
    pub palette: Palette,
    /// Board column of the grid's left edge
    pub x: i32,
    /// Board row of the grid's top edge (row 0 is the top of the board)
    pub y: i32,
}

impl Piece {
    /// Create a new piece of `kind` with its grid's top-left at (spawn_x, 0)
    pub fn spawn(kind: TetrominoType, spawn_x: i32) -> Self {
        let shape = kind_of(kind);
        Self {
            kind,
            grid: shape.grid,
            palette: shape.palette,
            x: spawn_x,
            y: 0,
        }
    }

    /// Rotate the grid a quarter turn clockwise. Legality is the caller's job.
    pub fn rotate_clockwise(&mut self) {
        self.grid.rotate_cw();
    }

    /// Rotate the grid a quarter turn counter-clockwise
    pub fn rotate_counter_clockwise(&mut self) {
        self.grid.rotate_ccw();
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        match direction {
            RotationDirection::Clockwise => self.rotate_clockwise(),
            RotationDirection::CounterClockwise => self.rotate_counter_clockwise(),
        }
    }

    /// Absolute (x, y) board positions of the occupied cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.grid
            .occupied()
            .map(|(row, col)| (self.x + col as i32, self.y + row as i32))
    }
}
