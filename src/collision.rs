//! Movement and rotation against the board
//!
//! Every attempt mutates the piece first and rolls back when the new
//! placement collides, so a rejected move leaves the piece exactly as it was.

use crate::board::Board;
use crate::piece::{Piece, RotationDirection};

/// Why a placement is illegal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// A cell is below the last row
    Bottom,
    /// A cell is above row 0
    Top,
    /// A cell is left of column 0
    Left,
    /// A cell is right of the last column
    Right,
    /// A cell overlaps a locked cell
    Cell,
}

/// Outcome of a move or rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved,
    Collided(Collision),
}

impl MoveResult {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveResult::Moved)
    }

    pub fn collision(&self) -> Option<Collision> {
        match self {
            MoveResult::Moved => None,
            MoveResult::Collided(reason) => Some(*reason),
        }
    }
}

/// Test the piece where it stands. The first offending cell (row-major)
/// decides the reason; within a cell the order is bottom, top, right, left,
/// then overlap.
pub fn check(piece: &Piece, board: &Board) -> Option<Collision> {
    let width = board.width() as i32;
    let height = board.height() as i32;

    piece.cells().find_map(|(x, y)| {
        if y >= height {
            Some(Collision::Bottom)
        } else if y < 0 {
            Some(Collision::Top)
        } else if x >= width {
            Some(Collision::Right)
        } else if x < 0 {
            Some(Collision::Left)
        } else if board.is_occupied(x, y) {
            Some(Collision::Cell)
        } else {
            None
        }
    })
}

/// Shift the piece by (dx, dy) if the destination is free
pub fn attempt_move(piece: &mut Piece, board: &Board, dx: i32, dy: i32) -> MoveResult {
    piece.x += dx;
    piece.y += dy;

    match check(piece, board) {
        None => MoveResult::Moved,
        Some(reason) => {
            piece.x -= dx;
            piece.y -= dy;
            MoveResult::Collided(reason)
        }
    }
}

/// Rotate in place if the new orientation is free; otherwise undo it
pub fn attempt_rotate(piece: &mut Piece, board: &Board, direction: RotationDirection) -> MoveResult {
    piece.rotate(direction);

    match check(piece, board) {
        None => MoveResult::Moved,
        Some(reason) => {
            piece.rotate(direction.inverse());
            MoveResult::Collided(reason)
        }
    }
}

/// Move down until blocked. Returns the number of rows descended.
pub fn drop_to_floor(piece: &mut Piece, board: &Board) -> i32 {
    let mut distance = 0;
    while attempt_move(piece, board, 0, 1).is_moved() {
        distance += 1;
    }
    distance
}

/// How many more rows the piece can fall before it would collide.
///
/// Each occupied cell scans its column downward to the first locked cell,
/// with the floor counting as a blocker one row below the board. The
/// smallest gap wins.
pub fn landing_offset(piece: &Piece, board: &Board) -> i32 {
    let height = board.height() as i32;

    piece
        .cells()
        .map(|(x, y)| {
            let blocker = (y.max(0)..height)
                .find(|&row| board.is_occupied(x, row))
                .unwrap_or(height);
            blocker - y - 1
        })
        .min()
        .unwrap_or(0)
        .max(0)
}
