//! Game board: locked cells, bounds, locking and line clears

use crate::piece::Piece;
use crate::tetromino::Palette;
use thiserror::Error;
use tracing::debug;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell committed to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedCell {
    /// Always equal to the slot column
    pub x: i32,
    /// Always equal to the slot row; follows the cell down as rows collapse
    pub y: i32,
    pub palette: Palette,
}

/// A lock found a slot that was already filled (or off the board)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lock conflict at ({x}, {y})")]
pub struct LockConflict {
    pub x: i32,
    pub y: i32,
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Stored as [row][col], row 0 is the top
    rows: Vec<Vec<Option<LockedCell>>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![None; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Whether a locked cell sits at (x, y). Out of bounds is never occupied.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Get the locked cell at (x, y), if any
    pub fn get(&self, x: i32, y: i32) -> Option<&LockedCell> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        self.rows[y as usize][x as usize].as_ref()
    }

    /// Commit every occupied cell of `piece` to the board.
    ///
    /// All target slots are checked before anything is written, so a
    /// conflict leaves the board exactly as it was.
    pub fn lock(&mut self, piece: &Piece) -> Result<(), LockConflict> {
        if let Some((x, y)) = piece
            .cells()
            .find(|&(x, y)| !self.is_in_bounds(x, y) || self.is_occupied(x, y))
        {
            return Err(LockConflict { x, y });
        }

        for (x, y) in piece.cells() {
            self.rows[y as usize][x as usize] = Some(LockedCell {
                x,
                y,
                palette: piece.palette,
            });
        }
        debug!(kind = ?piece.kind, x = piece.x, y = piece.y, "piece locked");
        Ok(())
    }

    /// Remove every locked cell
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.fill(None);
        }
    }

    /// Clear every full row and collapse the rows above it.
    /// Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = self.height;

        while row > 0 {
            let y = row - 1;
            if self.is_row_full(y) {
                self.collapse_onto(y);
                cleared += 1;
                // Row y now holds what was above it; look at it again
            } else {
                row -= 1;
            }
        }

        if cleared > 0 {
            debug!(cleared, "rows cleared");
        }
        cleared
    }

    /// Drop row `y` and shift everything above it down one row
    fn collapse_onto(&mut self, y: usize) {
        self.rows.remove(y);
        for (r, row) in self.rows.iter_mut().enumerate().take(y) {
            for cell in row.iter_mut().flatten() {
                cell.y = r as i32 + 1;
            }
        }
        self.rows.insert(0, vec![None; self.width]);
    }

    /// A zero-width row is never full
    fn is_row_full(&self, y: usize) -> bool {
        self.width > 0 && self.rows[y].iter().all(Option::is_some)
    }

    /// Check if the board has no locked cells
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(Option::is_none))
    }

    /// Iterate over all locked cells, top row first
    pub fn locked_cells(&self) -> impl Iterator<Item = &LockedCell> {
        self.rows.iter().flat_map(|row| row.iter().flatten())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    /// Put a locked cell straight into a slot
    pub(crate) fn fill(board: &mut Board, x: i32, y: i32) {
        board.rows[y as usize][x as usize] = Some(LockedCell {
            x,
            y,
            palette: TetrominoType::Z.palette(),
        });
    }

    pub(crate) fn fill_row_except(board: &mut Board, y: i32, gap: Option<i32>) {
        for x in 0..board.width() as i32 {
            if Some(x) != gap {
                fill(board, x, y);
            }
        }
    }

    fn assert_cells_match_slots(board: &Board) {
        for (y, row) in board.rows.iter().enumerate() {
            for (x, slot) in row.iter().enumerate() {
                if let Some(cell) = slot {
                    assert_eq!((cell.x, cell.y), (x as i32, y as i32));
                }
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!((board.width(), board.height()), (10, 20));
    }

    #[test]
    fn test_bounds() {
        let board = Board::default();
        assert!(board.is_in_bounds(0, 0));
        assert!(board.is_in_bounds(9, 19));
        assert!(!board.is_in_bounds(-1, 0));
        assert!(!board.is_in_bounds(0, -1));
        assert!(!board.is_in_bounds(10, 0));
        assert!(!board.is_in_bounds(0, 20));
        assert!(!board.is_occupied(-1, 5));
    }

    #[test]
    fn test_lock_places_cells() {
        let mut board = Board::default();
        let mut piece = Piece::spawn(TetrominoType::T, 3);
        piece.y = 18;
        board.lock(&piece).unwrap();

        let cells: Vec<_> = board.locked_cells().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, vec![(4, 18), (3, 19), (4, 19), (5, 19)]);
        assert_eq!(
            board.get(4, 18).map(|c| c.palette),
            Some(TetrominoType::T.palette())
        );
    }

    #[test]
    fn test_lock_conflict_leaves_board_untouched() {
        let mut board = Board::default();
        fill(&mut board, 5, 19);
        let before = board.clone();

        let mut piece = Piece::spawn(TetrominoType::T, 3);
        piece.y = 18;
        assert_eq!(board.lock(&piece), Err(LockConflict { x: 5, y: 19 }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_lock_out_of_bounds_is_conflict() {
        let mut board = Board::default();
        let mut piece = Piece::spawn(TetrominoType::O, 9);
        piece.y = 0;
        assert_eq!(board.lock(&piece), Err(LockConflict { x: 10, y: 0 }));
        assert!(board.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut board = Board::default();
        fill_row_except(&mut board, 19, None);
        board.reset();
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_empty_board() {
        let mut board = Board::default();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_clear_single_line_shifts_cells_above() {
        let mut board = Board::default();
        fill(&mut board, 2, 18);
        fill_row_except(&mut board, 18, Some(0)); // not full, sits below
        fill_row_except(&mut board, 19, Some(7));
        fill_row_except(&mut board, 17, None); // the full row
        fill(&mut board, 0, 15);
        fill(&mut board, 9, 16);

        assert_eq!(board.clear_full_rows(), 1);
        // Above the cleared row: moved down one
        assert!(board.is_occupied(0, 16));
        assert!(board.is_occupied(9, 17));
        assert!(!board.is_occupied(0, 15));
        // Below: untouched
        assert!(!board.is_occupied(0, 18));
        assert!(board.is_occupied(1, 18));
        assert!(!board.is_occupied(7, 19));
        assert_eq!(board.locked_cells().count(), 2 + 9 + 9);
        assert_cells_match_slots(&board);
    }

    #[test]
    fn test_clear_adjacent_rows() {
        let mut board = Board::default();
        fill_row_except(&mut board, 19, None);
        fill_row_except(&mut board, 18, None);
        fill(&mut board, 4, 17);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.locked_cells().count(), 1);
        assert!(board.is_occupied(4, 19));
        assert_eq!(board.get(4, 19).map(|c| c.y), Some(19));
    }

    #[test]
    fn test_clear_separated_rows() {
        let mut board = Board::default();
        fill_row_except(&mut board, 19, None);
        fill_row_except(&mut board, 18, Some(2));
        fill_row_except(&mut board, 17, None);
        fill(&mut board, 6, 16);

        assert_eq!(board.clear_full_rows(), 2);
        // The partial row ends up at the bottom, the lone cell above it
        assert!(!board.is_occupied(2, 19));
        assert!(board.is_occupied(3, 19));
        assert!(board.is_occupied(6, 18));
        assert_eq!(board.locked_cells().count(), 10);
        assert_cells_match_slots(&board);
    }

    #[test]
    fn test_clear_top_row() {
        let mut board = Board::default();
        fill_row_except(&mut board, 0, None);
        assert_eq!(board.clear_full_rows(), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_four_rows() {
        let mut board = Board::default();
        for y in 16..20 {
            fill_row_except(&mut board, y, None);
        }
        assert_eq!(board.clear_full_rows(), 4);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_zero_width_board() {
        let mut board = Board::new(0, 3);
        assert_eq!(board.clear_full_rows(), 0);
        assert!(board.is_empty());
    }
}
