//! Tetromino catalog
//!
//! The seven piece kinds, each with a square occupancy grid and a three-tone
//! shading palette. Shapes are plain values: every piece gets its own copy.

use rand::Rng;
use ratatui::style::Color;

/// Side length of the largest shape grid (the I piece)
pub const MAX_GRID: usize = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

impl TetrominoType {
    /// All kinds in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    pub fn symbol(&self) -> char {
        match self {
            TetrominoType::I => 'I',
            TetrominoType::J => 'J',
            TetrominoType::L => 'L',
            TetrominoType::O => 'O',
            TetrominoType::S => 'S',
            TetrominoType::T => 'T',
            TetrominoType::Z => 'Z',
        }
    }

    /// Base occupancy grid in spawn orientation
    pub fn grid(&self) -> Grid {
        match self {
            TetrominoType::I => Grid::from_rows(&[
                &[0, 0, 0, 0],
                &[1, 1, 1, 1],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ]),
            TetrominoType::J => Grid::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
            TetrominoType::L => Grid::from_rows(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
            TetrominoType::O => Grid::from_rows(&[&[1, 1], &[1, 1]]),
            TetrominoType::S => Grid::from_rows(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
            TetrominoType::T => Grid::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
            TetrominoType::Z => Grid::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
        }
    }

    /// Shading palette for this kind
    pub fn palette(&self) -> Palette {
        match self {
            TetrominoType::I => Palette::hex(0x00FFFF, 0x00CCCC, 0x009999),
            TetrominoType::J => Palette::hex(0x0000FF, 0x0000CC, 0x000099),
            TetrominoType::L => Palette::hex(0xFF8800, 0xCC6600, 0x994400),
            TetrominoType::O => Palette::hex(0xFFFF00, 0xCCCC00, 0x999900),
            TetrominoType::S => Palette::hex(0x00FF00, 0x00CC00, 0x009900),
            TetrominoType::T => Palette::hex(0xCC00FF, 0x9900CC, 0x770099),
            TetrominoType::Z => Palette::hex(0xFF0000, 0xCC0000, 0x990000),
        }
    }
}

/// Look up the immutable shape for a kind
pub fn kind_of(kind: TetrominoType) -> Shape {
    Shape {
        kind,
        grid: kind.grid(),
        palette: kind.palette(),
    }
}

/// Pick one kind uniformly
pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> TetrominoType {
    let all = TetrominoType::all();
    all[rng.gen_range(0..all.len())]
}

/// A catalog entry: kind, base grid, palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub kind: TetrominoType,
    pub grid: Grid,
    pub palette: Palette,
}

/// Three shading tones: top edge, face, bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub top: Color,
    pub mid: Color,
    pub bottom: Color,
}

impl Palette {
    /// Neutral shade used for the board frame
    pub const FRAME: Palette = Palette {
        top: Color::Rgb(0x99, 0x99, 0x99),
        mid: Color::Rgb(0x77, 0x77, 0x77),
        bottom: Color::Rgb(0x33, 0x33, 0x33),
    };

    fn hex(top: u32, mid: u32, bottom: u32) -> Self {
        Self {
            top: rgb(top),
            mid: rgb(mid),
            bottom: rgb(bottom),
        }
    }
}

fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Square occupancy grid, stored in a fixed 4x4 buffer
///
/// Only the top-left `size x size` region is meaningful. Rotation keeps the
/// grid square, so a piece's bounding box never changes shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: [[bool; MAX_GRID]; MAX_GRID],
}

impl Grid {
    /// Build a grid from square rows of 0/1
    fn from_rows(rows: &[&[u8]]) -> Self {
        debug_assert!(rows.len() <= MAX_GRID);
        debug_assert!(rows.iter().all(|r| r.len() == rows.len()));
        let mut cells = [[false; MAX_GRID]; MAX_GRID];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Self {
            size: rows.len(),
            cells,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether (row, col) is occupied; anything outside the grid is empty
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Occupied cells as (row, col), row-major
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |r| {
            (0..self.size).filter_map(move |c| self.cells[r][c].then_some((r, c)))
        })
    }

    /// Rotate a quarter turn clockwise: new (r, c) = old (N-1-c, r)
    pub fn rotate_cw(&mut self) {
        let n = self.size;
        let old = self.cells;
        for r in 0..n {
            for c in 0..n {
                self.cells[r][c] = old[n - 1 - c][r];
            }
        }
    }

    /// Exact inverse of `rotate_cw`: new (r, c) = old (c, N-1-r)
    pub fn rotate_ccw(&mut self) {
        let n = self.size;
        let old = self.cells;
        for r in 0..n {
            for c in 0..n {
                self.cells[r][c] = old[c][n - 1 - r];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in TetrominoType::all() {
            assert_eq!(kind_of(kind).grid.occupied().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_grid_sizes() {
        assert_eq!(kind_of(TetrominoType::I).grid.size(), 4);
        assert_eq!(kind_of(TetrominoType::O).grid.size(), 2);
        for kind in [
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ] {
            assert_eq!(kind_of(kind).grid.size(), 3);
        }
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in TetrominoType::all() {
            let original = kind.grid();
            let mut grid = original;
            for _ in 0..4 {
                grid.rotate_cw();
            }
            assert_eq!(grid, original, "{:?}", kind);
        }
    }

    #[test]
    fn test_ccw_undoes_cw() {
        for kind in TetrominoType::all() {
            let original = kind.grid();
            let mut grid = original;
            grid.rotate_cw();
            grid.rotate_ccw();
            assert_eq!(grid, original, "{:?}", kind);
        }
    }

    #[test]
    fn test_clockwise_direction() {
        // I bar in row 1 becomes a column at index 2
        let mut grid = TetrominoType::I.grid();
        grid.rotate_cw();
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(cells, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);

        // T pointing up now points right
        let mut grid = TetrominoType::T.grid();
        grid.rotate_cw();
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(cells, vec![(0, 1), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_occupied_is_row_major() {
        let cells: Vec<_> = TetrominoType::J.grid().occupied().collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_palette_values() {
        let p = TetrominoType::L.palette();
        assert_eq!(p.top, Color::Rgb(0xFF, 0x88, 0x00));
        assert_eq!(p.mid, Color::Rgb(0xCC, 0x66, 0x00));
        assert_eq!(p.bottom, Color::Rgb(0x99, 0x44, 0x00));
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts: HashMap<TetrominoType, u32> = HashMap::new();
        for _ in 0..7000 {
            *counts.entry(random_kind(&mut rng)).or_default() += 1;
        }
        assert_eq!(counts.len(), 7);
        // Roughly uniform: each kind near 1000
        for (kind, n) in counts {
            assert!((700..1300).contains(&n), "{:?} drawn {} times", kind, n);
        }
    }

    #[test]
    fn test_symbols_are_distinct() {
        let symbols: std::collections::HashSet<char> =
            TetrominoType::all().iter().map(TetrominoType::symbol).collect();
        assert_eq!(symbols.len(), TetrominoType::all().len());
        assert_eq!(TetrominoType::T.symbol(), 'T');
    }
}
