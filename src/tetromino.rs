//! Tetromino templates and the piece color palette
//!
//! Shapes are small boolean matrices stored row-major, row 0 on top.
//! Templates are never mutated; rotation always builds a new matrix.

/// The 7 tetromino templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// The spawn orientation of this tetromino
    pub fn template(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            ShapeKind::I => &[&[1, 1, 1, 1]],
            ShapeKind::O => &[&[1, 1], &[1, 1]],
            ShapeKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            ShapeKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            ShapeKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        Shape::from_rows(rows)
    }
}

/// Piece colors. Black and white are reserved for the background and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    Yellow,
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
}

impl PieceColor {
    pub const ALL: [PieceColor; 6] = [
        PieceColor::Yellow,
        PieceColor::Red,
        PieceColor::Green,
        PieceColor::Blue,
        PieceColor::Cyan,
        PieceColor::Magenta,
    ];
}

/// A boolean occupancy matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Occupied cells as (col, row) offsets from the top-left corner
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (c, r))
        })
    }

    /// Clockwise quarter turn: reverse the row order, then transpose
    pub fn rotated(&self) -> Shape {
        let height = self.height();
        let width = self.width();
        let rows = (0..width)
            .map(|c| (0..height).rev().map(|r| self.rows[r][c]).collect())
            .collect();
        Shape { rows }
    }
}
