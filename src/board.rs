//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::PieceColor;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceColor),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// One cell of a removed row, handed to the presentation layer for particles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearEffect {
    pub color: PieceColor,
    pub x: usize,
    pub y: usize,
}

/// Outcome of a line-clear pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    pub count: usize,
    /// Row index of each removed row at the moment it was removed
    pub rows: Vec<usize>,
    pub effects: Vec<ClearEffect>,
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as [row][col], row 0 is the top
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at (x, y). Returns None if out of bounds
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Would `piece`, offset by (dx, dy), fit on the board?
    ///
    /// With `at_y` the piece's own row is replaced by `at_y` before `dy` is
    /// added. Cells above the top edge never collide, so pieces may hang
    /// partly above the grid.
    pub fn is_valid(&self, piece: &Piece, dx: i32, dy: i32, at_y: Option<i32>) -> bool {
        let base_y = at_y.unwrap_or(piece.y);
        piece.shape.cells().all(|(c, r)| {
            let x = piece.x + c as i32 + dx;
            let y = base_y + r as i32 + dy;
            if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                return false;
            }
            y < 0 || self.cells[y as usize][x as usize].is_empty()
        })
    }

    /// Write the piece's color into the grid. Cells above the top edge are dropped.
    ///
    /// The caller has already validated the placement.
    pub fn lock(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(cell) = self
                .cells
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *cell = Cell::Filled(piece.color);
            }
        }
    }

    /// Remove every full row, shifting everything above it down
    ///
    /// Scans bottom-up. After a removal the same index is checked again,
    /// since the row above has slid into it.
    pub fn clear_completed_lines(&mut self) -> LineClear {
        let mut result = LineClear::default();
        let mut y = self.height;

        while y > 0 {
            let row = y - 1;
            if !self.is_line_full(row) {
                y -= 1;
                continue;
            }

            for (x, cell) in self.cells[row].iter().enumerate() {
                if let Cell::Filled(color) = *cell {
                    result.effects.push(ClearEffect { color, x, y: row });
                }
            }

            self.cells.remove(row);
            self.cells.insert(0, vec![Cell::Empty; self.width]);
            result.count += 1;
            result.rows.push(row);
        }

        result
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(Cell::is_filled)
    }

    /// Check if the board is completely empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    #[cfg(test)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    #[cfg(test)]
    pub fn fill_row(&mut self, y: usize, color: PieceColor) {
        for cell in &mut self.cells[y] {
            *cell = Cell::Filled(color);
        }
    }
}
