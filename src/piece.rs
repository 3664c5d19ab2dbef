//! Active falling piece
//!
//! A piece is a shape, a color and the grid position of the top-left corner
//! of its bounding matrix. It has no collision logic of its own: the session
//! asks the board first and only then applies the move.

use crate::random::Randomizer;
use crate::tetromino::{PieceColor, Shape, ShapeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    /// Current orientation
    pub shape: Shape,
    pub color: PieceColor,
    /// Column of the bounding box's left edge
    pub x: i32,
    /// Row of the bounding box's top edge, row 0 is the top of the board
    pub y: i32,
}

impl Piece {
    /// Build a piece in spawn position on a board `board_width` wide
    pub fn new(kind: ShapeKind, color: PieceColor, board_width: usize) -> Self {
        let shape = kind.template();
        let x = spawn_column(board_width, shape.width());
        Self {
            kind,
            shape,
            color,
            x,
            y: 0,
        }
    }

    /// Draw a random shape and color and place it at the spawn position
    pub fn spawn(rng: &mut dyn Randomizer, board_width: usize) -> Self {
        let kind = rng.next_shape();
        let color = rng.next_color();
        Self::new(kind, color, board_width)
    }

    /// Move back to the spawn position, keeping the current orientation
    pub fn recentered(mut self, board_width: usize) -> Self {
        self.x = spawn_column(board_width, self.shape.width());
        self.y = 0;
        self
    }

    /// The clockwise rotation of the current shape
    pub fn rotated_shape(&self) -> Shape {
        self.shape.rotated()
    }

    /// Copy of this piece moved by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Absolute (x, y) of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(|(c, r)| (self.x + c as i32, self.y + r as i32))
    }
}

fn spawn_column(board_width: usize, shape_width: usize) -> i32 {
    (board_width / 2) as i32 - (shape_width / 2) as i32
}
