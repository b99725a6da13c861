use std::fmt;

/// A grid cell addressed by `(col, row)`. Rows grow downward.
///
/// Signed so that a dead snake can keep the out-of-bounds head it crashed with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    pub fn offset(self, dcol: i32, drow: i32) -> Self {
        Cell { col: self.col + dcol, row: self.row + drow }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Axis-aligned rectangle on the drawing surface, in surface units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Logical grid dimensions plus the size of one cell on the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Grid {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.row >= 0 && cell.col < self.width && cell.row < self.height
    }

    pub fn rect(&self, cell: Cell) -> Rect {
        Rect {
            x: cell.col * self.cell_width,
            y: cell.row * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    pub fn midpoint(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Surface size covered by the whole grid, `None` on overflow.
    pub fn surface_size(&self) -> Option<(i32, i32)> {
        Some((self.width.checked_mul(self.cell_width)?, self.height.checked_mul(self.cell_height)?))
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize).saturating_mul(self.height.max(0) as usize)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(col, row)))
    }
}
