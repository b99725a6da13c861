use crate::error::{GameError, Result};
use crate::geometry::{Cell, Grid};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Left => (-1, 0),
            Down => (0, 1),
            Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    alive: bool,
    grid: Grid,
}

impl Snake {
    /// A horizontal snake heading Left with its head on the grid midpoint,
    /// shifted left as needed so the tail stays inside the grid.
    pub fn new(initial_length: i32, grid: &Grid) -> Result<Self> {
        if initial_length <= 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "initial length must be at least 1, got {}",
                initial_length
            )));
        }
        if initial_length > grid.width || grid.height <= 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "a snake of length {} does not fit a {}x{} grid",
                initial_length, grid.width, grid.height
            )));
        }

        let mid = grid.midpoint();
        let head = Cell::new(mid.col.min(grid.width - initial_length), mid.row);
        let body = (0..initial_length).map(|i| head.offset(i, 0)).collect();

        Ok(Snake { body, direction: Left, alive: true, grid: *grid })
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Leaving the grid or landing on the body kills the snake; the body
    /// keeps the crash position.
    pub fn move_step(&mut self) {
        if !self.alive {
            return;
        }

        let (dcol, drow) = self.direction.delta();
        let new_head = self.head().offset(dcol, drow);

        self.body.rotate_right(1);
        self.body[0] = new_head;

        if !self.grid.contains(new_head) || self.body[1..].contains(&new_head) {
            self.alive = false;
        }
    }

    pub fn grow(&mut self, n: usize) {
        if !self.alive || n == 0 {
            return;
        }

        let tail = self.tail();
        self.body.extend(std::iter::repeat(tail).take(n));
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}
