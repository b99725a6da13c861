use crate::error::Result;
use crate::render::DrawCommand;
use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Left,
    Down,
    Right,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Up, Key::Left, Key::Down, Key::Right];

    pub fn direction(self) -> Direction {
        match self {
            Key::Up => Direction::Up,
            Key::Left => Direction::Left,
            Key::Down => Direction::Down,
            Key::Right => Direction::Right,
        }
    }
}

pub trait Window {
    fn is_closed(&self) -> bool;

    fn is_key_pressed(&self, key: Key) -> bool;

    /// Presents the frame and pumps input. Blocks until the next frame boundary.
    fn update(&mut self) -> Result<()>;
}

pub trait DrawTarget {
    fn clear(&mut self);

    fn draw(&mut self, command: &DrawCommand);
}
