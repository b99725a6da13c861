use crate::game::Game;
use crate::geometry::Rect;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    Grey,
    Red,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub rect: Rect,
    pub fill: Color,
    pub outline: Option<Color>,
}

pub const SNAKE_FILL: Color = Color::Grey;
pub const SNAKE_OUTLINE: Color = Color::Black;
pub const FOOD_FILL: Color = Color::Red;

/// One outlined rectangle per body segment, then the food.
pub fn draw_commands(game: &Game) -> Vec<DrawCommand> {
    let grid = game.config().grid();
    let body = game.snake().body();

    let mut commands = Vec::with_capacity(body.len() + 1);
    commands.extend(body.iter().map(|cell| DrawCommand {
        rect: grid.rect(*cell),
        fill: SNAKE_FILL,
        outline: Some(SNAKE_OUTLINE),
    }));
    commands.push(DrawCommand { rect: grid.rect(game.food()), fill: FOOD_FILL, outline: None });

    commands
}
