use std::{collections::HashSet, fmt, time::{Duration, Instant}};

use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::food;
use crate::geometry::Cell;
use crate::render::draw_commands;
use crate::snake::{Direction, Snake};
use crate::window::{DrawTarget, Key, Window};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Died,
    /// The body covers every cell, so no food can be placed.
    BoardFull,
    Closed,
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Ending::Died => "Game over!",
            Ending::BoardFull => "You won!",
            Ending::Closed => "Bye!",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub ending: Ending,
    pub score: u32,
    pub length: usize,
}

pub struct Game {
    config: GameConfig,
    snake: Snake,
    food: Cell,
    score: u32,
    since_tick: Duration,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;

        let grid = config.grid();
        let snake = Snake::new(config.initial_length, &grid)?;
        let food = food::place(&occupied(&snake), &grid, &mut rng)?;

        Ok(Game { config, snake, food, score: 0, since_tick: Duration::ZERO, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Simulates one frame that took `elapsed`. `input` is the latest
    /// direction pressed during the frame, if any.
    pub fn advance(&mut self, elapsed: Duration, input: Option<Direction>) -> Result<Option<Ending>> {
        if let Some(direction) = input {
            self.snake.set_direction(direction);
        }

        self.since_tick += elapsed;
        if self.since_tick <= self.config.tick_interval() {
            return Ok(None);
        }
        // Reset rather than subtract: a long stall costs ticks.
        self.since_tick = Duration::ZERO;

        self.snake.move_step();
        trace!(head = %self.snake.head(), direction = ?self.snake.direction(), "tick");

        if !self.snake.is_alive() {
            return Ok(Some(Ending::Died));
        }

        if self.snake.head() == self.food {
            self.snake.grow(self.config.growth);
            self.score += 1;

            match food::place(&occupied(&self.snake), &self.config.grid(), &mut self.rng) {
                Ok(cell) => {
                    self.food = cell;
                    debug!(score = self.score, food = %cell, "food eaten");
                }
                Err(GameError::ExhaustedGrid) => return Ok(Some(Ending::BoardFull)),
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    pub fn run<W: Window + DrawTarget>(&mut self, window: &mut W) -> Result<Outcome> {
        info!(
            width = self.config.grid_width,
            height = self.config.grid_height,
            length = self.snake.len(),
            "game started"
        );

        let mut last_frame = Instant::now();

        let ending = loop {
            if window.is_closed() {
                break Ending::Closed;
            }

            window.clear();
            for command in draw_commands(self) {
                window.draw(&command);
            }
            window.update()?;

            let input = Key::ALL.iter().find(|key| window.is_key_pressed(**key)).map(|key| key.direction());

            let now = Instant::now();
            let elapsed = now - last_frame;
            last_frame = now;

            if let Some(ending) = self.advance(elapsed, input)? {
                break ending;
            }
        };

        let outcome = self.outcome(ending);
        info!(ending = ?outcome.ending, score = outcome.score, length = outcome.length, "game ended");
        Ok(outcome)
    }

    pub fn outcome(&self, ending: Ending) -> Outcome {
        Outcome { ending, score: self.score(), length: self.snake.len() }
    }
}

fn occupied(snake: &Snake) -> HashSet<Cell> {
    snake.body().iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;
    use rand::SeedableRng;
    use std::{collections::VecDeque, thread::sleep};

    const TICK: Duration = Duration::from_millis(51);

    fn config(width: i32, height: i32, length: i32, growth: usize) -> GameConfig {
        GameConfig {
            grid_width: width,
            grid_height: height,
            initial_length: length,
            growth,
            ..GameConfig::default()
        }
    }

    fn game(cfg: GameConfig) -> Game {
        Game::new(cfg, StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn new_game_places_food_off_the_snake() {
        for seed in 0..50 {
            let g = Game::new(config(10, 10, 5, 2), StdRng::seed_from_u64(seed)).unwrap();
            assert!(!g.snake().body().contains(&g.food()));
            assert!(g.config().grid().contains(g.food()));
            assert_eq!(g.score(), 0);
        }
    }

    #[test]
    fn new_game_rejects_invalid_config() {
        let res = Game::new(config(10, 10, 0, 2), StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn new_game_rejects_growth_beyond_grid() {
        let res = Game::new(config(10, 10, 5, usize::MAX), StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn ticks_only_after_interval_is_exceeded() {
        let mut g = game(config(10, 10, 5, 2));
        g.food = Cell::new(0, 0);
        let head = g.snake().head();

        assert_eq!(g.advance(Duration::from_millis(30), None).unwrap(), None);
        assert_eq!(g.advance(Duration::from_millis(20), None).unwrap(), None);
        assert_eq!(g.snake().head(), head, "exactly 50ms must not tick");

        assert_eq!(g.advance(Duration::from_millis(1), None).unwrap(), None);
        assert_eq!(g.snake().head(), head.offset(-1, 0));
        assert_eq!(g.since_tick, Duration::ZERO);
    }

    #[test]
    fn long_stall_ticks_once() {
        let mut g = game(config(10, 10, 5, 2));
        g.food = Cell::new(0, 0);
        let head = g.snake().head();

        g.advance(Duration::from_millis(500), None).unwrap();

        assert_eq!(g.snake().head(), head.offset(-1, 0));
        assert_eq!(g.since_tick, Duration::ZERO);
    }

    #[test]
    fn moves_left_three_ticks() {
        let mut g = game(config(10, 10, 5, 2));
        g.food = Cell::new(0, 0);
        let start = g.snake().head();

        for _ in 0..3 {
            assert_eq!(g.advance(TICK, None).unwrap(), None);
        }

        assert!(g.snake().is_alive());
        assert_eq!(g.snake().head(), start.offset(-3, 0));
        assert_eq!(g.snake().len(), 5);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn immediate_reversal_dies() {
        let mut g = game(config(10, 10, 5, 2));
        g.food = Cell::new(0, 0);
        let second = g.snake().body()[1];

        assert_eq!(g.advance(TICK, Some(Direction::Right)).unwrap(), Some(Ending::Died));
        assert!(!g.snake().is_alive());
        assert_eq!(g.snake().head(), second);
    }

    #[test]
    fn input_between_ticks_applies_on_next_tick() {
        let mut g = game(config(10, 10, 5, 2));
        g.food = Cell::new(0, 0);
        let head = g.snake().head();

        g.advance(Duration::from_millis(10), Some(Direction::Up)).unwrap();
        assert_eq!(g.snake().head(), head);
        g.advance(TICK, None).unwrap();
        assert_eq!(g.snake().head(), head.offset(0, -1));
    }

    #[test]
    fn eating_grows_scores_and_moves_food() {
        let growth = 3;
        let mut g = game(config(10, 10, 5, growth));
        let target = g.snake().head().offset(-1, 0);
        g.food = target;

        assert_eq!(g.advance(TICK, None).unwrap(), None);

        assert_eq!(g.snake().head(), target);
        assert_eq!(g.score(), 1);
        assert_eq!(g.snake().len(), 5 + growth);
        assert!(!g.snake().body().contains(&g.food()));
        assert!(g.config().grid().contains(g.food()));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut g = game(config(2, 1, 1, 1));
        assert_eq!(g.food(), Cell::new(0, 0));

        assert_eq!(g.advance(TICK, None).unwrap(), None);
        assert_eq!(g.score(), 1);
        assert_eq!(g.food(), Cell::new(1, 0));

        assert_eq!(g.advance(TICK, Some(Direction::Right)).unwrap(), Some(Ending::BoardFull));
        assert_eq!(g.score(), 2);
        assert_eq!(g.outcome(Ending::BoardFull), Outcome { ending: Ending::BoardFull, score: 2, length: 3 });
    }

    /// Replays one optional key per frame, then reports closed.
    struct ScriptedWindow {
        script: VecDeque<Option<Key>>,
        pressed: Option<Key>,
        closed: bool,
        frame_time: Duration,
        pending: Vec<DrawCommand>,
        frames: Vec<Vec<DrawCommand>>,
    }

    impl ScriptedWindow {
        fn new(script: Vec<Option<Key>>, frame_time: Duration) -> Self {
            ScriptedWindow {
                script: script.into(),
                pressed: None,
                closed: false,
                frame_time,
                pending: vec![],
                frames: vec![],
            }
        }
    }

    impl Window for ScriptedWindow {
        fn is_closed(&self) -> bool {
            self.closed
        }

        fn is_key_pressed(&self, key: Key) -> bool {
            self.pressed == Some(key)
        }

        fn update(&mut self) -> Result<()> {
            self.frames.push(std::mem::take(&mut self.pending));
            if !self.frame_time.is_zero() {
                sleep(self.frame_time);
            }
            match self.script.pop_front() {
                Some(key) => self.pressed = key,
                None => {
                    self.pressed = None;
                    self.closed = true;
                }
            }
            Ok(())
        }
    }

    impl DrawTarget for ScriptedWindow {
        fn clear(&mut self) {
            self.pending.clear();
        }

        fn draw(&mut self, command: &DrawCommand) {
            self.pending.push(*command);
        }
    }

    #[test]
    fn run_stops_when_window_closes() {
        let mut g = game(config(10, 10, 5, 2));
        let mut window = ScriptedWindow::new(vec![None, Some(Key::Up), None], Duration::ZERO);

        let outcome = g.run(&mut window).unwrap();

        assert_eq!(outcome.ending, Ending::Closed);
        assert_eq!(outcome.score, 0);
        assert_eq!(window.frames.len(), 4);
        assert!(window.frames.iter().all(|f| f.len() == 6));
        assert_eq!(g.snake().direction(), Direction::Up);
    }

    #[test]
    fn run_stops_when_snake_dies() {
        let mut cfg = config(10, 10, 5, 2);
        cfg.tick_interval_ms = 1;
        let mut g = game(cfg);
        let mut window = ScriptedWindow::new(vec![None; 200], Duration::from_millis(2));

        let outcome = g.run(&mut window).unwrap();

        assert_eq!(outcome.ending, Ending::Died);
        assert!(!g.snake().is_alive());
        assert!(window.frames.len() < 200);
    }
}
