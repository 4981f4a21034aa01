use log::{debug, info, trace};
use rand::Rng;
use rand::rngs::ThreadRng;

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, Position, RunState, Snake},
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if the game ended this tick
    pub collision_type: Option<CollisionType>,
}

impl TickResult {
    pub fn is_game_over(&self) -> bool {
        self.collision_type.is_some()
    }
}

/// The game engine that handles all game logic
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create a game engine drawing food positions from rng
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// State shown before the first game is started
    pub fn idle(&mut self) -> GameState {
        let mut state = self.fresh_state();
        state.run_state = RunState::NotStarted;
        state
    }

    /// Begin a new game, discarding everything from the previous one
    pub fn start(&mut self) -> GameState {
        let state = self.fresh_state();
        info!(
            "game started on a {0}x{0} grid, food at ({1}, {2})",
            state.grid_count, state.food.x, state.food.y
        );
        state
    }

    fn fresh_state(&mut self) -> GameState {
        let snake = Snake::new(
            self.config.initial_head,
            Direction::Right,
            self.config.initial_snake_length,
        );
        let food = self.place_food(&snake);

        GameState::new(snake, food, self.config.grid_count)
    }

    /// Queue a turn for the next tick.
    ///
    /// Only turns perpendicular to the direction committed by the last tick
    /// are accepted; a later accepted turn replaces an earlier one.
    pub fn set_direction(&self, state: &mut GameState, requested: Direction) -> bool {
        if !state.is_running() || !state.snake.direction.is_perpendicular(requested) {
            return false;
        }

        state.pending_direction = Some(requested);
        true
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if !state.is_running() {
            return TickResult::default();
        }

        if let Some(direction) = state.pending_direction.take() {
            state.snake.direction = direction;
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // Checked against the pre-move body, so the cell the tail is about to
        // leave still counts as occupied.
        if let Some(collision_type) = self.check_collision(state, new_head) {
            self.game_over(state, collision_type);
            return TickResult {
                ate_food: false,
                collision_type: Some(collision_type),
            };
        }

        let ate_food = new_head == state.food;
        state.snake.move_snake(ate_food);
        state.ticks += 1;

        if ate_food {
            state.score += self.config.food_score;
            state.food = self.place_food(&state.snake);
            debug!(
                "food eaten, score {} length {}, next food at ({}, {})",
                state.score,
                state.snake.len(),
                state.food.x,
                state.food.y
            );
        } else {
            trace!("tick {}: head at ({}, {})", state.ticks, new_head.x, new_head.y);
        }

        TickResult {
            ate_food,
            collision_type: None,
        }
    }

    /// Move the game into its terminal phase
    pub fn game_over(&self, state: &mut GameState, collision_type: CollisionType) {
        state.run_state = RunState::GameOver;
        state.collision = Some(collision_type);
        state.pending_direction = None;
        info!(
            "game over after {} ticks: snake {}, final score {}",
            state.ticks,
            collision_type.describe(),
            state.score
        );
    }

    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a random cell not covered by the snake
    pub fn place_food(&mut self, snake: &Snake) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_count) as i32;
            let y = self.rng.gen_range(0..self.config.grid_count) as i32;
            let pos = Position::new(x, y);

            if !snake.contains(pos) {
                return pos;
            }
        }
    }
}
