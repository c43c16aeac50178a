use std::time::Duration;

use crate::games::SessionRng;
use super::food::FoodSpawner;
use super::grid::Grid;
use super::settings::SnakeSettings;
use super::snake::Snake;
use super::types::{DeathReason, Direction, GameMode, Point};

/// What a single call to [`SnakeGameState::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or already over; nothing changed.
    Idle,
    Moved,
    Ate { score: u32, speed_changed: bool },
    GameOver(DeathReason),
}

/// Read-only copy of the state handed to renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub grid_size: i32,
    pub snake: Vec<Point>,
    pub food: Point,
    pub direction: Direction,
    pub mode: GameMode,
    pub score: u32,
    pub tick_interval: Duration,
    pub tick: u64,
    pub is_playing: bool,
    pub is_game_over: bool,
    pub death_reason: Option<DeathReason>,
}

#[derive(Clone, Debug)]
pub struct SnakeGameState {
    grid: Grid,
    settings: SnakeSettings,
    spawner: FoodSpawner,
    snake: Snake,
    food: Point,
    direction: Direction,
    pending_direction: Direction,
    mode: GameMode,
    score: u32,
    tick_interval: Duration,
    tick: u64,
    is_playing: bool,
    is_game_over: bool,
    death_reason: Option<DeathReason>,
}

impl SnakeGameState {
    /// A running game: one-cell snake in the middle of the board heading
    /// right, food somewhere else.
    pub fn new(settings: SnakeSettings, mode: GameMode, rng: &mut SessionRng) -> Self {
        let grid = Grid::new(settings.grid_size);
        let snake = Snake::new(grid.center());
        let spawner = FoodSpawner::new(settings.food_spawn_attempts);
        let food = spawner.spawn(&grid, &snake, rng);
        Self::from_parts(settings, mode, snake, Direction::Right, food)
    }

    pub fn from_parts(
        settings: SnakeSettings,
        mode: GameMode,
        snake: Snake,
        direction: Direction,
        food: Point,
    ) -> Self {
        Self {
            grid: Grid::new(settings.grid_size),
            spawner: FoodSpawner::new(settings.food_spawn_attempts),
            tick_interval: settings.initial_tick_interval(),
            settings,
            snake,
            food,
            direction,
            pending_direction: direction,
            mode,
            score: 0,
            tick: 0,
            is_playing: true,
            is_game_over: false,
            death_reason: None,
        }
    }

    /// Starts over with the current mode and settings.
    pub fn restart(&mut self, rng: &mut SessionRng) {
        *self = Self::new(self.settings.clone(), self.mode, rng);
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    /// Last writer wins; reversals are filtered when the tick adopts it.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.pending_direction = direction;
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_game_over {
            self.is_playing = !self.is_playing;
        }
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn step(&mut self, rng: &mut SessionRng) -> TickOutcome {
        if !self.is_playing || self.is_game_over {
            return TickOutcome::Idle;
        }

        if !self.pending_direction.is_opposite(&self.direction) {
            self.direction = self.pending_direction;
        }
        self.pending_direction = self.direction;

        let raw_head = self.snake.head().shifted(self.direction);
        let next_head = match self.mode {
            GameMode::WrapAround => self.grid.wrap(raw_head),
            GameMode::Walls if self.grid.contains(raw_head) => raw_head,
            GameMode::Walls => return self.finish(DeathReason::WallCollision),
        };

        let eats = next_head == self.food;
        if self.snake.collides_with(next_head, eats) {
            return self.finish(DeathReason::SelfCollision);
        }

        self.tick += 1;

        if !eats {
            self.snake.pop_tail();
            self.snake.push_head(next_head);
            return TickOutcome::Moved;
        }

        self.snake.push_head(next_head);
        self.score += self.settings.food_reward;
        self.food = self.spawner.spawn(&self.grid, &self.snake, rng);

        let mut speed_changed = false;
        if self.score % self.settings.speed_up_every == 0 {
            let next_interval = self.settings.next_tick_interval(self.tick_interval);
            speed_changed = next_interval != self.tick_interval;
            self.tick_interval = next_interval;
        }

        TickOutcome::Ate {
            score: self.score,
            speed_changed,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid_size: self.grid.size(),
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.direction,
            mode: self.mode,
            score: self.score,
            tick_interval: self.tick_interval,
            tick: self.tick,
            is_playing: self.is_playing,
            is_game_over: self.is_game_over,
            death_reason: self.death_reason,
        }
    }

    fn finish(&mut self, reason: DeathReason) -> TickOutcome {
        self.is_game_over = true;
        self.is_playing = false;
        self.death_reason = Some(reason);
        TickOutcome::GameOver(reason)
    }

    #[cfg(test)]
    fn set_food(&mut self, food: Point) {
        self.food = food;
    }

    #[cfg(test)]
    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }
}
