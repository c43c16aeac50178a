mod food;
mod game_state;
mod grid;
mod input;
mod session;
mod settings;
mod snake;
mod types;

pub use food::FoodSpawner;
pub use game_state::{GameSnapshot, SnakeGameState, TickOutcome};
pub use grid::{GRID_SIZE, Grid};
pub use input::{InputAction, InputMapper, KeyInput};
pub use session::{GameOverSummary, SessionCommand, SnakeSession};
pub use settings::SnakeSettings;
pub use snake::Snake;
pub use types::{DeathReason, Direction, GameMode, Point};
