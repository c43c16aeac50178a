use crate::games::SessionRng;
use super::grid::Grid;
use super::snake::Snake;
use super::types::Point;

/// Picks food cells uniformly over the grid, retrying while the pick lands on
/// the snake.
#[derive(Clone, Copy, Debug)]
pub struct FoodSpawner {
    max_attempts: u32,
}

impl FoodSpawner {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// After `max_attempts` occupied picks the last one is returned anyway,
    /// so on a nearly full board food can land on the snake.
    pub fn spawn(&self, grid: &Grid, snake: &Snake, rng: &mut SessionRng) -> Point {
        let mut candidate = random_cell(grid, rng);
        for _ in 1..self.max_attempts {
            if !snake.contains(&candidate) {
                return candidate;
            }
            candidate = random_cell(grid, rng);
        }
        candidate
    }
}

fn random_cell(grid: &Grid, rng: &mut SessionRng) -> Point {
    Point::new(
        rng.random_range(0..grid.size()),
        rng.random_range(0..grid.size()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_avoids_snake() {
        let grid = Grid::default();
        let snake = Snake::from_segments((0..20).map(|x| Point::new(x, 10)));
        let spawner = FoodSpawner::new(100);
        let mut rng = SessionRng::new(1);

        for _ in 0..500 {
            let food = spawner.spawn(&grid, &snake, &mut rng);
            assert!(grid.contains(food));
            assert!(!snake.contains(&food));
        }
    }

    #[test]
    fn test_spawn_finds_the_only_free_cell_on_small_board() {
        let grid = Grid::new(2);
        let snake = Snake::from_segments([Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)]);
        let spawner = FoodSpawner::new(100);
        let mut rng = SessionRng::new(3);

        // 100 draws at 1/4 each: a miss has probability (3/4)^100.
        assert_eq!(spawner.spawn(&grid, &snake, &mut rng), Point::new(0, 1));
    }

    #[test]
    fn test_full_board_falls_back_to_occupied_cell() {
        let grid = Grid::new(2);
        let snake = Snake::from_segments([
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ]);
        let spawner = FoodSpawner::new(100);
        let mut rng = SessionRng::new(9);

        let food = spawner.spawn(&grid, &snake, &mut rng);
        assert!(grid.contains(food));
        assert!(snake.contains(&food));
    }

    #[test]
    fn test_single_attempt_returns_first_pick() {
        let grid = Grid::default();
        let snake = Snake::new(Point::new(10, 10));
        let mut rng_a = SessionRng::new(5);
        let mut rng_b = SessionRng::new(5);

        let food = FoodSpawner::new(1).spawn(&grid, &snake, &mut rng_a);
        let expected = Point::new(rng_b.random_range(0..20), rng_b.random_range(0..20));
        assert_eq!(food, expected);
    }
}
