use super::types::Point;

pub const GRID_SIZE: i32 = 20;

/// Square board of `size` x `size` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_SIZE)
    }
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn contains(&self, point: Point) -> bool {
        (0..self.size).contains(&point.x) && (0..self.size).contains(&point.y)
    }

    pub fn wrap(&self, point: Point) -> Point {
        Point::new(point.x.rem_euclid(self.size), point.y.rem_euclid(self.size))
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2, self.size / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_bounds() {
        let grid = Grid::default();
        assert!(grid.contains(Point::new(0, 0)));
        assert!(grid.contains(Point::new(19, 19)));
        assert!(!grid.contains(Point::new(20, 5)));
        assert!(!grid.contains(Point::new(5, -1)));
    }

    #[test]
    fn test_wrap_each_edge() {
        let grid = Grid::default();
        assert_eq!(grid.wrap(Point::new(20, 10)), Point::new(0, 10));
        assert_eq!(grid.wrap(Point::new(-1, 10)), Point::new(19, 10));
        assert_eq!(grid.wrap(Point::new(3, -1)), Point::new(3, 19));
        assert_eq!(grid.wrap(Point::new(3, 20)), Point::new(3, 0));
        assert_eq!(grid.wrap(Point::new(7, 8)), Point::new(7, 8));
    }

    #[test]
    fn test_center() {
        let grid = Grid::default();
        assert_eq!(grid.center(), Point::new(10, 10));
    }
}
