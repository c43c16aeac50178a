use std::collections::{HashSet, VecDeque};

use super::types::Point;

/// Snake body, head first. `body_set` mirrors `body` for O(1) occupancy checks.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    pub fn new(start_pos: Point) -> Self {
        Self::from_segments([start_pos])
    }

    /// Builds a snake from segments listed head first.
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let body: VecDeque<Point> = segments.into_iter().collect();
        assert!(!body.is_empty(), "Snake body should never be empty");
        let body_set = body.iter().copied().collect();
        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    /// True when moving the head to `next_head` would hit the body. The tail
    /// only counts when the snake is about to grow, since otherwise it moves
    /// out of the way on the same tick.
    pub fn collides_with(&self, next_head: Point, growing: bool) -> bool {
        if !self.body_set.contains(&next_head) {
            return false;
        }
        growing || next_head != self.tail()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn push_head(&mut self, head: Point) {
        self.body.push_front(head);
        self.body_set.insert(head);
    }

    /// Drop the tail before pushing a head that may land on the same cell.
    pub fn pop_tail(&mut self) -> Point {
        let tail = self.body.pop_back().expect("Snake body should never be empty");
        self.body_set.remove(&tail);
        tail
    }
}
