use std::collections::HashSet;

use crate::config::ConfigError;
use crate::grid::{Grid, Position};
use crate::orientation::{self, OrientationTag};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

const INITIAL_DIRECTION: Direction = Up;

/// Chain of segments, index 0 is the head. `tags` is render state only and
/// is refreshed on every move.
pub struct Snake {
    body: Vec<Position>,
    tags: Vec<OrientationTag>,
    direction: Direction,
    grid: Grid,
    initial_length: usize,
}

impl Snake {
    pub fn new(grid: Grid, initial_length: usize) -> Result<Self, ConfigError> {
        if initial_length < 2 {
            return Err(ConfigError::SnakeTooShort(initial_length));
        }
        let fits = i32::try_from(initial_length).map_or(false, |length| length <= grid.height() / 2 + 1);
        if !fits {
            return Err(ConfigError::SnakeDoesNotFit { length: initial_length, height: grid.height() });
        }

        let mut snake = Snake { body: vec![], tags: vec![], direction: INITIAL_DIRECTION, grid, initial_length };
        snake.reset();
        Ok(snake)
    }

    /// Head in the middle of the grid, the rest of the body straight below it.
    pub fn reset(&mut self) {
        let start = Position::new(self.grid.width() / 2, self.grid.height() / 2);

        self.direction = INITIAL_DIRECTION;
        self.body = (0..self.initial_length)
            .map(|i| Position::new(start.x, start.y - i as i32))
            .collect();
        self.refresh_tags();
    }

    pub fn change_direction(&mut self, requested: Direction) {
        if requested != self.direction.opposite() {
            self.direction = requested;
        }
    }

    pub fn move_step(&mut self) {
        // Back to front, so each segment takes its predecessor's old position
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }

        self.body[0] = self.grid.step(self.body[0], self.direction);
        self.refresh_tags();
    }

    /// Adds a segment right before the tail, on the tail's cell. The tail
    /// holds still for one move while the body extends through the new cell.
    pub fn grow(&mut self) {
        let len = self.body.len();
        let tail = self.body[len - 1];
        let prev = self.body[len - 2];

        let tag = if prev.y == tail.y {
            OrientationTag::BodyHorizontal
        } else {
            OrientationTag::BodyVertical
        };

        self.body.insert(len - 1, tail);
        self.tags.insert(len - 1, tag);
        tracing::debug!(length = self.body.len(), segment = tag.as_str(), "snake grew");
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn positions(&self) -> &[Position] {
        &self.body
    }

    pub fn occupied(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Position, OrientationTag)> + '_ {
        self.body.iter().copied().zip(self.tags.iter().copied())
    }

    fn refresh_tags(&mut self) {
        let len = self.body.len();
        let mut tags = Vec::with_capacity(len);

        tags.push(orientation::head_tag(self.direction));

        for i in 1..len - 1 {
            let (prev, current, next) = (self.body[i - 1], self.body[i], self.body[i + 1]);
            let tag = orientation::body_tag(prev, current, next, &self.grid).unwrap_or_else(|| {
                tracing::warn!(index = i, ?prev, ?current, ?next, "unclassifiable segment geometry");
                OrientationTag::BodyHorizontal
            });
            tags.push(tag);
        }

        tags.push(orientation::tail_tag(self.body[len - 2], self.body[len - 1], &self.grid));
        self.tags = tags;
    }

    #[cfg(test)]
    pub(crate) fn from_positions(grid: Grid, body: Vec<Position>, direction: Direction) -> Self {
        let mut snake = Snake { initial_length: body.len(), body, tags: vec![], direction, grid };
        snake.refresh_tags();
        snake
    }
}
