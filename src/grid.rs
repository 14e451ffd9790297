use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// Playing field in cell units. Valid cells are `0..width` by `0..height`,
/// with y growing upwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        Grid { width: width as i32, height: height as i32 }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn max_x(&self) -> i32 {
        self.width - 1
    }

    pub fn max_y(&self) -> i32 {
        self.height - 1
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Each axis independently: past the max goes to 0, below 0 goes to the max.
    pub fn wrap(&self, pos: Position) -> Position {
        let x = if pos.x > self.max_x() {
            0
        } else if pos.x < 0 {
            self.max_x()
        } else {
            pos.x
        };

        let y = if pos.y > self.max_y() {
            0
        } else if pos.y < 0 {
            self.max_y()
        } else {
            pos.y
        };

        Position { x, y }
    }

    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        self.wrap(Position::new(pos.x + dx, pos.y + dy))
    }

    /// Delta from `from` to `to`, where a jump across a wrapped edge counts
    /// as a single step in the direction of travel. Neighbours split by the
    /// wrap are unwrapped on purpose so their tags match what is drawn.
    pub fn offset(&self, from: Position, to: Position) -> (i32, i32) {
        (
            Self::unwrap_axis(to.x - from.x, self.width),
            Self::unwrap_axis(to.y - from.y, self.height),
        )
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    fn unwrap_axis(delta: i32, extent: i32) -> i32 {
        if extent > 2 && delta == extent - 1 {
            -1
        } else if extent > 2 && delta == -(extent - 1) {
            1
        } else {
            delta
        }
    }
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, 1),
            Down => (0, -1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Side of a cell that a unit offset points to.
    pub fn from_delta(delta: (i32, i32)) -> Option<Direction> {
        match delta {
            (0, 1) => Some(Up),
            (0, -1) => Some(Down),
            (-1, 0) => Some(Left),
            (1, 0) => Some(Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_past_max_goes_to_zero() {
        let grid = Grid::new(10, 8);

        assert_eq!(grid.wrap(Position::new(10, 3)), Position::new(0, 3));
        assert_eq!(grid.wrap(Position::new(4, 8)), Position::new(4, 0));
    }

    #[test]
    fn test_wrap_below_zero_goes_to_max() {
        let grid = Grid::new(10, 8);

        assert_eq!(grid.wrap(Position::new(-1, 3)), Position::new(9, 3));
        assert_eq!(grid.wrap(Position::new(4, -1)), Position::new(4, 7));
    }

    #[test]
    fn test_step_moves_up_by_increasing_y() {
        let grid = Grid::new(10, 8);

        assert_eq!(grid.step(Position::new(2, 2), Up), Position::new(2, 3));
        assert_eq!(grid.step(Position::new(2, 7), Up), Position::new(2, 0));
        assert_eq!(grid.step(Position::new(0, 2), Left), Position::new(9, 2));
    }

    #[test]
    fn test_offset_across_wrapped_edge_is_single_step() {
        let grid = Grid::new(10, 8);

        assert_eq!(grid.offset(Position::new(9, 0), Position::new(0, 0)), (1, 0));
        assert_eq!(grid.offset(Position::new(0, 0), Position::new(9, 0)), (-1, 0));
        assert_eq!(grid.offset(Position::new(3, 7), Position::new(3, 0)), (0, 1));
        assert_eq!(grid.offset(Position::new(3, 3), Position::new(3, 5)), (0, 2));
    }

    #[test]
    fn test_cells_cover_whole_grid() {
        let grid = Grid::new(6, 5);
        let cells: Vec<Position> = grid.cells().collect();

        assert_eq!(cells.len(), grid.cell_count());
        assert!(cells.iter().all(|pos| grid.contains(*pos)));
    }
}
