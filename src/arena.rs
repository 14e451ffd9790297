use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{Grid, Position};

/// Random samples tried per grid cell before falling back to a full scan.
const SAMPLES_PER_CELL: usize = 4;

/// Owns the food and answers collision queries against the snake.
pub struct Arena {
    grid: Grid,
    food: Option<Position>,
}

impl Arena {
    pub fn new<R: Rng>(grid: Grid, occupied: &HashSet<Position>, rng: &mut R) -> Self {
        let mut arena = Arena { grid, food: None };
        arena.spawn_food(occupied, rng);
        arena
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Places the food on a cell not in `occupied`. Returns `None`, and
    /// clears the food, when every cell is taken.
    pub fn spawn_food<R: Rng>(&mut self, occupied: &HashSet<Position>, rng: &mut R) -> Option<Position> {
        let food = match self.sample_free(occupied, rng) {
            Some(pos) => Some(pos),
            None => self.scan_free(occupied, rng),
        };
        self.food = food;

        match self.food {
            Some(pos) => tracing::debug!(x = pos.x, y = pos.y, "food spawned"),
            None => tracing::info!("no free cell left for food"),
        }

        self.food
    }

    pub fn head_on_food(&self, head: Position) -> bool {
        self.food.map_or(false, |food| Self::check_collision_with_food(head, food))
    }

    /// Both occupy exactly one cell, so overlap is equality.
    pub fn check_collision_with_food(head: Position, food: Position) -> bool {
        head == food
    }

    /// `segments[0]` is the head.
    pub fn check_collision_with_self(segments: &[Position]) -> bool {
        match segments.split_first() {
            Some((head, body)) => body.iter().any(|pos| pos == head),
            None => false,
        }
    }

    fn sample_free<R: Rng>(&self, occupied: &HashSet<Position>, rng: &mut R) -> Option<Position> {
        if occupied.len() >= self.grid.cell_count() {
            return None;
        }

        (0..self.grid.cell_count() * SAMPLES_PER_CELL)
            .map(|_| Position::new(rng.gen_range(0..self.grid.width()), rng.gen_range(0..self.grid.height())))
            .find(|pos| !occupied.contains(pos))
    }

    fn scan_free<R: Rng>(&self, occupied: &HashSet<Position>, rng: &mut R) -> Option<Position> {
        let choices: Vec<Position> = self.grid.cells().filter(|pos| !occupied.contains(pos)).collect();

        if !choices.is_empty() {
            tracing::warn!(free = choices.len(), "random food placement gave up, picking from a full scan");
        }

        choices.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let grid = Grid::new(8, 8);
        let occupied: HashSet<Position> = (0..8).map(|y| p(3, y)).chain((0..8).map(|x| p(x, 5))).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut arena = Arena::new(grid, &occupied, &mut rng);

        for _ in 0..500 {
            let food = arena.spawn_food(&occupied, &mut rng).unwrap();
            assert!(grid.contains(food));
            assert!(!occupied.contains(&food));
        }
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let grid = Grid::new(5, 5);
        let mut occupied: HashSet<Position> = grid.cells().collect();
        occupied.remove(&p(4, 2));
        let mut rng = StdRng::seed_from_u64(1);

        let arena = Arena::new(grid, &occupied, &mut rng);

        assert_eq!(arena.food(), Some(p(4, 2)));
    }

    #[test]
    fn test_full_grid_has_no_food() {
        let grid = Grid::new(5, 5);
        let occupied: HashSet<Position> = grid.cells().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let mut arena = Arena::new(grid, &HashSet::new(), &mut rng);
        assert!(arena.food().is_some());

        assert_eq!(arena.spawn_food(&occupied, &mut rng), None);
        assert_eq!(arena.food(), None);
        assert!(!arena.head_on_food(p(0, 0)));
    }

    #[test]
    fn test_scan_fallback_picks_free_cell() {
        let grid = Grid::new(6, 6);
        let occupied: HashSet<Position> = grid.cells().filter(|pos| pos.x != 2).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let arena = Arena { grid, food: None };

        let food = arena.scan_free(&occupied, &mut rng).unwrap();

        assert_eq!(food.x, 2);
    }

    #[test]
    fn test_self_collision_with_forced_overlap() {
        assert!(Arena::check_collision_with_self(&[p(5, 5), p(5, 4), p(4, 4), p(4, 5), p(5, 5)]));
        assert!(Arena::check_collision_with_self(&[p(5, 5), p(5, 5)]));
    }

    #[test]
    fn test_no_self_collision_without_overlap() {
        assert!(!Arena::check_collision_with_self(&[p(5, 5), p(5, 4), p(5, 3), p(4, 3)]));
        assert!(!Arena::check_collision_with_self(&[]));
    }

    #[test]
    fn test_food_collision_is_cell_equality() {
        assert!(Arena::check_collision_with_food(p(3, 4), p(3, 4)));
        assert!(!Arena::check_collision_with_food(p(3, 4), p(4, 3)));
    }

    #[test]
    fn test_head_on_food() {
        let grid = Grid::new(5, 5);
        let mut occupied: HashSet<Position> = grid.cells().collect();
        occupied.remove(&p(1, 1));
        let arena = Arena::new(grid, &occupied, &mut StdRng::seed_from_u64(9));

        assert!(arena.head_on_food(p(1, 1)));
        assert!(!arena.head_on_food(p(1, 2)));
    }
}
