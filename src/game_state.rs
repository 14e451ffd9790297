use std::time::Duration;

use rand::Rng;

use crate::arena::Arena;
use crate::snake::Snake;

#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub food_score: u64,
    pub base_tick_interval: Duration,
    pub min_tick_interval: Duration,
    pub speedup_every: u64,
    pub speedup_step: Duration,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            food_score: 100,
            base_tick_interval: Duration::from_millis(150),
            min_tick_interval: Duration::from_millis(60),
            speedup_every: 500,
            speedup_step: Duration::from_millis(10),
        }
    }
}

impl Rules {
    /// Shrinks the base interval by one step per score milestone reached.
    pub fn tick_interval_for(&self, score: u64) -> Duration {
        let milestones = (score / self.speedup_every.max(1)) as u32;
        let faster = self.base_tick_interval.saturating_sub(self.speedup_step.saturating_mul(milestones));
        faster.max(self.min_tick_interval)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    GameOver,
    /// The snake covers the whole grid.
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    Idle,
    Moved,
    Ate,
    Died,
    Won,
}

/// Score, pace and outcome of a round. Kept apart from `Snake` and `Arena`
/// so those stay plain state machines.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub score: u64,
    pub tick_interval: Duration,
    pub status: Status,
}

impl GameState {
    pub fn new(rules: &Rules) -> Self {
        GameState { score: 0, tick_interval: rules.base_tick_interval, status: Status::Running }
    }

    pub fn reset(&mut self, rules: &Rules) {
        *self = GameState::new(rules);
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }
}

/// Advances the round by one step: move, check the body, then the food.
pub fn tick<R: Rng>(snake: &mut Snake, arena: &mut Arena, state: &mut GameState, rules: &Rules, rng: &mut R) -> TickEvent {
    if !state.is_running() {
        return TickEvent::Idle;
    }

    snake.move_step();

    if Arena::check_collision_with_self(snake.positions()) {
        state.status = Status::GameOver;
        tracing::info!(score = state.score, length = snake.len(), direction = ?snake.direction(), "snake ran into itself");
        return TickEvent::Died;
    }

    if !arena.head_on_food(snake.head()) {
        return TickEvent::Moved;
    }

    state.score += rules.food_score;
    snake.grow();

    let interval = rules.tick_interval_for(state.score);
    if interval != state.tick_interval {
        tracing::info!(score = state.score, interval_ms = interval.as_millis() as u64, "speeding up");
        state.tick_interval = interval;
    }

    if arena.spawn_food(&snake.occupied(), rng).is_none() {
        state.status = Status::Won;
        tracing::info!(score = state.score, "grid filled");
        return TickEvent::Won;
    }

    TickEvent::Ate
}
