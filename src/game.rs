use std::{thread::sleep, time::{Duration, Instant}};

use crate::{TermCoords, TermInt};
use crate::arena::Arena;
use crate::config::GameConfig;
use crate::game_state::{self, GameState, Rules, Status, TickEvent};
use crate::grid::{Grid, Position};
use crate::orientation::OrientationTag::{self, *};
use crate::snake::{Snake, Direction::{*, self}};
use crate::term::TermManager;

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use rand::rngs::StdRng;

const POLL_INTERVAL_MS: u64 = 5;

const FOOD_CHAR: char = '●';
const DEAD_SNAKE_CHAR: char = 'X';
const WIDE_CELL_FILL: char = '═';

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame {
    grid: Grid,
    cell_size: TermInt,
    initial_length: usize,
    rules: Rules,
    paused: bool,
    term: TermManager,
    rng: StdRng,
    drawn: Vec<Position>,
}

impl SnakeGame {
    pub fn new(config: &GameConfig, rng: StdRng) -> Result<Self> {
        let term = TermManager::new().context("Error reading terminal size")?;
        let grid = config.grid();

        let needed = board_size(grid, config.cell_size);
        let (w, h) = term.get_terminal_size();
        if w < needed.0 + 2 || h < needed.1 + 3 {
            bail!(
                "terminal is {}x{}, a {}x{} grid needs at least {}x{}",
                w, h, grid.width(), grid.height(), needed.0 + 2, needed.1 + 3
            );
        }

        Ok(SnakeGame {
            grid,
            cell_size: config.cell_size,
            initial_length: config.initial_length,
            rules: config.rules(),
            paused: false,
            term,
            rng,
            drawn: vec![],
        })
    }

    /// Runs rounds until the player quits, leaving the terminal restored
    /// even if a round fails.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("Error setting up terminal")?;
        let res = self.run_rounds();
        self.term.restore().context("Error restoring terminal")?;
        res
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_rounds(&mut self) -> Result<()> {
        if self.show_intro()? == Flow::Quit {
            return Ok(());
        }

        let mut snake = Snake::new(self.grid, self.initial_length)?;
        let mut arena = Arena::new(self.grid, &snake.occupied(), &mut self.rng);
        let mut state = GameState::new(&self.rules);

        loop {
            tracing::info!(width = self.grid.width(), height = self.grid.height(), "round started");

            if self.play(&mut snake, &mut arena, &mut state)? == Flow::Quit {
                return Ok(());
            }

            // Quit if the user CTRL+C's after the game
            if is_ctrl_c(&self.term.read_key_blocking()?) {
                return Ok(());
            }

            snake.reset();
            arena.spawn_food(&snake.occupied(), &mut self.rng);
            state.reset(&self.rules);
        }
    }

    fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    fn play(&mut self, snake: &mut Snake, arena: &mut Arena, state: &mut GameState) -> Result<Flow> {
        self.term.hide_message()?;
        self.term.clear()?;
        self.term.draw_borders(board_size(self.grid, self.cell_size))?;
        self.drawn.clear();
        self.paused = false;
        self.draw(snake, arena, state)?;

        let mut dir_change: Option<Direction> = None;
        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match &key_ev {
                    ev if is_ctrl_c(ev) => return Ok(Flow::Quit),
                    KeyEvent { code, modifiers: _ } => match code {
                        KeyCode::Char('w') | KeyCode::Up => dir_change = Some(Up),
                        KeyCode::Char('a') | KeyCode::Left => dir_change = Some(Left),
                        KeyCode::Char('s') | KeyCode::Down => dir_change = Some(Down),
                        KeyCode::Char('d') | KeyCode::Right => dir_change = Some(Right),
                        KeyCode::Esc => self.toggle_pause()?,
                        _ => {}
                    }
                }
            }

            if self.paused {
                last_step = Instant::now();
                continue;
            }

            if last_step.elapsed() < state.tick_interval {
                continue;
            }
            last_step = Instant::now();

            if let Some(dir) = dir_change.take() {
                snake.change_direction(dir);
            }

            match game_state::tick(snake, arena, state, &self.rules, &mut self.rng) {
                TickEvent::Died | TickEvent::Won => {
                    self.draw(snake, arena, state)?;
                    self.game_over(snake, state)?;
                    return Ok(Flow::Continue);
                }
                TickEvent::Moved | TickEvent::Ate => self.draw(snake, arena, state)?,
                TickEvent::Idle => return Ok(Flow::Continue),
            }
        }
    }

    fn game_over(&mut self, snake: &Snake, state: &GameState) -> Result<()> {
        let win = state.status == Status::Won;
        let s = if win {"You won!"} else {"Game over!"};

        if !win {
            for pos in snake.positions() {
                self.fill_cell(*pos, DEAD_SNAKE_CHAR, DEAD_SNAKE_CHAR)?;
            }
        }

        self.term.show_message(&[
            s,
            &*format!("Score: {}", state.score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])?;
        Ok(())
    }

    /// Blanks what was drawn last step, then paints food, snake and score.
    fn draw(&mut self, snake: &Snake, arena: &Arena, state: &GameState) -> Result<()> {
        for pos in std::mem::take(&mut self.drawn) {
            self.fill_cell(pos, ' ', ' ')?;
        }

        if let Some(food) = arena.food() {
            self.fill_cell(food, FOOD_CHAR, ' ')?;
            self.drawn.push(food);
        }

        // Tail first so the head wins when cells overlap
        let segments: Vec<(Position, OrientationTag)> = snake.segments().collect();
        for (pos, tag) in segments.into_iter().rev() {
            let fill = if tag.connects(Right) {WIDE_CELL_FILL} else {' '};
            self.fill_cell(pos, glyph(tag), fill)?;
            self.drawn.push(pos);
        }

        let status_row = board_size(self.grid, self.cell_size).1 + 2;
        self.term.print_text_at((1, status_row), &format!("Score: {:<8}", state.score))?;
        self.term.flush()?;
        Ok(())
    }

    fn fill_cell(&mut self, pos: Position, first: char, rest: char) -> Result<()> {
        let (x, y) = self.to_term(pos);
        self.term.print_at((x, y), first)?;
        for col in 1..self.cell_size {
            self.term.print_at((x + col, y), rest)?;
        }
        Ok(())
    }

    /// Grid y grows upwards, terminal rows grow downwards; (1, 1) is inside the border.
    fn to_term(&self, pos: Position) -> TermCoords {
        debug_assert!(self.grid.contains(pos));
        let x = 1 + pos.x as TermInt * self.cell_size;
        let y = 1 + (self.grid.max_y() - pos.y) as TermInt;
        (x, y)
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

fn board_size(grid: Grid, cell_size: TermInt) -> TermCoords {
    (grid.width() as TermInt * cell_size, grid.height() as TermInt)
}

fn glyph(tag: OrientationTag) -> char {
    match tag {
        HeadUp => '▲',
        HeadDown => '▼',
        HeadLeft => '◀',
        HeadRight => '▶',
        TailUp => '╿',
        TailDown => '╽',
        TailLeft => '╾',
        TailRight => '╼',
        BodyHorizontal => '═',
        BodyVertical => '║',
        BodyTopLeft => '╝',
        BodyTopRight => '╚',
        BodyBottomLeft => '╗',
        BodyBottomRight => '╔',
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
