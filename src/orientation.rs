//! Render-only classification of snake segments.
//!
//! Tags are derived from neighbour geometry every tick and never feed back
//! into the simulation. "Top" is the side with the larger y.

use crate::grid::{Grid, Position};
use crate::snake::Direction::{self, *};
use OrientationTag::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrientationTag {
    HeadUp,
    HeadDown,
    HeadLeft,
    HeadRight,
    TailUp,
    TailDown,
    TailLeft,
    TailRight,
    BodyHorizontal,
    BodyVertical,
    BodyTopLeft,
    BodyTopRight,
    BodyBottomLeft,
    BodyBottomRight,
}

impl OrientationTag {
    /// Asset key for renderers that load one image per tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadUp => "head_up",
            HeadDown => "head_down",
            HeadLeft => "head_left",
            HeadRight => "head_right",
            TailUp => "tail_up",
            TailDown => "tail_down",
            TailLeft => "tail_left",
            TailRight => "tail_right",
            BodyHorizontal => "body_horizontal",
            BodyVertical => "body_vertical",
            BodyTopLeft => "body_topleft",
            BodyTopRight => "body_topright",
            BodyBottomLeft => "body_bottomleft",
            BodyBottomRight => "body_bottomright",
        }
    }

    /// Whether the drawn piece touches the given side of its cell.
    pub fn connects(&self, side: Direction) -> bool {
        let (a, b) = match self {
            HeadUp | TailUp => (Down, Down),
            HeadDown | TailDown => (Up, Up),
            HeadLeft | TailLeft => (Right, Right),
            HeadRight | TailRight => (Left, Left),
            BodyHorizontal => (Left, Right),
            BodyVertical => (Up, Down),
            BodyTopLeft => (Up, Left),
            BodyTopRight => (Up, Right),
            BodyBottomLeft => (Down, Left),
            BodyBottomRight => (Down, Right),
        };

        side == a || side == b
    }
}

pub fn head_tag(direction: Direction) -> OrientationTag {
    match direction {
        Up => HeadUp,
        Down => HeadDown,
        Left => HeadLeft,
        Right => HeadRight,
    }
}

/// The tail points back towards where the snake came from.
pub fn tail_tag(prev: Position, tail: Position, grid: &Grid) -> OrientationTag {
    let (dx, dy) = grid.offset(prev, tail);

    if dy > 0 {
        TailUp
    } else if dy < 0 {
        TailDown
    } else if dx > 0 {
        TailRight
    } else {
        TailLeft
    }
}

/// Returns `None` when the neighbours are neither in line nor a 90° turn,
/// which only happens if the position sequence is corrupted.
pub fn body_tag(prev: Position, current: Position, next: Position, grid: &Grid) -> Option<OrientationTag> {
    let to_prev = grid.offset(current, prev);
    let to_next = grid.offset(current, next);

    if to_prev.1 == to_next.1 {
        return Some(BodyHorizontal);
    }
    if to_prev.0 == to_next.0 {
        return Some(BodyVertical);
    }

    let sides = (Direction::from_delta(to_prev)?, Direction::from_delta(to_next)?);

    match sides {
        (Down, Right) | (Right, Down) => Some(BodyBottomRight),
        (Down, Left) | (Left, Down) => Some(BodyBottomLeft),
        (Up, Left) | (Left, Up) => Some(BodyTopLeft),
        (Up, Right) | (Right, Up) => Some(BodyTopRight),
        _ => None,
    }
}
