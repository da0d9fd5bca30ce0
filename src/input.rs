//! Logical input latch.
//!
//! Host key events arrive whenever the host delivers them; the latch records
//! them and the next step reads them.  Presses are kept both as a held flag
//! (level-triggered) and as a pending edge that a step consumes once.

use serde::{Deserialize, Serialize};

use crate::entities::Direction;

const ACTION_COUNT: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Start,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Thrust,
}

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Start,
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Fire,
        Action::Thrust,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The direction a movement action points at, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputLatch {
    held: [bool; ACTION_COUNT],
    /// Unconsumed presses, oldest first, at most one per action.
    pending: Vec<Action>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_input(&mut self, action: Action, pressed: bool) {
        self.held[action.index()] = pressed;
        if pressed {
            // Coalesce: a repeated press keeps one edge, at its latest position.
            self.pending.retain(|&a| a != action);
            self.pending.push(action);
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn is_pending(&self, action: Action) -> bool {
        self.pending.contains(&action)
    }

    /// Consume the pending edge for `action`, if there is one.
    pub fn take(&mut self, action: Action) -> bool {
        match self.pending.iter().position(|&a| a == action) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Consume every pending movement edge, in press order.
    pub fn take_directions(&mut self) -> Vec<Direction> {
        let mut directions = Vec::new();
        self.pending.retain(|a| match a.direction() {
            Some(dir) => {
                directions.push(dir);
                false
            }
            None => true,
        });
        directions
    }

    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    pub fn release_all(&mut self) {
        self.held = [false; ACTION_COUNT];
        self.pending.clear();
    }
}
