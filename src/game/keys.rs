//! Keyboard input mapped to game intents.
//!
//! This module defines the [`GameKey`] enum for abstracting game actions from physical keys,
//! and provides [`KeyState`] for tracking which keys are held. Whoever owns the input device
//! feeds key names in and samples [`KeyState::held_directions`] on its move poll; nothing here
//! reads a device.

use crate::game::GameEvent;
use crate::maze::Direction;
use std::collections::HashSet;

/// Enum representing all in-game actions that can be triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move up (Up Arrow or W).
    MoveUp,
    /// Move down (Down Arrow).
    MoveDown,
    /// Move left (Left Arrow or A).
    MoveLeft,
    /// Move right (Right Arrow or D).
    MoveRight,
    /// Ask for a hint (H).
    Hint,
    /// Show or hide the full solution (S).
    ToggleSolution,
}

impl GameKey {
    /// The movement direction for a movement key.
    pub fn direction(self) -> Option<Direction> {
        match self {
            GameKey::MoveUp => Some(Direction::Up),
            GameKey::MoveDown => Some(Direction::Down),
            GameKey::MoveLeft => Some(Direction::Left),
            GameKey::MoveRight => Some(Direction::Right),
            GameKey::Hint | GameKey::ToggleSolution => None,
        }
    }

    /// The movement key that steps in `direction`.
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => GameKey::MoveUp,
            Direction::Down => GameKey::MoveDown,
            Direction::Left => GameKey::MoveLeft,
            Direction::Right => GameKey::MoveRight,
        }
    }

    /// The one-shot event fired when a non-movement key goes down.
    ///
    /// Movement keys return `None`: they are sampled while held instead.
    pub fn discrete_event(self) -> Option<GameEvent> {
        match self {
            GameKey::Hint => Some(GameEvent::Hint),
            GameKey::ToggleSolution => Some(GameEvent::ToggleSolution),
            _ => None,
        }
    }
}

/// Tracks the set of currently pressed game keys.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Directions of the held movement keys, in the order Up, Down, Left,
    /// Right. Each one becomes a separate move request on a poll.
    pub fn held_directions(&self) -> Vec<Direction> {
        [
            GameKey::MoveUp,
            GameKey::MoveDown,
            GameKey::MoveLeft,
            GameKey::MoveRight,
        ]
        .into_iter()
        .filter(|key| self.is_pressed(*key))
        .filter_map(GameKey::direction)
        .collect()
    }
}

macro_rules! match_key_name {
    ($name:expr, {
        $($($key:literal)|+ => $variant:expr),* $(,)?
    }) => {{
        match $name.trim().to_ascii_lowercase().as_str() {
            $($($key)|+ => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a key name to a [`GameKey`] if it matches a mapped action.
///
/// Names are case-insensitive. Arrows accept both `Up` and `ArrowUp` forms.
/// `s` is taken by the solution toggle, so moving down is arrow-only.
///
/// # Returns
/// `Some(GameKey)` if the name is mapped, otherwise `None`.
pub fn key_from_name(name: &str) -> Option<GameKey> {
    match_key_name!(name, {
        "up" | "arrowup" | "w" => GameKey::MoveUp,
        "down" | "arrowdown" => GameKey::MoveDown,
        "left" | "arrowleft" | "a" => GameKey::MoveLeft,
        "right" | "arrowright" | "d" => GameKey::MoveRight,
        "h" => GameKey::Hint,
        "s" => GameKey::ToggleSolution,
    })
}
