//! Scripted player for driving sessions without a keyboard.
//!
//! The autopilot decides which movement key to hold at each poll and
//! [`run_session`] plays a whole session on a simulated clock, so a run is
//! reproducible from its seed and takes no wall-clock time.

use super::keys::{GameKey, KeyState};
use super::{GameSession, SessionMetrics};
use crate::error::ConfigError;
use crate::maze::Direction;
use crate::maze::pathfinding::find_path;
use chrono::{DateTime, Duration, Local};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// How the autopilot picks its moves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Walk the optimal path; if pushed off it, head back towards the exit
    /// along the shortest route.
    #[default]
    Optimal,
    /// Pick a random open direction every poll.
    Wander,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Optimal => f.write_str("optimal"),
            Strategy::Wander => f.write_str("wander"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimal" => Ok(Strategy::Optimal),
            "wander" => Ok(Strategy::Wander),
            other => Err(ConfigError::new(format!("unknown strategy '{}'", other))),
        }
    }
}

/// A seeded stand-in for a player.
#[derive(Debug)]
pub struct Autopilot {
    strategy: Strategy,
    rng: StdRng,
}

impl Autopilot {
    /// Creates an autopilot. `seed` fixes the random choices of
    /// [`Strategy::Wander`].
    pub fn new(strategy: Strategy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { strategy, rng }
    }

    /// The strategy in use.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The direction to move from the session's current position, if any.
    pub fn next_direction(&mut self, session: &GameSession) -> Option<Direction> {
        let position = session.position();
        match self.strategy {
            Strategy::Optimal => {
                let next = match session.optimal_path().step_after(position) {
                    Some(next) => next,
                    None => {
                        let detour = find_path(session.grid(), position, session.exit())?;
                        detour.cells().get(1).copied()?
                    }
                };
                Direction::between(position, next)
            }
            Strategy::Wander => {
                let grid = session.grid();
                let options: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|dir| grid.neighbor(position, *dir).is_some_and(|c| grid.is_open(c)))
                    .collect();
                options.choose(&mut self.rng).copied()
            }
        }
    }
}

/// Plays `session` to the end on a simulated clock starting at `start`.
///
/// Every `poll` the autopilot holds the key for its next move and the held
/// keys are sampled into move requests; every `tick` the clock is checked.
/// When both fall on the same instant the tick goes first. A session that has
/// not started is started at `start`.
///
/// # Errors
/// [`ConfigError`] if either interval is not positive, or if the simulated
/// clock would run past the range of [`DateTime`].
#[instrument(skip(session, autopilot), fields(session = %session.id(), strategy = %autopilot.strategy()))]
pub fn run_session(
    session: &mut GameSession,
    autopilot: &mut Autopilot,
    start: DateTime<Local>,
    poll: Duration,
    tick: Duration,
) -> Result<SessionMetrics, ConfigError> {
    if poll <= Duration::zero() || tick <= Duration::zero() {
        return Err(ConfigError::new("poll and tick intervals must be positive"));
    }

    let advance = |at: DateTime<Local>, by: Duration| {
        at.checked_add_signed(by)
            .ok_or_else(|| ConfigError::new("simulated clock overflowed"))
    };
    let mut next_poll = advance(start, poll)?;
    let mut next_tick = advance(start, tick)?;

    session.start(start);
    let mut keys = KeyState::new();

    loop {
        if let Some(metrics) = session.metrics() {
            return Ok(metrics.clone());
        }

        if next_tick <= next_poll {
            session.tick(next_tick);
            next_tick = advance(next_tick, tick)?;
            continue;
        }

        if let Some(direction) = autopilot.next_direction(session) {
            keys.press_key(GameKey::for_direction(direction));
        }
        for direction in keys.held_directions() {
            let outcome = session.request_move(direction, next_poll);
            debug!(?direction, ?outcome, "Autopilot move");
        }
        keys.clear();
        next_poll = advance(next_poll, poll)?;
    }
}
