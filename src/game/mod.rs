//! Game session state management.
//!
//! This module defines [`GameSession`], which owns everything a single play-through needs:
//! the maze, the optimal route, the player's position, the countdown and the move log.
//! Input arrives as [`GameEvent`]s, one at a time; each one is applied to completion and
//! reported back as an [`EventOutcome`]. Time is always passed in by the caller.
//!
//! A session runs `Initializing -> Playing -> {Won | Lost}` and leaves `Playing` exactly
//! once. From then on every event is ignored and the [`SessionMetrics`] are frozen.

pub mod autopilot;
pub mod hint;
pub mod keys;
pub mod record;
pub mod timer;

#[cfg(test)]
mod tests;

use self::hint::{Hint, HintBudget, next_hint};
use self::record::{MoveDetail, SessionRecord, SessionTotals};
use self::timer::{GameTimer, TimerConfig};
use crate::config::{Difficulty, GameConfig};
use crate::error::MazeError;
use crate::maze::generator::{choose_exit, generate};
use crate::maze::pathfinding::{Path, find_path};
use crate::maze::{Cell, Direction, Grid};
use chrono::{DateTime, Duration, Local};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

pub use self::record::{MoveRecord, SessionMetrics};

/// Name recorded when a player gives none.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Where every player starts.
pub const ENTRANCE: Cell = Cell { col: 0, row: 0 };

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Built, waiting for [`GameSession::start`].
    Initializing,
    /// Accepting input.
    Playing,
    /// Exit reached before the time ran out.
    Won,
    /// Time ran out.
    Lost,
}

impl SessionState {
    /// Whether the session has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Won | SessionState::Lost)
    }
}

/// A single input for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Try to step one cell.
    Move(Direction),
    /// Re-check the clock.
    Tick,
    /// Ask for the next step.
    Hint,
    /// Show or hide the full solution.
    ToggleSolution,
}

/// What an event did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The session was not in a state that accepts this event.
    Ignored,
    /// The player moved; the exit was not reached.
    Moved(MoveRecord),
    /// The move led into a wall or off the grid.
    Blocked,
    /// A hint was given for this cell.
    Hint(Cell),
    /// No hints left.
    HintsDepleted,
    /// The full solution is now visible.
    SolutionShown,
    /// The full solution is now hidden.
    SolutionHidden,
    /// The clock was checked and time remains.
    Ticked {
        /// Time left.
        remaining: Duration,
    },
    /// This event ended the session.
    Finished(SessionMetrics),
}

/// Everything [`GameSession::prepare`] needs to build a session from scratch.
#[derive(Debug, Clone)]
pub struct SessionSetup {
    /// Name shown in records.
    pub player_name: String,
    /// Picks the grid size.
    pub difficulty: Difficulty,
    /// Makes maze and exit deterministic when set.
    pub seed: Option<u64>,
    /// Rules and limits.
    pub config: GameConfig,
}

/// One play-through of a maze.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: String,
    player_name: String,
    difficulty: Difficulty,
    grid: Grid,
    exit: Cell,
    optimal_path: Path,
    position: Cell,
    state: SessionState,
    timer: GameTimer,
    hint_budget: HintBudget,
    latest_hint: Option<Cell>,
    hints_used: u32,
    show_solution: bool,
    solution_views: u32,
    moves: Vec<MoveRecord>,
    ended_at: Option<DateTime<Local>>,
    metrics: Option<SessionMetrics>,
}

impl GameSession {
    /// Builds a session over an existing maze.
    ///
    /// A blank `player_name` is recorded as [`DEFAULT_PLAYER_NAME`].
    ///
    /// # Arguments
    /// * `optimal_path` - route from [`ENTRANCE`] to `exit` through open cells.
    ///
    /// # Errors
    /// [`MazeError::InvalidPath`] if the route is empty, does not run from the
    /// entrance to `exit`, or leaves the open cells of `grid`.
    pub fn new(
        id: impl Into<String>,
        player_name: impl Into<String>,
        difficulty: Difficulty,
        grid: Grid,
        exit: Cell,
        optimal_path: Vec<Cell>,
        config: &GameConfig,
    ) -> Result<Self, MazeError> {
        let optimal_path = Path::new(optimal_path).ok_or_else(|| MazeError::InvalidPath {
            reason: "path is empty".to_string(),
        })?;
        if optimal_path.first() != ENTRANCE || optimal_path.last() != exit {
            return Err(MazeError::InvalidPath {
                reason: format!(
                    "path runs {} -> {}, expected {} -> {}",
                    optimal_path.first(),
                    optimal_path.last(),
                    ENTRANCE,
                    exit
                ),
            });
        }
        if !optimal_path.is_valid_on(&grid) {
            return Err(MazeError::InvalidPath {
                reason: "path is not a walk through distinct open cells".to_string(),
            });
        }

        let player_name = player_name.into();
        let player_name = if player_name.trim().is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            player_name
        };

        Ok(Self {
            id: id.into(),
            player_name,
            difficulty,
            grid,
            exit,
            optimal_path,
            position: ENTRANCE,
            state: SessionState::Initializing,
            timer: GameTimer::new(TimerConfig {
                duration: config.time_limit(),
            }),
            hint_budget: HintBudget::new(config.hint_budget),
            latest_hint: None,
            hints_used: 0,
            show_solution: false,
            solution_views: 0,
            moves: Vec::new(),
            ended_at: None,
            metrics: None,
        })
    }

    /// Generates a maze, places the exit, solves it and builds the session.
    ///
    /// The session id is the creation time as `YYYYmmdd_HHMMSS`.
    ///
    /// # Errors
    /// Any [`MazeError`] from generation or exit placement, and
    /// [`MazeError::NoPath`] if the exit cannot be reached.
    #[instrument(skip(setup), fields(player = %setup.player_name, difficulty = %setup.difficulty))]
    pub fn prepare(setup: SessionSetup, now: DateTime<Local>) -> Result<Self, MazeError> {
        let (width, height) = setup.difficulty.dimensions();
        let grid = generate(width, height, setup.seed)?;

        // Separate stream from the carver so the exit is not tied to its draws.
        let mut rng = match setup.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let exit = choose_exit(&grid, ENTRANCE, setup.config.min_exit_distance, &mut rng)?;

        let id = now.format("%Y%m%d_%H%M%S").to_string();
        Self::solve(
            id,
            setup.player_name,
            setup.difficulty,
            grid,
            exit,
            &setup.config,
        )
    }

    /// Builds a session over `grid` after solving it from [`ENTRANCE`] to
    /// `exit`.
    ///
    /// # Errors
    /// [`MazeError::NoPath`] if the exit cannot be reached.
    pub fn solve(
        id: impl Into<String>,
        player_name: impl Into<String>,
        difficulty: Difficulty,
        grid: Grid,
        exit: Cell,
        config: &GameConfig,
    ) -> Result<Self, MazeError> {
        let path = find_path(&grid, ENTRANCE, exit).ok_or(MazeError::NoPath {
            from: ENTRANCE,
            to: exit,
        })?;
        info!(%exit, path_len = path.len(), "Maze solved");
        Self::new(
            id,
            player_name,
            difficulty,
            grid,
            exit,
            path.cells().to_vec(),
            config,
        )
    }

    /// Starts play and the countdown. Returns false if already started.
    pub fn start(&mut self, now: DateTime<Local>) -> bool {
        if self.state != SessionState::Initializing {
            return false;
        }
        self.state = SessionState::Playing;
        self.timer.start(now);
        info!(session = %self.id, player = %self.player_name, "Session started");
        true
    }

    /// Applies one event.
    pub fn handle(&mut self, event: GameEvent, now: DateTime<Local>) -> EventOutcome {
        match event {
            GameEvent::Move(direction) => self.request_move(direction, now),
            GameEvent::Tick => self.tick(now),
            GameEvent::Hint => self.request_hint(),
            GameEvent::ToggleSolution => self.toggle_solution(),
        }
    }

    /// Tries to step one cell in `direction`.
    ///
    /// Walls and the grid edge block the move without logging anything.
    /// Reaching the exit wins the session.
    pub fn request_move(&mut self, direction: Direction, now: DateTime<Local>) -> EventOutcome {
        if self.state != SessionState::Playing {
            return EventOutcome::Ignored;
        }

        let (dx, dy) = direction.delta();
        let Some(to) = self
            .position
            .offset(dx, dy)
            .filter(|cell| self.grid.is_open(*cell))
        else {
            return EventOutcome::Blocked;
        };

        let from = self.position;
        let record = MoveRecord {
            sequence: self.moves.len() as u32 + 1,
            from,
            to,
            timestamp: now,
            on_optimal_path: self.optimal_path.is_transition(from, to),
            reaction_time: self.moves.last().map(|last| now - last.timestamp),
        };
        debug!(%from, %to, on_path = record.on_optimal_path, "Move");
        self.moves.push(record.clone());
        self.position = to;

        if to == self.exit {
            return EventOutcome::Finished(self.finish(SessionState::Won, now));
        }
        EventOutcome::Moved(record)
    }

    /// Raw-offset form of [`request_move`](Self::request_move). Anything but a
    /// single orthogonal step is blocked.
    pub fn request_move_delta(&mut self, dx: isize, dy: isize, now: DateTime<Local>) -> EventOutcome {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.request_move(direction, now),
            None if self.state == SessionState::Playing => EventOutcome::Blocked,
            None => EventOutcome::Ignored,
        }
    }

    /// Checks the clock; running out of time loses the session.
    pub fn tick(&mut self, now: DateTime<Local>) -> EventOutcome {
        if self.state != SessionState::Playing {
            return EventOutcome::Ignored;
        }
        if self.timer.update(now) {
            return EventOutcome::Finished(self.finish(SessionState::Lost, now));
        }
        EventOutcome::Ticked {
            remaining: self.timer.remaining(now),
        }
    }

    /// Spends a hint on the next step from the current position.
    pub fn request_hint(&mut self) -> EventOutcome {
        if self.state != SessionState::Playing {
            return EventOutcome::Ignored;
        }
        match next_hint(self.position, &self.optimal_path, &mut self.hint_budget) {
            Hint::Next(cell) => {
                self.latest_hint = Some(cell);
                self.hints_used += 1;
                EventOutcome::Hint(cell)
            }
            Hint::Depleted => EventOutcome::HintsDepleted,
        }
    }

    /// Flips the full-solution overlay. Every switch on counts as a view.
    pub fn toggle_solution(&mut self) -> EventOutcome {
        if self.state != SessionState::Playing {
            return EventOutcome::Ignored;
        }
        self.show_solution = !self.show_solution;
        if self.show_solution {
            self.solution_views += 1;
            EventOutcome::SolutionShown
        } else {
            EventOutcome::SolutionHidden
        }
    }

    fn finish(&mut self, state: SessionState, now: DateTime<Local>) -> SessionMetrics {
        self.state = state;
        self.ended_at = Some(now);
        let metrics = SessionMetrics::compute(
            &self.moves,
            SessionTotals {
                won: state == SessionState::Won,
                completion_time: self.timer.elapsed(now),
                time_limit: self.timer.total_time(),
                hints_used: self.hints_used,
                solution_views: self.solution_views,
                optimal_path_length: self.optimal_path.len(),
            },
        );
        info!(
            session = %self.id,
            ?state,
            moves = metrics.total_moves,
            accuracy = metrics.path_accuracy,
            completion_time = metrics.completion_time,
            "Session finished"
        );
        self.metrics = Some(metrics.clone());
        metrics
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Player name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Difficulty the maze was built for.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The maze.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current player cell.
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Target cell.
    pub fn exit(&self) -> Cell {
        self.exit
    }

    /// Shortest route from the entrance to the exit.
    pub fn optimal_path(&self) -> &Path {
        &self.optimal_path
    }

    /// The optimal path while the solution overlay is on.
    pub fn visible_solution(&self) -> Option<&Path> {
        self.show_solution.then_some(&self.optimal_path)
    }

    /// The most recent hinted cell.
    pub fn latest_hint(&self) -> Option<Cell> {
        self.latest_hint
    }

    /// Hints left to spend.
    pub fn hints_remaining(&self) -> u32 {
        self.hint_budget.remaining()
    }

    /// Hints spent so far.
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Times the solution has been switched on.
    pub fn solution_views(&self) -> u32 {
        self.solution_views
    }

    /// Time left at `now`.
    pub fn remaining_time(&self, now: DateTime<Local>) -> Duration {
        self.timer.remaining(now)
    }

    /// Time left at `now` as `SS.ss`.
    pub fn format_time(&self, now: DateTime<Local>) -> String {
        self.timer.format_time(now)
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Accepted moves, oldest first.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Final metrics, once the session has ended.
    pub fn metrics(&self) -> Option<&SessionMetrics> {
        self.metrics.as_ref()
    }

    /// Text picture of the maze with the player, exit, hint and, when
    /// toggled on, the solution.
    pub fn render(&self) -> String {
        self.grid.render_with(
            self.visible_solution().map(Path::cells),
            Some(self.position),
            Some(self.exit),
            self.latest_hint,
        )
    }

    /// Summary row for recorders, once the session has ended.
    pub fn record(&self) -> Option<SessionRecord> {
        let metrics = self.metrics.as_ref()?;
        let ended_at = self.ended_at?;
        Some(SessionRecord {
            session_id: self.id.clone(),
            player_name: self.player_name.clone(),
            difficulty: self.difficulty,
            completed: metrics.won,
            completion_time: metrics.completion_time,
            total_moves: metrics.total_moves,
            correct_moves: metrics.correct_moves,
            path_accuracy: metrics.path_accuracy,
            avg_reaction_time: metrics.avg_reaction_time,
            hints_used: metrics.hints_used,
            solution_views: metrics.solution_views,
            optimal_path_length: metrics.optimal_path_length,
            timestamp: ended_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    /// Per-move rows for recorders.
    pub fn move_details(&self) -> Vec<MoveDetail> {
        self.moves
            .iter()
            .map(|m| MoveDetail::from_record(&self.id, m))
            .collect()
    }
}
