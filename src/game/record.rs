//! Move log, end-of-session metrics and the record handed to recorders.
//!
//! The session fills an append-only log of [`MoveRecord`]s while playing and
//! derives [`SessionMetrics`] once, when it ends. A [`SessionRecord`] plus one
//! [`MoveDetail`] per move is the flat shape external recorders persist; how
//! and where they store it is up to them.

use crate::config::Difficulty;
use crate::error::RecordError;
use crate::maze::Cell;
use chrono::{DateTime, Duration, Local};
use serde::Serialize;
use std::io::Write;

/// One accepted move. Never modified after it is appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based position in the log.
    pub sequence: u32,
    /// Cell the player left.
    pub from: Cell,
    /// Cell the player entered.
    pub to: Cell,
    /// When the move was accepted.
    pub timestamp: DateTime<Local>,
    /// Whether `from -> to` is a step of the optimal path.
    pub on_optimal_path: bool,
    /// Time since the previous accepted move; `None` for the first move.
    pub reaction_time: Option<Duration>,
}

/// Performance summary computed when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    /// Whether the exit was reached in time.
    pub won: bool,
    /// Seconds from start to the end of the session.
    pub completion_time: f64,
    /// Whole seconds left on the clock, never negative.
    pub remaining_time: u64,
    /// Accepted moves.
    pub total_moves: u32,
    /// Accepted moves that followed the optimal path.
    pub correct_moves: u32,
    /// `correct_moves / total_moves * 100`, or 0 with no moves.
    pub path_accuracy: f64,
    /// Mean seconds between consecutive moves, or 0 with fewer than two moves.
    pub avg_reaction_time: f64,
    /// Hints successfully given.
    pub hints_used: u32,
    /// Times the full solution was switched on.
    pub solution_views: u32,
    /// Cells on the optimal path.
    pub optimal_path_length: usize,
}

/// Inputs for [`SessionMetrics::compute`] that do not come from the move log.
#[derive(Debug, Clone)]
pub struct SessionTotals {
    /// Whether the exit was reached in time.
    pub won: bool,
    /// Time from start to the end of the session.
    pub completion_time: Duration,
    /// Total time allowed.
    pub time_limit: Duration,
    /// Hints successfully given.
    pub hints_used: u32,
    /// Times the full solution was switched on.
    pub solution_views: u32,
    /// Cells on the optimal path.
    pub optimal_path_length: usize,
}

fn seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

impl SessionMetrics {
    /// Derives the summary from the move log and session totals.
    pub fn compute(moves: &[MoveRecord], totals: SessionTotals) -> Self {
        let total_moves = moves.len() as u32;
        let correct_moves = moves.iter().filter(|m| m.on_optimal_path).count() as u32;
        let path_accuracy = if total_moves > 0 {
            correct_moves as f64 / total_moves as f64 * 100.0
        } else {
            0.0
        };

        let reaction_times: Vec<f64> = moves
            .iter()
            .filter_map(|m| m.reaction_time)
            .map(|d| seconds(d).max(0.0))
            .collect();
        let avg_reaction_time = if reaction_times.is_empty() {
            0.0
        } else {
            reaction_times.iter().sum::<f64>() / reaction_times.len() as f64
        };

        let completion_time = seconds(totals.completion_time).max(0.0);
        let remaining_time = (totals.time_limit.num_seconds() - completion_time as i64).max(0) as u64;

        Self {
            won: totals.won,
            completion_time,
            remaining_time,
            total_moves,
            correct_moves,
            path_accuracy,
            avg_reaction_time,
            hints_used: totals.hints_used,
            solution_views: totals.solution_views,
            optimal_path_length: totals.optimal_path_length,
        }
    }
}

/// Flat per-session row for external recorders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    /// Session identifier, `YYYYmmdd_HHMMSS` of creation.
    pub session_id: String,
    /// Player name as entered.
    pub player_name: String,
    /// Difficulty played, serialized as its lower-case name.
    pub difficulty: Difficulty,
    /// Won (true) or lost (false).
    pub completed: bool,
    /// Seconds from start to end.
    pub completion_time: f64,
    /// Accepted moves.
    pub total_moves: u32,
    /// Moves along the optimal path.
    pub correct_moves: u32,
    /// Percentage of moves along the optimal path.
    pub path_accuracy: f64,
    /// Mean seconds between moves.
    pub avg_reaction_time: f64,
    /// Hints given.
    pub hints_used: u32,
    /// Solution reveals.
    pub solution_views: u32,
    /// Cells on the optimal path.
    pub optimal_path_length: usize,
    /// End of session, `YYYY-mm-dd HH:MM:SS`.
    pub timestamp: String,
}

/// Per-move row for external recorders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveDetail {
    /// Session the move belongs to.
    pub session_id: String,
    /// 1-based move number.
    pub move_number: u32,
    /// Whether the move followed the optimal path.
    pub on_optimal_path: bool,
    /// When the move was made.
    pub timestamp: DateTime<Local>,
    /// Seconds since the previous move; 0 for the first.
    pub reaction_time: f64,
}

impl MoveDetail {
    /// Flattens a log entry for `session_id`.
    pub fn from_record(session_id: &str, record: &MoveRecord) -> Self {
        Self {
            session_id: session_id.to_string(),
            move_number: record.sequence,
            on_optimal_path: record.on_optimal_path,
            timestamp: record.timestamp,
            reaction_time: record.reaction_time.map(seconds).unwrap_or(0.0),
        }
    }
}

/// Sink for finished sessions.
pub trait Recorder {
    /// Stores one session summary and its move rows.
    fn record(&mut self, record: &SessionRecord, moves: &[MoveDetail]) -> Result<(), RecordError>;
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    /// Sessions in arrival order.
    pub sessions: Vec<SessionRecord>,
    /// Move rows of every session, in arrival order.
    pub moves: Vec<MoveDetail>,
}

impl Recorder for MemoryRecorder {
    fn record(&mut self, record: &SessionRecord, moves: &[MoveDetail]) -> Result<(), RecordError> {
        self.sessions.push(record.clone());
        self.moves.extend_from_slice(moves);
        Ok(())
    }
}

/// Writes each session as JSON lines: the summary first, then one line per
/// move.
pub struct JsonLinesRecorder<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRecorder<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Recorder for JsonLinesRecorder<W> {
    fn record(&mut self, record: &SessionRecord, moves: &[MoveDetail]) -> Result<(), RecordError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        for detail in moves {
            serde_json::to_writer(&mut self.out, detail)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
