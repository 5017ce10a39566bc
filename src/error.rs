//! Error types shared across the crate.
//!
//! Invalid moves and exhausted hints are ordinary game outcomes and never show
//! up here. These types cover the genuinely fatal cases: a grid that cannot
//! exist, a maze with nowhere to put an exit, a session with no route, or a
//! configuration / recorder failure at the edges.

use crate::maze::Cell;
use derive_more::{Display, Error};

/// Failures while building a maze or preparing a session over it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MazeError {
    /// Width or height was zero.
    #[display("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The entrance is the only open cell, so no exit can be placed.
    #[display("maze has no open cell besides the entrance to place an exit on")]
    NoExitCandidate,
    /// The pathfinder could not connect the two cells.
    #[display("no path from {from} to {to}")]
    NoPath {
        /// Route start.
        from: Cell,
        /// Route end.
        to: Cell,
    },
    /// A path handed to a session does not describe an entrance-to-exit route.
    #[display("invalid optimal path: {reason}")]
    InvalidPath {
        /// What was wrong with it.
        reason: String,
    },
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::new(format!("TOML parse error: {}", err))
    }
}

impl From<std::io::Error> for ConfigError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

/// Failure reported by a [`Recorder`](crate::game::record::Recorder).
#[derive(Debug, Clone, Display, Error)]
#[display("Record error: {}", message)]
pub struct RecordError {
    /// Error message.
    pub message: String,
}

impl RecordError {
    /// Creates a new record error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("serialization error: {}", err))
    }
}
