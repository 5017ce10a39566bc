//! Minotaur - timed maze runs with route scoring
//!
//! The crate builds a random perfect maze, solves it from the top-left
//! entrance to a far exit, and runs a 30-second session in which every move
//! is scored against that shortest route.
//!
//! # Architecture
//! - `maze/`: the grid, the depth-first carver and the A* solver
//! - `game/`: the session state machine, hints, timer, input mapping,
//!   records and a scripted autopilot
//! - `config`: difficulty levels and TOML settings
//! - `error`: error types
//!
//! The library never reads a clock, a device or a file on its own: callers
//! pass the current time into every event and hand finished sessions to a
//! [`Recorder`](game::record::Recorder).

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod game;
pub mod maze;
