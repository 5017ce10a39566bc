//! Maze generation using randomized depth-first backtracking.
//!
//! Anchor cells sit on even coordinates, two grid steps apart. The carver
//! walks from anchor to anchor, opening the anchor and the wall cell between
//! the two, and backtracks when an anchor has no unvisited neighbours left.
//! Every anchor is reached exactly once, so the open cells form a spanning
//! tree: a *perfect* maze with exactly one simple path between any two open
//! cells.
//!
//! When a dimension is even, the last row or column holds no anchors and is
//! left entirely as wall.
//!
//! # Examples
//!
//! ```rust
//! use minotaur::maze::generator::MazeGenerator;
//!
//! let mut generator = MazeGenerator::new(10, 10, Some(7)).unwrap();
//!
//! // Carve the maze step by step
//! while !generator.is_complete() {
//!     generator.step();
//! }
//!
//! let grid = generator.into_grid();
//! assert!(grid.is_open(minotaur::maze::Cell::new(0, 0)));
//! ```

use super::{Cell, Direction, Grid};
use crate::error::MazeError;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

/// Randomized depth-first maze carver.
pub struct MazeGenerator {
    grid: Grid,
    rng: StdRng,
    stack: Vec<Cell>,
    anchors_visited: usize,
    total_anchors: usize,
}

impl MazeGenerator {
    /// Creates a generator for a `width` x `height` grid.
    ///
    /// The entrance `(0, 0)` is opened immediately. With `Some(seed)` the
    /// carving is fully deterministic; with `None` the RNG is seeded from
    /// entropy.
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Result<Self, MazeError> {
        let mut grid = Grid::new(width, height)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let entrance = Cell::new(0, 0);
        grid.set_open(entrance);

        Ok(Self {
            grid,
            rng,
            stack: vec![entrance],
            anchors_visited: 1,
            total_anchors: width.div_ceil(2) * height.div_ceil(2),
        })
    }

    /// Performs one step of carving.
    ///
    /// Returns `true` if a new passage was opened, `false` if the step
    /// backtracked or generation was already complete.
    pub fn step(&mut self) -> bool {
        let Some(&current) = self.stack.last() else {
            return false;
        };

        let candidates: Vec<(Cell, Cell)> = Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                let wall = self.grid.neighbor(current, dir)?;
                let anchor = self.grid.neighbor(wall, dir)?;
                self.grid.is_wall(anchor).then_some((wall, anchor))
            })
            .collect();

        match candidates.choose(&mut self.rng) {
            Some(&(wall, anchor)) => {
                self.grid.set_open(wall);
                self.grid.set_open(anchor);
                self.stack.push(anchor);
                self.anchors_visited += 1;
                true
            }
            None => {
                self.stack.pop();
                false
            }
        }
    }

    /// Checks if maze generation is complete
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of anchor cells carved so far.
    pub fn anchors_visited(&self) -> usize {
        self.anchors_visited
    }

    /// Returns the current progress of generation (anchors visited, total anchors)
    pub fn progress(&self) -> (usize, usize) {
        (self.anchors_visited, self.total_anchors)
    }

    /// Returns the generation progress as a ratio (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f32 {
        if self.is_complete() {
            1.0
        } else {
            self.anchors_visited as f32 / self.total_anchors as f32
        }
    }

    /// Read-only view of the grid as carved so far.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Runs any remaining steps and hands back the finished grid.
    pub fn into_grid(mut self) -> Grid {
        while !self.is_complete() {
            self.step();
        }
        self.grid
    }
}

/// Generates a complete perfect maze in one call.
#[instrument]
pub fn generate(width: usize, height: usize, seed: Option<u64>) -> Result<Grid, MazeError> {
    let generator = MazeGenerator::new(width, height, seed)?;
    let grid = generator.into_grid();
    info!(
        width,
        height,
        open_cells = grid.open_count(),
        "Maze generated"
    );
    Ok(grid)
}

/// Picks an exit cell for a maze entered at `entrance`.
///
/// Prefers open cells at least `min_distance` Manhattan steps from the
/// entrance; if none are that far, any other open cell will do.
///
/// # Errors
/// [`MazeError::NoExitCandidate`] when the entrance is the only open cell.
#[instrument(skip(grid, rng))]
pub fn choose_exit<R: Rng + ?Sized>(
    grid: &Grid,
    entrance: Cell,
    min_distance: usize,
    rng: &mut R,
) -> Result<Cell, MazeError> {
    let candidates: Vec<Cell> = grid
        .open_cells()
        .into_iter()
        .filter(|cell| *cell != entrance)
        .collect();

    let far: Vec<Cell> = candidates
        .iter()
        .copied()
        .filter(|cell| cell.manhattan(entrance) >= min_distance)
        .collect();

    let pool = if far.is_empty() {
        debug!(min_distance, "No far cell available, falling back to any open cell");
        &candidates
    } else {
        &far
    };

    let exit = pool.choose(rng).copied().ok_or(MazeError::NoExitCandidate)?;
    debug!(%exit, "Exit chosen");
    Ok(exit)
}
