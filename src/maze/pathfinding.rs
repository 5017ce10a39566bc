//! Shortest-path search over a [`Grid`].
//!
//! A* with the Manhattan heuristic, which is admissible and consistent for
//! 4-directional unit-cost moves, so the first time the destination leaves
//! the frontier its route is optimal.
//!
//! The frontier is a binary heap without decrease-key: an improved route to a
//! cell pushes a fresh entry, and entries whose cost no longer matches the
//! best known `g` are discarded when popped.

use super::{Cell, Grid};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, instrument};

/// An ordered route of adjacent open cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// Wraps a cell sequence. Returns `None` for an empty sequence.
    pub fn new(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// The cells in travel order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells on the route, both endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a path holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the route.
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    /// Route start.
    pub fn first(&self) -> Cell {
        self.cells[0]
    }

    /// Route end.
    pub fn last(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Whether the cell lies on the route.
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// The cell that follows `cell` on the route, if `cell` is on it and is
    /// not the last one.
    pub fn step_after(&self, cell: Cell) -> Option<Cell> {
        self.cells
            .windows(2)
            .find(|pair| pair[0] == cell)
            .map(|pair| pair[1])
    }

    /// Whether `from -> to` is one of the route's consecutive pairs.
    pub fn is_transition(&self, from: Cell, to: Cell) -> bool {
        self.cells
            .windows(2)
            .any(|pair| pair[0] == from && pair[1] == to)
    }

    /// Checks the path invariants against a grid: every cell open, every
    /// consecutive pair adjacent, no cell repeated.
    pub fn is_valid_on(&self, grid: &Grid) -> bool {
        let mut seen = HashSet::with_capacity(self.cells.len());
        self.cells.iter().all(|cell| grid.is_open(*cell) && seen.insert(*cell))
            && self
                .cells
                .windows(2)
                .all(|pair| pair[0].is_adjacent(pair[1]))
    }
}

/// Manhattan distance heuristic.
pub fn heuristic(a: Cell, b: Cell) -> usize {
    a.manhattan(b)
}

/// Finds a shortest route from `source` to `destination`.
///
/// Returns `None` if either endpoint is off the grid or a wall, or if no
/// route connects them. A request from a cell to itself yields the one-cell
/// path.
#[instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn find_path(grid: &Grid, source: Cell, destination: Cell) -> Option<Path> {
    if !grid.is_open(source) || !grid.is_open(destination) {
        debug!("Endpoint is not an open cell");
        return None;
    }

    // (f, insertion sequence, g, cell); the sequence keeps equal-f pops FIFO.
    let mut open_set: BinaryHeap<Reverse<(usize, u64, usize, Cell)>> = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut g_score: HashMap<Cell, usize> = HashMap::from([(source, 0)]);
    let mut closed: HashSet<Cell> = HashSet::new();
    let mut sequence = 0u64;

    open_set.push(Reverse((heuristic(source, destination), sequence, 0, source)));

    while let Some(Reverse((_, _, g, current))) = open_set.pop() {
        if g > g_score.get(&current).copied().unwrap_or(usize::MAX) || !closed.insert(current) {
            continue;
        }

        if current == destination {
            let path = reconstruct(&came_from, source, destination);
            debug!(length = path.len(), expanded = closed.len(), "Path found");
            return Path::new(path);
        }

        for neighbor in grid.open_neighbors(current) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative_g = g + 1;
            if tentative_g < g_score.get(&neighbor).copied().unwrap_or(usize::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g);
                sequence += 1;
                let f = tentative_g + heuristic(neighbor, destination);
                open_set.push(Reverse((f, sequence, tentative_g, neighbor)));
            }
        }
    }

    debug!(expanded = closed.len(), "Frontier exhausted without reaching destination");
    None
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, source: Cell, destination: Cell) -> Vec<Cell> {
    let mut path = vec![destination];
    let mut current = destination;
    while current != source {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
