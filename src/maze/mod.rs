//! Maze grid, generation and pathfinding.
//!
//! The [`Grid`] is a plain matrix of wall / open cells. [`generator`] carves a
//! perfect maze into it and [`pathfinding`] finds shortest routes across it.
//! Grids can be written to and read from the same `#`-for-wall text form the
//! saved maze files use.

pub mod generator;
pub mod pathfinding;

use crate::error::MazeError;
use std::fmt;

/// A cell of the grid, addressed by column and row (both 0-indexed).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column index of the cell (x).
    pub col: usize,
    /// Row index of the cell (y).
    pub row: usize,
}

impl Cell {
    /// Creates a new Cell at the given column and row
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(self, other: Cell) -> usize {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// Whether `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }

    /// Applies a signed offset, returning `None` if it would go below zero.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Cell> {
        let col = self.col.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Cell::new(col, row))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// One of the four orthogonal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// All directions, in the order neighbours are explored.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
    ];

    /// The `(dx, dy)` step for this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Maps a raw step back to a direction. Anything other than a single
    /// orthogonal unit step yields `None`.
    pub fn from_delta(dx: isize, dy: isize) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// The direction that leads from `from` to the adjacent cell `to`.
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        let dx = to.col as isize - from.col as isize;
        let dy = to.row as isize - from.row as isize;
        Self::from_delta(dx, dy)
    }
}

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Impassable.
    Wall,
    /// Walkable passage.
    Open,
}

/// Rectangular wall / passage matrix with fixed, positive dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of the given size with every cell a wall.
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        let invalid = MazeError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let len = width.checked_mul(height).ok_or(invalid)?;
        Ok(Self {
            width,
            height,
            cells: vec![CellState::Wall; len],
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col < self.width && cell.row < self.height
    }

    fn idx(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// State of the cell, or `None` when out of bounds.
    pub fn get(&self, cell: Cell) -> Option<CellState> {
        if self.contains(cell) {
            Some(self.cells[self.idx(cell)])
        } else {
            None
        }
    }

    /// Whether the cell is in bounds and walkable.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.get(cell) == Some(CellState::Open)
    }

    /// Whether the cell is a wall. Out-of-bounds cells count as walls.
    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.is_open(cell)
    }

    /// Sets a cell's state. Out-of-bounds cells are ignored.
    pub fn set(&mut self, cell: Cell, state: CellState) {
        if self.contains(cell) {
            let idx = self.idx(cell);
            self.cells[idx] = state;
        }
    }

    /// Opens a cell.
    pub fn set_open(&mut self, cell: Cell) {
        self.set(cell, CellState::Open);
    }

    /// The in-bounds cell one step from `cell` in `direction`, if any.
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.delta();
        cell.offset(dx, dy).filter(|next| self.contains(*next))
    }

    /// Open orthogonal neighbours of `cell`, in [`Direction::ALL`] order.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(cell, dir))
            .filter(|next| self.is_open(*next))
    }

    /// Every open cell in row-major order.
    pub fn open_cells(&self) -> Vec<Cell> {
        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| Cell::new(col, row)))
            .filter(|cell| self.is_open(*cell))
            .collect()
    }

    /// Number of open cells.
    pub fn open_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| **state == CellState::Open)
            .count()
    }

    /// Parses the text form written by this type's `Display` impl.
    ///
    /// Each line is a row. `#` becomes a wall; any other character is an open
    /// cell. Blank trailing lines are ignored, but all rows must share one
    /// width.
    ///
    /// # Example
    /// ```text
    /// # #
    /// #··
    /// ```
    /// (with `·` standing for a space)
    /// is a 3x2 grid with (1,0), (1,1) and (2,1) open.
    pub fn from_ascii(text: &str) -> Result<Self, MazeError> {
        let mut rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        while rows.last().is_some_and(|line| line.is_empty()) {
            rows.pop();
        }

        let height = rows.len();
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        let mut grid = Grid::new(width, height)?;

        for (row_idx, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(MazeError::InvalidDimensions {
                    width: line.chars().count(),
                    height,
                });
            }
            for (col_idx, c) in line.chars().enumerate() {
                if c != '#' {
                    grid.set_open(Cell::new(col_idx, row_idx));
                }
            }
        }

        Ok(grid)
    }

    /// Text snapshot of the grid with play overlays.
    ///
    /// Priority per cell: player `@`, exit `X`, hint `*`, path `.`, then the
    /// plain wall / passage glyph.
    pub fn render_with(
        &self,
        path: Option<&[Cell]>,
        player: Option<Cell>,
        exit: Option<Cell>,
        hint: Option<Cell>,
    ) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = Cell::new(col, row);
                let glyph = if Some(cell) == player {
                    '@'
                } else if Some(cell) == exit {
                    'X'
                } else if Some(cell) == hint {
                    '*'
                } else if path.is_some_and(|p| p.contains(&cell)) {
                    '.'
                } else if self.is_open(cell) {
                    ' '
                } else {
                    '#'
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(None, None, None, None))
    }
}
