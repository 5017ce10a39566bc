//! Next-step hints drawn from the optimal path.

use crate::maze::Cell;
use crate::maze::pathfinding::Path;
use tracing::debug;

/// Hints left to spend in a session. Only ever counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintBudget {
    remaining: u32,
}

impl HintBudget {
    /// A budget holding `hints` hints.
    pub fn new(hints: u32) -> Self {
        Self { remaining: hints }
    }

    /// Hints left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether no hints are left.
    pub fn is_depleted(&self) -> bool {
        self.remaining == 0
    }

    /// Spends one hint; returns false if none were left.
    fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Result of asking for a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// The cell to head for next.
    Next(Cell),
    /// No hints remaining.
    Depleted,
}

/// Works out where the player should go from `current`.
///
/// On the path, that is the following path cell. Anywhere else (including
/// the exit itself, which has no successor) the hint points at the start of
/// the path, even when that lies behind the player.
///
/// A successful hint costs one unit of `budget`; a depleted budget is left
/// untouched.
pub fn next_hint(current: Cell, optimal_path: &Path, budget: &mut HintBudget) -> Hint {
    if !budget.try_consume() {
        return Hint::Depleted;
    }

    let target = optimal_path
        .step_after(current)
        .unwrap_or_else(|| optimal_path.first());
    debug!(%current, %target, remaining = budget.remaining(), "Hint issued");
    Hint::Next(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Path {
        Path::new(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(2, 1),
        ])
        .unwrap()
    }

    #[test]
    fn three_hints_then_depleted() {
        let path = path();
        let mut budget = HintBudget::new(3);
        for expected_left in [2, 1, 0] {
            assert!(matches!(
                next_hint(Cell::new(0, 0), &path, &mut budget),
                Hint::Next(_)
            ));
            assert_eq!(budget.remaining(), expected_left);
        }
        assert_eq!(next_hint(Cell::new(0, 0), &path, &mut budget), Hint::Depleted);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn on_path_hint_points_forward() {
        let mut budget = HintBudget::new(5);
        assert_eq!(
            next_hint(Cell::new(1, 0), &path(), &mut budget),
            Hint::Next(Cell::new(2, 0))
        );
        assert_eq!(
            next_hint(Cell::new(2, 0), &path(), &mut budget),
            Hint::Next(Cell::new(2, 1))
        );
    }

    #[test]
    fn off_path_hint_falls_back_to_path_start() {
        let mut budget = HintBudget::new(2);
        assert_eq!(
            next_hint(Cell::new(7, 7), &path(), &mut budget),
            Hint::Next(Cell::new(0, 0))
        );
        // The exit has no successor either.
        assert_eq!(
            next_hint(Cell::new(2, 1), &path(), &mut budget),
            Hint::Next(Cell::new(0, 0))
        );
    }

    #[test]
    fn empty_budget_is_depleted_immediately() {
        let mut budget = HintBudget::new(0);
        assert!(budget.is_depleted());
        assert_eq!(next_hint(Cell::new(0, 0), &path(), &mut budget), Hint::Depleted);
    }
}
