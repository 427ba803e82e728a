use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use serde_derive::{Deserialize, Serialize};
use crate::core::{CandidateSet, Error, Grid, Index};
use crate::geometry::BoxGeometry;
use crate::validate;

/// Shared handle for aborting an in-flight solve from another thread. Cheap
/// to clone; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a solve ended. Exhausting the search space and being cancelled are
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    Solved(Grid),
    Unsatisfiable,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Cells chosen for branching, including forced ones.
    pub steps: usize,
    /// Times a chosen cell ran out of values and the search retreated.
    pub backtracks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub stats: SolveStats,
}

/// Finds the first solution of `grid` in deterministic order, or reports
/// that none exists. The input grid is never modified.
pub fn solve(grid: &Grid) -> SolveOutcome {
    solve_with(grid, None).outcome
}

/// Like [`solve`], but aborts with [`SolveOutcome::Cancelled`] once `cancel`
/// is raised. The flag is polled at every branching step, so long searches
/// stop promptly.
pub fn solve_cancellable(grid: &Grid, cancel: &CancelFlag) -> SolveOutcome {
    solve_with(grid, Some(cancel)).outcome
}

/// Full-fat entry point: optional cancellation plus search statistics.
pub fn solve_with(grid: &Grid, cancel: Option<&CancelFlag>) -> SolveReport {
    let mut search = Search {
        grid: grid.clone(),
        geometry: BoxGeometry::of(grid.size()),
        cancel,
        stats: SolveStats::default(),
    };
    let outcome = match search.descend() {
        Descent::Filled => SolveOutcome::Solved(search.grid),
        Descent::Exhausted => SolveOutcome::Unsatisfiable,
        Descent::Cancelled => SolveOutcome::Cancelled,
    };
    SolveReport { outcome, stats: search.stats }
}

/// Like [`solve`], but first rejects grids whose given values already
/// conflict. A clean but unsolvable grid is still `Ok(Unsatisfiable)`.
pub fn solve_checked(grid: &Grid) -> Result<SolveOutcome, Error> {
    let report = validate::validate_grid(grid);
    if !report.valid {
        return Err(Error::PreexistingConflict(report.conflicts));
    }
    Ok(solve(grid))
}

enum Descent {
    Filled,
    Exhausted,
    Cancelled,
}

struct Search<'a> {
    grid: Grid,
    geometry: BoxGeometry,
    cancel: Option<&'a CancelFlag>,
    stats: SolveStats,
}

impl<'a> Search<'a> {
    /// Values still legal at an empty cell.
    fn candidates(&self, index: Index) -> CandidateSet {
        let mut set = CandidateSet::all(self.grid.size());
        for peer in self
            .geometry
            .others_in_row(index)
            .chain(self.geometry.others_in_col(index))
            .chain(self.geometry.others_in_box(index))
        {
            if let Some(value) = self.grid.get(peer) {
                set.remove(value);
            }
        }
        set
    }

    /// The most constrained empty cell, in row-major order among ties. A
    /// cell with one candidate is forced and a cell with none is a dead
    /// end, so either ends the scan immediately.
    fn select_cell(&self) -> Option<(Index, CandidateSet)> {
        let n = self.grid.dimension();
        let mut best: Option<(Index, CandidateSet)> = None;
        for r in 0..n {
            for c in 0..n {
                if self.grid.get([r, c]).is_some() {
                    continue;
                }
                let candidates = self.candidates([r, c]);
                if candidates.len() <= 1 {
                    return Some(([r, c], candidates));
                }
                if best.as_ref().map_or(true, |(_, b)| candidates.len() < b.len()) {
                    best = Some(([r, c], candidates));
                }
            }
        }
        best
    }

    fn descend(&mut self) -> Descent {
        if self.cancel.is_some_and(|flag| flag.is_cancelled()) {
            return Descent::Cancelled;
        }
        let (index, candidates) = match self.select_cell() {
            Some(choice) => choice,
            None => return Descent::Filled,
        };
        self.stats.steps += 1;
        for value in candidates.iter() {
            self.grid.put(index, Some(value));
            match self.descend() {
                Descent::Exhausted => self.grid.put(index, None),
                done => return done,
            }
        }
        self.stats.backtracks += 1;
        Descent::Exhausted
    }
}
