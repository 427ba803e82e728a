use std::collections::BTreeSet;
use serde_derive::{Deserialize, Serialize};
use crate::core::{Grid, Index};
use crate::geometry::BoxGeometry;

/// Whether placing `value` at `index` would conflict with any filled peer.
/// The cell's own current content is ignored, so this answers "may I write
/// this here", including overwrites. Scans stop at the first conflict.
pub fn is_legal(grid: &Grid, index: Index, value: u8) -> bool {
    let geometry = BoxGeometry::of(grid.size());
    geometry
        .others_in_row(index)
        .chain(geometry.others_in_col(index))
        .chain(geometry.others_in_box(index))
        .all(|peer| grid.get(peer) != Some(value))
}

/// Every filled peer of `index` holding `value`. Empty means the placement
/// is legal.
pub fn conflicts_for(grid: &Grid, index: Index, value: u8) -> BTreeSet<Index> {
    let geometry = BoxGeometry::of(grid.size());
    geometry
        .others_in_row(index)
        .chain(geometry.others_in_col(index))
        .chain(geometry.others_in_box(index))
        .filter(|&peer| grid.get(peer) == Some(value))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub legal: bool,
    pub conflicts: BTreeSet<Index>,
}

/// Judges a candidate value for a cell against its peers, bundling
/// [`is_legal`]'s verdict with [`conflicts_for`]'s evidence.
pub fn validate_cell(grid: &Grid, index: Index, value: u8) -> CellReport {
    let conflicts = conflicts_for(grid, index, value);
    CellReport { legal: conflicts.is_empty(), conflicts }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridReport {
    pub valid: bool,
    pub conflicts: BTreeSet<Index>,
}

/// Checks every filled cell against its peers. Both members of a conflicting
/// pair appear in the report, since each sees the other as a peer.
pub fn validate_grid(grid: &Grid) -> GridReport {
    let n = grid.dimension();
    let mut conflicts = BTreeSet::new();
    for r in 0..n {
        for c in 0..n {
            if let Some(value) = grid.get([r, c]) {
                if !is_legal(grid, [r, c], value) {
                    conflicts.insert([r, c]);
                }
            }
        }
    }
    GridReport { valid: conflicts.is_empty(), conflicts }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_util {
    use super::*;

    /// Panics unless `grid` is completely filled and conflict-free.
    pub fn assert_solved(grid: &Grid) {
        assert!(grid.is_complete(), "grid has empty cells:\n{}", grid);
        let report = validate_grid(grid);
        assert!(
            report.valid,
            "grid has conflicts at {:?}:\n{}",
            report.conflicts, grid,
        );
    }

    /// Panics unless every filled cell of `grid` is conflict-free.
    pub fn assert_valid(grid: &Grid) {
        let report = validate_grid(grid);
        assert!(
            report.valid,
            "grid has conflicts at {:?}:\n{}",
            report.conflicts, grid,
        );
    }
}
