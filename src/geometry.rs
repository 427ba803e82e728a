use std::collections::BTreeSet;
use serde_derive::{Deserialize, Serialize};
use crate::core::{Error, Index, Size};

/// Box (subgrid) shape for a given grid size. Boxes are `box_height` rows by
/// `box_width` columns, and `box_width * box_height == N`; several supported
/// sizes use non-square boxes (6x6 is 3x2, 10x10 is 5x2, 12x12 is 4x3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxGeometry {
    size: Size,
    box_width: usize,
    box_height: usize,
}

impl BoxGeometry {
    /// The box shape for every supported size lives in this one table.
    pub fn of(size: Size) -> Self {
        let (box_width, box_height) = match size {
            Size::Four => (2, 2),
            Size::Six => (3, 2),
            Size::Eight => (4, 2),
            Size::Nine => (3, 3),
            Size::Ten => (5, 2),
            Size::Twelve => (4, 3),
            Size::Sixteen => (4, 4),
        };
        BoxGeometry { size, box_width, box_height }
    }

    pub fn for_dimension(n: usize) -> Result<Self, Error> {
        Size::from_dimension(n).map(BoxGeometry::of)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    pub fn box_width(&self) -> usize {
        self.box_width
    }

    pub fn box_height(&self) -> usize {
        self.box_height
    }

    /// Boxes per band (vertically stacked) and per stack (side by side).
    pub fn box_rows(&self) -> usize {
        self.dimension() / self.box_height
    }

    pub fn box_cols(&self) -> usize {
        self.dimension() / self.box_width
    }

    pub fn boxes(&self) -> usize {
        self.box_rows() * self.box_cols()
    }

    /// Top-left corner of the box containing `index`.
    pub fn box_origin(&self, index: Index) -> Index {
        [
            index[0] - index[0] % self.box_height,
            index[1] - index[1] % self.box_width,
        ]
    }

    /// Which box an index is in, along with the coordinates within that box.
    pub fn to_box_coords(&self, index: Index) -> (usize, Index) {
        (
            self.box_cols() * (index[0] / self.box_height) + index[1] / self.box_width,
            [index[0] % self.box_height, index[1] % self.box_width],
        )
    }

    /// Given a box number and coordinates within it, the grid index.
    pub fn from_box_coords(&self, box_number: usize, index: Index) -> Index {
        [
            (box_number / self.box_cols()) * self.box_height + index[0],
            (box_number % self.box_cols()) * self.box_width + index[1],
        ]
    }

    pub fn row_iter(&self, r: usize) -> PeerIterator {
        PeerIterator::row(self, r)
    }

    pub fn others_in_row(&self, cell: Index) -> PeerIterator {
        PeerIterator::others_in_row(self, cell)
    }

    pub fn col_iter(&self, c: usize) -> PeerIterator {
        PeerIterator::col(self, c)
    }

    pub fn others_in_col(&self, cell: Index) -> PeerIterator {
        PeerIterator::others_in_col(self, cell)
    }

    pub fn box_iter(&self, b: usize) -> PeerIterator {
        PeerIterator::box_(self, b)
    }

    pub fn others_in_box(&self, cell: Index) -> PeerIterator {
        PeerIterator::others_in_box(self, cell)
    }

    /// Every cell sharing a row, column, or box with `cell`, excluding the
    /// cell itself, deduplicated. This is the set an interactive host
    /// highlights when a cell is selected.
    pub fn peers(&self, cell: Index) -> BTreeSet<Index> {
        let mut set: BTreeSet<Index> = self.others_in_row(cell).collect();
        set.extend(self.others_in_col(cell));
        set.extend(self.others_in_box(cell));
        set
    }
}

enum PeerIteratorState {
    Row(usize, Option<Index>, usize),
    Col(usize, Option<Index>, usize),
    Box(usize, Option<Index>, usize, usize),
}

/// Streams the cells of one row, column, or box, optionally skipping a cell.
pub struct PeerIterator<'a> {
    geometry: &'a BoxGeometry,
    state: PeerIteratorState,
}

impl<'a> PeerIterator<'a> {
    fn row(geometry: &'a BoxGeometry, r: usize) -> Self {
        Self { geometry, state: PeerIteratorState::Row(r, None, 0) }
    }

    fn others_in_row(geometry: &'a BoxGeometry, cell: Index) -> Self {
        Self { geometry, state: PeerIteratorState::Row(cell[0], Some(cell), 0) }
    }

    fn col(geometry: &'a BoxGeometry, c: usize) -> Self {
        Self { geometry, state: PeerIteratorState::Col(c, None, 0) }
    }

    fn others_in_col(geometry: &'a BoxGeometry, cell: Index) -> Self {
        Self { geometry, state: PeerIteratorState::Col(cell[1], Some(cell), 0) }
    }

    fn box_(geometry: &'a BoxGeometry, b: usize) -> Self {
        Self { geometry, state: PeerIteratorState::Box(b, None, 0, 0) }
    }

    fn others_in_box(geometry: &'a BoxGeometry, cell: Index) -> Self {
        let (b, box_index) = geometry.to_box_coords(cell);
        Self { geometry, state: PeerIteratorState::Box(b, Some(box_index), 0, 0) }
    }
}

impl<'a> Iterator for PeerIterator<'a> {
    type Item = Index;
    fn next(&mut self) -> Option<Self::Item> {
        let n = self.geometry.dimension();
        let ret: Index;
        match self.state {
            PeerIteratorState::Row(r, skip, c) => {
                if c >= n {
                    return None;
                }
                if let Some(skip_index) = skip {
                    if skip_index[1] == c {
                        self.state = PeerIteratorState::Row(r, skip, c + 1);
                        return self.next();
                    }
                }
                ret = [r, c];
                self.state = PeerIteratorState::Row(r, skip, c + 1);
            }
            PeerIteratorState::Col(c, skip, r) => {
                if r >= n {
                    return None;
                }
                if let Some(skip_index) = skip {
                    if skip_index[0] == r {
                        self.state = PeerIteratorState::Col(c, skip, r + 1);
                        return self.next();
                    }
                }
                ret = [r, c];
                self.state = PeerIteratorState::Col(c, skip, r + 1);
            }
            PeerIteratorState::Box(b, skip, br, bc) => {
                let (bh, bw) = (self.geometry.box_height(), self.geometry.box_width());
                if br >= bh {
                    return None;
                }
                let advanced = if bc + 1 == bw {
                    PeerIteratorState::Box(b, skip, br + 1, 0)
                } else {
                    PeerIteratorState::Box(b, skip, br, bc + 1)
                };
                if let Some(skip_index) = skip {
                    if skip_index[0] == br && skip_index[1] == bc {
                        self.state = advanced;
                        return self.next();
                    }
                }
                ret = self.geometry.from_box_coords(b, [br, bc]);
                self.state = advanced;
            }
        }
        Some(ret)
    }
}
