use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display};
use bit_set::BitSet;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde_derive::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Error type for grid construction and mutation. Unsolvability and
/// cancellation are not errors; they are ordinary solve outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested dimension has no box decomposition we support.
    UnsupportedSize(usize),
    /// A row-major input had the wrong number of rows or row length.
    ShapeMismatch { expected: usize, found: usize },
    /// A cell value outside 1..=N for the grid's N.
    ValueOutOfRange { value: u8, limit: u8 },
    /// An index outside the grid.
    OutOfBounds(Index),
    /// A grid handed to `solve_checked` already contains duplicates.
    PreexistingConflict(BTreeSet<Index>),
    /// Malformed grid text.
    Parse(Cow<'static, str>),
}

impl Error {
    pub fn parse<S: Into<String>>(s: S) -> Self {
        Error::Parse(Cow::Owned(s.into()))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedSize(n) => {
                write!(f, "unsupported grid size {0}x{0}", n)
            }
            Error::ShapeMismatch { expected, found } => {
                write!(f, "expected {} rows/cells, found {}", expected, found)
            }
            Error::ValueOutOfRange { value, limit } => {
                write!(f, "value {} out of range 1..={}", value, limit)
            }
            Error::OutOfBounds(index) => {
                write!(f, "index {:?} out of bounds", index)
            }
            Error::PreexistingConflict(positions) => {
                write!(f, "grid already has conflicts at {:?}", positions)
            }
            Error::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Cells are addressed as [row, col], 0-indexed, row-major.
pub type Index = [usize; 2];

/// The supported grid dimensions. The discriminant is the dimension itself,
/// so the `TryFrom<u8>` derived here is the one gate that rejects
/// unsupported sizes before any solving work happens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    IntoPrimitive, TryFromPrimitive, EnumIter, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Size {
    Four = 4,
    Six = 6,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Twelve = 12,
    Sixteen = 16,
}

impl Size {
    pub fn from_dimension(n: usize) -> Result<Size, Error> {
        u8::try_from(n)
            .ok()
            .and_then(|b| Size::try_from(b).ok())
            .ok_or(Error::UnsupportedSize(n))
    }

    /// Number of rows (= columns = distinct values) in a grid of this size.
    pub fn dimension(self) -> usize {
        u8::from(self) as usize
    }

    /// Largest legal cell value; values range over 1..=max_value().
    pub fn max_value(self) -> u8 {
        u8::from(self)
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.dimension())
    }
}

/// Set of still-possible values for a cell, bit v-1 standing for value v.
/// Only used transiently during candidate counting and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    s: BitSet,
}

impl CandidateSet {
    pub fn none(size: Size) -> Self {
        CandidateSet { s: BitSet::with_capacity(size.dimension()) }
    }

    pub fn all(size: Size) -> Self {
        let mut set = Self::none(size);
        for v in 1..=size.max_value() {
            set.insert(v);
        }
        set
    }

    pub fn insert(&mut self, value: u8) {
        self.s.insert((value - 1) as usize);
    }

    pub fn remove(&mut self, value: u8) {
        self.s.remove((value - 1) as usize);
    }

    pub fn contains(&self, value: u8) -> bool {
        self.s.contains((value - 1) as usize)
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.s.iter().map(|bit| (bit + 1) as u8)
    }
}

/// An N x N grid of cells, each empty or holding a value in 1..=N. The grid
/// is a plain value: callers own it, and the solver only ever works on a
/// private clone.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    size: Size,
    cells: Box<[Option<u8>]>,
}

/// Unchecked mirror of [`Grid`] for deserialization; converting it into a
/// real grid re-runs the constructor checks, so hostile input cannot build
/// a grid with a short cell buffer or out-of-range values.
#[derive(Deserialize)]
struct RawGrid {
    size: Size,
    cells: Vec<Option<u8>>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self, Error> {
        let n = raw.size.dimension();
        if raw.cells.len() != n * n {
            return Err(Error::ShapeMismatch {
                expected: n * n,
                found: raw.cells.len(),
            });
        }
        let mut grid = Grid::new(raw.size);
        for (i, &value) in raw.cells.iter().enumerate() {
            if value.is_some() {
                grid.set([i / n, i % n], value)?;
            }
        }
        Ok(grid)
    }
}

impl Grid {
    pub fn new(size: Size) -> Self {
        let n = size.dimension();
        Grid { size, cells: vec![None; n * n].into_boxed_slice() }
    }

    /// Entry point for callers holding a raw dimension; anything outside the
    /// supported set fails with `UnsupportedSize` here, never mid-solve.
    pub fn with_dimension(n: usize) -> Result<Self, Error> {
        Size::from_dimension(n).map(Grid::new)
    }

    /// Builds a grid from row-major rows of small integers, 0 meaning empty.
    /// This is the representation embedding hosts usually hold.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, Error> {
        let size = Size::from_dimension(rows.len())?;
        let mut grid = Grid::new(size);
        let n = size.dimension();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::ShapeMismatch { expected: n, found: row.len() });
            }
            for (c, &value) in row.iter().enumerate() {
                if value != 0 {
                    grid.set([r, c], Some(value))?;
                }
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    /// Value at `index`, or None if the cell is empty or out of bounds.
    pub fn get(&self, index: Index) -> Option<u8> {
        let n = self.dimension();
        if index[0] >= n || index[1] >= n {
            return None;
        }
        self.cells[index[0] * n + index[1]]
    }

    pub fn set(&mut self, index: Index, value: Option<u8>) -> Result<(), Error> {
        let n = self.dimension();
        if index[0] >= n || index[1] >= n {
            return Err(Error::OutOfBounds(index));
        }
        if let Some(v) = value {
            if v < 1 || v > self.size.max_value() {
                return Err(Error::ValueOutOfRange {
                    value: v,
                    limit: self.size.max_value(),
                });
            }
        }
        self.cells[index[0] * n + index[1]] = value;
        Ok(())
    }

    // In-bounds, in-range writes on the search hot path.
    pub(crate) fn put(&mut self, index: Index, value: Option<u8>) {
        let n = self.dimension();
        debug_assert!(index[0] < n && index[1] < n);
        self.cells[index[0] * n + index[1]] = value;
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Row-major rows of small integers, 0 meaning empty; the inverse of
    /// `from_rows`.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let n = self.dimension();
        (0..n)
            .map(|r| (0..n).map(|c| self.get([r, c]).unwrap_or(0)).collect())
            .collect()
    }

    /// Parses grid text: one line per row. Rows containing whitespace are
    /// split into tokens (`.` or `0` for empty); otherwise each character is
    /// one cell (`.` for empty). The character form only reaches 9, so
    /// larger sizes use the token form.
    pub fn parse(s: &str, size: Size) -> Result<Self, Error> {
        let n = size.dimension();
        let lines: Vec<&str> = s.lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != n {
            return Err(Error::ShapeMismatch { expected: n, found: lines.len() });
        }
        let mut grid = Grid::new(size);
        for (r, line) in lines.iter().enumerate() {
            if line.contains(char::is_whitespace) {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() != n {
                    return Err(Error::ShapeMismatch { expected: n, found: tokens.len() });
                }
                for (c, token) in tokens.iter().enumerate() {
                    if *token == "." || *token == "0" {
                        continue;
                    }
                    let value = token.parse::<u8>()
                        .map_err(|_| Error::parse(format!("bad cell token {:?}", token)))?;
                    grid.set([r, c], Some(value))?;
                }
            } else {
                if line.chars().count() != n {
                    return Err(Error::ShapeMismatch {
                        expected: n,
                        found: line.chars().count(),
                    });
                }
                for (c, ch) in line.chars().enumerate() {
                    if ch == '.' {
                        continue;
                    }
                    let value = ch.to_digit(10)
                        .ok_or_else(|| Error::parse(format!("bad cell character {:?}", ch)))?;
                    grid.set([r, c], Some(value as u8))?;
                }
            }
        }
        Ok(grid)
    }

    pub fn serialize(&self) -> String {
        let mut result = String::new();
        let n = self.dimension();
        let compact = n <= 9;
        for r in 0..n {
            for c in 0..n {
                if !compact && c > 0 {
                    result.push(' ');
                }
                match self.get([r, c]) {
                    Some(v) => result.push_str(&v.to_string()),
                    None => result.push('.'),
                }
            }
            result.push('\n');
        }
        result
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.size, self.serialize())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_size_gate() {
        assert_eq!(Size::from_dimension(9), Ok(Size::Nine));
        assert_eq!(Size::from_dimension(10), Ok(Size::Ten));
        for n in [0, 1, 2, 3, 5, 7, 11, 13, 15, 17, 25, 100, 1000] {
            assert_eq!(Size::from_dimension(n), Err(Error::UnsupportedSize(n)));
        }
    }

    #[test]
    fn test_size_roundtrip() {
        for size in Size::iter() {
            assert_eq!(Size::from_dimension(size.dimension()), Ok(size));
            assert_eq!(size.max_value() as usize, size.dimension());
        }
    }

    #[test]
    fn test_candidate_set() {
        let mut set = CandidateSet::all(Size::Six);
        assert_eq!(set.len(), 6);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        set.remove(3);
        set.remove(6);
        assert!(!set.contains(3));
        assert!(set.contains(4));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
        let mut none = CandidateSet::none(Size::Six);
        assert!(none.is_empty());
        none.insert(5);
        assert_eq!(none.iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_grid_get_set() {
        let mut grid = Grid::new(Size::Nine);
        assert_eq!(grid.get([0, 0]), None);
        grid.set([0, 0], Some(5)).unwrap();
        grid.set([8, 8], Some(9)).unwrap();
        assert_eq!(grid.get([0, 0]), Some(5));
        assert_eq!(grid.get([8, 8]), Some(9));
        grid.set([0, 0], None).unwrap();
        assert_eq!(grid.get([0, 0]), None);
        assert_eq!(grid.empty_count(), 80);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_grid_set_rejects_bad_input() {
        let mut grid = Grid::new(Size::Four);
        assert_eq!(grid.set([4, 0], Some(1)), Err(Error::OutOfBounds([4, 0])));
        assert_eq!(grid.get([0, 4]), None);
        assert_eq!(
            grid.set([0, 0], Some(5)),
            Err(Error::ValueOutOfRange { value: 5, limit: 4 }),
        );
        assert_eq!(
            grid.set([0, 0], Some(0)),
            Err(Error::ValueOutOfRange { value: 0, limit: 4 }),
        );
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[
            vec![0, 1, 0, 0],
            vec![0, 3, 0, 0],
            vec![0, 0, 4, 0],
            vec![0, 0, 0, 2],
        ]).unwrap();
        assert_eq!(grid.size(), Size::Four);
        assert_eq!(grid.get([0, 1]), Some(1));
        assert_eq!(grid.get([3, 3]), Some(2));
        assert_eq!(grid.empty_count(), 12);
        assert_eq!(grid.to_rows()[1], vec![0, 3, 0, 0]);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert_eq!(
            Grid::from_rows(&vec![vec![0; 5]; 5]),
            Err(Error::UnsupportedSize(5)),
        );
        assert_eq!(
            Grid::from_rows(&[vec![0; 4], vec![0; 3], vec![0; 4], vec![0; 4]]),
            Err(Error::ShapeMismatch { expected: 4, found: 3 }),
        );
        assert_eq!(
            Grid::from_rows(&[vec![0, 0, 0, 9], vec![0; 4], vec![0; 4], vec![0; 4]]),
            Err(Error::ValueOutOfRange { value: 9, limit: 4 }),
        );
    }

    #[test]
    fn test_parse_compact() {
        let input = "5.3......\n\
                     6..195...\n\
                     .98....6.\n\
                     8...6...3\n\
                     4..8.3..1\n\
                     7...2...6\n\
                     .6....28.\n\
                     ...419..5\n\
                     ....8..79\n";
        let grid = Grid::parse(input, Size::Nine).unwrap();
        assert_eq!(grid.get([0, 0]), Some(5));
        assert_eq!(grid.get([1, 4]), Some(9));
        assert_eq!(grid.get([8, 8]), Some(9));
        assert_eq!(grid.get([0, 1]), None);
        assert_eq!(grid.serialize(), input);
    }

    #[test]
    fn test_parse_tokens() {
        let input = ". 3 . 7 . . 8 . . 5\n\
                     5 . . . 9 . . . . .\n\
                     . . 4 . . 1 . 7 . .\n\
                     . 6 . . . . . . 9 .\n\
                     7 . . . . . . . . 3\n\
                     2 . . . . . . . . 6\n\
                     . . . . . . . 5 . .\n\
                     . . 5 . . . . . . 1\n\
                     . . . . 8 . . . 2 .\n\
                     . . . 2 . . . . 10 .\n";
        let grid = Grid::parse(input, Size::Ten).unwrap();
        assert_eq!(grid.get([0, 1]), Some(3));
        assert_eq!(grid.get([9, 8]), Some(10));
        assert_eq!(grid.get([9, 9]), None);
        // Round-trips through the token form.
        let reparsed = Grid::parse(&grid.serialize(), Size::Ten).unwrap();
        assert_eq!(reparsed, grid);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            Grid::parse("....\n....\n....\n", Size::Four),
            Err(Error::ShapeMismatch { expected: 4, found: 3 }),
        );
        assert_eq!(
            Grid::parse("....\n...\n....\n....\n", Size::Four),
            Err(Error::ShapeMismatch { expected: 4, found: 3 }),
        );
        assert_eq!(
            Grid::parse("...9\n....\n....\n....\n", Size::Four),
            Err(Error::ValueOutOfRange { value: 9, limit: 4 }),
        );
        assert!(matches!(
            Grid::parse("...x\n....\n....\n....\n", Size::Four),
            Err(Error::Parse(_)),
        ));
        assert_eq!(
            Grid::parse(". . 17 .\n. . . .\n. . . .\n. . . .\n", Size::Four),
            Err(Error::ValueOutOfRange { value: 17, limit: 4 }),
        );
    }

    #[test]
    fn test_grid_serde_roundtrip() {
        let grid = Grid::from_rows(&[
            vec![0, 2, 0, 6, 0, 4],
            vec![6, 0, 4, 0, 2, 0],
            vec![0, 4, 0, 0, 0, 2],
            vec![2, 0, 0, 0, 4, 0],
            vec![0, 0, 2, 0, 0, 6],
            vec![4, 0, 6, 0, 0, 0],
        ]).unwrap();
        let encoded = serde_json::to_string(&grid).unwrap();
        let decoded: Grid = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, grid);
    }

    #[test]
    fn test_grid_deserialize_rejects_bad_input() {
        // A short cell buffer must not survive into a Grid, where it would
        // break in-bounds indexing.
        let short = serde_json::from_str::<Grid>(
            r#"{"size":"Nine","cells":[null,null,null]}"#,
        );
        assert!(short.is_err());
        let out_of_range = serde_json::from_str::<Grid>(
            r#"{"size":"Four","cells":[9,null,null,null,
                                       null,null,null,null,
                                       null,null,null,null,
                                       null,null,null,null]}"#,
        );
        assert!(out_of_range.is_err());
        let ok: Grid = serde_json::from_str(
            r#"{"size":"Four","cells":[4,null,null,null,
                                       null,null,null,null,
                                       null,null,null,null,
                                       null,null,null,1]}"#,
        ).unwrap();
        assert_eq!(ok.get([0, 0]), Some(4));
        assert_eq!(ok.get([3, 3]), Some(1));
        assert_eq!(ok.empty_count(), 14);
    }
}
