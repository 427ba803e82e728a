use lazy_static::lazy_static;
use rand::Rng;
use rand::seq::SliceRandom;
use crate::core::{Grid, Size};
use crate::validate;

lazy_static! {
    static ref FOUR: Grid = Grid::from_rows(&[
        vec![0, 1, 0, 0],
        vec![0, 3, 0, 0],
        vec![0, 0, 4, 0],
        vec![0, 0, 0, 2],
    ]).unwrap();

    static ref SIX: Grid = Grid::from_rows(&[
        vec![0, 2, 0, 6, 0, 4],
        vec![6, 0, 4, 0, 2, 0],
        vec![0, 4, 0, 0, 0, 2],
        vec![2, 0, 0, 0, 4, 0],
        vec![0, 0, 2, 0, 0, 6],
        vec![4, 0, 6, 0, 0, 0],
    ]).unwrap();

    static ref EIGHT: Grid = Grid::from_rows(&[
        vec![1, 0, 0, 4, 0, 6, 0, 8],
        vec![0, 0, 6, 0, 0, 0, 2, 0],
        vec![0, 7, 0, 8, 0, 0, 6, 3],
        vec![0, 0, 2, 0, 4, 0, 0, 0],
        vec![0, 6, 0, 0, 0, 0, 7, 0],
        vec![8, 0, 0, 2, 0, 0, 0, 5],
        vec![0, 0, 0, 0, 0, 8, 0, 0],
        vec![0, 3, 0, 0, 5, 0, 0, 7],
    ]).unwrap();

    static ref NINE: Grid = Grid::from_rows(&[
        vec![5, 3, 0, 0, 7, 0, 0, 0, 0],
        vec![6, 0, 0, 1, 9, 5, 0, 0, 0],
        vec![0, 9, 8, 0, 0, 0, 0, 6, 0],
        vec![8, 0, 0, 0, 6, 0, 0, 0, 3],
        vec![4, 0, 0, 8, 0, 3, 0, 0, 1],
        vec![7, 0, 0, 0, 2, 0, 0, 0, 6],
        vec![0, 6, 0, 0, 0, 0, 2, 8, 0],
        vec![0, 0, 0, 4, 1, 9, 0, 0, 5],
        vec![0, 0, 0, 0, 8, 0, 0, 7, 9],
    ]).unwrap();

    static ref TEN: Grid = Grid::from_rows(&[
        vec![0, 3, 0, 7, 0, 0, 8, 0, 0, 5],
        vec![5, 0, 0, 0, 9, 0, 0, 0, 0, 0],
        vec![0, 0, 4, 0, 0, 1, 0, 7, 0, 0],
        vec![0, 6, 0, 0, 0, 0, 0, 0, 9, 0],
        vec![7, 0, 0, 0, 0, 0, 0, 0, 0, 3],
        vec![2, 0, 0, 0, 0, 0, 0, 0, 0, 6],
        vec![0, 0, 0, 0, 0, 0, 0, 5, 0, 0],
        vec![0, 0, 5, 0, 0, 0, 0, 0, 0, 1],
        vec![0, 0, 0, 0, 8, 0, 0, 0, 2, 0],
        vec![0, 0, 0, 2, 0, 0, 0, 0, 0, 0],
    ]).unwrap();

    static ref TWELVE: Grid = Grid::from_rows(&[
        vec![0, 5, 0, 0, 8, 0, 0, 3, 0, 0, 0, 9],
        vec![7, 0, 0, 0, 0, 0, 5, 0, 0, 1, 0, 0],
        vec![0, 0, 9, 0, 0, 4, 0, 0, 7, 0, 0, 0],
        vec![0, 0, 0, 6, 0, 0, 0, 8, 0, 0, 3, 0],
        vec![0, 0, 0, 0, 0, 9, 0, 0, 0, 7, 0, 0],
        vec![0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 5, 0],
        vec![0, 0, 7, 0, 0, 0, 4, 0, 0, 0, 0, 2],
        vec![0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0],
        vec![2, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0],
        vec![0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 8, 0, 0, 0, 0, 0, 4, 0, 0],
        vec![5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ]).unwrap();

    static ref SIXTEEN: Grid = {
        let mut grid = Grid::new(Size::Sixteen);
        for (r, c, v) in [
            (0, 4, 11), (1, 2, 3), (1, 7, 12), (1, 12, 5),
            (2, 4, 7), (2, 9, 15), (4, 6, 9), (5, 5, 16),
            (6, 10, 4), (9, 3, 8), (11, 8, 3), (13, 2, 15),
        ] {
            grid.set([r, c], Some(v)).unwrap();
        }
        grid
    };
}

/// A canned starting puzzle for each supported size. Every example has at
/// least one solution.
pub fn example(size: Size) -> &'static Grid {
    match size {
        Size::Four => &FOUR,
        Size::Six => &SIX,
        Size::Eight => &EIGHT,
        Size::Nine => &NINE,
        Size::Ten => &TEN,
        Size::Twelve => &TWELVE,
        Size::Sixteen => &SIXTEEN,
    }
}

/// A loose puzzle with up to `clues` random values in random cells. Each
/// draw is kept only if it conflicts with nothing already placed, so the
/// result is always valid (though possibly sparser than asked for, and not
/// necessarily solvable).
pub fn scatter<R: Rng + ?Sized>(size: Size, clues: usize, rng: &mut R) -> Grid {
    let n = size.dimension();
    let mut positions: Vec<[usize; 2]> = (0..n)
        .flat_map(|r| (0..n).map(move |c| [r, c]))
        .collect();
    positions.shuffle(rng);
    let mut grid = Grid::new(size);
    for index in positions.into_iter().take(clues) {
        let value = rng.random_range(1..=size.max_value());
        if validate::is_legal(&grid, index, value) {
            grid.put(index, Some(value));
        }
    }
    grid
}
