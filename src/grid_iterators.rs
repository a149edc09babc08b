use crate::cells::GridCoordinate;
use crate::units::{Height, Width};

/// Row major walk over every coordinate of a `width * height` grid, starting at (0, 0).
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    width: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(Width(w): Width, Height(h): Height) -> CellIter {
        let (width, height) = (w.max(0) as usize, h.max(0) as usize);
        CellIter {
            current_cell_number: 0,
            width,
            cells_count: width * height,
        }
    }
}

impl Iterator for CellIter {
    type Item = GridCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_grid_coordinate(self.width, self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

/// Yields one row of coordinates at a time, lowest `y` first.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    current_row: i32,
    width: i32,
    height: i32,
}

impl BatchIter {
    pub fn new(Width(width): Width, Height(height): Height) -> BatchIter {
        BatchIter {
            current_row: 0,
            width: width.max(0),
            height: height.max(0),
        }
    }
}

impl Iterator for BatchIter {
    type Item = Vec<GridCoordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row < self.height {
            let y = self.current_row;
            let coords = (0..self.width).map(|x| GridCoordinate::new(x, y)).collect();
            self.current_row += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.height - self.current_row) as usize;
        (remaining, Some(remaining))
    }
}
impl DoubleEndedIterator for BatchIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.current_row < self.height {
            self.height -= 1;
            let y = self.height;
            Some((0..self.width).map(|x| GridCoordinate::new(x, y)).collect())
        } else {
            None
        }
    }
}

#[inline]
pub fn index_to_grid_coordinate(width: usize, one_dimensional_index: usize) -> GridCoordinate {
    let y = one_dimensional_index / width;
    let x = one_dimensional_index - (y * width);
    GridCoordinate::new(x as i32, y as i32)
}
