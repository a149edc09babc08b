use crate::cells::{Cell, CompassPrimary, CoordinateSmallVec, GridCoordinate, WallSide, WorldPosition};
use crate::errors::*;
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{CellSize, Height, Width};

use std::slice;

/// Is the coordinate within `[0, width) x [0, height)`.
#[inline]
pub fn is_inside_grid(coord: GridCoordinate, Width(width): Width, Height(height): Height) -> bool {
    coord.x >= 0 && coord.y >= 0 && coord.x < width && coord.y < height
}

/// Where the grid sits in world space. Only used to precompute each cell's world position.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct CellLayout {
    pub origin: WorldPosition,
    pub cell_size: CellSize,
}

impl Default for CellLayout {
    fn default() -> CellLayout {
        CellLayout {
            origin: WorldPosition::default(),
            cell_size: CellSize(1.0),
        }
    }
}

impl CellLayout {
    /// Rejects a cell size that is zero, negative, NaN or infinite.
    pub fn new(origin: WorldPosition, cell_size: CellSize) -> Result<CellLayout> {
        let CellSize(size) = cell_size;
        if !size.is_finite() || size <= 0.0 {
            return Err(ErrorKind::InvalidCellSize(size).into());
        }
        Ok(CellLayout { origin, cell_size })
    }

    /// Grid x runs right and grid y runs down from the origin.
    fn world_position(&self, coord: GridCoordinate) -> WorldPosition {
        let CellSize(size) = self.cell_size;
        WorldPosition::new(self.origin.x + coord.x as f32 * size,
                           self.origin.y - coord.y as f32 * size)
    }
}

/// Fixed size rectangle of cells stored row major. The dimensions never change after creation.
#[derive(Clone, Debug)]
pub struct Grid {
    width: Width,
    height: Height,
    layout: CellLayout,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        Grid::with_layout(width, height, CellLayout::default())
    }

    pub fn with_layout(width: Width, height: Height, layout: CellLayout) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w <= 0 || h <= 0 {
            return Err(ErrorKind::InvalidDimension(w, h).into());
        }

        let cells = CellIter::new(width, height)
            .map(|coord| Cell::new(coord, layout.world_position(coord)))
            .collect();

        Ok(Grid {
            width,
            height,
            layout,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn layout(&self) -> CellLayout {
        self.layout
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        is_inside_grid(coord, self.width, self.height)
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Result<usize> {
        if self.is_valid_coordinate(coord) {
            Ok(self.unchecked_index(coord))
        } else {
            Err(self.invalid_coordinate(coord))
        }
    }

    pub fn cell(&self, coord: GridCoordinate) -> Result<&Cell> {
        let index = self.grid_coordinate_to_index(coord)?;
        Ok(&self.cells[index])
    }

    fn cell_mut(&mut self, coord: GridCoordinate) -> Result<&mut Cell> {
        let index = self.grid_coordinate_to_index(coord)?;
        Ok(&mut self.cells[index])
    }

    #[inline]
    pub fn wall(&self, coord: GridCoordinate, side: WallSide) -> Result<bool> {
        self.cell(coord).map(|cell| cell.wall(side))
    }

    /// Sets one cell's flag only. Use `remove_wall_between` to keep both sides of a wall in step.
    pub fn set_wall(&mut self, coord: GridCoordinate, side: WallSide, present: bool) -> Result<()> {
        self.cell_mut(coord)?.set_wall(side, present);
        Ok(())
    }

    #[inline]
    pub fn world_position(&self, coord: GridCoordinate) -> Result<WorldPosition> {
        self.cell(coord).map(Cell::world_position)
    }

    /// Put every wall of every cell back.
    pub fn reset_walls(&mut self) {
        for cell in &mut self.cells {
            cell.reset_walls();
        }
    }

    /// Open the wall shared by two orthogonally adjacent cells, updating both cells.
    /// Returns the side that was opened on `a`.
    pub fn remove_wall_between(&mut self, a: GridCoordinate, b: GridCoordinate) -> Result<WallSide> {
        let a_index = self.grid_coordinate_to_index(a)?;
        let b_index = self.grid_coordinate_to_index(b)?;
        let direction = CompassPrimary::between(a, b).ok_or_else(|| self.invalid_coordinate(b))?;

        Ok(self.open_wall(a_index, b_index, direction))
    }

    /// Open the wall of `coord` facing `direction` and the matching wall of the neighbour there.
    /// Panics unless both cells are on the grid.
    pub(crate) fn carve(&mut self, coord: GridCoordinate, direction: CompassPrimary) -> (GridCoordinate, WallSide) {
        let neighbour = direction.offset_coordinate(coord);
        assert!(self.is_valid_coordinate(coord) && self.is_valid_coordinate(neighbour),
                "cannot carve {:?} from {} on a {}x{} grid",
                direction, coord, self.width.0, self.height.0);

        let (coord_index, neighbour_index) = (self.unchecked_index(coord), self.unchecked_index(neighbour));
        (neighbour, self.open_wall(coord_index, neighbour_index, direction))
    }

    fn open_wall(&mut self, a_index: usize, b_index: usize, direction: CompassPrimary) -> WallSide {
        let side = direction.wall_side();
        self.cells[a_index].set_wall(side, false);
        self.cells[b_index].set_wall(side.opposite(), false);
        side
    }

    /// Row major index of a coordinate already known to be on the grid.
    #[inline]
    pub(crate) fn unchecked_index(&self, coord: GridCoordinate) -> usize {
        (coord.y * self.width.0 + coord.x) as usize
    }

    /// Is there an open wall between two adjacent cells. False for invalid or distant pairs.
    pub fn is_open_between(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        match (CompassPrimary::between(a, b), self.cell(a), self.cell(b)) {
            (Some(dir), Ok(cell_a), Ok(cell_b)) => {
                let side = dir.wall_side();
                !cell_a.wall(side) && !cell_b.wall(side.opposite())
            }
            _ => false,
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        let neighbour_coord = direction.offset_coordinate(coord);
        if self.is_valid_coordinate(neighbour_coord) {
            Some(neighbour_coord)
        } else {
            None
        }
    }

    /// Cells north, east, south or west of `coord` that exist on the grid, in that order.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::SEARCH_ORDER
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Number of open walls between pairs of cells. Each wall is counted once via the
    /// top and right sides; outward facing sides are ignored.
    pub fn open_walls_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [WallSide::Top, WallSide::Right]
                    .iter()
                    .filter(|side| {
                        let dir = side.direction();
                        !cell.wall(**side) &&
                        self.neighbour_at_direction(cell.coordinate(), dir).is_some()
                    })
                    .count()
            })
            .sum()
    }

    #[inline]
    pub fn cells(&self) -> slice::Iter<Cell> {
        self.cells.iter()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::new(self.width, self.height)
    }

    fn invalid_coordinate(&self, coord: GridCoordinate) -> Error {
        ErrorKind::InvalidCoordinate(coord.x, coord.y, self.width.0, self.height.0).into()
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools; // a trait

    fn small_grid(w: i32, h: i32) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn gc(x: i32, y: i32) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 4);
        assert_eq!(g.size(), 40);
        assert_eq!(g.width(), Width(10));
        assert_eq!(g.height(), Height(4));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        for &(w, h) in &[(0, 5), (5, 0), (0, 0), (-1, 3), (3, -7)] {
            match Grid::new(Width(w), Height(h)) {
                Err(Error(ErrorKind::InvalidDimension(ew, eh), _)) => {
                    assert_eq!((ew, eh), (w, h));
                }
                other => panic!("expected InvalidDimension for {}x{}, got {:?}", w, h, other),
            }
        }
    }

    #[test]
    fn every_cell_starts_closed_with_its_coordinate() {
        let g = small_grid(3, 2);
        for coord in g.iter() {
            let cell = g.cell(coord).unwrap();
            assert_eq!(cell.coordinate(), coord);
            for side in WallSide::ALL.iter() {
                assert!(g.wall(coord, *side).unwrap());
            }
        }
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn inside_grid_predicate() {
        let (w, h) = (Width(3), Height(2));
        assert!(is_inside_grid(gc(0, 0), w, h));
        assert!(is_inside_grid(gc(2, 1), w, h));
        assert!(!is_inside_grid(gc(3, 1), w, h));
        assert!(!is_inside_grid(gc(2, 2), w, h));
        assert!(!is_inside_grid(gc(-1, 0), w, h));
        assert!(!is_inside_grid(gc(0, -1), w, h));
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let mut g = small_grid(2, 2);
        for &coord in &[gc(2, 0), gc(0, 2), gc(-1, 0), gc(i32::MAX, i32::MAX)] {
            match g.wall(coord, WallSide::Top) {
                Err(Error(ErrorKind::InvalidCoordinate(x, y, 2, 2), _)) => {
                    assert_eq!((x, y), (coord.x, coord.y));
                }
                other => panic!("expected InvalidCoordinate, got {:?}", other),
            }
            assert!(g.set_wall(coord, WallSide::Top, false).is_err());
            assert!(g.cell(coord).is_err());
            assert!(g.world_position(coord).is_err());
        }
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let indices = g.iter()
            .map(|coord| g.grid_coordinate_to_index(coord).unwrap())
            .collect::<Vec<usize>>();
        assert_eq!(indices, (0..9).collect::<Vec<usize>>());
        assert!(g.grid_coordinate_to_index(gc(2, 3)).is_err());
        assert!(g.grid_coordinate_to_index(gc(3, 2)).is_err());
    }

    #[test]
    fn set_wall_touches_one_cell_only() {
        let mut g = small_grid(2, 2);
        g.set_wall(gc(0, 0), WallSide::Right, false).unwrap();
        assert!(!g.wall(gc(0, 0), WallSide::Right).unwrap());
        assert!(g.wall(gc(1, 0), WallSide::Left).unwrap());
        assert!(!g.is_open_between(gc(0, 0), gc(1, 0)));
    }

    #[test]
    fn removing_walls_updates_both_sides() {
        let mut g = small_grid(3, 3);
        let centre = gc(1, 1);

        assert_eq!(g.remove_wall_between(centre, gc(1, 2)).unwrap(), WallSide::Top);
        assert!(!g.wall(centre, WallSide::Top).unwrap());
        assert!(!g.wall(gc(1, 2), WallSide::Bottom).unwrap());

        assert_eq!(g.remove_wall_between(centre, gc(2, 1)).unwrap(), WallSide::Right);
        assert!(!g.wall(gc(2, 1), WallSide::Left).unwrap());

        assert_eq!(g.remove_wall_between(centre, gc(1, 0)).unwrap(), WallSide::Bottom);
        assert!(!g.wall(gc(1, 0), WallSide::Top).unwrap());

        assert_eq!(g.remove_wall_between(centre, gc(0, 1)).unwrap(), WallSide::Left);
        assert!(!g.wall(gc(0, 1), WallSide::Right).unwrap());

        assert_eq!(g.open_walls_count(), 4);
        for neighbour in g.neighbours(centre).iter() {
            assert!(g.is_open_between(centre, *neighbour));
            assert!(g.is_open_between(*neighbour, centre));
        }
    }

    #[test]
    fn no_wall_removal_between_distant_or_outside_cells() {
        let mut g = small_grid(3, 3);
        assert!(g.remove_wall_between(gc(0, 0), gc(0, 0)).is_err());
        assert!(g.remove_wall_between(gc(0, 0), gc(1, 1)).is_err());
        assert!(g.remove_wall_between(gc(0, 0), gc(0, 2)).is_err());
        assert!(g.remove_wall_between(gc(0, 0), gc(-1, 0)).is_err());
        assert!(g.remove_wall_between(gc(2, 2), gc(3, 2)).is_err());
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn reset_restores_every_wall() {
        let mut g = small_grid(2, 2);
        g.remove_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.remove_wall_between(gc(1, 0), gc(1, 1)).unwrap();
        assert_eq!(g.open_walls_count(), 2);
        g.reset_walls();
        assert_eq!(g.open_walls_count(), 0);
        assert!(g.cells().all(|cell| cell.open_sides().is_empty()));
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let node_indices: Vec<GridCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected_indices: Vec<GridCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(node_indices, expected_indices);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_follow_search_order() {
        let g = small_grid(3, 3);
        assert_eq!(&*g.neighbours(gc(1, 1)), &[gc(1, 2), gc(2, 1), gc(1, 0), gc(0, 1)]);
        assert_eq!(&*g.neighbours(gc(0, 0)), &[gc(0, 1), gc(1, 0)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::North, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::South, None);
        check_neighbour(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::West, None);

        check_neighbour(gc(1, 1), CompassPrimary::North, None);
        check_neighbour(gc(1, 1), CompassPrimary::South, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), CompassPrimary::East, None);
        check_neighbour(gc(1, 1), CompassPrimary::West, Some(gc(0, 1)));
    }

    #[test]
    fn world_positions_follow_layout() {
        let layout = CellLayout {
            origin: WorldPosition::new(10.0, 5.0),
            cell_size: CellSize(2.0),
        };
        let g = Grid::with_layout(Width(3), Height(3), layout).unwrap();
        assert_eq!(g.world_position(gc(0, 0)).unwrap(), WorldPosition::new(10.0, 5.0));
        assert_eq!(g.world_position(gc(2, 0)).unwrap(), WorldPosition::new(14.0, 5.0));
        assert_eq!(g.world_position(gc(1, 2)).unwrap(), WorldPosition::new(12.0, 1.0));
        assert_eq!(g.layout(), layout);
    }

    #[test]
    fn cell_layout_needs_a_positive_finite_size() {
        let origin = WorldPosition::new(1.0, 2.0);
        for &size in &[0.0, -0.0, -1.0, std::f32::NAN, std::f32::INFINITY, std::f32::NEG_INFINITY] {
            match CellLayout::new(origin, CellSize(size)) {
                Err(Error(ErrorKind::InvalidCellSize(bad), _)) => {
                    assert_eq!(bad.to_bits(), size.to_bits());
                }
                other => panic!("expected InvalidCellSize for {}, got {:?}", size, other),
            }
        }

        let layout = CellLayout::new(origin, CellSize(0.5)).unwrap();
        assert_eq!(layout, CellLayout { origin, cell_size: CellSize(0.5) });
        let g = Grid::with_layout(Width(2), Height(2), layout).unwrap();
        assert_eq!(g.world_position(gc(1, 1)).unwrap(), WorldPosition::new(1.5, 1.5));
    }

    #[test]
    fn carving_opens_both_sides_of_the_wall() {
        let mut g = small_grid(3, 3);
        let centre = gc(1, 1);
        let expected = [(gc(1, 2), WallSide::Top),
                        (gc(2, 1), WallSide::Right),
                        (gc(1, 0), WallSide::Bottom),
                        (gc(0, 1), WallSide::Left)];
        for (dir, &(neighbour, side)) in CompassPrimary::SEARCH_ORDER.iter().zip(expected.iter()) {
            assert_eq!(g.carve(centre, *dir), (neighbour, side));
            assert!(!g.wall(centre, side).unwrap());
            assert!(!g.wall(neighbour, side.opposite()).unwrap());
            assert!(g.is_open_between(centre, neighbour));
        }
        assert_eq!(g.open_walls_count(), 4);
    }

    #[test]
    #[should_panic]
    fn carving_off_the_grid_panics() {
        let mut g = small_grid(2, 2);
        let _ = g.carve(gc(1, 1), CompassPrimary::East);
    }
}
