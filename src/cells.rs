use crate::errors::*;

use smallvec::SmallVec;
use std::convert::TryFrom;
use std::fmt;

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    pub fn new(x: i32, y: i32) -> GridCoordinate {
        GridCoordinate { x, y }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four sides of a square cell. The discriminant is the index into a cell's wall flags.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum WallSide {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::Top, WallSide::Right, WallSide::Bottom, WallSide::Left];

    /// The side of the adjacent cell that shares this wall.
    pub fn opposite(self) -> WallSide {
        match self {
            WallSide::Top => WallSide::Bottom,
            WallSide::Right => WallSide::Left,
            WallSide::Bottom => WallSide::Top,
            WallSide::Left => WallSide::Right,
        }
    }

    /// The grid direction this side faces.
    pub fn direction(self) -> CompassPrimary {
        match self {
            WallSide::Top => CompassPrimary::North,
            WallSide::Right => CompassPrimary::East,
            WallSide::Bottom => CompassPrimary::South,
            WallSide::Left => CompassPrimary::West,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for WallSide {
    type Error = Error;

    fn try_from(raw: u8) -> Result<WallSide> {
        match raw {
            0 => Ok(WallSide::Top),
            1 => Ok(WallSide::Right),
            2 => Ok(WallSide::Bottom),
            3 => Ok(WallSide::Left),
            _ => Err(ErrorKind::InvalidWallSide(raw).into()),
        }
    }
}

/// North is `+y`, east is `+x`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// Neighbour discovery order. Changing it changes every seeded maze.
    pub const SEARCH_ORDER: [CompassPrimary; 4] = [CompassPrimary::North,
                                                   CompassPrimary::East,
                                                   CompassPrimary::South,
                                                   CompassPrimary::West];

    /// The wall a cell has to open to pass in this direction.
    pub fn wall_side(self) -> WallSide {
        match self {
            CompassPrimary::North => WallSide::Top,
            CompassPrimary::East => WallSide::Right,
            CompassPrimary::South => WallSide::Bottom,
            CompassPrimary::West => WallSide::Left,
        }
    }

    /// Creates a new coordinate offset 1 cell away in this direction. The result may lie outside
    /// any grid (wrapping at the `i32` limits), callers check bounds.
    pub fn offset_coordinate(self, coord: GridCoordinate) -> GridCoordinate {
        let (x, y) = (coord.x, coord.y);
        match self {
            CompassPrimary::North => GridCoordinate::new(x, y.wrapping_add(1)),
            CompassPrimary::East => GridCoordinate::new(x.wrapping_add(1), y),
            CompassPrimary::South => GridCoordinate::new(x, y.wrapping_sub(1)),
            CompassPrimary::West => GridCoordinate::new(x.wrapping_sub(1), y),
        }
    }

    /// Which direction leads from `from` to the orthogonally adjacent `to`, if any.
    pub fn between(from: GridCoordinate, to: GridCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::SEARCH_ORDER
            .iter()
            .cloned()
            .find(|dir| dir.offset_coordinate(from) == to)
    }
}

#[derive(PartialEq, Copy, Clone, Debug, Default)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32) -> WorldPosition {
        WorldPosition { x, y }
    }
}

/// One square of the grid: a fixed coordinate plus four wall flags, all present at creation.
#[derive(Clone, Debug)]
pub struct Cell {
    coordinate: GridCoordinate,
    world_position: WorldPosition,
    walls: [bool; 4],
}

impl Cell {
    pub(crate) fn new(coordinate: GridCoordinate, world_position: WorldPosition) -> Cell {
        Cell {
            coordinate,
            world_position,
            walls: [true; 4],
        }
    }

    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn world_position(&self) -> WorldPosition {
        self.world_position
    }

    #[inline]
    pub fn wall(&self, side: WallSide) -> bool {
        self.walls[side.index()]
    }

    #[inline]
    pub fn set_wall(&mut self, side: WallSide, present: bool) {
        self.walls[side.index()] = present;
    }

    pub fn reset_walls(&mut self) {
        self.walls = [true; 4];
    }

    pub fn open_sides(&self) -> SmallVec<[WallSide; 4]> {
        WallSide::ALL
            .iter()
            .cloned()
            .filter(|side| !self.wall(*side))
            .collect()
    }
}
